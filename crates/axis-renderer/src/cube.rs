use bytemuck::{Pod, Zeroable};

/// Vertex position, one buffer slot.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Position(pub [f32; 3]);

/// Flat vertex colour, second buffer slot.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Colour(pub [f32; 4]);

impl Position {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

impl Colour {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            }],
        }
    }
}

pub const VERTICES_PER_FACE: usize = 4;
pub const FACE_COUNT: usize = 6;
pub const VERTEX_COUNT: usize = VERTICES_PER_FACE * FACE_COUNT;
pub const INDEX_COUNT: usize = 6 * FACE_COUNT;

/// Unit cube corners, four per face: front, back, top, bottom, right, left.
pub const CUBE_POSITIONS: [Position; VERTEX_COUNT] = [
    // Front
    Position([-1.0, -1.0, 1.0]),
    Position([1.0, -1.0, 1.0]),
    Position([1.0, 1.0, 1.0]),
    Position([-1.0, 1.0, 1.0]),
    // Back
    Position([-1.0, -1.0, -1.0]),
    Position([-1.0, 1.0, -1.0]),
    Position([1.0, 1.0, -1.0]),
    Position([1.0, -1.0, -1.0]),
    // Top
    Position([-1.0, 1.0, -1.0]),
    Position([-1.0, 1.0, 1.0]),
    Position([1.0, 1.0, 1.0]),
    Position([1.0, 1.0, -1.0]),
    // Bottom
    Position([-1.0, -1.0, -1.0]),
    Position([1.0, -1.0, -1.0]),
    Position([1.0, -1.0, 1.0]),
    Position([-1.0, -1.0, 1.0]),
    // Right
    Position([1.0, -1.0, -1.0]),
    Position([1.0, 1.0, -1.0]),
    Position([1.0, 1.0, 1.0]),
    Position([1.0, -1.0, 1.0]),
    // Left
    Position([-1.0, -1.0, -1.0]),
    Position([-1.0, -1.0, 1.0]),
    Position([-1.0, 1.0, 1.0]),
    Position([-1.0, 1.0, -1.0]),
];

/// One colour per face, in the same face order as [`CUBE_POSITIONS`].
pub const FACE_COLOURS: [Colour; FACE_COUNT] = [
    Colour([1.0, 0.0, 0.0, 1.0]),
    Colour([1.0, 0.0, 1.0, 1.0]),
    Colour([0.0, 1.0, 1.0, 1.0]),
    Colour([0.0, 0.0, 1.0, 1.0]),
    Colour([0.0, 1.0, 0.0, 1.0]),
    Colour([1.0, 1.0, 0.0, 1.0]),
];

/// Two triangles per face.
pub const CUBE_INDICES: [u16; INDEX_COUNT] = [
    0, 1, 2, 0, 2, 3, // front
    4, 5, 6, 4, 6, 7, // back
    8, 9, 10, 8, 10, 11, // top
    12, 13, 14, 12, 14, 15, // bottom
    16, 17, 18, 16, 18, 19, // right
    20, 21, 22, 20, 22, 23, // left
];

/// Per-vertex colours: each face colour repeated for its four corners.
pub fn cube_colours() -> Vec<Colour> {
    FACE_COLOURS
        .iter()
        .flat_map(|c| std::iter::repeat(*c).take(VERTICES_PER_FACE))
        .collect()
}
