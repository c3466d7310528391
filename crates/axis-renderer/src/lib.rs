pub mod cube;
pub mod gpu;
pub mod pipeline;
pub mod scheduler;
pub mod transform;

use glam::Quat;
use thiserror::Error;

pub use gpu::GpuCubeRenderer;
pub use scheduler::{FrameScheduler, RedrawHost};

/// Why a renderer could not be attached. Each carries the underlying diagnostic.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Could not create a rendering surface: {0}")]
    Surface(String),
    #[error("No suitable GPU adapter found")]
    NoAdapter,
    #[error("Could not create a GPU device: {0}")]
    Device(String),
    #[error("Error initializing the shader program: {0}")]
    Program(String),
}

/// Draws the orientation cube.
pub trait CubeRenderer {
    /// Render one frame for `orientation` (sensor frame, x/y/z/w).
    /// Returns `false` if no frame could be presented.
    fn draw(&mut self, orientation: Quat, invert: bool) -> bool;
    /// The drawable changed size.
    fn resize(&mut self, width: u32, height: u32);
}
