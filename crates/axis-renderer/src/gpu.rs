use crate::pipeline::{create_depth_texture, CubeBuffers, RenderPipeline, Uniforms, CUBE_SHADER};
use crate::transform::{model_view_matrix, projection_matrix};
use crate::{CubeRenderer, RenderError};
use glam::Quat;
use std::sync::Arc;
use tracing::{info, warn};
use winit::window::Window;

/// wgpu-backed cube renderer bound to one window.
///
/// Owns every GPU resource it uses; dropping it releases them.
pub struct GpuCubeRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: RenderPipeline,
    buffers: CubeBuffers,
    depth: wgpu::TextureView,
    frame_count: u64,
}

impl GpuCubeRenderer {
    /// Acquire a GPU context for `window` and build the cube program and buffers.
    pub fn attach(window: Arc<Window>) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoAdapter)?;

        info!(name = adapter.get_info().name, "Using GPU");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("axis_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Surface("surface reports no formats".to_string()))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let pipeline = RenderPipeline::new(&device, format, CUBE_SHADER)?;
        let buffers = CubeBuffers::new(&device);
        let depth = create_depth_texture(&device, surface_config.width, surface_config.height);

        info!(
            width = surface_config.width,
            height = surface_config.height,
            ?format,
            "Render pipeline ready"
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            pipeline,
            buffers,
            depth,
            frame_count: 0,
        })
    }

    /// Next swapchain texture. A lost or outdated surface is reconfigured
    /// and asked once more.
    fn acquire_frame(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(output) => return Some(output),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
            }
            Err(e) => {
                warn!(?e, "Failed to get surface texture");
                return None;
            }
        }

        match self.surface.get_current_texture() {
            Ok(output) => Some(output),
            Err(e) => {
                warn!(?e, "Surface still unavailable after reconfigure");
                None
            }
        }
    }

    fn aspect_ratio(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height as f32
    }
}

impl CubeRenderer for GpuCubeRenderer {
    fn draw(&mut self, orientation: Quat, invert: bool) -> bool {
        let Some(output) = self.acquire_frame() else {
            return false;
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let uniforms = Uniforms::new(
            model_view_matrix(orientation, invert),
            projection_matrix(self.aspect_ratio()),
        );
        self.pipeline.write_uniforms(&self.queue, &uniforms);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("cube_render"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cube_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, &self.pipeline.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.buffers.positions.slice(..));
            pass.set_vertex_buffer(1, self.buffers.colours.slice(..));
            pass.set_index_buffer(self.buffers.indices.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..self.buffers.index_count, 0, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.frame_count += 1;
        if self.frame_count % 600 == 0 {
            tracing::debug!(frames = self.frame_count, "Render heartbeat");
        }
        true
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth = create_depth_texture(&self.device, width, height);
    }
}
