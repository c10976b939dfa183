//! Main renderer managing wgpu state and rendering.

use crate::{
    camera::{CameraUniform, OrbitCamera},
    error::RendererError,
    grass::{GrassField, GrassMaterial},
    ground::Ground,
    pipeline::{
        create_camera_bind_group_layout, create_grass_bind_group_layout, create_grass_pipeline,
        create_ground_pipeline, create_texture_bind_group_layout, ShaderSources, SAMPLE_COUNT,
    },
    texture::Texture,
};
use anyhow::Result;
use procgen::FieldBuffer;
use std::path::Path;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Main renderer state.
pub struct Renderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    // Pipelines
    ground_pipeline: wgpu::RenderPipeline,
    grass_pipeline: wgpu::RenderPipeline,

    // Bind groups and layouts
    camera_bind_group: wgpu::BindGroup,
    camera_buffer: wgpu::Buffer,
    camera_uniform: CameraUniform,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    grass_bind_group_layout: wgpu::BindGroupLayout,

    // Render targets, rebuilt on resize
    msaa_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
}

impl Renderer {
    /// Create a new renderer for the given window.
    pub async fn new(window: Arc<Window>, shaders: &ShaderSources, vsync: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::NoAdapter)?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        // The field is one large vertex buffer; ask for everything the adapter offers.
        let adapter_limits = adapter.limits();
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits {
                        max_buffer_size: adapter_limits.max_buffer_size,
                        ..wgpu::Limits::default()
                    },
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;
        log::info!("Device max buffer size: {} bytes", device.limits().max_buffer_size);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout = create_camera_bind_group_layout(&device);
        let texture_bind_group_layout = create_texture_bind_group_layout(&device);
        let grass_bind_group_layout = create_grass_bind_group_layout(&device);

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Shader text comes from the host; surface compile errors instead of panicking.
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let ground_pipeline = create_ground_pipeline(
            &device,
            config.format,
            &shaders.ground,
            &camera_bind_group_layout,
            &texture_bind_group_layout,
        );
        if let Some(error) = device.pop_error_scope().await {
            return Err(RendererError::Pipeline {
                label: "Ground Pipeline",
                message: error.to_string(),
            }
            .into());
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let grass_pipeline = create_grass_pipeline(
            &device,
            config.format,
            &shaders.grass,
            &camera_bind_group_layout,
            &grass_bind_group_layout,
        );
        if let Some(error) = device.pop_error_scope().await {
            return Err(RendererError::Pipeline {
                label: "Grass Pipeline",
                message: error.to_string(),
            }
            .into());
        }

        let msaa_view =
            Texture::create_msaa_target(&device, config.format, config.width, config.height, SAMPLE_COUNT);
        let depth_view =
            Texture::create_depth_view(&device, config.width, config.height, SAMPLE_COUNT, "Depth Texture");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            ground_pipeline,
            grass_pipeline,
            camera_bind_group,
            camera_buffer,
            camera_uniform,
            texture_bind_group_layout,
            grass_bind_group_layout,
            msaa_view,
            depth_view,
        })
    }

    /// Resize the surface and the size-dependent render targets. Zero-sized
    /// requests (minimised window) are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.msaa_view = Texture::create_msaa_target(
                &self.device,
                self.config.format,
                self.config.width,
                self.config.height,
                SAMPLE_COUNT,
            );
            self.depth_view = Texture::create_depth_view(
                &self.device,
                self.config.width,
                self.config.height,
                SAMPLE_COUNT,
                "Depth Texture",
            );
            log::debug!("Resized surface to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Reconfigure the surface at its current size after it was lost or outdated.
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    pub fn update_camera(&mut self, camera: &OrbitCamera) {
        self.camera_uniform.update(camera);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }

    pub fn begin_frame(&mut self) -> Result<(wgpu::SurfaceTexture, wgpu::CommandEncoder), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        Ok((output, encoder))
    }

    /// Clear, then draw the ground sphere and the grass field in one pass.
    pub fn render_scene(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        ground: &Ground,
        grass: &GrassField,
        material: &GrassMaterial,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.msaa_view,
                resolve_target: Some(view),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Discard,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.ground_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_bind_group(1, ground.bind_group(), &[]);
        render_pass.set_vertex_buffer(0, ground.mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(ground.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..ground.mesh.num_indices, 0, 0..1);

        render_pass.set_pipeline(&self.grass_pipeline);
        render_pass.set_bind_group(1, material.bind_group(), &[]);
        render_pass.set_vertex_buffer(0, grass.mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(grass.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..grass.mesh.num_indices, 0, 0..1);
    }

    pub fn end_frame(&self, output: wgpu::SurfaceTexture, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    pub fn load_texture(&self, path: &Path) -> Result<Texture, RendererError> {
        Texture::load(&self.device, &self.queue, path)
    }

    pub fn texture_from_rgba(&self, pixels: &[u8], width: u32, height: u32, label: &str) -> Texture {
        Texture::from_rgba(&self.device, &self.queue, pixels, width, height, label)
    }

    pub fn create_ground(&self, radius: f32, segments: u32, rings: u32, texture: &Texture) -> Ground {
        Ground::new(
            &self.device,
            &self.texture_bind_group_layout,
            radius,
            segments,
            rings,
            texture,
        )
    }

    pub fn create_grass_material(&self, texture: &Texture) -> GrassMaterial {
        GrassMaterial::new(&self.device, &self.grass_bind_group_layout, texture)
    }

    pub fn upload_grass(&self, field: &FieldBuffer) -> Result<GrassField, RendererError> {
        GrassField::upload(&self.device, field)
    }

    /// Get window dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
