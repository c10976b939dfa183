//! GPU side of the grass field: the uploaded blade mesh and the material
//! carrying the grass texture and the animated time uniform.

use crate::error::{check_buffer_size, RendererError};
use crate::mesh::Mesh;
use crate::texture::Texture;
use crate::vertex::GrassVertex;
use bytemuck::{Pod, Zeroable};
use procgen::FieldBuffer;
use wgpu::util::DeviceExt;

/// Grass shader uniform (must match grass.wgsl `Grass`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GrassUniform {
    pub time: f32,
    pub _pad: [f32; 3],
}

/// Grass texture and time uniform, bound as group 1 of the grass pipeline.
pub struct GrassMaterial {
    uniform: GrassUniform,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GrassMaterial {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, texture: &Texture) -> Self {
        let uniform = GrassUniform::default();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grass Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Grass Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        Self {
            uniform,
            buffer,
            bind_group,
        }
    }

    /// Current value of the time uniform.
    pub fn time(&self) -> f32 {
        self.uniform.time
    }

    /// Write a new time value; visible from the next submitted frame.
    pub fn set_time(&mut self, queue: &wgpu::Queue, time: f32) {
        self.uniform.time = time;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// The whole field as one indexed mesh, uploaded once.
pub struct GrassField {
    pub mesh: Mesh,
    pub blade_count: usize,
    pub vertex_count: usize,
}

impl GrassField {
    /// Interleave and upload `field`. Fails without allocating when either
    /// buffer exceeds the device's buffer size limit.
    pub fn upload(device: &wgpu::Device, field: &FieldBuffer) -> Result<Self, RendererError> {
        let vertex_bytes = (field.vertex_count() * std::mem::size_of::<GrassVertex>()) as u64;
        let index_bytes = std::mem::size_of_val(field.indices()) as u64;
        check_buffer_size(device, "Grass Vertex Buffer", vertex_bytes)?;
        check_buffer_size(device, "Grass Index Buffer", index_bytes)?;

        let vertices = GrassVertex::interleave(field);
        let mesh = Mesh::new(device, "Grass", &vertices, field.indices());
        log::info!(
            "Uploaded grass field: {} blades, {:.1} MiB vertices, {:.1} MiB indices",
            field.blade_count(),
            vertex_bytes as f64 / (1024.0 * 1024.0),
            index_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(Self {
            mesh,
            blade_count: field.blade_count(),
            vertex_count: field.vertex_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::create_grass_bind_group_layout;

    /// Any adapter, no surface. `None` on machines without one.
    fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))?;
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default(), None)).ok()
    }

    #[test]
    fn grass_uniform_is_one_vec4() {
        assert_eq!(std::mem::size_of::<GrassUniform>(), 16);
    }

    #[test]
    fn material_time_is_writable_from_the_host() {
        let Some((device, queue)) = headless_device() else {
            return;
        };
        let layout = create_grass_bind_group_layout(&device);
        let texture = Texture::from_rgba(&device, &queue, &[255; 16], 2, 2, "Test Grass");
        let mut material = GrassMaterial::new(&device, &layout, &texture);
        assert_eq!(material.time(), 0.0);

        material.set_time(&queue, 12.5);
        assert_eq!(material.time(), 12.5);
        material.set_time(&queue, 3.0);
        assert_eq!(material.time(), 3.0);
    }
}
