//! Textured ground sphere under the grass.

use crate::mesh::{Mesh, MeshData};
use crate::texture::Texture;

pub struct Ground {
    pub mesh: Mesh,
    bind_group: wgpu::BindGroup,
}

impl Ground {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        radius: f32,
        segments: u32,
        rings: u32,
        texture: &Texture,
    ) -> Self {
        let mesh = MeshData::uv_sphere(radius, segments, rings).upload(device, "Ground");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Ground Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        Self { mesh, bind_group }
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
