//! Vertex types and layouts for rendering.

use bytemuck::{Pod, Zeroable};
use procgen::FieldBuffer;

/// Standard vertex with position, normal and UV coordinates (ground sphere).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Interleaved grass blade vertex. Must match `VertexInput` in grass.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GrassVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// Height gradient: black at the root, grey mid-blade, white at the tip.
    pub color: [f32; 3],
}

impl GrassVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GrassVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // UV
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // Height gradient
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }

    /// Pack the field's parallel attribute arrays into one vertex stream,
    /// adding smooth normals.
    pub fn interleave(field: &FieldBuffer) -> Vec<GrassVertex> {
        let normals = field.vertex_normals();
        field
            .positions()
            .chunks_exact(3)
            .zip(normals.chunks_exact(3))
            .zip(field.uvs().chunks_exact(2))
            .zip(field.colors().chunks_exact(3))
            .map(|(((position, normal), uv), color)| GrassVertex {
                position: [position[0], position[1], position[2]],
                normal: [normal[0], normal[1], normal[2]],
                uv: [uv[0], uv[1]],
                color: [color[0], color[1], color[2]],
            })
            .collect()
    }
}
