use anyhow::{ensure, Result};
use wgpu::util::DeviceExt;

use super::{DrawCall, Vertex, VertexAttributeState};

/// GPU-resident, immutable copy of a vertex array plus its attribute state.
#[derive(Debug)]
pub struct GeometryBuffer {
    buffer: wgpu::Buffer,
    vertex_count: u32,
    attributes: VertexAttributeState,
}

impl GeometryBuffer {
    /// Uploads `vertices` once.
    ///
    /// An empty slice is rejected so the attribute state never points at an
    /// unpopulated buffer.
    pub fn upload(device: &wgpu::Device, vertices: &[Vertex]) -> Result<Self> {
        ensure!(!vertices.is_empty(), "cannot upload an empty vertex array");
        let vertex_count = u32::try_from(vertices.len())?;

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("soup vertex buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::debug!(
            "uploaded {vertex_count} vertices ({} bytes)",
            buffer.size()
        );

        Ok(Self {
            buffer,
            vertex_count,
            attributes: VertexAttributeState,
        })
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn attributes(&self) -> VertexAttributeState {
        self.attributes
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Draws every uploaded vertex as a triangle list.
    pub fn draw_call(&self) -> DrawCall {
        DrawCall::triangles(0, self.vertex_count)
    }
}
