use bytemuck::{Pod, Zeroable};

/// A single vertex: position only, in normalized device coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }
}

/// The one triangle the program draws.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex::new(-0.5, -0.5, 0.0),
    Vertex::new(0.5, -0.5, 0.0),
    Vertex::new(0.0, 0.5, 0.0),
];

/// How vertex buffer bytes map to shader inputs.
///
/// Location 0 holds 3 tightly packed `f32`s: stride 12 bytes, offset 0.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexAttributeState;

impl VertexAttributeState {
    pub const POSITION_LOCATION: u32 = 0;

    const ATTRS: [wgpu::VertexAttribute; 1] =
        wgpu::vertex_attr_array![VertexAttributeState::POSITION_LOCATION => Float32x3];

    pub fn stride(self) -> wgpu::BufferAddress {
        std::mem::size_of::<Vertex>() as wgpu::BufferAddress
    }

    pub fn attributes(self) -> &'static [wgpu::VertexAttribute] {
        &Self::ATTRS
    }

    pub fn layout(self) -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: self.attributes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_matches_fixed_vertices() {
        let flat: &[f32] = bytemuck::cast_slice(&TRIANGLE);
        assert_eq!(
            flat,
            &[-0.5, -0.5, 0.0, 0.5, -0.5, 0.0, 0.0, 0.5, 0.0]
        );
    }

    #[test]
    fn vertex_is_three_packed_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 3 * std::mem::size_of::<f32>());
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&TRIANGLE).len(), 36);
    }

    #[test]
    fn attribute_layout_is_location_zero_float3() {
        let layout = VertexAttributeState.layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 1);

        let attr = layout.attributes[0];
        assert_eq!(attr.shader_location, 0);
        assert_eq!(attr.offset, 0);
        assert_eq!(attr.format, wgpu::VertexFormat::Float32x3);
    }
}
