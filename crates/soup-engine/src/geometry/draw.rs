use std::ops::Range;

/// How vertices are assembled into primitives.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrimitiveMode {
    Triangles,
}

impl PrimitiveMode {
    pub fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveMode::Triangles => wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

/// A non-indexed draw request.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub mode: PrimitiveMode,
    pub vertices: Range<u32>,
}

impl DrawCall {
    pub fn triangles(first: u32, count: u32) -> Self {
        Self {
            mode: PrimitiveMode::Triangles,
            vertices: first..first + count,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.end - self.vertices.start
    }
}
