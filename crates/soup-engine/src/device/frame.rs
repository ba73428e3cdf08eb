/// A single acquired frame.
///
/// Short-lived: the surface texture must be presented (or dropped, which
/// discards it) before the next one can be acquired.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
