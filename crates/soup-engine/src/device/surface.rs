use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// Picks the surface format: an sRGB format when preferred and offered,
/// otherwise the first supported one.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }

    formats.first().copied()
}

pub(crate) fn choose_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Surface extent for a drawable size, or `None` while it has no area.
///
/// wgpu cannot configure a 0x0 surface.
pub(crate) fn surface_extent(size: PhysicalSize<u32>) -> Option<(u32, u32)> {
    (size.width > 0 && size.height > 0).then_some((size.width, size.height))
}

/// Applies a new drawable size.
///
/// The size is always recorded; the surface is only reconfigured when it has
/// an area, so rendering stays suspended while the window is minimized.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    *size = new_size;

    let Some((width, height)) = surface_extent(new_size) else {
        return;
    };

    config.width = width;
    config.height = height;
    surface.configure(device, config);
}

pub(crate) fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Redraw,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Exit,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::Skip,
    }
}

/// Classifies `err`, reconfiguring the surface when it was lost or outdated.
pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: &wgpu::SurfaceError,
) -> SurfaceErrorAction {
    let action = classify_surface_error(err);
    if action == SurfaceErrorAction::Redraw && surface_extent(size).is_some() {
        surface.configure(device, config);
    }
    action
}
