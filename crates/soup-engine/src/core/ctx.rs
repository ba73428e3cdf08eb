use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::geometry::GeometryBuffer;
use crate::input::InputState;
use crate::render::{Color, FramePlan, RenderLoop, Viewport};
use crate::shader::{Program, ProgramTarget};

use super::app::AppControl;

/// Context passed to `App::on_start`.
pub struct StartCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a Gpu<'w>,
}

impl<'a, 'w> StartCtx<'a, 'w> {
    /// Link target for programs drawn into this window's surface.
    pub fn program_target(&self, vertex_layout: wgpu::VertexBufferLayout<'a>) -> ProgramTarget<'a> {
        let gpu: &'a Gpu<'w> = self.gpu;
        ProgramTarget {
            device: gpu.device(),
            color_format: gpu.surface_format(),
            vertex_layout,
        }
    }
}

/// Per-frame context passed to `App::on_frame`.
///
/// GPU binding state is not global: the program and geometry to draw with are
/// passed to [`FrameCtx::render`] explicitly, every frame.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub viewport: Viewport,
    pub clear: Color,
    pub render_loop: &'a mut RenderLoop,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Clears, binds `program` and `geometry`, draws, presents.
    pub fn render(&mut self, program: &Program, geometry: &GeometryBuffer) -> AppControl {
        let size = self.gpu.size();
        let viewport = self.viewport.clamped_to(size.width, size.height);

        let Some(plan) = self.render_loop.plan_frame(
            self.clear,
            viewport,
            program.is_usable(),
            geometry.draw_call(),
        ) else {
            return AppControl::Continue;
        };

        self.submit(&plan, program, geometry)
    }

    fn submit(&mut self, plan: &FramePlan, program: &Program, geometry: &GeometryBuffer) -> AppControl {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(&err) {
                    SurfaceErrorAction::Redraw => {
                        log::debug!("surface reconfigured after: {err}");
                        self.window.request_redraw();
                        AppControl::Continue
                    }
                    SurfaceErrorAction::Skip => {
                        log::debug!("frame skipped: {err}");
                        AppControl::Continue
                    }
                    SurfaceErrorAction::Exit => {
                        log::error!("cannot acquire a frame: {err}");
                        AppControl::Exit
                    }
                };
            }
        };

        // Pass is dropped before the encoder is moved into present().
        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("soup frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(plan.clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let (x, y, w, h, near, far) = plan.viewport.to_pass_args();
            rpass.set_viewport(x, y, w, h, near, far);

            if let (Some(draw), Some(pipeline)) = (&plan.draw, program.pipeline()) {
                rpass.set_pipeline(pipeline);
                rpass.set_vertex_buffer(0, geometry.buffer().slice(..));
                rpass.draw(draw.vertices.clone(), 0..1);
            }
        }

        self.window.pre_present_notify();
        self.gpu.present(frame);

        AppControl::Continue
    }
}
