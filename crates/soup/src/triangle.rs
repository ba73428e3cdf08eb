//! The triangle: two shader stages, one program, three vertices.

use soup_engine::core::{App, AppControl, FrameCtx, StartCtx};
use soup_engine::error::StartupError;
use soup_engine::geometry::{GeometryBuffer, VertexAttributeState, TRIANGLE};
use soup_engine::shader::{DiagnosticPolicy, Program, ShaderObject, ShaderOptions, ShaderStage};

pub const VERTEX_SHADER: &str = include_str!("shaders/triangle_vs.wgsl");
pub const FRAGMENT_SHADER: &str = include_str!("shaders/triangle_fs.wgsl");

/// GPU objects created at startup, used by every frame.
struct Scene {
    program: Program,
    geometry: GeometryBuffer,
}

pub struct TriangleApp {
    options: ShaderOptions,
    scene: Option<Scene>,
}

impl TriangleApp {
    pub fn new(options: ShaderOptions) -> Self {
        Self {
            options,
            scene: None,
        }
    }

    /// Compiles both stages with this app's options.
    pub fn compile_stages(&self) -> (ShaderObject, ShaderObject) {
        let vs = ShaderObject::compile_with(ShaderStage::Vertex, VERTEX_SHADER, &self.options);
        let fs = ShaderObject::compile_with(ShaderStage::Fragment, FRAGMENT_SHADER, &self.options);
        (vs, fs)
    }
}

impl App for TriangleApp {
    fn on_start(&mut self, ctx: &mut StartCtx<'_, '_>) -> Result<(), StartupError> {
        let (vs, fs) = self.compile_stages();

        let target = ctx.program_target(VertexAttributeState.layout());
        let program = Program::link(&target, vs, fs, &self.options);

        if !program.is_usable() && self.options.policy == DiagnosticPolicy::Abort {
            return Err(StartupError::Program(program.log().to_string()));
        }

        let geometry = GeometryBuffer::upload(ctx.gpu.device(), &TRIANGLE)
            .map_err(|e| StartupError::setup(&e))?;

        self.scene = Some(Scene { program, geometry });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        match self.scene.as_ref() {
            Some(scene) => ctx.render(&scene.program, &scene.geometry),
            None => AppControl::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soup_engine::geometry::DrawCall;
    use soup_engine::render::{Color, RenderLoop, Viewport};
    use soup_engine::shader::{link_stages, CompileStatus, LinkStatus, DEFAULT_LOG_LIMIT};

    #[test]
    fn builtin_shaders_compile_and_link_cleanly() {
        let app = TriangleApp::new(ShaderOptions::default());
        let (vs, fs) = app.compile_stages();
        assert_eq!(vs.status(), CompileStatus::Compiled);
        assert_eq!(fs.status(), CompileStatus::Compiled);
        assert!(vs.log().is_empty());
        assert!(fs.log().is_empty());

        let linked = link_stages(vs, fs, VertexAttributeState.attributes(), DEFAULT_LOG_LIMIT);
        assert_eq!(linked.status(), LinkStatus::Linked);
        assert!(linked.log().is_empty());
    }

    #[test]
    fn broken_vertex_shader_is_reported_not_fatal() {
        let broken = VERTEX_SHADER.replace("return", "retrun");
        let vs = ShaderObject::compile(ShaderStage::Vertex, &broken);
        assert_eq!(vs.status(), CompileStatus::Failed);
        assert!(!vs.log().is_empty());

        let fs = ShaderObject::compile(ShaderStage::Fragment, FRAGMENT_SHADER);
        let linked = link_stages(vs, fs, VertexAttributeState.attributes(), DEFAULT_LOG_LIMIT);
        assert_eq!(linked.status(), LinkStatus::Failed);
    }

    #[test]
    fn triangle_frame_draws_three_vertices() {
        let mut render_loop = RenderLoop::new();
        render_loop.start();

        let draw = DrawCall::triangles(0, TRIANGLE.len() as u32);
        let plan = render_loop
            .plan_frame(Color::MAGENTA, Viewport::covering(800, 600), true, draw)
            .expect("frame planned");
        let draw = plan.draw.expect("draw issued");
        assert_eq!(draw.vertex_count(), 3);
        assert_eq!(draw.vertices, 0..3);
    }
}
