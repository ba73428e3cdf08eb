use std::fmt;

use crate::error::StartupError;
use crate::geometry::DrawCall;
use crate::input::{InputState, Key};

use super::{Color, FramePlan, Viewport};

/// Lifecycle of the render loop.
///
/// ```text
/// Starting ──start──▶ Running ──close requested──▶ Closing
///    │
///    └──startup failure──▶ Failed
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    /// Window, context and GPU objects are being created.
    Starting,
    Running,
    /// Close was requested; no further frames are rendered.
    Closing,
    /// Startup failed; the loop never ran.
    Failed,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoopState::Starting => "starting",
            LoopState::Running => "running",
            LoopState::Closing => "closing",
            LoopState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Render loop state machine.
///
/// Does not pace frames or measure time; one iteration per redraw.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    close_key: Key,
    frames: u64,
    warned_unusable_program: bool,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::with_close_key(Key::Escape)
    }

    pub fn with_close_key(close_key: Key) -> Self {
        Self {
            state: LoopState::Starting,
            close_key,
            frames: 0,
            warned_unusable_program: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Number of frames planned so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// `Starting -> Running`. Returns false from any other state.
    pub fn start(&mut self) -> bool {
        if self.state != LoopState::Starting {
            return false;
        }
        self.state = LoopState::Running;
        log::debug!("render loop running");
        true
    }

    /// `Starting -> Failed`. A loop that already ran is left alone.
    pub fn fail(&mut self, err: &StartupError) {
        if self.state == LoopState::Starting {
            log::debug!("render loop never started: {err}");
            self.state = LoopState::Failed;
        }
    }

    /// Requests loop termination (window manager close or close key).
    pub fn request_close(&mut self) {
        match self.state {
            LoopState::Starting | LoopState::Running => {
                log::debug!("close requested after {} frames", self.frames);
                self.state = LoopState::Closing;
            }
            LoopState::Closing | LoopState::Failed => {}
        }
    }

    /// First step of an iteration: polls the close key.
    pub fn process_input(&mut self, input: &InputState) -> LoopState {
        if self.is_running() && input.key_down(self.close_key) {
            log::info!("{} pressed, closing", self.close_key);
            self.request_close();
        }
        self.state
    }

    /// Builds the commands for one frame.
    ///
    /// Returns `None` when not running or when the viewport has no area.
    /// Program validity is not a precondition: an unusable program drops the
    /// draw from the plan (logged once) and the frame is still cleared.
    pub fn plan_frame(
        &mut self,
        clear: Color,
        viewport: Viewport,
        program_usable: bool,
        draw: DrawCall,
    ) -> Option<FramePlan> {
        if !self.is_running() || viewport.is_empty() {
            return None;
        }

        let draw = if program_usable {
            Some(draw)
        } else {
            if !self.warned_unusable_program {
                log::debug!("program is unusable; frames are cleared without drawing");
                self.warned_unusable_program = true;
            }
            None
        };

        self.frames = self.frames.wrapping_add(1);

        Some(FramePlan {
            clear,
            viewport,
            draw,
        })
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{PrimitiveMode, TRIANGLE};
    use crate::input::{InputEvent, KeyState};

    fn running() -> RenderLoop {
        let mut rl = RenderLoop::new();
        assert!(rl.start());
        rl
    }

    fn press(input: &mut InputState, key: Key) {
        input.apply_event(&InputEvent::Key {
            key,
            state: KeyState::Pressed,
            repeat: false,
        });
    }

    fn triangle_draw() -> DrawCall {
        DrawCall::triangles(0, TRIANGLE.len() as u32)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn starts_in_starting_state() {
        let rl = RenderLoop::default();
        assert_eq!(rl.state(), LoopState::Starting);
        assert!(!rl.is_running());
    }

    #[test]
    fn start_only_from_starting() {
        let mut rl = running();
        assert!(!rl.start());
        rl.request_close();
        assert!(!rl.start());
        assert_eq!(rl.state(), LoopState::Closing);
    }

    #[test]
    fn startup_failure_never_runs() {
        let mut rl = RenderLoop::new();
        rl.fail(&StartupError::Window("no display".into()));
        assert_eq!(rl.state(), LoopState::Failed);
        assert!(!rl.start());

        let plan = rl.plan_frame(Color::MAGENTA, Viewport::covering(800, 600), true, triangle_draw());
        assert!(plan.is_none());
        assert_eq!(rl.frames(), 0);
    }

    #[test]
    fn window_close_moves_to_closing() {
        let mut rl = running();
        rl.request_close();
        assert_eq!(rl.state(), LoopState::Closing);
    }

    // ── input ─────────────────────────────────────────────────────────────

    #[test]
    fn escape_closes_within_one_iteration() {
        let mut rl = running();
        let mut input = InputState::default();

        assert_eq!(rl.process_input(&input), LoopState::Running);

        press(&mut input, Key::Escape);
        assert_eq!(rl.process_input(&input), LoopState::Closing);

        let plan = rl.plan_frame(Color::MAGENTA, Viewport::covering(800, 600), true, triangle_draw());
        assert!(plan.is_none());
    }

    #[test]
    fn other_keys_do_not_close() {
        let mut rl = running();
        let mut input = InputState::default();
        press(&mut input, Key::Other(16));
        assert_eq!(rl.process_input(&input), LoopState::Running);
    }

    #[test]
    fn custom_close_key() {
        let mut rl = RenderLoop::with_close_key(Key::Other(7));
        rl.start();
        let mut input = InputState::default();
        press(&mut input, Key::Escape);
        assert_eq!(rl.process_input(&input), LoopState::Running);
        press(&mut input, Key::Other(7));
        assert_eq!(rl.process_input(&input), LoopState::Closing);
    }

    // ── frame plan ────────────────────────────────────────────────────────

    #[test]
    fn triangle_plan_draws_three_vertices_as_triangles() {
        let mut rl = running();
        let plan = rl
            .plan_frame(Color::MAGENTA, Viewport::covering(800, 600), true, triangle_draw())
            .expect("running loop plans a frame");

        assert_eq!(plan.clear, Color::MAGENTA);
        assert_eq!(plan.viewport, Viewport::covering(800, 600));

        let draw = plan.draw.expect("usable program draws");
        assert_eq!(draw.mode, PrimitiveMode::Triangles);
        assert_eq!(draw.mode.topology(), wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(draw.vertices, 0..3);
        assert_eq!(draw.vertex_count(), 3);
        assert_eq!(rl.frames(), 1);
    }

    #[test]
    fn unusable_program_still_clears() {
        let mut rl = running();
        for _ in 0..2 {
            let plan = rl
                .plan_frame(Color::MAGENTA, Viewport::covering(800, 600), false, triangle_draw())
                .expect("loop keeps running with an unusable program");
            assert_eq!(plan.clear, Color::MAGENTA);
            assert!(plan.draw.is_none());
        }
        assert_eq!(rl.frames(), 2);
    }

    #[test]
    fn empty_viewport_skips_frame() {
        let mut rl = running();
        let plan = rl.plan_frame(Color::MAGENTA, Viewport::covering(0, 0), true, triangle_draw());
        assert!(plan.is_none());
        assert!(rl.is_running());
    }
}
