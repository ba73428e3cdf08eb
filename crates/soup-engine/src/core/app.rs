use crate::error::StartupError;

use super::ctx::{FrameCtx, StartCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the program.
pub trait App {
    /// Called once, after the window and graphics context exist and before
    /// the first frame. An error aborts startup.
    fn on_start(&mut self, ctx: &mut StartCtx<'_, '_>) -> Result<(), StartupError>;

    /// Called once per loop iteration after input has been processed.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
