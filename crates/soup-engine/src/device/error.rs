/// What the render loop does with an iteration whose frame could not be acquired.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was lost or outdated and has been configured again; ask
    /// the window for another redraw.
    Redraw,
    /// Nothing was drawn this iteration; the next one tries again.
    Skip,
    /// The device ran out of memory; the loop closes.
    Exit,
}
