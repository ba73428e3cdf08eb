use crate::geometry::DrawCall;

use super::{Color, Viewport};

/// Everything one loop iteration asks of the GPU, in order: clear, set the
/// viewport, then (if there is a usable program) bind and draw.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub clear: Color,
    pub viewport: Viewport,

    /// `None` when the program is unusable; the frame is still cleared and presented.
    pub draw: Option<DrawCall>,
}
