//! Render loop.
//!
//! The loop itself is driven by the window runtime; this module holds the
//! parts that decide what happens in an iteration:
//! - [`RenderLoop`]: lifecycle state and input handling
//! - [`FramePlan`]: the commands of one frame, built before anything touches the GPU
//! - [`Viewport`]: the region of the surface rendering maps into

mod color;
mod lifecycle;
mod plan;
mod viewport;

pub use color::Color;
pub use lifecycle::{LoopState, RenderLoop};
pub use plan::FramePlan;
pub use viewport::Viewport;
