//! Core engine-facing contracts.
//!
//! Defines the interface between the window runtime and the application:
//! a one-time setup hook and a per-frame hook with an explicit frame context.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, StartCtx};
