//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single Window, and wires them to the
//! GPU context and the render loop.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
