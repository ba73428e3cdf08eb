//! soup engine crate.
//!
//! Window runtime, GPU context and the small set of GPU objects needed to put a
//! triangle on screen: shader objects, a linked program and a vertex buffer.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod error;
pub mod logging;
pub mod geometry;
pub mod render;
pub mod shader;
