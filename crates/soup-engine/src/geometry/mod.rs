//! Vertex data and its GPU-side copy.
//!
//! Geometry is uploaded once and never modified. The attribute layout that
//! maps buffer bytes to shader inputs lives next to the buffer it describes.

mod buffer;
mod draw;
mod vertex;

pub use buffer::GeometryBuffer;
pub use draw::{DrawCall, PrimitiveMode};
pub use vertex::{Vertex, VertexAttributeState, TRIANGLE};
