//! GPU context: the graphics half of the window/context provider.
//!
//! Responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating and configuring the Surface bound to the window
//! - acquiring frames and presenting them

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
