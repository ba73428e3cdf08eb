//! Shader objects and program linking.
//!
//! Mirrors the classic two-step model: each stage is compiled on its own into
//! a [`ShaderObject`] carrying a status and a diagnostic log, then exactly one
//! vertex and one fragment object are linked into a [`Program`].
//!
//! Compilation runs the naga WGSL front end and validator on the CPU. The GPU
//! side (shader modules + render pipeline) is only created once the stages
//! have linked.

mod compiler;
mod diagnostic;
mod linker;
mod options;
mod stage;

pub use compiler::{CompileStatus, ShaderObject};
pub use diagnostic::{DiagnosticLog, DEFAULT_LOG_LIMIT};
pub use linker::{link_stages, LinkStatus, LinkedStages, Program, ProgramTarget};
pub use options::{DiagnosticPolicy, ShaderOptions};
pub use stage::ShaderStage;
