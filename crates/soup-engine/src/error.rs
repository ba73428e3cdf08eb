//! Process-level failures and their exit statuses.

use thiserror::Error;

/// Failure that prevents the render loop from starting.
///
/// All variants are fatal and are never retried.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The OS window (or the event loop that owns it) could not be created.
    #[error("failed to create window: {0}")]
    Window(String),

    /// The graphics context could not be initialized (no adapter, no device,
    /// surface creation failed).
    #[error("failed to initialize graphics context: {0}")]
    Graphics(String),

    /// The shader program is unusable and the diagnostic policy treats that as fatal.
    #[error("shader program is unusable: {0}")]
    Program(String),

    /// Application-specific setup failed.
    #[error("application setup failed: {0}")]
    Setup(String),
}

impl StartupError {
    /// Exit status for any startup failure.
    pub const EXIT_CODE: i32 = -1;

    /// Wraps an `anyhow` chain, keeping every context layer in the message.
    pub fn graphics(err: &anyhow::Error) -> Self {
        Self::Graphics(format!("{err:#}"))
    }

    pub fn setup(err: &anyhow::Error) -> Self {
        Self::Setup(format!("{err:#}"))
    }
}

/// Outcome of `Runtime::run` when it does not terminate normally.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error("event loop terminated with error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl RunError {
    /// Exit status for the process.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Startup(_) => StartupError::EXIT_CODE,
            RunError::EventLoop(_) => 1,
        }
    }
}

/// Maps the result of a run to the process exit status.
pub fn exit_code(result: &Result<(), RunError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => e.exit_code(),
    }
}
