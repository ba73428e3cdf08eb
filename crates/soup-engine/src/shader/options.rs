use super::DEFAULT_LOG_LIMIT;

/// What to do when a shader fails to compile or a program fails to link.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum DiagnosticPolicy {
    /// Log the diagnostic and keep going with the unusable program.
    /// The render loop still runs; it just has nothing to draw with.
    #[default]
    Continue,

    /// Treat an unusable program as a fatal startup failure.
    Abort,
}

/// Shader compilation/link settings.
#[derive(Debug, Clone)]
pub struct ShaderOptions {
    /// Upper bound, in bytes, for each diagnostic log.
    pub log_limit: usize,

    pub policy: DiagnosticPolicy,
}

impl Default for ShaderOptions {
    fn default() -> Self {
        Self {
            log_limit: DEFAULT_LOG_LIMIT,
            policy: DiagnosticPolicy::default(),
        }
    }
}
