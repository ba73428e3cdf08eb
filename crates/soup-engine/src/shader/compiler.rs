use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::{DiagnosticLog, ShaderOptions, ShaderStage};

/// Compile status of a shader object.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CompileStatus {
    Compiled,
    Failed,
}

/// One compiled (or failed) program stage.
///
/// A failed object is inert: it carries its diagnostic log and can still be
/// handed to the linker, which reports it as a link failure.
#[derive(Debug)]
pub struct ShaderObject {
    stage: ShaderStage,
    status: CompileStatus,
    log: DiagnosticLog,
    source: String,

    /// Validated IR, present when compiled.
    module: Option<naga::Module>,
    entry_point: Option<String>,
}

impl ShaderObject {
    /// Compiles `source` for `stage` with default options.
    pub fn compile(stage: ShaderStage, source: &str) -> Self {
        Self::compile_with(stage, source, &ShaderOptions::default())
    }

    /// Compiles `source` for `stage`.
    ///
    /// Never panics on bad input. Failures are logged at error level and
    /// recorded in the object's diagnostic log.
    pub fn compile_with(stage: ShaderStage, source: &str, options: &ShaderOptions) -> Self {
        let mut obj = Self {
            stage,
            status: CompileStatus::Failed,
            log: DiagnosticLog::with_limit(options.log_limit),
            source: source.to_owned(),
            module: None,
            entry_point: None,
        };

        match front_end(stage, source) {
            Ok((module, entry_point)) => {
                log::debug!("{stage} shader compiled (entry point `{entry_point}`)");
                obj.status = CompileStatus::Compiled;
                obj.module = Some(module);
                obj.entry_point = Some(entry_point);
            }
            Err(diagnostic) => {
                obj.log.push(&diagnostic);
                log::error!("{stage} shader failed to compile\n{}", obj.log);
            }
        }

        obj
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn status(&self) -> CompileStatus {
        self.status
    }

    pub fn is_compiled(&self) -> bool {
        self.status == CompileStatus::Compiled
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    /// Name of the entry point used for this stage, when compiled.
    pub fn entry_point(&self) -> Option<&str> {
        self.entry_point.as_deref()
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    /// The validated module and the entry point for this stage.
    pub(crate) fn entry(&self) -> Option<(&naga::Module, &naga::EntryPoint)> {
        let module = self.module.as_ref()?;
        let name = self.entry_point.as_deref()?;
        let ep = module
            .entry_points
            .iter()
            .find(|ep| ep.name == name && ep.stage == self.stage.to_naga())?;
        Some((module, ep))
    }
}

/// Parses and validates WGSL, then picks the first entry point of `stage`.
///
/// Errors are rendered against the source so they carry line/column context.
fn front_end(stage: ShaderStage, source: &str) -> Result<(naga::Module, String), String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| e.emit_to_string(source))?;

    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage.to_naga())
        .map(|ep| ep.name.clone())
        .ok_or_else(|| format!("error: no {} entry point in {stage} shader source", stage.attribute()))?;

    Ok((module, entry_point))
}
