use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "soup_engine=debug,wgpu=warn").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Call it first thing in `main` so that shader
/// diagnostics emitted during startup are visible.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => match std::env::var("RUST_LOG") {
                Ok(filter) => {
                    builder.parse_filters(&filter);
                }
                // wgpu is chatty at info; keep it to warnings unless asked.
                Err(_) => {
                    builder
                        .filter_level(log::LevelFilter::Info)
                        .filter_module("wgpu_core", log::LevelFilter::Warn)
                        .filter_module("wgpu_hal", log::LevelFilter::Warn)
                        .filter_module("naga", log::LevelFilter::Warn);
                }
            },
        }

        builder.write_style(config.write_style);

        // Another logger may already be installed by the host process.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}
