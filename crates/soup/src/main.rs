mod triangle;

use winit::dpi::LogicalSize;

use soup_engine::device::GpuInit;
use soup_engine::error;
use soup_engine::logging::{init_logging, LoggingConfig};
use soup_engine::render::Color;
use soup_engine::shader::ShaderOptions;
use soup_engine::window::{Runtime, RuntimeConfig};

use triangle::TriangleApp;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const TITLE: &str = "soup";

fn main() {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: TITLE.to_string(),
        initial_size: LogicalSize::new(WIDTH as f64, HEIGHT as f64),
        clear_color: Color::MAGENTA,
        ..RuntimeConfig::default()
    };

    let result = Runtime::run(
        config,
        GpuInit::default(),
        TriangleApp::new(ShaderOptions::default()),
    );

    if let Err(e) = &result {
        log::error!("{e}");
    }

    std::process::exit(error::exit_code(&result));
}
