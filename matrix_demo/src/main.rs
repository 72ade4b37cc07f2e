//! Digital rain demo
//!
//! Opens a window (or the desktop wallpaper) and runs the selected app until
//! the window closes or SIGINT/SIGTERM arrives.

mod cli;

use std::process::ExitCode;

use matrix_engine::matrix::log::LogSeverity;
use matrix_engine::matrix::surface::ShutdownFlag;
use matrix_engine::matrix::{Engine, Renderer};
use matrix_engine::{engine_error, engine_info, engine_warn};
use matrix_engine_renderer_gl::WindowSurface;

use crate::cli::{parse_args, ParseOutcome};

const SOURCE: &str = "matrix::demo";

fn register_signals(shutdown: &ShutdownFlag) {
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        if let Err(e) = signal_hook::flag::register(signal, shutdown.as_atomic()) {
            engine_warn!(SOURCE, "Cannot register signal {}: {}", signal, e);
        }
    }
}

fn main() -> ExitCode {
    let cli = match parse_args(std::env::args_os()) {
        ParseOutcome::Run(cli) => cli,
        ParseOutcome::Exit => return ExitCode::SUCCESS,
        ParseOutcome::Invalid => return ExitCode::from(1),
    };
    if cli.verbose {
        Engine::set_min_severity(LogSeverity::Debug);
    }

    let options = cli.to_options();
    engine_info!(SOURCE, "Starting '{}' ({})", options.app,
        if options.wallpaper_mode { "wallpaper" } else if options.fullscreen { "fullscreen" } else { "windowed" });

    let shutdown = ShutdownFlag::new();
    register_signals(&shutdown);

    let mut renderer = Renderer::new(WindowSurface::new(), options);
    if let Err(e) = renderer.initialize() {
        engine_error!(SOURCE, "Cannot initialize the renderer: {}", e);
        renderer.shutdown();
        return ExitCode::from(1);
    }

    let result = renderer.run(&shutdown);
    renderer.shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            engine_error!(SOURCE, "Renderer stopped: {}", e);
            ExitCode::from(1)
        }
    }
}
