//! Application entry point for the bonsai viewer.
//!
//! Parses flags, validates them into [`Settings`], then either renders one
//! frame headless (`--once`) or hands off to [`Viewer`] inside eframe.

mod frame;
mod settings;
mod viewer;

use std::process::ExitCode;

use bonsai_core::rng;
use clap::Parser;
use settings::{Args, Settings};
use viewer::Viewer;

/// Window size used when no fixed resolution is given.
const DEFAULT_WINDOW: [f32; 2] = [1280.0, 760.0];

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = match Settings::from_args(&args) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if settings.once {
        render_once(&settings);
        return ExitCode::SUCCESS;
    }

    log::info!("starting viewer (seed {})", settings.seed);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("bonsai")
            .with_inner_size(DEFAULT_WINDOW),
        ..Default::default()
    };
    let result = eframe::run_native(
        "bonsai",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(settings)))),
    );

    match result {
        Ok(()) => {
            log::info!("viewer closed");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("viewer failed: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Renders a single frame without a window and logs what it drew.
fn render_once(settings: &Settings) {
    let defaults = bonsai_core::config::TreeParams::default();
    let size = settings
        .fixed_size
        .unwrap_or([defaults.width, defaults.height]);
    let mut rng = rng::seeded(settings.seed);
    let frame = frame::render(settings, size, &mut rng);
    log::info!(
        "rendered {}x{}: {} branches, {} pixels painted",
        frame.size[0],
        frame.size[1],
        frame.branches,
        frame.painted
    );
}
