mod app;
mod color;
mod config;
mod data;
mod describe;
mod error;
mod state;
mod ui;

use app::FlightExplorerApp;
use clap::Parser;
use config::Config;
use describe::{OpenAiClient, TextGenerator};
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();
    let config = Config::parse();
    log::info!("Using flight data from {}", config.data_dir.display());

    let generator: Option<Box<dyn TextGenerator>> = match OpenAiClient::new(&config.llm) {
        Ok(client) => Some(Box::new(client)),
        Err(e) => {
            log::error!("Text generation disabled, HTTP client failed to build: {e}");
            None
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Flight Data Explorer",
        options,
        Box::new(move |_cc| {
            let state = AppState::new(config.data_dir, generator);
            Ok(Box::new(FlightExplorerApp::new(state)))
        }),
    )
}
