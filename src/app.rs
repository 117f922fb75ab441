use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FlightExplorerApp {
    pub state: AppState,
}

impl FlightExplorerApp {
    /// Loads the dataset once up front; the store keeps it for later frames.
    pub fn new(mut state: AppState) -> Self {
        state.load_dataset();
        Self { state }
    }
}

impl eframe::App for FlightExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Tab strip ----
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            panels::tab_bar(ui, &mut self.state);
        });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            tabs::show(ui, &mut self.state);
        });
    }
}
