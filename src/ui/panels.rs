use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        match &state.dataset {
            Some(ds) => {
                ui.label(format!(
                    "{} airlines, {} airplanes, {} airports, {} routes",
                    ds.airlines.len(),
                    ds.airplanes.len(),
                    ds.airports.len(),
                    ds.routes.len()
                ));
            }
            None => {
                ui.label(format!("No data loaded from {}", state.store.data_dir().display()));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Tab strip
// ---------------------------------------------------------------------------

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.label());
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open flight data folder")
        .set_directory(state.store.data_dir())
        .pick_folder();

    if let Some(path) = folder {
        log::info!("Switching data folder to {}", path.display());
        state.open_data_dir(path);
    }
}
