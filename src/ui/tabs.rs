use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, TextEdit, Ui};

use crate::describe::Subject;
use crate::state::{AppState, THRESHOLD_RANGE_KM, TOP_N_RANGE, Tab, describe_error_message};
use crate::ui::{map, plot, tables};

const WARNING: Color32 = Color32::from_rgb(200, 140, 0);
const SUCCESS: Color32 = Color32::from_rgb(46, 160, 67);

/// Render the body of the active tab.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    if state.tab == Tab::ApiSetup {
        api_setup(ui, state);
        return;
    }
    if state.tab.is_locked() && state.api_key.is_none() {
        ui.colored_label(
            WARNING,
            "Please enter your OpenAI API key in the API Setup tab first.",
        );
        return;
    }
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No flight data loaded  (File → Open data folder…)");
        });
        return;
    }

    match state.tab {
        Tab::ApiSetup => {}
        Tab::Overview => overview(ui, state),
        Tab::AirportsMap => airports_map(ui, state),
        Tab::AirportFlights => airport_flights(ui, state),
        Tab::TopModels => top_models(ui, state),
        Tab::Distances => distances(ui, state),
        Tab::CountryEmissions => country_emissions(ui, state),
        Tab::AircraftExplorer => aircraft_explorer(ui, state),
        Tab::AirportExplorer => airport_explorer(ui, state),
    }
}

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

/// Labelled single-choice combo box.
fn select_one<S: AsRef<str>>(
    ui: &mut Ui,
    id: &str,
    label: &str,
    selected: &mut Option<String>,
    options: &[S],
) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(selected.as_deref().unwrap_or("—"))
            .height(320.0)
            .show_ui(ui, |ui: &mut Ui| {
                for option in options {
                    let option = option.as_ref();
                    if ui
                        .selectable_label(selected.as_deref() == Some(option), option)
                        .clicked()
                    {
                        *selected = Some(option.to_string());
                    }
                }
            });
    });
}

fn error_label(ui: &mut Ui, message: impl Into<String>) {
    ui.label(RichText::new(message.into()).color(Color32::RED));
}

// ---------------------------------------------------------------------------
// API setup
// ---------------------------------------------------------------------------

fn api_setup(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔐 Enter Your OpenAI API Key");
    ui.label("This app uses OpenAI to retrieve information about aircraft and airports.");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Please enter your");
        ui.hyperlink_to("OpenAI API key", "https://platform.openai.com/account/api-keys");
        ui.label("below to use 🔒 features.");
    });
    ui.add_space(8.0);

    let response = ui.add(
        TextEdit::singleline(&mut state.api_key_input)
            .password(true)
            .hint_text("OpenAI API Key"),
    );
    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
    if ui.button("Save").clicked() || submitted {
        state.submit_api_key();
    }

    if state.api_key.is_some() {
        ui.colored_label(SUCCESS, "API key saved for this session.");
    } else {
        ui.colored_label(WARNING, "You must enter an API key to use certain features.");
    }
}

// ---------------------------------------------------------------------------
// Dataset tabs
// ---------------------------------------------------------------------------

fn overview(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };
    ui.heading("📊 Dataset Overview");
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            tables::overview(ui, &dataset.preview(5));
        });
}

fn airports_map(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };
    ui.heading("🗺️ Airports in a Country");
    let countries: Vec<&String> = dataset.countries().iter().collect();
    select_one(ui, "airport_map_country", "Select a country", &mut state.selections.map_country, &countries);

    let Some(country) = state.selections.map_country.as_deref() else {
        return;
    };
    match dataset.airports_map(country) {
        Ok(m) if m.markers.is_empty() => {
            ui.label(format!("No airports recorded for {country}."));
        }
        Ok(m) => {
            ui.label(format!("{} airports", m.markers.len()));
            map::flight_map(ui, "airports_map", &m, Color32::GRAY);
        }
        Err(e) => error_label(ui, e.to_string()),
    }
}

fn airport_flights(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };
    ui.heading("🛫 Flights from an Airport");
    select_one(
        ui,
        "airport_flights_code",
        "Choose IATA Airport Code",
        &mut state.selections.flights_code,
        &dataset.airport_codes(),
    );
    ui.checkbox(&mut state.selections.flights_internal, "Only internal flights?");

    let Some(code) = state.selections.flights_code.as_deref() else {
        return;
    };
    match dataset.flights_from_airport(code, state.selections.flights_internal) {
        Ok(Some(m)) => {
            let destinations: BTreeSet<&str> = m.destinations().collect();
            let longest = m
                .segments
                .iter()
                .filter_map(|s| s.distance_km)
                .fold(0.0, f64::max);
            ui.label(format!(
                "{} routes to {} airports, longest {longest:.0} km",
                m.segments.len(),
                destinations.len()
            ));
            map::flight_map(ui, "airport_flights_map", &m, Color32::from_rgb(30, 90, 200));
        }
        Ok(None) => {
            ui.label(format!("No flights found from {code}."));
        }
        Err(e) => error_label(ui, e.to_string()),
    }
}

fn top_models(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };
    ui.heading("🛩️ Top Airplane Models");

    egui::SidePanel::left("top_models_controls")
        .default_width(220.0)
        .resizable(true)
        .show_inside(ui, |ui: &mut Ui| {
            ui.add(egui::Slider::new(&mut state.selections.top_n, TOP_N_RANGE).text("Number of top models"));
            ui.separator();
            ui.label("Optionally filter by country");
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("None").clicked() {
                    state.selections.top_countries.clear();
                }
                ui.label(format!("{} selected", state.selections.top_countries.len()));
            });
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    for country in dataset.countries() {
                        let mut checked = state.selections.top_countries.contains(country);
                        if ui.checkbox(&mut checked, country).changed() {
                            if checked {
                                state.selections.top_countries.insert(country.clone());
                            } else {
                                state.selections.top_countries.remove(country);
                            }
                        }
                    }
                });
        });

    match dataset.top_airplane_models(Some(&state.selections.top_countries), state.selections.top_n) {
        Ok(ranked) if ranked.is_empty() => {
            ui.label("No routes with a known airplane model for this selection.");
        }
        Ok(ranked) => plot::top_models_chart(ui, &ranked),
        Err(e) => error_label(ui, e.to_string()),
    }
}

fn distances(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };
    ui.heading("📏 Distribution of Flight Distances");
    let histogram = dataset.distance_distribution();
    ui.label(format!(
        "{} routes in {:.0} km buckets; {} routes without a distance are not shown.",
        histogram.total(),
        histogram.bucket_width_km,
        histogram.missing
    ));
    plot::distance_histogram(ui, &histogram);
}

fn country_emissions(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };
    ui.heading("🌍 Country Flight Map & CO₂ Emissions");
    let countries: Vec<&String> = dataset.countries().iter().collect();
    select_one(ui, "co2_country", "Select a country", &mut state.selections.co2_country, &countries);
    ui.checkbox(&mut state.selections.co2_internal, "Only internal flights?");
    ui.add(
        egui::Slider::new(&mut state.selections.co2_threshold_km, THRESHOLD_RANGE_KM)
            .step_by(10.0)
            .text("Short-haul threshold (km)"),
    );

    let Some(country) = state.selections.co2_country.as_deref() else {
        return;
    };
    let result = match dataset.country_flights_and_emissions(
        country,
        state.selections.co2_threshold_km,
        state.selections.co2_internal,
    ) {
        Ok(result) => result,
        Err(e) => {
            error_label(ui, e.to_string());
            return;
        }
    };
    if result.map.segments.is_empty() {
        ui.label(format!("No flights found from {country}."));
        return;
    }

    egui::Grid::new("co2_totals").striped(true).show(ui, |ui: &mut Ui| {
        ui.strong("");
        ui.strong("Routes");
        ui.strong("Distance (km)");
        ui.strong("CO₂ per passenger (kg)");
        ui.end_row();
        for (label, totals) in [("Short-haul", &result.short_haul), ("Long-haul", &result.long_haul)] {
            ui.label(label);
            ui.label(totals.routes.to_string());
            ui.label(format!("{:.0}", totals.distance_km));
            ui.label(format!("{:.0}", totals.kg_co2));
            ui.end_row();
        }
        ui.label("Total");
        ui.label(result.routes.len().to_string());
        ui.label("");
        ui.label(format!("{:.0}", result.total_kg_co2()));
        ui.end_row();
    });
    if result.unclassified > 0 {
        ui.label(format!("{} routes without a distance were not classified.", result.unclassified));
    }

    egui::CollapsingHeader::new(format!("Per-route estimates ({})", result.routes.len()))
        .id_salt("co2_routes")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ScrollArea::vertical().max_height(200.0).show(ui, |ui: &mut Ui| {
                egui::Grid::new("co2_route_grid").striped(true).show(ui, |ui: &mut Ui| {
                    for route in &result.routes {
                        ui.label(format!("{} → {}", route.source, route.destination));
                        ui.label(format!("{:.0} km", route.distance_km));
                        ui.label(route.haul.to_string());
                        ui.label(format!("{:.1} kg", route.kg_co2));
                        ui.end_row();
                    }
                });
            });
        });
    map::flight_map(ui, "co2_map", &result.map, Color32::GRAY);
}

// ---------------------------------------------------------------------------
// Language-model explorers
// ---------------------------------------------------------------------------

fn description(ui: &mut Ui, state: &mut AppState, subject: Subject) {
    if ui.button("Describe").clicked() {
        state.describe(subject.clone());
    }
    ui.separator();
    match state.descriptions.get(&subject) {
        Some(Ok(text)) => {
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                ui.label(text);
            });
        }
        Some(Err(e)) => error_label(ui, describe_error_message(e)),
        None => {
            ui.label(format!("Press Describe to fetch information about the {subject}."));
        }
    }
}

fn aircraft_explorer(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };
    ui.heading("🛫 Aircraft Explorer");
    select_one(ui, "aircraft", "Choose an aircraft", &mut state.selections.aircraft, &dataset.aircraft_models());
    if let Some(model) = state.selections.aircraft.clone() {
        description(ui, state, Subject::Aircraft(model));
    }
}

fn airport_explorer(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };
    ui.heading("🏙️ Airport Explorer");
    select_one(ui, "airport", "Choose an airport", &mut state.selections.airport, &dataset.airport_names());
    if let Some(name) = state.selections.airport.clone() {
        description(ui, state, Subject::Airport(name));
    }
}
