use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::query::TablePreview;

fn optional(value: Option<&str>) -> String {
    value.unwrap_or("–").to_string()
}

/// Striped, fixed-height table with one header row.
fn preview_table(ui: &mut Ui, id: &str, headers: &[&str], rows: Vec<Vec<String>>) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(60.0), headers.len())
            .header(20.0, |mut header| {
                for h in headers {
                    header.col(|ui| {
                        ui.strong(*h);
                    });
                }
            })
            .body(|mut body| {
                for row in &rows {
                    body.row(18.0, |mut table_row| {
                        for cell in row {
                            table_row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}

/// Overview tab: the leading rows of every table.
pub fn overview(ui: &mut Ui, preview: &TablePreview<'_>) {
    ui.heading("Airlines");
    preview_table(
        ui,
        "airlines_table",
        &["ID", "Name", "Country", "Active"],
        preview
            .airlines
            .iter()
            .map(|a| {
                vec![
                    a.id.to_string(),
                    a.name.clone(),
                    a.country.clone(),
                    if a.active { "Y" } else { "N" }.to_string(),
                ]
            })
            .collect(),
    );

    ui.add_space(8.0);
    ui.heading("Airplanes");
    preview_table(
        ui,
        "airplanes_table",
        &["Name", "IATA", "ICAO", "Manufacturer"],
        preview
            .airplanes
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    optional(p.iata.as_deref()),
                    optional(p.icao.as_deref()),
                    p.manufacturer.clone(),
                ]
            })
            .collect(),
    );

    ui.add_space(8.0);
    ui.heading("Airports");
    preview_table(
        ui,
        "airports_table",
        &["ID", "Name", "City", "Country", "IATA", "ICAO", "Latitude", "Longitude"],
        preview
            .airports
            .iter()
            .map(|a| {
                vec![
                    a.id.map(|id| id.to_string()).unwrap_or_else(|| "–".to_string()),
                    a.name.clone(),
                    a.city.clone(),
                    a.country.clone(),
                    optional(a.iata.as_deref()),
                    optional(a.icao.as_deref()),
                    format!("{:.4}", a.latitude),
                    format!("{:.4}", a.longitude),
                ]
            })
            .collect(),
    );

    ui.add_space(8.0);
    ui.heading("Routes");
    preview_table(
        ui,
        "routes_table",
        &["Airline", "Airline ID", "Source", "Destination", "Equipment", "Distance (km)"],
        preview
            .routes
            .iter()
            .map(|r| {
                vec![
                    r.airline.clone(),
                    r.airline_id.map(|id| id.to_string()).unwrap_or_else(|| "–".to_string()),
                    r.source.clone(),
                    r.destination.clone(),
                    r.equipment.join(" "),
                    r.distance_km
                        .map(|d| format!("{d:.0}"))
                        .unwrap_or_else(|| "–".to_string()),
                ]
            })
            .collect(),
    );
}
