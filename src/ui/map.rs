use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::haul_color;
use crate::data::geo::FlightMap;

/// Above this many markers the code labels are left out.
const MAX_LABELS: usize = 60;
/// Hover radius, in degrees, for naming the airport under the cursor.
const HOVER_DEGREES: f64 = 0.5;

// ---------------------------------------------------------------------------
// Route map (lon/lat plane)
// ---------------------------------------------------------------------------

/// Draw markers and route segments on an equirectangular plot.
///
/// Segments with a haul class get its colour; the rest use `route_color`.
pub fn flight_map(ui: &mut Ui, id: &str, map: &FlightMap, route_color: Color32) {
    let hover_labels: Vec<([f64; 2], String)> = map
        .markers
        .iter()
        .map(|m| ([m.longitude, m.latitude], m.label.clone()))
        .collect();

    let mut plot = Plot::new(id)
        .legend(Legend::default())
        .label_formatter(move |_name, value| {
            let near = hover_labels.iter().find(|([lon, lat], _)| {
                (lon - value.x).abs() < HOVER_DEGREES && (lat - value.y).abs() < HOVER_DEGREES
            });
            match near {
                Some((_, label)) => format!("{label}\n{:.2}, {:.2}", value.y, value.x),
                None => format!("{:.2}, {:.2}", value.y, value.x),
            }
        })
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if let Some([[min_lon, min_lat], [max_lon, max_lat]]) = map.bounds() {
        plot = plot
            .include_x(min_lon - 1.0)
            .include_x(max_lon + 1.0)
            .include_y(min_lat - 1.0)
            .include_y(max_lat + 1.0);
    }

    plot.show(ui, |plot_ui| {
        for segment in &map.segments {
            let color = segment.haul.map_or(route_color, haul_color);
            let points: PlotPoints = vec![segment.from, segment.to].into_iter().collect();
            plot_ui.line(Line::new(points).color(color).width(1.0));
        }

        let markers: PlotPoints = map
            .markers
            .iter()
            .map(|m| [m.longitude, m.latitude])
            .collect();
        plot_ui.points(
            Points::new(markers)
                .name("Airports")
                .radius(3.5)
                .color(Color32::from_rgb(30, 90, 200)),
        );

        if map.markers.len() <= MAX_LABELS {
            for m in &map.markers {
                plot_ui.text(Text::new(
                    PlotPoint::new(m.longitude, m.latitude + 0.6),
                    RichText::new(&m.code).small(),
                ));
            }
        }
    });
}
