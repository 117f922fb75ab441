use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::ColorMap;
use crate::data::query::{DistanceHistogram, ModelCount};

// ---------------------------------------------------------------------------
// Top airplane models (bar chart)
// ---------------------------------------------------------------------------

/// One bar per model, in ranking order; the legend carries the names.
pub fn top_models_chart(ui: &mut Ui, ranked: &[ModelCount]) {
    let colors = ColorMap::new(ranked.iter().map(|m| m.model.as_str()));

    Plot::new("top_models_plot")
        .legend(Legend::default())
        .x_axis_label("Rank")
        .y_axis_label("Routes")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (rank, entry) in ranked.iter().enumerate() {
                let bar = Bar::new((rank + 1) as f64, entry.count as f64)
                    .name(format!("{}: {} routes", entry.model, entry.count))
                    .width(0.8);
                let chart = BarChart::new(vec![bar])
                    .name(&entry.model)
                    .color(colors.color_for(&entry.model));
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Distance histogram
// ---------------------------------------------------------------------------

pub fn distance_histogram(ui: &mut Ui, histogram: &DistanceHistogram) {
    let bars: Vec<Bar> = histogram
        .buckets
        .iter()
        .map(|b| {
            Bar::new((b.lower_km + b.upper_km) / 2.0, b.count as f64)
                .width(histogram.bucket_width_km * 0.95)
                .name(format!("{:.0}–{:.0} km", b.lower_km, b.upper_km))
        })
        .collect();

    Plot::new("distance_plot")
        .x_axis_label("Distance (km)")
        .y_axis_label("Routes")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Routes")
                    .color(Color32::LIGHT_BLUE),
            );
        });
}
