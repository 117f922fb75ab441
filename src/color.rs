use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::emissions::HaulClass;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Fixed colours for the emissions map.
pub fn haul_color(haul: HaulClass) -> Color32 {
    match haul {
        HaulClass::Short => Color32::from_rgb(46, 160, 67),
        HaulClass::Long => Color32::from_rgb(214, 69, 65),
    }
}

// ---------------------------------------------------------------------------
// Color mapping: label → Color32
// ---------------------------------------------------------------------------

/// Maps a set of labels (countries, airplane models) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from labels; duplicates share a colour.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let unique: std::collections::BTreeSet<&str> = labels.into_iter().collect();
        let palette = generate_palette(unique.len());
        let mapping: BTreeMap<String, Color32> = unique
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_colors_are_distinct() {
        let palette = generate_palette(6);
        assert_eq!(palette.len(), 6);
        for (i, a) in palette.iter().enumerate() {
            assert!(palette[i + 1..].iter().all(|b| a != b));
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_color_map_shares_colour_for_duplicates() {
        let map = ColorMap::new(["Canada", "Germany", "Canada"]);
        assert_eq!(map.mapping.len(), 2);
        assert_ne!(map.color_for("Canada"), map.color_for("Germany"));
        assert_eq!(map.color_for("Atlantis"), Color32::GRAY);
    }
}
