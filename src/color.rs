use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct labels of one categorical column (job type, education,
/// …) to distinct colours, in label order.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        let palette = generate_palette(labels.len());
        let mapping = labels.into_iter().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label; unknown labels get grey.
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
    fn distinct_colours_per_label() {
        let cm = ColorMap::new(["Full-time", "Internship", "Contract"]);
        assert_eq!(cm.color_for("Contract"), generate_palette(3)[0]);
        assert_ne!(cm.color_for("Full-time"), cm.color_for("Contract"));
        assert_eq!(cm.color_for("Freelance"), Color32::GRAY);
    }

    #[test]
    fn colours_do_not_depend_on_input_order() {
        let by_count = ColorMap::new(["MBA", "B.Tech", "PhD", "MBA"]);
        let sorted = ColorMap::new(["B.Tech", "MBA", "PhD"]);
        for label in ["B.Tech", "MBA", "PhD"] {
            assert_eq!(by_count.color_for(label), sorted.color_for(label));
        }
        assert_eq!(sorted.color_for("B.Tech"), generate_palette(3)[0]);
    }

    #[test]
    fn empty_palette() {
        assert!(generate_palette(0).is_empty());
    }
}
