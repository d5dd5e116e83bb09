use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{Dataset, COL_BOOSTER_CATEGORY, COL_CLASS, COL_LAUNCH_SITE};

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

/// Maps the labels of one categorical column to distinct colours.
///
/// Built from the whole dataset so a category keeps its colour while the
/// selection narrows.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(l, c)| (l.to_string(), c))
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

/// Colour maps for every categorical column the charts group by.
#[derive(Debug, Clone)]
pub struct Palettes {
    pub sites: ColorMap,
    pub boosters: ColorMap,
    pub outcomes: ColorMap,
}

impl Palettes {
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self {
            sites: ColorMap::new(dataset.sites.iter().map(String::as_str)),
            boosters: ColorMap::new(dataset.booster_categories.iter().map(String::as_str)),
            outcomes: ColorMap::new(["0", "1"]),
        }
    }

    /// Colour map for the column a chart groups by.
    pub fn for_column(&self, column: &str) -> Option<&ColorMap> {
        match column {
            COL_LAUNCH_SITE => Some(&self.sites),
            COL_BOOSTER_CATEGORY => Some(&self.boosters),
            COL_CLASS => Some(&self.outcomes),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        for (i, a) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|b| b != a));
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_label_is_gray() {
        let map = ColorMap::new(["FT", "B4"]);
        assert_ne!(map.color_for("FT"), map.color_for("B4"));
        assert_eq!(map.color_for("v1.0"), Color32::GRAY);
    }

    #[test]
    fn palettes_by_column() {
        let ds = Dataset::from_records(vec![
            crate::data::model::LaunchRecord::new("KSC LC-39A", 1.0, 1, "FT"),
            crate::data::model::LaunchRecord::new("VAFB SLC-4E", 2.0, 0, "B4"),
        ])
        .unwrap();
        let p = Palettes::for_dataset(&ds);
        let sites = p.for_column(COL_LAUNCH_SITE).unwrap();
        assert_ne!(sites.color_for("KSC LC-39A"), Color32::GRAY);
        assert_ne!(p.for_column(COL_CLASS).unwrap().color_for("1"), Color32::GRAY);
        assert!(p.for_column("Flight Number").is_none());
    }
}
