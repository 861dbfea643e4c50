use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// An 8-bit RGB triple usable by both the viewer and the figure backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GRAY: Rgb = Rgb(128, 128, 128);

    pub fn to_color32(self) -> Color32 {
        Color32::from_rgb(self.0, self.1, self.2)
    }

    pub fn to_plotters(self) -> RGBColor {
        RGBColor(self.0, self.1, self.2)
    }
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.6, 0.45);
            let rgb: Srgb = hsl.into_color();
            Rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: hue key → colour
// ---------------------------------------------------------------------------

/// Maps the hue levels of a plot (algorithms, families) to distinct colours.
/// Keys are coloured in their sort order.
#[derive(Debug, Clone)]
pub struct ColorMap<K: Ord> {
    mapping: BTreeMap<K, Rgb>,
    default_color: Rgb,
}

impl<K: Ord + Clone> ColorMap<K> {
    pub fn new<'a, I>(keys: I) -> Self
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut keys: Vec<K> = keys.into_iter().cloned().collect();
        keys.sort();
        keys.dedup();
        let palette = generate_palette(keys.len());

        ColorMap {
            mapping: keys.into_iter().zip(palette).collect(),
            default_color: Rgb::GRAY,
        }
    }

    /// Look up the colour for a given hue level.
    pub fn color_for(&self, key: &K) -> Rgb {
        self.mapping.get(key).copied().unwrap_or(self.default_color)
    }

    /// Hue levels with their colours, in legend order.
    pub fn legend_entries(&self) -> impl Iterator<Item = (&K, Rgb)> {
        self.mapping.iter().map(|(k, c)| (k, *c))
    }
}
