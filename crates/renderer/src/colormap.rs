//! Colormaps and value-to-color mapping.
//!
//! A colormap is a 256-entry lookup table built from color stops placed on
//! `[0, 1]`. Built-in maps are always available; additional maps can be
//! loaded from a JSON file with the same stop format as the built-ins:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "colormaps": {
//!     "ice": { "stops": [ { "value": 0.0, "color": "#000033" },
//!                         { "value": 1.0, "color": "#ccffff" } ] }
//!   }
//! }
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Number of entries in every lookup table.
pub const LUT_SIZE: usize = 256;

#[derive(Debug, Error)]
pub enum ColormapError {
    #[error("Unknown colormap: {0}")]
    Unknown(String),

    #[error("Invalid color '{color}' in colormap '{name}'")]
    InvalidColor { name: String, color: String },

    #[error("Colormap '{0}' needs at least two stops")]
    TooFewStops(String),

    #[error("Failed to read colormap file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse colormap file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }
}

/// Linear color interpolation
fn interpolate_color(c1: Color, c2: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
    Color::new(mix(c1.r, c2.r), mix(c1.g, c2.g), mix(c1.b, c2.b), mix(c1.a, c2.a))
}

/// Color stop for gradient
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColorStop {
    /// Position on [0, 1]
    pub value: f64,
    pub color: String,
}

/// A single colormap definition as found in a colormap file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColormapDefinition {
    pub description: Option<String>,
    pub stops: Vec<ColorStop>,
}

/// Colormap file contents.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColormapConfig {
    pub version: String,
    pub colormaps: BTreeMap<String, ColormapDefinition>,
}

impl ColormapConfig {
    pub fn from_json(json_str: &str) -> Result<Self, ColormapError> {
        Ok(serde_json::from_str(json_str)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ColormapError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// A named 256-entry color lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    lut: Vec<Color>,
}

impl Colormap {
    /// Build a lookup table from `(position, color)` stops.
    ///
    /// Stops are sorted by position; positions outside `[0, 1]` are clamped.
    pub fn from_stops(name: &str, stops: &[(f64, Color)]) -> Result<Self, ColormapError> {
        if stops.len() < 2 {
            return Err(ColormapError::TooFewStops(name.to_string()));
        }
        let mut stops: Vec<(f64, Color)> = stops
            .iter()
            .map(|&(v, c)| (v.clamp(0.0, 1.0), c))
            .collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));

        let lut = (0..LUT_SIZE)
            .map(|i| {
                let t = i as f64 / (LUT_SIZE - 1) as f64;
                let upper = stops.iter().position(|(v, _)| *v >= t).unwrap_or(stops.len() - 1);
                if upper == 0 {
                    return stops[0].1;
                }
                let (v0, c0) = stops[upper - 1];
                let (v1, c1) = stops[upper];
                if v1 <= v0 {
                    c1
                } else {
                    interpolate_color(c0, c1, (t - v0) / (v1 - v0))
                }
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            lut,
        })
    }

    pub fn from_definition(name: &str, def: &ColormapDefinition) -> Result<Self, ColormapError> {
        let stops = def
            .stops
            .iter()
            .map(|s| {
                Color::from_hex(&s.color)
                    .map(|c| (s.value, c))
                    .ok_or_else(|| ColormapError::InvalidColor {
                        name: name.to_string(),
                        color: s.color.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_stops(name, &stops)
    }

    fn from_hex_stops(name: &str, hex: &[&str]) -> Result<Self, ColormapError> {
        let last = (hex.len().max(2) - 1) as f64;
        let stops = hex
            .iter()
            .enumerate()
            .map(|(i, h)| {
                Color::from_hex(h)
                    .map(|c| (i as f64 / last, c))
                    .ok_or_else(|| ColormapError::InvalidColor {
                        name: name.to_string(),
                        color: h.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_stops(name, &stops)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color for a normalized value. Values are clipped to `[0, 1]`.
    pub fn lookup(&self, normalized: f64) -> Color {
        let idx = (normalized.clamp(0.0, 1.0) * (LUT_SIZE - 1) as f64).round() as usize;
        self.lut[idx.min(LUT_SIZE - 1)]
    }
}

const GRAY: [&str; 2] = ["#000000", "#ffffff"];
const VIRIDIS: [&str; 10] = [
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];
const HOT: [(f64, &str); 4] = [(0.0, "#0b0000"), (0.375, "#ff0000"), (0.75, "#ffff00"), (1.0, "#ffffff")];
const ALGAE: [&str; 6] = ["#d7f9d0", "#a2d595", "#64b463", "#129450", "#126e45", "#11472f"];
const RDBU: [&str; 11] = [
    "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0", "#92c5de",
    "#4393c3", "#2166ac", "#053061",
];

/// Colormaps available to the renderer, keyed by name.
#[derive(Debug, Clone)]
pub struct ColormapRegistry {
    maps: BTreeMap<String, Colormap>,
}

impl ColormapRegistry {
    /// Registry holding the built-in colormaps.
    pub fn builtin() -> Self {
        let mut maps = BTreeMap::new();
        let hot_stops: Vec<(f64, Color)> = HOT
            .iter()
            .filter_map(|(v, h)| Color::from_hex(h).map(|c| (*v, c)))
            .collect();
        let builtins = [
            Colormap::from_hex_stops("gray", &GRAY),
            Colormap::from_hex_stops("viridis", &VIRIDIS),
            Colormap::from_stops("hot", &hot_stops),
            Colormap::from_hex_stops("algae", &ALGAE),
            Colormap::from_hex_stops("RdBu", &RDBU),
        ];
        // Built-in stops are constants; a bad one is skipped rather than fatal.
        for cmap in builtins.into_iter().flatten() {
            maps.insert(cmap.name.clone(), cmap);
        }
        Self { maps }
    }

    /// Add every colormap of a config, replacing built-ins with the same name.
    pub fn merge_config(&mut self, config: &ColormapConfig) -> Result<usize, ColormapError> {
        let mut added = 0;
        for (name, def) in &config.colormaps {
            let cmap = Colormap::from_definition(name, def)?;
            if self.maps.insert(name.clone(), cmap).is_some() {
                tracing::debug!(colormap = %name, "Replacing built-in colormap");
            }
            added += 1;
        }
        Ok(added)
    }

    pub fn get(&self, name: &str) -> Result<&Colormap, ColormapError> {
        self.maps
            .get(name)
            .ok_or_else(|| ColormapError::Unknown(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(|k| k.as_str())
    }
}

impl Default for ColormapRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Map a row-major grid of values to RGBA pixels.
///
/// Values are normalized with `(v - min) / (max - min)` and clipped to the
/// colormap's extremes. Non-finite values are written as transparent pixels.
/// A degenerate range (`max <= min`) maps every finite value to the low end.
///
/// # Returns
/// RGBA pixel data (4 bytes per pixel)
pub fn apply_colormap(
    data: &[f64],
    width: usize,
    height: usize,
    bounds: (f64, f64),
    cmap: &Colormap,
) -> Vec<u8> {
    let mut pixels = vec![0u8; width * height * 4];
    if width == 0 {
        return pixels;
    }
    let (min_val, max_val) = bounds;
    let range = max_val - min_val;
    let scale = if range > 0.0 && range.is_finite() {
        1.0 / range
    } else {
        0.0
    };

    pixels
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(row, out)| {
            let start = row * width;
            for (col, px) in out.chunks_exact_mut(4).enumerate() {
                let color = match data.get(start + col) {
                    Some(&v) if v.is_finite() => cmap.lookup((v - min_val) * scale),
                    _ => Color::transparent(),
                };
                px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
            }
        });

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::new(255, 0, 0, 255)));
        assert_eq!(Color::from_hex("00ff0080"), Some(Color::new(0, 255, 0, 128)));
        assert_eq!(Color::from_hex("#GGGGGG"), None);
        assert_eq!(Color::from_hex("#FFF"), None);
    }

    #[test]
    fn test_gray_endpoints() {
        let registry = ColormapRegistry::builtin();
        let gray = registry.get("gray").unwrap();
        assert_eq!(gray.lookup(0.0), Color::new(0, 0, 0, 255));
        assert_eq!(gray.lookup(1.0), Color::new(255, 255, 255, 255));
        assert_eq!(gray.lookup(-3.0), gray.lookup(0.0));
        assert_eq!(gray.lookup(7.0), gray.lookup(1.0));
        assert_eq!(gray.lookup(0.5).r, 128);
    }

    #[test]
    fn test_builtins_present() {
        let registry = ColormapRegistry::builtin();
        let names: Vec<&str> = registry.names().collect();
        for expected in ["RdBu", "algae", "gray", "hot", "viridis"] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
        assert!(matches!(registry.get("jet"), Err(ColormapError::Unknown(_))));
    }

    #[test]
    fn test_too_few_stops() {
        let err = Colormap::from_stops("one", &[(0.0, Color::new(1, 2, 3, 255))]).unwrap_err();
        assert!(matches!(err, ColormapError::TooFewStops(_)));
    }

    #[test]
    fn test_apply_colormap_nan_transparent() {
        let registry = ColormapRegistry::builtin();
        let gray = registry.get("gray").unwrap();
        let data = [0.0, f64::NAN, 10.0, f64::NEG_INFINITY];
        let pixels = apply_colormap(&data, 2, 2, (0.0, 10.0), gray);
        assert_eq!(&pixels[0..4], &[0, 0, 0, 255]);
        assert_eq!(&pixels[4..8], &[0, 0, 0, 0]);
        assert_eq!(&pixels[8..12], &[255, 255, 255, 255]);
        assert_eq!(&pixels[12..16], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_apply_colormap_degenerate_range() {
        let registry = ColormapRegistry::builtin();
        let gray = registry.get("gray").unwrap();
        let pixels = apply_colormap(&[5.0, 5.0], 2, 1, (5.0, 5.0), gray);
        assert_eq!(pixels, vec![0, 0, 0, 255, 0, 0, 0, 255]);
    }
}
