//! Color bounds over the whole sample set of a field.

use std::collections::HashMap;
use std::sync::Mutex;

use dataset::SampleSet;
use map_common::{Domain, FieldRef, MapError, MapResult, TileCoord};

/// Samples per tile edge the minimum size hint is derived from.
const HINT_PIXELS: f64 = 256.0;
/// Sub-pixel oversampling allowed below one pixel.
const HINT_OVERSAMPLE: f64 = 64.0;

/// Value range mapped onto the colormap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBounds {
    pub min: f64,
    pub max: f64,
}

impl ColorBounds {
    /// Both bounds in log10 space. Fails unless `min > 0`.
    pub fn log10(self) -> MapResult<Self> {
        if !(self.min > 0.0) {
            return Err(MapError::InvalidDomain(format!(
                "minimum value {} is not positive",
                self.min
            )));
        }
        Ok(Self {
            min: self.min.log10(),
            max: self.max.log10(),
        })
    }

    pub fn as_tuple(self) -> (f64, f64) {
        (self.min, self.max)
    }
}

/// Half-extent window a sample must fall in to count towards the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSizeHint {
    pub min_dx: f64,
    pub max_dx: f64,
}

impl PixelSizeHint {
    /// Window for tiles at `coord.z`: a tile's width down to 1/64 of a pixel.
    pub fn for_tile(domain: &Domain, coord: &TileCoord) -> Self {
        let tile_width = coord.relative_size() * domain.width()[0];
        Self {
            min_dx: tile_width / (HINT_OVERSAMPLE * HINT_PIXELS),
            max_dx: tile_width,
        }
    }

    fn admits(&self, half_extent: f64) -> bool {
        half_extent >= self.min_dx && half_extent <= self.max_dx
    }
}

/// Min and max of the field over every qualifying sample in the domain.
///
/// A sample is skipped when either half-extent lies outside `hint`, when it
/// lies wholly outside the domain, or when its value is not finite. Past the
/// finest resolution no sample fits the window, so the window is dropped and
/// every finite sample inside the domain counts. The result depends on the
/// zoom level only, never on which tile is being drawn.
pub fn color_bounds(
    samples: &SampleSet<'_>,
    domain: &Domain,
    hint: PixelSizeHint,
) -> MapResult<ColorBounds> {
    scan_bounds(samples, domain, Some(hint))
        .or_else(|| scan_bounds(samples, domain, None))
        .ok_or_else(|| {
            MapError::ResourceFault("no finite samples inside the domain".to_string())
        })
}

fn scan_bounds(
    samples: &SampleSet<'_>,
    domain: &Domain,
    hint: Option<PixelSizeHint>,
) -> Option<ColorBounds> {
    let [left_x, left_y] = domain.left_edge;
    let [right_x, right_y] = domain.right_edge;

    let mut bounds: Option<ColorBounds> = None;
    for (x, y, hx, hy, value) in samples.iter() {
        if let Some(hint) = hint {
            if !hint.admits(hx) || !hint.admits(hy) {
                continue;
            }
        }
        if x + hx < left_x || x - hx > right_x || y + hy < left_y || y - hy > right_y {
            continue;
        }
        if !value.is_finite() {
            continue;
        }
        bounds = Some(match bounds {
            None => ColorBounds {
                min: value,
                max: value,
            },
            Some(b) => ColorBounds {
                min: b.min.min(value),
                max: b.max.max(value),
            },
        });
    }
    bounds
}

/// Memo of color bounds keyed by field and zoom level.
#[derive(Debug, Default)]
pub struct BoundsCache {
    entries: Mutex<HashMap<(FieldRef, u32), ColorBounds>>,
}

impl BoundsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &FieldRef, z: u32) -> Option<ColorBounds> {
        let entries = self.entries.lock().ok()?;
        entries.get(&(field.clone(), z)).copied()
    }

    pub fn insert(&self, field: &FieldRef, z: u32, bounds: ColorBounds) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert((field.clone(), z), bounds);
        }
    }
}
