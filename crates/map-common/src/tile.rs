//! Quad-tree tile addressing over a dataset domain.
//!
//! Zoom level `z` splits the domain into `2^z` tiles per axis. Tile `(0, 0)`
//! sits at the domain's left edge on both axes.

use crate::{BoundingBox, Domain, MapError, MapResult};
use serde::{Deserialize, Serialize};

/// Deepest zoom level the mapper accepts. Tile indices are `u32`, so
/// `2^MAX_ZOOM` tiles per axis is the widest addressable level.
pub const MAX_ZOOM: u32 = 32;

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Generate a cache key string.
    pub fn cache_key(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }

    /// Number of tiles along each axis at this zoom level.
    pub fn tiles_per_axis(&self) -> u64 {
        1u64 << self.z.min(MAX_ZOOM)
    }

    /// Tile edge length relative to the domain width (`1 / 2^z`).
    pub fn relative_size(&self) -> f64 {
        1.0 / 2f64.powi(self.z as i32)
    }

    /// Check that the zoom level is at most `max_zoom` and that x and y lie in
    /// `[0, 2^z)`.
    pub fn validate(&self, max_zoom: u32) -> MapResult<()> {
        let max_zoom = max_zoom.min(MAX_ZOOM);
        if self.z > max_zoom {
            return Err(self.invalid(format!(
                "zoom level exceeds maximum of {}",
                max_zoom
            )));
        }
        let n = self.tiles_per_axis();
        if u64::from(self.x) >= n || u64::from(self.y) >= n {
            return Err(self.invalid(format!(
                "tile index outside [0, {}) for zoom level {}",
                n, self.z
            )));
        }
        Ok(())
    }

    fn invalid(&self, message: String) -> MapError {
        MapError::InvalidAddress {
            z: self.z,
            x: self.x,
            y: self.y,
            message,
        }
    }

    /// The four tiles one zoom level down, or `None` past `MAX_ZOOM`.
    pub fn children(&self) -> Option<[TileCoord; 4]> {
        let z = self.z.checked_add(1).filter(|&z| z <= MAX_ZOOM)?;
        let x = self.x.checked_mul(2)?;
        let y = self.y.checked_mul(2)?;
        let (x1, y1) = (x.checked_add(1)?, y.checked_add(1)?);
        Some([
            TileCoord { z, x, y },
            TileCoord { z, x: x1, y },
            TileCoord { z, x, y: y1 },
            TileCoord { z, x: x1, y: y1 },
        ])
    }
}

/// Physical bounding box covered by a tile.
///
/// `dd = 1/2^z`; the tile starts at `left + (x, y) * dd * width` and spans
/// `dd * width` on each axis. Tiles outside `[0, 2^z)` are rejected with
/// `InvalidAddress` rather than rendered blank.
pub fn tile_bounds(domain: &Domain, coord: &TileCoord) -> MapResult<BoundingBox> {
    coord.validate(MAX_ZOOM)?;

    let dd = coord.relative_size();
    let rel_x = coord.x as f64 * dd;
    let rel_y = coord.y as f64 * dd;
    let [width_x, width_y] = domain.width();

    let min_x = domain.left_edge[0] + rel_x * width_x;
    let min_y = domain.left_edge[1] + rel_y * width_y;
    let max_x = min_x + dd * width_x;
    let max_y = min_y + dd * width_y;

    Ok(BoundingBox::new(min_x, min_y, max_x, max_y))
}
