//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// An axis-aligned box in the physical units of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Area of the overlap between this bbox and a rectangle given by its
    /// center and half-widths. Zero when they do not overlap.
    pub fn overlap_area(&self, cx: f64, cy: f64, hx: f64, hy: f64) -> f64 {
        let ox = (self.max_x.min(cx + hx) - self.min_x.max(cx - hx)).max(0.0);
        let oy = (self.max_y.min(cy + hy) - self.min_y.max(cy - hy)).max(0.0);
        ox * oy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_area() {
        let pixel = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        // Cell centered on the pixel corner, half-width 0.5: quarter overlap
        assert_eq!(pixel.overlap_area(1.0, 1.0, 0.5, 0.5), 0.25);
        // Cell wholly outside
        assert_eq!(pixel.overlap_area(3.0, 3.0, 0.5, 0.5), 0.0);
        // Cell covering the pixel
        assert_eq!(pixel.overlap_area(0.5, 0.5, 2.0, 2.0), 1.0);
    }
}
