//! Uniform bin index over cell extents.
//!
//! Built lazily by datasets the first time a spatial query is made, then
//! reused for every later pixelization and deposit.

use map_common::BoundingBox;

use crate::types::Cells;

/// Upper bound on bins per axis.
const MAX_BINS_PER_AXIS: usize = 512;

/// Maps spatial bins to the cells overlapping them.
#[derive(Debug, Clone)]
pub struct BinIndex {
    bounds: BoundingBox,
    bins_x: usize,
    bins_y: usize,
    bins: Vec<Vec<usize>>,
}

impl BinIndex {
    /// Index `cells` over `bounds`, with roughly one bin per four cells.
    pub fn build(cells: &Cells, bounds: BoundingBox) -> Self {
        let per_axis = ((cells.len() as f64 / 4.0).sqrt().ceil() as usize).clamp(1, MAX_BINS_PER_AXIS);
        let mut index = Self {
            bounds,
            bins_x: per_axis,
            bins_y: per_axis,
            bins: vec![Vec::new(); per_axis * per_axis],
        };

        for i in 0..cells.len() {
            let extent = BoundingBox::new(
                cells.px[i] - cells.pdx[i],
                cells.py[i] - cells.pdy[i],
                cells.px[i] + cells.pdx[i],
                cells.py[i] + cells.pdy[i],
            );
            if let Some((x0, y0, x1, y1)) = index.bin_range(&extent) {
                for by in y0..=y1 {
                    for bx in x0..=x1 {
                        index.bins[by * index.bins_x + bx].push(i);
                    }
                }
            }
        }

        tracing::debug!(
            cells = cells.len(),
            bins_per_axis = per_axis,
            "Built cell bin index"
        );
        index
    }

    /// Inclusive bin ranges touched by `bbox`, or `None` when it misses the index.
    fn bin_range(&self, bbox: &BoundingBox) -> Option<(usize, usize, usize, usize)> {
        if bbox.max_x < self.bounds.min_x
            || bbox.min_x > self.bounds.max_x
            || bbox.max_y < self.bounds.min_y
            || bbox.min_y > self.bounds.max_y
        {
            return None;
        }
        let to_bin = |v: f64, lo: f64, span: f64, n: usize| -> usize {
            let t = ((v - lo) / span * n as f64).floor();
            (t.max(0.0) as usize).min(n - 1)
        };
        let (w, h) = (self.bounds.width(), self.bounds.height());
        Some((
            to_bin(bbox.min_x, self.bounds.min_x, w, self.bins_x),
            to_bin(bbox.min_y, self.bounds.min_y, h, self.bins_y),
            to_bin(bbox.max_x, self.bounds.min_x, w, self.bins_x),
            to_bin(bbox.max_y, self.bounds.min_y, h, self.bins_y),
        ))
    }

    /// Indices of cells whose bins touch `bbox`, ascending and unique.
    ///
    /// This is a superset of the overlapping cells; callers still test overlap.
    pub fn query(&self, bbox: &BoundingBox) -> Vec<usize> {
        let Some((x0, y0, x1, y1)) = self.bin_range(bbox) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for by in y0..=y1 {
            for bx in x0..=x1 {
                out.extend_from_slice(&self.bins[by * self.bins_x + bx]);
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// First cell (lowest index) containing the point.
    pub fn locate(&self, cells: &Cells, x: f64, y: f64) -> Option<usize> {
        let (bx, by, _, _) = self.bin_range(&BoundingBox::new(x, y, x, y))?;
        self.bins[by * self.bins_x + bx]
            .iter()
            .copied()
            .find(|&i| cells.contains_point(i, x, y))
    }
}
