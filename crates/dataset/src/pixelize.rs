//! Fixed-resolution pixelization of scattered cells.
//!
//! Each pixel receives the area-weighted mean of the cell values overlapping
//! it. Pixels no cell touches are 0.0.

use map_common::BoundingBox;

use crate::error::{DatasetError, Result};
use crate::types::SampleSet;

/// Rasterize `samples` onto a `width x height` grid covering `bbox`.
///
/// Only the sample indices yielded by `candidates` are considered, in the
/// order given; pass them ascending for reproducible output. The result is
/// row-major with row 0 at `bbox.min_y`.
pub fn pixelize(
    samples: &SampleSet<'_>,
    candidates: impl IntoIterator<Item = usize>,
    bbox: &BoundingBox,
    width: usize,
    height: usize,
) -> Result<Vec<f64>> {
    if width == 0 || height == 0 {
        return Err(DatasetError::InvalidResolution { width, height });
    }
    if !(bbox.width() > 0.0 && bbox.height() > 0.0) {
        return Err(DatasetError::Invalid(format!(
            "pixelization box has no area: {:?}",
            bbox
        )));
    }

    let pw = bbox.width() / width as f64;
    let ph = bbox.height() / height as f64;
    let mut sums = vec![0.0f64; width * height];
    let mut weights = vec![0.0f64; width * height];

    for i in candidates {
        let (x, y, hx, hy, v) = (
            samples.px[i],
            samples.py[i],
            samples.pdx[i],
            samples.pdy[i],
            samples.values[i],
        );
        if !v.is_finite() {
            continue;
        }

        let col_lo = (((x - hx - bbox.min_x) / pw).floor().max(0.0)) as usize;
        let col_hi = (((x + hx - bbox.min_x) / pw).ceil().max(0.0) as usize).min(width);
        let row_lo = (((y - hy - bbox.min_y) / ph).floor().max(0.0)) as usize;
        let row_hi = (((y + hy - bbox.min_y) / ph).ceil().max(0.0) as usize).min(height);

        for row in row_lo..row_hi {
            let y0 = bbox.min_y + row as f64 * ph;
            for col in col_lo..col_hi {
                let x0 = bbox.min_x + col as f64 * pw;
                let pixel = BoundingBox::new(x0, y0, x0 + pw, y0 + ph);
                let area = pixel.overlap_area(x, y, hx, hy);
                if area > 0.0 {
                    let idx = row * width + col;
                    sums[idx] += v * area;
                    weights[idx] += area;
                }
            }
        }
    }

    Ok(sums
        .into_iter()
        .zip(weights)
        .map(|(s, w)| if w > 0.0 { s / w } else { 0.0 })
        .collect())
}
