//! Test data generators for creating synthetic cell and grid data.
//!
//! These generators create predictable, verifiable patterns that can be used
//! across the test suite. Cells use the center + half-width convention.

/// Flat arrays describing a set of rectangular cells.
#[derive(Debug, Clone, Default)]
pub struct CellArrays {
    pub px: Vec<f64>,
    pub py: Vec<f64>,
    pub pdx: Vec<f64>,
    pub pdy: Vec<f64>,
}

impl CellArrays {
    pub fn len(&self) -> usize {
        self.px.len()
    }

    pub fn is_empty(&self) -> bool {
        self.px.is_empty()
    }
}

/// Creates a uniform `n x n` lattice of cells covering `[left, right]` on both axes.
///
/// Cells are emitted row by row, starting at the lower-left corner.
///
/// # Example
///
/// ```
/// use test_utils::uniform_cells;
///
/// let cells = uniform_cells(4, 0.0, 1.0);
/// assert_eq!(cells.len(), 16);
/// assert_eq!(cells.px[0], 0.125);
/// assert_eq!(cells.pdx[0], 0.125);
/// ```
pub fn uniform_cells(n: usize, left: f64, right: f64) -> CellArrays {
    let mut cells = CellArrays::default();
    let dx = (right - left) / n as f64;
    for j in 0..n {
        for i in 0..n {
            cells.px.push(left + (i as f64 + 0.5) * dx);
            cells.py.push(left + (j as f64 + 0.5) * dx);
            cells.pdx.push(dx / 2.0);
            cells.pdy.push(dx / 2.0);
        }
    }
    cells
}

/// Linear ramp from `min` to `max` over `count` values (inclusive ends).
pub fn linear_values(count: usize, min: f64, max: f64) -> Vec<f64> {
    if count <= 1 {
        return vec![min; count];
    }
    (0..count)
        .map(|i| min + (max - min) * i as f64 / (count - 1) as f64)
        .collect()
}

/// Creates a positive, density-like grid: a gaussian blob over a floor of 1.0.
pub fn create_density_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x = (col as f64 + 0.5) / width as f64 - 0.5;
            let y = (row as f64 + 0.5) / height as f64 - 0.5;
            data.push(1.0 + 99.0 * (-(x * x + y * y) / 0.02).exp());
        }
    }
    data
}
