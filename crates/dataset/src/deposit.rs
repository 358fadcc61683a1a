//! Particle deposits onto cells.

use crate::error::{DatasetError, Result};
use crate::index::BinIndex;
use crate::types::{Cells, Particles};

/// How deposited particle mass is reported per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepositKind {
    /// Total mass of the particles falling in each cell.
    Cic,
    /// Deposited mass divided by cell area.
    Density,
}

impl DepositKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "cic" => Some(DepositKind::Cic),
            "density" => Some(DepositKind::Density),
            _ => None,
        }
    }
}

/// Deposit every particle into the cell containing it.
///
/// Particles outside all cells are dropped.
pub fn deposit(
    cells: &Cells,
    index: &BinIndex,
    particles: &Particles,
    kind: DepositKind,
) -> Result<Vec<f64>> {
    if particles.y.len() != particles.len() || particles.mass.len() != particles.len() {
        return Err(DatasetError::Invalid(
            "particle arrays have different lengths".to_string(),
        ));
    }

    let mut totals = vec![0.0f64; cells.len()];
    let mut dropped = 0usize;
    for p in 0..particles.len() {
        match index.locate(cells, particles.x[p], particles.y[p]) {
            Some(cell) => totals[cell] += particles.mass[p],
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::debug!(dropped, "Particles outside every cell were not deposited");
    }

    if kind == DepositKind::Density {
        for (i, total) in totals.iter_mut().enumerate() {
            *total /= cells.area(i);
        }
    }
    Ok(totals)
}
