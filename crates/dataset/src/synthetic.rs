//! Deterministic synthetic dataset for demos and tests.
//!
//! A refined mesh over the unit square with a dense central blob, a smaller
//! off-center clump, and one particle type clustered around the middle.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use map_common::{DisplayUnit, Domain};

use crate::error::Result;
use crate::memory::{DatasetFile, InMemoryDataset};
use crate::types::{Cells, Particles};

/// Cells per axis at the coarsest level.
const BASE_CELLS: usize = 8;
const PARTICLE_COUNT: usize = 2000;

pub const FLUID_TYPE: &str = "gas";
pub const PARTICLE_TYPE: &str = "PartType0";

/// Build the synthetic dataset, refining up to `levels` times near the center.
pub fn synthetic(levels: u32) -> Result<InMemoryDataset> {
    InMemoryDataset::new(synthetic_file(levels))
}

pub fn synthetic_file(levels: u32) -> DatasetFile {
    let mut cells = Cells::default();
    let h = 0.5 / BASE_CELLS as f64;
    for j in 0..BASE_CELLS {
        for i in 0..BASE_CELLS {
            let x = (2 * i + 1) as f64 * h;
            let y = (2 * j + 1) as f64 * h;
            refine(&mut cells, x, y, h, 0, levels);
        }
    }

    let mut density = Vec::with_capacity(cells.len());
    let mut temperature = Vec::with_capacity(cells.len());
    let mut velocity_x = Vec::with_capacity(cells.len());
    for (&x, &y) in cells.px.iter().zip(&cells.py) {
        let r2 = (x - 0.5).powi(2) + (y - 0.5).powi(2);
        let clump = (x - 0.2).powi(2) + (y - 0.75).powi(2);
        density.push(1.0 + 1.0e3 * (-r2 / 0.01).exp() + 50.0 * (-clump / 0.002).exp());
        temperature.push(1.0e4 * (1.0 + 0.5 * (2.0 * PI * x).sin()));
        velocity_x.push((2.0 * PI * y).sin());
    }

    let mut gas = BTreeMap::new();
    gas.insert("density".to_string(), density);
    gas.insert("temperature".to_string(), temperature);
    gas.insert("velocity_x".to_string(), velocity_x);
    let mut fields = BTreeMap::new();
    fields.insert(FLUID_TYPE.to_string(), gas);

    let mut particles = BTreeMap::new();
    particles.insert(PARTICLE_TYPE.to_string(), cluster(PARTICLE_COUNT));

    DatasetFile {
        domain: Domain {
            left_edge: [0.0, 0.0],
            right_edge: [1.0, 1.0],
            length_unit_cm: DisplayUnit::Mpc.in_cm(),
        },
        cells,
        fluid_types: vec![FLUID_TYPE.to_string()],
        fields,
        particles,
    }
}

fn refine(cells: &mut Cells, x: f64, y: f64, h: f64, level: u32, levels: u32) {
    let r = ((x - 0.5).powi(2) + (y - 0.5).powi(2)).sqrt();
    if level < levels && r < 0.05 + 4.0 * h {
        let q = h / 2.0;
        for (dx, dy) in [(-q, -q), (q, -q), (-q, q), (q, q)] {
            refine(cells, x + dx, y + dy, q, level + 1, levels);
        }
    } else {
        cells.push(x, y, h, h);
    }
}

/// Radical inverse in `base`, the building block of a Halton sequence.
fn halton(mut index: usize, base: usize) -> f64 {
    let mut f = 1.0;
    let mut r = 0.0;
    while index > 0 {
        f /= base as f64;
        r += f * (index % base) as f64;
        index /= base;
    }
    r
}

/// Gaussian cluster around the domain center from a Halton sequence.
fn cluster(n: usize) -> Particles {
    let mut particles = Particles::default();
    for k in 1..=n {
        let u1 = halton(k, 2);
        let u2 = halton(k, 3);
        let radius = 0.12 * (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * PI * u2;
        let x = 0.5 + radius * theta.cos();
        let y = 0.5 + radius * theta.sin();
        if (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y) {
            particles.x.push(x);
            particles.y.push(y);
            particles.mass.push(1.0);
        }
    }
    particles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_tile_the_domain() {
        for levels in 0..4 {
            let file = synthetic_file(levels);
            let area: f64 = (0..file.cells.len()).map(|i| file.cells.area(i)).sum();
            assert!((area - 1.0).abs() < 1e-9, "levels={} area={}", levels, area);
        }
        assert_eq!(synthetic_file(0).cells.len(), BASE_CELLS * BASE_CELLS);
        assert!(synthetic_file(2).cells.len() > BASE_CELLS * BASE_CELLS);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(synthetic_file(2).cells, synthetic_file(2).cells);
        assert_eq!(
            synthetic_file(2).particles[PARTICLE_TYPE],
            synthetic_file(2).particles[PARTICLE_TYPE]
        );
    }

    #[test]
    fn test_halton() {
        assert_eq!(halton(1, 2), 0.5);
        assert_eq!(halton(2, 2), 0.25);
        assert!((halton(1, 3) - 1.0 / 3.0).abs() < 1e-12);
    }
}
