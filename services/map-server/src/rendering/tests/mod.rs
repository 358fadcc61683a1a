//! Tests for the rendering pipeline.

mod normalize_tests;

use std::collections::BTreeMap;

use dataset::{Cells, DatasetFile, InMemoryDataset, Particles};
use map_common::Domain;
use test_utils::{linear_values, uniform_cells};

/// `n x n` unit-square dataset.
///
/// - `gas/density`: ramp 1..100 in cell order
/// - `gas/offset`: ramp 0..1, so its minimum is zero
/// - `gas/row`: the cell's row index
/// - particle type `stars` with one unit mass per cell center
pub(super) fn ramp_dataset(n: usize) -> InMemoryDataset {
    let lattice = uniform_cells(n, 0.0, 1.0);
    let cells = Cells {
        px: lattice.px.clone(),
        py: lattice.py.clone(),
        pdx: lattice.pdx.clone(),
        pdy: lattice.pdy.clone(),
    };
    let count = cells.len();

    let mut gas = BTreeMap::new();
    gas.insert("density".to_string(), linear_values(count, 1.0, 100.0));
    gas.insert("offset".to_string(), linear_values(count, 0.0, 1.0));
    gas.insert(
        "row".to_string(),
        (0..count).map(|i| (i / n) as f64).collect(),
    );
    let mut fields = BTreeMap::new();
    fields.insert("gas".to_string(), gas);

    let mut particles = BTreeMap::new();
    particles.insert(
        "stars".to_string(),
        Particles {
            x: lattice.px.clone(),
            y: lattice.py.clone(),
            mass: vec![1.0; count],
        },
    );

    InMemoryDataset::new(DatasetFile {
        domain: Domain::unit(),
        cells,
        fluid_types: vec!["gas".to_string()],
        fields,
        particles,
    })
    .unwrap()
}
