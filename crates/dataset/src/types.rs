//! Core types shared by dataset implementations.

use map_common::{Domain, FieldRef};
use serde::{Deserialize, Serialize};

/// Category under which particle deposit fields are exposed.
pub const DEPOSIT_CATEGORY: &str = "deposit";

/// Deposit kinds offered for every particle type.
pub const DEPOSIT_KINDS: [&str; 2] = ["cic", "density"];

/// Immutable metadata of a dataset.
///
/// Safe to clone and read without holding the dataset itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub domain: Domain,
    pub particle_types: Vec<String>,
    pub fluid_types: Vec<String>,
    /// Every derived field as `(type, name)`.
    pub derived_fields: Vec<(String, String)>,
}

impl DatasetInfo {
    /// Deposit field reference for a particle type, e.g. `("deposit", "PartType0_cic")`.
    pub fn deposit_field(ptype: &str, kind: &str) -> FieldRef {
        FieldRef::compound(DEPOSIT_CATEGORY, format!("{}_{}", ptype, kind))
    }
}

/// Borrowed view of scattered samples and their values for one field.
///
/// Positions are cell centers; `pdx`/`pdy` are half-widths.
#[derive(Debug, Clone, Copy)]
pub struct SampleSet<'a> {
    pub px: &'a [f64],
    pub py: &'a [f64],
    pub pdx: &'a [f64],
    pub pdy: &'a [f64],
    pub values: &'a [f64],
}

impl<'a> SampleSet<'a> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(x, y, half_dx, half_dy, value)` tuples.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64, f64, f64)> + 'a {
        let Self {
            px,
            py,
            pdx,
            pdy,
            values,
        } = *self;
        (0..values.len()).map(move |i| (px[i], py[i], pdx[i], pdy[i], values[i]))
    }
}

/// Owned cell geometry: centers and half-widths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cells {
    pub px: Vec<f64>,
    pub py: Vec<f64>,
    pub pdx: Vec<f64>,
    pub pdy: Vec<f64>,
}

impl Cells {
    pub fn len(&self) -> usize {
        self.px.len()
    }

    pub fn is_empty(&self) -> bool {
        self.px.is_empty()
    }

    pub fn push(&mut self, x: f64, y: f64, hx: f64, hy: f64) {
        self.px.push(x);
        self.py.push(y);
        self.pdx.push(hx);
        self.pdy.push(hy);
    }

    pub fn area(&self, i: usize) -> f64 {
        4.0 * self.pdx[i] * self.pdy[i]
    }

    pub fn contains_point(&self, i: usize, x: f64, y: f64) -> bool {
        (x - self.px[i]).abs() <= self.pdx[i] && (y - self.py[i]).abs() <= self.pdy[i]
    }

    pub fn view<'a>(&'a self, values: &'a [f64]) -> SampleSet<'a> {
        SampleSet {
            px: &self.px,
            py: &self.py,
            pdx: &self.pdx,
            pdy: &self.pdy,
            values,
        }
    }
}

/// Point particles of one type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Particles {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub mass: Vec<f64>,
}

impl Particles {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
