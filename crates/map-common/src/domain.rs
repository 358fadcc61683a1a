//! Physical extent of a dataset.

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, DisplayUnit, MapError, MapResult};

/// Axis-aligned domain of a dataset in code length units.
///
/// Immutable for the lifetime of a dataset handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Left edge per axis (x, y)
    pub left_edge: [f64; 2],
    /// Right edge per axis (x, y)
    pub right_edge: [f64; 2],
    /// Centimetres per code length unit
    #[serde(default = "default_length_unit_cm")]
    pub length_unit_cm: f64,
}

fn default_length_unit_cm() -> f64 {
    1.0
}

impl Domain {
    pub fn new(left_edge: [f64; 2], right_edge: [f64; 2], length_unit_cm: f64) -> MapResult<Self> {
        let domain = Self {
            left_edge,
            right_edge,
            length_unit_cm,
        };
        domain.validate()?;
        Ok(domain)
    }

    /// Unit square [0,1]x[0,1] measured in centimetres.
    pub fn unit() -> Self {
        Self {
            left_edge: [0.0, 0.0],
            right_edge: [1.0, 1.0],
            length_unit_cm: 1.0,
        }
    }

    pub fn validate(&self) -> MapResult<()> {
        for axis in 0..2 {
            let (l, r) = (self.left_edge[axis], self.right_edge[axis]);
            if !l.is_finite() || !r.is_finite() || r <= l {
                return Err(MapError::invalid_parameter(
                    "domain",
                    format!("axis {} has empty or non-finite extent [{}, {}]", axis, l, r),
                ));
            }
        }
        if !(self.length_unit_cm > 0.0) {
            return Err(MapError::invalid_parameter(
                "domain",
                format!("length unit must be positive, got {}", self.length_unit_cm),
            ));
        }
        Ok(())
    }

    /// Domain width per axis in code units.
    pub fn width(&self) -> [f64; 2] {
        [
            self.right_edge[0] - self.left_edge[0],
            self.right_edge[1] - self.left_edge[1],
        ]
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.left_edge[0],
            self.left_edge[1],
            self.right_edge[0],
            self.right_edge[1],
        )
    }

    /// Width along x expressed in a display unit.
    pub fn width_in(&self, unit: DisplayUnit) -> f64 {
        unit.from_cm(self.width()[0] * self.length_unit_cm)
    }
}
