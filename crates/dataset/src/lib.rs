//! Scattered-sample datasets for the map server.
//!
//! A [`Dataset`] exposes scalar fields sampled on rectangular cells and can
//! pixelize any of them onto a fixed-resolution grid. Implementations cache
//! derived data, so field access takes `&mut self` and callers serialize it.

pub mod deposit;
pub mod error;
pub mod index;
pub mod memory;
pub mod pixelize;
pub mod synthetic;
pub mod types;

use map_common::{BoundingBox, FieldRef};

pub use deposit::DepositKind;
pub use error::{DatasetError, Result};
pub use index::BinIndex;
pub use memory::{DatasetFile, InMemoryDataset};
pub use synthetic::synthetic;
pub use types::{Cells, DatasetInfo, Particles, SampleSet, DEPOSIT_CATEGORY, DEPOSIT_KINDS};

/// A loaded dataset handle.
///
/// Not safe for concurrent use; share it behind an exclusive gate.
pub trait Dataset: Send {
    /// Domain and field metadata.
    fn info(&self) -> &DatasetInfo;

    /// Whether `field` resolves against this dataset.
    fn has_field(&self, field: &FieldRef) -> bool;

    /// Every sample of `field` with its geometry.
    fn samples(&mut self, field: &FieldRef) -> Result<SampleSet<'_>>;

    /// Rasterize `field` over `bbox` at `width x height`, row 0 at `bbox.min_y`.
    fn pixelize(
        &mut self,
        field: &FieldRef,
        bbox: &BoundingBox,
        width: usize,
        height: usize,
    ) -> Result<Vec<f64>>;
}
