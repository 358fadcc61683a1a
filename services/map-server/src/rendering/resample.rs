//! Tile resampling through the dataset's pixelization primitive.

use dataset::{Dataset, DatasetError};
use map_common::{BoundingBox, FieldRef, MapError, MapResult};
use tracing::debug;

/// Fixed-resolution raster of field values, row-major.
///
/// Row 0 lies on the lower y edge of the box it was sampled from.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub data: Vec<f64>,
    pub width: usize,
    pub height: usize,
}

/// Pixelize `field` over `bbox` at `width x height`.
///
/// Takes the dataset mutably, which callers only get while holding the
/// dataset gate.
pub fn resample_tile(
    dataset: &mut dyn Dataset,
    field: &FieldRef,
    bbox: &BoundingBox,
    width: usize,
    height: usize,
) -> MapResult<Grid> {
    if width == 0 || height == 0 {
        return Err(MapError::invalid_parameter(
            "tile_size",
            format!("resolution {}x{} has no pixels", width, height),
        ));
    }

    let data = dataset
        .pixelize(field, bbox, width, height)
        .map_err(|e| match e {
            DatasetError::UnknownField(name) => MapError::UnknownField(name),
            other => MapError::ResourceFault(other.to_string()),
        })?;

    if data.len() != width * height {
        return Err(MapError::ResourceFault(format!(
            "pixelization returned {} values for a {}x{} tile",
            data.len(),
            width,
            height
        )));
    }

    debug!(field = %field, width, height, "Resampled tile");
    Ok(Grid {
        data,
        width,
        height,
    })
}
