//! Error types for dataset access.

use thiserror::Error;

/// Errors raised by datasets and the pixelization primitive.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The field is not known to the dataset.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Array lengths in a dataset description disagree.
    #[error("array '{name}' has {actual} entries, expected {expected}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Requested output resolution is unusable.
    #[error("invalid resolution {width}x{height}")]
    InvalidResolution { width: usize, height: usize },

    /// Dataset description is inconsistent.
    #[error("invalid dataset: {0}")]
    Invalid(String),

    /// Storage/IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset file could not be parsed.
    #[error("failed to parse dataset file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

impl From<DatasetError> for map_common::MapError {
    fn from(err: DatasetError) -> Self {
        use map_common::MapError;
        match err {
            DatasetError::UnknownField(field) => MapError::UnknownField(field),
            DatasetError::InvalidResolution { .. } => {
                MapError::invalid_parameter("tile_size", err.to_string())
            }
            other => MapError::ResourceFault(other.to_string()),
        }
    }
}
