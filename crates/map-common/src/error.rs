//! Error types for the map server.

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Primary error type for tile rendering and catalog operations.
#[derive(Debug, Error)]
pub enum MapError {
    // === Request Errors ===
    #[error("Invalid tile address {z}/{x}/{y}: {message}")]
    InvalidAddress {
        z: u32,
        x: u32,
        y: u32,
        message: String,
    },

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    // === Data Errors ===
    #[error("Invalid domain for log scale: {0}")]
    InvalidDomain(String),

    #[error("Resampling failed: {0}")]
    ResourceFault(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl MapError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            MapError::InvalidAddress { .. } => "InvalidAddress",
            MapError::InvalidParameter { .. } => "InvalidParameter",
            MapError::UnknownField(_) => "UnknownField",
            MapError::UnknownColormap(_) => "UnknownColormap",
            MapError::AssetNotFound(_) => "AssetNotFound",
            MapError::InvalidDomain(_) => "InvalidDomain",
            MapError::ResourceFault(_) => "ResourceFault",
            MapError::Internal(_) => "Internal",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            MapError::InvalidAddress { .. } | MapError::InvalidParameter { .. } => 400,

            MapError::UnknownField(_)
            | MapError::UnknownColormap(_)
            | MapError::AssetNotFound(_) => 404,

            _ => 500,
        }
    }

    pub fn invalid_parameter(param: &str, message: impl Into<String>) -> Self {
        MapError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for MapError {
    fn from(err: std::io::Error) -> Self {
        MapError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::Internal(format!("JSON error: {}", err))
    }
}
