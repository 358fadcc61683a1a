//! HTTP request handlers.
//!
//! - `tiles`: rendered PNG tiles
//! - `index`: map page, field selection and the field catalog
//! - `assets`: static files
//! - `metrics`: health and Prometheus endpoints
//! - `common`: error responses and parameter parsing

pub mod assets;
pub mod common;
pub mod index;
pub mod metrics;
pub mod tiles;

pub use assets::{content_type_for, static_handler};
pub use common::{error_response, ApiError};
pub use index::{field_handler, index_handler, list_handler};
pub use metrics::{health_handler, metrics_handler};
pub use tiles::tile_handler;
