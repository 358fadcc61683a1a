//! Common types shared across the map server workspace.

pub mod bbox;
pub mod domain;
pub mod error;
pub mod field;
pub mod tile;
pub mod units;

pub use bbox::BoundingBox;
pub use domain::Domain;
pub use error::{MapError, MapResult};
pub use field::FieldRef;
pub use tile::{tile_bounds, TileCoord, MAX_ZOOM};
pub use units::DisplayUnit;
