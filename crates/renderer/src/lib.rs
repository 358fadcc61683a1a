//! Image rendering for scalar field tiles.
//!
//! - Colormap lookup tables and value-to-RGBA mapping
//! - PNG encoding (indexed or RGBA)

pub mod colormap;
pub mod png;

pub use colormap::{apply_colormap, Color, Colormap, ColormapConfig, ColormapError, ColormapRegistry};
pub use png::{encode_png, PngError};
