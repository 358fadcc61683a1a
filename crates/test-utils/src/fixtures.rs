//! Common test fixtures for map server tests.

/// Domains used across the suite, as `(left, right)` edges per axis.
pub mod domains {
    /// Unit square
    pub const UNIT: ([f64; 2], [f64; 2]) = ([0.0, 0.0], [1.0, 1.0]);

    /// Off-origin, non-square domain
    pub const SKEWED: ([f64; 2], [f64; 2]) = ([-3.5, 2.0], [4.5, 10.0]);

    /// Large, strongly anisotropic domain
    pub const WIDE: ([f64; 2], [f64; 2]) = ([0.0, 0.0], [1.0e3, 250.0]);

    pub const ALL: [([f64; 2], [f64; 2]); 3] = [UNIT, SKEWED, WIDE];
}

/// Bytes of the PNG signature, every encoded tile starts with them.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Minimal map page used by static-asset tests.
pub const INDEX_HTML: &str = "<!DOCTYPE html><html><body><div id=\"map\"></div></body></html>";
