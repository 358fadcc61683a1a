//! Tests for colormap construction and application.

use renderer::colormap::{
    apply_colormap, Color, Colormap, ColormapConfig, ColormapError, ColormapRegistry, LUT_SIZE,
};
use std::io::Write;

// ============================================================================
// Lookup table construction
// ============================================================================

#[test]
fn test_lut_is_monotonic_for_gray() {
    let registry = ColormapRegistry::builtin();
    let gray = registry.get("gray").unwrap();
    let mut last = 0u8;
    for i in 0..LUT_SIZE {
        let c = gray.lookup(i as f64 / (LUT_SIZE - 1) as f64);
        assert!(c.r >= last);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
        last = c.r;
    }
}

#[test]
fn test_stops_are_sorted() {
    let black = Color::new(0, 0, 0, 255);
    let white = Color::new(255, 255, 255, 255);
    let a = Colormap::from_stops("a", &[(1.0, white), (0.0, black)]).unwrap();
    let b = Colormap::from_stops("a", &[(0.0, black), (1.0, white)]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_stop_colors_hit_exactly() {
    let red = Color::new(255, 0, 0, 255);
    let blue = Color::new(0, 0, 255, 255);
    let cmap = Colormap::from_stops("rb", &[(0.0, red), (1.0, blue)]).unwrap();
    assert_eq!(cmap.lookup(0.0), red);
    assert_eq!(cmap.lookup(1.0), blue);
}

// ============================================================================
// Config loading
// ============================================================================

const CONFIG: &str = r##"{
    "version": "1.0",
    "colormaps": {
        "ice": {
            "description": "dark blue to pale cyan",
            "stops": [
                { "value": 0.0, "color": "#000033" },
                { "value": 1.0, "color": "#ccffff" }
            ]
        }
    }
}"##;

#[test]
fn test_merge_config_adds_colormap() {
    let config = ColormapConfig::from_json(CONFIG).unwrap();
    let mut registry = ColormapRegistry::builtin();
    assert_eq!(registry.merge_config(&config).unwrap(), 1);

    let ice = registry.get("ice").unwrap();
    assert_eq!(ice.lookup(0.0), Color::new(0, 0, 0x33, 255));
    assert_eq!(ice.lookup(1.0), Color::new(0xcc, 0xff, 0xff, 255));
    // Built-ins survive the merge
    assert!(registry.get("viridis").is_ok());
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    let config = ColormapConfig::from_file(file.path()).unwrap();
    assert!(config.colormaps.contains_key("ice"));
}

#[test]
fn test_config_with_bad_color_rejected() {
    let json = r##"{"version":"1.0","colormaps":{"bad":{"stops":[
        {"value":0.0,"color":"#zzzzzz"},{"value":1.0,"color":"#ffffff"}]}}}"##;
    let config = ColormapConfig::from_json(json).unwrap();
    let err = ColormapRegistry::builtin().merge_config(&config).unwrap_err();
    assert!(matches!(err, ColormapError::InvalidColor { .. }));
}

#[test]
fn test_malformed_config_is_parse_error() {
    assert!(matches!(
        ColormapConfig::from_json("{ not json"),
        Err(ColormapError::Parse(_))
    ));
}

// ============================================================================
// apply_colormap
// ============================================================================

#[test]
fn test_values_outside_bounds_are_clipped() {
    let registry = ColormapRegistry::builtin();
    let viridis = registry.get("viridis").unwrap();
    let data = [-100.0, 1.0, 100.0, 1.0e9];
    let pixels = apply_colormap(&data, 4, 1, (1.0, 100.0), viridis);

    let low = viridis.lookup(0.0);
    let high = viridis.lookup(1.0);
    assert_eq!(&pixels[0..4], &[low.r, low.g, low.b, low.a]);
    assert_eq!(&pixels[4..8], &[low.r, low.g, low.b, low.a]);
    assert_eq!(&pixels[8..12], &[high.r, high.g, high.b, high.a]);
    assert_eq!(&pixels[12..16], &[high.r, high.g, high.b, high.a]);
}

#[test]
fn test_apply_colormap_rows_in_order() {
    let registry = ColormapRegistry::builtin();
    let gray = registry.get("gray").unwrap();
    // 3 rows x 2 columns, rising by row
    let data = [0.0, 0.0, 0.5, 0.5, 1.0, 1.0];
    let pixels = apply_colormap(&data, 2, 3, (0.0, 1.0), gray);
    assert_eq!(pixels.len(), 2 * 3 * 4);
    assert_eq!(pixels[0], 0);
    assert_eq!(pixels[2 * 4], 128);
    assert_eq!(pixels[4 * 4], 255);
}

#[test]
fn test_short_data_leaves_transparent_tail() {
    let registry = ColormapRegistry::builtin();
    let gray = registry.get("gray").unwrap();
    let pixels = apply_colormap(&[1.0], 2, 1, (0.0, 1.0), gray);
    assert_eq!(&pixels[4..8], &[0, 0, 0, 0]);
}
