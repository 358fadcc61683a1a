//! Tests for PNG encoding functionality.
//!
//! Encoded images are decoded again with the `image` crate to check that
//! the output is a valid PNG with the expected pixels.

use renderer::png::{encode_indexed, encode_png, encode_rgba, Palette};
use test_utils::PNG_SIGNATURE;

// ============================================================================
// Helper functions
// ============================================================================

/// Generate tile-like pixel data with a limited palette
fn generate_banded_pixels(width: usize, height: usize, bands: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for _x in 0..width {
            let band = (y * bands / height) as u8;
            pixels.extend_from_slice(&[band * 10, 255 - band * 10, 128, 255]);
        }
    }
    pixels
}

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .expect("valid PNG")
        .to_rgba8()
}

// ============================================================================
// Basic encoding
// ============================================================================

#[test]
fn test_encode_png_signature() {
    let pixels = [
        255, 0, 0, 255, // red
        0, 255, 0, 255, // green
        0, 255, 0, 255, // green
        255, 0, 0, 255, // red
    ];
    let png = encode_png(&pixels, 2, 2).unwrap();
    assert_eq!(&png[0..8], &PNG_SIGNATURE);
}

#[test]
fn test_indexed_round_trip_pixels() {
    let pixels = generate_banded_pixels(16, 16, 8);
    let png = encode_png(&pixels, 16, 16).unwrap();
    let decoded = decode(&png);
    assert_eq!(decoded.dimensions(), (16, 16));
    assert_eq!(decoded.into_raw(), pixels);
}

#[test]
fn test_transparency_preserved() {
    let pixels = [
        255, 0, 0, 255, // red, opaque
        0, 0, 0, 0, // transparent
        0, 255, 0, 128, // green, semi-transparent
        0, 0, 255, 255, // blue, opaque
    ];
    let png = encode_png(&pixels, 2, 2).unwrap();
    assert_eq!(decode(&png).into_raw(), pixels.to_vec());
}

#[test]
fn test_rgba_fallback_many_colors() {
    let mut pixels = Vec::with_capacity(300 * 4);
    for i in 0..300u32 {
        pixels.extend_from_slice(&[(i % 256) as u8, (i / 256) as u8, 7, 255]);
    }
    assert!(Palette::extract(&pixels).is_none());

    let png = encode_png(&pixels, 300, 1).unwrap();
    assert_eq!(decode(&png).into_raw(), pixels);
}

// ============================================================================
// Format selection and determinism
// ============================================================================

#[test]
fn test_indexed_smaller_than_rgba() {
    let pixels = generate_banded_pixels(64, 64, 20);
    let palette = Palette::extract(&pixels).unwrap();
    let indexed = encode_indexed(&palette, 64, 64).unwrap();
    let rgba = encode_rgba(&pixels, 64, 64).unwrap();
    assert!(
        indexed.len() < rgba.len(),
        "Indexed PNG ({} bytes) should be smaller than RGBA ({} bytes)",
        indexed.len(),
        rgba.len()
    );
}

#[test]
fn test_encoding_is_deterministic() {
    let pixels = generate_banded_pixels(256, 256, 25);
    let a = encode_png(&pixels, 256, 256).unwrap();
    let b = encode_png(&pixels, 256, 256).unwrap();
    assert_eq!(a, b);
}
