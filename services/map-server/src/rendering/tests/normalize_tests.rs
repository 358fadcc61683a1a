//! Tests for color bounds.

use dataset::SampleSet;
use map_common::{Domain, FieldRef, MapError, TileCoord};
use test_utils::assert_approx_eq;

use crate::rendering::normalize::{color_bounds, BoundsCache, ColorBounds, PixelSizeHint};

struct Samples {
    px: Vec<f64>,
    py: Vec<f64>,
    pdx: Vec<f64>,
    pdy: Vec<f64>,
    values: Vec<f64>,
}

impl Samples {
    fn new() -> Self {
        Self {
            px: vec![],
            py: vec![],
            pdx: vec![],
            pdy: vec![],
            values: vec![],
        }
    }

    fn push(&mut self, x: f64, y: f64, h: f64, value: f64) -> &mut Self {
        self.px.push(x);
        self.py.push(y);
        self.pdx.push(h);
        self.pdy.push(h);
        self.values.push(value);
        self
    }

    fn view(&self) -> SampleSet<'_> {
        SampleSet {
            px: &self.px,
            py: &self.py,
            pdx: &self.pdx,
            pdy: &self.pdy,
            values: &self.values,
        }
    }
}

fn hint0() -> PixelSizeHint {
    PixelSizeHint::for_tile(&Domain::unit(), &TileCoord::new(0, 0, 0))
}

#[test]
fn test_hint_scales_with_zoom() {
    let domain = Domain::new([0.0, 0.0], [2.0, 1.0], 1.0).unwrap();
    let h0 = PixelSizeHint::for_tile(&domain, &TileCoord::new(0, 0, 0));
    assert_approx_eq!(h0.max_dx, 2.0);
    assert_approx_eq!(h0.min_dx, 2.0 / (64.0 * 256.0));

    let h3 = PixelSizeHint::for_tile(&domain, &TileCoord::new(3, 5, 1));
    assert_approx_eq!(h3.max_dx, 0.25);
    assert_eq!(h3, PixelSizeHint::for_tile(&domain, &TileCoord::new(3, 0, 7)));
}

#[test]
fn test_bounds_and_log_scenario() {
    let mut s = Samples::new();
    s.push(0.25, 0.25, 0.25, 1.0)
        .push(0.75, 0.25, 0.25, 10.0)
        .push(0.25, 0.75, 0.25, 100.0)
        .push(0.75, 0.75, 0.25, 50.0);

    let bounds = color_bounds(&s.view(), &Domain::unit(), hint0()).unwrap();
    assert_eq!(bounds, ColorBounds { min: 1.0, max: 100.0 });

    let log = bounds.log10().unwrap();
    assert_approx_eq!(log.min, 0.0);
    assert_approx_eq!(log.max, 2.0);
}

#[test]
fn test_skips_by_size_position_and_value() {
    let mut s = Samples::new();
    s.push(0.5, 0.5, 0.25, 5.0)
        // larger than a tile at this zoom
        .push(0.5, 0.5, 2.0, 1e6)
        // smaller than 1/64 pixel
        .push(0.5, 0.5, 1e-9, -1e6)
        // wholly outside the domain
        .push(3.0, 0.5, 0.25, 1e9)
        .push(0.5, 0.5, 0.25, f64::NAN)
        .push(0.5, 0.5, 0.25, f64::INFINITY)
        .push(0.1, 0.1, 0.05, 7.0);

    let bounds = color_bounds(&s.view(), &Domain::unit(), hint0()).unwrap();
    assert_eq!(bounds, ColorBounds { min: 5.0, max: 7.0 });
}

#[test]
fn test_sample_touching_domain_edge_counts() {
    let mut s = Samples::new();
    s.push(1.25, 0.5, 0.25, 3.0);
    let bounds = color_bounds(&s.view(), &Domain::unit(), hint0()).unwrap();
    assert_eq!(bounds, ColorBounds { min: 3.0, max: 3.0 });
}

#[test]
fn test_samples_outside_size_window_fall_back_to_all_finite() {
    // every sample is larger than a deep-zoom tile
    let mut s = Samples::new();
    s.push(0.25, 0.5, 0.25, 2.0)
        .push(0.75, 0.5, 0.25, 8.0)
        .push(0.5, 0.5, 0.25, f64::NAN)
        .push(3.0, 0.5, 0.25, 1e9);
    let deep = PixelSizeHint::for_tile(&Domain::unit(), &TileCoord::new(12, 0, 0));
    assert!(deep.max_dx < 0.25);

    let bounds = color_bounds(&s.view(), &Domain::unit(), deep).unwrap();
    assert_eq!(bounds, ColorBounds { min: 2.0, max: 8.0 });
}

#[test]
fn test_no_finite_samples_in_domain() {
    let mut s = Samples::new();
    s.push(0.5, 0.5, 0.25, f64::NAN).push(3.0, 0.5, 0.25, 1.0);
    let err = color_bounds(&s.view(), &Domain::unit(), hint0()).unwrap_err();
    assert!(matches!(err, MapError::ResourceFault(_)));

    let empty = Samples::new();
    assert!(color_bounds(&empty.view(), &Domain::unit(), hint0()).is_err());
}

#[test]
fn test_log_requires_positive_minimum() {
    let zero = ColorBounds { min: 0.0, max: 10.0 };
    assert!(matches!(zero.log10(), Err(MapError::InvalidDomain(_))));

    let negative = ColorBounds { min: -2.0, max: 10.0 };
    assert!(matches!(negative.log10(), Err(MapError::InvalidDomain(_))));

    let nan = ColorBounds { min: f64::NAN, max: 10.0 };
    assert!(nan.log10().is_err());
}

#[test]
fn test_bounds_cache() {
    let cache = BoundsCache::new();
    let field = FieldRef::compound("gas", "density");
    assert!(cache.get(&field, 2).is_none());

    cache.insert(&field, 2, ColorBounds { min: 1.0, max: 2.0 });
    assert_eq!(cache.get(&field, 2), Some(ColorBounds { min: 1.0, max: 2.0 }));
    assert!(cache.get(&field, 3).is_none());
    assert!(cache.get(&FieldRef::simple("density"), 2).is_none());
}
