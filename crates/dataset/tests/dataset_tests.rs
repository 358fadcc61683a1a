//! Integration tests for file-backed and synthetic datasets.

use std::io::Write;

use dataset::{synthetic, Dataset, DatasetError, DatasetInfo, InMemoryDataset};
use map_common::{BoundingBox, FieldRef};
use test_utils::assert_approx_eq;

const TWO_CELLS: &str = r#"{
    "domain": { "left_edge": [0.0, 0.0], "right_edge": [2.0, 1.0] },
    "cells": {
        "px": [0.5, 1.5],
        "py": [0.5, 0.5],
        "pdx": [0.5, 0.5],
        "pdy": [0.5, 0.5]
    },
    "fields": { "gas": { "density": [1.0, 3.0] } },
    "particles": { "stars": { "x": [0.25, 0.75, 1.5], "y": [0.5, 0.5, 0.5], "mass": [1.0, 1.0, 4.0] } }
}"#;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(TWO_CELLS.as_bytes()).unwrap();

    let ds = InMemoryDataset::from_file(file.path()).unwrap();
    assert_eq!(ds.cell_count(), 2);
    assert_eq!(ds.info().domain.right_edge, [2.0, 1.0]);
    assert_eq!(ds.info().domain.length_unit_cm, 1.0);
    assert_eq!(ds.info().fluid_types, vec!["gas".to_string()]);
}

#[test]
fn test_missing_file_is_io_error() {
    let result = InMemoryDataset::from_file("/nonexistent/dataset.json");
    assert!(matches!(result, Err(DatasetError::Io(_))));
}

#[test]
fn test_malformed_json_is_parse_error() {
    assert!(matches!(
        InMemoryDataset::from_json("{ not json"),
        Err(DatasetError::Parse(_))
    ));
}

#[test]
fn test_pixelize_whole_domain() {
    let mut ds = InMemoryDataset::from_json(TWO_CELLS).unwrap();
    let bbox = BoundingBox::new(0.0, 0.0, 2.0, 1.0);
    let image = ds
        .pixelize(&FieldRef::simple("density"), &bbox, 4, 2)
        .unwrap();
    assert_eq!(image.len(), 8);
    for row in image.chunks(4) {
        assert_approx_eq!(row[0], 1.0);
        assert_approx_eq!(row[1], 1.0);
        assert_approx_eq!(row[2], 3.0);
        assert_approx_eq!(row[3], 3.0);
    }
}

#[test]
fn test_pixelize_straddling_pixel_is_area_weighted() {
    let mut ds = InMemoryDataset::from_json(TWO_CELLS).unwrap();
    let bbox = BoundingBox::new(0.5, 0.0, 1.5, 1.0);
    let image = ds
        .pixelize(&FieldRef::compound("gas", "density"), &bbox, 1, 1)
        .unwrap();
    assert_approx_eq!(image[0], 2.0);
}

#[test]
fn test_pixelize_outside_cells_is_zero() {
    let mut ds = InMemoryDataset::from_json(TWO_CELLS).unwrap();
    let bbox = BoundingBox::new(5.0, 5.0, 6.0, 6.0);
    let image = ds
        .pixelize(&FieldRef::simple("density"), &bbox, 2, 2)
        .unwrap();
    assert!(image.iter().all(|v| *v == 0.0));
}

#[test]
fn test_unknown_field() {
    let mut ds = InMemoryDataset::from_json(TWO_CELLS).unwrap();
    let bbox = BoundingBox::new(0.0, 0.0, 2.0, 1.0);
    let result = ds.pixelize(&FieldRef::simple("pressure"), &bbox, 2, 2);
    assert!(matches!(result, Err(DatasetError::UnknownField(_))));
}

#[test]
fn test_deposit_fields() {
    let mut ds = InMemoryDataset::from_json(TWO_CELLS).unwrap();

    let cic = DatasetInfo::deposit_field("stars", "cic");
    assert_eq!(ds.samples(&cic).unwrap().values, &[2.0, 4.0]);

    let density = DatasetInfo::deposit_field("stars", "density");
    let samples = ds.samples(&density).unwrap();
    assert_approx_eq!(samples.values[0], 2.0);
    assert_approx_eq!(samples.values[1], 4.0);
}

#[test]
fn test_synthetic_dataset() {
    let mut ds = synthetic(3).unwrap();
    assert_eq!(ds.info().particle_types, vec!["PartType0".to_string()]);
    assert_eq!(ds.info().fluid_types, vec!["gas".to_string()]);
    assert_approx_eq!(ds.info().domain.width_in(map_common::DisplayUnit::Kpc), 1000.0, 1e-6);

    let density = ds.samples(&FieldRef::simple("density")).unwrap();
    assert!(density.values.iter().all(|v| *v >= 1.0));

    let deposit = DatasetInfo::deposit_field("PartType0", "cic");
    let total: f64 = ds.samples(&deposit).unwrap().values.iter().sum();
    assert!(total > 1000.0);

    let bbox = ds.info().domain.bbox();
    let image = ds
        .pixelize(&FieldRef::simple("temperature"), &bbox, 32, 32)
        .unwrap();
    assert!(image.iter().all(|v| *v > 0.0));
}
