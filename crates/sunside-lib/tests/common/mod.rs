#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use sunside_lib::Coordinate;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .expect("valid timestamp")
}

/// Fifteen due-east segments along 51.5°N through central London.
pub fn eastbound() -> Vec<Coordinate> {
    (0..16)
        .map(|i| Coordinate::new(51.5, -0.2 + 0.02 * i as f64))
        .collect()
}

/// Clockwise-from-east rectangle: east, north, west, south.
pub fn city_loop() -> Vec<Coordinate> {
    vec![
        Coordinate::new(51.50, -0.10),
        Coordinate::new(51.50, -0.05),
        Coordinate::new(51.53, -0.05),
        Coordinate::new(51.53, -0.10),
        Coordinate::new(51.50, -0.10),
    ]
}
