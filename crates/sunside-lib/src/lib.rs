//! Sunside library entry points.
//!
//! This crate computes which side of a vehicle the sun falls on along a route.
//! It exposes the solar position model, great-circle helpers, route loading
//! and the sun-exposure segmenter. Higher-level consumers (the CLI, map
//! front ends) should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod clock;
pub mod error;
pub mod exposure;
pub mod geo;
pub mod output;
pub mod route;
pub mod solar;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use clock::{parse_start_time, TravelClock};
pub use error::{Error, Result};
pub use exposure::{
    analyze_exposure, side_runs, ExposureReport, ExposureTally, SegmentRecord, SegmenterConfig,
    SideRun, SunSide, DEFAULT_SPEED_KMH, HORIZON_THRESHOLD_DEG,
};
pub use geo::{
    densify, haversine_distance_km, initial_bearing, intermediate_point, relative_angle,
    segment_duration_ms, Coordinate, EARTH_RADIUS_KM,
};
pub use output::{Exposure, ExposureRenderMode, ExposureSummary};
pub use route::{FileRoute, Route, RouteSource, StraightLine};
pub use solar::{sun_position, SunSample};
