//! Great-circle geometry on a spherical Earth.
//!
//! This module provides the coordinate type shared across the crate together
//! with the forward-azimuth bearing, haversine distance, constant-speed
//! duration estimate and great-circle interpolation used by the segmenter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Earth mean radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Milliseconds in one hour.
pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Upper bound on the number of points [`densify`] will generate.
pub const MAX_DENSIFY_POINTS: usize = 100_000;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    #[serde(alias = "lon")]
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Check that both components are finite and inside the valid ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(Error::invalid_route(format!(
                "coordinate ({}, {}) is not finite",
                self.lat, self.lng
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::invalid_route(format!(
                "latitude {} is outside [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::invalid_route(format!(
                "longitude {} is outside [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

/// Parse `"lat,lng"` (whitespace around either number is ignored).
impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (lat, lng) = s.split_once(',').ok_or_else(|| {
            Error::invalid_route(format!("expected 'LAT,LNG' but got '{s}'"))
        })?;
        let parse = |part: &str, label: &str| {
            part.trim().parse::<f64>().map_err(|_| {
                Error::invalid_route(format!("{label} '{}' is not a number", part.trim()))
            })
        };
        let coordinate = Coordinate::new(parse(lat, "latitude")?, parse(lng, "longitude")?);
        coordinate.validate()?;
        Ok(coordinate)
    }
}

/// Fold an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed angle from `heading_deg` to `azimuth_deg`, folded into `(-180, 180]`.
///
/// Positive values lie clockwise of the heading (the right-hand side of a
/// vehicle travelling along it), zero and negative values counter-clockwise.
pub fn relative_angle(azimuth_deg: f64, heading_deg: f64) -> f64 {
    let angle = normalize_degrees(azimuth_deg - heading_deg);
    if angle > 180.0 {
        angle - 360.0
    } else {
        angle
    }
}

/// Initial compass heading from `from` to `to`, clockwise from north in `[0, 360)`.
///
/// Identical points yield `0.0`.
pub fn initial_bearing(from: &Coordinate, to: &Coordinate) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let delta_lambda = (to.lng - from.lng).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Great-circle distance in kilometres using the haversine formula.
pub fn haversine_distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    EARTH_RADIUS_KM * angular_distance(a, b)
}

fn angular_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    2.0 * h.sqrt().min(1.0).asin()
}

/// Estimated traversal time in milliseconds at a constant `speed_kmh`.
///
/// The caller is responsible for passing a positive, finite speed (see
/// [`SegmenterConfig::validate`](crate::SegmenterConfig::validate)).
pub fn segment_duration_ms(from: &Coordinate, to: &Coordinate, speed_kmh: f64) -> f64 {
    haversine_distance_km(from, to) / speed_kmh * MILLIS_PER_HOUR
}

/// Point at `fraction` (0.0 = `a`, 1.0 = `b`) along the great circle from `a` to `b`.
pub fn intermediate_point(a: &Coordinate, b: &Coordinate, fraction: f64) -> Coordinate {
    let delta = angular_distance(a, b);
    let sin_delta = delta.sin();
    if sin_delta.abs() < f64::EPSILON {
        // Coincident points (antipodes are rejected by `densify`)
        return *a;
    }

    let phi1 = a.lat.to_radians();
    let lambda1 = a.lng.to_radians();
    let phi2 = b.lat.to_radians();
    let lambda2 = b.lng.to_radians();

    let weight_a = ((1.0 - fraction) * delta).sin() / sin_delta;
    let weight_b = (fraction * delta).sin() / sin_delta;

    let x = weight_a * phi1.cos() * lambda1.cos() + weight_b * phi2.cos() * lambda2.cos();
    let y = weight_a * phi1.cos() * lambda1.sin() + weight_b * phi2.cos() * lambda2.sin();
    let z = weight_a * phi1.sin() + weight_b * phi2.sin();

    Coordinate::new(
        z.atan2((x * x + y * y).sqrt()).to_degrees(),
        y.atan2(x).to_degrees(),
    )
}

/// Sample the great circle from `a` to `b` so that consecutive points are at
/// most `step_km` apart. Both endpoints are always included.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] for a non-positive step or when the
/// result would exceed [`MAX_DENSIFY_POINTS`], and [`Error::InvalidRoute`]
/// for invalid or antipodal endpoints.
pub fn densify(a: &Coordinate, b: &Coordinate, step_km: f64) -> Result<Vec<Coordinate>> {
    if !step_km.is_finite() || step_km <= 0.0 {
        return Err(Error::InvalidConfig {
            message: format!("densify step must be a positive number of km, got {step_km}"),
        });
    }
    a.validate()?;
    b.validate()?;

    let delta = angular_distance(a, b);
    if delta > 0.0 && delta.sin().abs() < 1e-12 {
        return Err(Error::invalid_route(format!(
            "endpoints {a} and {b} are antipodal; the great circle between them is undefined"
        )));
    }

    let distance = EARTH_RADIUS_KM * delta;
    let pieces = (distance / step_km).ceil().max(1.0);
    if pieces >= MAX_DENSIFY_POINTS as f64 {
        return Err(Error::InvalidConfig {
            message: format!(
                "a {step_km} km step over {distance:.1} km would exceed {MAX_DENSIFY_POINTS} points"
            ),
        });
    }
    let pieces = pieces as usize;

    let mut points = Vec::with_capacity(pieces + 1);
    points.push(*a);
    for i in 1..pieces {
        points.push(intermediate_point(a, b, i as f64 / pieces as f64));
    }
    points.push(*b);
    Ok(points)
}
