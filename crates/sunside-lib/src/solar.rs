//! Low-precision solar ephemeris.
//!
//! This module computes the sun's horizontal coordinates (azimuth and
//! altitude) for an observer at a given instant. It uses a first-order series
//! for the ecliptic longitude with a constant obliquity, which is accurate to
//! well under a degree and plenty for telling left from right.
//!
//! The computation is a pure function of `(instant, coordinate)`; nothing is
//! cached between calls.

use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::{normalize_degrees, Coordinate};

/// Physical and epoch constants for the solar model.
pub mod constants {
    /// Milliseconds in one day.
    pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

    /// Julian date of the Unix epoch (1970-01-01T00:00:00Z), at noon.
    pub const JULIAN_1970: f64 = 2_440_588.0;

    /// Julian date of epoch J2000.0.
    pub const JULIAN_2000: f64 = 2_451_545.0;

    /// Obliquity of the ecliptic in degrees, held constant.
    pub const OBLIQUITY_DEG: f64 = 23.4397;

    /// Longitude of Earth's perihelion in degrees.
    pub const PERIHELION_DEG: f64 = 102.9372;
}

use constants::*;

/// Position of the sun in the observer's sky.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunSample {
    /// Degrees clockwise from north, in `[0, 360)`.
    pub azimuth: f64,
    /// Degrees above (positive) or below (negative) the astronomical horizon.
    pub altitude: f64,
}

impl SunSample {
    /// Whether the sun's altitude is strictly above `horizon_deg`.
    pub fn is_above(&self, horizon_deg: f64) -> bool {
        self.altitude > horizon_deg
    }
}

/// Days (fractional) elapsed since J2000.0 for `instant`.
pub fn days_since_j2000(instant: &DateTime<Utc>) -> f64 {
    let millis = instant.timestamp_millis() as f64;
    millis / MILLIS_PER_DAY - 0.5 + JULIAN_1970 - JULIAN_2000
}

/// Equatorial coordinates of the sun in radians.
struct Equatorial {
    declination: f64,
    right_ascension: f64,
}

fn solar_mean_anomaly(days: f64) -> f64 {
    (357.5291 + 0.985_600_28 * days).to_radians()
}

fn ecliptic_longitude(mean_anomaly: f64) -> f64 {
    let m = mean_anomaly;
    let centre =
        (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin()).to_radians();
    m + centre + PERIHELION_DEG.to_radians() + PI
}

fn sun_equatorial(days: f64) -> Equatorial {
    let longitude = ecliptic_longitude(solar_mean_anomaly(days));
    let obliquity = OBLIQUITY_DEG.to_radians();
    // The sun sits on the ecliptic, so its ecliptic latitude is zero.
    Equatorial {
        declination: (obliquity.sin() * longitude.sin()).asin(),
        right_ascension: (longitude.sin() * obliquity.cos()).atan2(longitude.cos()),
    }
}

/// Local sidereal time in radians for an observer at `longitude_deg` (east positive).
fn sidereal_time(days: f64, longitude_deg: f64) -> f64 {
    (280.16 + 360.985_623_5 * days).to_radians() + longitude_deg.to_radians()
}

/// Compute the sun's azimuth and altitude for `at` as seen from `instant`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use sunside_lib::{sun_position, Coordinate};
///
/// let noon = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
/// let sun = sun_position(&noon, &Coordinate::new(51.5, -0.09));
/// assert!(sun.altitude > 60.0);
/// assert!((sun.azimuth - 180.0).abs() < 3.0);
/// ```
pub fn sun_position(instant: &DateTime<Utc>, at: &Coordinate) -> SunSample {
    let days = days_since_j2000(instant);
    let sun = sun_equatorial(days);

    let phi = at.lat.to_radians();
    let hour_angle = sidereal_time(days, at.lng) - sun.right_ascension;

    // Azimuth measured from south, positive westward; rotated to north-based below.
    let azimuth_south = hour_angle
        .sin()
        .atan2(hour_angle.cos() * phi.sin() - sun.declination.tan() * phi.cos());
    let altitude = (phi.sin() * sun.declination.sin()
        + phi.cos() * sun.declination.cos() * hour_angle.cos())
    .asin();

    SunSample {
        azimuth: normalize_degrees(azimuth_south.to_degrees() + 180.0),
        altitude: altitude.to_degrees(),
    }
}

/// Solar declination in degrees for `instant`.
pub fn declination(instant: &DateTime<Utc>) -> f64 {
    sun_equatorial(days_since_j2000(instant))
        .declination
        .to_degrees()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .expect("valid timestamp")
    }

    const LONDON: Coordinate = Coordinate::new(51.5, -0.09);

    #[test]
    fn j2000_epoch_is_day_zero() {
        let epoch = utc(2000, 1, 1, 12, 0);
        assert!(days_since_j2000(&epoch).abs() < 1e-9);
    }

    #[test]
    fn declination_follows_the_seasons() {
        assert!((declination(&utc(2024, 6, 21, 12, 0)) - 23.44).abs() < 0.1);
        assert!((declination(&utc(2024, 12, 21, 12, 0)) + 23.44).abs() < 0.1);
        assert!(declination(&utc(2024, 3, 20, 6, 0)).abs() < 0.5);
    }

    #[test]
    fn london_summer_solstice_noon() {
        let sun = sun_position(&utc(2024, 6, 21, 12, 0), &LONDON);
        assert!((sun.altitude - 61.9).abs() < 0.5, "altitude {}", sun.altitude);
        assert!((sun.azimuth - 178.8).abs() < 1.0, "azimuth {}", sun.azimuth);
    }

    #[test]
    fn london_summer_morning_and_evening() {
        let morning = sun_position(&utc(2024, 6, 21, 8, 0), &LONDON);
        assert!(morning.azimuth > 90.0 && morning.azimuth < 105.0);
        assert!(morning.altitude > 30.0);

        let evening = sun_position(&utc(2024, 6, 21, 18, 30), &LONDON);
        assert!(evening.azimuth > 285.0 && evening.azimuth < 295.0);
        assert!(evening.altitude > 10.0 && evening.altitude < 18.0);
    }

    #[test]
    fn london_winter_midnight_is_dark() {
        let sun = sun_position(&utc(2024, 1, 15, 0, 0), &LONDON);
        assert!(sun.altitude < -50.0, "altitude {}", sun.altitude);
        assert!(!sun.is_above(-0.833));
    }

    #[test]
    fn southern_hemisphere_noon_sun_is_north() {
        let sydney = Coordinate::new(-33.87, 151.21);
        // 13:00 local daylight time.
        let sun = sun_position(&utc(2024, 12, 21, 2, 0), &sydney);
        assert!(sun.altitude > 75.0);
        assert!(sun.azimuth > 340.0 || sun.azimuth < 20.0, "azimuth {}", sun.azimuth);
    }

    #[test]
    fn equinox_sunrise_on_the_equator_is_due_east() {
        let sun = sun_position(&utc(2024, 3, 20, 6, 0), &Coordinate::new(0.0, 0.0));
        assert!((sun.azimuth - 90.0).abs() < 1.0);
        assert!(sun.altitude.abs() < 3.0);
    }

    #[test]
    fn azimuth_is_always_normalized() {
        for hour in 0..24 {
            let sun = sun_position(&utc(2024, 9, 1, hour, 0), &LONDON);
            assert!((0.0..360.0).contains(&sun.azimuth));
            assert!((-90.0..=90.0).contains(&sun.altitude));
        }
    }

    #[test]
    fn position_is_deterministic() {
        let t = utc(2023, 4, 2, 15, 45);
        assert_eq!(sun_position(&t, &LONDON), sun_position(&t, &LONDON));
    }
}
