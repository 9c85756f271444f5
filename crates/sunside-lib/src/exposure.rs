//! Sun-exposure segmentation.
//!
//! Walks a route segment by segment at a constant assumed speed and decides,
//! for each segment, whether the sun shines in from the left, from the right,
//! or is below the horizon. Solar position is evaluated at the *start* of
//! every segment, using the travel time accumulated over all earlier
//! segments.
//!
//! Side convention: the relative angle `sun azimuth - heading` is folded into
//! `(-180, 180]`. Strictly positive angles are [`SunSide::Right`]; zero and
//! negative angles are [`SunSide::Left`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::clock::TravelClock;
use crate::error::{Error, Result};
use crate::geo::{
    haversine_distance_km, initial_bearing, relative_angle, segment_duration_ms, Coordinate,
    MILLIS_PER_HOUR,
};
use crate::solar::{sun_position, SunSample};

/// Default assumed average speed in km/h.
pub const DEFAULT_SPEED_KMH: f64 = 50.0;

/// Solar altitude (degrees) at or below which the sun counts as set.
///
/// Accounts for atmospheric refraction and the radius of the solar disk.
pub const HORIZON_THRESHOLD_DEG: f64 = -0.833;

/// Segmenter configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmenterConfig {
    /// Assumed constant travel speed in km/h.
    pub speed_kmh: f64,
    /// Altitude threshold for "sun is up", in degrees.
    pub horizon_deg: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            horizon_deg: HORIZON_THRESHOLD_DEG,
        }
    }
}

impl SegmenterConfig {
    /// Configuration with the default horizon and a custom speed.
    pub fn with_speed(speed_kmh: f64) -> Self {
        Self {
            speed_kmh,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.speed_kmh.is_finite() || self.speed_kmh <= 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "speed must be a positive number of km/h, got {}",
                    self.speed_kmh
                ),
            });
        }
        if !self.horizon_deg.is_finite() || !(-90.0..=90.0).contains(&self.horizon_deg) {
            return Err(Error::InvalidConfig {
                message: format!(
                    "horizon must be between -90 and 90 degrees, got {}",
                    self.horizon_deg
                ),
            });
        }
        Ok(())
    }
}

/// Which side of the vehicle the sun is on during a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SunSide {
    Left,
    Right,
    /// Sun at or below the horizon threshold.
    NoSun,
}

impl SunSide {
    /// Classify a sun sample against a travel heading.
    pub fn classify(sun: &SunSample, heading_deg: f64, horizon_deg: f64) -> Self {
        if !sun.is_above(horizon_deg) {
            SunSide::NoSun
        } else if relative_angle(sun.azimuth, heading_deg) > 0.0 {
            SunSide::Right
        } else {
            SunSide::Left
        }
    }

    /// Human-readable label shown in textual renderings.
    pub fn label(self) -> &'static str {
        match self {
            SunSide::Left => "left",
            SunSide::Right => "right",
            SunSide::NoSun => "no sun",
        }
    }

    /// Stroke colour used when drawing the segment on a map.
    pub fn color_hex(self) -> &'static str {
        match self {
            SunSide::Left => "#ff9f1c",
            SunSide::Right => "#e71d36",
            SunSide::NoSun => "#6c757d",
        }
    }

    /// The side facing away from the sun, if the sun is up.
    pub fn opposite(self) -> Option<SunSide> {
        match self {
            SunSide::Left => Some(SunSide::Right),
            SunSide::Right => Some(SunSide::Left),
            SunSide::NoSun => None,
        }
    }
}

impl fmt::Display for SunSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classified span between route points `index` and `index + 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRecord {
    /// Index of the segment's first point in the route.
    pub index: usize,
    pub from: Coordinate,
    pub to: Coordinate,
    pub side: SunSide,
    pub distance_km: f64,
    pub duration_ms: f64,
    /// Travel time elapsed before this segment starts.
    pub start_offset_ms: f64,
    /// Instant at which the sun sample was taken.
    pub start_time: DateTime<Utc>,
    pub heading_deg: f64,
    pub sun: SunSample,
    /// Sun azimuth relative to the heading, in `(-180, 180]`.
    pub relative_angle_deg: f64,
}

/// Accumulated time per side, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ExposureTally {
    pub left_ms: f64,
    pub right_ms: f64,
    pub no_sun_ms: f64,
}

impl ExposureTally {
    fn record(&mut self, side: SunSide, duration_ms: f64) {
        match side {
            SunSide::Left => self.left_ms += duration_ms,
            SunSide::Right => self.right_ms += duration_ms,
            SunSide::NoSun => self.no_sun_ms += duration_ms,
        }
    }

    /// Time with the sun above the horizon on either side.
    pub fn sun_ms(&self) -> f64 {
        self.left_ms + self.right_ms
    }

    /// Rounded `(left, right)` percentages of sun time; `(0, 0)` in darkness.
    pub fn percentages(&self) -> (u8, u8) {
        let total = self.sun_ms();
        if total <= 0.0 {
            return (0, 0);
        }
        let left = (100.0 * self.left_ms / total).round().clamp(0.0, 100.0) as u8;
        (left, 100 - left)
    }
}

/// Result of one segmenter pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureReport {
    pub start_time: DateTime<Utc>,
    pub speed_kmh: f64,
    pub segments: Vec<SegmentRecord>,
    pub tally: ExposureTally,
    pub total_distance_km: f64,
    pub total_duration_ms: f64,
}

impl ExposureReport {
    pub fn left_percent(&self) -> u8 {
        self.tally.percentages().0
    }

    pub fn right_percent(&self) -> u8 {
        self.tally.percentages().1
    }

    /// True when the sun never rises above the horizon along the route.
    pub fn is_dark(&self) -> bool {
        self.tally.sun_ms() <= 0.0
    }

    /// Estimated arrival instant.
    pub fn arrival_time(&self) -> Result<DateTime<Utc>> {
        crate::clock::offset_instant(self.start_time, self.total_duration_ms)
    }

    /// Side with strictly more sun time, if any.
    pub fn dominant_side(&self) -> Option<SunSide> {
        let ExposureTally {
            left_ms, right_ms, ..
        } = self.tally;
        if left_ms > right_ms {
            Some(SunSide::Left)
        } else if right_ms > left_ms {
            Some(SunSide::Right)
        } else {
            None
        }
    }
}

/// Check that `points` describe an analyzable polyline.
pub(crate) fn validate_points(points: &[Coordinate]) -> Result<()> {
    if points.len() < 2 {
        return Err(Error::invalid_route(format!(
            "a route needs at least 2 points, got {}",
            points.len()
        )));
    }
    for (index, point) in points.iter().enumerate() {
        point.validate().map_err(|err| match err {
            Error::InvalidRoute { reason } => {
                Error::invalid_route(format!("point {index}: {reason}"))
            }
            other => other,
        })?;
    }
    Ok(())
}

/// Run the sun-exposure segmenter over `points` departing at `start`.
///
/// # Errors
///
/// - [`Error::InvalidRoute`] if fewer than 2 points are given or any point is
///   not a finite, in-range coordinate.
/// - [`Error::InvalidConfig`] if the configuration fails validation.
/// - [`Error::InvalidTime`] if the travel clock leaves the representable range.
///
/// No partial output is returned on error.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use sunside_lib::{analyze_exposure, Coordinate, SegmenterConfig, SunSide};
///
/// let noon = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
/// let eastbound = [Coordinate::new(51.5, -0.09), Coordinate::new(51.5, -0.05)];
/// let report = analyze_exposure(&eastbound, noon, &SegmenterConfig::default()).unwrap();
/// assert_eq!(report.segments[0].side, SunSide::Right);
/// assert_eq!(report.right_percent(), 100);
/// ```
pub fn analyze_exposure(
    points: &[Coordinate],
    start: DateTime<Utc>,
    config: &SegmenterConfig,
) -> Result<ExposureReport> {
    config.validate()?;
    validate_points(points)?;

    let mut clock = TravelClock::new(start);
    let mut tally = ExposureTally::default();
    let mut total_distance_km = 0.0;
    let mut segments = Vec::with_capacity(points.len() - 1);

    for (index, pair) in points.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);

        let distance_km = haversine_distance_km(&from, &to);
        let duration_ms = segment_duration_ms(&from, &to, config.speed_kmh);
        if !duration_ms.is_finite() {
            return Err(Error::InvalidConfig {
                message: format!(
                    "segment {index} takes unbounded time at {} km/h",
                    config.speed_kmh
                ),
            });
        }
        if distance_km == 0.0 {
            warn!(index, "zero-length segment; repeated route point");
        }

        // Sample the sun at the segment start, before the clock moves.
        let start_offset_ms = clock.elapsed_ms();
        let start_time = clock.now()?;
        let sun = sun_position(&start_time, &from);
        clock.advance(duration_ms)?;

        let heading_deg = initial_bearing(&from, &to);
        let relative_angle_deg = relative_angle(sun.azimuth, heading_deg);
        let side = SunSide::classify(&sun, heading_deg, config.horizon_deg);

        tally.record(side, duration_ms);
        total_distance_km += distance_km;

        trace!(
            index,
            heading = heading_deg,
            azimuth = sun.azimuth,
            altitude = sun.altitude,
            relative = relative_angle_deg,
            side = %side,
            "classified segment"
        );

        segments.push(SegmentRecord {
            index,
            from,
            to,
            side,
            distance_km,
            duration_ms,
            start_offset_ms,
            start_time,
            heading_deg,
            sun,
            relative_angle_deg,
        });
    }

    // Arrival must also be representable.
    clock.now()?;

    debug!(
        segments = segments.len(),
        distance_km = total_distance_km,
        duration_h = clock.elapsed_ms() / MILLIS_PER_HOUR,
        left_ms = tally.left_ms,
        right_ms = tally.right_ms,
        "analyzed route sun exposure"
    );

    Ok(ExposureReport {
        start_time: start,
        speed_kmh: config.speed_kmh,
        segments,
        tally,
        total_distance_km,
        total_duration_ms: clock.elapsed_ms(),
    })
}

/// Run of consecutive segments sharing the same [`SunSide`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideRun {
    pub side: SunSide,
    pub first_segment: usize,
    pub last_segment: usize,
    /// Polyline covering the run, starting and ending on route points.
    pub points: Vec<Coordinate>,
    pub distance_km: f64,
    pub duration_ms: f64,
}

/// Merge consecutive same-side segments into runs, preserving travel order.
pub fn side_runs(segments: &[SegmentRecord]) -> Vec<SideRun> {
    let mut runs: Vec<SideRun> = Vec::new();
    for segment in segments {
        match runs.last_mut() {
            Some(run) if run.side == segment.side => {
                run.last_segment = segment.index;
                run.points.push(segment.to);
                run.distance_km += segment.distance_km;
                run.duration_ms += segment.duration_ms;
            }
            _ => runs.push(SideRun {
                side: segment.side,
                first_segment: segment.index,
                last_segment: segment.index,
                points: vec![segment.from, segment.to],
                distance_km: segment.distance_km,
                duration_ms: segment.duration_ms,
            }),
        }
    }
    runs
}
