use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::exposure::{side_runs, ExposureReport, SegmentRecord, SunSide};
use crate::geo::Coordinate;

/// Whether any sun time was recorded along the route.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Exposure {
    Sunlit,
    /// The sun stayed at or below the horizon for the whole trip.
    Darkness,
}

/// Presentation style for turning an [`ExposureSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureRenderMode {
    PlainText,
    RichText,
    Note,
}

/// Structured representation of a segmenter pass that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExposureSummary {
    pub start: Coordinate,
    pub goal: Coordinate,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub speed_kmh: f64,
    pub total_distance_km: f64,
    pub total_duration_ms: f64,
    pub left_sun_ms: f64,
    pub right_sun_ms: f64,
    pub no_sun_ms: f64,
    pub left_percent: u8,
    pub right_percent: u8,
    pub exposure: Exposure,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_side: Option<SunSide>,
    pub segments: Vec<SegmentRecord>,
}

impl ExposureSummary {
    /// Convert an [`ExposureReport`] into a display-ready summary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoute`] when the report has no segments and
    /// [`Error::InvalidTime`] when the arrival instant is not representable.
    pub fn from_report(report: &ExposureReport) -> Result<Self> {
        let (Some(first), Some(last)) = (report.segments.first(), report.segments.last()) else {
            return Err(Error::invalid_route("exposure report has no segments"));
        };
        let (start, goal) = (first.from, last.to);
        let arrival = report.arrival_time()?;
        let (left_percent, right_percent) = report.tally.percentages();

        Ok(Self {
            start,
            goal,
            departure: report.start_time,
            arrival,
            speed_kmh: report.speed_kmh,
            total_distance_km: report.total_distance_km,
            total_duration_ms: report.total_duration_ms,
            left_sun_ms: report.tally.left_ms,
            right_sun_ms: report.tally.right_ms,
            no_sun_ms: report.tally.no_sun_ms,
            left_percent,
            right_percent,
            exposure: if report.is_dark() {
                Exposure::Darkness
            } else {
                Exposure::Sunlit
            },
            dominant_side: report.dominant_side(),
            segments: report.segments.clone(),
        })
    }

    /// One-line seating recommendation.
    pub fn advice(&self) -> String {
        match (self.exposure, self.dominant_side) {
            (Exposure::Darkness, _) => {
                "The sun stays below the horizon for the whole trip.".to_string()
            }
            (Exposure::Sunlit, Some(side)) => {
                let shade = side.opposite().map(SunSide::label).unwrap_or("either");
                format!(
                    "Sun mostly on the {} ({}%). Sit on the {} side for shade.",
                    side,
                    self.percent_for(side),
                    shade
                )
            }
            (Exposure::Sunlit, None) => "Sun time is split evenly between both sides.".to_string(),
        }
    }

    fn percent_for(&self, side: SunSide) -> u8 {
        match side {
            SunSide::Left => self.left_percent,
            SunSide::Right => self.right_percent,
            SunSide::NoSun => 0,
        }
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: ExposureRenderMode) -> String {
        match mode {
            ExposureRenderMode::PlainText => self.render_plain(),
            ExposureRenderMode::RichText => self.render_rich(),
            ExposureRenderMode::Note => self.render_note(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} segments, {:.1} km at {} km/h)",
            self.start,
            self.goal,
            self.segments.len(),
            self.total_distance_km,
            self.speed_kmh
        );
        let _ = writeln!(
            buffer,
            "Departure {} / arrival {}",
            format_instant(&self.departure),
            format_instant(&self.arrival)
        );
        for segment in &self.segments {
            let _ = writeln!(
                buffer,
                "{:>4}: {:<6} heading {:>5.1}° sun az {:>5.1}° alt {:>5.1}° ({})",
                segment.index,
                segment.side.label(),
                segment.heading_deg,
                segment.sun.azimuth,
                segment.sun.altitude,
                format_duration_ms(segment.duration_ms)
            );
        }
        let _ = writeln!(
            buffer,
            "Left sun: {} ({}%)  Right sun: {} ({}%)  No sun: {}",
            format_duration_ms(self.left_sun_ms),
            self.left_percent,
            format_duration_ms(self.right_sun_ms),
            self.right_percent,
            format_duration_ms(self.no_sun_ms)
        );
        let _ = writeln!(buffer, "{}", self.advice());
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Sun exposure**: _{} → {}_ ({:.1} km, {})",
            self.start,
            self.goal,
            self.total_distance_km,
            format_duration_ms(self.total_duration_ms)
        );
        let _ = writeln!(buffer);
        let _ = writeln!(buffer, "| Side | Time | Share |");
        let _ = writeln!(buffer, "|------|------|-------|");
        let _ = writeln!(
            buffer,
            "| Left | {} | {}% |",
            format_duration_ms(self.left_sun_ms),
            self.left_percent
        );
        let _ = writeln!(
            buffer,
            "| Right | {} | {}% |",
            format_duration_ms(self.right_sun_ms),
            self.right_percent
        );
        let _ = writeln!(
            buffer,
            "| No sun | {} | - |",
            format_duration_ms(self.no_sun_ms)
        );
        let _ = writeln!(buffer);
        for run in side_runs(&self.segments) {
            let _ = writeln!(
                buffer,
                "* segments {}-{}: **{}** for {} (`{:.1} km`)",
                run.first_segment,
                run.last_segment,
                run.side,
                format_duration_ms(run.duration_ms),
                run.distance_km
            );
        }
        let _ = writeln!(buffer);
        let _ = writeln!(buffer, "_{}_", self.advice());
        buffer
    }

    fn render_note(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "Sun exposure:");
        let _ = writeln!(
            buffer,
            "{} -> {} ({:.1} km)",
            self.start, self.goal, self.total_distance_km
        );
        let _ = writeln!(
            buffer,
            "L {}% / R {}%",
            self.left_percent, self.right_percent
        );
        let _ = writeln!(buffer, "{}", self.advice());
        buffer
    }

    /// GeoJSON `FeatureCollection` with one `LineString` per segment, or per
    /// run of same-side segments when `merge` is set.
    pub fn to_geojson(&self, merge: bool) -> Value {
        let features: Vec<Value> = if merge {
            side_runs(&self.segments)
                .into_iter()
                .map(|run| {
                    line_feature(
                        &run.points,
                        run.side,
                        json!({
                            "first_segment": run.first_segment,
                            "last_segment": run.last_segment,
                            "distance_km": run.distance_km,
                            "duration_ms": run.duration_ms,
                        }),
                    )
                })
                .collect()
        } else {
            self.segments
                .iter()
                .map(|segment| {
                    line_feature(
                        &[segment.from, segment.to],
                        segment.side,
                        json!({
                            "index": segment.index,
                            "distance_km": segment.distance_km,
                            "duration_ms": segment.duration_ms,
                            "start_time": segment.start_time.to_rfc3339(),
                            "heading_deg": segment.heading_deg,
                            "sun_azimuth": segment.sun.azimuth,
                            "sun_altitude": segment.sun.altitude,
                        }),
                    )
                })
                .collect()
        };

        json!({
            "type": "FeatureCollection",
            "features": features,
            "properties": {
                "departure": self.departure.to_rfc3339(),
                "arrival": self.arrival.to_rfc3339(),
                "left_percent": self.left_percent,
                "right_percent": self.right_percent,
                "exposure": self.exposure,
            },
        })
    }
}

fn line_feature(points: &[Coordinate], side: SunSide, mut properties: Value) -> Value {
    if let Value::Object(map) = &mut properties {
        map.insert("side".to_string(), json!(side));
        map.insert("color".to_string(), json!(side.color_hex()));
    }
    let coordinates: Vec<[f64; 2]> = points.iter().map(|p| [p.lng, p.lat]).collect();
    json!({
        "type": "Feature",
        "geometry": { "type": "LineString", "coordinates": coordinates },
        "properties": properties,
    })
}

/// `YYYY-MM-DD HH:MM UTC`.
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Compact human duration: `1h 05m`, `12m 30s`, `45s`.
pub fn format_duration_ms(ms: f64) -> String {
    let total_secs = (ms.max(0.0) / 1000.0).round() as u64;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}
