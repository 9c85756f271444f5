// Test-only helpers for `sunside-lib` tests
#![allow(dead_code)]
use chrono::{DateTime, TimeZone, Utc};

use crate::exposure::{SegmentRecord, SunSide};
use crate::geo::Coordinate;
use crate::solar::SunSample;

/// Fixed instant used by builders: 2024-06-21T12:00:00Z.
pub fn solstice_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Builder to create `SegmentRecord` instances in tests with sensible defaults.
#[derive(Clone)]
pub struct SegmentRecordBuilder {
    record: SegmentRecord,
}

impl SegmentRecordBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            record: SegmentRecord {
                index: 0,
                from: Coordinate::new(51.5, -0.09),
                to: Coordinate::new(51.5, -0.05),
                side: SunSide::Right,
                distance_km: 2.0,
                duration_ms: 60_000.0,
                start_offset_ms: 0.0,
                start_time: solstice_noon(),
                heading_deg: 90.0,
                sun: SunSample {
                    azimuth: 180.0,
                    altitude: 60.0,
                },
                relative_angle_deg: 90.0,
            },
        }
    }

    pub fn index(mut self, idx: usize) -> Self {
        self.record.index = idx;
        self
    }

    pub fn side(mut self, side: SunSide) -> Self {
        self.record.side = side;
        self
    }

    pub fn endpoints(mut self, from: Coordinate, to: Coordinate) -> Self {
        self.record.from = from;
        self.record.to = to;
        self
    }

    pub fn duration_ms(mut self, ms: f64) -> Self {
        self.record.duration_ms = ms;
        self
    }

    pub fn distance_km(mut self, km: f64) -> Self {
        self.record.distance_km = km;
        self
    }

    pub fn build(self) -> SegmentRecord {
        self.record
    }
}

impl Default for SegmentRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
