//! Travel clock and start-instant parsing.
//!
//! The [`TravelClock`] is the only mutable state of a traversal: it starts at
//! the requested departure instant and is pushed forward by each segment's
//! estimated duration.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

use crate::error::{Error, Result};

/// Naive date-time layouts accepted by [`parse_start_time`], read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a departure instant.
///
/// Accepts `now` (any case), RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM[:SS]`
/// values (space separator also allowed, interpreted as UTC) and integer Unix
/// milliseconds.
///
/// # Errors
///
/// Returns [`Error::InvalidTime`] when none of the layouts match or the value
/// falls outside the representable range.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use sunside_lib::parse_start_time;
///
/// let now = Utc::now();
/// assert_eq!(parse_start_time("now", now).unwrap(), now);
/// let t = parse_start_time("2024-06-21T12:00:00Z", now).unwrap();
/// assert_eq!(t.to_rfc3339(), "2024-06-21T12:00:00+00:00");
/// ```
pub fn parse_start_time(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_time(input, "value is empty"));
    }
    if trimmed.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(millis) = trimmed.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            Error::invalid_time(input, "unix milliseconds out of representable range")
        });
    }

    Err(Error::invalid_time(
        input,
        "expected 'now', an RFC 3339 timestamp, YYYY-MM-DDTHH:MM[:SS] or unix milliseconds",
    ))
}

/// Virtual clock advanced along a route at constant speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelClock {
    start: DateTime<Utc>,
    elapsed_ms: f64,
}

impl TravelClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            elapsed_ms: 0.0,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Milliseconds elapsed since the start.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Current instant, rounded to the nearest millisecond.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTime`] when the instant would overflow the
    /// representable range.
    pub fn now(&self) -> Result<DateTime<Utc>> {
        offset_instant(self.start, self.elapsed_ms)
    }

    /// Move the clock forward by `millis`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTime`] for negative or non-finite amounts, or
    /// when the elapsed total stops being finite. The clock is left unchanged.
    pub fn advance(&mut self, millis: f64) -> Result<()> {
        let elapsed = self.elapsed_ms + millis;
        if !millis.is_finite() || millis < 0.0 || !elapsed.is_finite() {
            return Err(Error::invalid_time(
                self.start.to_rfc3339(),
                format!("cannot advance travel clock by {millis} ms"),
            ));
        }
        self.elapsed_ms = elapsed;
        Ok(())
    }
}

/// `start + millis`, failing with [`Error::InvalidTime`] on overflow.
pub fn offset_instant(start: DateTime<Utc>, millis: f64) -> Result<DateTime<Utc>> {
    let overflow = || Error::invalid_time(start.to_rfc3339(), "travel time overflows the calendar");
    let rounded = millis.round();
    if !rounded.is_finite() || rounded.abs() > i64::MAX as f64 {
        return Err(overflow());
    }
    let delta = TimeDelta::try_milliseconds(rounded as i64).ok_or_else(overflow)?;
    start.checked_add_signed(delta).ok_or_else(overflow)
}
