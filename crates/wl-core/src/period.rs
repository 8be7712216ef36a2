//! Quantized, half-open time periods.

use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::work_date;

/// Minute-of-hour values a period endpoint may take.
pub const QUARTER_HOUR_MINUTES: [u32; 4] = [0, 15, 30, 45];

/// Why a pair of instants cannot form a [`TimePeriod`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// The start is not strictly before the end.
    #[error("start time must be before end time (got {start} - {end})")]
    InvalidOrder {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// An endpoint is not on a quarter-hour boundary.
    #[error("times must fall on a 15-minute boundary (got {instant})")]
    InvalidGranularity { instant: DateTime<Utc> },
}

/// A logged block of work time, `[start, end)`.
///
/// A live value always satisfies `start < end`, and both endpoints sit
/// exactly on :00, :15, :30 or :45 with zero seconds. The only way to build
/// one is [`TimePeriod::new`] (or deserialization, which calls it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct TimePeriod {
    #[serde(rename = "startTime")]
    start: DateTime<Utc>,
    #[serde(rename = "endTime")]
    end: DateTime<Utc>,
}

impl TimePeriod {
    /// Creates a period after validating ordering and quantization.
    ///
    /// Ordering is checked first, so `new(t, t)` is always `InvalidOrder`
    /// even when `t` is off-grid.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, PeriodError> {
        if start >= end {
            return Err(PeriodError::InvalidOrder { start, end });
        }
        for instant in [start, end] {
            if !is_quarter_hour(instant) {
                return Err(PeriodError::InvalidGranularity { instant });
            }
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Length in minutes; always a positive multiple of 15.
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "minute counts stay far below f64 precision limits"
    )]
    pub fn duration_hours(&self) -> f64 {
        self.duration_minutes() as f64 / 60.0
    }

    /// Returns true if the two periods share any instant.
    ///
    /// Bounds are half-open, so a period ending at 10:00 does not overlap
    /// one starting at 10:00. Containment in either direction overlaps.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns true if `instant` falls on the same civil date as this
    /// period's start, as seen in `tz`.
    pub fn is_same_civil_day<Tz: TimeZone>(&self, instant: DateTime<Utc>, tz: &Tz) -> bool {
        self.start.with_timezone(tz).date_naive() == instant.with_timezone(tz).date_naive()
    }
}

fn is_quarter_hour(instant: DateTime<Utc>) -> bool {
    QUARTER_HOUR_MINUTES.contains(&instant.minute())
        && instant.second() == 0
        && instant.nanosecond() == 0
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zone = work_date::work_zone();
        write!(
            f,
            "{} - {}",
            self.start.with_timezone(&zone).format("%H:%M"),
            self.end.with_timezone(&zone).format("%H:%M")
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPeriod {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl TryFrom<RawPeriod> for TimePeriod {
    type Error = PeriodError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Self::new(raw.start_time, raw.end_time)
    }
}
