//! Shapes exchanged with the outer API layer.
//!
//! Instants travel as timestamp strings. Periods travel as
//! `{startTime, endTime}` pairs through [`TimePeriod`](crate::TimePeriod)'s
//! own serde impl. Rendered entries carry their derived `workDate` so
//! clients never compute it themselves.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::entry::TimeEntry;
use crate::work_date;

/// Wall-clock formats accepted in addition to RFC 3339, read in the work zone.
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// A timestamp string could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid timestamp: {value} (use RFC 3339, e.g. 2025-01-29T09:00:00Z, or 'YYYY-MM-DD HH:MM')")]
pub struct TimestampError {
    pub value: String,
}

/// Parses an RFC 3339 timestamp, or a naive `YYYY-MM-DD HH:MM` read as
/// work-zone wall-clock time.
///
/// Naive times outside [`work_date::SUPPORTED_YEARS`] are rejected.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .and_then(work_date::to_instant)
        .ok_or_else(|| TimestampError {
            value: value.to_string(),
        })
}

/// An entry as rendered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    pub id: String,
    pub task_id: String,
    pub category_id: String,
    pub user_id: String,
    pub start_time: String,
    pub end_time: String,
    pub work_date: String,
    pub duration_minutes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&TimeEntry> for EntryView {
    fn from(entry: &TimeEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            task_id: entry.task_id().to_string(),
            category_id: entry.category_id().to_string(),
            user_id: entry.user_id().to_string(),
            start_time: entry.period().start().to_rfc3339(),
            end_time: entry.period().end().to_rfc3339(),
            work_date: entry.work_date().format("%Y-%m-%d").to_string(),
            duration_minutes: entry.duration_minutes(),
            memo: entry.memo().map(str::to_string),
            created_at: entry.created_at().to_rfc3339(),
            updated_at: entry.updated_at().to_rfc3339(),
        }
    }
}
