//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use wl_core::TimeEntry;
use wl_core::boundary::parse_instant;

/// Parses a `--<flag>` time argument.
pub fn parse_time(flag: &str, value: &str) -> Result<DateTime<Utc>> {
    parse_instant(value).with_context(|| format!("invalid --{flag}"))
}

/// Formats minutes as "Xh Ym" if >= 1 hour, "Xm" otherwise.
pub fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours >= 1 {
        format!("{hours}h {rest}m")
    } else {
        format!("{rest}m")
    }
}

/// Generates a 10-character bar for `value` relative to `max`.
/// Non-zero values below 5% still get a single block.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "minute totals are small and the ratio is clamped to 0..=10"
)]
pub fn progress_bar(value: i64, max: i64) -> String {
    if max <= 0 {
        return "░".repeat(10);
    }

    let ratio = value as f64 / max as f64;
    let filled = if ratio < 0.05 && value > 0 {
        1
    } else {
        (ratio * 10.0).round().clamp(0.0, 10.0) as usize
    };

    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

/// One-line description: work date, local period, duration, task and category.
pub fn describe(entry: &TimeEntry) -> String {
    let mut line = format!(
        "{} {} ({}) {} / {}",
        entry.work_date(),
        entry.period(),
        format_minutes(entry.duration_minutes()),
        entry.task_id(),
        entry.category_id()
    );
    if let Some(memo) = entry.memo() {
        line.push_str(&format!(" \"{memo}\""));
    }
    line
}
