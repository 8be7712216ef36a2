//! Work date derivation.
//!
//! A work date is the civil calendar day an entry is attributed to for
//! listing and reporting. It is never stored: it is always derived from the
//! period's start instant under one fixed rule, UTC+09:00 (Japan Standard
//! Time, which observes no daylight saving).
//!
//! Everything that buckets entries by day goes through this module so that
//! the listing, the summaries and the rendered `workDate` field agree near
//! midnight.

use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Offset of the work-date zone from UTC, in seconds.
pub const WORK_ZONE_OFFSET_SECS: i32 = 9 * 3600;

/// Calendar years accepted for work dates and wall-clock times.
///
/// Stored timestamps keep four-digit years so their text order matches
/// their time order.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 0..=9999;

/// The fixed zone work dates are computed in.
pub fn work_zone() -> FixedOffset {
    FixedOffset::east_opt(WORK_ZONE_OFFSET_SECS).expect("UTC+09:00 is a valid offset")
}

/// Returns the work date an instant falls on.
pub fn derive(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&work_zone()).date_naive()
}

/// Returns the half-open UTC bounds `[start, end)` of a work date, or `None`
/// outside [`SUPPORTED_YEARS`].
pub fn day_bounds(date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = to_instant(date.and_time(NaiveTime::MIN))?;
    let end = start.checked_add_signed(Duration::days(1))?;
    Some((start, end))
}

/// Interprets a wall-clock time in the work zone as a UTC instant, or `None`
/// outside [`SUPPORTED_YEARS`].
pub fn to_instant(local: NaiveDateTime) -> Option<DateTime<Utc>> {
    if !SUPPORTED_YEARS.contains(&local.year()) {
        return None;
    }
    local
        .and_utc()
        .checked_sub_signed(Duration::seconds(i64::from(WORK_ZONE_OFFSET_SECS)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn utc_morning_stays_on_same_date() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 29, 2, 0, 0).unwrap();
        assert_eq!(derive(instant), date(2025, 1, 29));
    }

    #[test]
    fn utc_evening_rolls_into_next_work_date() {
        // 15:00 UTC is midnight in the work zone.
        let before = Utc.with_ymd_and_hms(2025, 1, 29, 14, 45, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 1, 29, 15, 0, 0).unwrap();
        assert_eq!(derive(before), date(2025, 1, 29));
        assert_eq!(derive(at), date(2025, 1, 30));
    }

    #[test]
    fn day_bounds_are_half_open_and_a_day_long() {
        let (start, end) = day_bounds(date(2025, 1, 30)).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 1, 29, 15, 0, 0).unwrap());
        assert_eq!(end - start, Duration::days(1));
        assert_eq!(derive(start), date(2025, 1, 30));
        assert_eq!(derive(end), date(2025, 1, 31));
        assert_eq!(derive(end - Duration::minutes(15)), date(2025, 1, 30));
    }

    #[test]
    fn to_instant_inverts_the_zone_offset() {
        let local = date(2025, 1, 29).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(
            to_instant(local),
            Some(Utc.with_ymd_and_hms(2025, 1, 29, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn extreme_dates_have_no_bounds() {
        assert_eq!(day_bounds(NaiveDate::MIN), None);
        assert_eq!(day_bounds(NaiveDate::MAX), None);
        assert_eq!(day_bounds(date(10_000, 1, 1)), None);
        assert_eq!(day_bounds(date(-1, 12, 31)), None);
        assert!(day_bounds(date(0, 1, 1)).is_some());
        assert!(day_bounds(date(9999, 12, 31)).is_some());
    }

    #[test]
    fn extreme_wall_clock_times_do_not_convert() {
        let earliest = NaiveDate::MIN.and_time(NaiveTime::MIN);
        let latest = NaiveDate::MAX.and_hms_opt(23, 45, 0).unwrap();
        assert_eq!(to_instant(earliest), None);
        assert_eq!(to_instant(latest), None);
    }
}
