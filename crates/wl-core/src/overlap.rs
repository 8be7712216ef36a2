//! Per-user conflict detection.
//!
//! The scan is linear in the number of a user's active entries. That set is
//! bounded by how much one person can log, so no interval index is kept.

use crate::period::TimePeriod;
use crate::types::TimeEntryId;

/// An active entry's ID and period, as loaded for conflict checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePeriod {
    pub id: TimeEntryId,
    pub period: TimePeriod,
}

impl ActivePeriod {
    pub const fn new(id: TimeEntryId, period: TimePeriod) -> Self {
        Self { id, period }
    }
}

/// Returns the IDs of every entry in `existing` whose period overlaps
/// `candidate`, in input order.
///
/// `existing` must hold a single user's active entries; entries of other
/// users never conflict. `exclude` skips the entry being updated so that
/// its stored period is not compared against its own new period.
pub fn find_conflicts<'a, I>(
    candidate: &TimePeriod,
    existing: I,
    exclude: Option<&TimeEntryId>,
) -> Vec<TimeEntryId>
where
    I: IntoIterator<Item = &'a ActivePeriod>,
{
    existing
        .into_iter()
        .filter(|entry| exclude != Some(&entry.id))
        .filter(|entry| candidate.overlaps(&entry.period))
        .map(|entry| entry.id.clone())
        .collect()
}
