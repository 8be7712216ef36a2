//! The storage seam the scheduling service depends on.

use std::error::Error as StdError;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entry::TimeEntry;
use crate::overlap::{ActivePeriod, find_conflicts};
use crate::period::TimePeriod;
use crate::types::{TimeEntryId, UserId};

/// Errors reported by an [`EntryRepository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store refused a write because it would overlap these active entries.
    #[error("entry overlaps {} existing entries", .0.len())]
    Conflict(Vec<TimeEntryId>),

    /// The backing store failed.
    #[error("storage failure: {0}")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),
}

impl RepositoryError {
    pub fn backend(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Durable storage for time entries.
///
/// A repository owns durability, not validity: the scheduling service
/// decides whether an entry may be written. Implementations must be safe to
/// call from several threads; the service serializes calls per user.
pub trait EntryRepository {
    /// IDs and periods of a user's non-deleted entries.
    fn load_active_by_user(&self, user_id: &UserId) -> Result<Vec<ActivePeriod>, RepositoryError>;

    /// Loads an entry by ID, including soft-deleted ones.
    fn load_by_id(&self, id: &TimeEntryId) -> Result<Option<TimeEntry>, RepositoryError>;

    /// Inserts or replaces the entry with the same ID and returns what was stored.
    fn persist(&self, entry: TimeEntry) -> Result<TimeEntry, RepositoryError>;

    /// A user's non-deleted entries ordered by start time, optionally limited
    /// to those starting within `[from, to)`.
    fn load_entries_by_user(
        &self,
        user_id: &UserId,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<TimeEntry>, RepositoryError>;

    /// IDs of the user's active entries overlapping `period`, skipping `exclude`.
    ///
    /// The default loads every active period and scans them; stores that can
    /// answer the question directly should override it.
    fn find_overlapping(
        &self,
        user_id: &UserId,
        period: &TimePeriod,
        exclude: Option<&TimeEntryId>,
    ) -> Result<Vec<TimeEntryId>, RepositoryError> {
        let active = self.load_active_by_user(user_id)?;
        Ok(find_conflicts(period, &active, exclude))
    }
}
