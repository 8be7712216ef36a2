//! In-memory [`EntryRepository`], for tests and embedding.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::entry::TimeEntry;
use crate::overlap::ActivePeriod;
use crate::repository::{EntryRepository, RepositoryError};
use crate::types::{TimeEntryId, UserId};

/// Entries held in a process-local map.
///
/// Writes are not re-validated here; the scheduling service's per-user
/// lock is what keeps overlapping entries out.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: Mutex<HashMap<TimeEntryId, TimeEntry>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, deleted ones included.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<TimeEntryId, TimeEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EntryRepository for MemoryRepository {
    fn load_active_by_user(&self, user_id: &UserId) -> Result<Vec<ActivePeriod>, RepositoryError> {
        let mut active: Vec<ActivePeriod> = self
            .entries()
            .values()
            .filter(|entry| entry.belongs_to(user_id) && !entry.is_deleted())
            .map(|entry| ActivePeriod::new(entry.id().clone(), *entry.period()))
            .collect();
        active.sort_by(|a, b| {
            a.period
                .start()
                .cmp(&b.period.start())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(active)
    }

    fn load_by_id(&self, id: &TimeEntryId) -> Result<Option<TimeEntry>, RepositoryError> {
        Ok(self.entries().get(id).cloned())
    }

    fn persist(&self, entry: TimeEntry) -> Result<TimeEntry, RepositoryError> {
        self.entries().insert(entry.id().clone(), entry.clone());
        Ok(entry)
    }

    fn load_entries_by_user(
        &self,
        user_id: &UserId,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<TimeEntry>, RepositoryError> {
        let mut entries: Vec<TimeEntry> = self
            .entries()
            .values()
            .filter(|entry| entry.belongs_to(user_id) && !entry.is_deleted())
            .filter(|entry| {
                range.is_none_or(|(from, to)| {
                    let start = entry.period().start();
                    start >= from && start < to
                })
            })
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            a.period()
                .start()
                .cmp(&b.period().start())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(entries)
    }
}
