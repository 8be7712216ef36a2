//! Create, reschedule and cancel orchestration.
//!
//! # Concurrency
//!
//! The conflict check and the write that follows it form one critical
//! section per user. [`Scheduler`] keeps a mutex per [`UserId`] and holds it
//! from loading the user's active entries until the write returns, so two
//! overlapping requests for the same user cannot both pass the check.
//! Requests for different users never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};

use crate::entry::TimeEntry;
use crate::error::ScheduleError;
use crate::period::TimePeriod;
use crate::repository::EntryRepository;
use crate::types::{TimeEntryId, UserId};
use crate::work_date;

/// A request to log a new block of time.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub task_id: String,
    pub category_id: String,
    pub user_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub memo: Option<String>,
}

/// Requested changes to an existing entry. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct EntryChanges {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub task_id: Option<String>,
    pub category_id: Option<String>,
    /// `Some(None)` clears the memo.
    pub memo: Option<Option<String>>,
}

impl EntryChanges {
    pub const fn is_empty(&self) -> bool {
        self.start.is_none()
            && self.end.is_none()
            && self.task_id.is_none()
            && self.category_id.is_none()
            && self.memo.is_none()
    }
}

/// Decides whether entries may be written, and writes them.
#[derive(Debug)]
pub struct Scheduler<R> {
    repository: R,
    user_locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl<R: EntryRepository> Scheduler<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// Logs a new entry if it does not overlap the user's active entries.
    pub fn schedule_new(&self, request: NewEntry) -> Result<TimeEntry, ScheduleError> {
        let candidate = TimeEntry::create(
            &request.task_id,
            &request.category_id,
            &request.user_id,
            request.start,
            request.end,
            request.memo,
        )?;
        let user_id = candidate.user_id().clone();

        self.with_user_lock(&user_id, || {
            self.ensure_free(&user_id, candidate.period(), None)?;
            let stored = self.repository.persist(candidate)?;
            tracing::info!(
                entry_id = %stored.id(),
                user_id = %user_id,
                period = %stored.period(),
                "scheduled time entry"
            );
            Ok(stored)
        })
    }

    /// Applies `changes` to an entry owned by `user_id`.
    ///
    /// The overlap check only runs when the period actually changed, and it
    /// skips the entry itself.
    pub fn reschedule(
        &self,
        entry_id: &TimeEntryId,
        user_id: &UserId,
        changes: EntryChanges,
    ) -> Result<TimeEntry, ScheduleError> {
        self.with_user_lock(user_id, || {
            let existing = self.load_owned(entry_id, user_id)?;
            existing.ensure_active()?;
            if changes.is_empty() {
                tracing::debug!(entry_id = %entry_id, "no changes requested");
                return Ok(existing);
            }

            let mut updated = existing.clone();
            if changes.start.is_some() || changes.end.is_some() {
                let start = changes.start.unwrap_or_else(|| existing.period().start());
                let end = changes.end.unwrap_or_else(|| existing.period().end());
                updated = updated.with_period(start, end)?;
            }
            if let Some(task_id) = &changes.task_id {
                updated = updated.with_task(task_id)?;
            }
            if let Some(category_id) = &changes.category_id {
                updated = updated.with_category(category_id)?;
            }
            if let Some(memo) = changes.memo {
                updated = updated.with_memo(memo)?;
            }

            if updated.period() != existing.period() {
                self.ensure_free(user_id, updated.period(), Some(entry_id))?;
            }

            let stored = self.repository.persist(updated)?;
            tracing::info!(
                entry_id = %entry_id,
                user_id = %user_id,
                period = %stored.period(),
                "rescheduled time entry"
            );
            Ok(stored)
        })
    }

    /// Soft-deletes an entry owned by `user_id`.
    pub fn cancel(&self, entry_id: &TimeEntryId, user_id: &UserId) -> Result<(), ScheduleError> {
        self.with_user_lock(user_id, || {
            let existing = self.load_owned(entry_id, user_id)?;
            let deleted = existing.soft_delete()?;
            self.repository.persist(deleted)?;
            tracing::info!(entry_id = %entry_id, user_id = %user_id, "cancelled time entry");
            Ok(())
        })
    }

    /// Loads an active entry owned by `user_id`. Deleted entries are `NotFound`.
    pub fn entry(&self, entry_id: &TimeEntryId, user_id: &UserId) -> Result<TimeEntry, ScheduleError> {
        let entry = self.load_owned(entry_id, user_id)?;
        if entry.is_deleted() {
            return Err(ScheduleError::NotFound {
                id: entry_id.clone(),
            });
        }
        Ok(entry)
    }

    /// All of a user's active entries, ordered by start.
    pub fn entries_for_user(&self, user_id: &UserId) -> Result<Vec<TimeEntry>, ScheduleError> {
        Ok(self.repository.load_entries_by_user(user_id, None)?)
    }

    /// A user's active entries on one work date, ordered by start.
    pub fn entries_on(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<TimeEntry>, ScheduleError> {
        let bounds = day_bounds(date)?;
        Ok(self.repository.load_entries_by_user(user_id, Some(bounds))?)
    }

    /// A user's active entries with work dates in `[from, to]`.
    pub fn entries_between(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TimeEntry>, ScheduleError> {
        let (start, _) = day_bounds(from)?;
        let (_, end) = day_bounds(to)?;
        Ok(self
            .repository
            .load_entries_by_user(user_id, Some((start, end)))?)
    }

    fn load_owned(&self, entry_id: &TimeEntryId, user_id: &UserId) -> Result<TimeEntry, ScheduleError> {
        let Some(entry) = self.repository.load_by_id(entry_id)? else {
            return Err(ScheduleError::NotFound {
                id: entry_id.clone(),
            });
        };
        if !entry.belongs_to(user_id) {
            return Err(ScheduleError::Forbidden {
                id: entry_id.clone(),
                user_id: user_id.clone(),
            });
        }
        Ok(entry)
    }

    fn ensure_free(
        &self,
        user_id: &UserId,
        period: &TimePeriod,
        exclude: Option<&TimeEntryId>,
    ) -> Result<(), ScheduleError> {
        let conflicting = self.repository.find_overlapping(user_id, period, exclude)?;
        if conflicting.is_empty() {
            tracing::debug!(user_id = %user_id, period = %period, "no conflicts");
            return Ok(());
        }
        tracing::warn!(
            user_id = %user_id,
            period = %period,
            conflicts = conflicting.len(),
            "rejected overlapping entry"
        );
        Err(ScheduleError::ScheduleConflict { conflicting })
    }

    /// Runs `f` inside the user's critical section.
    ///
    /// The user's lock is dropped from the table once nobody else holds or
    /// waits on it, so the table only holds users with requests in flight.
    fn with_user_lock<T>(
        &self,
        user_id: &UserId,
        f: impl FnOnce() -> Result<T, ScheduleError>,
    ) -> Result<T, ScheduleError> {
        let lock = self.user_lock(user_id);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        drop(lock);
        self.release_user_lock(user_id);
        result
    }

    fn user_lock(&self, user_id: &UserId) -> Arc<Mutex<()>> {
        Arc::clone(self.lock_table().entry(user_id.clone()).or_default())
    }

    fn release_user_lock(&self, user_id: &UserId) {
        let mut locks = self.lock_table();
        // Clones are only handed out under the table lock, so a count of one
        // means no other request holds or awaits this user's lock.
        if locks
            .get(user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(user_id);
        }
    }

    fn lock_table(&self) -> MutexGuard<'_, HashMap<UserId, Arc<Mutex<()>>>> {
        self.user_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn day_bounds(date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), ScheduleError> {
    work_date::day_bounds(date).ok_or(ScheduleError::DateOutOfRange { date })
}
