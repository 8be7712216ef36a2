//! The time entry aggregate.
//!
//! Entries are immutable. Every change produces a new [`TimeEntry`] that
//! keeps the ID and creation time, so earlier values held by a caller stay
//! valid and unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::period::{PeriodError, TimePeriod};
use crate::types::{CategoryId, MissingReference, TaskId, TimeEntryId, UserId};
use crate::work_date;

/// Errors from building or transforming a [`TimeEntry`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error(transparent)]
    MissingReference(#[from] MissingReference),

    #[error(transparent)]
    Period(#[from] PeriodError),

    /// A transformation was attempted on a soft-deleted entry.
    #[error("time entry {id} has been deleted")]
    EntityDeleted { id: TimeEntryId },

    /// The entry was soft-deleted twice.
    #[error("time entry {id} is already deleted")]
    AlreadyDeleted { id: TimeEntryId },
}

/// Lifecycle of an entry. `Deleted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Active,
    Deleted { at: DateTime<Utc> },
}

/// Raw parts of a persisted entry, used to rebuild it with [`TimeEntry::restore`].
#[derive(Debug, Clone)]
pub struct EntrySnapshot {
    pub id: TimeEntryId,
    pub task_id: TaskId,
    pub category_id: CategoryId,
    pub user_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// One logged block of work for a task and category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    id: TimeEntryId,
    task_id: TaskId,
    category_id: CategoryId,
    user_id: UserId,
    period: TimePeriod,
    memo: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    state: EntryState,
}

impl TimeEntry {
    /// Creates a new active entry with a fresh ID.
    ///
    /// References are checked before the period, so a request missing its
    /// task never reports a period error.
    pub fn create(
        task_id: &str,
        category_id: &str,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        memo: Option<String>,
    ) -> Result<Self, EntryError> {
        let task_id = TaskId::new(task_id)?;
        let category_id = CategoryId::new(category_id)?;
        let user_id = UserId::new(user_id)?;
        let period = TimePeriod::new(start, end)?;
        let now = Utc::now();

        Ok(Self {
            id: TimeEntryId::generate(),
            task_id,
            category_id,
            user_id,
            period,
            memo: normalize_memo(memo),
            created_at: now,
            updated_at: now,
            state: EntryState::Active,
        })
    }

    /// Rebuilds an entry loaded from storage, re-validating its period.
    pub fn restore(snapshot: EntrySnapshot) -> Result<Self, EntryError> {
        let period = TimePeriod::new(snapshot.start, snapshot.end)?;
        let state = snapshot
            .deleted_at
            .map_or(EntryState::Active, |at| EntryState::Deleted { at });

        Ok(Self {
            id: snapshot.id,
            task_id: snapshot.task_id,
            category_id: snapshot.category_id,
            user_id: snapshot.user_id,
            period,
            memo: normalize_memo(snapshot.memo),
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
            state,
        })
    }

    pub const fn id(&self) -> &TimeEntryId {
        &self.id
    }

    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub const fn category_id(&self) -> &CategoryId {
        &self.category_id
    }

    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub const fn period(&self) -> &TimePeriod {
        &self.period
    }

    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub const fn state(&self) -> EntryState {
        self.state
    }

    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            EntryState::Active => None,
            EntryState::Deleted { at } => Some(at),
        }
    }

    pub const fn is_deleted(&self) -> bool {
        matches!(self.state, EntryState::Deleted { .. })
    }

    /// The civil date this entry is reported under.
    pub fn work_date(&self) -> NaiveDate {
        work_date::derive(self.period.start())
    }

    pub fn duration_minutes(&self) -> i64 {
        self.period.duration_minutes()
    }

    pub fn belongs_to(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Fails with `EntityDeleted` if the entry is soft-deleted.
    pub fn ensure_active(&self) -> Result<(), EntryError> {
        if self.is_deleted() {
            return Err(EntryError::EntityDeleted {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    pub fn with_period(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, EntryError> {
        self.ensure_active()?;
        let period = TimePeriod::new(start, end)?;
        Ok(Self {
            period,
            ..self.touched()
        })
    }

    pub fn with_task(&self, task_id: &str) -> Result<Self, EntryError> {
        self.ensure_active()?;
        let task_id = TaskId::new(task_id)?;
        Ok(Self {
            task_id,
            ..self.touched()
        })
    }

    pub fn with_category(&self, category_id: &str) -> Result<Self, EntryError> {
        self.ensure_active()?;
        let category_id = CategoryId::new(category_id)?;
        Ok(Self {
            category_id,
            ..self.touched()
        })
    }

    /// Replaces the memo. `None` (or a blank string) clears it.
    pub fn with_memo(&self, memo: Option<String>) -> Result<Self, EntryError> {
        self.ensure_active()?;
        Ok(Self {
            memo: normalize_memo(memo),
            ..self.touched()
        })
    }

    /// Marks the entry deleted. There is no way back.
    pub fn soft_delete(&self) -> Result<Self, EntryError> {
        if self.is_deleted() {
            return Err(EntryError::AlreadyDeleted {
                id: self.id.clone(),
            });
        }
        let next = self.touched();
        Ok(Self {
            state: EntryState::Deleted {
                at: next.updated_at,
            },
            ..next
        })
    }

    /// Copy with `updated_at` refreshed. Never moves backwards.
    fn touched(&self) -> Self {
        Self {
            updated_at: Utc::now().max(self.updated_at),
            ..self.clone()
        }
    }
}

fn normalize_memo(memo: Option<String>) -> Option<String> {
    memo.filter(|m| !m.trim().is_empty())
}
