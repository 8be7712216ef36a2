//! [`EntryRepository`] backed by a [`Database`].

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use wl_core::{
    ActivePeriod, EntryRepository, RepositoryError, TimeEntry, TimeEntryId, TimePeriod, UserId,
};

use crate::{Database, DbError};

/// A [`Database`] that can be shared between threads.
pub struct SharedDatabase {
    inner: Mutex<Database>,
}

impl SharedDatabase {
    pub fn new(db: Database) -> Self {
        Self {
            inner: Mutex::new(db),
        }
    }

    pub fn open(path: &Path) -> Result<Self, DbError> {
        Database::open(path).map(Self::new)
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        Database::open_in_memory().map(Self::new)
    }

    /// Locks the connection for direct queries.
    pub fn lock(&self) -> MutexGuard<'_, Database> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<DbError> for RepositoryError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Overlap { conflicting, .. } => Self::Conflict(conflicting),
            other => Self::backend(other),
        }
    }
}

impl EntryRepository for SharedDatabase {
    fn load_active_by_user(&self, user_id: &UserId) -> Result<Vec<ActivePeriod>, RepositoryError> {
        Ok(self.lock().list_active_periods(user_id)?)
    }

    fn load_by_id(&self, id: &TimeEntryId) -> Result<Option<TimeEntry>, RepositoryError> {
        Ok(self.lock().get_entry(id)?)
    }

    fn persist(&self, entry: TimeEntry) -> Result<TimeEntry, RepositoryError> {
        let mut db = self.lock();
        db.upsert_entry(&entry)?;
        let stored = db.get_entry(entry.id())?;
        stored.ok_or_else(|| {
            RepositoryError::backend(DbError::InvalidEntry {
                entry_id: entry.id().to_string(),
                message: "entry missing after write".to_string(),
            })
        })
    }

    fn load_entries_by_user(
        &self,
        user_id: &UserId,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<TimeEntry>, RepositoryError> {
        Ok(self.lock().list_entries(user_id, range)?)
    }

    fn find_overlapping(
        &self,
        user_id: &UserId,
        period: &TimePeriod,
        exclude: Option<&TimeEntryId>,
    ) -> Result<Vec<TimeEntryId>, RepositoryError> {
        Ok(self.lock().find_overlapping(user_id, period, exclude)?)
    }
}
