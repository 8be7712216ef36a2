//! Scheduling core for the work log.
//!
//! This crate contains the rules for logging blocks of work time:
//! - Periods: half-open, quarter-hour aligned intervals
//! - Entries: immutable time entries with a one-way soft delete
//! - Conflicts: per-user overlap detection
//! - Scheduling: create/reschedule/cancel, serialized per user
//! - Work dates: the single civil-date rule used for grouping

pub mod boundary;
mod entry;
mod error;
pub mod memory;
mod overlap;
mod period;
mod repository;
mod service;
pub mod summary;
mod types;
pub mod work_date;

pub use entry::{EntryError, EntrySnapshot, EntryState, TimeEntry};
pub use error::{ErrorKind, ScheduleError};
pub use overlap::{ActivePeriod, find_conflicts};
pub use period::{PeriodError, QUARTER_HOUR_MINUTES, TimePeriod};
pub use repository::{EntryRepository, RepositoryError};
pub use service::{EntryChanges, NewEntry, Scheduler};
pub use types::{CategoryId, MissingReference, TaskId, TimeEntryId, UserId};
