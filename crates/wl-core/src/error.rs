//! Scheduling errors and their stable kinds.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::entry::EntryError;
use crate::period::PeriodError;
use crate::repository::RepositoryError;
use crate::types::{TimeEntryId, UserId};

/// Errors returned by the scheduling service.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Entry(#[from] EntryError),

    /// The period overlaps one or more of the user's active entries.
    #[error("the requested time overlaps existing entries: {}", join_ids(.conflicting))]
    ScheduleConflict { conflicting: Vec<TimeEntryId> },

    #[error("time entry not found: {id}")]
    NotFound { id: TimeEntryId },

    /// The entry exists but belongs to someone else.
    #[error("time entry {id} does not belong to user {user_id}")]
    Forbidden { id: TimeEntryId, user_id: UserId },

    /// A work date whose bounds fall outside the supported years.
    #[error("work date {date} is outside the supported range (years 0000-9999)")]
    DateOutOfRange { date: NaiveDate },

    #[error(transparent)]
    Storage(RepositoryError),
}

impl From<RepositoryError> for ScheduleError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(conflicting) => Self::ScheduleConflict { conflicting },
            other @ RepositoryError::Backend(_) => Self::Storage(other),
        }
    }
}

impl From<PeriodError> for ScheduleError {
    fn from(err: PeriodError) -> Self {
        Self::Entry(err.into())
    }
}

fn join_ids(ids: &[TimeEntryId]) -> String {
    ids.iter()
        .map(TimeEntryId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Stable classification of a [`ScheduleError`] for outer layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidOrder,
    InvalidGranularity,
    MissingReference,
    EntityDeleted,
    AlreadyDeleted,
    ScheduleConflict,
    NotFound,
    Forbidden,
    DateOutOfRange,
    Storage,
}

impl ErrorKind {
    /// Machine-readable code, e.g. for JSON error bodies.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidOrder => "invalid_order",
            Self::InvalidGranularity => "invalid_granularity",
            Self::MissingReference => "missing_reference",
            Self::EntityDeleted => "entity_deleted",
            Self::AlreadyDeleted => "already_deleted",
            Self::ScheduleConflict => "schedule_conflict",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::DateOutOfRange => "date_out_of_range",
            Self::Storage => "storage",
        }
    }

    /// True for errors the caller can fix by changing the request.
    /// None of these are retried.
    pub const fn is_caller_error(self) -> bool {
        !matches!(self, Self::Storage)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ScheduleError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Entry(EntryError::Period(PeriodError::InvalidOrder { .. })) => {
                ErrorKind::InvalidOrder
            }
            Self::Entry(EntryError::Period(PeriodError::InvalidGranularity { .. })) => {
                ErrorKind::InvalidGranularity
            }
            Self::Entry(EntryError::MissingReference(_)) => ErrorKind::MissingReference,
            Self::Entry(EntryError::EntityDeleted { .. }) => ErrorKind::EntityDeleted,
            Self::Entry(EntryError::AlreadyDeleted { .. }) => ErrorKind::AlreadyDeleted,
            Self::ScheduleConflict { .. } => ErrorKind::ScheduleConflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::DateOutOfRange { .. } => ErrorKind::DateOutOfRange,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// IDs of conflicting entries, if this is a conflict.
    pub fn conflicting_ids(&self) -> &[TimeEntryId] {
        match self {
            Self::ScheduleConflict { conflicting } => conflicting,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MissingReference;

    fn id(value: &str) -> TimeEntryId {
        TimeEntryId::new(value).unwrap()
    }

    #[test]
    fn kinds_have_distinct_codes() {
        let kinds = [
            ErrorKind::InvalidOrder,
            ErrorKind::InvalidGranularity,
            ErrorKind::MissingReference,
            ErrorKind::EntityDeleted,
            ErrorKind::AlreadyDeleted,
            ErrorKind::ScheduleConflict,
            ErrorKind::NotFound,
            ErrorKind::Forbidden,
            ErrorKind::DateOutOfRange,
            ErrorKind::Storage,
        ];
        let codes: std::collections::HashSet<_> = kinds.iter().map(|k| k.as_str()).collect();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn entry_errors_map_to_their_kind() {
        let missing: ScheduleError = EntryError::from(MissingReference { field: "task ID" }).into();
        assert_eq!(missing.kind(), ErrorKind::MissingReference);

        let deleted: ScheduleError = EntryError::EntityDeleted { id: id("e1") }.into();
        assert_eq!(deleted.kind(), ErrorKind::EntityDeleted);
        assert!(deleted.kind().is_caller_error());
    }

    #[test]
    fn repository_conflict_becomes_schedule_conflict() {
        let err: ScheduleError = RepositoryError::Conflict(vec![id("a"), id("b")]).into();
        assert_eq!(err.kind(), ErrorKind::ScheduleConflict);
        assert_eq!(err.conflicting_ids(), &[id("a"), id("b")]);
        assert_eq!(
            err.to_string(),
            "the requested time overlaps existing entries: a, b"
        );
    }

    #[test]
    fn backend_failure_is_storage_kind() {
        let io = std::io::Error::other("disk full");
        let err: ScheduleError = RepositoryError::backend(io).into();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(!err.kind().is_caller_error());
        assert!(err.conflicting_ids().is_empty());
    }
}
