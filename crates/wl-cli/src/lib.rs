//! Work log CLI library.
//!
//! This crate provides the `wl` command-line interface over the scheduling
//! core and its SQLite store.

mod cli;
pub mod commands;
mod config;

pub use cli::{CancelArgs, Cli, Commands, EditArgs, GroupBy, ListArgs, LogArgs, ReportArgs};
pub use config::Config;

use wl_core::boundary::TimestampError;
use wl_core::{ErrorKind, MissingReference, ScheduleError};

/// Invalid input: bad timestamps, periods or missing references.
pub const EXIT_INVALID_INPUT: u8 = 2;
/// The requested time overlaps existing entries.
pub const EXIT_CONFLICT: u8 = 3;
/// The entry does not exist or belongs to someone else.
pub const EXIT_NOT_FOUND: u8 = 4;

/// Maps a command failure to the process exit code.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(err) = err.downcast_ref::<ScheduleError>() {
        return match err.kind() {
            ErrorKind::InvalidOrder
            | ErrorKind::InvalidGranularity
            | ErrorKind::MissingReference
            | ErrorKind::EntityDeleted
            | ErrorKind::AlreadyDeleted
            | ErrorKind::DateOutOfRange => EXIT_INVALID_INPUT,
            ErrorKind::ScheduleConflict => EXIT_CONFLICT,
            ErrorKind::NotFound | ErrorKind::Forbidden => EXIT_NOT_FOUND,
            ErrorKind::Storage => 1,
        };
    }
    if err.downcast_ref::<TimestampError>().is_some()
        || err.downcast_ref::<MissingReference>().is_some()
    {
        return EXIT_INVALID_INPUT;
    }
    1
}

/// Stable machine-readable code of a scheduling failure, if it is one.
pub fn error_code(err: &anyhow::Error) -> Option<&'static str> {
    err.downcast_ref::<ScheduleError>()
        .map(|err| err.kind().as_str())
}

/// The line printed to stderr when a command fails.
pub fn error_line(err: &anyhow::Error) -> String {
    match error_code(err) {
        Some(code) => format!("error[{code}]: {err:#}"),
        None => format!("error: {err:#}"),
    }
}
