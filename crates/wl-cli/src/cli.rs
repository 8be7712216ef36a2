//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Quarter-hour work log.
///
/// Logs blocks of work against tasks and categories. Entries for one user
/// never overlap, and every start and end falls on a 15-minute boundary.
///
/// Times are RFC 3339 (2025-01-29T09:00:00Z) or 'YYYY-MM-DD HH:MM', which is
/// read as Japan Standard Time, the zone work dates are counted in.
#[derive(Debug, Parser)]
#[command(name = "wl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log a new block of work.
    Log(LogArgs),

    /// Change the time, task, category or memo of an entry.
    Edit(EditArgs),

    /// Cancel an entry. Cancelled entries free their time slot.
    Cancel(CancelArgs),

    /// List a user's entries.
    List(ListArgs),

    /// Summarize logged time.
    Report(ReportArgs),

    /// Show database location and entry counts.
    Status,
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// User the entry belongs to.
    #[arg(long)]
    pub user: String,

    /// Task the time was spent on.
    #[arg(long)]
    pub task: String,

    /// Category of the work.
    #[arg(long)]
    pub category: String,

    /// Start time.
    #[arg(long)]
    pub start: String,

    /// End time (exclusive).
    #[arg(long)]
    pub end: String,

    /// Free-form note.
    #[arg(long)]
    pub memo: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Entry ID.
    pub id: String,

    /// User making the change. Must own the entry.
    #[arg(long)]
    pub user: String,

    /// New start time.
    #[arg(long)]
    pub start: Option<String>,

    /// New end time.
    #[arg(long)]
    pub end: Option<String>,

    /// New task.
    #[arg(long)]
    pub task: Option<String>,

    /// New category.
    #[arg(long)]
    pub category: Option<String>,

    /// New memo.
    #[arg(long, conflicts_with = "clear_memo")]
    pub memo: Option<String>,

    /// Remove the memo.
    #[arg(long)]
    pub clear_memo: bool,
}

#[derive(Debug, Args)]
pub struct CancelArgs {
    /// Entry ID.
    pub id: String,

    /// User cancelling the entry. Must own it.
    #[arg(long)]
    pub user: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// User whose entries to list.
    #[arg(long)]
    pub user: String,

    /// Only entries on this work date (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// User to report on.
    #[arg(long)]
    pub user: String,

    /// First work date to include (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last work date to include (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// How to group the totals.
    #[arg(long, value_enum, default_value_t = GroupBy::Day)]
    pub by: GroupBy,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Grouping for `wl report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    Day,
    Category,
    Task,
}

impl GroupBy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Category => "category",
            Self::Task => "task",
        }
    }
}
