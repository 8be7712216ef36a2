//! CLI subcommand implementations.

pub mod cancel;
pub mod edit;
pub mod list;
pub mod log;
pub mod report;
pub mod status;
mod util;
