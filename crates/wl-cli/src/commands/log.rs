//! `wl log`: record a new block of work.

use std::io::Write;

use anyhow::Result;
use wl_core::{EntryRepository, NewEntry, Scheduler};

use super::util::{describe, parse_time};
use crate::LogArgs;

pub fn run<W: Write, R: EntryRepository>(
    writer: &mut W,
    scheduler: &Scheduler<R>,
    args: &LogArgs,
) -> Result<()> {
    let start = parse_time("start", &args.start)?;
    let end = parse_time("end", &args.end)?;

    let entry = scheduler.schedule_new(NewEntry {
        task_id: args.task.clone(),
        category_id: args.category.clone(),
        user_id: args.user.clone(),
        start,
        end,
        memo: args.memo.clone(),
    })?;

    writeln!(writer, "Logged {}", entry.id())?;
    writeln!(writer, "  {}", describe(&entry))?;
    Ok(())
}
