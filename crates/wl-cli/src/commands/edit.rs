//! `wl edit`: change an existing entry.

use std::io::Write;

use anyhow::Result;
use wl_core::{EntryChanges, EntryRepository, Scheduler, TimeEntryId, UserId};

use super::util::{describe, parse_time};
use crate::EditArgs;

pub fn run<W: Write, R: EntryRepository>(
    writer: &mut W,
    scheduler: &Scheduler<R>,
    args: &EditArgs,
) -> Result<()> {
    let entry_id = TimeEntryId::new(args.id.as_str())?;
    let user_id = UserId::new(args.user.as_str())?;

    let memo = if args.clear_memo {
        Some(None)
    } else {
        args.memo.clone().map(Some)
    };
    let changes = EntryChanges {
        start: args
            .start
            .as_deref()
            .map(|value| parse_time("start", value))
            .transpose()?,
        end: args
            .end
            .as_deref()
            .map(|value| parse_time("end", value))
            .transpose()?,
        task_id: args.task.clone(),
        category_id: args.category.clone(),
        memo,
    };

    let entry = scheduler.reschedule(&entry_id, &user_id, changes)?;
    writeln!(writer, "Updated {}", entry.id())?;
    writeln!(writer, "  {}", describe(&entry))?;
    Ok(())
}
