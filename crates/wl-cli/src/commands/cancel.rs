//! `wl cancel`: soft-delete an entry.

use std::io::Write;

use anyhow::Result;
use wl_core::{EntryRepository, Scheduler, TimeEntryId, UserId};

use crate::CancelArgs;

pub fn run<W: Write, R: EntryRepository>(
    writer: &mut W,
    scheduler: &Scheduler<R>,
    args: &CancelArgs,
) -> Result<()> {
    let entry_id = TimeEntryId::new(args.id.as_str())?;
    let user_id = UserId::new(args.user.as_str())?;

    scheduler.cancel(&entry_id, &user_id)?;
    writeln!(writer, "Cancelled {entry_id}")?;
    Ok(())
}
