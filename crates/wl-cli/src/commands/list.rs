//! `wl list`: show a user's entries grouped by work date.

use std::io::Write;

use anyhow::Result;
use wl_core::boundary::EntryView;
use wl_core::{EntryRepository, Scheduler, TimeEntry, UserId, summary};

use super::util::format_minutes;
use crate::ListArgs;

pub fn run<W: Write, R: EntryRepository>(
    writer: &mut W,
    scheduler: &Scheduler<R>,
    args: &ListArgs,
) -> Result<()> {
    let user_id = UserId::new(args.user.as_str())?;
    let entries = match args.date {
        Some(date) => scheduler.entries_on(&user_id, date)?,
        None => scheduler.entries_for_user(&user_id)?,
    };

    if args.json {
        let views: Vec<EntryView> = entries.iter().map(EntryView::from).collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&views)?)?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(writer, "No entries for {user_id}.")?;
        return Ok(());
    }

    let mut current_date = None;
    for entry in &entries {
        let date = entry.work_date();
        if current_date != Some(date) {
            writeln!(writer, "{date}")?;
            current_date = Some(date);
        }
        write_line(writer, entry)?;
    }

    let noun = if entries.len() == 1 { "entry" } else { "entries" };
    writeln!(
        writer,
        "Total: {} ({} {noun})",
        format_minutes(summary::total_minutes(&entries)),
        entries.len()
    )?;
    Ok(())
}

fn write_line<W: Write>(writer: &mut W, entry: &TimeEntry) -> Result<()> {
    write!(
        writer,
        "  {}  {:>7}  {} / {}  {}",
        entry.period(),
        format_minutes(entry.duration_minutes()),
        entry.task_id(),
        entry.category_id(),
        entry.id()
    )?;
    if let Some(memo) = entry.memo() {
        write!(writer, "  \"{memo}\"")?;
    }
    writeln!(writer)?;
    Ok(())
}
