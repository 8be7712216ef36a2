//! Status command for showing the database and per-user entry counts.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use wl_db::SharedDatabase;

pub fn run<W: Write>(writer: &mut W, db: &SharedDatabase, database_path: &Path) -> Result<()> {
    let stats = db.lock().user_entry_stats()?;

    writeln!(writer, "Work log status")?;
    writeln!(writer, "Database: {}", database_path.display())?;

    if stats.is_empty() {
        writeln!(writer, "No entries recorded.")?;
        return Ok(());
    }

    writeln!(writer, "Users:")?;
    for user in stats {
        writeln!(
            writer,
            "- {}: {} active, {} cancelled",
            user.user_id, user.active, user.deleted
        )?;
    }

    Ok(())
}
