//! Report command for summarizing logged time.
//!
//! Totals a user's entries by work date, category or task, either over
//! everything logged or over an inclusive range of work dates.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use wl_core::summary::{self, Total};
use wl_core::{EntryRepository, Scheduler, TimeEntry, UserId};

use super::util::{format_minutes, progress_bar};
use crate::{GroupBy, ReportArgs};

/// Computed report data.
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub user_id: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub group_by: &'static str,
    pub groups: Vec<Total<String>>,
    pub total_minutes: i64,
    pub entry_count: usize,
    pub work_date_count: usize,
}

/// Loads the entries whose work dates fall in `[from, to]`.
fn load_entries<R: EntryRepository>(
    scheduler: &Scheduler<R>,
    user_id: &UserId,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<TimeEntry>> {
    if let (Some(from), Some(to)) = (from, to) {
        return Ok(scheduler.entries_between(user_id, from, to)?);
    }
    let entries = scheduler.entries_for_user(user_id)?;
    Ok(entries
        .into_iter()
        .filter(|entry| {
            let date = entry.work_date();
            from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
        })
        .collect())
}

fn stringify<K: ToString>(totals: Vec<Total<K>>) -> Vec<Total<String>> {
    totals
        .into_iter()
        .map(|total| Total {
            key: total.key.to_string(),
            entry_count: total.entry_count,
            minutes: total.minutes,
            first_work_date: total.first_work_date,
            last_work_date: total.last_work_date,
        })
        .collect()
}

/// Generates report data for one user.
pub fn generate_report_data<R: EntryRepository>(
    scheduler: &Scheduler<R>,
    args: &ReportArgs,
) -> Result<ReportData> {
    let user_id = UserId::new(args.user.as_str())?;
    let entries = load_entries(scheduler, &user_id, args.from, args.to)?;

    let by_date = summary::by_work_date(&entries);
    let groups = match args.by {
        GroupBy::Day => stringify(by_date.clone()),
        GroupBy::Category => stringify(summary::by_category(&entries)),
        GroupBy::Task => stringify(summary::by_task(&entries)),
    };

    Ok(ReportData {
        user_id: user_id.to_string(),
        from: args.from.or_else(|| by_date.first().map(|total| total.key)),
        to: args.to.or_else(|| by_date.last().map(|total| total.key)),
        group_by: args.by.as_str(),
        groups,
        total_minutes: summary::total_minutes(&entries),
        entry_count: entries.len(),
        work_date_count: by_date.len(),
    })
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "entry" } else { "entries" }
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> Result<String> {
    let mut output = String::new();

    match (data.from, data.to) {
        (Some(from), Some(to)) => {
            writeln!(output, "WORK REPORT: {}, {from} to {to}", data.user_id)?;
        }
        (Some(from), None) => writeln!(output, "WORK REPORT: {}, from {from}", data.user_id)?,
        (None, Some(to)) => writeln!(output, "WORK REPORT: {}, until {to}", data.user_id)?,
        (None, None) => writeln!(output, "WORK REPORT: {}", data.user_id)?,
    }

    if data.groups.is_empty() {
        writeln!(output)?;
        writeln!(output, "No entries logged in this range.")?;
        return Ok(output);
    }

    let heading = format!("BY {}", data.group_by.to_uppercase());
    writeln!(output)?;
    writeln!(output, "{heading}")?;
    writeln!(output, "{}", "─".repeat(heading.chars().count()))?;

    let max = data.groups.iter().map(|total| total.minutes).max().unwrap_or(0);
    for total in &data.groups {
        writeln!(
            output,
            "{:<16}{:>8}  {}  {} {}",
            total.key,
            format_minutes(total.minutes),
            progress_bar(total.minutes, max),
            total.entry_count,
            plural(total.entry_count)
        )?;
    }

    writeln!(output)?;
    writeln!(output, "SUMMARY")?;
    writeln!(output, "───────")?;
    writeln!(output, "Total logged:  {}", format_minutes(data.total_minutes))?;
    writeln!(output, "Entries:       {}", data.entry_count)?;
    writeln!(output, "Work dates:    {}", data.work_date_count)?;

    Ok(output)
}

/// Runs the report command.
pub fn run<W: Write, R: EntryRepository>(
    writer: &mut W,
    scheduler: &Scheduler<R>,
    args: &ReportArgs,
) -> Result<()> {
    let data = generate_report_data(scheduler, args)?;

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&data)?)?;
    } else {
        write!(writer, "{}", format_report(&data)?)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use wl_core::NewEntry;
    use wl_core::boundary::parse_instant;
    use wl_db::SharedDatabase;

    fn log(
        scheduler: &Scheduler<SharedDatabase>,
        task: &str,
        category: &str,
        start: &str,
        end: &str,
    ) {
        scheduler
            .schedule_new(NewEntry {
                task_id: task.to_string(),
                category_id: category.to_string(),
                user_id: "alice".to_string(),
                start: parse_instant(start).unwrap(),
                end: parse_instant(end).unwrap(),
                memo: None,
            })
            .unwrap();
    }

    fn seeded() -> Scheduler<SharedDatabase> {
        let scheduler = Scheduler::new(SharedDatabase::open_in_memory().unwrap());
        log(&scheduler, "api", "dev", "2025-01-29 09:00", "2025-01-29 10:00");
        log(&scheduler, "api", "review", "2025-01-29 10:00", "2025-01-29 10:45");
        log(&scheduler, "docs", "dev", "2025-01-30 09:00", "2025-01-30 09:30");
        scheduler
    }

    fn args(by: GroupBy) -> ReportArgs {
        ReportArgs {
            user: "alice".to_string(),
            from: None,
            to: None,
            by,
            json: false,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn render(scheduler: &Scheduler<SharedDatabase>, args: &ReportArgs) -> String {
        let mut output = Vec::new();
        run(&mut output, scheduler, args).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn report_by_day() {
        let scheduler = seeded();
        assert_snapshot!(render(&scheduler, &args(GroupBy::Day)), @r"
        WORK REPORT: alice, 2025-01-29 to 2025-01-30

        BY DAY
        ──────
        2025-01-29        1h 45m  ██████████  2 entries
        2025-01-30           30m  ███░░░░░░░  1 entry

        SUMMARY
        ───────
        Total logged:  2h 15m
        Entries:       3
        Work dates:    2
        ");
    }

    #[test]
    fn report_by_category() {
        let scheduler = seeded();
        assert_snapshot!(render(&scheduler, &args(GroupBy::Category)), @r"
        WORK REPORT: alice, 2025-01-29 to 2025-01-30

        BY CATEGORY
        ───────────
        dev               1h 30m  ██████████  2 entries
        review               45m  █████░░░░░  1 entry

        SUMMARY
        ───────
        Total logged:  2h 15m
        Entries:       3
        Work dates:    2
        ");
    }

    #[test]
    fn report_range_limits_work_dates() {
        let scheduler = seeded();
        let args = ReportArgs {
            from: Some(date(30)),
            ..args(GroupBy::Task)
        };
        let data = generate_report_data(&scheduler, &args).unwrap();
        assert_eq!(data.from, Some(date(30)));
        assert_eq!(data.to, Some(date(30)));
        assert_eq!(data.entry_count, 1);
        assert_eq!(data.groups.len(), 1);
        assert_eq!(data.groups[0].key, "docs");

        let args = ReportArgs {
            from: Some(date(29)),
            to: Some(date(29)),
            ..args
        };
        let data = generate_report_data(&scheduler, &args).unwrap();
        assert_eq!(data.total_minutes, 105);
        let keys: Vec<_> = data.groups.iter().map(|total| total.key.as_str()).collect();
        assert_eq!(keys, vec!["api"]);
    }

    #[test]
    fn report_empty_range() {
        let scheduler = seeded();
        let args = ReportArgs {
            from: Some(date(31)),
            to: Some(date(31)),
            ..args(GroupBy::Day)
        };
        assert_snapshot!(render(&scheduler, &args), @r"
        WORK REPORT: alice, 2025-01-31 to 2025-01-31

        No entries logged in this range.
        ");
    }

    #[test]
    fn report_json_output() {
        let scheduler = seeded();
        let args = ReportArgs {
            json: true,
            ..args(GroupBy::Category)
        };
        let json: serde_json::Value = serde_json::from_str(&render(&scheduler, &args)).unwrap();
        assert_eq!(json["user_id"], "alice");
        assert_eq!(json["group_by"], "category");
        assert_eq!(json["from"], "2025-01-29");
        assert_eq!(json["total_minutes"], 135);
        assert_eq!(json["groups"][0]["key"], "dev");
        assert_eq!(json["groups"][0]["minutes"], 90);
        assert_eq!(json["groups"][0]["last_work_date"], "2025-01-30");
    }
}
