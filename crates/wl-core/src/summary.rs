//! Grouping and summation over already-valid entries.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::entry::TimeEntry;
use crate::types::{CategoryId, TaskId};

/// Logged time for one group of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Total<K> {
    pub key: K,
    pub entry_count: usize,
    pub minutes: i64,
    pub first_work_date: NaiveDate,
    pub last_work_date: NaiveDate,
}

impl<K> Total<K> {
    fn start(key: K, entry: &TimeEntry) -> Self {
        let date = entry.work_date();
        Self {
            key,
            entry_count: 1,
            minutes: entry.duration_minutes(),
            first_work_date: date,
            last_work_date: date,
        }
    }

    fn add(&mut self, entry: &TimeEntry) {
        let date = entry.work_date();
        self.entry_count += 1;
        self.minutes += entry.duration_minutes();
        self.first_work_date = self.first_work_date.min(date);
        self.last_work_date = self.last_work_date.max(date);
    }
}

/// Totals per work date, oldest first.
pub fn by_work_date(entries: &[TimeEntry]) -> Vec<Total<NaiveDate>> {
    group(entries, TimeEntry::work_date)
}

/// Totals per category, ordered by category ID.
pub fn by_category(entries: &[TimeEntry]) -> Vec<Total<CategoryId>> {
    group(entries, |entry| entry.category_id().clone())
}

/// Totals per task, ordered by task ID.
pub fn by_task(entries: &[TimeEntry]) -> Vec<Total<TaskId>> {
    group(entries, |entry| entry.task_id().clone())
}

/// Sum of all active entries, in minutes.
pub fn total_minutes(entries: &[TimeEntry]) -> i64 {
    entries
        .iter()
        .filter(|entry| !entry.is_deleted())
        .map(TimeEntry::duration_minutes)
        .sum()
}

fn group<K, F>(entries: &[TimeEntry], key_of: F) -> Vec<Total<K>>
where
    K: Ord + Clone,
    F: Fn(&TimeEntry) -> K,
{
    let mut totals: BTreeMap<K, Total<K>> = BTreeMap::new();
    for entry in entries.iter().filter(|entry| !entry.is_deleted()) {
        let key = key_of(entry);
        match totals.get_mut(&key) {
            Some(total) => total.add(entry),
            None => {
                totals.insert(key.clone(), Total::start(key, entry));
            }
        }
    }
    totals.into_values().collect()
}
