//! Storage layer for the work log.
//!
//! Provides persistence for time entries using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! [`SharedDatabase`] puts it behind a `Mutex` so it can back a
//! [`wl_core::Scheduler`] that is shared across threads.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 with nanosecond precision and a
//! `Z` suffix (e.g., `2025-01-29T09:00:00.000000000Z`). The fixed width means:
//! - Lexicographic ordering matches chronological ordering, so overlap
//!   queries can compare the columns directly
//! - Values round-trip without losing precision
//!
//! ## Work Dates
//!
//! Work dates are never stored. Date queries translate a work date into its
//! UTC bounds with [`wl_core::work_date::day_bounds`] and filter on `start_time`.
//!
//! ## Overlap Guard
//!
//! [`Database::upsert_entry`] re-checks overlap inside an `IMMEDIATE`
//! transaction before writing an active entry. Separate processes sharing one
//! database file therefore cannot both commit overlapping entries for a user.

mod repository;

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use thiserror::Error;

use wl_core::{
    ActivePeriod, CategoryId, EntrySnapshot, TaskId, TimeEntry, TimeEntryId, TimePeriod, UserId,
};

pub use repository::SharedDatabase;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for entry {entry_id}: {timestamp}")]
    TimestampParse {
        entry_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored row no longer forms a valid entry.
    #[error("invalid time entry {entry_id}: {message}")]
    InvalidEntry { entry_id: String, message: String },
    /// Writing the entry would overlap the user's other active entries.
    #[error("time entry {entry_id} overlaps {} active entries", .conflicting.len())]
    Overlap {
        entry_id: String,
        conflicting: Vec<TimeEntryId>,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A time entry row as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    pub id: String,
    pub task_id: String,
    pub category_id: String,
    pub user_id: String,
    pub start_time: String,
    pub end_time: String,
    pub memo: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

/// Entry counts for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntryStats {
    pub user_id: String,
    pub active: i64,
    pub deleted: i64,
}

const ENTRY_COLUMNS: &str = "id, task_id, category_id, user_id, start_time, end_time, memo, created_at, updated_at, deleted_at";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        self.conn.execute_batch(
            "
            -- Time entries: one logged block of work per row
            -- start_time/end_time: RFC 3339, UTC, fixed width; half-open [start, end)
            -- deleted_at: soft-delete marker, NULL while active
            CREATE TABLE IF NOT EXISTS time_entries (
                id TEXT PRIMARY KEY,
                task_id TEXT NOT NULL,
                category_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                memo TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                deleted_at TEXT,
                CHECK (start_time < end_time)
            );

            CREATE INDEX IF NOT EXISTS idx_time_entries_user_start ON time_entries(user_id, start_time);
            CREATE INDEX IF NOT EXISTS idx_time_entries_task ON time_entries(task_id);
            CREATE INDEX IF NOT EXISTS idx_time_entries_category ON time_entries(category_id);
            ",
        )?;
        Ok(())
    }

    /// Inserts or updates an entry by ID.
    ///
    /// Active entries are checked against the user's other active entries
    /// in the same transaction as the write. `user_id` and `created_at` of
    /// an existing row are never changed.
    pub fn upsert_entry(&mut self, entry: &TimeEntry) -> Result<(), DbError> {
        let record = EntryRecord::from(entry);
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !entry.is_deleted() {
            let conflicting = query_overlapping(
                &tx,
                &record.user_id,
                &record.start_time,
                &record.end_time,
                Some(&record.id),
            )?;
            if !conflicting.is_empty() {
                tracing::warn!(
                    entry_id = %record.id,
                    conflicts = conflicting.len(),
                    "refusing overlapping write"
                );
                return Err(DbError::Overlap {
                    entry_id: record.id,
                    conflicting,
                });
            }
        }

        tx.execute(
            "
            INSERT INTO time_entries
            (id, task_id, category_id, user_id, start_time, end_time, memo, created_at, updated_at, deleted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                task_id = excluded.task_id,
                category_id = excluded.category_id,
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                memo = excluded.memo,
                updated_at = excluded.updated_at,
                deleted_at = excluded.deleted_at
            ",
            params![
                record.id,
                record.task_id,
                record.category_id,
                record.user_id,
                record.start_time,
                record.end_time,
                record.memo,
                record.created_at,
                record.updated_at,
                record.deleted_at,
            ],
        )?;
        tx.commit()?;
        tracing::debug!(entry_id = %record.id, "stored time entry");
        Ok(())
    }

    /// Loads an entry by ID, including soft-deleted entries.
    pub fn get_entry(&self, id: &TimeEntryId) -> Result<Option<TimeEntry>, DbError> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM time_entries WHERE id = ?"),
                [id.as_str()],
                read_record,
            )
            .optional()?;
        record.map(EntryRecord::into_entry).transpose()
    }

    /// Lists a user's active entries ordered by start time then ID.
    ///
    /// With `range`, only entries starting in `[from, to)` are returned.
    pub fn list_entries(
        &self,
        user_id: &UserId,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<TimeEntry>, DbError> {
        let (from, to) = match range {
            Some((from, to)) => (Some(format_timestamp(from)), Some(format_timestamp(to))),
            None => (None, None),
        };
        let mut stmt = self.conn.prepare(&format!(
            "
            SELECT {ENTRY_COLUMNS}
            FROM time_entries
            WHERE user_id = ?1
              AND deleted_at IS NULL
              AND (?2 IS NULL OR start_time >= ?2)
              AND (?3 IS NULL OR start_time < ?3)
            ORDER BY start_time ASC, id ASC
            "
        ))?;
        let rows = stmt.query_map(params![user_id.as_str(), from, to], read_record)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.into_entry()?);
        }
        Ok(entries)
    }

    /// Lists the IDs and periods of a user's active entries.
    pub fn list_active_periods(&self, user_id: &UserId) -> Result<Vec<ActivePeriod>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, start_time, end_time
            FROM time_entries
            WHERE user_id = ? AND deleted_at IS NULL
            ORDER BY start_time ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([user_id.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let mut periods = Vec::new();
        for row in rows {
            let (id, start, end) = row?;
            let period = TimePeriod::new(parse_timestamp(&start, &id)?, parse_timestamp(&end, &id)?)
                .map_err(|err| invalid_entry(&id, &err))?;
            let id = TimeEntryId::new(id.clone()).map_err(|err| invalid_entry(&id, &err))?;
            periods.push(ActivePeriod::new(id, period));
        }
        Ok(periods)
    }

    /// IDs of a user's active entries overlapping `period`, skipping `exclude`.
    pub fn find_overlapping(
        &self,
        user_id: &UserId,
        period: &TimePeriod,
        exclude: Option<&TimeEntryId>,
    ) -> Result<Vec<TimeEntryId>, DbError> {
        query_overlapping(
            &self.conn,
            user_id.as_str(),
            &format_timestamp(period.start()),
            &format_timestamp(period.end()),
            exclude.map(TimeEntryId::as_str),
        )
    }

    /// Entry counts per user, ordered by user ID.
    pub fn user_entry_stats(&self) -> Result<Vec<UserEntryStats>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT user_id,
                   SUM(CASE WHEN deleted_at IS NULL THEN 1 ELSE 0 END) AS active,
                   SUM(CASE WHEN deleted_at IS NULL THEN 0 ELSE 1 END) AS deleted
            FROM time_entries
            GROUP BY user_id
            ORDER BY user_id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(UserEntryStats {
                user_id: row.get(0)?,
                active: row.get(1)?,
                deleted: row.get(2)?,
            })
        })?;
        let mut stats = Vec::new();
        for row in rows {
            stats.push(row?);
        }
        Ok(stats)
    }
}

/// Half-open overlap: an existing row conflicts iff it starts before the
/// candidate ends and ends after the candidate starts.
fn query_overlapping(
    conn: &Connection,
    user_id: &str,
    start_time: &str,
    end_time: &str,
    exclude: Option<&str>,
) -> Result<Vec<TimeEntryId>, DbError> {
    let mut stmt = conn.prepare(
        "
        SELECT id
        FROM time_entries
        WHERE user_id = ?1
          AND deleted_at IS NULL
          AND start_time < ?3
          AND end_time > ?2
          AND (?4 IS NULL OR id != ?4)
        ORDER BY start_time ASC, id ASC
        ",
    )?;
    let rows = stmt.query_map(params![user_id, start_time, end_time, exclude], |row| {
        row.get::<_, String>(0)
    })?;
    let mut ids = Vec::new();
    for row in rows {
        let id = row?;
        ids.push(TimeEntryId::new(id.clone()).map_err(|err| invalid_entry(&id, &err))?);
    }
    Ok(ids)
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<EntryRecord> {
    Ok(EntryRecord {
        id: row.get(0)?,
        task_id: row.get(1)?,
        category_id: row.get(2)?,
        user_id: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        memo: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
        deleted_at: row.get(9)?,
    })
}

impl From<&TimeEntry> for EntryRecord {
    fn from(entry: &TimeEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            task_id: entry.task_id().to_string(),
            category_id: entry.category_id().to_string(),
            user_id: entry.user_id().to_string(),
            start_time: format_timestamp(entry.period().start()),
            end_time: format_timestamp(entry.period().end()),
            memo: entry.memo().map(str::to_string),
            created_at: format_timestamp(entry.created_at()),
            updated_at: format_timestamp(entry.updated_at()),
            deleted_at: entry.deleted_at().map(format_timestamp),
        }
    }
}

impl EntryRecord {
    /// Converts the row into a validated entry.
    pub fn into_entry(self) -> Result<TimeEntry, DbError> {
        let id = &self.id;
        let snapshot = EntrySnapshot {
            id: TimeEntryId::new(id.clone()).map_err(|err| invalid_entry(id, &err))?,
            task_id: TaskId::new(self.task_id).map_err(|err| invalid_entry(id, &err))?,
            category_id: CategoryId::new(self.category_id).map_err(|err| invalid_entry(id, &err))?,
            user_id: UserId::new(self.user_id).map_err(|err| invalid_entry(id, &err))?,
            start: parse_timestamp(&self.start_time, id)?,
            end: parse_timestamp(&self.end_time, id)?,
            memo: self.memo,
            created_at: parse_timestamp(&self.created_at, id)?,
            updated_at: parse_timestamp(&self.updated_at, id)?,
            deleted_at: self
                .deleted_at
                .as_deref()
                .map(|value| parse_timestamp(value, id))
                .transpose()?,
        };
        TimeEntry::restore(snapshot).map_err(|err| invalid_entry(id, &err))
    }
}

fn invalid_entry(entry_id: &str, err: &dyn std::error::Error) -> DbError {
    DbError::InvalidEntry {
        entry_id: entry_id.to_string(),
        message: err.to_string(),
    }
}

fn parse_timestamp(timestamp: &str, entry_id: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            entry_id: entry_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use chrono::TimeZone;
    use wl_core::find_conflicts;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 29, h, m, 0).unwrap()
    }

    fn entry(user: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> TimeEntry {
        TimeEntry::create("task-1", "dev", user, start, end, Some("notes".to_string())).unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn open_in_memory_database() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().expect("open in-memory db");

        let columns = table_columns(&db.conn, "time_entries");
        assert_eq!(
            columns,
            vec![
                "id",
                "task_id",
                "category_id",
                "user_id",
                "start_time",
                "end_time",
                "memo",
                "created_at",
                "updated_at",
                "deleted_at",
            ]
        );

        let indexes = index_names(&db.conn, "time_entries");
        let expected: HashSet<String> = [
            "idx_time_entries_user_start",
            "idx_time_entries_task",
            "idx_time_entries_category",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert!(expected.is_subset(&indexes));
    }

    fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .expect("prepare table_info");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query table_info");
        rows.map(|row| row.expect("table_info row")).collect()
    }

    fn index_names(conn: &Connection, table: &str) -> HashSet<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA index_list({table})"))
            .expect("prepare index_list");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query index_list");
        rows.map(|row| row.expect("index_list row")).collect()
    }

    #[test]
    fn upsert_then_get_roundtrips() {
        let mut db = Database::open_in_memory().unwrap();
        let original = entry("u", at(9, 0), at(10, 0));
        db.upsert_entry(&original).unwrap();

        let loaded = db.get_entry(original.id()).unwrap().unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn get_missing_entry_is_none() {
        let db = Database::open_in_memory().unwrap();
        let id = TimeEntryId::new("missing").unwrap();
        assert!(db.get_entry(&id).unwrap().is_none());
    }

    #[test]
    fn upsert_updates_in_place_and_keeps_created_at() {
        let mut db = Database::open_in_memory().unwrap();
        let original = entry("u", at(9, 0), at(10, 0));
        db.upsert_entry(&original).unwrap();

        let moved = original.with_period(at(9, 30), at(11, 0)).unwrap();
        db.upsert_entry(&moved).unwrap();

        let loaded = db.get_entry(original.id()).unwrap().unwrap();
        assert_eq!(loaded.period(), moved.period());
        assert_eq!(loaded.created_at(), original.created_at());

        let count: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM time_entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn soft_deleted_entries_stay_loadable_but_inactive() {
        let mut db = Database::open_in_memory().unwrap();
        let original = entry("u", at(9, 0), at(10, 0));
        db.upsert_entry(&original).unwrap();
        db.upsert_entry(&original.soft_delete().unwrap()).unwrap();

        let loaded = db.get_entry(original.id()).unwrap().unwrap();
        assert!(loaded.is_deleted());
        assert!(db.list_active_periods(&user("u")).unwrap().is_empty());
        assert!(db.list_entries(&user("u"), None).unwrap().is_empty());
    }

    #[test]
    fn upsert_refuses_overlapping_active_entry() {
        let mut db = Database::open_in_memory().unwrap();
        let first = entry("u", at(9, 0), at(10, 0));
        db.upsert_entry(&first).unwrap();

        let clash = entry("u", at(9, 45), at(10, 15));
        let err = db.upsert_entry(&clash).unwrap_err();
        match err {
            DbError::Overlap { conflicting, .. } => {
                assert_eq!(conflicting, vec![first.id().clone()]);
            }
            other => panic!("expected overlap, got {other:?}"),
        }
        assert!(db.get_entry(clash.id()).unwrap().is_none());

        // Adjacent entries and other users are fine.
        db.upsert_entry(&entry("u", at(10, 0), at(11, 0))).unwrap();
        db.upsert_entry(&entry("other", at(9, 0), at(10, 0))).unwrap();
    }

    #[test]
    fn upsert_excludes_the_entry_itself() {
        let mut db = Database::open_in_memory().unwrap();
        let original = entry("u", at(9, 0), at(10, 0));
        db.upsert_entry(&original).unwrap();
        let grown = original.with_period(at(8, 45), at(10, 15)).unwrap();
        db.upsert_entry(&grown).unwrap();
    }

    #[test]
    fn sql_overlap_agrees_with_detector() {
        let mut db = Database::open_in_memory().unwrap();
        let u = user("u");
        for (sh, eh) in [(8, 9), (9, 10), (11, 13), (14, 15)] {
            db.upsert_entry(&entry("u", at(sh, 0), at(eh, 0))).unwrap();
        }
        let active = db.list_active_periods(&u).unwrap();
        assert_eq!(active.len(), 4);

        let candidates = [
            (at(7, 0), at(8, 0)),
            (at(8, 45), at(9, 15)),
            (at(10, 0), at(11, 0)),
            (at(10, 30), at(11, 15)),
            (at(12, 0), at(12, 15)),
            (at(7, 0), at(16, 0)),
        ];
        for (start, end) in candidates {
            let candidate = TimePeriod::new(start, end).unwrap();
            let from_sql = db.find_overlapping(&u, &candidate, None).unwrap();
            let from_scan = find_conflicts(&candidate, &active, None);
            assert_eq!(from_sql, from_scan, "candidate {candidate}");

            let excluded = active[1].id.clone();
            let from_sql = db.find_overlapping(&u, &candidate, Some(&excluded)).unwrap();
            let from_scan = find_conflicts(&candidate, &active, Some(&excluded));
            assert_eq!(from_sql, from_scan, "candidate {candidate} excluding");
        }
    }

    #[test]
    fn list_entries_filters_by_range_and_orders_by_start() {
        let mut db = Database::open_in_memory().unwrap();
        let late = entry("u", at(13, 0), at(14, 0));
        let early = entry("u", at(9, 0), at(10, 0));
        db.upsert_entry(&late).unwrap();
        db.upsert_entry(&early).unwrap();
        db.upsert_entry(&entry("other", at(9, 0), at(10, 0))).unwrap();

        let all = db.list_entries(&user("u"), None).unwrap();
        assert_eq!(all, vec![early.clone(), late.clone()]);

        let morning = db
            .list_entries(&user("u"), Some((at(0, 0), at(12, 0))))
            .unwrap();
        assert_eq!(morning, vec![early]);

        // Range end is exclusive.
        let afternoon = db
            .list_entries(&user("u"), Some((at(12, 0), at(13, 0))))
            .unwrap();
        assert!(afternoon.is_empty());
    }

    #[test]
    fn corrupt_rows_are_reported() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "
                INSERT INTO time_entries
                (id, task_id, category_id, user_id, start_time, end_time, created_at, updated_at)
                VALUES ('bad', 't', 'c', 'u', '2025-01-29T09:10:00Z', '2025-01-29T10:00:00Z',
                        '2025-01-29T00:00:00Z', '2025-01-29T00:00:00Z')
                ",
                [],
            )
            .unwrap();

        let id = TimeEntryId::new("bad").unwrap();
        let err = db.get_entry(&id).unwrap_err();
        assert!(matches!(err, DbError::InvalidEntry { .. }), "{err:?}");
        assert!(err.to_string().contains("15-minute boundary"));
    }

    #[test]
    fn unparseable_timestamp_is_reported() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "
                INSERT INTO time_entries
                (id, task_id, category_id, user_id, start_time, end_time, created_at, updated_at)
                VALUES ('bad', 't', 'c', 'u', 'yesterday', 'today', 'x', 'y')
                ",
                [],
            )
            .unwrap();
        let id = TimeEntryId::new("bad").unwrap();
        assert!(matches!(
            db.get_entry(&id),
            Err(DbError::TimestampParse { .. })
        ));
    }

    #[test]
    fn user_entry_stats_counts_active_and_deleted() {
        let mut db = Database::open_in_memory().unwrap();
        let a = entry("alice", at(9, 0), at(10, 0));
        db.upsert_entry(&a).unwrap();
        db.upsert_entry(&entry("alice", at(10, 0), at(11, 0))).unwrap();
        db.upsert_entry(&a.soft_delete().unwrap()).unwrap();
        db.upsert_entry(&entry("bob", at(9, 0), at(10, 0))).unwrap();

        let stats = db.user_entry_stats().unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].user_id, "alice");
        assert_eq!((stats[0].active, stats[0].deleted), (1, 1));
        assert_eq!(stats[1].user_id, "bob");
        assert_eq!((stats[1].active, stats[1].deleted), (1, 0));
    }

    #[test]
    fn entries_survive_reopen() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("wl.db");
        let original = entry("u", at(9, 0), at(10, 0));
        {
            let mut db = Database::open(&path).unwrap();
            db.upsert_entry(&original).unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.get_entry(original.id()).unwrap(), Some(original));
    }

    #[test]
    fn second_connection_cannot_commit_overlap() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("wl.db");
        let mut first = Database::open(&path).unwrap();
        let mut second = Database::open(&path).unwrap();

        first.upsert_entry(&entry("u", at(9, 0), at(10, 0))).unwrap();
        let err = second
            .upsert_entry(&entry("u", at(9, 30), at(10, 30)))
            .unwrap_err();
        assert!(matches!(err, DbError::Overlap { .. }));
    }
}
