use crate::app_dirs::AppDirs;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::{Path, PathBuf};

/// One submitted attempt, as persisted to the history log.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub lesson_id: String,
    pub mode: String,
    pub score: f64,
    pub elapsed_secs: Option<u32>,
    pub timestamp: DateTime<Local>,
}

/// Append-only attempt history. Best-effort everywhere: callers hold an
/// `Option<HistoryDb>` and a failed open simply means no history.
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Opens (or creates) the history database in the app state directory.
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::history_db_path()
            .unwrap_or_else(|| PathBuf::from("mathdrill_history.db"));
        Self::open(db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        let conn = Connection::open(path)?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS attempts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                lesson_id TEXT NOT NULL,
                mode TEXT NOT NULL,
                score REAL NOT NULL,
                elapsed_secs INTEGER,
                timestamp TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_attempts_lesson ON attempts(lesson_id)",
            [],
        )?;

        Ok(HistoryDb { conn })
    }

    pub fn record_attempt(&self, attempt: &Attempt) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO attempts (lesson_id, mode, score, elapsed_secs, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                attempt.lesson_id,
                attempt.mode,
                attempt.score,
                attempt.elapsed_secs,
                attempt.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn attempts_for_lesson(&self, lesson_id: &str) -> Result<Vec<Attempt>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT lesson_id, mode, score, elapsed_secs, timestamp
            FROM attempts
            WHERE lesson_id = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map(params![lesson_id], |row| {
            let timestamp: String = row.get(4)?;
            Ok(Attempt {
                lesson_id: row.get(0)?,
                mode: row.get(1)?,
                score: row.get(2)?,
                elapsed_secs: row.get(3)?,
                timestamp: DateTime::parse_from_rfc3339(&timestamp)
                    .map(|dt| dt.with_timezone(&Local))
                    .unwrap_or_else(|_| Local::now()),
            })
        })?;

        rows.collect()
    }

    pub fn attempt_count(&self, lesson_id: &str) -> Result<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM attempts WHERE lesson_id = ?1",
            params![lesson_id],
            |row| row.get(0),
        )
    }

    pub fn best_score(&self, lesson_id: &str) -> Result<Option<f64>> {
        self.conn.query_row(
            "SELECT MAX(score) FROM attempts WHERE lesson_id = ?1",
            params![lesson_id],
            |row| row.get(0),
        )
    }

    /// Timestamp of the most recent attempt across all lessons, for the
    /// dashboard footer.
    pub fn last_attempt_time(&self) -> Result<Option<DateTime<Local>>> {
        let row: Option<String> = self
            .conn
            .query_row(
                "SELECT timestamp FROM attempts ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        Ok(row.and_then(|ts| {
            DateTime::parse_from_rfc3339(&ts)
                .map(|dt| dt.with_timezone(&Local))
                .ok()
        }))
    }
}
