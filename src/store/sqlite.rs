use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::leaderboard::{
    display_name_or_anonymous, LeaderboardEntry, Partition, ScoreStore, ScoreSubmission,
    StoreError,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS highscores (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    mode TEXT NOT NULL,
    limit_value INTEGER NOT NULL,
    wpm REAL NOT NULL,
    accuracy REAL NOT NULL,
    raw_wpm REAL NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY,
    display_name TEXT
);

CREATE INDEX IF NOT EXISTS idx_highscores_partition
    ON highscores(mode, limit_value, wpm DESC);

CREATE INDEX IF NOT EXISTS idx_highscores_user
    ON highscores(user_id, mode, limit_value);
"#;

/// Local leaderboard database
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Creates or renames the profile row that leaderboard names are joined from
    pub fn upsert_profile(&self, identity_id: &str, display_name: &str) -> Result<(), StoreError> {
        self.conn().execute(
            r#"
            INSERT INTO profiles (user_id, display_name) VALUES (?1, ?2)
            ON CONFLICT(user_id) DO UPDATE SET display_name = excluded.display_name
            "#,
            params![identity_id, display_name],
        )?;
        Ok(())
    }

    /// Inserts with an explicit timestamp
    pub fn insert_at(
        &self,
        submission: &ScoreSubmission,
        created_at: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.conn().execute(
            r#"
            INSERT INTO highscores
            (id, user_id, mode, limit_value, wpm, accuracy, raw_wpm, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                id,
                submission.identity_id,
                submission.mode.as_str(),
                submission.limit_value,
                submission.wpm,
                submission.accuracy,
                submission.raw_wpm,
                created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;
        Ok(id)
    }
}

impl ScoreStore for SqliteStore {
    fn best_wpm(&self, identity_id: &str, partition: Partition) -> Result<Option<f64>, StoreError> {
        let best = self
            .conn()
            .query_row(
                r#"
                SELECT MAX(wpm) FROM highscores
                WHERE user_id = ?1 AND mode = ?2 AND limit_value = ?3
                "#,
                params![identity_id, partition.mode.as_str(), partition.limit_value],
                |row| row.get::<_, Option<f64>>(0),
            )
            .optional()?
            .flatten();
        Ok(best)
    }

    fn insert(&self, submission: &ScoreSubmission) -> Result<String, StoreError> {
        self.insert_at(submission, Utc::now())
    }

    fn top(
        &self,
        partition: Partition,
        identity_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            r#"
            SELECT h.id, h.user_id, h.wpm, h.accuracy, h.created_at, p.display_name
            FROM highscores h
            LEFT JOIN profiles p ON p.user_id = h.user_id
            WHERE h.mode = ?1 AND h.limit_value = ?2 AND (?3 IS NULL OR h.user_id = ?3)
            ORDER BY h.wpm DESC, h.accuracy DESC, h.created_at ASC
            LIMIT ?4
            "#,
        )?;

        let rows = stmt.query_map(
            params![
                partition.mode.as_str(),
                partition.limit_value,
                identity_id,
                limit as i64
            ],
            |row| {
                let created_at: String = row.get(4)?;
                let created_at = DateTime::parse_from_rfc3339(&created_at)
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            4,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?
                    .with_timezone(&Utc);

                Ok(LeaderboardEntry {
                    id: row.get(0)?,
                    identity_id: row.get(1)?,
                    wpm: row.get(2)?,
                    accuracy: row.get(3)?,
                    created_at,
                    display_name: display_name_or_anonymous(row.get(5)?),
                })
            },
        )?;

        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }
        Ok(entries)
    }
}
