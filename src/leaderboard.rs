//! Scored-record store contract and the read-only ranking queries built on it.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use crate::engine::SessionResult;
use crate::session::{Mode, SessionConfig};

pub const ANONYMOUS: &str = "Anonymous";
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("unexpected store response: {0}")]
    Decode(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Leaderboards are kept separately per mode and limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    pub mode: Mode,
    pub limit_value: u32,
}

impl Partition {
    pub fn new(mode: Mode, limit_value: u32) -> Self {
        Self { mode, limit_value }
    }

    pub fn label(&self) -> String {
        SessionConfig::unchecked(self.mode, self.limit_value).label()
    }
}

impl From<SessionConfig> for Partition {
    fn from(cfg: SessionConfig) -> Self {
        Self::new(cfg.mode, cfg.limit)
    }
}

impl From<&SessionResult> for Partition {
    fn from(r: &SessionResult) -> Self {
        Self::new(r.mode, r.limit_value)
    }
}

/// Row supplied by the caller on insert; the store assigns id and timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSubmission {
    #[serde(rename = "user_id")]
    pub identity_id: String,
    pub mode: Mode,
    pub limit_value: u32,
    pub wpm: f64,
    pub accuracy: f64,
    pub raw_wpm: f64,
}

impl ScoreSubmission {
    pub fn from_result(identity_id: &str, result: &SessionResult) -> Self {
        Self {
            identity_id: identity_id.to_owned(),
            mode: result.mode,
            limit_value: result.limit_value,
            wpm: result.wpm,
            accuracy: result.accuracy,
            raw_wpm: result.raw_wpm,
        }
    }

    pub fn partition(&self) -> Partition {
        Partition::new(self.mode, self.limit_value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub id: String,
    pub identity_id: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub created_at: DateTime<Utc>,
    pub display_name: String,
}

impl LeaderboardEntry {
    pub fn display_wpm(&self) -> i64 {
        self.wpm.round() as i64
    }
}

/// Absent or blank profile names become [`ANONYMOUS`]
pub fn display_name_or_anonymous(name: Option<String>) -> String {
    name.filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| ANONYMOUS.to_owned())
}

/// Append-only score store
pub trait ScoreStore: Send + Sync {
    /// Highest wpm recorded for `identity_id` in `partition`
    fn best_wpm(&self, identity_id: &str, partition: Partition) -> Result<Option<f64>, StoreError>;

    /// Persists a score and returns the id the store assigned
    fn insert(&self, submission: &ScoreSubmission) -> Result<String, StoreError>;

    /// Up to `limit` entries of `partition`, best first, optionally for one identity
    fn top(
        &self,
        partition: Partition,
        identity_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, StoreError>;
}

/// Orders by wpm descending, then accuracy descending, then oldest first
pub fn rank(entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries
        .into_iter()
        .sorted_by(|a, b| {
            b.wpm
                .total_cmp(&a.wpm)
                .then_with(|| b.accuracy.total_cmp(&a.accuracy))
                .then_with(|| a.created_at.cmp(&b.created_at))
        })
        .collect()
}

/// Both tables shown for one partition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Standings {
    pub global: Vec<LeaderboardEntry>,
    /// `None` when no identity is known
    pub personal: Option<Vec<LeaderboardEntry>>,
}

/// Read-only ranked queries. Store failures are logged and surface as empty
/// tables.
#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn ScoreStore>,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        Self { store }
    }

    pub fn top_global(&self, partition: Partition, n: usize) -> Vec<LeaderboardEntry> {
        self.query(partition, None, n)
    }

    pub fn top_for_identity(
        &self,
        partition: Partition,
        identity_id: &str,
        n: usize,
    ) -> Vec<LeaderboardEntry> {
        self.query(partition, Some(identity_id), n)
    }

    pub fn standings(&self, partition: Partition, identity_id: Option<&str>) -> Standings {
        Standings {
            global: self.top_global(partition, DEFAULT_TOP_N),
            personal: identity_id.map(|id| self.top_for_identity(partition, id, DEFAULT_TOP_N)),
        }
    }

    /// Runs [`standings`](Self::standings) on a background thread and sends
    /// the tables to `tx`, so a slow store never stalls the caller.
    pub fn standings_in_background(
        &self,
        partition: Partition,
        identity_id: Option<String>,
        tx: Sender<Standings>,
    ) {
        let service = self.clone();
        thread::spawn(move || {
            let _ = tx.send(service.standings(partition, identity_id.as_deref()));
        });
    }

    fn query(
        &self,
        partition: Partition,
        identity_id: Option<&str>,
        n: usize,
    ) -> Vec<LeaderboardEntry> {
        match self.store.top(partition, identity_id, n) {
            Ok(entries) => rank(entries).into_iter().take(n).collect(),
            Err(e) => {
                let scope = if identity_id.is_some() { "personal" } else { "global" };
                log::error!(
                    "failed to fetch {scope} leaderboard for {}: {e}",
                    partition.label()
                );
                Vec::new()
            }
        }
    }
}
