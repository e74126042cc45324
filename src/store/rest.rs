//! Hosted leaderboard reached through a PostgREST-style HTTP interface
//! (`/rest/v1/highscores` with a joined `profiles` relation).

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::leaderboard::{
    display_name_or_anonymous, LeaderboardEntry, Partition, ScoreStore, ScoreSubmission,
    StoreError,
};

const TABLE: &str = "highscores";
const ENTRY_COLUMNS: &str = "id,user_id,wpm,accuracy,created_at,profiles(display_name)";
const RANK_ORDER: &str = "wpm.desc,accuracy.desc,created_at.asc";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct WpmRow {
    wpm: f64,
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: Value,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EntryRow {
    id: Value,
    user_id: String,
    wpm: f64,
    accuracy: f64,
    created_at: DateTime<Utc>,
    #[serde(default)]
    profiles: Option<ProfileRow>,
}

fn id_string(id: Value) -> String {
    match id {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl From<EntryRow> for LeaderboardEntry {
    fn from(row: EntryRow) -> Self {
        Self {
            id: id_string(row.id),
            identity_id: row.user_id,
            wpm: row.wpm,
            accuracy: row.accuracy,
            created_at: row.created_at,
            display_name: display_name_or_anonymous(row.profiles.and_then(|p| p.display_name)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestStore {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
            client,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/rest/v1/{TABLE}", self.base_url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => match HeaderValue::from_str(&format!("Bearer {key}")) {
                Ok(bearer) => req
                    .header("apikey", key.as_str())
                    .header(AUTHORIZATION, bearer),
                Err(_) => {
                    log::warn!(
                        "store api key is not a valid header value; sending unauthenticated"
                    );
                    req
                }
            },
            None => req,
        }
    }

    fn check(resp: Response) -> Result<Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(StoreError::Rejected {
                status: status.as_u16(),
                body: resp.text().unwrap_or_default(),
            })
        }
    }

    fn partition_filters(partition: Partition) -> Vec<(&'static str, String)> {
        vec![
            ("mode", format!("eq.{}", partition.mode.as_str())),
            ("limit_value", format!("eq.{}", partition.limit_value)),
        ]
    }
}

impl ScoreStore for RestStore {
    fn best_wpm(
        &self,
        identity_id: &str,
        partition: Partition,
    ) -> Result<Option<f64>, StoreError> {
        let mut query = Self::partition_filters(partition);
        query.push(("select", "wpm".into()));
        query.push(("user_id", format!("eq.{identity_id}")));
        query.push(("order", "wpm.desc".into()));
        query.push(("limit", "1".into()));

        let resp = self
            .authorize(self.client.get(self.endpoint()).query(&query))
            .send()?;
        let rows: Vec<WpmRow> = Self::check(resp)?.json()?;
        Ok(rows.first().map(|r| r.wpm))
    }

    fn insert(&self, submission: &ScoreSubmission) -> Result<String, StoreError> {
        let resp = self
            .authorize(self.client.post(self.endpoint()))
            .header("Prefer", "return=representation")
            .json(submission)
            .send()?;
        let rows: Vec<IdRow> = Self::check(resp)?.json()?;
        rows.into_iter()
            .next()
            .map(|r| id_string(r.id))
            .ok_or_else(|| StoreError::Decode("insert returned no rows".into()))
    }

    fn top(
        &self,
        partition: Partition,
        identity_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let mut query = Self::partition_filters(partition);
        query.push(("select", ENTRY_COLUMNS.into()));
        if let Some(id) = identity_id {
            query.push(("user_id", format!("eq.{id}")));
        }
        query.push(("order", RANK_ORDER.into()));
        query.push(("limit", limit.to_string()));

        let resp = self
            .authorize(self.client.get(self.endpoint()).query(&query))
            .send()?;
        let rows: Vec<EntryRow> = Self::check(resp)?.json()?;
        Ok(rows.into_iter().map(LeaderboardEntry::from).collect())
    }
}
