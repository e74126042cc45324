use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use crate::engine::SessionResult;
use crate::leaderboard::{Partition, ScoreStore, ScoreSubmission};

/// What became of a completed session's score
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// No identity; the result is shown but never stored
    Anonymous,
    Saved {
        id: String,
        previous_best: f64,
        new_personal_best: bool,
    },
    Failed(String),
}

impl ReportOutcome {
    pub fn is_new_personal_best(&self) -> bool {
        matches!(
            self,
            ReportOutcome::Saved {
                new_personal_best: true,
                ..
            }
        )
    }
}

/// A first score in a partition beats nothing and is not announced
pub fn is_new_personal_best(wpm: f64, previous_best: f64) -> bool {
    previous_best > 0.0 && wpm > previous_best
}

fn persist(store: &dyn ScoreStore, identity: &str, result: &SessionResult) -> ReportOutcome {
    let partition = Partition::from(result);
    let previous_best = match store.best_wpm(identity, partition) {
        Ok(best) => best.unwrap_or(0.0),
        Err(e) => {
            log::warn!(
                "could not look up previous best for {}: {e}",
                partition.label()
            );
            0.0
        }
    };

    match store.insert(&ScoreSubmission::from_result(identity, result)) {
        Ok(id) => {
            let new_personal_best = is_new_personal_best(result.wpm, previous_best);
            log::info!(
                "saved {} wpm for {} (previous best {previous_best}, new best: {new_personal_best})",
                result.wpm,
                partition.label()
            );
            ReportOutcome::Saved {
                id,
                previous_best,
                new_personal_best,
            }
        }
        Err(e) => {
            log::error!("failed to save score: {e}");
            ReportOutcome::Failed(e.to_string())
        }
    }
}

/// Persists each completed session at most once
pub struct ResultReporter {
    store: Option<Arc<dyn ScoreStore>>,
    identity: Option<String>,
    submitted: bool,
}

impl ResultReporter {
    pub fn new(store: Option<Arc<dyn ScoreStore>>, identity: Option<String>) -> Self {
        Self {
            store,
            identity,
            submitted: false,
        }
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Arms the reporter for the next session
    pub fn reset(&mut self) {
        self.submitted = false;
    }

    fn claim(&mut self) -> bool {
        if self.submitted {
            log::debug!("result already reported for this session");
            return false;
        }
        self.submitted = true;
        true
    }

    fn target(&self) -> Result<(Arc<dyn ScoreStore>, String), ReportOutcome> {
        let Some(identity) = self.identity.clone() else {
            return Err(ReportOutcome::Anonymous);
        };
        match &self.store {
            Some(store) => Ok((Arc::clone(store), identity)),
            None => {
                log::error!("failed to save score: no leaderboard store available");
                Err(ReportOutcome::Failed("leaderboard store unavailable".into()))
            }
        }
    }

    /// Persists on the calling thread. `None` if this session was already
    /// reported.
    pub fn report(&mut self, result: &SessionResult) -> Option<ReportOutcome> {
        if !self.claim() {
            return None;
        }
        Some(match self.target() {
            Ok((store, identity)) => persist(store.as_ref(), &identity, result),
            Err(outcome) => outcome,
        })
    }

    /// Persists on a background thread and sends the outcome to `tx`.
    /// Returns false if this session was already reported.
    pub fn report_in_background(
        &mut self,
        result: SessionResult,
        tx: Sender<ReportOutcome>,
    ) -> bool {
        if !self.claim() {
            return false;
        }
        match self.target() {
            Ok((store, identity)) => {
                thread::spawn(move || {
                    let outcome = persist(store.as_ref(), &identity, &result);
                    let _ = tx.send(outcome);
                });
            }
            Err(outcome) => {
                let _ = tx.send(outcome);
            }
        }
        true
    }
}
