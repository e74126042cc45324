//! Interactive application state: one typing session at a time plus the
//! results and leaderboard views layered over it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Instant;

use crate::celebration::CelebrationAnimation;
use crate::config::{Config, ConfigStore};
use crate::engine::{KeyOutcome, SessionResult, TickOutcome, TypingSession};
use crate::generator::TextGenerator;
use crate::input::Keystroke;
use crate::leaderboard::{LeaderboardService, Partition, ScoreStore, Standings};
use crate::reporter::{ReportOutcome, ResultReporter};
use crate::session::{Mode, SessionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Typing,
    Results,
    Leaderboard,
}

/// Where the finished session's score stands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SaveStatus {
    Idle,
    Anonymous,
    Saving,
    Saved { new_personal_best: bool },
    NotSaved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

pub struct App {
    config: Config,
    config_store: Option<Box<dyn ConfigStore>>,
    session: TypingSession,
    screen: Screen,
    reporter: ResultReporter,
    pending_report: Option<Receiver<ReportOutcome>>,
    save_status: SaveStatus,
    leaderboard: Option<LeaderboardService>,
    standings: Standings,
    pending_standings: Option<Receiver<Standings>>,
    pub celebration: CelebrationAnimation,
    viewport: (u16, u16),
    now: Instant,
}

impl App {
    pub fn new(config: Config, store: Option<Arc<dyn ScoreStore>>) -> Self {
        let session_cfg = config.session_config();
        let session = TypingSession::new(session_cfg, TextGenerator::new(session_cfg).generate());
        let reporter = ResultReporter::new(store.clone(), config.identity.clone());

        Self {
            config,
            config_store: None,
            session,
            screen: Screen::Typing,
            reporter,
            pending_report: None,
            save_status: SaveStatus::Idle,
            leaderboard: store.map(LeaderboardService::new),
            standings: Standings::default(),
            pending_standings: None,
            celebration: CelebrationAnimation::new(),
            viewport: (80, 24),
            now: Instant::now(),
        }
    }

    /// Mode and limit changes are written back through `store`
    pub fn with_config_store(mut self, store: Box<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    pub fn session(&self) -> &TypingSession {
        &self.session
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn save_status(&self) -> SaveStatus {
        self.save_status
    }

    pub fn standings(&self) -> &Standings {
        &self.standings
    }

    /// True while the leaderboard tables are still being fetched
    pub fn is_loading_leaderboard(&self) -> bool {
        self.pending_standings.is_some()
    }

    pub fn identity(&self) -> Option<&str> {
        self.config.identity.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.session.result()
    }

    /// Clock reading of the last handled event
    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        self.now = now;

        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return Action::Quit;
        }
        if matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            self.restart();
            return Action::Continue;
        }

        match self.screen {
            Screen::Typing => self.on_typing_key(key, now),
            Screen::Results => match key.code {
                KeyCode::Char('r') | KeyCode::Enter => self.restart(),
                KeyCode::Char('l') => self.open_leaderboard(),
                _ => {}
            },
            Screen::Leaderboard => match key.code {
                KeyCode::Char('b') | KeyCode::Backspace => {
                    self.screen = if self.session.is_completed() {
                        Screen::Results
                    } else {
                        Screen::Typing
                    };
                }
                KeyCode::Char('r') | KeyCode::Enter => self.restart(),
                _ => {}
            },
        }
        Action::Continue
    }

    fn on_typing_key(&mut self, key: KeyEvent, now: Instant) {
        if !self.session.has_started() {
            let current = self.session.config();
            let selected = match key.code {
                KeyCode::Up | KeyCode::Down => {
                    let mode = current.mode.toggled();
                    let limit = match mode {
                        Mode::Words => self.config.word_limit,
                        Mode::Time => self.config.time_limit,
                    };
                    Some(SessionConfig::new(mode, limit).unwrap_or_else(|_| {
                        SessionConfig::unchecked(mode, mode.default_limit())
                    }))
                }
                KeyCode::Right => Some(current.next_limit()),
                KeyCode::Left => Some(current.prev_limit()),
                _ => None,
            };
            if let Some(cfg) = selected {
                self.select(cfg);
                return;
            }
        }

        if let KeyOutcome::Completed(result) = self.session.on_key(&Keystroke::from(key), now) {
            self.finish(result);
        }
    }

    pub fn handle_tick(&mut self, now: Instant) {
        self.now = now;

        if let TickOutcome::Completed(result) = self.session.on_tick(now) {
            self.finish(result);
        }
        self.poll_report(now);
        self.poll_standings();
        self.celebration.update(now);
    }

    /// Starts over with fresh text under the current mode and limit
    pub fn restart(&mut self) {
        let cfg = self.session.config();
        self.session.reset(TextGenerator::new(cfg).generate());
        self.reporter.reset();
        self.pending_report = None;
        self.pending_standings = None;
        self.save_status = SaveStatus::Idle;
        self.celebration.stop();
        self.screen = Screen::Typing;
    }

    fn select(&mut self, cfg: SessionConfig) {
        log::debug!("selected {}", cfg.label());
        self.config.set_session(cfg);
        // only the selection goes back to disk; command-line overrides stay in memory
        if let Some(store) = &self.config_store {
            let mut on_disk = store.load();
            on_disk.set_session(cfg);
            if let Err(e) = store.save(&on_disk) {
                log::error!("failed to save config: {e}");
            }
        }
        self.session = TypingSession::new(cfg, TextGenerator::new(cfg).generate());
    }

    fn finish(&mut self, result: SessionResult) {
        self.screen = Screen::Results;
        self.save_status = if self.reporter.identity().is_some() {
            SaveStatus::Saving
        } else {
            SaveStatus::Anonymous
        };

        let (tx, rx) = mpsc::channel();
        if self.reporter.report_in_background(result, tx) {
            self.pending_report = Some(rx);
        }
    }

    fn poll_report(&mut self, now: Instant) {
        let Some(rx) = &self.pending_report else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                log::warn!("score submission ended without reporting back");
                ReportOutcome::Failed("submission aborted".into())
            }
        };
        self.pending_report = None;

        self.save_status = match outcome {
            ReportOutcome::Anonymous => SaveStatus::Anonymous,
            ReportOutcome::Saved {
                new_personal_best, ..
            } => SaveStatus::Saved { new_personal_best },
            ReportOutcome::Failed(_) => SaveStatus::NotSaved,
        };
        if let SaveStatus::Saved {
            new_personal_best: true,
        } = self.save_status
        {
            self.celebration.start(self.viewport.0, self.viewport.1, now);
        }
    }

    /// Shows empty tables right away; the store's answer lands on a later tick
    fn open_leaderboard(&mut self) {
        let partition = Partition::from(self.session.config());
        let identity = self.config.identity.clone();
        self.standings = Standings {
            global: Vec::new(),
            personal: identity.as_ref().map(|_| Vec::new()),
        };
        self.pending_standings = self.leaderboard.as_ref().map(|service| {
            let (tx, rx) = mpsc::channel();
            service.standings_in_background(partition, identity, tx);
            rx
        });
        self.screen = Screen::Leaderboard;
    }

    fn poll_standings(&mut self) {
        let Some(rx) = &self.pending_standings else {
            return;
        };
        match rx.try_recv() {
            Ok(standings) => self.standings = standings,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                log::warn!("leaderboard fetch ended without a result");
            }
        }
        self.pending_standings = None;
    }
}
