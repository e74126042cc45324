//! Typing session state machine.
//!
//! A [`TypingSession`] owns all per-token typed state for one test. The
//! embedding layer feeds it keystrokes and periodic ticks together with the
//! current [`Instant`]; the session answers with what happened and exposes a
//! read-only snapshot for rendering.

use serde::Serialize;
use std::time::Instant;

use crate::generator::TargetText;
use crate::input::{Key, Keystroke};
use crate::session::{Mode, SessionConfig};
use crate::util::{percentage, round2, words_per_minute};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Completed,
}

/// Display-only metrics refreshed after every mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveMetrics {
    pub wpm: u32,
    pub accuracy: u32,
}

impl Default for LiveMetrics {
    fn default() -> Self {
        Self {
            wpm: 0,
            accuracy: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharCounts {
    pub correct: usize,
    pub total: usize,
}

impl CharCounts {
    pub fn incorrect(&self) -> usize {
        self.total - self.correct
    }
}

/// Positions where `typed` matches `target`. Overtyped characters past the
/// end of `target` never count.
pub fn correct_chars(typed: &str, target: &str) -> usize {
    typed
        .chars()
        .zip(target.chars())
        .filter(|(t, e)| t == e)
        .count()
}

/// Terminal record of a completed session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionResult {
    pub wpm: f64,
    pub raw_wpm: f64,
    pub accuracy: f64,
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub total_chars: usize,
    pub time_elapsed_secs: f64,
    pub mode: Mode,
    pub limit_value: u32,
}

impl SessionResult {
    pub fn display_wpm(&self) -> i64 {
        self.wpm.round() as i64
    }

    pub fn display_raw_wpm(&self) -> i64 {
        self.raw_wpm.round() as i64
    }

    pub fn config(&self) -> SessionConfig {
        SessionConfig::unchecked(self.mode, self.limit_value)
    }
}

/// WPM observed at a point in the session, for the results chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WpmSample {
    pub secs: f64,
    pub wpm: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Dropped without touching state
    Rejected,
    /// First accepted keystroke; the session is now running
    Started,
    Accepted,
    Completed(SessionResult),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Idle,
    Updated,
    Completed(SessionResult),
}

#[derive(Debug, Clone)]
pub struct TypingSession {
    config: SessionConfig,
    text: TargetText,
    typed: Vec<String>,
    word_idx: usize,
    char_idx: usize,
    phase: Phase,
    started_at: Option<Instant>,
    seconds_remaining: Option<f64>,
    counts: CharCounts,
    live: LiveMetrics,
    samples: Vec<WpmSample>,
    last_sample_sec: u64,
    result: Option<SessionResult>,
}

impl TypingSession {
    pub fn new(config: SessionConfig, text: TargetText) -> Self {
        let typed = vec![String::new(); text.len()];
        Self {
            config,
            text,
            typed,
            word_idx: 0,
            char_idx: 0,
            phase: Phase::NotStarted,
            started_at: None,
            seconds_remaining: config.time_limit_secs(),
            counts: CharCounts::default(),
            live: LiveMetrics::default(),
            samples: Vec::new(),
            last_sample_sec: 0,
            result: None,
        }
    }

    /// Drops all typing state and starts over on `text`
    pub fn reset(&mut self, text: TargetText) {
        *self = Self::new(self.config, text);
    }

    pub fn on_key(&mut self, keystroke: &Keystroke, now: Instant) -> KeyOutcome {
        if self.phase == Phase::Completed || keystroke.is_rejected() {
            return KeyOutcome::Rejected;
        }

        let started = if self.phase == Phase::NotStarted {
            self.start(now);
            true
        } else {
            false
        };

        let mutated = match keystroke.key {
            Key::Backspace => self.backspace(),
            Key::Char(' ') => self.advance_token(),
            Key::Char(c) => self.type_char(c),
            _ => false,
        };

        if mutated {
            self.refresh_live(now);
        }

        if self.config.mode == Mode::Words
            && !self.text.is_empty()
            && self.word_idx >= self.text.len()
        {
            if let Some(result) = self.complete(now) {
                return KeyOutcome::Completed(result);
            }
        }

        if started {
            KeyOutcome::Started
        } else {
            KeyOutcome::Accepted
        }
    }

    /// Periodic timer callback. Only time-mode sessions that are running react.
    pub fn on_tick(&mut self, now: Instant) -> TickOutcome {
        if self.phase != Phase::Running || self.config.mode != Mode::Time {
            return TickOutcome::Idle;
        }
        let elapsed = self.elapsed_secs(now);
        let remaining = (self.config.limit as f64 - elapsed).max(0.0);
        self.seconds_remaining = Some(remaining);
        self.refresh_live(now);

        if remaining <= 0.0 {
            return match self.complete(now) {
                Some(result) => TickOutcome::Completed(result),
                None => TickOutcome::Idle,
            };
        }
        TickOutcome::Updated
    }

    fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.phase = Phase::Running;
        log::debug!("session started ({})", self.config.label());
    }

    fn type_char(&mut self, c: char) -> bool {
        let Some(target) = self.text.token(self.word_idx) else {
            return false;
        };
        if target.chars().nth(self.char_idx) == Some(c) {
            self.counts.correct += 1;
        }
        self.counts.total += 1;
        self.typed[self.word_idx].push(c);
        self.char_idx += 1;
        true
    }

    fn backspace(&mut self) -> bool {
        if self.char_idx == 0 {
            return false;
        }
        let Some(removed) = self.typed[self.word_idx].pop() else {
            return false;
        };
        self.char_idx -= 1;
        let target = self.text.token(self.word_idx).unwrap_or_default();
        if target.chars().nth(self.char_idx) == Some(removed) {
            self.counts.correct -= 1;
        }
        self.counts.total -= 1;
        true
    }

    fn advance_token(&mut self) -> bool {
        if self.char_idx == 0 || self.word_idx >= self.text.len() {
            return false;
        }
        self.word_idx += 1;
        self.char_idx = 0;
        true
    }

    fn refresh_live(&mut self, now: Instant) {
        let counts = self.counts;
        self.live.accuracy = percentage(counts.correct, counts.total)
            .map(|p| p.round() as u32)
            .unwrap_or(100);

        let Some(start) = self.started_at else {
            return;
        };
        let elapsed = now.saturating_duration_since(start).as_secs_f64();
        if let Some(wpm) = words_per_minute(counts.correct, elapsed / 60.0) {
            self.live.wpm = wpm.round().max(0.0) as u32;
            let whole_secs = elapsed.floor() as u64;
            if whole_secs > self.last_sample_sec {
                self.last_sample_sec = whole_secs;
                self.samples.push(WpmSample { secs: elapsed, wpm });
            }
        }
    }

    fn complete(&mut self, now: Instant) -> Option<SessionResult> {
        if self.phase != Phase::Running {
            return None;
        }
        let start = self.started_at?;
        let secs = now.saturating_duration_since(start).as_secs_f64();
        let minutes = secs / 60.0;
        let counts = self.recount();

        let wpm = words_per_minute(counts.correct, minutes).unwrap_or(0.0);
        let raw_wpm = words_per_minute(counts.total, minutes).unwrap_or(0.0);
        let accuracy = percentage(counts.correct, counts.total).unwrap_or(0.0);

        let result = SessionResult {
            wpm: round2(wpm),
            raw_wpm: round2(raw_wpm),
            accuracy: round2(accuracy),
            correct_chars: counts.correct,
            incorrect_chars: counts.incorrect(),
            total_chars: counts.total,
            time_elapsed_secs: round2(secs),
            mode: self.config.mode,
            limit_value: self.config.limit,
        };

        if secs > 0.0 {
            self.samples.push(WpmSample { secs, wpm });
        }
        self.phase = Phase::Completed;
        self.result = Some(result.clone());
        log::debug!(
            "session completed: {} wpm, {}% accuracy over {:.2}s",
            result.wpm,
            result.accuracy,
            result.time_elapsed_secs
        );
        Some(result)
    }

    /// Counts recomputed from scratch over the typed state
    pub fn recount(&self) -> CharCounts {
        self.typed
            .iter()
            .zip(self.text.tokens())
            .fold(CharCounts::default(), |acc, (typed, target)| CharCounts {
                correct: acc.correct + correct_chars(typed, target),
                total: acc.total + typed.chars().count(),
            })
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn text(&self) -> &TargetText {
        &self.text
    }

    pub fn typed(&self, idx: usize) -> &str {
        self.typed.get(idx).map(String::as_str).unwrap_or_default()
    }

    pub fn word_index(&self) -> usize {
        self.word_idx
    }

    pub fn char_index(&self) -> usize {
        self.char_idx
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::NotStarted
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn seconds_remaining(&self) -> Option<f64> {
        self.seconds_remaining
    }

    pub fn live(&self) -> LiveMetrics {
        self.live
    }

    /// Incrementally maintained counts
    pub fn counts(&self) -> CharCounts {
        self.counts
    }

    pub fn samples(&self) -> &[WpmSample] {
        &self.samples
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        self.started_at
            .map(|s| now.saturating_duration_since(s).as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Completion percentage in 0..=100
    pub fn progress(&self, now: Instant) -> f64 {
        let pct = match self.config.mode {
            Mode::Words => self.word_idx as f64 / self.text.len().max(1) as f64 * 100.0,
            Mode::Time => {
                if self.started_at.is_none() {
                    0.0
                } else {
                    self.elapsed_secs(now) / self.config.limit.max(1) as f64 * 100.0
                }
            }
        };
        pct.min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crossterm::event::KeyModifiers;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::time::Duration;

    fn words_session(prompt: &str) -> TypingSession {
        let text = TargetText::from_prompt(prompt);
        TypingSession::new(SessionConfig::words(text.len() as u32), text)
    }

    fn type_str(session: &mut TypingSession, s: &str, now: Instant) -> Vec<KeyOutcome> {
        s.chars()
            .map(|c| session.on_key(&Keystroke::char(c), now))
            .collect()
    }

    #[test]
    fn new_session_is_idle() {
        let session = words_session("12@ #45");
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.live(), LiveMetrics { wpm: 0, accuracy: 100 });
        assert_eq!(session.word_index(), 0);
        assert_eq!(session.char_index(), 0);
        assert!(session.result().is_none());
        assert_eq!(session.seconds_remaining(), None);
    }

    #[test]
    fn first_accepted_key_starts_session() {
        let mut session = words_session("12@ #45");
        let t0 = Instant::now();
        assert_eq!(session.on_key(&Keystroke::char('1'), t0), KeyOutcome::Started);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.started_at(), Some(t0));
        assert_eq!(session.on_key(&Keystroke::char('2'), t0), KeyOutcome::Accepted);
    }

    #[test]
    fn rejected_keys_do_not_start_session() {
        let mut session = words_session("12@");
        let now = Instant::now();
        let rejected = [
            Keystroke::new(Key::Tab, KeyModifiers::NONE),
            Keystroke::new(Key::Escape, KeyModifiers::NONE),
            Keystroke::new(Key::Enter, KeyModifiers::NONE),
            Keystroke::new(Key::Shift, KeyModifiers::SHIFT),
            Keystroke::new(Key::CapsLock, KeyModifiers::NONE),
            Keystroke::new(Key::Char('1'), KeyModifiers::CONTROL),
            Keystroke::new(Key::Char('1'), KeyModifiers::ALT),
            Keystroke::new(Key::Char('1'), KeyModifiers::META),
        ];
        for ks in &rejected {
            assert_eq!(session.on_key(ks, now), KeyOutcome::Rejected);
        }
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.typed(0), "");
    }

    #[test]
    fn named_key_starts_but_does_not_type() {
        let mut session = words_session("12@");
        let ks = Keystroke::new(Key::Named("ArrowLeft".into()), KeyModifiers::NONE);
        assert_eq!(session.on_key(&ks, Instant::now()), KeyOutcome::Started);
        assert_eq!(session.typed(0), "");
        assert_eq!(session.char_index(), 0);
    }

    #[test]
    fn overtyping_is_recorded_but_never_correct() {
        let mut session = words_session("12@ #45");
        type_str(&mut session, "12@99", Instant::now());
        assert_eq!(session.typed(0), "12@99");
        assert_eq!(session.char_index(), 5);
        assert_eq!(session.counts(), CharCounts { correct: 3, total: 5 });
        assert_eq!(session.live().accuracy, 60);
    }

    #[test]
    fn backspace_is_inverse_of_typing() {
        let mut session = words_session("12@ #45");
        let now = Instant::now();
        type_str(&mut session, "1x", now);
        for c in ['2', 'x', '@', '!'] {
            let typed_before = session.typed(0).to_owned();
            let offset_before = session.char_index();
            let counts_before = session.counts();
            session.on_key(&Keystroke::char(c), now);
            session.on_key(&Keystroke::backspace(), now);
            assert_eq!(session.typed(0), typed_before);
            assert_eq!(session.char_index(), offset_before);
            assert_eq!(session.counts(), counts_before);
        }
    }

    #[test]
    fn backspace_at_token_start_is_noop() {
        let mut session = words_session("12@ #45");
        let now = Instant::now();

        session.on_key(&Keystroke::backspace(), now);
        assert_eq!(session.word_index(), 0);
        assert_eq!(session.char_index(), 0);

        type_str(&mut session, "12@ ", now);
        assert_eq!(session.word_index(), 1);
        session.on_key(&Keystroke::backspace(), now);
        assert_eq!(session.word_index(), 1);
        assert_eq!(session.char_index(), 0);
        assert_eq!(session.typed(0), "12@");
    }

    #[test]
    fn space_on_empty_token_does_not_advance() {
        let mut session = words_session("12@ #45");
        let now = Instant::now();
        session.on_key(&Keystroke::space(), now);
        session.on_key(&Keystroke::space(), now);
        assert_eq!(session.word_index(), 0);

        type_str(&mut session, "1 ", now);
        assert_eq!(session.word_index(), 1);
        session.on_key(&Keystroke::space(), now);
        assert_eq!(session.word_index(), 1);
    }

    #[test]
    fn typed_length_tracks_offset() {
        let mut session = words_session("12@ #45");
        let now = Instant::now();
        for ks in [
            Keystroke::char('1'),
            Keystroke::char('9'),
            Keystroke::backspace(),
            Keystroke::char('2'),
            Keystroke::space(),
            Keystroke::char('#'),
        ] {
            session.on_key(&ks, now);
            assert_eq!(
                session.typed(session.word_index()).chars().count(),
                session.char_index()
            );
        }
    }

    #[test]
    fn incremental_counts_match_batch_recount() {
        let mut rng = StdRng::seed_from_u64(7);
        let text = crate::generator::generate_for_count_with(&mut rng, 30);
        let mut session = TypingSession::new(SessionConfig::words(30), text.clone());
        let mut pool: Vec<char> = text.to_string().chars().collect();
        pool.extend(['x', '?', '9']);

        let start = Instant::now();
        for step in 0..2000u64 {
            let now = start + Duration::from_millis(step * 37);
            let ks = match rng.gen_range(0..10) {
                0 | 1 => Keystroke::backspace(),
                2 => Keystroke::space(),
                _ => Keystroke::char(pool[rng.gen_range(0..pool.len())]),
            };
            session.on_key(&ks, now);
            assert_eq!(session.counts(), session.recount(), "diverged at step {step}");
            if session.is_completed() {
                break;
            }
        }
    }

    #[test]
    fn scenario_words_mode_partial_errors() {
        let text = TargetText::from_prompt("12@ #45 67!");
        let mut session = TypingSession::new(SessionConfig::words(10), text);
        let t0 = Instant::now();

        type_str(&mut session, "12@ #45 67#", t0);
        assert!(session.is_running());
        assert_eq!(session.word_index(), 2);

        let done = t0 + Duration::from_secs(6);
        let outcome = session.on_key(&Keystroke::space(), done);
        let result = assert_matches!(outcome, KeyOutcome::Completed(r) => r);

        assert_eq!(result.correct_chars, 8);
        assert_eq!(result.incorrect_chars, 1);
        assert_eq!(result.total_chars, 9);
        assert_eq!(result.accuracy, 88.89);
        assert_eq!(result.wpm, 16.0);
        assert_eq!(result.raw_wpm, 18.0);
        assert_eq!(result.time_elapsed_secs, 6.0);
        assert_eq!(result.mode, Mode::Words);
        assert_eq!(result.limit_value, 10);
        assert_eq!(session.phase(), Phase::Completed);
    }

    #[test]
    fn perfect_words_run_has_full_accuracy() {
        let mut session = words_session("12@ #45 67!");
        let t0 = Instant::now();
        type_str(&mut session, "12@ #45 67!", t0);
        let outcome = session.on_key(&Keystroke::space(), t0 + Duration::from_secs(3));
        let result = assert_matches!(outcome, KeyOutcome::Completed(r) => r);
        assert_eq!(result.total_chars, result.correct_chars);
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(result.total_chars, 9);
    }

    #[test]
    fn zero_elapsed_time_yields_zero_wpm() {
        let mut session = words_session("12@");
        let t0 = Instant::now();
        type_str(&mut session, "12@", t0);
        let outcome = session.on_key(&Keystroke::space(), t0);
        let result = assert_matches!(outcome, KeyOutcome::Completed(r) => r);
        assert_eq!(result.wpm, 0.0);
        assert_eq!(result.raw_wpm, 0.0);
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(result.time_elapsed_secs, 0.0);
        assert!(!result.wpm.is_nan());
    }

    #[test]
    fn completion_is_terminal() {
        let mut session = words_session("12@");
        let t0 = Instant::now();
        type_str(&mut session, "12@", t0);
        let first = session.on_key(&Keystroke::space(), t0 + Duration::from_secs(2));
        let result = assert_matches!(first, KeyOutcome::Completed(r) => r);

        let later = t0 + Duration::from_secs(60);
        assert_eq!(session.on_key(&Keystroke::char('1'), later), KeyOutcome::Rejected);
        assert_eq!(session.on_key(&Keystroke::backspace(), later), KeyOutcome::Rejected);
        assert_eq!(session.on_key(&Keystroke::space(), later), KeyOutcome::Rejected);
        assert_eq!(session.on_tick(later), TickOutcome::Idle);
        assert_eq!(session.result(), Some(&result));
        assert_eq!(session.typed(0), "12@");
    }

    #[test]
    fn time_mode_completes_on_tick_once() {
        let text = TargetText::from_prompt("12@ #45 67! 890");
        let mut session = TypingSession::new(SessionConfig::time(10), text);
        assert_eq!(session.seconds_remaining(), Some(10.0));

        let t0 = Instant::now();
        type_str(&mut session, "12@ #4", t0);

        assert_eq!(
            session.on_tick(t0 + Duration::from_millis(4_000)),
            TickOutcome::Updated
        );
        assert_eq!(session.seconds_remaining(), Some(6.0));
        assert_eq!(session.live().wpm, 15);

        let outcome = session.on_tick(t0 + Duration::from_millis(10_000));
        let result = assert_matches!(outcome, TickOutcome::Completed(r) => r);
        assert_eq!(result.mode, Mode::Time);
        assert_eq!(result.limit_value, 10);
        assert_eq!(result.total_chars, 5);
        assert_eq!(result.correct_chars, 5);
        assert_eq!(result.wpm, 6.0);
        assert_eq!(session.seconds_remaining(), Some(0.0));

        assert_eq!(
            session.on_tick(t0 + Duration::from_millis(10_100)),
            TickOutcome::Idle
        );
        assert_eq!(session.result(), Some(&result));
    }

    #[test]
    fn time_mode_without_keystrokes_never_completes() {
        let text = TargetText::from_prompt("12@ #45");
        let mut session = TypingSession::new(SessionConfig::time(10), text);
        let t0 = Instant::now();
        for secs in [1, 10, 11, 100] {
            assert_eq!(
                session.on_tick(t0 + Duration::from_secs(secs)),
                TickOutcome::Idle
            );
        }
        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(session.result().is_none());
    }

    #[test]
    fn time_mode_does_not_complete_on_last_token() {
        let text = TargetText::from_prompt("12@");
        let mut session = TypingSession::new(SessionConfig::time(10), text);
        let t0 = Instant::now();
        type_str(&mut session, "12@ ", t0);
        assert!(session.is_running());
        assert_eq!(session.word_index(), 1);

        // nothing left to type into
        assert_eq!(session.on_key(&Keystroke::char('9'), t0), KeyOutcome::Accepted);
        assert_eq!(session.counts().total, 3);
    }

    #[test]
    fn words_mode_ignores_ticks() {
        let mut session = words_session("12@ #45");
        let t0 = Instant::now();
        type_str(&mut session, "1", t0);
        assert_eq!(session.on_tick(t0 + Duration::from_secs(500)), TickOutcome::Idle);
        assert!(session.is_running());
    }

    #[test]
    fn live_wpm_holds_when_no_time_elapsed() {
        let mut session = words_session("12@ #45");
        let t0 = Instant::now();
        type_str(&mut session, "12", t0);
        assert_eq!(session.live().wpm, 0);

        session.on_key(&Keystroke::char('@'), t0 + Duration::from_secs(3));
        assert_eq!(session.live().wpm, 12);

        session.on_key(&Keystroke::char('x'), t0 + Duration::from_secs(6));
        assert_eq!(session.live().wpm, 6);
        assert_eq!(session.live().accuracy, 75);

        session.on_key(&Keystroke::backspace(), t0 + Duration::from_secs(6));
        assert_eq!(session.live().accuracy, 100);
    }

    #[test]
    fn samples_recorded_once_per_second() {
        let text = TargetText::from_prompt("1234 5678 9012");
        let mut session = TypingSession::new(SessionConfig::words(3), text);
        let t0 = Instant::now();
        for (i, c) in "1234 5678".chars().enumerate() {
            session.on_key(&Keystroke::char(c), t0 + Duration::from_millis(400 * i as u64));
        }
        let secs: Vec<u64> = session.samples().iter().map(|s| s.secs as u64).collect();
        assert_eq!(secs, vec![1, 2, 3]);
    }

    #[test]
    fn reset_discards_state() {
        let mut session = words_session("12@ #45");
        let t0 = Instant::now();
        type_str(&mut session, "12@ #", t0);
        session.reset(TargetText::from_prompt("999 888"));
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.word_index(), 0);
        assert_eq!(session.counts(), CharCounts::default());
        assert_eq!(session.text().tokens(), &["999", "888"]);
        assert_eq!(session.typed(0), "");
        assert_eq!(session.started_at(), None);
    }

    #[test]
    fn progress_by_mode() {
        let mut session = words_session("12@ #45");
        let t0 = Instant::now();
        assert_eq!(session.progress(t0), 0.0);
        type_str(&mut session, "12@ ", t0);
        assert_eq!(session.progress(t0), 50.0);

        let text = TargetText::from_prompt("12@ #45");
        let mut timed = TypingSession::new(SessionConfig::time(10), text);
        assert_eq!(timed.progress(t0), 0.0);
        timed.on_key(&Keystroke::char('1'), t0);
        assert_eq!(timed.progress(t0 + Duration::from_secs(5)), 50.0);
        assert_eq!(timed.progress(t0 + Duration::from_secs(50)), 100.0);
    }

    #[test]
    fn correct_chars_stops_at_target_length() {
        assert_eq!(correct_chars("12@", "12@"), 3);
        assert_eq!(correct_chars("1x@", "12@"), 2);
        assert_eq!(correct_chars("12@@@", "12@"), 3);
        assert_eq!(correct_chars("1", "12@"), 1);
        assert_eq!(correct_chars("", "12@"), 0);
    }
}
