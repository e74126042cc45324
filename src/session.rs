use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Word counts offered in words mode
pub const WORD_LIMITS: [u32; 3] = [10, 25, 50];
/// Durations (seconds) offered in time mode
pub const TIME_LIMITS: [u32; 3] = [10, 25, 60];

pub const DEFAULT_WORD_LIMIT: u32 = 25;
pub const DEFAULT_TIME_LIMIT: u32 = 25;

/// Characters per second assumed when sizing text for a timed session
pub const CHARS_PER_SECOND_ESTIMATE: u32 = 8;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    #[default]
    Words,
    Time,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Words => "words",
            Mode::Time => "time",
        }
    }

    pub fn allowed_limits(&self) -> &'static [u32] {
        match self {
            Mode::Words => &WORD_LIMITS,
            Mode::Time => &TIME_LIMITS,
        }
    }

    pub fn default_limit(&self) -> u32 {
        match self {
            Mode::Words => DEFAULT_WORD_LIMIT,
            Mode::Time => DEFAULT_TIME_LIMIT,
        }
    }

    pub fn toggled(&self) -> Mode {
        match self {
            Mode::Words => Mode::Time,
            Mode::Time => Mode::Words,
        }
    }
}

/// Mode and limit of one typing test. Together they pick the leaderboard
/// partition and the amount of text to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: Mode,
    pub limit: u32,
}

impl SessionConfig {
    pub fn new(mode: Mode, limit: u32) -> Result<Self, ConfigError> {
        if !mode.allowed_limits().contains(&limit) {
            return Err(ConfigError::InvalidLimit { mode, limit });
        }
        Ok(Self { mode, limit })
    }

    /// Builds a config without checking the limit against the offered set.
    /// Only tests need limits outside the offered set.
    pub fn unchecked(mode: Mode, limit: u32) -> Self {
        Self { mode, limit }
    }

    pub fn words(limit: u32) -> Self {
        Self::unchecked(Mode::Words, limit)
    }

    pub fn time(limit: u32) -> Self {
        Self::unchecked(Mode::Time, limit)
    }

    /// Time limit in seconds, `None` in words mode
    pub fn time_limit_secs(&self) -> Option<f64> {
        match self.mode {
            Mode::Words => None,
            Mode::Time => Some(self.limit as f64),
        }
    }

    /// Number of characters to request for a timed session
    pub fn estimated_chars(&self) -> usize {
        (self.limit * CHARS_PER_SECOND_ESTIMATE) as usize
    }

    /// Human label, e.g. "25 words" or "60s"
    pub fn label(&self) -> String {
        match self.mode {
            Mode::Words => format!("{} words", self.limit),
            Mode::Time => format!("{}s", self.limit),
        }
    }

    /// Same mode, next offered limit (wrapping)
    pub fn next_limit(&self) -> Self {
        self.step_limit(1)
    }

    /// Same mode, previous offered limit (wrapping)
    pub fn prev_limit(&self) -> Self {
        self.step_limit(-1)
    }

    fn step_limit(&self, delta: isize) -> Self {
        let limits = self.mode.allowed_limits();
        let len = limits.len() as isize;
        let idx = limits
            .iter()
            .position(|l| *l == self.limit)
            .map(|i| i as isize)
            .unwrap_or(0);
        let next = (idx + delta).rem_euclid(len) as usize;
        Self {
            mode: self.mode,
            limit: limits[next],
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Words,
            limit: DEFAULT_WORD_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn accepts_offered_limits() {
        for limit in WORD_LIMITS {
            assert!(SessionConfig::new(Mode::Words, limit).is_ok());
        }
        for limit in TIME_LIMITS {
            assert!(SessionConfig::new(Mode::Time, limit).is_ok());
        }
    }

    #[test]
    fn rejects_limit_from_other_mode() {
        assert_matches!(
            SessionConfig::new(Mode::Words, 60),
            Err(ConfigError::InvalidLimit { mode: Mode::Words, limit: 60 })
        );
        assert_matches!(
            SessionConfig::new(Mode::Time, 50),
            Err(ConfigError::InvalidLimit { .. })
        );
    }

    #[test]
    fn time_mode_sizing_uses_eight_chars_per_second() {
        assert_eq!(SessionConfig::time(10).estimated_chars(), 80);
        assert_eq!(SessionConfig::time(60).estimated_chars(), 480);
        assert_eq!(SessionConfig::time(25).time_limit_secs(), Some(25.0));
        assert_eq!(SessionConfig::words(25).time_limit_secs(), None);
    }

    #[test]
    fn labels() {
        assert_eq!(SessionConfig::words(25).label(), "25 words");
        assert_eq!(SessionConfig::time(60).label(), "60s");
    }

    #[test]
    fn limit_cycling_wraps() {
        let cfg = SessionConfig::words(50);
        assert_eq!(cfg.next_limit().limit, 10);
        assert_eq!(cfg.prev_limit().limit, 25);
        assert_eq!(SessionConfig::time(10).prev_limit().limit, 60);
    }

    #[test]
    fn mode_display_and_parse() {
        use clap::ValueEnum;
        assert_eq!(Mode::Words.to_string(), "words");
        assert_eq!(Mode::Time.to_string(), "time");
        assert_eq!(Mode::from_str("time", false), Ok(Mode::Time));
        assert!(Mode::from_str("TIME", false).is_err());
        assert_eq!(Mode::Words.toggled(), Mode::Time);
    }
}
