use rand::{seq::SliceRandom, Rng};
use std::fmt;

use crate::session::{Mode, SessionConfig};

pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+~`|}{[]:;?<>/.,\"";

pub const MIN_TOKEN_LEN: usize = 3;
pub const MAX_TOKEN_LEN: usize = 6;

/// Every character a generated token may contain
pub fn alphabet() -> Vec<char> {
    DIGITS.chars().chain(SYMBOLS.chars()).collect()
}

/// Ordered, immutable sequence of tokens a session is typed against
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetText {
    tokens: Vec<String>,
}

impl TargetText {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens: tokens.into_iter().filter(|t| !t.is_empty()).collect(),
        }
    }

    /// Splits on single spaces, dropping empty pieces
    pub fn from_prompt(prompt: &str) -> Self {
        Self::new(prompt.split(' ').map(str::to_owned).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token(&self, idx: usize) -> Option<&str> {
        self.tokens.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Length of the text with one separator after every token
    pub fn spaced_len(&self) -> usize {
        self.tokens.iter().map(|t| t.chars().count() + 1).sum()
    }
}

impl fmt::Display for TargetText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

fn generate_token<R: Rng + ?Sized>(rng: &mut R, alphabet: &[char]) -> String {
    let len = rng.gen_range(MIN_TOKEN_LEN..=MAX_TOKEN_LEN);
    (0..len)
        .filter_map(|_| alphabet.choose(rng).copied())
        .collect()
}

/// Exactly `count` random tokens
pub fn generate_for_count(count: usize) -> TargetText {
    generate_for_count_with(&mut rand::thread_rng(), count)
}

pub fn generate_for_count_with<R: Rng + ?Sized>(rng: &mut R, count: usize) -> TargetText {
    let alphabet = alphabet();
    TargetText::new(
        (0..count)
            .map(|_| generate_token(rng, &alphabet))
            .collect(),
    )
}

/// Tokens until their spaced length reaches `estimated_chars`. The last token
/// may overshoot.
pub fn generate_for_duration(estimated_chars: usize) -> TargetText {
    generate_for_duration_with(&mut rand::thread_rng(), estimated_chars)
}

pub fn generate_for_duration_with<R: Rng + ?Sized>(
    rng: &mut R,
    estimated_chars: usize,
) -> TargetText {
    let alphabet = alphabet();
    let mut tokens = Vec::new();
    let mut total_len = 0;
    while total_len < estimated_chars {
        let token = generate_token(rng, &alphabet);
        total_len += token.chars().count() + 1;
        tokens.push(token);
    }
    TargetText::new(tokens)
}

/// Produces target text sized for a session configuration
#[derive(Debug, Clone, Copy)]
pub struct TextGenerator {
    config: SessionConfig,
}

impl TextGenerator {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self) -> TargetText {
        match self.config.mode {
            Mode::Words => generate_for_count(self.config.limit as usize),
            Mode::Time => generate_for_duration(self.config.estimated_chars()),
        }
    }
}
