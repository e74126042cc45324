/// Average characters per word used to normalise WPM
pub const CHARS_PER_WORD: f64 = 5.0;

/// Rounds half away from zero to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Words per minute for `chars` characters typed over `minutes`.
/// Returns `None` when no time has passed.
pub fn words_per_minute(chars: usize, minutes: f64) -> Option<f64> {
    if minutes > 0.0 {
        Some(chars as f64 / CHARS_PER_WORD / minutes)
    } else {
        None
    }
}

/// `part / whole * 100`, or `None` for an empty whole
pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    if whole > 0 {
        Some(part as f64 / whole as f64 * 100.0)
    } else {
        None
    }
}

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population standard deviation
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let avg = mean(data)?;
    let variance = data.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / data.len() as f64;
    Some(variance.sqrt())
}
