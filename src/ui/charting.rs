use crate::engine::WpmSample;
use crate::util::std_dev;

/// Samples as (seconds, wpm) chart points
pub fn chart_points(samples: &[WpmSample]) -> Vec<(f64, f64)> {
    samples.iter().map(|s| (s.secs, s.wpm)).collect()
}

/// Compute X (seconds) and Y (WPM) bounds for the results chart
pub fn compute_chart_params(samples: &[WpmSample], fallback_secs: Option<f64>) -> (f64, f64) {
    let highest_wpm = samples.iter().map(|s| s.wpm).fold(0.0, f64::max);
    let overall_duration = samples
        .last()
        .map(|s| s.secs)
        .or(fallback_secs)
        .unwrap_or(1.0)
        .max(1.0);

    (overall_duration, highest_wpm.round().max(1.0))
}

/// Spread of the sampled wpm; lower is steadier
pub fn consistency(samples: &[WpmSample]) -> f64 {
    let wpms: Vec<f64> = samples.iter().map(|s| s.wpm).collect();
    std_dev(&wpms).unwrap_or(0.0)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(secs: f64, wpm: f64) -> WpmSample {
        WpmSample { secs, wpm }
    }

    #[test]
    fn chart_params_without_samples() {
        assert_eq!(compute_chart_params(&[], Some(25.0)), (25.0, 1.0));
        assert_eq!(compute_chart_params(&[], None), (1.0, 1.0));
    }

    #[test]
    fn chart_params_follow_samples() {
        let samples = [sample(1.0, 30.2), sample(2.0, 48.6), sample(3.4, 41.0)];
        assert_eq!(compute_chart_params(&samples, Some(60.0)), (3.4, 49.0));
    }

    #[test]
    fn consistency_is_population_sd() {
        let samples = [sample(1.0, 40.0), sample(2.0, 60.0)];
        assert_eq!(consistency(&samples), 10.0);
        assert_eq!(consistency(&[]), 0.0);
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.2345), "1.23");
    }
}
