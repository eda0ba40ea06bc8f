/// Persistent-bias classification.
///
/// Decides whether an aggregated mean error looks like systematic
/// directional bias rather than noise: enough matched days, and a mean
/// whose magnitude clears the configured threshold.
///
/// This is a plain threshold test on the sample mean — no t-test, no
/// confidence interval, no standard-error scaling. That is a known
/// limitation carried over from the original analysis; the interface
/// (summary + settings in, verdict out) allows substituting a calibrated
/// hypothesis test without touching callers, but doing so would change
/// detection outcomes and so has deliberately not been done here.

use crate::config::AnalysisSettings;
use crate::model::{BiasDirection, BiasSummary, PersistenceVerdict};

/// Classifies a bias summary as persistent / not persistent per channel.
///
/// With fewer than `settings.min_days` matched days the verdict is
/// `sufficient_data: false` with all detection fields false/absent —
/// that means "not evaluated", and must never be read as "no bias".
///
/// Direction uses a strict `> 0.0` comparison, so a mean of exactly 0.0
/// classifies as Cold. This boundary quirk matches the original analysis
/// and is pinned by a test; direction is only meaningful when the
/// detected flag is set anyway (a 0.0 mean can never clear a positive
/// threshold).
pub fn classify_persistence(summary: &BiasSummary, settings: &AnalysisSettings) -> PersistenceVerdict {
    if summary.n_days < settings.min_days {
        return PersistenceVerdict::insufficient();
    }

    let (high_detected, high_direction, high_magnitude) =
        classify_channel(summary.mean_high_bias, settings.bias_threshold);
    let (low_detected, low_direction, low_magnitude) =
        classify_channel(summary.mean_low_bias, settings.bias_threshold);

    PersistenceVerdict {
        sufficient_data: true,
        high_bias_detected: high_detected,
        high_bias_direction: Some(high_direction),
        high_bias_magnitude: Some(high_magnitude),
        low_bias_detected: low_detected,
        low_bias_direction: Some(low_direction),
        low_bias_magnitude: Some(low_magnitude),
    }
}

fn classify_channel(mean_bias: f64, threshold: f64) -> (bool, BiasDirection, f64) {
    let direction = if mean_bias > 0.0 {
        BiasDirection::Warm
    } else {
        BiasDirection::Cold
    };
    (mean_bias.abs() > threshold, direction, mean_bias.abs())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
