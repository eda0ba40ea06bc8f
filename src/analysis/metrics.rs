/// Aggregate error statistics over a sequence of daily bias records.
///
/// The aggregation is a commutative reduction — input order does not
/// affect any statistic. An empty input produces `None` rather than a
/// summary full of NaNs, and the caller is expected to carry that marker
/// forward instead of crashing.

use crate::model::{BiasRecord, BiasSummary};

/// Reduces a sequence of `BiasRecord` (same location and horizon) into a
/// `BiasSummary`.
///
/// Per channel: mean of the signed bias, sample standard deviation
/// (n−1 denominator, `None` for n < 2), mean absolute error, and root
/// mean square error. Plain IEEE-754 doubles throughout.
pub fn aggregate_bias_metrics(records: &[BiasRecord]) -> Option<BiasSummary> {
    if records.is_empty() {
        return None;
    }

    let highs: Vec<f64> = records.iter().map(|r| r.high_bias).collect();
    let lows: Vec<f64> = records.iter().map(|r| r.low_bias).collect();

    Some(BiasSummary {
        n_days: records.len(),
        mean_high_bias: mean(&highs),
        std_high_bias: sample_std(&highs),
        mean_low_bias: mean(&lows),
        std_low_bias: sample_std(&lows),
        mae_high: mean_abs(&highs),
        mae_low: mean_abs(&lows),
        rmse_high: rmse(&highs),
        rmse_low: rmse(&lows),
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn mean_abs(values: &[f64]) -> f64 {
    values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64
}

fn rmse(values: &[f64]) -> f64 {
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

/// Sample standard deviation (n−1 denominator). Undefined for n < 2.
fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (n as f64 - 1.0);
    Some(var.sqrt())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
