/// Spatial consensus construction.
///
/// A single NOAA gridpoint forecast is noisy; averaging the forecasts of
/// every gridpoint covering a location damps cell-level noise and gives a
/// cleaner signal to measure bias against. This module reduces the set of
/// `GridForecast` rows sharing one (location, target_date, horizon) key
/// into a `ConsensusForecast`, and provides spread diagnostics for
/// inspecting disagreement within the ensemble.
///
/// Everything here is a pure function of its input slice — no I/O.

use crate::model::{ConsensusForecast, GridForecast};

// ---------------------------------------------------------------------------
// Consensus builder
// ---------------------------------------------------------------------------

/// Reduces a set of gridpoint forecasts into one consensus forecast.
///
/// All rows in `forecasts` must share the same (location, target_date,
/// horizon_days) key — the key of the first row is taken as the key of
/// the result. The consensus statistic is the arithmetic mean of each
/// temperature channel, and `grid_count` records how many gridpoints
/// contributed.
///
/// Returns `None` for an empty input (no forecasts means no consensus,
/// not an error). A non-empty input always produces a consensus, even
/// below the usable-gridpoint minimum: callers filter on
/// `ConsensusForecast::is_usable` rather than losing the count here.
pub fn build_consensus(forecasts: &[GridForecast]) -> Option<ConsensusForecast> {
    let first = forecasts.first()?;
    let n = forecasts.len() as f64;

    let high_sum: f64 = forecasts.iter().map(|f| f.high_temp).sum();
    let low_sum: f64 = forecasts.iter().map(|f| f.low_temp).sum();

    Some(ConsensusForecast {
        location: first.location.clone(),
        target_date: first.target_date,
        horizon_days: first.horizon_days,
        grid_count: forecasts.len() as u32,
        consensus_high: high_sum / n,
        consensus_low: low_sum / n,
    })
}

// ---------------------------------------------------------------------------
// Gridpoint spread diagnostics
// ---------------------------------------------------------------------------

/// How much the gridpoints disagree for one (location, target_date, horizon)
/// key. Large spread means the consensus is averaging over genuinely
/// different local forecasts, which is worth knowing before trusting the
/// bias numbers downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct GridpointSpread {
    pub grid_count: u32,
    /// max − min of the high-temp channel across gridpoints.
    pub high_range: f64,
    pub low_range: f64,
    /// Sample std across gridpoints; `None` when fewer than 2 contribute.
    pub high_std: Option<f64>,
    pub low_std: Option<f64>,
}

/// Computes spread statistics across a gridpoint set.
/// Returns `None` for an empty input.
pub fn gridpoint_spread(forecasts: &[GridForecast]) -> Option<GridpointSpread> {
    if forecasts.is_empty() {
        return None;
    }

    let highs: Vec<f64> = forecasts.iter().map(|f| f.high_temp).collect();
    let lows: Vec<f64> = forecasts.iter().map(|f| f.low_temp).collect();

    Some(GridpointSpread {
        grid_count: forecasts.len() as u32,
        high_range: range_of(&highs),
        low_range: range_of(&lows),
        high_std: sample_std(&highs),
        low_std: sample_std(&lows),
    })
}

fn range_of(values: &[f64]) -> f64 {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    max - min
}

/// Sample standard deviation (n−1 denominator). `None` for n < 2.
fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n as f64 - 1.0);
    Some(var.sqrt())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn forecast(grid_x: i32, high: f64, low: f64) -> GridForecast {
        GridForecast {
            location: "CHI".to_string(),
            gridpoint_id: "LOT".to_string(),
            grid_x,
            grid_y: 70,
            target_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            horizon_days: 2,
            high_temp: high,
            low_temp: low,
        }
    }

    #[test]
    fn test_empty_input_produces_no_consensus() {
        assert_eq!(build_consensus(&[]), None);
    }

    #[test]
    fn test_consensus_is_mean_of_channels() {
        let set = vec![
            forecast(70, 50.0, 30.0),
            forecast(71, 54.0, 34.0),
            forecast(72, 58.0, 38.0),
        ];
        let c = build_consensus(&set).expect("non-empty set should produce a consensus");
        assert_eq!(c.consensus_high, 54.0);
        assert_eq!(c.consensus_low, 34.0);
        assert_eq!(c.grid_count, 3);
        assert_eq!(c.location, "CHI");
        assert_eq!(c.horizon_days, 2);
    }

    #[test]
    fn test_single_gridpoint_consensus_is_that_forecast() {
        let set = vec![forecast(70, 61.5, 44.0)];
        let c = build_consensus(&set).unwrap();
        assert_eq!(c.consensus_high, 61.5);
        assert_eq!(c.consensus_low, 44.0);
        assert_eq!(c.grid_count, 1);
    }

    #[test]
    fn test_thin_consensus_is_built_but_not_usable() {
        // Below the usable minimum the consensus still exists with its
        // count recorded — callers filter, they don't read it as zero bias.
        let set = vec![forecast(70, 50.0, 30.0), forecast(71, 52.0, 32.0)];
        let c = build_consensus(&set).unwrap();
        assert_eq!(c.grid_count, 2);
        assert!(!c.is_usable(5));
        assert!(c.is_usable(2));
    }

    #[test]
    fn test_spread_of_identical_gridpoints_is_zero() {
        let set = vec![
            forecast(70, 55.0, 40.0),
            forecast(71, 55.0, 40.0),
            forecast(72, 55.0, 40.0),
        ];
        let s = gridpoint_spread(&set).unwrap();
        assert_eq!(s.high_range, 0.0);
        assert_eq!(s.low_range, 0.0);
        assert_eq!(s.high_std, Some(0.0));
        assert_eq!(s.low_std, Some(0.0));
    }

    #[test]
    fn test_spread_range_and_std() {
        let set = vec![forecast(70, 50.0, 30.0), forecast(71, 54.0, 36.0)];
        let s = gridpoint_spread(&set).unwrap();
        assert_eq!(s.high_range, 4.0);
        assert_eq!(s.low_range, 6.0);
        // Two points a and b: sample std is |a − b| / sqrt(2).
        let expected_high = 4.0 / 2.0_f64.sqrt();
        assert!((s.high_std.unwrap() - expected_high).abs() < 1e-12);
    }

    #[test]
    fn test_spread_single_gridpoint_has_undefined_std() {
        let s = gridpoint_spread(&[forecast(70, 55.0, 40.0)]).unwrap();
        assert_eq!(s.grid_count, 1);
        assert_eq!(s.high_range, 0.0);
        assert_eq!(s.high_std, None);
        assert_eq!(s.low_std, None);
    }

    #[test]
    fn test_spread_empty_input_is_none() {
        assert_eq!(gridpoint_spread(&[]), None);
    }
}
