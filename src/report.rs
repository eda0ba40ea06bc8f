/// Per-horizon bias report construction.
///
/// Sweeps the analysis pipeline (extract → aggregate → classify) across
/// every forecast horizon for one location and date range, emitting one
/// flat row per horizon that matched at least one day. The rows are
/// plain serializable values; writing them to durable storage belongs to
/// an external export collaborator.
///
/// This module orchestrates and shapes rows only — all computation lives
/// in `analysis`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::metrics::aggregate_bias_metrics;
use crate::analysis::persistence::classify_persistence;
use crate::config::AnalysisSettings;
use crate::logging::{self, DataSource};
use crate::model::{BiasError, BiasSummary};
use crate::store::ForecastStore;

/// Longest horizon in the sweep; the collection jobs gather a 10-day
/// forecast, so horizons run 0..=9.
pub const MAX_HORIZON_DAYS: u32 = 9;

/// Extracts and aggregates the bias statistics for one (location,
/// horizon) over a date range.
///
/// `Ok(None)` means no matched days — valid "no data", distinct from a
/// store failure.
pub fn compute_bias_summary<S: ForecastStore + ?Sized>(
    store: &mut S,
    location: &str,
    start: NaiveDate,
    end: NaiveDate,
    horizon_days: u32,
    settings: &AnalysisSettings,
) -> Result<Option<BiasSummary>, BiasError> {
    let records =
        store.query_bias_records(location, start, end, horizon_days, settings.min_grid_count)?;
    Ok(aggregate_bias_metrics(&records))
}

/// One report row: the summary and verdict for a single horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub location: String,
    pub horizon_days: u32,
    pub n_days: usize,
    pub mean_high_bias: f64,
    pub mean_low_bias: f64,
    pub mae_high: f64,
    pub mae_low: f64,
    pub high_bias_detected: bool,
    pub low_bias_detected: bool,
}

/// Runs the full pipeline for every horizon 0..=9 and returns the rows
/// in ascending horizon order.
///
/// A horizon with zero matched days emits no row — a run that hits
/// insufficient data for some horizons still completes with the rest.
/// Fails only if the store does.
pub fn build_report<S: ForecastStore + ?Sized>(
    store: &mut S,
    location: &str,
    start: NaiveDate,
    end: NaiveDate,
    settings: &AnalysisSettings,
) -> Result<Vec<ReportRow>, BiasError> {
    let mut rows = Vec::new();

    for horizon in 0..=MAX_HORIZON_DAYS {
        let Some(summary) = compute_bias_summary(store, location, start, end, horizon, settings)?
        else {
            logging::debug(
                DataSource::System,
                Some(location),
                &format!("horizon {}: no matched days, skipping", horizon),
            );
            continue;
        };

        let verdict = classify_persistence(&summary, settings);

        rows.push(ReportRow {
            location: location.to_string(),
            horizon_days: horizon,
            n_days: summary.n_days,
            mean_high_bias: summary.mean_high_bias,
            mean_low_bias: summary.mean_low_bias,
            mae_high: summary.mae_high,
            mae_low: summary.mae_low,
            high_bias_detected: verdict.high_bias_detected,
            low_bias_detected: verdict.low_bias_detected,
        });
    }

    logging::log_sweep_summary(location, MAX_HORIZON_DAYS as usize + 1, rows.len());

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Observation;
    use crate::store::memory::MemoryForecastStore;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
    }

    fn seed_matched_day(
        store: &mut MemoryForecastStore,
        day: u32,
        horizon: u32,
        forecast_high: f64,
        actual_high: f64,
    ) {
        store.seed_gridded_forecasts("CHI", date(day), horizon, 6, forecast_high, 50.0);
        store.insert_observation(Observation {
            location: "CHI".to_string(),
            date: date(day),
            high_temp: actual_high,
            low_temp: 50.0,
        });
    }

    #[test]
    fn test_only_horizons_with_matches_emit_rows() {
        let mut store = MemoryForecastStore::new();
        seed_matched_day(&mut store, 1, 3, 71.0, 70.0);

        let rows = build_report(
            &mut store,
            "CHI",
            date(1),
            date(10),
            &AnalysisSettings::default(),
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].horizon_days, 3);
        assert_eq!(rows[0].n_days, 1);
        assert_eq!(rows[0].mean_high_bias, 1.0);
    }

    #[test]
    fn test_rows_are_ordered_by_horizon() {
        let mut store = MemoryForecastStore::new();
        for horizon in [7, 0, 4] {
            seed_matched_day(&mut store, 1 + horizon, horizon, 70.0, 70.0);
        }

        let rows = build_report(
            &mut store,
            "CHI",
            date(1),
            date(10),
            &AnalysisSettings::default(),
        )
        .unwrap();

        let horizons: Vec<_> = rows.iter().map(|r| r.horizon_days).collect();
        assert_eq!(horizons, vec![0, 4, 7]);
    }

    #[test]
    fn test_compute_bias_summary_distinguishes_no_data_from_failure() {
        let mut store = MemoryForecastStore::new();
        let settings = AnalysisSettings::default();

        let none = compute_bias_summary(&mut store, "CHI", date(1), date(5), 1, &settings).unwrap();
        assert!(none.is_none(), "empty range is Ok(None), not an error");

        seed_matched_day(&mut store, 1, 1, 72.0, 70.0);
        let summary = compute_bias_summary(&mut store, "CHI", date(1), date(5), 1, &settings)
            .unwrap()
            .expect("one matched day should summarize");
        assert_eq!(summary.n_days, 1);
        assert_eq!(summary.mean_high_bias, 2.0);
    }

    #[test]
    fn test_no_data_anywhere_yields_empty_report() {
        let mut store = MemoryForecastStore::new();
        let rows = build_report(
            &mut store,
            "CHI",
            date(1),
            date(10),
            &AnalysisSettings::default(),
        )
        .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_short_sample_emits_row_without_detection() {
        // One matched day is enough for a row, but far below min_days,
        // so the detection flags must stay false even with a huge bias.
        let mut store = MemoryForecastStore::new();
        seed_matched_day(&mut store, 1, 1, 80.0, 70.0);

        let rows = build_report(
            &mut store,
            "CHI",
            date(1),
            date(1),
            &AnalysisSettings::default(),
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mean_high_bias, 10.0);
        assert!(!rows[0].high_bias_detected);
        assert!(!rows[0].low_bias_detected);
    }

    #[test]
    fn test_row_serializes_to_flat_json() {
        let row = ReportRow {
            location: "CHI".to_string(),
            horizon_days: 2,
            n_days: 31,
            mean_high_bias: 0.75,
            mean_low_bias: -0.25,
            mae_high: 1.1,
            mae_low: 0.9,
            high_bias_detected: true,
            low_bias_detected: false,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["location"], "CHI");
        assert_eq!(json["horizon_days"], 2);
        assert_eq!(json["high_bias_detected"], true);
    }
}
