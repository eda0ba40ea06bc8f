/// Bias extraction — joining consensus forecasts to observed outcomes.
///
/// For each target date in the requested range, the extractor builds the
/// spatial consensus at the requested horizon, drops it unless enough
/// gridpoints contributed, and pairs it with the observation for that
/// date. Dates missing either side yield no record — a silent exclusion,
/// not a reported gap (see `verify` for gap detection).
///
/// The sign convention lives in exactly one place: `bias_record`.

use chrono::NaiveDate;

use crate::analysis::consensus::build_consensus;
use crate::model::{BiasError, BiasRecord, ConsensusForecast, Observation};
use crate::store::ForecastStore;

// ---------------------------------------------------------------------------
// Sign convention
// ---------------------------------------------------------------------------

/// Pairs a consensus forecast with its observation.
///
/// bias = consensus − actual, so positive means the forecast ran warm
/// and negative means it ran cold. Both channels use the same convention.
pub fn bias_record(consensus: &ConsensusForecast, observation: &Observation) -> BiasRecord {
    BiasRecord {
        location: consensus.location.clone(),
        target_date: consensus.target_date,
        horizon_days: consensus.horizon_days,
        grid_count: consensus.grid_count,
        high_bias: consensus.consensus_high - observation.high_temp,
        low_bias: consensus.consensus_low - observation.low_temp,
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Computes the ordered sequence of daily bias records for one
/// (location, horizon) over `[start, end]`.
///
/// This is the in-core form of the join: one consensus build per date,
/// inner-joined against observations. A date with no usable consensus
/// (fewer than `min_grid_count` gridpoints) or no observation produces
/// no record. The result is ordered by target_date ascending; empty is
/// a valid outcome. Fails only if the store does.
pub fn extract_bias_records<S: ForecastStore + ?Sized>(
    store: &mut S,
    location: &str,
    start: NaiveDate,
    end: NaiveDate,
    horizon_days: u32,
    min_grid_count: u32,
) -> Result<Vec<BiasRecord>, BiasError> {
    let mut records = Vec::new();

    let mut date = start;
    while date <= end {
        let forecasts = store.query_grid_forecasts(location, date, horizon_days)?;

        if let Some(consensus) = build_consensus(&forecasts) {
            if consensus.is_usable(min_grid_count) {
                if let Some(observation) = store.query_observation(location, date)? {
                    records.push(bias_record(&consensus, &observation));
                }
            }
        }

        match date.succ_opt() {
            Some(next) => date = next,
            None => break, // end of the calendar
        }
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
