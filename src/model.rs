/// Core data types for the forecast bias monitoring service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic, no I/O, and no external dependencies beyond chrono
/// and serde — only types.
///
/// Every entity here is an immutable value record: each pipeline stage
/// consumes its inputs by reference and produces a new value. Nothing is
/// mutated after creation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Forecast types
// ---------------------------------------------------------------------------

/// A single gridpoint's forecast for one target date at one horizon.
///
/// One row per (location, gridpoint, target_date, horizon) key. The external
/// producer may record the same key multiple times; the store deduplicates,
/// not this core.
#[derive(Debug, Clone, PartialEq)]
pub struct GridForecast {
    pub location: String,
    /// NOAA grid office identifier, e.g. "OKX".
    pub gridpoint_id: String,
    pub grid_x: i32,
    pub grid_y: i32,
    pub target_date: NaiveDate,
    /// Days between forecast issue and the date it predicts. 0 = same-day.
    pub horizon_days: u32,
    pub high_temp: f64,
    pub low_temp: f64,
}

/// The spatial consensus over all gridpoint forecasts sharing one
/// (location, target_date, horizon_days) key.
///
/// Derived on demand by `analysis::consensus::build_consensus` — never
/// independently persisted by this core. `grid_count` always equals the
/// number of contributing gridpoints; a consensus is only *usable* when
/// `grid_count` meets the configured minimum (default 5). Downstream
/// stages filter on `grid_count` rather than treating a thin consensus
/// as zero bias.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusForecast {
    pub location: String,
    pub target_date: NaiveDate,
    pub horizon_days: u32,
    pub grid_count: u32,
    pub consensus_high: f64,
    pub consensus_low: f64,
}

impl ConsensusForecast {
    /// Whether enough gridpoints contributed for this consensus to count
    /// as a meaningful spatial ensemble signal.
    pub fn is_usable(&self, min_grid_count: u32) -> bool {
        self.grid_count >= min_grid_count
    }
}

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// Ground-truth daily high/low temperatures for one (location, date).
/// Externally supplied, one row per key, immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub location: String,
    pub date: NaiveDate,
    pub high_temp: f64,
    pub low_temp: f64,
}

// ---------------------------------------------------------------------------
// Bias types
// ---------------------------------------------------------------------------

/// Signed forecast error for one day at one horizon.
///
/// high_bias = consensus_high − actual_high, so positive means the
/// forecast ran warm and negative means it ran cold. Exists only for
/// dates where both a usable consensus and an observation are present.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasRecord {
    pub location: String,
    pub target_date: NaiveDate,
    pub horizon_days: u32,
    pub grid_count: u32,
    pub high_bias: f64,
    pub low_bias: f64,
}

/// Aggregate error statistics over a sequence of `BiasRecord` for one
/// (location, horizon).
///
/// Never constructed for an empty input — `aggregate_bias_metrics`
/// returns `None` instead, so no field here is ever NaN. The std fields
/// are sample standard deviations (n−1 denominator) and are `None` when
/// n_days < 2, where they are undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiasSummary {
    pub n_days: usize,
    pub mean_high_bias: f64,
    pub std_high_bias: Option<f64>,
    pub mean_low_bias: f64,
    pub std_low_bias: Option<f64>,
    pub mae_high: f64,
    pub mae_low: f64,
    pub rmse_high: f64,
    pub rmse_low: f64,
}

// ---------------------------------------------------------------------------
// Persistence verdict types
// ---------------------------------------------------------------------------

/// Direction of a detected persistent bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasDirection {
    Warm,
    Cold,
}

impl std::fmt::Display for BiasDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BiasDirection::Warm => write!(f, "warm"),
            BiasDirection::Cold => write!(f, "cold"),
        }
    }
}

/// Result of the persistence-of-bias classification.
///
/// When `sufficient_data` is false the detection flags are false and the
/// direction/magnitude fields absent — that state means "not evaluated",
/// never "no bias".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistenceVerdict {
    pub sufficient_data: bool,
    pub high_bias_detected: bool,
    pub high_bias_direction: Option<BiasDirection>,
    pub high_bias_magnitude: Option<f64>,
    pub low_bias_detected: bool,
    pub low_bias_direction: Option<BiasDirection>,
    pub low_bias_magnitude: Option<f64>,
}

impl PersistenceVerdict {
    /// The verdict for a summary below the minimum sample size.
    pub fn insufficient() -> Self {
        PersistenceVerdict {
            sufficient_data: false,
            high_bias_detected: false,
            high_bias_direction: None,
            high_bias_magnitude: None,
            low_bias_detected: false,
            low_bias_direction: None,
            low_bias_magnitude: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when running the bias pipeline.
///
/// Only store-connectivity failures are hard errors. Insufficient samples
/// and empty join results are valid outcomes carried as `Option`/empty
/// sequences, never as variants here.
#[derive(Debug, PartialEq)]
pub enum BiasError {
    /// The underlying store was unreachable or a query failed.
    DataUnavailable(String),
    /// The settings file could not be read or parsed.
    InvalidConfig(String),
}

impl std::fmt::Display for BiasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BiasError::DataUnavailable(msg) => write!(f, "Data unavailable: {}", msg),
            BiasError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for BiasError {}
