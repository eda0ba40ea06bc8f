/// Bias analysis pipeline for the forecast monitoring service.
///
/// Each stage is a pure function over immutable value types; the only
/// I/O happens behind the `store::ForecastStore` trait consumed by the
/// extractor.
///
/// Submodules:
/// - `consensus` — reduces per-gridpoint forecasts into a spatial consensus.
/// - `bias` — joins consensus forecasts against observations into signed
///   daily errors.
/// - `metrics` — aggregates daily errors into summary statistics.
/// - `persistence` — classifies whether a mean error is a persistent bias.

pub mod bias;
pub mod consensus;
pub mod metrics;
pub mod persistence;
