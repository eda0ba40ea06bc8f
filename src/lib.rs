/// Forecast bias monitoring service.
///
/// Quantifies systematic error in multi-source weather forecasts by
/// reducing per-gridpoint forecasts to a spatial consensus, joining the
/// consensus against observed daily highs/lows, aggregating per-horizon
/// error statistics, and classifying persistent directional bias.
///
/// Data collection and report export live outside this crate; the store
/// is reached through `store::ForecastStore`.

pub mod analysis;
pub mod config;
pub mod dev_mode;
pub mod locations;
pub mod logging;
pub mod model;
pub mod report;
pub mod store;
pub mod verify;
