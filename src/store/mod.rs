/// Storage access for the bias pipeline.
///
/// The pipeline treats the forecast and observation stores as external
/// collaborators reached through the `ForecastStore` trait. Two backends
/// are provided:
///
/// - `postgres` — the production store, which pushes the consensus/
///   observation join down into SQL.
/// - `memory` — in-memory rows for tests and dev mode, which rely on the
///   core join implemented in `analysis::bias`.
///
/// All connectivity and query failures surface as
/// `BiasError::DataUnavailable`; an empty result is a valid outcome,
/// never an error.

use chrono::NaiveDate;

use crate::analysis::bias;
use crate::model::{BiasError, BiasRecord, GridForecast, Observation};

pub mod memory;
pub mod postgres;

/// Read-only access to the gridpoint forecast and observation stores.
///
/// Methods take `&mut self` because the Postgres client requires it;
/// no implementation mutates domain data.
pub trait ForecastStore {
    /// All gridpoint forecasts for one (location, target_date, horizon) key.
    fn query_grid_forecasts(
        &mut self,
        location: &str,
        target_date: NaiveDate,
        horizon_days: u32,
    ) -> Result<Vec<GridForecast>, BiasError>;

    /// The observation for one (location, date), if recorded.
    fn query_observation(
        &mut self,
        location: &str,
        date: NaiveDate,
    ) -> Result<Option<Observation>, BiasError>;

    /// The inner join of usable consensus forecasts against observations
    /// over a date range at one horizon, ordered by target_date ascending.
    ///
    /// The provided implementation walks the date range and performs the
    /// join in-core via the consensus builder. Backends that can express
    /// the join natively (SQL GROUP BY + HAVING + JOIN) should override
    /// this with a single store-side query.
    fn query_bias_records(
        &mut self,
        location: &str,
        start: NaiveDate,
        end: NaiveDate,
        horizon_days: u32,
        min_grid_count: u32,
    ) -> Result<Vec<BiasRecord>, BiasError> {
        bias::extract_bias_records(self, location, start, end, horizon_days, min_grid_count)
    }
}
