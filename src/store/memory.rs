/// In-memory forecast store for tests and dev mode.
///
/// Holds plain vectors/maps of domain rows and answers queries by
/// filtering. The consensus/observation join comes from the provided
/// `query_bias_records` implementation on the trait, so tests against
/// this store exercise the same core join the extractor uses.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::{BiasError, GridForecast, Observation};
use crate::store::ForecastStore;

#[derive(Debug, Default)]
pub struct MemoryForecastStore {
    forecasts: Vec<GridForecast>,
    observations: HashMap<(String, NaiveDate), Observation>,
}

impl MemoryForecastStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_forecast(&mut self, forecast: GridForecast) {
        self.forecasts.push(forecast);
    }

    /// One observation per (location, date); a second insert for the same
    /// key replaces the first, matching the store's ground-truth contract.
    pub fn insert_observation(&mut self, observation: Observation) {
        self.observations
            .insert((observation.location.clone(), observation.date), observation);
    }

    /// Inserts `grid_count` gridpoint forecasts for one key, all carrying
    /// the same temperatures. Convenient for building scenarios where the
    /// consensus value is known exactly.
    pub fn seed_gridded_forecasts(
        &mut self,
        location: &str,
        target_date: NaiveDate,
        horizon_days: u32,
        grid_count: u32,
        high_temp: f64,
        low_temp: f64,
    ) {
        for i in 0..grid_count {
            self.insert_forecast(GridForecast {
                location: location.to_string(),
                gridpoint_id: "LOT".to_string(),
                grid_x: 70 + i as i32,
                grid_y: 70,
                target_date,
                horizon_days,
                high_temp,
                low_temp,
            });
        }
    }

    pub fn forecast_count(&self) -> usize {
        self.forecasts.len()
    }

    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }
}

impl ForecastStore for MemoryForecastStore {
    fn query_grid_forecasts(
        &mut self,
        location: &str,
        target_date: NaiveDate,
        horizon_days: u32,
    ) -> Result<Vec<GridForecast>, BiasError> {
        Ok(self
            .forecasts
            .iter()
            .filter(|f| {
                f.location == location
                    && f.target_date == target_date
                    && f.horizon_days == horizon_days
            })
            .cloned()
            .collect())
    }

    fn query_observation(
        &mut self,
        location: &str,
        date: NaiveDate,
    ) -> Result<Option<Observation>, BiasError> {
        Ok(self
            .observations
            .get(&(location.to_string(), date))
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
