/// Postgres-backed forecast store.
///
/// Expected schema (populated by the external collection jobs):
///
/// ```sql
/// CREATE TABLE forecasts (
///     location      TEXT NOT NULL,
///     gridpoint_id  TEXT NOT NULL,
///     grid_x        INT NOT NULL,
///     grid_y        INT NOT NULL,
///     target_date   DATE NOT NULL,
///     horizon_days  INT NOT NULL,
///     high_temp     DOUBLE PRECISION NOT NULL,
///     low_temp      DOUBLE PRECISION NOT NULL
/// );
///
/// CREATE TABLE actuals (
///     location   TEXT NOT NULL,
///     date       DATE NOT NULL,
///     high_temp  DOUBLE PRECISION NOT NULL,
///     low_temp   DOUBLE PRECISION NOT NULL,
///     UNIQUE (location, date)
/// );
/// ```
///
/// The consensus/observation join is pushed down into SQL here: one
/// GROUP BY + HAVING + INNER JOIN statement replaces the per-date query
/// loop of the in-core join, producing the same rows in the same order.

use chrono::NaiveDate;
use postgres::{Client, NoTls};

use crate::analysis::bias::bias_record;
use crate::model::{BiasError, BiasRecord, ConsensusForecast, GridForecast, Observation};
use crate::store::ForecastStore;

pub struct PgForecastStore {
    client: Client,
}

impl PgForecastStore {
    /// Connects with the given connection string, e.g. the `DATABASE_URL`
    /// loaded via dotenv.
    pub fn connect(url: &str) -> Result<Self, BiasError> {
        let client = Client::connect(url, NoTls)
            .map_err(|e| BiasError::DataUnavailable(format!("connect failed: {}", e)))?;
        Ok(PgForecastStore { client })
    }
}

fn store_err(context: &str, e: postgres::Error) -> BiasError {
    BiasError::DataUnavailable(format!("{}: {}", context, e))
}

impl ForecastStore for PgForecastStore {
    fn query_grid_forecasts(
        &mut self,
        location: &str,
        target_date: NaiveDate,
        horizon_days: u32,
    ) -> Result<Vec<GridForecast>, BiasError> {
        let rows = self
            .client
            .query(
                "SELECT gridpoint_id, grid_x, grid_y, high_temp, low_temp
                 FROM forecasts
                 WHERE location = $1
                   AND target_date = $2
                   AND horizon_days = $3
                 ORDER BY gridpoint_id, grid_x, grid_y",
                &[&location, &target_date, &(horizon_days as i32)],
            )
            .map_err(|e| store_err("forecast query failed", e))?;

        Ok(rows
            .iter()
            .map(|row| GridForecast {
                location: location.to_string(),
                gridpoint_id: row.get(0),
                grid_x: row.get(1),
                grid_y: row.get(2),
                target_date,
                horizon_days,
                high_temp: row.get(3),
                low_temp: row.get(4),
            })
            .collect())
    }

    fn query_observation(
        &mut self,
        location: &str,
        date: NaiveDate,
    ) -> Result<Option<Observation>, BiasError> {
        let row = self
            .client
            .query_opt(
                "SELECT high_temp, low_temp
                 FROM actuals
                 WHERE location = $1 AND date = $2",
                &[&location, &date],
            )
            .map_err(|e| store_err("observation query failed", e))?;

        Ok(row.map(|row| Observation {
            location: location.to_string(),
            date,
            high_temp: row.get(0),
            low_temp: row.get(1),
        }))
    }

    /// Store-side form of the join: consensus aggregation, the usable-
    /// gridpoint filter, and the inner join against actuals all happen in
    /// one statement, ordered by target date.
    fn query_bias_records(
        &mut self,
        location: &str,
        start: NaiveDate,
        end: NaiveDate,
        horizon_days: u32,
        min_grid_count: u32,
    ) -> Result<Vec<BiasRecord>, BiasError> {
        let rows = self
            .client
            .query(
                "SELECT f.target_date,
                        COUNT(*) AS grid_count,
                        AVG(f.high_temp) AS consensus_high,
                        AVG(f.low_temp) AS consensus_low,
                        a.high_temp AS actual_high,
                        a.low_temp AS actual_low
                 FROM forecasts f
                 INNER JOIN actuals a
                     ON a.location = f.location
                    AND a.date = f.target_date
                 WHERE f.location = $1
                   AND f.target_date BETWEEN $2 AND $3
                   AND f.horizon_days = $4
                 GROUP BY f.target_date, a.high_temp, a.low_temp
                 HAVING COUNT(*) >= $5
                 ORDER BY f.target_date",
                &[
                    &location,
                    &start,
                    &end,
                    &(horizon_days as i32),
                    &(min_grid_count as i64),
                ],
            )
            .map_err(|e| store_err("bias join query failed", e))?;

        Ok(rows
            .iter()
            .map(|row| {
                let target_date: NaiveDate = row.get(0);
                let grid_count: i64 = row.get(1);
                let consensus = ConsensusForecast {
                    location: location.to_string(),
                    target_date,
                    horizon_days,
                    grid_count: grid_count as u32,
                    consensus_high: row.get(2),
                    consensus_low: row.get(3),
                };
                let observation = Observation {
                    location: location.to_string(),
                    date: target_date,
                    high_temp: row.get(4),
                    low_temp: row.get(5),
                };
                // Route through bias_record so the sign convention stays
                // defined in exactly one place.
                bias_record(&consensus, &observation)
            })
            .collect())
    }
}
