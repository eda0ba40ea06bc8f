//! Data Coverage Verification Module
//!
//! The bias extractor silently drops any date missing a usable consensus
//! or an observation, so a thin report can mean either "little bias" or
//! "little data". This module diffs the requested date range against what
//! the store actually holds, per horizon, to tell those apart.
//!
//! Use this before trusting a report over a new location or date range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::consensus::build_consensus;
use crate::model::BiasError;
use crate::report::MAX_HORIZON_DAYS;
use crate::store::ForecastStore;

// ============================================================================
// Coverage Results
// ============================================================================

/// Coverage of one (location, horizon) over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonCoverage {
    pub horizon_days: u32,
    /// Days in the requested range.
    pub total_days: usize,
    /// Days where both a usable consensus and an observation exist.
    pub matched_days: usize,
    /// Dates with no usable consensus (no forecasts, or too few gridpoints).
    pub missing_consensus: Vec<NaiveDate>,
    /// Dates with a usable consensus but no observation.
    pub missing_observation: Vec<NaiveDate>,
}

impl HorizonCoverage {
    /// Matched days as a fraction of the range, in percent.
    pub fn match_rate(&self) -> f64 {
        if self.total_days == 0 {
            return 0.0;
        }
        (self.matched_days as f64 / self.total_days as f64) * 100.0
    }
}

/// Coverage across all horizons for one location and date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub location: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub horizons: Vec<HorizonCoverage>,
}

// ============================================================================
// Coverage Runner
// ============================================================================

/// Walks the date range at one horizon and classifies each date.
///
/// A date with forecasts but too few gridpoints counts as missing
/// consensus — from the extractor's point of view it is just as absent
/// as a date with no forecasts at all.
pub fn check_horizon_coverage<S: ForecastStore + ?Sized>(
    store: &mut S,
    location: &str,
    start: NaiveDate,
    end: NaiveDate,
    horizon_days: u32,
    min_grid_count: u32,
) -> Result<HorizonCoverage, BiasError> {
    let mut coverage = HorizonCoverage {
        horizon_days,
        total_days: 0,
        matched_days: 0,
        missing_consensus: Vec::new(),
        missing_observation: Vec::new(),
    };

    let mut date = start;
    while date <= end {
        coverage.total_days += 1;

        let forecasts = store.query_grid_forecasts(location, date, horizon_days)?;
        let usable = build_consensus(&forecasts)
            .map(|c| c.is_usable(min_grid_count))
            .unwrap_or(false);

        if !usable {
            coverage.missing_consensus.push(date);
        } else if store.query_observation(location, date)?.is_none() {
            coverage.missing_observation.push(date);
        } else {
            coverage.matched_days += 1;
        }

        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    Ok(coverage)
}

/// Runs the coverage check for every horizon 0..=9.
pub fn run_full_coverage<S: ForecastStore + ?Sized>(
    store: &mut S,
    location: &str,
    start: NaiveDate,
    end: NaiveDate,
    min_grid_count: u32,
) -> Result<CoverageReport, BiasError> {
    let mut report = CoverageReport {
        location: location.to_string(),
        start,
        end,
        horizons: Vec::new(),
    };

    for horizon in 0..=MAX_HORIZON_DAYS {
        report.horizons.push(check_horizon_coverage(
            store,
            location,
            start,
            end,
            horizon,
            min_grid_count,
        )?);
    }

    Ok(report)
}

pub fn print_summary(report: &CoverageReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 COVERAGE SUMMARY — {} ({} to {})", report.location, report.start, report.end);
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Horizon   Matched   No consensus   No observation   Rate");

    for h in &report.horizons {
        println!(
            "{:>7}   {:>7}   {:>12}   {:>14}   {:>5.1}%",
            h.horizon_days,
            h.matched_days,
            h.missing_consensus.len(),
            h.missing_observation.len(),
            h.match_rate()
        );
    }

    let total_matched: usize = report.horizons.iter().map(|h| h.matched_days).sum();
    let total_days: usize = report.horizons.iter().map(|h| h.total_days).sum();
    let overall = if total_days > 0 {
        (total_matched as f64 / total_days as f64) * 100.0
    } else {
        0.0
    };

    println!();
    println!("Overall Match Rate: {:.1}% ({}/{})", overall, total_matched, total_days);
    println!("═══════════════════════════════════════════════════════════");
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Observation;
    use crate::store::memory::MemoryForecastStore;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn observation(day: u32) -> Observation {
        Observation {
            location: "CHI".to_string(),
            date: date(day),
            high_temp: 70.0,
            low_temp: 50.0,
        }
    }

    #[test]
    fn test_fully_matched_range() {
        let mut store = MemoryForecastStore::new();
        for day in 1..=3 {
            store.seed_gridded_forecasts("CHI", date(day), 1, 6, 71.0, 51.0);
            store.insert_observation(observation(day));
        }

        let c = check_horizon_coverage(&mut store, "CHI", date(1), date(3), 1, 5).unwrap();
        assert_eq!(c.total_days, 3);
        assert_eq!(c.matched_days, 3);
        assert!(c.missing_consensus.is_empty());
        assert!(c.missing_observation.is_empty());
        assert_eq!(c.match_rate(), 100.0);
    }

    #[test]
    fn test_gaps_are_attributed_to_the_missing_side() {
        let mut store = MemoryForecastStore::new();
        // Day 1: matched.
        store.seed_gridded_forecasts("CHI", date(1), 1, 6, 71.0, 51.0);
        store.insert_observation(observation(1));
        // Day 2: consensus exists, observation missing.
        store.seed_gridded_forecasts("CHI", date(2), 1, 6, 71.0, 51.0);
        // Day 3: observation exists, too few gridpoints.
        store.seed_gridded_forecasts("CHI", date(3), 1, 3, 71.0, 51.0);
        store.insert_observation(observation(3));
        // Day 4: nothing at all.

        let c = check_horizon_coverage(&mut store, "CHI", date(1), date(4), 1, 5).unwrap();
        assert_eq!(c.total_days, 4);
        assert_eq!(c.matched_days, 1);
        assert_eq!(c.missing_observation, vec![date(2)]);
        assert_eq!(c.missing_consensus, vec![date(3), date(4)]);
    }

    #[test]
    fn test_thin_consensus_counts_as_missing_consensus() {
        // Coverage must agree with the extractor: a thin consensus is
        // absent, not present-with-small-count.
        let mut store = MemoryForecastStore::new();
        store.seed_gridded_forecasts("CHI", date(1), 1, 4, 71.0, 51.0);
        store.insert_observation(observation(1));

        let c = check_horizon_coverage(&mut store, "CHI", date(1), date(1), 1, 5).unwrap();
        assert_eq!(c.matched_days, 0);
        assert_eq!(c.missing_consensus, vec![date(1)]);
    }

    #[test]
    fn test_full_coverage_sweeps_all_ten_horizons() {
        let mut store = MemoryForecastStore::new();
        store.seed_gridded_forecasts("CHI", date(1), 4, 6, 71.0, 51.0);
        store.insert_observation(observation(1));

        let report = run_full_coverage(&mut store, "CHI", date(1), date(1), 5).unwrap();
        assert_eq!(report.horizons.len(), 10);
        for h in &report.horizons {
            if h.horizon_days == 4 {
                assert_eq!(h.matched_days, 1);
            } else {
                assert_eq!(h.matched_days, 0);
            }
        }
    }

    #[test]
    fn test_match_rate_of_empty_range_is_zero() {
        let c = HorizonCoverage {
            horizon_days: 0,
            total_days: 0,
            matched_days: 0,
            missing_consensus: Vec::new(),
            missing_observation: Vec::new(),
        };
        assert_eq!(c.match_rate(), 0.0);
    }
}
