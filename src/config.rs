/// Analysis settings for the bias monitoring service.
///
/// The sensitivity thresholds (minimum gridpoint count, minimum sample
/// days, bias magnitude threshold) are configuration rather than embedded
/// constants so backtests can rerun the same data with different settings.
/// Settings load from an optional TOML file; anything unset falls back to
/// the defaults below.

use serde::Deserialize;
use std::path::Path;

use crate::model::BiasError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// A consensus over fewer gridpoints than this is not a meaningful spatial
/// ensemble signal and would inject single-cell noise into the bias estimate.
pub const DEFAULT_MIN_GRID_COUNT: u32 = 5;

/// Minimum matched days before the persistence classifier will evaluate
/// a horizon at all.
pub const DEFAULT_MIN_DAYS: usize = 30;

/// Minimum |mean bias| (degrees F) to count as a persistent directional bias.
pub const DEFAULT_BIAS_THRESHOLD: f64 = 0.5;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Tunable thresholds for the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Minimum gridpoints for a usable spatial consensus.
    pub min_grid_count: u32,
    /// Minimum matched days for persistence classification.
    pub min_days: usize,
    /// |mean bias| threshold for persistence detection, in degrees.
    pub bias_threshold: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            min_grid_count: DEFAULT_MIN_GRID_COUNT,
            min_days: DEFAULT_MIN_DAYS,
            bias_threshold: DEFAULT_BIAS_THRESHOLD,
        }
    }
}

impl AnalysisSettings {
    /// Load settings from a TOML file, e.g. `./biasmon.toml`:
    ///
    /// ```toml
    /// min_grid_count = 5
    /// min_days = 30
    /// bias_threshold = 0.5
    /// ```
    ///
    /// Missing keys take their defaults. A missing file is an error;
    /// callers that treat the file as optional should use
    /// `load_or_default` instead.
    pub fn load(path: &str) -> Result<Self, BiasError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| BiasError::InvalidConfig(format!("cannot read {}: {}", path, e)))?;
        toml::from_str(&contents)
            .map_err(|e| BiasError::InvalidConfig(format!("cannot parse {}: {}", path, e)))
    }

    /// Load settings from `path` if it exists, otherwise use defaults.
    /// A file that exists but fails to parse is still an error — a typo
    /// in the settings should not silently revert to defaults.
    pub fn load_or_default(path: &str) -> Result<Self, BiasError> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Read the Postgres connection string from the environment.
/// `dotenv` should have been initialized by the caller first.
pub fn database_url() -> Result<String, BiasError> {
    std::env::var("DATABASE_URL")
        .map_err(|_| BiasError::InvalidConfig("DATABASE_URL is not set".to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_thresholds() {
        let s = AnalysisSettings::default();
        assert_eq!(s.min_grid_count, 5);
        assert_eq!(s.min_days, 30);
        assert_eq!(s.bias_threshold, 0.5);
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let s: AnalysisSettings = toml::from_str("min_days = 14").unwrap();
        assert_eq!(s.min_days, 14);
        assert_eq!(s.min_grid_count, DEFAULT_MIN_GRID_COUNT);
        assert_eq!(s.bias_threshold, DEFAULT_BIAS_THRESHOLD);
    }

    #[test]
    fn test_full_toml_overrides_everything() {
        let s: AnalysisSettings = toml::from_str(
            "min_grid_count = 9\nmin_days = 60\nbias_threshold = 1.25\n",
        )
        .unwrap();
        assert_eq!(s.min_grid_count, 9);
        assert_eq!(s.min_days, 60);
        assert_eq!(s.bias_threshold, 1.25);
    }

    #[test]
    fn test_load_missing_file_is_invalid_config() {
        let err = AnalysisSettings::load("/nonexistent/biasmon.toml").unwrap_err();
        assert!(matches!(err, BiasError::InvalidConfig(_)));
    }

    #[test]
    fn test_load_or_default_missing_file_uses_defaults() {
        let s = AnalysisSettings::load_or_default("/nonexistent/biasmon.toml").unwrap();
        assert_eq!(s, AnalysisSettings::default());
    }
}
