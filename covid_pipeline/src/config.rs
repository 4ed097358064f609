//! Configuration of the batch report
//!
//! The normalizers take no configuration; these settings only steer which files the
//! `covid_report` job reads and writes and how the analyses are parameterized.
//!
//! ```toml
//! historical_path = "data/us_historical.json"
//! regions_path = "data/states.json"
//! output_dir = "data"
//! zscore_threshold = 2.5
//! analysis_columns = ["cases_per_100k", "deaths_per_100k"]
//! ```

use crate::error::{PipelineError, Result};
use crate::outliers::{DEFAULT_IQR_MULTIPLIER, DEFAULT_ZSCORE_THRESHOLD};
use crate::regions::RegionColumn;
use crate::utils::validate_positive;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one report run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Saved response of the national historical endpoint
    pub historical_path: Option<PathBuf>,
    /// Saved response of the regional snapshot endpoint
    pub regions_path: Option<PathBuf>,
    /// Directory receiving the cleaned CSV snapshots
    pub output_dir: PathBuf,
    pub iqr_multiplier: f64,
    pub zscore_threshold: f64,
    /// Number of regions in the top ranking
    pub top_n: usize,
    /// Regional columns analysed for outliers, skewness and correlation
    pub analysis_columns: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            historical_path: None,
            regions_path: None,
            output_dir: PathBuf::from("data"),
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            zscore_threshold: DEFAULT_ZSCORE_THRESHOLD,
            top_n: 10,
            analysis_columns: vec![
                RegionColumn::CasesPer100k.name().to_string(),
                RegionColumn::DeathsPer100k.name().to_string(),
                RegionColumn::FatalityRatePct.name().to_string(),
            ],
        }
    }
}

impl ReportConfig {
    /// Parse a configuration from TOML; missing keys take their defaults
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: ReportConfig = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check the tuning parameters and that every analysis column exists
    pub fn validate(&self) -> Result<()> {
        validate_positive(self.iqr_multiplier, "iqr_multiplier")?;
        validate_positive(self.zscore_threshold, "zscore_threshold")?;
        if self.top_n == 0 {
            return Err(PipelineError::ConfigError(
                "top_n must be at least 1".to_string(),
            ));
        }
        self.columns().map(|_| ())
    }

    /// The analysis columns as typed columns
    pub fn columns(&self) -> Result<Vec<RegionColumn>> {
        self.analysis_columns.iter().map(|c| c.parse()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.zscore_threshold, 2.0);
        assert_eq!(config.output_dir, PathBuf::from("data"));
        assert_eq!(config.columns().unwrap().len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ReportConfig::from_toml_str("zscore_threshold = 3.0\ntop_n = 5\n").unwrap();
        assert_eq!(config.zscore_threshold, 3.0);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.iqr_multiplier, 1.5);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ReportConfig::from_toml_str("iqr_multiplier = -1.0"),
            Err(PipelineError::ConfigError(_))
        ));
        assert!(matches!(
            ReportConfig::from_toml_str("analysis_columns = [\"tests\"]"),
            Err(PipelineError::UnknownColumn(_))
        ));
        assert!(matches!(
            ReportConfig::from_toml_str("no_such_key = 1"),
            Err(PipelineError::ConfigError(_))
        ));
    }
}
