//! Utility functions for the covid_pipeline crate

use crate::error::{PipelineError, Result};

/// Parsing of the date keys found in raw timelines
pub mod date_parser {
    use super::{PipelineError, Result};
    use chrono::NaiveDate;

    /// Accepted layouts, tried in order. The API emits `M/D/YY`.
    const FORMATS: [&str; 3] = ["%m/%d/%y", "%Y-%m-%d", "%m/%d/%Y"];

    /// Parse a timeline date key into a calendar date
    pub fn parse_date(raw: &str) -> Result<NaiveDate> {
        let trimmed = raw.trim();

        FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            .ok_or_else(|| PipelineError::MalformedInput(format!("Unparseable date: '{}'", raw)))
    }
}

/// Check that a tuning parameter is a finite positive number
pub fn validate_positive(value: f64, name: &str) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PipelineError::ConfigError(format!(
            "{} must be a positive number, got {}",
            name, value
        )));
    }
    Ok(())
}

/// `numerator / denominator * scale`, or exactly `0.0` when the denominator is zero
pub fn guarded_rate(numerator: f64, denominator: f64, scale: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * scale
    }
}
