//! # EDA Math
//!
//! Statistical calculations for exploratory data analysis.
//! This crate provides the numeric building blocks used by the COVID-19
//! pipeline: centered moving averages, linear-interpolation quantiles,
//! descriptive statistics, skewness, z-scores and Pearson correlation.
//!
//! Every function here is pure and works on plain `f64` slices.

use thiserror::Error;

// Calculation modules
pub mod correlation;
pub mod descriptive;
pub mod moving_averages;
pub mod quantiles;

pub use correlation::pearson;
pub use descriptive::{
    mean, median, population_std_dev, sample_std_dev, skewness, z_scores, SkewClass, Summary,
};
pub use moving_averages::{centered_rolling_mean, SimpleMovingAverage};
pub use quantiles::{iqr_bounds, quantile, IqrBounds};

/// Errors that can occur in statistical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for statistical operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Keep only the finite values of a column, in order.
pub fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}
