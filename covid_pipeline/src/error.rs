//! Error types for the covid_pipeline crate

use eda_math::MathError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the covid_pipeline crate
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Raw data failed basic shape or parse expectations
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A requested column does not exist in the cleaned table
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Error from statistical calculations
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from report configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from writing CSV snapshots
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, PipelineError>;

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::MalformedInput(err.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::CsvError(err.to_string())
    }
}

impl From<toml::de::Error> for PipelineError {
    fn from(err: toml::de::Error) -> Self {
        PipelineError::ConfigError(err.to_string())
    }
}

impl From<PolarsError> for PipelineError {
    fn from(err: PolarsError) -> Self {
        PipelineError::PolarsError(err.to_string())
    }
}
