//! # COVID Pipeline
//!
//! Data cleaning and derived metrics for COVID-19 statistics.
//!
//! ## Features
//!
//! - Loading of raw API payloads (national timelines and regional snapshots)
//! - National time-series normalization: sorted, gap-free daily records with daily
//!   deltas, centered 7-day rolling averages and fatality rate
//! - Regional snapshot normalization: per-100k rates, fatality rate, invalid rows removed
//! - Outlier detection (IQR and Z-score) and skewness classification for any column
//! - Descriptive summaries, correlation matrix, rankings and an executive summary
//! - CSV snapshots and polars `DataFrame` views of the cleaned tables
//!
//! ## Quick Start
//!
//! ```rust
//! use covid_pipeline::data::DataLoader;
//! use covid_pipeline::outliers::detect_outliers_iqr;
//! use covid_pipeline::regions::normalize_regions;
//! use covid_pipeline::timeseries::normalize_timeline;
//!
//! let raw = DataLoader::timeline_from_str(
//!     r#"{"timeline": {"cases": {"1/22/20": 1, "1/23/20": 3},
//!                      "deaths": {"1/22/20": 0, "1/23/20": 1}}}"#,
//! )?;
//! let series = normalize_timeline(&raw)?;
//! assert_eq!(series.records()[1].daily_new_cases, 2);
//!
//! let records = DataLoader::regions_from_str(
//!     r#"[{"state": "Ohio", "cases": 100, "deaths": 2, "population": 10000},
//!         {"state": "Utah", "cases": 50, "deaths": 1, "population": 0}]"#,
//! )?;
//! let table = normalize_regions(&records);
//! assert_eq!(table.len(), 1);
//!
//! let report = detect_outliers_iqr(&table, "cases_per_100k")?;
//! assert!(report.outliers.is_empty());
//! # Ok::<(), covid_pipeline::PipelineError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod metrics;
pub mod outliers;
pub mod regions;
pub mod report;
pub mod timeseries;
pub mod utils;

// Re-export commonly used types
pub use crate::config::ReportConfig;
pub use crate::data::{DataLoader, RawRegionRecord, RawTimeline};
pub use crate::error::{PipelineError, Result};
pub use crate::outliers::{
    detect_outliers_iqr, detect_outliers_iqr_with, detect_outliers_zscore,
    detect_outliers_zscore_with, skewness_report, OutlierReport, SkewnessReport,
};
pub use crate::regions::{normalize_regions, RegionColumn, RegionSnapshot, RegionTable};
pub use crate::report::AnalysisReport;
pub use crate::timeseries::{normalize_timeline, NationalTimeSeries, TimeSeriesRecord};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
