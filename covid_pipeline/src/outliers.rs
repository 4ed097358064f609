//! Outlier detection and skewness classification over a [`RegionTable`]
//!
//! Every function here reads the table and never mutates it, so they can be called
//! for any column, any number of times, in any order.

use crate::error::{PipelineError, Result};
use crate::regions::{RegionColumn, RegionSnapshot, RegionTable};
use eda_math::{
    finite_values, iqr_bounds, mean, population_std_dev, skewness, z_scores, SkewClass,
};
use serde::Serialize;
use std::fmt;

/// Default Tukey fence multiplier
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Default absolute z-score above which a value is an outlier
pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 2.0;

/// Bounds used to flag outliers, depending on the method
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum OutlierBounds {
    Iqr {
        q1: f64,
        q3: f64,
        multiplier: f64,
        lower: f64,
        upper: f64,
    },
    ZScore {
        mean: f64,
        std_dev: f64,
        threshold: f64,
    },
}

/// A region flagged as an outlier, with the value that flagged it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedRegion {
    pub region: RegionSnapshot,
    pub value: f64,
    /// Standardized value, for the z-score method
    pub z_score: Option<f64>,
}

/// Result of an outlier analysis on one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport {
    pub column: RegionColumn,
    pub bounds: OutlierBounds,
    pub outliers: Vec<FlaggedRegion>,
}

impl OutlierReport {
    /// Lower value bound (`mean - threshold * std_dev` for the z-score method)
    pub fn lower_bound(&self) -> f64 {
        match self.bounds {
            OutlierBounds::Iqr { lower, .. } => lower,
            OutlierBounds::ZScore {
                mean,
                std_dev,
                threshold,
            } => mean - threshold * std_dev,
        }
    }

    /// Upper value bound (`mean + threshold * std_dev` for the z-score method)
    pub fn upper_bound(&self) -> f64 {
        match self.bounds {
            OutlierBounds::Iqr { upper, .. } => upper,
            OutlierBounds::ZScore {
                mean,
                std_dev,
                threshold,
            } => mean + threshold * std_dev,
        }
    }

    /// Names of the flagged regions
    pub fn region_names(&self) -> Vec<&str> {
        self.outliers
            .iter()
            .map(|f| f.region.region_name.as_str())
            .collect()
    }

    /// Whether nothing was flagged
    pub fn is_empty(&self) -> bool {
        self.outliers.is_empty()
    }
}

impl fmt::Display for OutlierReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bounds {
            OutlierBounds::Iqr { .. } => write!(f, "IQR outliers in {}", self.column)?,
            OutlierBounds::ZScore { threshold, .. } => {
                write!(f, "Z-score (|z| > {}) outliers in {}", threshold, self.column)?
            }
        }
        writeln!(
            f,
            " [bounds {:.2} .. {:.2}]: {}",
            self.lower_bound(),
            self.upper_bound(),
            self.outliers.len()
        )?;
        for flagged in &self.outliers {
            write!(f, "  {}: {:.2}", flagged.region.region_name, flagged.value)?;
            if let Some(z) = flagged.z_score {
                write!(f, " (z = {:.2})", z)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Skewness of one column and its classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkewnessReport {
    pub column: RegionColumn,
    pub skewness: f64,
    pub class: SkewClass,
}

impl fmt::Display for SkewnessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: skewness {:.3} ({})", self.column, self.skewness, self.class)
    }
}

/// Rows paired with their finite values in `column`
fn finite_rows(table: &RegionTable, column: RegionColumn) -> Vec<(&RegionSnapshot, f64)> {
    table
        .iter()
        .map(|row| (row, row.value(column)))
        .filter(|(_, v)| v.is_finite())
        .collect()
}

/// IQR outliers in `column` with the default 1.5 multiplier
pub fn detect_outliers_iqr(table: &RegionTable, column: &str) -> Result<OutlierReport> {
    detect_outliers_iqr_with(table, column, DEFAULT_IQR_MULTIPLIER)
}

/// IQR outliers: values strictly outside `[Q1 - k*IQR, Q3 + k*IQR]`
pub fn detect_outliers_iqr_with(
    table: &RegionTable,
    column: &str,
    multiplier: f64,
) -> Result<OutlierReport> {
    let column: RegionColumn = column.parse()?;
    let rows = finite_rows(table, column);
    let values: Vec<f64> = rows.iter().map(|(_, v)| *v).collect();

    let bounds = iqr_bounds(&values, multiplier)?;
    let outliers = rows
        .into_iter()
        .filter(|(_, v)| bounds.is_outlier(*v))
        .map(|(row, value)| FlaggedRegion {
            region: row.clone(),
            value,
            z_score: None,
        })
        .collect();

    Ok(OutlierReport {
        column,
        bounds: OutlierBounds::Iqr {
            q1: bounds.q1,
            q3: bounds.q3,
            multiplier,
            lower: bounds.lower,
            upper: bounds.upper,
        },
        outliers,
    })
}

/// Z-score outliers in `column` with the default threshold of 2
pub fn detect_outliers_zscore(table: &RegionTable, column: &str) -> Result<OutlierReport> {
    detect_outliers_zscore_with(table, column, DEFAULT_ZSCORE_THRESHOLD)
}

/// Z-score outliers: values with `|z| > threshold`, standardized with the population
/// standard deviation. A column with zero spread has no outliers.
pub fn detect_outliers_zscore_with(
    table: &RegionTable,
    column: &str,
    threshold: f64,
) -> Result<OutlierReport> {
    let column: RegionColumn = column.parse()?;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(PipelineError::Math(eda_math::MathError::InvalidInput(format!(
            "Z-score threshold must be a positive number, got {}",
            threshold
        ))));
    }

    let rows = finite_rows(table, column);
    let values: Vec<f64> = rows.iter().map(|(_, v)| *v).collect();
    let mean = mean(&values)?;
    let std_dev = population_std_dev(&values)?;

    let outliers = match z_scores(&values)? {
        Some(scores) => rows
            .into_iter()
            .zip(scores)
            .filter(|(_, z)| z.abs() > threshold)
            .map(|((row, value), z)| FlaggedRegion {
                region: row.clone(),
                value,
                z_score: Some(z),
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(OutlierReport {
        column,
        bounds: OutlierBounds::ZScore {
            mean,
            std_dev,
            threshold,
        },
        outliers,
    })
}

/// Skewness of `column` and whether it is symmetric, right- or left-skewed
pub fn skewness_report(table: &RegionTable, column: &str) -> Result<SkewnessReport> {
    let column: RegionColumn = column.parse()?;
    let values = finite_values(&table.column_values(column));
    let skew = skewness(&values)?;

    Ok(SkewnessReport {
        column,
        skewness: skew,
        class: SkewClass::from_skewness(skew),
    })
}
