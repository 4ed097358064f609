//! Descriptive statistics
//!
//! Central tendency, dispersion and shape of a numeric column:
//! - mean, median, sample and population standard deviation
//! - skewness (biased moment estimator) and its classification
//! - z-scores
//! - a combined [`Summary`]

use crate::quantiles::quantile;
use crate::{MathError, Result};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::fmt;

fn require_values(values: &[f64], min: usize, what: &str) -> Result<()> {
    if values.len() < min {
        return Err(MathError::InsufficientData(format!(
            "{} needs at least {} value(s), have {}",
            what,
            min,
            values.len()
        )));
    }
    Ok(())
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    require_values(values, 1, "Mean")?;
    Ok(values.iter().mean())
}

/// Median (the 0.5 quantile, interpolated for even lengths)
pub fn median(values: &[f64]) -> Result<f64> {
    quantile(values, 0.5)
}

/// Sample standard deviation (divides by `n - 1`)
pub fn sample_std_dev(values: &[f64]) -> Result<f64> {
    require_values(values, 2, "Sample standard deviation")?;
    Ok(values.iter().std_dev())
}

/// Population standard deviation (divides by `n`)
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    require_values(values, 1, "Population standard deviation")?;
    Ok(values.iter().population_std_dev())
}

/// Skewness as the biased moment ratio `m3 / m2^1.5`.
///
/// A column with zero variance has no asymmetry and yields `0.0`.
pub fn skewness(values: &[f64]) -> Result<f64> {
    require_values(values, 1, "Skewness")?;

    let n = values.len() as f64;
    let mean = values.iter().mean();
    let m2 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let m3 = values.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / n;

    if m2 <= (f64::EPSILON * mean).powi(2) {
        return Ok(0.0);
    }

    Ok(m3 / m2.powf(1.5))
}

/// Shape of a distribution, judged from its skewness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkewClass {
    /// `|skew| < 0.5`
    Symmetric,
    /// `skew >= 0.5`
    RightSkewed,
    /// `skew <= -0.5`
    LeftSkewed,
}

impl SkewClass {
    /// Classify a skewness value
    pub fn from_skewness(skew: f64) -> Self {
        if skew >= 0.5 {
            SkewClass::RightSkewed
        } else if skew <= -0.5 {
            SkewClass::LeftSkewed
        } else {
            SkewClass::Symmetric
        }
    }
}

impl fmt::Display for SkewClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkewClass::Symmetric => "symmetric",
            SkewClass::RightSkewed => "right-skewed",
            SkewClass::LeftSkewed => "left-skewed",
        };
        f.write_str(label)
    }
}

/// Standardize `values` with the population standard deviation.
///
/// Returns `None` when the deviation is zero, since every value then sits on the mean
/// and no score is defined.
pub fn z_scores(values: &[f64]) -> Result<Option<Vec<f64>>> {
    let mean = mean(values)?;
    let std_dev = population_std_dev(values)?;

    if std_dev == 0.0 {
        return Ok(None);
    }

    Ok(Some(values.iter().map(|v| (v - mean) / std_dev).collect()))
}

/// Summary statistics of a numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation, `None` for a single value
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
}

impl Summary {
    /// Summarize a non-empty column
    pub fn of(values: &[f64]) -> Result<Self> {
        require_values(values, 1, "Summary")?;

        Ok(Self {
            count: values.len(),
            mean: mean(values)?,
            median: median(values)?,
            std_dev: sample_std_dev(values).ok(),
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
            q1: quantile(values, 0.25)?,
            q3: quantile(values, 0.75)?,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Count:   {}", self.count)?;
        writeln!(f, "  Mean:    {:.2}", self.mean)?;
        writeln!(f, "  Median:  {:.2}", self.median)?;
        match self.std_dev {
            Some(sd) => writeln!(f, "  Std Dev: {:.2}", sd)?,
            None => writeln!(f, "  Std Dev: n/a")?,
        }
        writeln!(f, "  Min:     {:.2}", self.min)?;
        writeln!(f, "  Q1:      {:.2}", self.q1)?;
        writeln!(f, "  Q3:      {:.2}", self.q3)?;
        writeln!(f, "  Max:     {:.2}", self.max)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_median() {
        let values = [1.0, 2.0, 3.0, 4.0, 10.0];
        assert!((mean(&values).unwrap() - 4.0).abs() < 1e-12);
        assert_eq!(median(&values).unwrap(), 3.0);
        assert!(mean(&[]).is_err());
    }

    #[test]
    fn test_standard_deviations() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std_dev(&values).unwrap() - 2.0).abs() < 1e-12);
        let expected_sample = (32.0_f64 / 7.0).sqrt();
        assert!((sample_std_dev(&values).unwrap() - expected_sample).abs() < 1e-12);
        assert!(sample_std_dev(&[1.0]).is_err());
    }

    #[test]
    fn test_skewness_symmetric_column() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let skew = skewness(&values).unwrap();
        assert!(skew.abs() < 1e-12);
        assert_eq!(SkewClass::from_skewness(skew), SkewClass::Symmetric);
    }

    #[test]
    fn test_skewness_dominant_extreme() {
        let values = [10.0, 12.0, 12.0, 13.0, 12.0, 11.0, 100.0];
        let skew = skewness(&values).unwrap();
        assert!(skew > 0.5);
        assert_eq!(SkewClass::from_skewness(skew), SkewClass::RightSkewed);

        let mirrored: Vec<f64> = values.iter().map(|v| -v).collect();
        let skew = skewness(&mirrored).unwrap();
        assert_eq!(SkewClass::from_skewness(skew), SkewClass::LeftSkewed);
    }

    #[test]
    fn test_skewness_constant_column() {
        assert_eq!(skewness(&[3.0, 3.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_skew_class_boundaries() {
        assert_eq!(SkewClass::from_skewness(0.5), SkewClass::RightSkewed);
        assert_eq!(SkewClass::from_skewness(-0.5), SkewClass::LeftSkewed);
        assert_eq!(SkewClass::from_skewness(0.49), SkewClass::Symmetric);
        assert_eq!(SkewClass::RightSkewed.to_string(), "right-skewed");
    }

    #[test]
    fn test_z_scores() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let scores = z_scores(&values).unwrap().unwrap();
        // mean 5, population std 2
        assert!((scores[0] + 1.5).abs() < 1e-9);
        assert!((scores[7] - 2.0).abs() < 1e-9);

        assert_eq!(z_scores(&[1.0, 1.0]).unwrap(), None);
    }

    #[test]
    fn test_summary() {
        let summary = Summary::of(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(summary.count, 4);
        assert!((summary.mean - 2.5).abs() < 1e-12);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        assert_eq!(summary.q1, 1.75);
        assert_eq!(summary.q3, 3.25);

        let single = Summary::of(&[7.0]).unwrap();
        assert_eq!(single.std_dev, None);
    }
}
