//! Quantiles and interquartile-range bounds
//!
//! Quantiles use linear interpolation between the two closest ranks, the
//! same convention as the default quantile of most dataframe libraries.

use crate::{MathError, Result};
use serde::Serialize;

/// Quantile `q` (in `[0, 1]`) of `values` using linear interpolation.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidInput(format!(
            "Quantile must be between 0 and 1, got {}",
            q
        )));
    }
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute a quantile of an empty column".to_string(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(quantile_sorted(&sorted, q))
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Tukey fences computed from the first and third quartiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IqrBounds {
    /// First quartile
    pub q1: f64,
    /// Third quartile
    pub q3: f64,
    /// `q1 - multiplier * iqr`
    pub lower: f64,
    /// `q3 + multiplier * iqr`
    pub upper: f64,
}

impl IqrBounds {
    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Whether `value` lies strictly outside the fences
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Compute the IQR fences of `values` with the given multiplier (1.5 is the usual choice).
pub fn iqr_bounds(values: &[f64], multiplier: f64) -> Result<IqrBounds> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(MathError::InvalidInput(format!(
            "IQR multiplier must be a positive number, got {}",
            multiplier
        )));
    }
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute IQR bounds of an empty column".to_string(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile_sorted(&sorted, 0.25);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;

    Ok(IqrBounds {
        q1,
        q3,
        lower: q1 - multiplier * iqr,
        upper: q3 + multiplier * iqr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.0).unwrap(), 1.0);
        assert_eq!(quantile(&values, 0.5).unwrap(), 2.5);
        assert_eq!(quantile(&values, 1.0).unwrap(), 4.0);
        assert_eq!(quantile(&values, 0.25).unwrap(), 1.75);
    }

    #[test]
    fn test_quantile_ignores_input_order() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(quantile(&values, 0.5).unwrap(), 2.5);
    }

    #[test]
    fn test_quantile_errors() {
        assert!(matches!(
            quantile(&[], 0.5),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            quantile(&[1.0], 1.5),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_iqr_bounds_known_column() {
        // sorted: 10, 11, 12, 12, 12, 13, 100 -> Q1 = 11.5, Q3 = 12.5
        let values = [10.0, 12.0, 12.0, 13.0, 12.0, 11.0, 100.0];
        let bounds = iqr_bounds(&values, 1.5).unwrap();

        assert_eq!(bounds.q1, 11.5);
        assert_eq!(bounds.q3, 12.5);
        assert_eq!(bounds.iqr(), 1.0);
        assert_eq!(bounds.lower, 11.5 - 1.5 * 1.0);
        assert_eq!(bounds.upper, 12.5 + 1.5 * 1.0);

        let flagged: Vec<f64> = values
            .iter()
            .copied()
            .filter(|v| bounds.is_outlier(*v))
            .collect();
        assert_eq!(flagged, vec![100.0]);
    }

    #[test]
    fn test_iqr_bounds_rejects_bad_multiplier() {
        assert!(iqr_bounds(&[1.0, 2.0], 0.0).is_err());
        assert!(iqr_bounds(&[1.0, 2.0], f64::NAN).is_err());
    }
}
