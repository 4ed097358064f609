//! Pearson correlation between two numeric columns

use crate::{MathError, Result};

/// Pearson product-moment correlation coefficient of two equally long columns.
///
/// Fails when the columns differ in length, hold fewer than two values, or when
/// either column has zero variance (the coefficient is undefined there).
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(MathError::InvalidInput(format!(
            "Columns have different lengths ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Correlation needs at least 2 paired values, have {}",
            x.len()
        )));
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return Err(MathError::CalculationError(
            "Correlation is undefined for a constant column".to_string(),
        ));
    }

    // Clamp rounding noise so perfectly linear columns report exactly +/-1
    Ok((covariance / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
