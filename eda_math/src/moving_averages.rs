//! Moving average calculation implementations
//!
//! Contains:
//! - Simple Moving Average (SMA), a streaming trailing window
//! - Centered rolling mean over a whole column, built on the SMA

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Push a new value into the window, evicting the oldest once full
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Whether the window holds a full period of values
    pub fn is_ready(&self) -> bool {
        self.values.len() == self.period
    }

    /// Get the current SMA value
    pub fn value(&self) -> Result<f64> {
        if !self.is_ready() {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for SMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        Ok(self.sum / self.period as f64)
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the SMA, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}

/// Centered rolling mean over `values`.
///
/// The value at index `i` is the mean of `values[i - window / 2 ..= i + (window - 1) / 2]`.
/// Positions where that full window does not exist are `None`: for a window of 7
/// the first and last 3 positions, and every position when the input is shorter
/// than the window. Nothing is filled or extrapolated.
pub fn centered_rolling_mean(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut sma = SimpleMovingAverage::new(window)?;
    let mut result = vec![None; values.len()];

    for (j, &value) in values.iter().enumerate() {
        sma.update(value);
        if sma.is_ready() {
            // The trailing window ending at j is centered on this index
            let center = j + 1 - window + window / 2;
            result[center] = Some(sma.value()?);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_calculation() {
        let mut sma = SimpleMovingAverage::new(3).unwrap();

        // Not enough data yet
        assert!(sma.value().is_err());

        sma.update(2.0);
        sma.update(4.0);

        // Still not enough data
        assert!(sma.value().is_err());

        sma.update(6.0);

        // Now we have enough data
        assert_eq!(sma.value().unwrap(), 4.0); // (2 + 4 + 6) / 3 = 4

        // The window slides, dropping the oldest value
        sma.update(8.0);
        assert_eq!(sma.value().unwrap(), 6.0); // (4 + 6 + 8) / 3 = 6

        sma.reset();
        assert!(!sma.is_ready());
    }

    #[test]
    fn test_sma_rejects_zero_period() {
        assert!(matches!(
            SimpleMovingAverage::new(0),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_centered_window_of_seven() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let rolled = centered_rolling_mean(&values, 7).unwrap();

        assert_eq!(rolled.len(), 10);
        assert!(rolled[..3].iter().all(Option::is_none));
        assert!(rolled[7..].iter().all(Option::is_none));
        // mean(1..=7) = 4, mean(2..=8) = 5, ...
        assert_eq!(rolled[3], Some(4.0));
        assert_eq!(rolled[4], Some(5.0));
        assert_eq!(rolled[6], Some(7.0));
    }

    #[test]
    fn test_centered_window_shorter_than_input() {
        let values = [5.0; 6];
        let rolled = centered_rolling_mean(&values, 7).unwrap();
        assert!(rolled.iter().all(Option::is_none));
    }

    #[test]
    fn test_centered_even_window_leans_forward() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let rolled = centered_rolling_mean(&values, 4).unwrap();
        assert_eq!(rolled, vec![None, None, Some(1.5), Some(2.5), Some(3.5), None]);
    }
}
