//! Quantile estimation with linear interpolation between order statistics.

use crate::error::{EvalError, Result};

/// Compute the p-quantile of `values` with linear interpolation.
///
/// Uses the convention `position = p * (n - 1)` on the sorted values with
/// linear interpolation between the two bracketing order statistics, the
/// same convention the upstream similarity-table builder uses, so
/// thresholds agree across calls.
pub fn quantile(values: &[f64], p: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(EvalError::EmptyData(
            "Cannot take quantile of empty data".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(EvalError::InvalidParameter(format!(
            "Quantile must be in [0, 1], got {}",
            p
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = p * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return Ok(sorted[lower]);
    }
    let fraction = position - lower as f64;
    Ok(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_median_even() {
        let values = vec![1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile(&values, 0.5).unwrap(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_median_odd() {
        let values = vec![3.0, 1.0, 2.0];
        assert_relative_eq!(quantile(&values, 0.5).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolated() {
        // position = 0.9 * 3 = 2.7 -> 3 + 0.7 * (4 - 3) = 3.7
        let values = vec![1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile(&values, 0.9).unwrap(), 3.7, epsilon = 1e-12);
    }

    #[test]
    fn test_extremes() {
        let values = vec![5.0, -1.0, 3.0];
        assert_relative_eq!(quantile(&values, 0.0).unwrap(), -1.0);
        assert_relative_eq!(quantile(&values, 1.0).unwrap(), 5.0);
    }

    #[test]
    fn test_unsorted_input() {
        let values = vec![4.0, 1.0, 3.0, 2.0];
        assert_relative_eq!(quantile(&values, 0.5).unwrap(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_single_value() {
        assert_relative_eq!(quantile(&[7.0], 0.3).unwrap(), 7.0);
    }

    #[test]
    fn test_out_of_range() {
        assert!(quantile(&[1.0], 1.5).is_err());
        assert!(quantile(&[1.0], -0.1).is_err());
    }

    #[test]
    fn test_empty() {
        assert!(quantile(&[], 0.5).is_err());
    }
}
