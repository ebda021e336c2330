// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Unweighted mean over a fixed trailing window, computed with a running sum
// so the whole series costs O(n) regardless of period.
//
// The output is aligned to the input: element `i` is defined once a full
// window is available (`i >= period - 1`) and undefined before that.

use crate::series;

/// Compute the SMA series for the given `values` and look-back `period`.
///
/// # Edge cases
/// - `period == 0` => all-undefined series (division by zero guard)
/// - `values.len() < period` => all-undefined series
/// - `period == 1` => the input itself, elementwise
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = series::undefined(values.len());
    if period == 0 {
        return out;
    }

    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= period {
            // Drop the element leaving the window.
            sum -= values[i - period];
        }
        if i + 1 >= period {
            out[i] = Some(sum / period as f64);
        }
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_empty_input() {
        assert!(calculate_sma(&[], 5).is_empty());
    }

    #[test]
    fn sma_period_zero_all_undefined() {
        let out = calculate_sma(&[1.0, 2.0, 3.0], 0);
        assert_eq!(out, vec![None, None, None]);
    }

    #[test]
    fn sma_insufficient_data_all_undefined() {
        let out = calculate_sma(&[1.0, 2.0], 5);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|v| v.is_none()));
    }

    #[test]
    fn sma_period_one_is_identity() {
        let values = vec![3.0, 1.0, 4.0, 1.0, 5.0];
        let out = calculate_sma(&values, 1);
        let expected: Vec<Option<f64>> = values.iter().map(|&v| Some(v)).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn sma_defined_from_period_minus_one() {
        let values: Vec<f64> = (1..=6).map(|x| x as f64).collect();
        let out = calculate_sma(&values, 3);
        assert!(out[0].is_none());
        assert!(out[1].is_none());
        // (1+2+3)/3, (2+3+4)/3, ...
        assert_eq!(out[2], Some(2.0));
        assert_eq!(out[3], Some(3.0));
        assert_eq!(out[4], Some(4.0));
        assert_eq!(out[5], Some(5.0));
    }

    #[test]
    fn sma_running_sum_matches_naive_mean() {
        let values = vec![44.3, 44.1, 43.6, 44.8, 45.1, 45.4, 44.2, 43.9, 44.6, 45.0];
        let period = 4;
        let out = calculate_sma(&values, period);
        for i in (period - 1)..values.len() {
            let naive: f64 =
                values[i + 1 - period..=i].iter().sum::<f64>() / period as f64;
            let got = out[i].unwrap();
            assert!((got - naive).abs() < 1e-12, "index {i}: got {got}, expected {naive}");
        }
    }

    #[test]
    fn sma_slice_locality() {
        // SMA depends only on its own window, so recomputing on a tail slice
        // reproduces the same values wherever the window fits in the slice.
        let values: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        let period = 5;
        let full = calculate_sma(&values, period);
        let tail = &values[25..];
        let sliced = calculate_sma(tail, period);
        for (j, got) in sliced.iter().enumerate().skip(period - 1) {
            let full_val = full[25 + j].unwrap();
            assert!((got.unwrap() - full_val).abs() < 1e-12);
        }
    }
}
