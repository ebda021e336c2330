// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// Seeding: element `period - 1` holds the plain SMA of the first `period`
// values — the recursion only starts at element `period`.  The seed element
// is NOT itself smoothed; downstream crossover detection is sensitive to the
// first defined value, so this asymmetry is deliberate and load-bearing.
//
// The computation is a two-phase automaton: a seeding phase accumulating the
// SMA, then a smoothing phase carrying only the previous average.

use crate::series;

/// Internal smoothing state.
enum Phase {
    /// Accumulating the SMA seed over the first `period` values.
    Seeding { sum: f64, count: usize },
    /// Recursive update from the previous average.
    Smoothing { prev: f64 },
}

/// Compute the EMA series for the given `values` and look-back `period`.
///
/// The output is aligned to the input: undefined for `i < period - 1`, the
/// SMA seed at `i == period - 1`, and the recursive EMA from `i == period`.
///
/// # Edge cases
/// - `period == 0` => all-undefined series (division by zero guard)
/// - `values.len() < period` => all-undefined series
/// - `period == 1` => the input itself from the seed index onward
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = series::undefined(values.len());
    if period == 0 {
        return out;
    }

    let multiplier = 2.0 / (period + 1) as f64;
    let mut phase = Phase::Seeding { sum: 0.0, count: 0 };

    for (i, &v) in values.iter().enumerate() {
        phase = match phase {
            Phase::Seeding { sum, count } => {
                let sum = sum + v;
                let count = count + 1;
                if count == period {
                    let seed = sum / period as f64;
                    out[i] = Some(seed);
                    Phase::Smoothing { prev: seed }
                } else {
                    Phase::Seeding { sum, count }
                }
            }
            Phase::Smoothing { prev } => {
                let ema = v * multiplier + prev * (1.0 - multiplier);
                out[i] = Some(ema);
                Phase::Smoothing { prev: ema }
            }
        };
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
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_period_zero_all_undefined() {
        let out = calculate_ema(&[1.0, 2.0, 3.0], 0);
        assert!(out.iter().all(|v| v.is_none()));
    }

    #[test]
    fn ema_insufficient_data_all_undefined() {
        let out = calculate_ema(&[1.0, 2.0], 5);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|v| v.is_none()));
    }

    #[test]
    fn ema_seed_is_plain_sma() {
        let values = vec![2.0, 4.0, 6.0];
        let out = calculate_ema(&values, 3);
        assert!(out[0].is_none());
        assert!(out[1].is_none());
        // Seed = (2+4+6)/3 = 4.0, not a smoothed value.
        assert!((out[2].unwrap() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA of [1..10]: seed SMA = 3.0, multiplier = 2/6 = 1/3.
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let out = calculate_ema(&values, 5);

        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        assert!((out[4].unwrap() - expected).abs() < 1e-10);
        for i in 5..10 {
            expected = values[i] * mult + expected * (1.0 - mult);
            let got = out[i].unwrap();
            assert!((got - expected).abs() < 1e-10, "index {i}: got {got}, expected {expected}");
        }
    }

    #[test]
    fn ema_period_one_is_identity() {
        // multiplier = 1, so every element equals the input from index 0 on.
        let values = vec![3.0, 1.0, 4.0, 1.0, 5.0];
        let out = calculate_ema(&values, 1);
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(out[i], Some(v));
        }
    }

    #[test]
    fn ema_output_aligned_to_input() {
        let values: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let out = calculate_ema(&values, 12);
        assert_eq!(out.len(), values.len());
        assert!(out[..11].iter().all(|v| v.is_none()));
        assert!(out[11..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn ema_tracks_rising_series_from_below() {
        // On a strictly rising series the EMA lags the price but keeps rising.
        let values: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let out = calculate_ema(&values, 10);
        let mut prev = f64::MIN;
        for (i, v) in out.iter().enumerate().skip(9) {
            let v = v.unwrap();
            assert!(v < values[i], "EMA should lag a rising price at {i}");
            assert!(v > prev, "EMA should rise monotonically at {i}");
            prev = v;
        }
    }
}
