// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
// MACD line  = EMA(fast) - EMA(slow), defined wherever both EMAs are.
// Signal     = EMA(signal_period) of the MACD line, seeded over a zero-filled
//              copy of the line (see `series::undefined_as_zero` for the
//              policy and its warmup consequences).
// Histogram  = line - signal, defined wherever both are.
// Crossings  = the single bar where the line crosses the signal; equality at
//              the prior bar counts as "not yet crossed", so a flat tie
//              followed by a strict break triggers exactly one edge.

use serde::Serialize;

use crate::indicators::ema::calculate_ema;
use crate::series;

/// The MACD bundle: four aligned series plus the two crossing masks, all of
/// the input length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdResult {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
    /// True at the single bar where the line crosses the signal from below.
    pub cross_up: Vec<bool>,
    /// True at the single bar where the line crosses the signal from above.
    pub cross_down: Vec<bool>,
}

/// Compute the full MACD bundle for the given `closes`.
///
/// # Edge cases
/// - Empty input => empty series all around.
/// - Any element where either EMA is undefined => line undefined there,
///   histogram undefined, and no crossing can involve that index.
pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdResult {
    let n = closes.len();

    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);

    let line: Vec<Option<f64>> = (0..n)
        .map(|i| match (ema_fast[i], ema_slow[i]) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    // Named seeding policy: undefined entries become 0.0 so the signal EMA
    // can seed before the slow EMA warmup completes.
    let signal = calculate_ema(&series::undefined_as_zero(&line), signal_period);

    let histogram: Vec<Option<f64>> = (0..n)
        .map(|i| match (line[i], signal[i]) {
            (Some(l), Some(s)) => Some(l - s),
            _ => None,
        })
        .collect();

    let (cross_up, cross_down) = detect_crossings(&line, &signal);

    MacdResult {
        line,
        signal,
        histogram,
        cross_up,
        cross_down,
    }
}

/// Mark the bars where `line` crosses `signal`.
///
/// A crossing at `i` requires both series to be defined at `i-1` and `i`.
/// Up: prior `line <= signal`, now strictly above.  Down: symmetric.
fn detect_crossings(
    line: &[Option<f64>],
    signal: &[Option<f64>],
) -> (Vec<bool>, Vec<bool>) {
    let n = line.len();
    let mut cross_up = vec![false; n];
    let mut cross_down = vec![false; n];

    for i in 1..n {
        if let (Some(l_prev), Some(s_prev), Some(l), Some(s)) =
            (line[i - 1], signal[i - 1], line[i], signal[i])
        {
            if l_prev <= s_prev && l > s {
                cross_up[i] = true;
            }
            if l_prev >= s_prev && l < s {
                cross_down[i] = true;
            }
        }
    }

    (cross_up, cross_down)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_empty_input() {
        let out = calculate_macd(&[], 12, 26, 9);
        assert!(out.line.is_empty());
        assert!(out.signal.is_empty());
        assert!(out.histogram.is_empty());
        assert!(out.cross_up.is_empty());
        assert!(out.cross_down.is_empty());
    }

    #[test]
    fn macd_series_aligned_to_input() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let out = calculate_macd(&closes, 12, 26, 9);
        assert_eq!(out.line.len(), 60);
        assert_eq!(out.signal.len(), 60);
        assert_eq!(out.histogram.len(), 60);
        assert_eq!(out.cross_up.len(), 60);
        assert_eq!(out.cross_down.len(), 60);
    }

    #[test]
    fn macd_line_defined_from_slow_warmup() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let out = calculate_macd(&closes, 12, 26, 9);
        assert!(out.line[..25].iter().all(|v| v.is_none()));
        assert!(out.line[25..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn macd_signal_warmup_shortened_by_zero_fill() {
        // The zero-fill seeding policy makes the signal line defined from
        // signal_period - 1, well before the MACD line itself.
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let out = calculate_macd(&closes, 12, 26, 9);
        assert!(out.signal[..8].iter().all(|v| v.is_none()));
        assert!(out.signal[8..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.2).sin() * 5.0)
            .collect();
        let out = calculate_macd(&closes, 12, 26, 9);
        for i in 0..closes.len() {
            match (out.line[i], out.signal[i], out.histogram[i]) {
                (Some(l), Some(s), Some(h)) => {
                    assert!((h - (l - s)).abs() < 1e-12);
                }
                (Some(_), Some(_), None) => panic!("histogram undefined at {i} despite operands"),
                (_, _, Some(_)) => panic!("histogram defined at {i} without both operands"),
                _ => {}
            }
        }
    }

    #[test]
    fn macd_flat_series_zero_histogram_no_crossings() {
        // Flat closes: both EMAs equal the price, line == 0, signal == 0 once
        // warmed up, histogram == 0 everywhere defined, and a constant tie
        // never produces a strict break.
        let closes = vec![100.0; 60];
        let out = calculate_macd(&closes, 12, 26, 9);
        for v in out.line.iter().flatten() {
            assert!(v.abs() < 1e-9);
        }
        for v in out.histogram.iter().flatten() {
            assert!(v.abs() < 1e-9);
        }
        assert!(out.cross_up.iter().all(|&c| !c));
        assert!(out.cross_down.iter().all(|&c| !c));
    }

    #[test]
    fn crossings_never_simultaneous() {
        // A choppy series with plenty of direction changes.
        let closes: Vec<f64> = (0..200)
            .map(|i| 100.0 + (i as f64 * 0.37).sin() * 8.0 + (i as f64 * 0.11).cos() * 3.0)
            .collect();
        let out = calculate_macd(&closes, 12, 26, 9);
        for i in 0..closes.len() {
            assert!(
                !(out.cross_up[i] && out.cross_down[i]),
                "both crossings set at {i}"
            );
        }
    }

    #[test]
    fn crossings_require_defined_operands() {
        let closes: Vec<f64> = (0..200)
            .map(|i| 100.0 + (i as f64 * 0.37).sin() * 8.0)
            .collect();
        let out = calculate_macd(&closes, 12, 26, 9);
        for i in 0..closes.len() {
            let operands_defined = i >= 1
                && out.line[i - 1].is_some()
                && out.signal[i - 1].is_some()
                && out.line[i].is_some()
                && out.signal[i].is_some();
            if !operands_defined {
                assert!(!out.cross_up[i] && !out.cross_down[i], "crossing at {i} without operands");
            }
        }
    }

    #[test]
    fn tie_then_break_triggers_single_up_edge() {
        // Hand-crafted series: a flat tie (line == signal) followed by a
        // strict break upward must mark exactly one cross_up.
        let line = vec![Some(0.0), Some(0.0), Some(1.0), Some(2.0)];
        let signal = vec![Some(0.0), Some(0.0), Some(0.5), Some(1.5)];
        let (up, down) = detect_crossings(&line, &signal);
        assert_eq!(up, vec![false, false, true, false]);
        assert!(down.iter().all(|&c| !c));
    }

    #[test]
    fn strict_touch_without_break_is_no_crossing() {
        // Dropping to equality (not strictly below) is not a down-cross, and
        // returning above from equality is an up-cross.
        let line = vec![Some(1.0), Some(0.5), Some(1.0)];
        let signal = vec![Some(0.5), Some(0.5), Some(0.5)];
        let (up, down) = detect_crossings(&line, &signal);
        assert_eq!(down, vec![false, false, false]);
        assert_eq!(up, vec![false, false, true]);
    }

    #[test]
    fn down_crossing_detected() {
        let line = vec![Some(2.0), Some(1.0), Some(0.0)];
        let signal = vec![Some(1.0), Some(1.0), Some(1.0)];
        let (up, down) = detect_crossings(&line, &signal);
        assert!(up.iter().all(|&c| !c));
        assert_eq!(down, vec![false, false, true]);
    }

    #[test]
    fn undefined_gap_blocks_crossing() {
        let line = vec![Some(-1.0), None, Some(1.0)];
        let signal = vec![Some(0.0), Some(0.0), Some(0.0)];
        let (up, down) = detect_crossings(&line, &signal);
        assert!(up.iter().all(|&c| !c));
        assert!(down.iter().all(|&c| !c));
    }
}
