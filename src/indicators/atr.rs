// =============================================================================
// Average True Range (ATR) — Wilder's Smoothing Method
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR):
//   TR_0 = H_0 - L_0                       (no previous close on the first bar)
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is then the smoothed average of TR using Wilder's method:
//   seed (at index period-1) = plain mean of TR_0 .. TR_{period-1}
//   ATR_t = (ATR_{t-1} * (period - 1) + TR_t) / period
//
// TR is non-negative for valid bars, so every defined ATR value is >= 0.

use crate::market_data::Bar;
use crate::series;

/// Internal smoothing state.
enum Phase {
    /// Accumulating the TR mean over the first `period` bars.
    Seeding { sum: f64, count: usize },
    /// Wilder recursion from the previous average.
    Smoothing { prev: f64 },
}

/// Compute the ATR series for the given `bars` and look-back `period`.
///
/// The output is aligned to the input: undefined for `i < period - 1` and
/// defined from the seed index onward.
///
/// # Edge cases
/// - `period == 0` => all-undefined series
/// - `bars.len() < period` => all-undefined series
pub fn calculate_atr(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let mut out = series::undefined(bars.len());
    if period == 0 {
        return out;
    }

    let period_f = period as f64;
    let mut phase = Phase::Seeding { sum: 0.0, count: 0 };

    for i in 0..bars.len() {
        let tr = true_range(bars, i);

        phase = match phase {
            Phase::Seeding { sum, count } => {
                let sum = sum + tr;
                let count = count + 1;
                if count == period {
                    let seed = sum / period_f;
                    out[i] = Some(seed);
                    Phase::Smoothing { prev: seed }
                } else {
                    Phase::Seeding { sum, count }
                }
            }
            Phase::Smoothing { prev } => {
                let atr = (prev * (period_f - 1.0) + tr) / period_f;
                out[i] = Some(atr);
                Phase::Smoothing { prev: atr }
            }
        };
    }

    out
}

/// True range of bar `i`.  The first bar has no previous close, so its range
/// collapses to high - low.
fn true_range(bars: &[Bar], i: usize) -> f64 {
    let bar = &bars[i];
    if i == 0 {
        return bar.high - bar.low;
    }
    let prev_close = bars[i - 1].close;
    (bar.high - bar.low)
        .max((bar.high - prev_close).abs())
        .max((bar.low - prev_close).abs())
}
