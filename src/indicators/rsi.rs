// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Accumulate gains/losses from the first `period` deltas.
// Step 2 — At index `period`, seed the averages with their plain means and
//          emit the first defined value.
// Step 3 — Apply Wilder's exponential smoothing afterwards:
//            avg_gain = (prev_avg_gain * (period - 1) + gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Zero-loss rule: avg_loss == 0 yields exactly 100, including the flat-market
// case where avg_gain is also zero.  Defined values are bounded to [0, 100].

use crate::series;

/// Internal smoothing state.
enum Phase {
    /// Accumulating gain/loss sums over the first `period` deltas.
    Seeding {
        gain_sum: f64,
        loss_sum: f64,
        count: usize,
    },
    /// Wilder recursion from the previous averages.
    Smoothing { avg_gain: f64, avg_loss: f64 },
}

/// Compute the RSI series for the given `closes` and `period`.
///
/// The output is aligned to the input: undefined for `i < period` (one delta
/// per bar starting at index 1, `period` deltas needed), defined from
/// `i == period` onward.
///
/// # Edge cases
/// - `period == 0` => all-undefined series
/// - `closes.len() < period + 1` => all-undefined series
/// - `avg_loss == 0` => exactly 100 (zero-loss rule)
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = series::undefined(closes.len());
    if period == 0 {
        return out;
    }

    let period_f = period as f64;
    let mut phase = Phase::Seeding {
        gain_sum: 0.0,
        loss_sum: 0.0,
        count: 0,
    };

    for i in 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        phase = match phase {
            Phase::Seeding {
                gain_sum,
                loss_sum,
                count,
            } => {
                let gain_sum = gain_sum + gain;
                let loss_sum = loss_sum + loss;
                let count = count + 1;
                if count == period {
                    let avg_gain = gain_sum / period_f;
                    let avg_loss = loss_sum / period_f;
                    out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
                    Phase::Smoothing { avg_gain, avg_loss }
                } else {
                    Phase::Seeding {
                        gain_sum,
                        loss_sum,
                        count,
                    }
                }
            }
            Phase::Smoothing { avg_gain, avg_loss } => {
                let avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
                let avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
                out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
                Phase::Smoothing { avg_gain, avg_loss }
            }
        };
    }

    out
}

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// Zero average loss forces exactly 100 — there is no separate flat-market
/// case: no losses means maximum relative strength by convention.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
