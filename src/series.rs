// =============================================================================
// Aligned-series utilities
// =============================================================================
//
// Every indicator in the engine returns a series of the same length as its
// input, where each element is `Some(value)` once the warmup window is
// complete and `None` before that.  `None` is the only "not yet computable"
// marker — indicators never pad with zero.

/// An all-undefined series of the given length.
pub fn undefined(len: usize) -> Vec<Option<f64>> {
    vec![None; len]
}

/// The most recent defined value of a series, if any.
pub fn last_defined(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().find_map(|v| *v)
}

/// Seeding policy: replace every undefined element with 0.0.
///
/// Used in exactly one place — seeding the MACD signal-line EMA over the MACD
/// line, whose leading elements are undefined.  The zeros shorten the signal
/// line's effective warmup (it becomes defined from `signal_period - 1`
/// instead of waiting out the slow EMA warmup).  Crossover detection still
/// requires the MACD line itself to be defined, so the zero-seeded prefix
/// never produces a crossing on its own.
pub fn undefined_as_zero(series: &[Option<f64>]) -> Vec<f64> {
    series.iter().map(|v| v.unwrap_or(0.0)).collect()
}
