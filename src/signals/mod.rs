// =============================================================================
// Signals Module
// =============================================================================
//
// Rule-based derivation of discrete buy/sell events from the indicator
// pipeline outputs.

pub mod generator;

pub use generator::generate_signals;
