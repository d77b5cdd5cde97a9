//! Rule-Based Fallback Pricing
//!
//! Provides a heuristic price estimate when no trained model artifact is
//! available.

mod rules;

pub use rules::{HeuristicConfig, HeuristicEstimator};
