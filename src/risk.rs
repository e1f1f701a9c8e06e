//! Risk classification.
//!
//! Maps a probability set to one ordinal risk level from the maximum
//! individual probability. Band lower bounds are closed: exactly 0.8 is
//! EXTREME, exactly 0.6 is HIGH.

use crate::types::{ProbabilitySet, RiskLevel};

/// Classification thresholds, highest band first.
const THRESHOLDS: &[(f64, RiskLevel)] = &[
    (0.8, RiskLevel::Extreme),
    (0.6, RiskLevel::High),
    (0.4, RiskLevel::Moderate),
    (0.2, RiskLevel::Low),
];

/// Classify a probability set into a risk level.
///
/// Pure and monotone in `max(probabilities)`: raising any single
/// probability never lowers the result.
pub fn classify(predictions: &ProbabilitySet) -> RiskLevel {
    let max_probability = predictions.max();
    for (threshold, level) in THRESHOLDS {
        if max_probability >= *threshold {
            return *level;
        }
    }
    RiskLevel::Minimal
}
