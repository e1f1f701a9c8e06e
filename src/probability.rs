//! Anomaly-to-probability conversion.
//!
//! Deterministic numeric transform from predicted anomalies plus a raw
//! observation into the five bounded extreme-weather probabilities.
//! Every output is clamped into [0.0, 1.0] as the final step,
//! unconditionally.

use crate::types::{AnomalyPair, Observation, ProbabilitySet};

// Thresholds and slopes calibrated against the trained predictor.
const HOT_THRESHOLD_C: f64 = 35.0;
const HOT_SCALE_C: f64 = 15.0;
const COLD_THRESHOLD_C: f64 = 5.0;
const COLD_SCALE_C: f64 = 15.0;
const WINDY_THRESHOLD_MS: f64 = 20.0;
const WINDY_SCALE_MS: f64 = 30.0;
const WET_THRESHOLD_MM: f64 = 50.0;
const WET_SCALE_MM: f64 = 200.0;
const HEAT_INDEX_THRESHOLD: f64 = 40.0;
const HEAT_INDEX_SCALE: f64 = 20.0;
const SIGNIFICANT_TEMP_ANOMALY: f64 = 0.3;
const SIGNIFICANT_PRECIP_ANOMALY: f64 = 0.5;

/// Heat index combining temperature [°C] and relative humidity [%].
/// Same formula the predictor's training features used.
pub fn heat_index(temperature: f64, humidity: f64) -> f64 {
    temperature
        + 0.5 * (temperature + 61.0 + (temperature - 68.0) * 1.2 + humidity * 0.094)
}

/// Convert an anomaly pair and a raw observation into the five
/// extreme-weather probabilities.
///
/// Pure and deterministic: identical inputs always yield an identical
/// set. `very_hot` rises with the adjusted temperature and positive
/// temperature anomaly; `very_cold` mirrors it at the low end, so the
/// two are anti-correlated for any single input.
pub fn convert(anomalies: AnomalyPair, observation: &Observation) -> ProbabilitySet {
    let adjusted_temp = observation.temperature + anomalies.temperature_anomaly;
    let adjusted_precip =
        observation.precipitation * (1.0 + anomalies.precipitation_anomaly);

    ProbabilitySet::clamped(
        hot_probability(adjusted_temp, anomalies.temperature_anomaly),
        cold_probability(adjusted_temp, anomalies.temperature_anomaly),
        windy_probability(observation.wind_speed),
        wet_probability(adjusted_precip, anomalies.precipitation_anomaly),
        discomfort_probability(adjusted_temp, observation.humidity),
    )
}

fn hot_probability(temp: f64, anomaly: f64) -> f64 {
    let mut prob = 0.0;
    if temp > HOT_THRESHOLD_C {
        prob = ((temp - HOT_THRESHOLD_C) / HOT_SCALE_C).min(1.0);
    }
    if anomaly > SIGNIFICANT_TEMP_ANOMALY {
        prob += anomaly.min(0.3);
    }
    prob
}

fn cold_probability(temp: f64, anomaly: f64) -> f64 {
    let mut prob = 0.0;
    if temp < COLD_THRESHOLD_C {
        prob = ((COLD_THRESHOLD_C - temp) / COLD_SCALE_C).min(1.0);
    }
    if anomaly < -SIGNIFICANT_TEMP_ANOMALY {
        prob += anomaly.abs().min(0.3);
    }
    prob
}

/// Wind is observed, not modelled — the predictor outputs no wind anomaly.
fn windy_probability(wind_speed: f64) -> f64 {
    if wind_speed > WINDY_THRESHOLD_MS {
        ((wind_speed - WINDY_THRESHOLD_MS) / WINDY_SCALE_MS).min(1.0)
    } else {
        0.0
    }
}

fn wet_probability(precip: f64, anomaly: f64) -> f64 {
    let mut prob = 0.0;
    if precip > WET_THRESHOLD_MM {
        prob = (precip / WET_SCALE_MM).min(1.0);
    }
    if anomaly > SIGNIFICANT_PRECIP_ANOMALY {
        prob += (anomaly * 0.5).min(0.4);
    }
    prob
}

fn discomfort_probability(temp: f64, humidity: f64) -> f64 {
    let hi = heat_index(temp, humidity);
    let mut prob = 0.0;
    if hi > HEAT_INDEX_THRESHOLD {
        prob = ((hi - HEAT_INDEX_THRESHOLD) / HEAT_INDEX_SCALE).min(1.0);
    }
    if temp > 30.0 && humidity > 70.0 {
        prob += 0.3;
    }
    prob
}
