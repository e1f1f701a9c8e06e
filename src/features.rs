//! Feature vector assembly for the anomaly predictor.
//!
//! Builds the fixed 18-element numeric vector the pretrained model was
//! trained on, from a raw observation, the target date, and the
//! location. Missing or non-finite inputs fail validation here — a
//! malformed vector never reaches the predictor adapter.

use chrono::{Datelike, NaiveDate};
use std::f64::consts::PI;

use crate::probability::heat_index;
use crate::types::{ForecastError, Location, Observation};

/// Latitude normalization divisor fixed at training time.
pub const LAT_SCALE: f64 = 90.0;
/// Longitude normalization divisor fixed at training time.
pub const LON_SCALE: f64 = 180.0;

/// The fixed-length, ordered feature vector consumed by the predictor.
///
/// Length is always exactly [`FeatureVector::LEN`]; a different width
/// cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FeatureVector::LEN]);

impl FeatureVector {
    pub const LEN: usize = 18;

    /// Build a vector from a slice, rejecting any other length or any
    /// non-finite element.
    pub fn from_slice(values: &[f64]) -> Result<Self, ForecastError> {
        let array: [f64; Self::LEN] = values.try_into().map_err(|_| {
            ForecastError::Validation(format!(
                "feature vector must have exactly {} elements, got {}",
                Self::LEN,
                values.len()
            ))
        })?;
        if let Some(bad) = array.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::Validation(format!(
                "feature vector contains non-finite value: {bad}"
            )));
        }
        Ok(Self(array))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Assemble the feature vector for one observation.
///
/// Order (fixed by the trained model):
/// mean/max/min temperature, log-precipitation, radiation, relative
/// humidity, specific humidity, temperature range, month sin/cos,
/// season, scaled latitude/longitude, scaled log-precipitation, wind
/// speed, temperature×humidity, wind×precipitation, heat index.
pub fn build(
    observation: &Observation,
    date: NaiveDate,
    location: &Location,
) -> Result<FeatureVector, ForecastError> {
    if !observation.is_finite() {
        return Err(ForecastError::Validation(format!(
            "observation for {date} contains missing or non-finite fields"
        )));
    }
    if observation.precipitation < 0.0 {
        return Err(ForecastError::Validation(format!(
            "negative precipitation for {date}: {}",
            observation.precipitation
        )));
    }

    let month = date.month();
    let month_angle = 2.0 * PI * month as f64 / 12.0;
    let precip_log = observation.precipitation.ln_1p();

    FeatureVector::from_slice(&[
        observation.temperature,
        observation.temp_max,
        observation.temp_min,
        precip_log,
        observation.radiation,
        observation.humidity,
        observation.specific_humidity,
        observation.temp_range(),
        month_angle.sin(),
        month_angle.cos(),
        season_of(month) as f64,
        location.latitude / LAT_SCALE,
        location.longitude / LON_SCALE,
        precip_log,
        observation.wind_speed,
        observation.temperature * observation.humidity,
        observation.wind_speed * observation.precipitation,
        heat_index(observation.temperature, observation.humidity),
    ])
}

/// Four-way season encoding: Dec–Feb → 1, Mar–May → 2, Jun–Aug → 3,
/// Sep–Nov → 4.
fn season_of(month: u32) -> u32 {
    (month % 12 + 3) / 3
}
