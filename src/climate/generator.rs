//! Long-horizon climate forecast generation.
//!
//! Produces one forecast entry per calendar month from the Climate
//! Normals Store. Climate-pattern months never invoke the anomaly
//! predictor: the normal's aggregate values flow straight through the
//! probability converter and risk classifier with neutral anomalies.

use chrono::NaiveDate;
use std::f64::consts::PI;
use std::sync::Arc;

use super::{ClimateNormal, ClimateStore};
use crate::types::{
    AnomalyPair, DataSource, EntryPeriod, ForecastEntry, Observation, Region,
};
use crate::{probability, risk};

/// Confidence attached to entries derived from a matched continent table.
const CONTINENT_CONFIDENCE: f64 = 0.75;
/// Confidence attached to entries derived from the hemisphere fallback.
const HEMISPHERE_CONFIDENCE: f64 = 0.60;

/// Amplitude of the within-month chart swing relative to (max - avg).
const CHART_SWING: f64 = 0.3;

pub struct LongHorizonGenerator {
    store: Arc<ClimateStore>,
}

impl LongHorizonGenerator {
    pub fn new(store: Arc<ClimateStore>) -> Self {
        Self { store }
    }

    /// Generate one entry per (year, month), in the order given.
    pub fn generate(&self, region: &Region, months: &[(i32, u32)]) -> Vec<ForecastEntry> {
        months
            .iter()
            .map(|&(year, month)| self.entry_for(region, year, month))
            .collect()
    }

    fn entry_for(&self, region: &Region, year: i32, month: u32) -> ForecastEntry {
        let normal = self.store.lookup(region.scope(), month);
        let observation = observation_from_normal(normal);

        let predictions = probability::convert(AnomalyPair::NEUTRAL, &observation);
        let risk_level = risk::classify(&predictions);
        let chart = temperature_chart(normal, days_in_month(year, month));

        let confidence = if region.resolved {
            CONTINENT_CONFIDENCE
        } else {
            HEMISPHERE_CONFIDENCE
        };

        ForecastEntry {
            period: EntryPeriod::Month { year, month },
            predictions,
            risk_level,
            data_source: DataSource::ClimatePattern {
                continent: region.continent,
                fallback: !region.resolved,
            },
            confidence,
            temperature_chart: Some(chart),
        }
    }
}

/// Treat a monthly normal as a synthetic observation for the converter.
fn observation_from_normal(normal: &ClimateNormal) -> Observation {
    Observation {
        temperature: normal.temperature.avg,
        temp_min: normal.temperature.min,
        temp_max: normal.temperature.max,
        precipitation: normal.precipitation_avg,
        humidity: normal.humidity_avg,
        wind_speed: normal.wind_avg,
        specific_humidity: Observation::approx_specific_humidity(normal.humidity_avg),
        radiation: Observation::DEFAULT_RADIATION,
    }
}

/// Deterministic daily temperature pattern for a month: a gentle sine
/// swing around the monthly average, clamped to [min, max], one decimal
/// per sample.
fn temperature_chart(normal: &ClimateNormal, days: u32) -> Vec<f64> {
    let avg = normal.temperature.avg;
    let min = normal.temperature.min;
    let max = normal.temperature.max;

    (0..days)
        .map(|day| {
            let fraction = day as f64 / days as f64;
            let swing = (fraction * 2.0 * PI).sin() * (max - avg) * CHART_SWING;
            let temp = (avg + swing).clamp(min, max);
            (temp * 10.0).round() / 10.0
        })
        .collect()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid month");
    (next - first).num_days() as u32
}
