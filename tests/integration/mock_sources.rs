//! Mock external collaborators for integration testing.
//!
//! Provides deterministic `WeatherFeed` and `AnomalyPredictor`
//! implementations with known outputs, invocation counters, and a
//! force-error switch — all in-memory with no external dependencies.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use stormcast::features::FeatureVector;
use stormcast::types::{AnomalyPair, ForecastError, Location, Observation};
use stormcast::weather::WeatherFeed;
use stormcast::predictor::AnomalyPredictor;

// ---------------------------------------------------------------------------
// Weather feed
// ---------------------------------------------------------------------------

/// A deterministic weather feed: observation values are a pure function
/// of the requested date, so repeated runs produce identical forecasts.
pub struct MockFeed {
    pub calls: AtomicUsize,
    base: Observation,
    force_error: Mutex<Option<String>>,
}

impl MockFeed {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            base: mild_observation(),
            force_error: Mutex::new(None),
        }
    }

    pub fn with_base(base: Observation) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            base,
            force_error: Mutex::new(None),
        }
    }

    /// Force all subsequent fetches to fail.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherFeed for MockFeed {
    async fn fetch(
        &self,
        _location: &Location,
        date: NaiveDate,
    ) -> Result<Observation, ForecastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(ForecastError::UpstreamUnavailable {
                feed: "mock-feed".to_string(),
                message: msg,
            });
        }

        // Small day-of-month drift keeps entries distinct but repeatable.
        let drift = (date.day() % 5) as f64 * 0.5;
        Ok(Observation {
            temperature: self.base.temperature + drift,
            temp_min: self.base.temp_min + drift,
            temp_max: self.base.temp_max + drift,
            ..self.base
        })
    }

    fn source_name(&self) -> &str {
        "mock-feed"
    }
}

// ---------------------------------------------------------------------------
// Anomaly predictor
// ---------------------------------------------------------------------------

/// A deterministic predictor returning a fixed anomaly pair.
pub struct MockPredictor {
    pub calls: AtomicUsize,
    output: AnomalyPair,
    force_error: Mutex<Option<String>>,
}

impl MockPredictor {
    pub fn new(output: AnomalyPair) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            output,
            force_error: Mutex::new(None),
        }
    }

    pub fn neutral() -> Self {
        Self::new(AnomalyPair::NEUTRAL)
    }

    /// Force all subsequent inferences to fail.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnomalyPredictor for MockPredictor {
    async fn infer(&self, _features: &FeatureVector) -> Result<AnomalyPair, ForecastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(ForecastError::PredictorFailure(msg));
        }
        Ok(self.output)
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn mild_observation() -> Observation {
    Observation {
        temperature: 22.0,
        temp_min: 17.0,
        temp_max: 27.0,
        precipitation: 3.0,
        humidity: 55.0,
        wind_speed: 4.0,
        specific_humidity: 5.5,
        radiation: 200.0,
    }
}

pub fn heatwave_observation() -> Observation {
    Observation {
        temperature: 44.0,
        temp_min: 33.0,
        temp_max: 49.0,
        precipitation: 0.0,
        humidity: 20.0,
        wind_speed: 6.0,
        specific_humidity: 2.0,
        radiation: 320.0,
    }
}
