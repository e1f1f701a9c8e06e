//! Open-Meteo feed adapter.
//!
//! Uses the free Open-Meteo API (no key required) for short-horizon
//! daily forecasts anywhere on the globe.
//!
//! API: `https://api.open-meteo.com/v1/forecast`
//! Auth: None required (an API key env var can be configured for the
//! commercial tier).
//! Rate limit: Generous (free tier).

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::WeatherFeed;
use crate::types::{ForecastError, Location, Observation};

// ---------------------------------------------------------------------------
// Open-Meteo response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    #[serde(default)]
    daily: Option<OpenMeteoDaily>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoDaily {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    precipitation_sum: Vec<f64>,
    #[serde(default)]
    relative_humidity_2m_mean: Vec<f64>,
    #[serde(default)]
    wind_speed_10m_max: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

pub struct OpenMeteoFeed {
    http: Client,
    base_url: String,
    api_key: Option<Secret<String>>,
}

impl OpenMeteoFeed {
    pub fn new(
        base_url: String,
        timeout: Duration,
        api_key: Option<Secret<String>>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("STORMCAST/0.1.0")
            .build()
            .context("Failed to build weather HTTP client")?;
        Ok(Self { http, base_url, api_key })
    }

    fn unavailable(&self, message: String) -> ForecastError {
        ForecastError::UpstreamUnavailable {
            feed: self.source_name().to_string(),
            message,
        }
    }

    /// Normalize one day of the daily response into an `Observation`.
    ///
    /// Open-Meteo carries no radiation or specific-humidity series in
    /// this endpoint; both are imputed with the documented constants the
    /// predictor was trained with. Wind arrives in km/h and is converted
    /// to m/s.
    fn observation_at(daily: &OpenMeteoDaily, index: usize) -> Option<Observation> {
        let temp_max = daily.temperature_2m_max.get(index).copied()?;
        let temp_min = daily.temperature_2m_min.get(index).copied()?;
        let precipitation = daily.precipitation_sum.get(index).copied()?;
        let humidity = daily.relative_humidity_2m_mean.get(index).copied()?;
        let wind_kmh = daily.wind_speed_10m_max.get(index).copied()?;

        Some(Observation {
            temperature: (temp_max + temp_min) / 2.0,
            temp_min,
            temp_max,
            precipitation,
            humidity,
            wind_speed: wind_kmh / 3.6,
            specific_humidity: Observation::approx_specific_humidity(humidity),
            radiation: Observation::DEFAULT_RADIATION,
        })
    }
}

#[async_trait]
impl WeatherFeed for OpenMeteoFeed {
    async fn fetch(
        &self,
        location: &Location,
        date: NaiveDate,
    ) -> Result<Observation, ForecastError> {
        let day = date.format("%Y-%m-%d").to_string();
        let mut url = format!(
            "{}?latitude={}&longitude={}\
             &daily=temperature_2m_max,temperature_2m_min,precipitation_sum,\
             relative_humidity_2m_mean,wind_speed_10m_max\
             &start_date={day}&end_date={day}&timezone=UTC",
            self.base_url, location.latitude, location.longitude,
        );
        if let Some(key) = &self.api_key {
            url.push_str(&format!("&apikey={}", key.expose_secret()));
        }

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.unavailable(format!("request for {day} failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(self.unavailable(format!("API returned {status} for {day}")));
        }

        let data: OpenMeteoResponse = resp
            .json()
            .await
            .map_err(|e| self.unavailable(format!("bad response for {day}: {e}")))?;

        let daily = data
            .daily
            .ok_or_else(|| self.unavailable(format!("no daily block for {day}")))?;

        let index = daily
            .time
            .iter()
            .position(|t| t == &day)
            .ok_or_else(|| self.unavailable(format!("no data for {day}")))?;

        let observation = Self::observation_at(&daily, index)
            .ok_or_else(|| self.unavailable(format!("incomplete data for {day}")))?;

        debug!(%location, date = %day, temp = observation.temperature, "Observation fetched");
        Ok(observation)
    }

    fn source_name(&self) -> &str {
        "open-meteo"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
