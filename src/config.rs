//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (API keys) are referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use secrecy::Secret;
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub climate: ClimateConfig,
    pub weather_api: WeatherApiConfig,
    pub predictor: PredictorConfig,
    pub forecast: ForecastConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClimateConfig {
    /// Directory containing `continents/` and `hemispheres/` normal files.
    pub data_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherApiConfig {
    /// Base URL of the live weather feed.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Env var holding the API key, for feeds that require one.
    #[serde(default)]
    pub api_key_env: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictorConfig {
    /// Inference endpoint of the model-serving process.
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Confidence attached to entries whose prediction carries no
    /// explicit confidence value.
    #[serde(default = "default_fallback_confidence")]
    pub fallback_confidence: f64,
}

fn default_fallback_confidence() -> f64 {
    0.74
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve an environment variable name to a secret value.
    /// Useful for loading API keys referenced in the config.
    pub fn resolve_secret(env_name: &str) -> Result<Secret<String>> {
        let value = std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))?;
        Ok(Secret::new(value))
    }
}
