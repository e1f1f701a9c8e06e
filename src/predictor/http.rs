//! HTTP adapter for the anomaly model server.
//!
//! Posts the 18-element feature vector to a model-serving endpoint and
//! parses the two anomaly scalars from the response. Timeouts are
//! bounded by configuration; every failure mode (transport, status,
//! shape) is surfaced as a distinguishable `PredictorFailure`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::AnomalyPredictor;
use crate::features::FeatureVector;
use crate::types::{AnomalyPair, ForecastError};

#[derive(Debug, Serialize)]
struct InferRequest<'a> {
    features: &'a [f64],
}

#[derive(Debug, Deserialize)]
struct InferResponse {
    /// [temperature_anomaly, precipitation_anomaly]
    outputs: Vec<f64>,
}

/// Client for a model-serving process exposing `POST <endpoint>`.
pub struct HttpPredictor {
    http: Client,
    endpoint: String,
    name: String,
}

impl HttpPredictor {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("STORMCAST/0.1.0")
            .build()
            .context("Failed to build predictor HTTP client")?;
        let name = format!("anomaly-model@{endpoint}");
        Ok(Self { http, endpoint, name })
    }

    fn parse_outputs(resp: InferResponse) -> Result<AnomalyPair, ForecastError> {
        if resp.outputs.len() != 2 {
            return Err(ForecastError::PredictorFailure(format!(
                "expected 2 anomaly outputs, got {}",
                resp.outputs.len()
            )));
        }
        let pair = AnomalyPair {
            temperature_anomaly: resp.outputs[0],
            precipitation_anomaly: resp.outputs[1],
        };
        if !pair.temperature_anomaly.is_finite() || !pair.precipitation_anomaly.is_finite() {
            return Err(ForecastError::PredictorFailure(
                "model returned non-finite anomaly".to_string(),
            ));
        }
        Ok(pair)
    }
}

#[async_trait]
impl AnomalyPredictor for HttpPredictor {
    async fn infer(&self, features: &FeatureVector) -> Result<AnomalyPair, ForecastError> {
        let body = InferRequest { features: features.as_slice() };

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForecastError::PredictorFailure(format!("inference call failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(ForecastError::PredictorFailure(format!(
                "model server returned {status}"
            )));
        }

        let parsed: InferResponse = resp
            .json()
            .await
            .map_err(|e| ForecastError::PredictorFailure(format!("bad inference response: {e}")))?;

        let pair = Self::parse_outputs(parsed)?;
        debug!(anomalies = %pair, "Inference complete");
        Ok(pair)
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_outputs_ok() {
        let pair = HttpPredictor::parse_outputs(InferResponse { outputs: vec![0.4, -0.1] }).unwrap();
        assert!((pair.temperature_anomaly - 0.4).abs() < 1e-10);
        assert!((pair.precipitation_anomaly - (-0.1)).abs() < 1e-10);
    }

    #[test]
    fn test_parse_outputs_wrong_shape() {
        let err = HttpPredictor::parse_outputs(InferResponse { outputs: vec![0.4] }).unwrap_err();
        assert!(matches!(err, ForecastError::PredictorFailure(_)));
        assert!(format!("{err}").contains("got 1"));

        let err = HttpPredictor::parse_outputs(InferResponse { outputs: vec![0.1, 0.2, 0.3] })
            .unwrap_err();
        assert!(matches!(err, ForecastError::PredictorFailure(_)));
    }

    #[test]
    fn test_parse_outputs_non_finite() {
        let err = HttpPredictor::parse_outputs(InferResponse { outputs: vec![f64::NAN, 0.0] })
            .unwrap_err();
        assert!(matches!(err, ForecastError::PredictorFailure(_)));
    }

    #[test]
    fn test_model_name_includes_endpoint() {
        let p = HttpPredictor::new(
            "http://127.0.0.1:8501/v1/infer".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(p.model_name().contains("8501"));
    }

    #[test]
    fn test_request_body_shape() {
        let features = FeatureVector::from_slice(&[1.0; 18]).unwrap();
        let body = InferRequest { features: features.as_slice() };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["features"].as_array().unwrap().len(), 18);
    }
}
