//! Anomaly predictor integration.
//!
//! Defines the `AnomalyPredictor` trait and the HTTP adapter over the
//! model-serving process. The predictor is consumed as an opaque
//! deterministic function from a fixed-size feature vector to two
//! anomaly scalars — its internals are irrelevant to the pipeline.

pub mod http;

use async_trait::async_trait;

use crate::features::FeatureVector;
use crate::types::{AnomalyPair, ForecastError};

/// Abstraction over the pretrained anomaly model.
///
/// Contract: pure function of the feature vector, no observable side
/// effects, safe to invoke concurrently across requests. An inference
/// failure surfaces as `ForecastError::PredictorFailure` — implementors
/// never fabricate an anomaly pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnomalyPredictor: Send + Sync {
    /// Run inference on one feature vector.
    async fn infer(&self, features: &FeatureVector) -> Result<AnomalyPair, ForecastError>;

    /// Model identifier string (for health reporting and logs).
    fn model_name(&self) -> &str;
}
