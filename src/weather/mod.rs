//! Short-horizon weather feed integration.
//!
//! Defines the `WeatherFeed` trait wrapping the external live-weather
//! feed. The pipeline only consumes its normalized `Observation` output;
//! transport details stay inside the adapter.

pub mod openmeteo;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::{ForecastError, Location, Observation};

/// Abstraction over the live weather feed used for the first days of
/// the horizon.
///
/// A feed that cannot produce a complete observation for the requested
/// date fails with `UpstreamUnavailable` — it never hands back partial
/// data, and the orchestrator never papers over the failure with
/// climate-pattern values.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherFeed: Send + Sync {
    /// Fetch the normalized observation for a location and date.
    async fn fetch(
        &self,
        location: &Location,
        date: NaiveDate,
    ) -> Result<Observation, ForecastError>;

    /// Feed identifier string (for health reporting and error context).
    fn source_name(&self) -> &str;
}
