//! Hybrid forecast orchestration.
//!
//! The pipeline entry point: resolves the region once, partitions the
//! requested horizon at the fixed short/long boundary, dispatches the
//! short partition to the live weather feed + anomaly predictor and the
//! long partition to the climate-pattern generator, then merges both
//! ordered sequences into one provenance-tagged response.
//!
//! Failure of either branch fails the whole request — there is no
//! partial-success response, and climate data is never substituted for
//! a failed near-term fetch.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};

use crate::climate::generator::LongHorizonGenerator;
use crate::climate::ClimateStore;
use crate::features;
use crate::predictor::AnomalyPredictor;
use crate::region;
use crate::types::{
    DataSource, EntryPeriod, ForecastEntry, ForecastError, ForecastResponse, ForecastSummary,
    Location, Region,
};
use crate::weather::WeatherFeed;
use crate::{probability, risk};

/// Days of the horizon served by the live weather feed. A fixed design
/// constant, not request-configurable.
pub const SHORT_HORIZON_DAYS: u32 = 5;

const MAX_HORIZON_DAYS: u32 = 366;
const MAX_HORIZON_MONTHS: u32 = 12;

// ---------------------------------------------------------------------------
// Requests & partitions
// ---------------------------------------------------------------------------

/// Requested horizon length: day-granular or month-granular.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    Days(u32),
    Months(u32),
}

/// A validated forecast request.
#[derive(Debug, Clone)]
pub struct ForecastRequest {
    pub location: Location,
    pub location_name: Option<String>,
    pub start_date: NaiveDate,
    pub horizon: Horizon,
}

/// One partition of the horizon, routed to exactly one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HorizonPeriod {
    ShortHorizon { dates: Vec<NaiveDate> },
    LongHorizon { months: Vec<(i32, u32)> },
}

/// Split the horizon at the fixed day-count boundary: the first
/// [`SHORT_HORIZON_DAYS`] days route short, later days (grouped by
/// calendar month) route long.
pub fn partition(
    start_date: NaiveDate,
    horizon: Horizon,
) -> Result<Vec<HorizonPeriod>, ForecastError> {
    let (short_days, months) = match horizon {
        Horizon::Days(days) => {
            if days == 0 || days > MAX_HORIZON_DAYS {
                return Err(ForecastError::Validation(format!(
                    "horizon_days must be in 1..={MAX_HORIZON_DAYS}, got {days}"
                )));
            }
            let short_days = days.min(SHORT_HORIZON_DAYS);
            let mut months: Vec<(i32, u32)> = Vec::new();
            for offset in SHORT_HORIZON_DAYS..days {
                let date = start_date + Duration::days(offset as i64);
                let key = (date.year(), date.month());
                if months.last() != Some(&key) {
                    months.push(key);
                }
            }
            (short_days, months)
        }
        Horizon::Months(count) => {
            if count == 0 || count > MAX_HORIZON_MONTHS {
                return Err(ForecastError::Validation(format!(
                    "horizon_months must be in 1..={MAX_HORIZON_MONTHS}, got {count}"
                )));
            }
            let first_long = start_date + Duration::days(SHORT_HORIZON_DAYS as i64);
            let mut months = Vec::with_capacity(count as usize);
            let (mut year, mut month) = (first_long.year(), first_long.month());
            for _ in 0..count {
                months.push((year, month));
                if month == 12 {
                    year += 1;
                    month = 1;
                } else {
                    month += 1;
                }
            }
            (SHORT_HORIZON_DAYS, months)
        }
    };

    let dates: Vec<NaiveDate> = (0..short_days)
        .map(|offset| start_date + Duration::days(offset as i64))
        .collect();

    let mut periods = Vec::new();
    if !dates.is_empty() {
        periods.push(HorizonPeriod::ShortHorizon { dates });
    }
    if !months.is_empty() {
        periods.push(HorizonPeriod::LongHorizon { months });
    }
    Ok(periods)
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct HybridOrchestrator {
    generator: LongHorizonGenerator,
    feed: Arc<dyn WeatherFeed>,
    predictor: Arc<dyn AnomalyPredictor>,
    /// Confidence attached to entries whose prediction carries no
    /// explicit confidence value.
    fallback_confidence: f64,
}

impl HybridOrchestrator {
    pub fn new(
        store: Arc<ClimateStore>,
        feed: Arc<dyn WeatherFeed>,
        predictor: Arc<dyn AnomalyPredictor>,
        fallback_confidence: f64,
    ) -> Self {
        Self {
            generator: LongHorizonGenerator::new(store),
            feed,
            predictor,
            fallback_confidence,
        }
    }

    /// Run one forecast request end to end.
    pub async fn forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastResponse, ForecastError> {
        let region = region::resolve(&request.location);
        info!(
            location = %request.location,
            region = %region,
            resolved = region.resolved,
            "Region resolved"
        );

        let periods = partition(request.start_date, request.horizon)?;
        debug!(partitions = periods.len(), "Horizon partitioned");

        let mut short_dates: Vec<NaiveDate> = Vec::new();
        let mut long_months: Vec<(i32, u32)> = Vec::new();
        for period in periods {
            match period {
                HorizonPeriod::ShortHorizon { dates } => short_dates.extend(dates),
                HorizonPeriod::LongHorizon { months } => long_months.extend(months),
            }
        }

        // The short-branch fetches are the only suspension points; they
        // run concurrently with each other and with the long branch.
        // Dropping this future cancels everything outstanding.
        let short_branch = try_join_all(
            short_dates
                .iter()
                .map(|&date| self.short_entry(&request.location, date)),
        );
        let long_branch = async {
            Ok::<_, ForecastError>(self.generator.generate(&region, &long_months))
        };

        let (short_entries, long_entries) = tokio::try_join!(short_branch, long_branch)?;

        // Merge: each branch is internally chronological and the short
        // partition precedes the long one in horizon order.
        let mut forecast = short_entries;
        forecast.extend(long_entries);

        let summary = summarize(&forecast).ok_or_else(|| {
            ForecastError::Validation("horizon produced no forecast entries".to_string())
        })?;

        info!(
            entries = forecast.len(),
            highest = %summary.highest_risk_level,
            dominant = %summary.dominant_category,
            "Forecast assembled"
        );

        Ok(ForecastResponse {
            location: request.location,
            location_name: request.location_name.clone(),
            region,
            forecast,
            summary,
            generated_at: Utc::now(),
        })
    }

    /// One short-horizon day: fetch → features → inference → convert →
    /// classify.
    async fn short_entry(
        &self,
        location: &Location,
        date: NaiveDate,
    ) -> Result<ForecastEntry, ForecastError> {
        let observation = self.feed.fetch(location, date).await?;
        let features = features::build(&observation, date, location)?;
        let anomalies = self.predictor.infer(&features).await?;

        let predictions = probability::convert(anomalies, &observation);
        let risk_level = risk::classify(&predictions);

        debug!(date = %date, %anomalies, risk = %risk_level, "Short-horizon entry built");

        Ok(ForecastEntry {
            period: EntryPeriod::Date(date),
            predictions,
            risk_level,
            data_source: DataSource::WeatherApi,
            confidence: self.fallback_confidence,
            temperature_chart: None,
        })
    }
}

/// Pick the highest-risk entry (earliest period on ties) and its
/// dominant category.
pub(crate) fn summarize(entries: &[ForecastEntry]) -> Option<ForecastSummary> {
    let best = entries.iter().fold(None::<&ForecastEntry>, |best, entry| {
        match best {
            None => Some(entry),
            Some(current) => {
                let higher = entry.risk_level > current.risk_level;
                let tie_earlier = entry.risk_level == current.risk_level
                    && entry.period.first_day() < current.period.first_day();
                if higher || tie_earlier {
                    Some(entry)
                } else {
                    Some(current)
                }
            }
        }
    })?;

    Some(ForecastSummary {
        highest_risk_period: best.period,
        highest_risk_level: best.risk_level,
        dominant_category: best.predictions.dominant().to_string(),
    })
}

/// Resolve the region for a location without running a forecast.
pub fn resolve_region(location: &Location) -> Region {
    region::resolve(location)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
