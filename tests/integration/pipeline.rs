//! End-to-end pipeline tests over the mock sources.

use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;

use stormcast::climate::ClimateStore;
use stormcast::orchestrator::{ForecastRequest, Horizon, HybridOrchestrator};
use stormcast::types::{AnomalyPair, DataSource, ForecastError, Location, RiskLevel};

use super::mock_sources::{heatwave_observation, MockFeed, MockPredictor};

fn store() -> Arc<ClimateStore> {
    Arc::new(ClimateStore::load(Path::new("data")).unwrap())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn request(lat: f64, lon: f64, start: NaiveDate, horizon: Horizon) -> ForecastRequest {
    ForecastRequest {
        location: Location::new(lat, lon).unwrap(),
        location_name: None,
        start_date: start,
        horizon,
    }
}

#[tokio::test]
async fn ten_day_horizon_splits_five_and_rest() {
    let feed = Arc::new(MockFeed::new());
    let predictor = Arc::new(MockPredictor::neutral());
    let orchestrator = HybridOrchestrator::new(
        store(),
        Arc::clone(&feed) as _,
        Arc::clone(&predictor) as _,
        0.74,
    );

    let response = orchestrator
        .forecast(&request(19.076, 72.877, date(2025, 1, 1), Horizon::Days(10)))
        .await
        .unwrap();

    // First 5 entries come from the live feed, the rest from patterns.
    assert_eq!(response.forecast.len(), 6);
    for entry in &response.forecast[..5] {
        assert_eq!(entry.data_source, DataSource::WeatherApi);
    }
    for entry in &response.forecast[5..] {
        assert!(entry.data_source.to_string().starts_with("climate_pattern:"));
    }

    assert_eq!(feed.call_count(), 5);
    assert_eq!(predictor.call_count(), 5);
}

#[tokio::test]
async fn mumbai_resolves_to_asia_northern() {
    let orchestrator = HybridOrchestrator::new(
        store(),
        Arc::new(MockFeed::new()),
        Arc::new(MockPredictor::neutral()),
        0.74,
    );

    let response = orchestrator
        .forecast(&request(19.076, 72.877, date(2025, 1, 1), Horizon::Days(6)))
        .await
        .unwrap();

    assert_eq!(response.region.continent.as_str(), "asia");
    assert_eq!(response.region.hemisphere.as_str(), "northern");
    assert_eq!(
        response.forecast[5].data_source.to_string(),
        "climate_pattern:asia"
    );
}

#[tokio::test]
async fn identical_requests_produce_identical_forecasts() {
    let orchestrator = HybridOrchestrator::new(
        store(),
        Arc::new(MockFeed::new()),
        Arc::new(MockPredictor::new(AnomalyPair {
            temperature_anomaly: 0.4,
            precipitation_anomaly: -0.2,
        })),
        0.74,
    );

    let req = request(48.85, 2.35, date(2025, 3, 10), Horizon::Months(4));
    let first = orchestrator.forecast(&req).await.unwrap();
    let second = orchestrator.forecast(&req).await.unwrap();

    assert_eq!(first.forecast, second.forecast);
    assert_eq!(first.summary, second.summary);
}

#[tokio::test]
async fn climate_months_never_invoke_the_predictor() {
    let predictor = Arc::new(MockPredictor::neutral());
    let orchestrator = HybridOrchestrator::new(
        store(),
        Arc::new(MockFeed::new()),
        Arc::clone(&predictor) as _,
        0.74,
    );

    orchestrator
        .forecast(&request(-33.87, 151.21, date(2025, 6, 1), Horizon::Months(12)))
        .await
        .unwrap();

    // Twelve month entries, five short days — only the short days infer.
    assert_eq!(predictor.call_count(), 5);
}

#[tokio::test]
async fn feed_outage_fails_the_whole_request() {
    let feed = Arc::new(MockFeed::new());
    feed.set_error("connect timeout");
    let predictor = Arc::new(MockPredictor::neutral());
    let orchestrator = HybridOrchestrator::new(
        store(),
        Arc::clone(&feed) as _,
        Arc::clone(&predictor) as _,
        0.74,
    );

    let err = orchestrator
        .forecast(&request(51.51, -0.13, date(2025, 1, 1), Horizon::Days(10)))
        .await
        .unwrap_err();

    // Climate data is never substituted for the failed near-term days.
    assert!(matches!(err, ForecastError::UpstreamUnavailable { .. }));
    assert_eq!(predictor.call_count(), 0);
}

#[tokio::test]
async fn predictor_outage_fails_the_whole_request() {
    let predictor = Arc::new(MockPredictor::neutral());
    predictor.set_error("model server returned 500");
    let orchestrator = HybridOrchestrator::new(
        store(),
        Arc::new(MockFeed::new()),
        Arc::clone(&predictor) as _,
        0.74,
    );

    let err = orchestrator
        .forecast(&request(51.51, -0.13, date(2025, 1, 1), Horizon::Days(3)))
        .await
        .unwrap_err();

    assert!(matches!(err, ForecastError::PredictorFailure(_)));
}

#[tokio::test]
async fn heatwave_days_dominate_the_summary() {
    let orchestrator = HybridOrchestrator::new(
        store(),
        Arc::new(MockFeed::with_base(heatwave_observation())),
        Arc::new(MockPredictor::neutral()),
        0.74,
    );

    let response = orchestrator
        .forecast(&request(31.0, 35.0, date(2025, 7, 1), Horizon::Days(10)))
        .await
        .unwrap();

    assert!(response.summary.highest_risk_level >= RiskLevel::High);
    // At 44°C the heat index saturates discomfort before the hot band.
    assert_eq!(response.summary.dominant_category, "very_uncomfortable");
    // Ties break to the earliest date.
    assert_eq!(
        response.summary.highest_risk_period,
        response.forecast[0].period
    );
}

#[tokio::test]
async fn month_entries_carry_temperature_charts() {
    let orchestrator = HybridOrchestrator::new(
        store(),
        Arc::new(MockFeed::new()),
        Arc::new(MockPredictor::neutral()),
        0.74,
    );

    let response = orchestrator
        .forecast(&request(40.71, -74.01, date(2025, 1, 1), Horizon::Months(2)))
        .await
        .unwrap();

    for entry in &response.forecast[..5] {
        assert!(entry.temperature_chart.is_none());
    }
    for entry in &response.forecast[5..] {
        let chart = entry.temperature_chart.as_ref().unwrap();
        assert!(chart.len() >= 28);
    }
}

#[test]
fn bundled_reference_data_is_complete() {
    let store = ClimateStore::load(Path::new("data")).unwrap();
    assert_eq!(store.len(), 9 * 12);
}

#[test]
fn incomplete_reference_data_is_fatal() {
    // Point the loader at a directory missing every file.
    let err = ClimateStore::load(Path::new("data/continents")).unwrap_err();
    assert!(matches!(err, ForecastError::Configuration(_)));
}
