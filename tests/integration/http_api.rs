//! HTTP surface tests: full request/response cycle through the router.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use std::path::Path;
use std::sync::Arc;
use tower::util::ServiceExt;

use stormcast::climate::ClimateStore;
use stormcast::orchestrator::HybridOrchestrator;
use stormcast::server::routes::AppState;
use stormcast::server::build_router;

use super::mock_sources::{MockFeed, MockPredictor};

fn app_with(feed: Arc<MockFeed>, predictor: Arc<MockPredictor>) -> axum::Router {
    let store = Arc::new(ClimateStore::load(Path::new("data")).unwrap());
    let orchestrator = HybridOrchestrator::new(
        Arc::clone(&store),
        feed as _,
        predictor as _,
        0.74,
    );
    build_router(Arc::new(AppState {
        orchestrator,
        store,
        model_name: "mock-model".to_string(),
    }))
}

fn forecast_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/forecast")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn forecast_endpoint_returns_tagged_entries() {
    let app = app_with(Arc::new(MockFeed::new()), Arc::new(MockPredictor::neutral()));

    let response = app
        .oneshot(forecast_request(serde_json::json!({
            "latitude": 19.076,
            "longitude": 72.877,
            "start_date": "2025-01-01",
            "horizon_days": 10,
            "location_name": "Mumbai"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["region"]["continent"], "asia");
    assert_eq!(body["region"]["hemisphere"], "northern");
    assert_eq!(body["location_name"], "Mumbai");

    let forecast = body["forecast"].as_array().unwrap();
    assert_eq!(forecast.len(), 6);
    for entry in &forecast[..5] {
        assert_eq!(entry["data_source"], "weather_api");
    }
    assert_eq!(forecast[5]["data_source"], "climate_pattern:asia");
    assert_eq!(forecast[5]["date_or_month"], "2025-01");
    assert!(forecast[5]["temperature_chart"].is_array());

    assert!(body["summary"]["highest_risk_level"].is_string());
    assert!(body["summary"]["dominant_category"].is_string());
}

#[tokio::test]
async fn feed_outage_maps_to_service_unavailable() {
    let feed = Arc::new(MockFeed::new());
    feed.set_error("socket timeout");
    let app = app_with(feed, Arc::new(MockPredictor::neutral()));

    let response = app
        .oneshot(forecast_request(serde_json::json!({
            "latitude": 51.51,
            "longitude": -0.13,
            "start_date": "2025-01-01",
            "horizon_days": 5
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["kind"], "upstream_unavailable");
}

#[tokio::test]
async fn predictor_outage_maps_to_bad_gateway() {
    let predictor = Arc::new(MockPredictor::neutral());
    predictor.set_error("shape mismatch");
    let app = app_with(Arc::new(MockFeed::new()), predictor);

    let response = app
        .oneshot(forecast_request(serde_json::json!({
            "latitude": 51.51,
            "longitude": -0.13,
            "start_date": "2025-01-01",
            "horizon_days": 5
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["kind"], "predictor_failure");
}

#[tokio::test]
async fn missing_horizon_is_rejected_before_any_fetch() {
    let feed = Arc::new(MockFeed::new());
    let app = app_with(Arc::clone(&feed), Arc::new(MockPredictor::neutral()));

    let response = app
        .oneshot(forecast_request(serde_json::json!({
            "latitude": 51.51,
            "longitude": -0.13,
            "start_date": "2025-01-01"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["kind"], "validation");
    assert_eq!(feed.call_count(), 0);
}

#[tokio::test]
async fn climate_summary_reports_both_scopes() {
    let app = app_with(Arc::new(MockFeed::new()), Arc::new(MockPredictor::neutral()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/climate/summary?latitude=-33.87&longitude=151.21&month=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["region"]["continent"], "australia");
    assert_eq!(body["region"]["hemisphere"], "southern");
    assert!(body["continent_normal"]["temperature"]["avg"].is_number());
    assert!(body["hemisphere_normal"]["temperature"]["avg"].is_number());
}

#[tokio::test]
async fn health_endpoint_reports_readiness() {
    let app = app_with(Arc::new(MockFeed::new()), Arc::new(MockPredictor::neutral()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["climate_entries"], 108);
    assert_eq!(body["model"], "mock-model");
}
