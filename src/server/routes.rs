//! HTTP route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<AppState>`; the
//! only cross-request state is the read-only Climate Normals Store and
//! the loaded predictor handle, so handlers run fully in parallel.

use axum::{extract::Query, extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::climate::{ClimateNormal, ClimateStore};
use crate::orchestrator::{self, ForecastRequest, Horizon, HybridOrchestrator};
use crate::types::{ForecastError, ForecastResponse, Location, Region, RegionScope};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct AppState {
    pub orchestrator: HybridOrchestrator,
    pub store: Arc<ClimateStore>,
    pub model_name: String,
}

pub type SharedState = Arc<AppState>;

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// JSON error body carrying the taxonomy kind.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

#[derive(Debug)]
pub struct ApiError(pub ForecastError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            ForecastError::Validation(_) => StatusCode::BAD_REQUEST,
            ForecastError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ForecastError::PredictorFailure(_) => StatusCode::BAD_GATEWAY,
            ForecastError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorBody {
            error: self.0.to_string(),
            kind: self.0.kind().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        ApiError(e)
    }
}

// ---------------------------------------------------------------------------
// Request/response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ForecastBody {
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub horizon_days: Option<u32>,
    #[serde(default)]
    pub horizon_months: Option<u32>,
    #[serde(default)]
    pub location_name: Option<String>,
}

impl ForecastBody {
    fn into_request(self) -> Result<ForecastRequest, ForecastError> {
        let location = Location::new(self.latitude, self.longitude)?;
        let horizon = match (self.horizon_days, self.horizon_months) {
            (Some(days), None) => Horizon::Days(days),
            (None, Some(months)) => Horizon::Months(months),
            (None, None) => {
                return Err(ForecastError::Validation(
                    "one of horizon_days or horizon_months is required".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(ForecastError::Validation(
                    "horizon_days and horizon_months are mutually exclusive".to_string(),
                ))
            }
        };
        Ok(ForecastRequest {
            location,
            location_name: self.location_name,
            start_date: self.start_date,
            horizon,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ClimateSummaryQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub month: u32,
}

#[derive(Debug, Serialize)]
pub struct ClimateSummaryResponse {
    pub location: Location,
    pub region: Region,
    pub month: u32,
    pub continent_normal: ClimateNormal,
    pub hemisphere_normal: ClimateNormal,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub climate_entries: usize,
    pub model: String,
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// POST /api/forecast
pub async fn post_forecast(
    State(state): State<SharedState>,
    Json(body): Json<ForecastBody>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        lat = body.latitude,
        lon = body.longitude,
        start = %body.start_date,
        "Forecast request received"
    );

    let request = body.into_request()?;
    match state.orchestrator.forecast(&request).await {
        Ok(response) => {
            info!(%request_id, entries = response.forecast.len(), "Forecast request served");
            Ok(Json(response))
        }
        Err(e) => {
            warn!(%request_id, kind = e.kind(), error = %e, "Forecast request failed");
            Err(ApiError(e))
        }
    }
}

/// GET /api/climate/summary
pub async fn get_climate_summary(
    State(state): State<SharedState>,
    Query(query): Query<ClimateSummaryQuery>,
) -> Result<Json<ClimateSummaryResponse>, ApiError> {
    if !(1..=12).contains(&query.month) {
        return Err(ApiError(ForecastError::Validation(format!(
            "month must be in 1..=12, got {}",
            query.month
        ))));
    }
    let location = Location::new(query.latitude, query.longitude)?;
    let region = orchestrator::resolve_region(&location);

    let continent_normal =
        *state.store.lookup(RegionScope::Continent(region.continent), query.month);
    let hemisphere_normal =
        *state.store.lookup(RegionScope::Hemisphere(region.hemisphere), query.month);

    Ok(Json(ClimateSummaryResponse {
        location,
        region,
        month: query.month,
        continent_normal,
        hemisphere_normal,
    }))
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        climate_entries: state.store.len(),
        model: state.model_name.clone(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// GET /
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "stormcast",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "forecast": "POST /api/forecast",
            "climate_summary": "GET /api/climate/summary",
            "health": "GET /health",
        }
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
