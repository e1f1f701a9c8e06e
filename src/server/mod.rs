//! HTTP server — Axum surface for the forecasting pipeline.
//!
//! Serves the forecast, climate-summary, and health endpoints as JSON.
//! CORS enabled for browser-based consumers of `ForecastResponse`.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tracing::info;

use routes::SharedState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: SharedState) -> Router {
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().expect("static origin"))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/forecast", post(routes::post_forecast))
        .route("/api/climate/summary", get(routes::get_climate_summary))
        .route("/health", get(routes::health))
        .route("/", get(routes::root))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the shutdown signal fires.
pub async fn serve(state: SharedState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!(port, "Server listening on http://localhost:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received.");
        })
        .await
        .context("Server error")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
