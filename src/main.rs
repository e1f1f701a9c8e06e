//! STORMCAST — Hybrid climate-risk forecasting service
//!
//! Entry point. Loads configuration, initialises structured logging,
//! loads the Climate Normals Store (fatal if incomplete), wires the
//! weather feed and anomaly predictor adapters, and serves the HTTP
//! API until shutdown.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use stormcast::climate::ClimateStore;
use stormcast::config::AppConfig;
use stormcast::orchestrator::HybridOrchestrator;
use stormcast::predictor::http::HttpPredictor;
use stormcast::predictor::AnomalyPredictor;
use stormcast::server;
use stormcast::server::routes::AppState;
use stormcast::weather::openmeteo::OpenMeteoFeed;

const BANNER: &str = r#"
 ____ _____ ___  ____  __  __  ____    _    ____ _____
/ ___|_   _/ _ \|  _ \|  \/  |/ ___|  / \  / ___|_   _|
\___ \ | || | | | |_) | |\/| | |     / _ \ \___ \ | |
 ___) || || |_| |  _ <| |  | | |___ / ___ \ ___) || |
|____/ |_| \___/|_| \_\_|  |_|\____/_/   \_\____/ |_|

  Hybrid Climate-Risk Forecasting Service
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    println!("{BANNER}");
    info!(
        port = cfg.server.port,
        data_dir = %cfg.climate.data_dir,
        predictor = %cfg.predictor.endpoint,
        "STORMCAST starting up"
    );

    // -- Climate Normals Store (fatal on incomplete data) ----------------

    let store = match ClimateStore::load(Path::new(&cfg.climate.data_dir)) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            anyhow::bail!("Climate Normals Store failed to initialise: {e}");
        }
    };
    info!(entries = store.len(), "Climate Normals Store loaded");

    // -- External collaborators ------------------------------------------

    let api_key = match cfg.weather_api.api_key_env.as_deref() {
        Some(env_name) => match AppConfig::resolve_secret(env_name) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, "Weather API key not resolved — using keyless tier");
                None
            }
        },
        None => None,
    };

    let feed = Arc::new(OpenMeteoFeed::new(
        cfg.weather_api.base_url.clone(),
        Duration::from_secs(cfg.weather_api.timeout_secs),
        api_key,
    )?);

    let predictor = Arc::new(
        HttpPredictor::new(
            cfg.predictor.endpoint.clone(),
            Duration::from_secs(cfg.predictor.timeout_secs),
        )
        .context("Failed to initialise predictor adapter")?,
    );
    let model_name = predictor.model_name().to_string();

    // -- Orchestrator + server -------------------------------------------

    let orchestrator = HybridOrchestrator::new(
        Arc::clone(&store),
        feed,
        predictor,
        cfg.forecast.fallback_confidence,
    );

    let state = Arc::new(AppState {
        orchestrator,
        store,
        model_name,
    });

    server::serve(state, cfg.server.port).await?;

    info!("STORMCAST shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stormcast=info"));

    let json_logging = std::env::var("STORMCAST_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
