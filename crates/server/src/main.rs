//! # pricing-server
//!
//! Web form and REST API for seven-day nightly price forecasts.
//!
//! The model artifact is loaded once at startup; a missing or invalid
//! artifact stops the process before it binds a port.

use axum::{
    routing::{get, post},
    Router,
};
use pricing_facade::{ArtifactRegistry, PredictorConfig, PricePredictor};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod chart;
mod routes;
mod view;

use view::Views;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    registry: Arc<ArtifactRegistry>,
    views: Arc<Views>,
    horizon_days: usize,
}

fn app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::index))
        .route("/predict", post(routes::predict))
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(routes::liveness))
        .route("/health/ready", get(routes::readiness))
        // Legacy health endpoint
        .route("/health", get(routes::liveness))
        // API endpoints
        .route("/api/v1/forecast", post(routes::forecast))
        // Middleware layers
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = PredictorConfig::from_env()?;

    // Load eagerly so a bad artifact fails at startup, not on first request
    let predictor = PricePredictor::load(&config.model_path, config.scaler_source)?;
    info!(
        model = %predictor.metadata().name,
        path = %config.model_path.display(),
        scaler_source = %config.scaler_source,
        "Model loaded"
    );

    let state = AppState {
        registry: Arc::new(ArtifactRegistry::preloaded(predictor)),
        views: Arc::new(Views::new()?),
        horizon_days: config.horizon_days,
    };

    // Server configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .map_err(|e| format!("PORT must be a valid number: {}", e))?;
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| format!("Invalid HOST:PORT configuration: {}", e))?;

    info!("pricing-server v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,pricing_core=info,tower_http=info".into()),
        )
        .init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}
