//! Demand Dashboard - Backend Server
//!
//! Serves chart-ready demand history, forecasts and engineer job lists for
//! the dashboard frontend, on top of the demand data source gateway.

use axum::{http::Uri, routing::get, Router};
use shared::AllocationRanker;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod extract;
mod handlers;
mod models;
mod routes;
mod services;

pub use config::Config;

use error::{AppError, AppResult};
use external::GatewayClient;
use services::Ranker;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: GatewayClient,
    pub ranker: Arc<Ranker>,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> AppResult<Self> {
        let gateway = GatewayClient::new(&config.gateway)?;
        let ranker = AllocationRanker::new().with_distance(config.allocation.distance_estimator());

        Ok(Self {
            config,
            gateway,
            ranker: Arc::new(ranker),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Demand Dashboard Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Data source: {}", config.gateway.base_url);

    let state = AppState::new(Arc::new(config.clone()))?;
    if !state.gateway.is_reachable().await {
        tracing::warn!("Data source is not reachable yet, requests will fail until it is");
    }

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Demand Dashboard API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Unknown paths get the same JSON error body as everything else
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {}", uri.path()))
}
