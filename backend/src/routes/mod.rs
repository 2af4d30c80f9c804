//! Route definitions for the demand dashboard

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/cities", get(handlers::list_cities))
        // Overview and forecasting
        .route("/overview", get(handlers::get_overview))
        .route("/forecast", post(handlers::generate_forecast))
        .route("/performance", get(handlers::get_performance))
        // Engineer allocation
        .route("/jobs", get(handlers::get_jobs))
        // Data table and emulation
        .route("/history", get(handlers::get_history))
        .route("/emulate", post(handlers::emulate_day))
}
