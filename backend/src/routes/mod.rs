//! Route definitions for the AyurChain dashboard

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/dashboard", dashboard_routes())
        .route("/batches/:batch_id", get(handlers::get_batch))
}

/// Dashboard analytics routes (read-only)
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route("/species", get(handlers::get_species_distribution))
        .route("/monthly-flow", get(handlers::get_monthly_flow))
        .route("/compliance", get(handlers::get_compliance))
        .route("/activity", get(handlers::get_activity))
        .route("/stats", get(handlers::get_stats))
}
