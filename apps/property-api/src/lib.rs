//! Portfolio API - HTTP backend for the real-property dashboard
//!
//! Provides REST endpoints for:
//! - Building listings with filters, chart statistics and map points
//! - Single-building detail with reconciled leases
//! - Lease listings, raw or joined to their buildings

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Build the application router with middleware attached
pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS configuration for the dashboard frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Building endpoints
        .route("/api/buildings", get(handlers::list_buildings))
        .route("/api/buildings/:location_code", get(handlers::get_building))
        // Lease endpoints
        .route("/api/leases", get(handlers::list_leases))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
