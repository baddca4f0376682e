//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/watches", post(add_handler))
        .route("/watches/last", delete(remove_last_handler))
        .route("/watches/:index/start", post(start_handler))
        .route("/watches/:index/pause", post(pause_handler))
        .route("/watches/:index/reset", post(reset_handler))
        .route("/watches/start-all", post(start_all_handler))
        .route("/watches/reset-all", post(reset_all_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
