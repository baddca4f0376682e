//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::AppState;

use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Handle POST /watches - Append a new stopwatch to the bank
pub async fn add_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.bank.add() {
        Ok(snapshot) => {
            state.record_action("add");
            info!("Add endpoint called - bank size is now {}", snapshot.watches.len());
            Ok(Json(ApiResponse::updated(
                format!("Stopwatch added, bank size is now {}", snapshot.watches.len()),
                snapshot,
            )))
        }
        Err(e) => {
            error!("Failed to add stopwatch: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /watches/last - Remove the last stopwatch (no-op at the floor)
pub async fn remove_last_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.bank.remove_last() {
        Ok((true, snapshot)) => {
            state.record_action("remove-last");
            info!("Remove endpoint called - bank size is now {}", snapshot.watches.len());
            Ok(Json(ApiResponse::updated(
                "Last stopwatch removed".to_string(),
                snapshot,
            )))
        }
        Ok((false, snapshot)) => {
            info!("Remove endpoint called - bank already at minimum size");
            Ok(Json(ApiResponse::unchanged(
                "Bank is at its minimum size of one stopwatch".to_string(),
                snapshot,
            )))
        }
        Err(e) => {
            error!("Failed to remove stopwatch: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /watches/:index/start - Start or resume a stopwatch
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.bank.start(index) {
        Ok(Some(snapshot)) => {
            state.record_action("start");
            info!("Start endpoint called for stopwatch {}", index);
            Ok(Json(ApiResponse::updated(
                format!("Stopwatch {} started", index),
                snapshot,
            )))
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to start stopwatch {}: {}", index, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /watches/:index/pause - Pause a running stopwatch
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.bank.pause(index) {
        Ok(Some((true, snapshot))) => {
            state.record_action("pause");
            info!("Pause endpoint called for stopwatch {}", index);
            Ok(Json(ApiResponse::updated(
                format!("Stopwatch {} paused", index),
                snapshot,
            )))
        }
        Ok(Some((false, snapshot))) => {
            info!("Pause endpoint called for stopwatch {} - not running", index);
            Ok(Json(ApiResponse::unchanged(
                format!("Stopwatch {} is not running", index),
                snapshot,
            )))
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to pause stopwatch {}: {}", index, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /watches/:index/reset - Reset a stopwatch to zero
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.bank.reset(index) {
        Ok(Some(snapshot)) => {
            state.record_action("reset");
            info!("Reset endpoint called for stopwatch {}", index);
            Ok(Json(ApiResponse::updated(
                format!("Stopwatch {} reset", index),
                snapshot,
            )))
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to reset stopwatch {}: {}", index, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /watches/start-all - Toggle the bank between all-running and
/// all-paused
pub async fn start_all_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.bank.start_all() {
        Ok(snapshot) => {
            state.record_action("start-all");
            let message = if snapshot.all_running {
                "All stopwatches started"
            } else {
                "All stopwatches paused"
            };
            info!("Start-all endpoint called - {}", message.to_lowercase());
            Ok(Json(ApiResponse::updated(message.to_string(), snapshot)))
        }
        Err(e) => {
            error!("Failed to toggle all stopwatches: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /watches/reset-all - Reset every stopwatch
pub async fn reset_all_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.bank.reset_all() {
        Ok(snapshot) => {
            state.record_action("reset-all");
            info!("Reset-all endpoint called");
            Ok(Json(ApiResponse::updated(
                "All stopwatches reset".to_string(),
                snapshot,
            )))
        }
        Err(e) => {
            error!("Failed to reset all stopwatches: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the current bank snapshot and server metadata
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = match state.bank.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get bank snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        stopwatch_count: snapshot.watches.len(),
        all_running: snapshot.all_running,
        bank: snapshot,
        tick_period_ms: state.bank.tick_period().as_millis() as u64,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
