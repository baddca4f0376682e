//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::BankSnapshot;

/// API response structure for stopwatch command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub bank: BankSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, bank: BankSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            bank,
        }
    }

    /// Create a response for a command that changed bank state
    pub fn updated(message: String, bank: BankSnapshot) -> Self {
        Self::new("updated".to_string(), message, bank)
    }

    /// Create a response for a command that left bank state unchanged
    pub fn unchanged(message: String, bank: BankSnapshot) -> Self {
        Self::new("unchanged".to_string(), message, bank)
    }
}

/// Status response with bank snapshot and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub bank: BankSnapshot,
    pub stopwatch_count: usize,
    pub all_running: bool,
    pub tick_period_ms: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
