//! Lapboard - A state-managed HTTP server for multi-stopwatch elapsed-time
//! tracking
//!
//! This library provides a bank of independently controlled stopwatches with
//! start/pause/reset commands, group commands over the whole bank, and an
//! aggregate "all running" signal for observers.

pub mod api;
pub mod config;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::{AppState, BankSnapshot, RunState, StopwatchBank};
pub use utils::signals::shutdown_signal;
