//! Shared utilities
//!
//! Currently just the shutdown signal handling used by the server entry
//! point.

pub mod signals;

pub use signals::shutdown_signal;
