//! State management module
//!
//! This module contains the stopwatch state machine, the bank that owns all
//! stopwatches, and the application-wide state wrapper.

pub mod app_state;
pub mod bank;
pub mod clock;
pub mod stopwatch;

pub(crate) use stopwatch::Schedule;

// Re-export main types
pub use app_state::AppState;
pub use bank::{BankSnapshot, StopwatchBank};
pub use clock::ElapsedClock;
pub use stopwatch::{RunState, Stopwatch, WatchSnapshot};
