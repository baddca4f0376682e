//! Background tasks module
//!
//! This module contains the periodic tick tasks that drive Running
//! stopwatches alongside the HTTP server.

pub mod ticker;

pub(crate) use ticker::spawn_tick_task;
