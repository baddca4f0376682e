//! Periodic tick task driving a single Running stopwatch

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::trace;

use crate::state::bank::{BankInner, BankSnapshot};

/// Spawn the periodic tick task for the stopwatch at `index`.
///
/// One logical centisecond is counted per interval firing; missed intervals
/// are skipped rather than replayed, so elapsed time is a tick count, not a
/// wall-clock measurement.
///
/// The task holds only the shared lock and a generation number. Aborting the
/// task is advisory; the generation check under the lock is what guarantees
/// a cancelled schedule never advances the clock again, even if the task was
/// already past its await point when the schedule was replaced.
pub(crate) fn spawn_tick_task(
    inner: Arc<Mutex<BankInner>>,
    update_tx: watch::Sender<BankSnapshot>,
    index: usize,
    generation: u64,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick completes immediately; consume it so the
        // clock first advances one full period after start.
        ticks.tick().await;

        loop {
            ticks.tick().await;

            let Ok(mut bank) = inner.lock() else {
                break;
            };
            let Some(sw) = bank.watches.get_mut(index) else {
                // The stopwatch was removed from the bank
                break;
            };
            if !sw.schedule_matches(generation) || !sw.is_running() {
                // A pause, reset, restart or removal retired this schedule
                break;
            }

            sw.tick();
            let snapshot = bank.snapshot();
            drop(bank);

            let _ = update_tx.send(snapshot);
        }

        trace!("Tick task for stopwatch {} (generation {}) exited", index, generation);
    })
}
