//! Stopwatch bank: ordered collection with group commands and aggregate state

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::tasks::spawn_tick_task;

use super::{Schedule, Stopwatch, WatchSnapshot};

/// Bank-wide view published to observers on every state change: one snapshot
/// per stopwatch in display order, plus the aggregate "all running" flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSnapshot {
    pub watches: Vec<WatchSnapshot>,
    pub all_running: bool,
}

/// Mutable bank state, shared with the tick tasks behind one lock
#[derive(Debug)]
pub(crate) struct BankInner {
    pub(crate) watches: Vec<Stopwatch>,
    next_generation: u64,
}

impl BankInner {
    /// Check if every stopwatch is Running.
    ///
    /// Vacuously true for an empty bank; the minimum-size invariant keeps
    /// that case from being observed through the public API.
    pub(crate) fn all_running(&self) -> bool {
        self.watches.iter().all(|w| w.is_running())
    }

    pub(crate) fn snapshot(&self) -> BankSnapshot {
        BankSnapshot {
            watches: self.watches.iter().map(|w| w.snapshot()).collect(),
            all_running: self.all_running(),
        }
    }

    fn take_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }
}

/// Ordered collection of stopwatches with group commands.
///
/// Owns its members exclusively; insertion order is display order. The bank
/// never shrinks below one stopwatch, and the initial stopwatch is created
/// together with the bank.
#[derive(Debug)]
pub struct StopwatchBank {
    inner: Arc<Mutex<BankInner>>,
    /// Channel for snapshot notifications to observers
    update_tx: watch::Sender<BankSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _update_rx: watch::Receiver<BankSnapshot>,
    tick_period: Duration,
}

impl StopwatchBank {
    /// Create a bank containing a single Idle stopwatch
    pub fn new(tick_period: Duration) -> Self {
        let inner = BankInner {
            watches: vec![Stopwatch::new()],
            next_generation: 0,
        };
        let (update_tx, update_rx) = watch::channel(inner.snapshot());

        Self {
            inner: Arc::new(Mutex::new(inner)),
            update_tx,
            _update_rx: update_rx,
            tick_period,
        }
    }

    /// Subscribe to snapshot notifications
    pub fn subscribe(&self) -> watch::Receiver<BankSnapshot> {
        self.update_tx.subscribe()
    }

    /// Get the configured tick period
    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Get the current bank snapshot
    pub fn snapshot(&self) -> Result<BankSnapshot, String> {
        Ok(self.lock()?.snapshot())
    }

    /// Check if every stopwatch is Running
    pub fn all_running(&self) -> Result<bool, String> {
        Ok(self.lock()?.all_running())
    }

    /// Get the number of stopwatches in the bank
    pub fn len(&self) -> Result<usize, String> {
        Ok(self.lock()?.watches.len())
    }

    /// Check if the bank is empty (never true while the minimum-size
    /// invariant holds)
    pub fn is_empty(&self) -> Result<bool, String> {
        Ok(self.lock()?.watches.is_empty())
    }

    /// Append a new Idle stopwatch to the bank
    pub fn add(&self) -> Result<BankSnapshot, String> {
        let mut inner = self.lock()?;
        inner.watches.push(Stopwatch::new());
        let snapshot = inner.snapshot();
        drop(inner);

        info!("Added stopwatch, bank size is now {}", snapshot.watches.len());
        self.publish(&snapshot);
        Ok(snapshot)
    }

    /// Remove the last stopwatch, cancelling its schedule.
    ///
    /// No-op when only one stopwatch remains; the returned flag reports
    /// whether a stopwatch was actually removed.
    pub fn remove_last(&self) -> Result<(bool, BankSnapshot), String> {
        let mut inner = self.lock()?;
        if inner.watches.len() <= 1 {
            debug!("Remove ignored, bank is at its minimum size");
            return Ok((false, inner.snapshot()));
        }

        if let Some(mut removed) = inner.watches.pop() {
            removed.cancel_schedule();
        }
        let snapshot = inner.snapshot();
        drop(inner);

        info!("Removed stopwatch, bank size is now {}", snapshot.watches.len());
        self.publish(&snapshot);
        Ok((true, snapshot))
    }

    /// Start the stopwatch at `index`.
    ///
    /// Valid from every state: Idle begins counting, Paused resumes, Running
    /// is restarted onto a fresh schedule. Returns `None` if there is no
    /// stopwatch at `index`.
    pub fn start(&self, index: usize) -> Result<Option<BankSnapshot>, String> {
        let mut inner = self.lock()?;
        if index >= inner.watches.len() {
            return Ok(None);
        }

        self.start_locked(&mut inner, index);
        let snapshot = inner.snapshot();
        drop(inner);

        debug!("Started stopwatch {}", index);
        self.publish(&snapshot);
        Ok(Some(snapshot))
    }

    /// Pause the stopwatch at `index`, retaining its elapsed time.
    ///
    /// No-op unless the stopwatch is Running; the returned flag reports
    /// whether a transition happened. Returns `None` if there is no
    /// stopwatch at `index`.
    pub fn pause(&self, index: usize) -> Result<Option<(bool, BankSnapshot)>, String> {
        let mut inner = self.lock()?;
        let Some(sw) = inner.watches.get_mut(index) else {
            return Ok(None);
        };

        let changed = sw.pause();
        let snapshot = inner.snapshot();
        drop(inner);

        if changed {
            debug!("Paused stopwatch {}", index);
            self.publish(&snapshot);
        }
        Ok(Some((changed, snapshot)))
    }

    /// Reset the stopwatch at `index` to Idle with a zeroed clock.
    ///
    /// A notification is always emitted, even when the stopwatch was already
    /// Idle. Returns `None` if there is no stopwatch at `index`.
    pub fn reset(&self, index: usize) -> Result<Option<BankSnapshot>, String> {
        let mut inner = self.lock()?;
        let Some(sw) = inner.watches.get_mut(index) else {
            return Ok(None);
        };

        sw.reset();
        let snapshot = inner.snapshot();
        drop(inner);

        debug!("Reset stopwatch {}", index);
        self.publish(&snapshot);
        Ok(Some(snapshot))
    }

    /// Toggle the whole bank between all-running and all-paused.
    ///
    /// If any stopwatch is not Running, every stopwatch is started; if all
    /// are Running, every stopwatch is paused. Repeated calls alternate the
    /// bank between the two group states regardless of prior mixed states.
    pub fn start_all(&self) -> Result<BankSnapshot, String> {
        let mut inner = self.lock()?;
        if !inner.all_running() {
            info!("Starting all {} stopwatches", inner.watches.len());
            for index in 0..inner.watches.len() {
                self.start_locked(&mut inner, index);
            }
        } else {
            info!("All stopwatches running, pausing all");
            for sw in inner.watches.iter_mut() {
                sw.pause();
            }
        }
        let snapshot = inner.snapshot();
        drop(inner);

        self.publish(&snapshot);
        Ok(snapshot)
    }

    /// Reset every stopwatch, regardless of the aggregate state
    pub fn reset_all(&self) -> Result<BankSnapshot, String> {
        let mut inner = self.lock()?;
        info!("Resetting all {} stopwatches", inner.watches.len());
        for sw in inner.watches.iter_mut() {
            sw.reset();
        }
        let snapshot = inner.snapshot();
        drop(inner);

        self.publish(&snapshot);
        Ok(snapshot)
    }

    /// Install a fresh schedule on the stopwatch at `index` (must be in
    /// bounds). Any previous schedule is cancelled before the new tick task
    /// is spawned.
    fn start_locked(&self, inner: &mut BankInner, index: usize) {
        let generation = inner.take_generation();
        let task = spawn_tick_task(
            Arc::clone(&self.inner),
            self.update_tx.clone(),
            index,
            generation,
            self.tick_period,
        );
        inner.watches[index].install_schedule(Schedule { generation, task });
    }

    fn lock(&self) -> Result<MutexGuard<'_, BankInner>, String> {
        self.inner
            .lock()
            .map_err(|e| format!("Failed to lock stopwatch bank: {}", e))
    }

    fn publish(&self, snapshot: &BankSnapshot) {
        if let Err(e) = self.update_tx.send(snapshot.clone()) {
            warn!("Failed to send bank update: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RunState;

    const PERIOD: Duration = Duration::from_millis(10);

    fn bank() -> StopwatchBank {
        StopwatchBank::new(PERIOD)
    }

    /// Let freshly spawned tick tasks initialize their intervals
    async fn settle() {
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
    }

    /// Advance paused time one tick period at a time, letting tick tasks run
    async fn run_ticks(n: u64) {
        for _ in 0..n {
            tokio::time::advance(PERIOD).await;
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
        }
    }

    fn states(snapshot: &BankSnapshot) -> Vec<RunState> {
        snapshot.watches.iter().map(|w| w.state).collect()
    }

    #[tokio::test]
    async fn new_bank_holds_one_idle_stopwatch() {
        let bank = bank();
        let snapshot = bank.snapshot().unwrap();
        assert_eq!(snapshot.watches.len(), 1);
        assert_eq!(snapshot.watches[0].state, RunState::Idle);
        assert_eq!(snapshot.watches[0].elapsed, "00:00:00:00");
        assert!(!snapshot.all_running);
    }

    #[tokio::test(start_paused = true)]
    async fn started_stopwatch_ticks_at_the_configured_period() {
        let bank = bank();
        bank.start(0).unwrap();
        settle().await;
        run_ticks(100).await;

        let snapshot = bank.snapshot().unwrap();
        assert_eq!(snapshot.watches[0].elapsed, "00:00:01:00");
        assert_eq!(snapshot.watches[0].state, RunState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_leaves_a_single_schedule() {
        let bank = bank();
        bank.start(0).unwrap();
        bank.start(0).unwrap();
        settle().await;
        run_ticks(10).await;

        // Two live schedules would have doubled the tick rate
        let snapshot = bank.snapshot().unwrap();
        assert_eq!(snapshot.watches[0].elapsed, "00:00:00:10");
    }

    #[tokio::test(start_paused = true)]
    async fn paused_stopwatch_stops_ticking_and_resumes_in_place() {
        let bank = bank();
        bank.start(0).unwrap();
        settle().await;
        run_ticks(5).await;

        bank.pause(0).unwrap();
        run_ticks(5).await;
        let paused = bank.snapshot().unwrap();
        assert_eq!(paused.watches[0].elapsed, "00:00:00:05");
        assert_eq!(paused.watches[0].state, RunState::Paused);

        bank.start(0).unwrap();
        settle().await;
        run_ticks(3).await;
        let resumed = bank.snapshot().unwrap();
        assert_eq!(resumed.watches[0].elapsed, "00:00:00:08");
    }

    #[tokio::test(start_paused = true)]
    async fn reset_zeroes_the_clock_from_any_state() {
        let bank = bank();
        bank.start(0).unwrap();
        settle().await;
        run_ticks(7).await;

        bank.reset(0).unwrap();
        let snapshot = bank.snapshot().unwrap();
        assert_eq!(snapshot.watches[0].elapsed, "00:00:00:00");
        assert_eq!(snapshot.watches[0].state, RunState::Idle);

        // The cancelled schedule must never tick again
        run_ticks(5).await;
        let snapshot = bank.snapshot().unwrap();
        assert_eq!(snapshot.watches[0].elapsed, "00:00:00:00");
    }

    #[tokio::test]
    async fn reset_always_notifies_even_when_already_idle() {
        let bank = bank();
        let mut rx = bank.subscribe();
        rx.borrow_and_update();

        bank.reset(0).unwrap();
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn pause_when_not_running_does_not_notify() {
        let bank = bank();
        let mut rx = bank.subscribe();
        rx.borrow_and_update();

        bank.pause(0).unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn pause_reports_whether_a_transition_happened() {
        let bank = bank();
        let (changed, _) = bank.pause(0).unwrap().unwrap();
        assert!(!changed);

        bank.start(0).unwrap();
        let (changed, snapshot) = bank.pause(0).unwrap().unwrap();
        assert!(changed);
        assert_eq!(snapshot.watches[0].state, RunState::Paused);

        let (changed, _) = bank.pause(0).unwrap().unwrap();
        assert!(!changed);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_when_already_paused_does_not_notify() {
        let bank = bank();
        bank.start(0).unwrap();
        bank.pause(0).unwrap();

        let mut rx = bank.subscribe();
        rx.borrow_and_update();

        bank.pause(0).unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn out_of_range_index_is_reported_as_absent() {
        let bank = bank();
        assert!(bank.start(5).unwrap().is_none());
        assert!(bank.pause(5).unwrap().is_none());
        assert!(bank.reset(5).unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_last_is_a_noop_at_the_minimum_size() {
        let bank = bank();
        let (removed, snapshot) = bank.remove_last().unwrap();
        assert!(!removed);
        assert_eq!(snapshot.watches.len(), 1);
        assert_eq!(bank.len().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_last_cancels_the_removed_schedule() {
        let bank = bank();
        bank.add().unwrap();
        bank.start(1).unwrap();
        settle().await;
        run_ticks(3).await;

        let (removed, snapshot) = bank.remove_last().unwrap();
        assert!(removed);
        assert_eq!(snapshot.watches.len(), 1);

        // The orphaned tick task must exit without touching anything
        run_ticks(5).await;
        let snapshot = bank.snapshot().unwrap();
        assert_eq!(snapshot.watches.len(), 1);
        assert_eq!(snapshot.watches[0].elapsed, "00:00:00:00");
    }

    #[tokio::test]
    async fn adding_an_idle_stopwatch_breaks_all_running() {
        let bank = bank();
        bank.start(0).unwrap();
        assert!(bank.all_running().unwrap());

        bank.add().unwrap();
        assert!(!bank.all_running().unwrap());
    }

    #[tokio::test]
    async fn start_all_toggles_between_all_running_and_all_paused() {
        let bank = bank();
        bank.add().unwrap();
        bank.add().unwrap();
        // Mixed states: only the first stopwatch running
        bank.start(0).unwrap();

        let snapshot = bank.start_all().unwrap();
        assert_eq!(states(&snapshot), vec![RunState::Running; 3]);
        assert!(snapshot.all_running);

        let snapshot = bank.start_all().unwrap();
        assert_eq!(states(&snapshot), vec![RunState::Paused; 3]);
        assert!(!snapshot.all_running);

        let snapshot = bank.start_all().unwrap();
        assert_eq!(states(&snapshot), vec![RunState::Running; 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_all_is_unconditional() {
        let bank = bank();
        bank.add().unwrap();
        bank.start(0).unwrap();
        settle().await;
        run_ticks(4).await;

        let snapshot = bank.reset_all().unwrap();
        for sw in &snapshot.watches {
            assert_eq!(sw.state, RunState::Idle);
            assert_eq!(sw.elapsed, "00:00:00:00");
        }
    }

    #[test]
    fn all_running_is_vacuously_true_for_an_empty_bank() {
        let inner = BankInner {
            watches: Vec::new(),
            next_generation: 0,
        };
        assert!(inner.all_running());
    }
}
