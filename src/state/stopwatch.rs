//! Single stopwatch state machine

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::ElapsedClock;

/// Run state of a single stopwatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Never started, or reset
    Idle,
    /// Accumulating elapsed time
    Running,
    /// Stopped with elapsed time retained
    Paused,
}

/// Handle to the periodic tick task driving a Running stopwatch.
///
/// `JoinHandle::abort` only lands at an await point, so the generation number
/// is the authoritative cancellation signal: a tick task whose generation no
/// longer matches the stopwatch's current schedule must exit without touching
/// the clock.
#[derive(Debug)]
pub(crate) struct Schedule {
    pub(crate) generation: u64,
    pub(crate) task: JoinHandle<()>,
}

/// Per-stopwatch view published to observers: formatted elapsed time plus
/// run state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchSnapshot {
    pub elapsed: String,
    pub state: RunState,
}

/// One elapsed-time counter under start/pause/reset control.
///
/// Invariant: a schedule is installed if and only if the state is Running.
/// All operations are total; calls that make no sense in the current state
/// are defined no-ops.
#[derive(Debug)]
pub struct Stopwatch {
    clock: ElapsedClock,
    state: RunState,
    schedule: Option<Schedule>,
}

impl Stopwatch {
    /// Create a new Idle stopwatch with a zeroed clock
    pub fn new() -> Self {
        Self {
            clock: ElapsedClock::new(),
            state: RunState::Idle,
            schedule: None,
        }
    }

    /// Get the current run state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Check if the stopwatch is currently Running
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Format the elapsed time as `HH:MM:SS:CC`
    pub fn formatted_elapsed(&self) -> String {
        self.clock.formatted()
    }

    /// Get the current clock reading
    pub fn clock(&self) -> &ElapsedClock {
        &self.clock
    }

    /// Build the snapshot published to observers
    pub fn snapshot(&self) -> WatchSnapshot {
        WatchSnapshot {
            elapsed: self.clock.formatted(),
            state: self.state,
        }
    }

    /// Install a fresh tick schedule and transition to Running.
    ///
    /// Any existing schedule is cancelled first, so two tick tasks can never
    /// drive the same stopwatch at once. Valid from every state; from Paused
    /// this resumes without touching the clock.
    pub(crate) fn install_schedule(&mut self, schedule: Schedule) {
        self.cancel_schedule();
        self.schedule = Some(schedule);
        self.state = RunState::Running;
    }

    /// Cancel the active tick schedule, if any.
    ///
    /// After this returns, no schedule generation matches and a stray tick
    /// task will exit on its next wake.
    pub(crate) fn cancel_schedule(&mut self) {
        if let Some(schedule) = self.schedule.take() {
            schedule.task.abort();
        }
    }

    /// Pause the stopwatch, retaining elapsed time.
    ///
    /// Only meaningful when Running; returns false (and changes nothing)
    /// otherwise.
    pub(crate) fn pause(&mut self) -> bool {
        if self.state != RunState::Running {
            return false;
        }
        self.cancel_schedule();
        self.state = RunState::Paused;
        true
    }

    /// Reset to Idle with a zeroed clock, from any state
    pub(crate) fn reset(&mut self) {
        self.cancel_schedule();
        self.clock.zero();
        self.state = RunState::Idle;
    }

    /// Advance the clock by one centisecond (tick-task use only)
    pub(crate) fn tick(&mut self) {
        self.clock.tick();
    }

    /// Check whether `generation` identifies the currently installed schedule
    pub(crate) fn schedule_matches(&self, generation: u64) -> bool {
        self.schedule
            .as_ref()
            .map(|s| s.generation == generation)
            .unwrap_or(false)
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        self.cancel_schedule();
    }
}
