//! Elapsed-time clock with centisecond resolution

use serde::{Deserialize, Serialize};

/// Four-field elapsed clock: centiseconds, seconds, minutes, hours.
///
/// The sub-hour fields always stay inside their ranges (carries are resolved
/// immediately on each tick); hours is uncapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedClock {
    pub centis: u8,
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u64,
}

impl ElapsedClock {
    /// Create a zeroed clock
    pub fn new() -> Self {
        Self {
            centis: 0,
            seconds: 0,
            minutes: 0,
            hours: 0,
        }
    }

    /// Advance the clock by one centisecond, cascading carries.
    ///
    /// Each field cascades at most one step per tick.
    pub fn tick(&mut self) {
        self.centis += 1;
        if self.centis == 100 {
            self.centis = 0;
            self.seconds += 1;
        }
        if self.seconds == 60 {
            self.seconds = 0;
            self.minutes += 1;
        }
        if self.minutes == 60 {
            self.minutes = 0;
            self.hours += 1;
        }
    }

    /// Zero all four fields
    pub fn zero(&mut self) {
        *self = Self::new();
    }

    /// Check whether the clock reads zero
    pub fn is_zero(&self) -> bool {
        *self == Self::new()
    }

    /// Format the clock as `HH:MM:SS:CC`.
    ///
    /// Every field is zero-padded to two digits; hours past 99 keep their
    /// natural width.
    pub fn formatted(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.centis
        )
    }
}

impl Default for ElapsedClock {
    fn default() -> Self {
        Self::new()
    }
}
