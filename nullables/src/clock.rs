//! Nullable clock: deterministic time for testing.

use covenant_types::{Clock, ClockMode, Timepoint};
use std::cell::Cell;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
#[derive(Debug)]
pub struct NullClock {
    current: Cell<u64>,
    mode: ClockMode,
}

impl NullClock {
    pub fn new(initial: u64) -> Self {
        Self {
            current: Cell::new(initial),
            mode: ClockMode::BlockNumber,
        }
    }

    pub fn with_mode(initial: u64, mode: ClockMode) -> Self {
        Self {
            current: Cell::new(initial),
            mode,
        }
    }

    /// Advance time by `delta`.
    pub fn advance(&self, delta: u64) {
        self.current.set(self.current.get() + delta);
    }

    /// Set the time to a specific value.
    pub fn set(&self, value: u64) {
        self.current.set(value);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timepoint {
        Timepoint::new(self.current.get())
    }

    fn mode(&self) -> ClockMode {
        self.mode
    }
}
