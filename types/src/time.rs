//! Timepoints and the clock abstraction.
//!
//! A timepoint is an abstract, monotonically increasing clock value. Depending
//! on the [`ClockMode`] it is either a sequence number (block height) or Unix
//! epoch seconds. Every component takes the current timepoint as an explicit
//! `now` argument; only the engine reads a [`Clock`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A point on the governance clock.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timepoint(u64);

impl Timepoint {
    /// Clock origin.
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// `self + duration`, saturating at `u64::MAX`.
    pub fn saturating_add(&self, duration: u64) -> Self {
        Self(self.0.saturating_add(duration))
    }

    /// `self - duration`, saturating at zero.
    pub fn saturating_sub(&self, duration: u64) -> Self {
        Self(self.0.saturating_sub(duration))
    }

    /// Whether `self + duration` has been reached at `now`.
    pub fn has_elapsed(&self, duration: u64, now: Timepoint) -> bool {
        now.0 >= self.0.saturating_add(duration)
    }
}

impl fmt::Display for Timepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Timepoint {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// What a timepoint counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockMode {
    /// Sequence numbers assigned by the external sequencer.
    #[default]
    BlockNumber,
    /// Unix epoch seconds.
    Timestamp,
}

impl ClockMode {
    /// Machine-readable description of the clock.
    pub fn description(&self) -> &'static str {
        match self {
            Self::BlockNumber => "mode=blocknumber&from=default",
            Self::Timestamp => "mode=timestamp",
        }
    }
}

/// Source of the current timepoint.
pub trait Clock {
    fn now(&self) -> Timepoint;

    fn mode(&self) -> ClockMode;
}

/// Wall-clock time in Unix seconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timepoint {
        // A clock before the epoch reads as the origin.
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Timepoint(secs)
    }

    fn mode(&self) -> ClockMode {
        ClockMode::Timestamp
    }
}
