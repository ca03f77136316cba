//! Append-only `(timepoint, value)` histories with point-in-time lookups.
//!
//! Keys never decrease. A write at the latest key overwrites that entry in
//! place, so a series holds at most one checkpoint per timepoint. Lookups
//! return the value of the latest checkpoint whose key is at or before the
//! query, or zero when there is none.

use crate::error::CheckpointError;
use covenant_types::Timepoint;
use serde::{Deserialize, Serialize};

/// One entry of a [`Trace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub key: Timepoint,
    pub value: u128,
}

/// A checkpointed value history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    checkpoints: Vec<Checkpoint>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` at `key`, returning `(previous latest, new latest)`.
    ///
    /// Fails if `key` precedes the latest checkpoint.
    pub fn push(&mut self, key: Timepoint, value: u128) -> Result<(u128, u128), CheckpointError> {
        match self.checkpoints.last().copied() {
            Some(last) if last.key > key => Err(CheckpointError::UnorderedInsertion {
                last: last.key,
                key,
            }),
            Some(last) if last.key == key => {
                if let Some(entry) = self.checkpoints.last_mut() {
                    entry.value = value;
                }
                Ok((last.value, value))
            }
            Some(last) => {
                self.checkpoints.push(Checkpoint { key, value });
                Ok((last.value, value))
            }
            None => {
                self.checkpoints.push(Checkpoint { key, value });
                Ok((0, value))
            }
        }
    }

    /// The value `record_delta` would write, without writing it.
    pub fn preview_delta(
        &self,
        key: Timepoint,
        delta: u128,
        is_increase: bool,
    ) -> Result<u128, CheckpointError> {
        if let Some(last) = self.checkpoints.last() {
            if last.key > key {
                return Err(CheckpointError::UnorderedInsertion {
                    last: last.key,
                    key,
                });
            }
        }
        let latest = self.latest();
        if is_increase {
            latest.checked_add(delta).ok_or(CheckpointError::Overflow)
        } else {
            latest.checked_sub(delta).ok_or(CheckpointError::Underflow {
                latest,
                delta,
            })
        }
    }

    /// Add or subtract `delta` from the latest value and record the result at `key`.
    pub fn record_delta(
        &mut self,
        key: Timepoint,
        delta: u128,
        is_increase: bool,
    ) -> Result<(u128, u128), CheckpointError> {
        let next = self.preview_delta(key, delta, is_increase)?;
        self.push(key, next)
    }

    /// Value of the first checkpoint with key >= `key`, or zero.
    pub fn lower_lookup(&self, key: Timepoint) -> u128 {
        let pos = self.checkpoints.partition_point(|c| c.key < key);
        self.checkpoints.get(pos).map(|c| c.value).unwrap_or(0)
    }

    /// Value of the last checkpoint with key <= `key`, or zero.
    pub fn upper_lookup(&self, key: Timepoint) -> u128 {
        let pos = self.checkpoints.partition_point(|c| c.key <= key);
        self.value_before(pos)
    }

    /// Same as [`upper_lookup`](Self::upper_lookup), tuned for recent keys.
    ///
    /// Most queries target the tail of the history, so the search first
    /// narrows to the last `sqrt(len)` entries when that is possible.
    pub fn upper_lookup_recent(&self, key: Timepoint) -> u128 {
        let len = self.checkpoints.len();
        let mut low = 0;
        let mut high = len;

        if len > 5 {
            let mid = len - isqrt(len);
            if key < self.checkpoints[mid].key {
                high = mid;
            } else {
                low = mid + 1;
            }
        }

        let pos = low + self.checkpoints[low..high].partition_point(|c| c.key <= key);
        self.value_before(pos)
    }

    /// Latest value, or zero for an empty history.
    pub fn latest(&self) -> u128 {
        self.checkpoints.last().map(|c| c.value).unwrap_or(0)
    }

    pub fn latest_checkpoint(&self) -> Option<Checkpoint> {
        self.checkpoints.last().copied()
    }

    pub fn at(&self, pos: usize) -> Option<Checkpoint> {
        self.checkpoints.get(pos).copied()
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    fn value_before(&self, pos: usize) -> u128 {
        if pos == 0 {
            0
        } else {
            self.checkpoints[pos - 1].value
        }
    }
}

/// Integer square root (floor).
fn isqrt(n: usize) -> usize {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
