use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a timelock operation.
///
/// `Unset → Waiting → Ready → Done`; cancellation returns an operation to
/// `Unset`. `Done` is final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationState {
    Unset,
    Waiting,
    Ready,
    Done,
}

impl OperationState {
    /// Bit of this state in a state bitmap.
    pub fn bit(self) -> u8 {
        1 << self as u8
    }

    pub fn bitmap(states: &[OperationState]) -> u8 {
        states.iter().fold(0, |acc, s| acc | s.bit())
    }

    /// Scheduled and not yet executed.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Waiting | Self::Ready)
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unset => "unset",
            Self::Waiting => "waiting",
            Self::Ready => "ready",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Stored record of a scheduled operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Operation {
    pub ready_at: covenant_types::Timepoint,
    pub done: bool,
}
