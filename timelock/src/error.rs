//! Timelock errors.

use crate::operation::OperationState;
use covenant_access::AccessError;
use covenant_types::{Address, OperationId};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TimelockError {
    #[error("operation {id} is {current}, expected one of {expected:#06b}")]
    UnexpectedOperationState {
        id: OperationId,
        current: OperationState,
        /// Bitmap of acceptable states, see [`OperationState::bit`].
        expected: u8,
    },

    #[error("delay {delay} is below the minimum {min_delay}")]
    InsufficientDelay { delay: u64, min_delay: u64 },

    #[error("predecessor {predecessor} has not been executed")]
    UnexecutedPredecessor { predecessor: OperationId },

    #[error("{caller} is not the timelock")]
    UnauthorizedCaller { caller: Address },

    #[error("malformed timelock call: {0}")]
    InvalidCall(String),

    #[error("execution calls must be routed through an executor")]
    UnroutedExecution,

    #[error("access error: {0}")]
    Access(#[from] AccessError),
}
