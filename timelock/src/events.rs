use covenant_access::AccessEvent;
use covenant_types::{Address, OperationId, Salt};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelockEvent {
    /// One per action of a scheduled operation.
    CallScheduled {
        id: OperationId,
        index: usize,
        target: Address,
        value: u128,
        payload: Vec<u8>,
        predecessor: Option<OperationId>,
        delay: u64,
    },
    /// Emitted alongside `CallScheduled` when the salt is non-zero.
    CallSalt { id: OperationId, salt: Salt },
    CallExecuted {
        id: OperationId,
        index: usize,
        target: Address,
        value: u128,
        payload: Vec<u8>,
    },
    Cancelled { id: OperationId },
    MinDelayChange { old_duration: u64, new_duration: u64 },
    Role(AccessEvent),
}
