//! Calls an action can make on the timelock itself.
//!
//! An action whose target is the timelock's address carries a
//! bincode-encoded [`TimelockCall`] as its payload.

use crate::error::TimelockError;
use covenant_types::{Action, Address, OperationId, RoleId, Salt};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelockCall {
    Schedule {
        actions: Vec<Action>,
        predecessor: Option<OperationId>,
        salt: Salt,
        delay: u64,
    },
    Execute {
        actions: Vec<Action>,
        predecessor: Option<OperationId>,
        salt: Salt,
    },
    Cancel {
        id: OperationId,
    },
    UpdateDelay {
        new_delay: u64,
    },
    GrantRole {
        role: RoleId,
        account: Address,
    },
    RevokeRole {
        role: RoleId,
        account: Address,
    },
}

impl TimelockCall {
    pub fn encode(&self) -> Vec<u8> {
        // Serializing an owned enum of plain data into a Vec cannot fail.
        bincode::serialize(self).unwrap_or_default()
    }

    pub fn decode(payload: &[u8]) -> Result<Self, TimelockError> {
        bincode::deserialize(payload).map_err(|e| TimelockError::InvalidCall(e.to_string()))
    }

    /// An action that performs this call on the timelock at `timelock`.
    pub fn into_action(self, timelock: &Address) -> Action {
        Action::new(timelock.clone(), 0, self.encode())
    }
}
