//! Calls an action can make on the governor itself.
//!
//! An action whose target is the governor's address carries a
//! bincode-encoded [`GovernorCall`] as its payload. The public entry points
//! act on behalf of the action's sender; [`SettingsUpdate`] and `Relay` are
//! governance-only.

use crate::error::GovernanceError;
use crate::proposal::ProposalRequest;
use covenant_types::{Action, Address, ProposalId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingsUpdate {
    VotingDelay(u64),
    VotingPeriod(u64),
    ProposalThreshold(u128),
    QuorumNumerator(u128),
    LateQuorumVoteExtension(u64),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernorCall {
    Propose(ProposalRequest),
    CastVote {
        proposal_id: ProposalId,
        support: u8,
        reason: String,
        params: Vec<u8>,
    },
    Queue {
        proposal_id: ProposalId,
    },
    Execute {
        proposal_id: ProposalId,
    },
    Cancel {
        proposal_id: ProposalId,
    },
    Configure(SettingsUpdate),
    /// Perform `action` with the governor as sender.
    Relay {
        action: Action,
    },
}

impl GovernorCall {
    pub fn encode(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap_or_default()
    }

    pub fn decode(payload: &[u8]) -> Result<Self, GovernanceError> {
        bincode::deserialize(payload).map_err(|e| GovernanceError::InvalidCall(e.to_string()))
    }

    /// An action that performs this call on the governor at `governor`.
    pub fn into_action(self, governor: &Address) -> Action {
        Action::new(governor.clone(), 0, self.encode())
    }
}
