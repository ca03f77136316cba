//! Proposal records and lifecycle states.

use crate::error::GovernanceError;
use covenant_crypto::{description_hash, hash_proposal};
use covenant_types::{Action, Address, OperationId, ProposalId, Timepoint};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    Pending,
    Active,
    Canceled,
    Defeated,
    Succeeded,
    Queued,
    Expired,
    Executed,
}

impl ProposalState {
    /// Bit of this state in a state bitmap.
    pub fn bit(self) -> u8 {
        1 << self as u8
    }

    pub fn bitmap(states: &[ProposalState]) -> u8 {
        states.iter().fold(0, |acc, s| acc | s.bit())
    }

    /// No transition leaves a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Canceled | Self::Expired | Self::Executed)
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::Defeated => "defeated",
            Self::Succeeded => "succeeded",
            Self::Queued => "queued",
            Self::Expired => "expired",
            Self::Executed => "executed",
        };
        f.write_str(name)
    }
}

/// What a proposer submits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRequest {
    pub actions: Vec<Action>,
    pub description: String,
    /// Only this account may submit the proposal. Part of the proposal id,
    /// so nobody can front-run the intended proposer with the same content.
    #[serde(default)]
    pub authorized_proposer: Option<Address>,
}

impl ProposalRequest {
    pub fn new(actions: Vec<Action>, description: impl Into<String>) -> Self {
        Self {
            actions,
            description: description.into(),
            authorized_proposer: None,
        }
    }

    /// Build from parallel target/value/payload lists.
    pub fn from_parts(
        targets: Vec<Address>,
        values: Vec<u128>,
        payloads: Vec<Vec<u8>>,
        description: impl Into<String>,
    ) -> Result<Self, GovernanceError> {
        let actions = Action::zip(targets, values, payloads).map_err(|m| {
            GovernanceError::InvalidProposalLength {
                targets: m.targets,
                values: m.values,
                payloads: m.payloads,
            }
        })?;
        Ok(Self::new(actions, description))
    }

    pub fn restricted_to(mut self, proposer: Address) -> Self {
        self.authorized_proposer = Some(proposer);
        self
    }

    pub fn description_hash(&self) -> [u8; 32] {
        description_hash(&self.description)
    }

    pub fn id(&self) -> ProposalId {
        hash_proposal(
            &self.actions,
            &self.description_hash(),
            self.authorized_proposer.as_ref(),
        )
    }
}

/// Lifecycle data of a proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalCore {
    pub proposer: Address,
    /// Voting power is read at this timepoint; voting opens right after it.
    pub vote_start: Timepoint,
    pub vote_duration: u64,
    pub executed: bool,
    pub canceled: bool,
    /// Set once queued.
    pub eta: Option<Timepoint>,
    /// Timelock operation the proposal was queued as, if any.
    pub queued_operation: Option<OperationId>,
    /// Deadline pushed out by late-quorum protection.
    pub extended_deadline: Option<Timepoint>,
}

impl ProposalCore {
    pub fn deadline(&self) -> Timepoint {
        let base = self.vote_start.saturating_add(self.vote_duration);
        match self.extended_deadline {
            Some(extended) if extended > base => extended,
            _ => base,
        }
    }
}

/// The content of a proposal, kept for enumeration and execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDetails {
    pub actions: Vec<Action>,
    pub description_hash: [u8; 32],
    pub authorized_proposer: Option<Address>,
}
