use covenant_types::{Action, Address, ProposalId, Timepoint};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    ProposalCreated {
        id: ProposalId,
        proposer: Address,
        actions: Vec<Action>,
        vote_start: Timepoint,
        vote_end: Timepoint,
        description: String,
    },
    VoteCast {
        voter: Address,
        id: ProposalId,
        support: u8,
        weight: u128,
        reason: String,
    },
    VoteCastWithParams {
        voter: Address,
        id: ProposalId,
        support: u8,
        weight: u128,
        reason: String,
        params: Vec<u8>,
    },
    ProposalExtended {
        id: ProposalId,
        extended_deadline: Timepoint,
    },
    ProposalQueued {
        id: ProposalId,
        eta: Timepoint,
    },
    ProposalExecuted {
        id: ProposalId,
    },
    ProposalCanceled {
        id: ProposalId,
    },
    VotingDelaySet {
        old: u64,
        new: u64,
    },
    VotingPeriodSet {
        old: u64,
        new: u64,
    },
    ProposalThresholdSet {
        old: u128,
        new: u128,
    },
    QuorumNumeratorUpdated {
        old: u128,
        new: u128,
    },
    LateQuorumVoteExtensionSet {
        old: u64,
        new: u64,
    },
}
