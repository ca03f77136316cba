use crate::proposal::ProposalState;
use covenant_types::{Address, ProposalId};
use covenant_votes::VotesError;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GovernanceError {
    #[error("proposal {0} does not exist")]
    NonexistentProposal(ProposalId),

    #[error("proposal {id} is {current}, expected one of {expected:#010b}")]
    UnexpectedProposalState {
        id: ProposalId,
        current: ProposalState,
        /// Bitmap of acceptable states, see [`ProposalState::bit`]. Zero when
        /// no state is acceptable (the proposal must not exist).
        expected: u8,
    },

    #[error("invalid proposal length: {targets} targets, {values} values, {payloads} payloads")]
    InvalidProposalLength {
        targets: usize,
        values: usize,
        payloads: usize,
    },

    #[error("{proposer} may not submit this proposal")]
    RestrictedProposer { proposer: Address },

    #[error("{proposer} has {votes} votes, needs {threshold} to propose")]
    InsufficientProposerVotes {
        proposer: Address,
        votes: u128,
        threshold: u128,
    },

    #[error("{voter} already voted")]
    AlreadyCastVote { voter: Address },

    #[error("invalid vote type {0}")]
    InvalidVoteType(u8),

    #[error("invalid vote params")]
    InvalidVoteParams,

    #[error("{voter} cast {used} votes but has only {remaining}")]
    ExceedRemainingWeight {
        voter: Address,
        used: u128,
        remaining: u128,
    },

    #[error("only the proposer may cancel: {account}")]
    OnlyProposer { account: Address },

    #[error("only the executor may call: {account}")]
    OnlyExecutor { account: Address },

    #[error("governance call was not part of the executing proposal")]
    UnexpectedGovernanceCall,

    #[error("voting period must be positive")]
    InvalidVotingPeriod,

    #[error("invalid quorum fraction {numerator}/{denominator}")]
    InvalidQuorumFraction { numerator: u128, denominator: u128 },

    #[error("queueing requires a timelock")]
    QueueNotImplemented,

    #[error("invalid signature for {voter}")]
    InvalidSignature { voter: Address },

    #[error("malformed governor call: {0}")]
    InvalidCall(String),

    #[error("votes error: {0}")]
    Votes(#[from] VotesError),
}
