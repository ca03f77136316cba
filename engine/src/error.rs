use covenant_access::AccessError;
use covenant_governance::GovernanceError;
use covenant_timelock::TimelockError;
use covenant_types::{Address, ExecutionError};
use covenant_votes::VotesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("votes error: {0}")]
    Votes(#[from] VotesError),

    #[error("timelock error: {0}")]
    Timelock(#[from] TimelockError),

    #[error("access error: {0}")]
    Access(#[from] AccessError),

    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("{account} is an engine component and cannot call from outside")]
    ReservedCaller { account: Address },

    #[error("no timelock is configured")]
    NoTimelock,

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
