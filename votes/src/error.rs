//! Voting-power store errors.

use covenant_types::{Address, Timepoint};
use thiserror::Error;

/// Checkpoint history violations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CheckpointError {
    #[error("checkpoint key {key} precedes latest key {last}")]
    UnorderedInsertion { last: Timepoint, key: Timepoint },

    #[error("checkpoint value overflow")]
    Overflow,

    #[error("checkpoint value underflow: latest {latest}, delta {delta}")]
    Underflow { latest: u128, delta: u128 },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VotesError {
    #[error("lookup at {timepoint} is not in the past (clock is {clock})")]
    FutureLookup { timepoint: Timepoint, clock: Timepoint },

    #[error("total supply {supply} exceeds safe supply {cap}")]
    ExceededSafeSupply { supply: u128, cap: u128 },

    #[error("{holder} holds {available} voting units, cannot move {needed}")]
    InsufficientUnits {
        holder: Address,
        needed: u128,
        available: u128,
    },

    #[error("invalid nonce for {account}: expected {expected}")]
    InvalidAccountNonce { account: Address, expected: u64 },

    #[error("signature expired at {expiry}")]
    SignatureExpired { expiry: Timepoint },

    #[error("invalid signature for {signer}")]
    InvalidSignature { signer: Address },

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}
