//! Events emitted by the voting-power store.

use covenant_types::Address;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotesEvent {
    /// `delegator` moved its voting units from one delegate to another.
    DelegateChanged {
        delegator: Address,
        from_delegate: Option<Address>,
        to_delegate: Option<Address>,
    },
    /// A delegate's voting power changed.
    DelegateVotesChanged {
        delegate: Address,
        previous_votes: u128,
        new_votes: u128,
    },
}
