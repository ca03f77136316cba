//! Per-proposal vote accumulation.

use covenant_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One voter's recorded ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub support: u8,
    /// Voting power at the snapshot.
    pub weight: u128,
    /// Part of `weight` that went into the buckets.
    pub counted: u128,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalVote {
    pub against: u128,
    pub for_votes: u128,
    pub abstain: u128,
    receipts: HashMap<Address, VoteReceipt>,
}

impl ProposalVote {
    pub fn has_voted(&self, voter: &Address) -> bool {
        self.receipts.contains_key(voter)
    }

    pub fn receipt(&self, voter: &Address) -> Option<&VoteReceipt> {
        self.receipts.get(voter)
    }

    pub fn voters(&self) -> usize {
        self.receipts.len()
    }

    pub fn add(&mut self, against: u128, for_votes: u128, abstain: u128) {
        self.against = self.against.saturating_add(against);
        self.for_votes = self.for_votes.saturating_add(for_votes);
        self.abstain = self.abstain.saturating_add(abstain);
    }

    pub(crate) fn record(&mut self, voter: Address, receipt: VoteReceipt) {
        self.receipts.insert(voter, receipt);
    }
}
