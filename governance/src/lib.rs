//! Proposal ledger for the Covenant governance engine.
//!
//! A proposal is an ordered list of actions plus a description. It moves
//! through `Pending → Active → {Defeated, Succeeded} → Queued → Executed`,
//! and may be canceled before it reaches a terminal state. Votes are
//! weighted by delegated voting power at the proposal's snapshot.
//!
//! - [`Governor`]: proposals, votes, settings, governance-only calls
//! - [`CountingPolicy`]: how cast weight is tallied ([`SimpleCounting`],
//!   [`FractionalCounting`])
//! - [`QuorumFraction`]: quorum as a checkpointed fraction of past supply

pub mod calls;
pub mod counting;
pub mod error;
pub mod events;
pub mod governor;
pub mod proposal;
pub mod quorum;
pub mod settings;
pub mod tally;

pub use calls::{GovernorCall, SettingsUpdate};
pub use counting::{
    fractional_params, policy_for, CountingPolicy, FractionalCounting, SimpleCounting, Support,
};
pub use error::GovernanceError;
pub use events::GovernanceEvent;
pub use governor::Governor;
pub use proposal::{ProposalCore, ProposalDetails, ProposalRequest, ProposalState};
pub use quorum::QuorumFraction;
pub use settings::GovernorSettings;
pub use tally::{ProposalVote, VoteReceipt};
