//! Checkpointed voting power for the Covenant governance engine.
//!
//! Voting power is recorded as an append-only history per delegate plus a
//! total-supply history, so any past timepoint can be queried and power
//! acquired after a proposal's snapshot never counts toward it.
//!
//! - [`Trace`]: the checkpoint series and its lookups
//! - [`VotesStore`]: delegation, unit transfers, signed delegation
//! - [`VotingPowerSource`]: the read seam the governor depends on

pub mod checkpoints;
pub mod error;
pub mod events;
pub mod source;
pub mod store;

pub use checkpoints::{Checkpoint, Trace};
pub use error::{CheckpointError, VotesError};
pub use events::VotesEvent;
pub use source::VotingPowerSource;
pub use store::VotesStore;
