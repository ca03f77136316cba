//! Timelock for the Covenant governance engine.
//!
//! Operations (one action or an ordered batch) are scheduled with a delay of
//! at least `min_delay`, become ready once the delay has elapsed, and are
//! executed at most once. An operation may name a predecessor that must be
//! executed first.

pub mod calls;
pub mod controller;
pub mod error;
pub mod events;
pub mod operation;

pub use calls::TimelockCall;
pub use controller::{canceller_role, executor_role, proposer_role, TimelockController};
pub use error::TimelockError;
pub use events::TimelockEvent;
pub use operation::OperationState;
