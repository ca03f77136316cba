//! Fundamental types for the Covenant governance engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, content-derived identifiers, timepoints and clocks, actions and
//! the executor seam, and the genesis parameters.

pub mod action;
pub mod address;
pub mod hash;
pub mod params;
pub mod time;

pub use action::{Action, ActionExecutor, ExecutionError, LengthMismatch};
pub use address::{Address, EmptyAddress};
pub use hash::{OperationId, ProposalId, RoleId, Salt};
pub use params::{AdminParams, CountingMode, GovernorParams, TimelockParams, VotesParams};
pub use time::{Clock, ClockMode, SystemClock, Timepoint};
