//! Covenant governance engine.
//!
//! The engine composes the proposal ledger, the voting-power store, an
//! optional timelock and the default-admin rules behind one serialized
//! entry point. Every call reads the clock once and either commits with the
//! executor batch or aborts it. Single-step calls validate before they write;
//! multi-step calls snapshot the governor and the timelock and restore them
//! on error.

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod logging;

pub use config::EngineConfig;
pub use engine::{guardian_role, votes_operator_role, GovernanceEngine};
pub use error::EngineError;
pub use events::EngineEvent;
pub use logging::{init_logging, LogFormat};
