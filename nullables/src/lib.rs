//! Deterministic stand-ins for the engine's collaborators.
//!
//! The clock, the action executor and the signature verifier all sit behind
//! traits. The types here are driven by the test (or the scenario runner)
//! and record what the engine asked of them.

pub mod clock;
pub mod executor;
pub mod verifier;

pub use clock::NullClock;
pub use executor::NullExecutor;
pub use verifier::NullVerifier;
