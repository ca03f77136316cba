//! Cryptographic primitives for the Covenant governance engine.
//!
//! - **Blake2b** for content-derived identifiers (proposals, operations, roles)
//! - Structured-data digests for ballots and delegations signed off-chain
//! - **Ed25519** signature verification behind the [`SignatureVerifier`] oracle

pub mod hash;
pub mod sign;
pub mod typed;

pub use hash::{
    blake2b_256, blake2b_256_multi, description_hash, governor_salt, hash_operation,
    hash_operation_batch, hash_proposal, role_id, FieldHasher,
};
pub use sign::{public_key_from_seed, sign_digest, Ed25519Verifier, Signature, SignatureVerifier};
pub use typed::{ballot_digest, delegation_digest};
