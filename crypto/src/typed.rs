//! Structured-data digests that off-chain signers sign.

use crate::hash::FieldHasher;
use covenant_types::{Address, ProposalId, Timepoint};

/// Digest of a ballot cast by signature.
///
/// Binds the governor (by name and address), the proposal, the support
/// option, the voter and the voter's current nonce.
pub fn ballot_digest(
    governor_name: &str,
    governor: &Address,
    proposal_id: &ProposalId,
    support: u8,
    voter: &Address,
    nonce: u64,
) -> [u8; 32] {
    let mut hasher = FieldHasher::new(b"covenant.ballot.v1");
    hasher
        .bytes(governor_name.as_bytes())
        .address(governor)
        .word(proposal_id.as_bytes())
        .u64(support as u64)
        .address(voter)
        .u64(nonce);
    hasher.finish()
}

/// Digest of a delegation made by signature.
pub fn delegation_digest(delegatee: &Address, nonce: u64, expiry: Timepoint) -> [u8; 32] {
    let mut hasher = FieldHasher::new(b"covenant.delegation.v1");
    hasher
        .address(delegatee)
        .u64(nonce)
        .u64(expiry.as_u64());
    hasher.finish()
}
