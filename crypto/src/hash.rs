//! Blake2b hashing for content-derived identifiers.
//!
//! Every identifier is hashed from a domain tag followed by length-prefixed
//! fields, so no two distinct field sequences share an encoding.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use covenant_types::{Action, Address, OperationId, ProposalId, RoleId, Salt};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Incremental hasher with length-prefixed fields.
pub struct FieldHasher {
    inner: Blake2b256,
}

impl FieldHasher {
    /// Start a hash under a domain tag.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Self {
            inner: Blake2b256::new(),
        };
        hasher.bytes(domain);
        hasher
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update((data.len() as u64).to_be_bytes());
        self.inner.update(data);
        self
    }

    pub fn address(&mut self, address: &Address) -> &mut Self {
        self.bytes(address.as_bytes())
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.inner.update(value.to_be_bytes());
        self
    }

    pub fn u128(&mut self, value: u128) -> &mut Self {
        self.inner.update(value.to_be_bytes());
        self
    }

    pub fn word(&mut self, word: &[u8; 32]) -> &mut Self {
        self.inner.update(word);
        self
    }

    fn action(&mut self, action: &Action) -> &mut Self {
        self.address(&action.target)
            .u128(action.value)
            .bytes(&action.payload)
    }

    fn actions(&mut self, actions: &[Action]) -> &mut Self {
        self.u64(actions.len() as u64);
        for action in actions {
            self.action(action);
        }
        self
    }

    pub fn finish(self) -> [u8; 32] {
        let result = self.inner.finalize();
        let mut output = [0u8; 32];
        output.copy_from_slice(&result);
        output
    }
}

/// Hash of a proposal's free-text description.
pub fn description_hash(description: &str) -> [u8; 32] {
    blake2b_256(description.as_bytes())
}

/// Deterministic proposal id.
///
/// Covers the ordered action list, the description hash, and the account the
/// proposal is reserved for (if any).
pub fn hash_proposal(
    actions: &[Action],
    description_hash: &[u8; 32],
    authorized_proposer: Option<&Address>,
) -> ProposalId {
    let mut hasher = FieldHasher::new(b"covenant.proposal.v1");
    hasher.actions(actions).word(description_hash);
    match authorized_proposer {
        Some(proposer) => hasher.u64(1).address(proposer),
        None => hasher.u64(0),
    };
    ProposalId::new(hasher.finish())
}

/// Id of a single-call timelock operation.
pub fn hash_operation(
    action: &Action,
    predecessor: Option<&OperationId>,
    salt: &Salt,
) -> OperationId {
    let mut hasher = FieldHasher::new(b"covenant.operation.v1");
    hasher
        .action(action)
        .word(predecessor.unwrap_or(&OperationId::ZERO).as_bytes())
        .word(salt.as_bytes());
    OperationId::new(hasher.finish())
}

/// Id of a batched timelock operation.
pub fn hash_operation_batch(
    actions: &[Action],
    predecessor: Option<&OperationId>,
    salt: &Salt,
) -> OperationId {
    let mut hasher = FieldHasher::new(b"covenant.operation-batch.v1");
    hasher
        .actions(actions)
        .word(predecessor.unwrap_or(&OperationId::ZERO).as_bytes())
        .word(salt.as_bytes());
    OperationId::new(hasher.finish())
}

/// Salt the governor uses when it queues a proposal in its timelock.
pub fn governor_salt(governor: &Address, description_hash: &[u8; 32]) -> Salt {
    let mut hasher = FieldHasher::new(b"covenant.governor-salt.v1");
    hasher.address(governor).word(description_hash);
    Salt::new(hasher.finish())
}

/// Role id derived from a role name.
pub fn role_id(name: &str) -> RoleId {
    let mut hasher = FieldHasher::new(b"covenant.role.v1");
    hasher.bytes(name.as_bytes());
    RoleId::new(hasher.finish())
}
