//! Nullable signature verifier.

use covenant_crypto::{Signature, SignatureVerifier};
use covenant_types::Address;
use std::collections::HashSet;

/// Accepts signatures from registered signers only, whatever the bytes.
#[derive(Debug, Default)]
pub struct NullVerifier {
    accepted: HashSet<Address>,
}

impl NullVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept every signature claimed by `signer`.
    pub fn accept(&mut self, signer: Address) {
        self.accepted.insert(signer);
    }

    pub fn reject(&mut self, signer: &Address) {
        self.accepted.remove(signer);
    }
}

impl SignatureVerifier for NullVerifier {
    fn verify(&self, signer: &Address, _digest: &[u8; 32], _signature: &Signature) -> bool {
        self.accepted.contains(signer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_registered_signers() {
        let mut verifier = NullVerifier::new();
        let alice = Address::new("alice");
        let sig = Signature([0; 64]);
        assert!(!verifier.verify(&alice, &[0; 32], &sig));
        verifier.accept(alice.clone());
        assert!(verifier.verify(&alice, &[1; 32], &sig));
        verifier.reject(&alice);
        assert!(!verifier.verify(&alice, &[1; 32], &sig));
    }
}
