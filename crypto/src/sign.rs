//! Signature verification for vote-by-signature and delegate-by-signature.
//!
//! The engine treats verification as an oracle: given a signer, a
//! structured-data digest and a signature, answer yes or no. The default
//! implementation checks Ed25519 signatures against registered public keys.

use covenant_types::Address;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// A 64-byte signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SigVisitor;

        impl<'de> serde::de::Visitor<'de> for SigVisitor {
            type Value = Signature;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "64 bytes")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                let arr: [u8; 64] = v
                    .try_into()
                    .map_err(|_| E::invalid_length(v.len(), &self))?;
                Ok(Signature(arr))
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> Result<Self::Value, A::Error> {
                let mut arr = [0u8; 64];
                for (i, byte) in arr.iter_mut().enumerate() {
                    *byte = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &self))?;
                }
                Ok(Signature(arr))
            }
        }

        deserializer.deserialize_bytes(SigVisitor)
    }
}

/// Boolean signature oracle.
pub trait SignatureVerifier {
    fn verify(&self, signer: &Address, digest: &[u8; 32], signature: &Signature) -> bool;
}

/// Ed25519 verifier over a registry of account public keys.
#[derive(Clone, Debug, Default)]
pub struct Ed25519Verifier {
    keys: HashMap<Address, VerifyingKey>,
}

impl Ed25519Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the public key of an account.
    ///
    /// Returns `false` if the bytes are not a valid Ed25519 point.
    pub fn register(&mut self, account: Address, public_key: &[u8; 32]) -> bool {
        match VerifyingKey::from_bytes(public_key) {
            Ok(key) => {
                self.keys.insert(account, key);
                true
            }
            Err(_) => false,
        }
    }

    pub fn is_registered(&self, account: &Address) -> bool {
        self.keys.contains_key(account)
    }
}

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, signer: &Address, digest: &[u8; 32], signature: &Signature) -> bool {
        let Some(key) = self.keys.get(signer) else {
            return false;
        };
        let dalek_sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        key.verify_strict(digest, &dalek_sig).is_ok()
    }
}

/// Sign a digest with a 32-byte Ed25519 seed.
pub fn sign_digest(digest: &[u8; 32], seed: &[u8; 32]) -> Signature {
    let signing_key = SigningKey::from_bytes(seed);
    Signature(signing_key.sign(digest).to_bytes())
}

/// Public key for a 32-byte Ed25519 seed.
pub fn public_key_from_seed(seed: &[u8; 32]) -> [u8; 32] {
    SigningKey::from_bytes(seed).verifying_key().to_bytes()
}
