//! Account address type.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An account identifier on the governance ledger.
///
/// Addresses are opaque, non-empty strings. Components (the governor, the
/// timelock) have addresses of their own so that actions can target them.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Address(String);

/// An empty string was offered as an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("address must not be empty")]
pub struct EmptyAddress;

impl Address {
    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is empty.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(!s.is_empty(), "address must not be empty");
        Self(s)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw bytes used when the address takes part in a hash.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl TryFrom<String> for Address {
    type Error = EmptyAddress;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.is_empty() {
            return Err(EmptyAddress);
        }
        Ok(Self(s))
    }
}
