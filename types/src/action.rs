//! Actions and the executor that applies them.

use crate::address::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single effect: call `target` with `value` attached and an opaque `payload`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub target: Address,
    pub value: u128,
    pub payload: Vec<u8>,
}

impl Action {
    pub fn new(target: Address, value: u128, payload: Vec<u8>) -> Self {
        Self {
            target,
            value,
            payload,
        }
    }

    /// Zip parallel target/value/payload lists into actions.
    pub fn zip(
        targets: Vec<Address>,
        values: Vec<u128>,
        payloads: Vec<Vec<u8>>,
    ) -> Result<Vec<Action>, LengthMismatch> {
        if targets.len() != values.len() || targets.len() != payloads.len() {
            return Err(LengthMismatch {
                targets: targets.len(),
                values: values.len(),
                payloads: payloads.len(),
            });
        }
        Ok(targets
            .into_iter()
            .zip(values)
            .zip(payloads)
            .map(|((target, value), payload)| Action::new(target, value, payload))
            .collect())
    }
}

/// Parallel action lists of different lengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("action lists differ in length: {targets} targets, {values} values, {payloads} payloads")]
pub struct LengthMismatch {
    pub targets: usize,
    pub values: usize,
    pub payloads: usize,
}

/// Failure reported by an [`ActionExecutor`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("call to {target} reverted: {reason}")]
    Reverted { target: Address, reason: String },

    #[error("insufficient value: need {needed}, have {available}")]
    InsufficientValue { needed: u128, available: u128 },

    #[error("{0}")]
    Other(String),
}

/// Applies actions to the world outside the engine.
///
/// Calls between `begin_batch` and `commit_batch` must become visible
/// together; `abort_batch` discards every effect of the open batch.
pub trait ActionExecutor {
    fn begin_batch(&mut self);

    /// Perform one action on behalf of `sender`, returning its output.
    fn execute(&mut self, sender: &Address, action: &Action) -> Result<Vec<u8>, ExecutionError>;

    fn commit_batch(&mut self);

    fn abort_batch(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_matches_lengths() {
        let actions = Action::zip(
            vec![Address::new("a"), Address::new("b")],
            vec![0, 5],
            vec![vec![], vec![1, 2]],
        )
        .unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1].value, 5);
        assert_eq!(actions[1].payload, vec![1, 2]);
    }

    #[test]
    fn zip_rejects_mismatch() {
        let err = Action::zip(vec![Address::new("a")], vec![], vec![vec![]]).unwrap_err();
        assert_eq!(
            err,
            LengthMismatch {
                targets: 1,
                values: 0,
                payloads: 1
            }
        );
    }
}
