//! Nullable action executor.

use covenant_types::{Action, ActionExecutor, Address, ExecutionError};
use std::collections::HashSet;

/// Records actions instead of performing them.
///
/// Calls made inside a batch are buffered and only appear in
/// [`executed`](Self::executed) once the batch commits. Calls outside any
/// batch are recorded immediately. Targets registered with
/// [`fail_on`](Self::fail_on) revert.
#[derive(Debug, Default)]
pub struct NullExecutor {
    committed: Vec<(Address, Action)>,
    pending: Vec<(Address, Action)>,
    depth: usize,
    failing: HashSet<Address>,
    aborted_batches: usize,
}

impl NullExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `target` revert.
    pub fn fail_on(&mut self, target: Address) {
        self.failing.insert(target);
    }

    pub fn clear_failures(&mut self) {
        self.failing.clear();
    }

    /// Committed `(sender, action)` pairs, in execution order.
    pub fn executed(&self) -> &[(Address, Action)] {
        &self.committed
    }

    pub fn aborted_batches(&self) -> usize {
        self.aborted_batches
    }
}

impl ActionExecutor for NullExecutor {
    fn begin_batch(&mut self) {
        self.depth += 1;
    }

    fn execute(&mut self, sender: &Address, action: &Action) -> Result<Vec<u8>, ExecutionError> {
        if self.failing.contains(&action.target) {
            return Err(ExecutionError::Reverted {
                target: action.target.clone(),
                reason: "forced failure".to_string(),
            });
        }
        let record = (sender.clone(), action.clone());
        if self.depth > 0 {
            self.pending.push(record);
        } else {
            self.committed.push(record);
        }
        Ok(Vec::new())
    }

    fn commit_batch(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.committed.append(&mut self.pending);
        }
    }

    fn abort_batch(&mut self) {
        self.depth = 0;
        self.pending.clear();
        self.aborted_batches += 1;
    }
}
