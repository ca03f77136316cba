//! The timelock controller.
//!
//! Execution is split into [`before_call`](TimelockController::before_call)
//! and [`after_call`](TimelockController::after_call) around the calls
//! themselves. The operation must be ready on both sides, so a call that
//! reentrantly executes or cancels the same operation makes the outer
//! execution fail.

use crate::calls::TimelockCall;
use crate::error::TimelockError;
use crate::events::TimelockEvent;
use crate::operation::{Operation, OperationState};
use covenant_access::{PermissionStore, RoleStore, DEFAULT_ADMIN_ROLE};
use covenant_crypto::{hash_operation, hash_operation_batch, role_id};
use covenant_types::{
    Action, Address, OperationId, RoleId, Salt, Timepoint, TimelockParams,
};
use std::collections::HashMap;

pub fn proposer_role() -> RoleId {
    role_id("PROPOSER_ROLE")
}

pub fn executor_role() -> RoleId {
    role_id("EXECUTOR_ROLE")
}

pub fn canceller_role() -> RoleId {
    role_id("CANCELLER_ROLE")
}

#[derive(Clone, Debug)]
pub struct TimelockController {
    address: Address,
    roles: RoleStore,
    operations: HashMap<OperationId, Operation>,
    min_delay: u64,
    open_execution: bool,
    events: Vec<TimelockEvent>,
}

impl TimelockController {
    /// Create a timelock at `address`.
    ///
    /// The timelock administers its own roles. `admin`, if given, also
    /// receives the admin role and should renounce it once set up.
    /// Proposers may also cancel.
    pub fn new(
        address: Address,
        params: &TimelockParams,
        proposers: &[Address],
        executors: &[Address],
        admin: Option<&Address>,
    ) -> Self {
        let mut roles = RoleStore::new();
        roles.grant_unchecked(&DEFAULT_ADMIN_ROLE, &address, &address);
        if let Some(admin) = admin {
            roles.grant_unchecked(&DEFAULT_ADMIN_ROLE, admin, &address);
        }
        for proposer in proposers {
            roles.grant_unchecked(&proposer_role(), proposer, &address);
            roles.grant_unchecked(&canceller_role(), proposer, &address);
        }
        for executor in executors {
            roles.grant_unchecked(&executor_role(), executor, &address);
        }

        let mut timelock = Self {
            address,
            roles,
            operations: HashMap::new(),
            min_delay: params.min_delay,
            open_execution: params.open_execution,
            events: Vec::new(),
        };
        timelock.events.push(TimelockEvent::MinDelayChange {
            old_duration: 0,
            new_duration: params.min_delay,
        });
        timelock
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn min_delay(&self) -> u64 {
        self.min_delay
    }

    pub fn open_execution(&self) -> bool {
        self.open_execution
    }

    pub fn has_role(&self, role: &RoleId, account: &Address) -> bool {
        self.roles.has_role(role, account)
    }

    pub fn roles(&self) -> &RoleStore {
        &self.roles
    }

    pub fn hash_operation(
        &self,
        action: &Action,
        predecessor: Option<&OperationId>,
        salt: &Salt,
    ) -> OperationId {
        hash_operation(action, predecessor, salt)
    }

    pub fn hash_operation_batch(
        &self,
        actions: &[Action],
        predecessor: Option<&OperationId>,
        salt: &Salt,
    ) -> OperationId {
        hash_operation_batch(actions, predecessor, salt)
    }

    pub fn operation_state(&self, id: &OperationId, now: Timepoint) -> OperationState {
        match self.operations.get(id) {
            None => OperationState::Unset,
            Some(op) if op.done => OperationState::Done,
            Some(op) if op.ready_at > now => OperationState::Waiting,
            Some(_) => OperationState::Ready,
        }
    }

    /// Whether `id` is tracked at all (pending or done).
    pub fn is_operation(&self, id: &OperationId) -> bool {
        self.operations.contains_key(id)
    }

    pub fn is_operation_pending(&self, id: &OperationId, now: Timepoint) -> bool {
        self.operation_state(id, now).is_pending()
    }

    pub fn is_operation_ready(&self, id: &OperationId, now: Timepoint) -> bool {
        self.operation_state(id, now) == OperationState::Ready
    }

    pub fn is_operation_done(&self, id: &OperationId) -> bool {
        self.operations.get(id).is_some_and(|op| op.done)
    }

    /// Time at which `id` becomes ready, if it is tracked.
    pub fn timestamp(&self, id: &OperationId) -> Option<Timepoint> {
        self.operations.get(id).map(|op| op.ready_at)
    }

    /// Schedule a single action.
    pub fn schedule(
        &mut self,
        caller: &Address,
        action: Action,
        predecessor: Option<OperationId>,
        salt: Salt,
        delay: u64,
        now: Timepoint,
    ) -> Result<OperationId, TimelockError> {
        self.roles.check_role(&proposer_role(), caller)?;
        let id = hash_operation(&action, predecessor.as_ref(), &salt);
        self.insert_operation(id, delay, now)?;
        self.emit_scheduled(id, std::slice::from_ref(&action), predecessor, salt, delay);
        Ok(id)
    }

    /// Schedule an ordered batch as one operation.
    pub fn schedule_batch(
        &mut self,
        caller: &Address,
        actions: &[Action],
        predecessor: Option<OperationId>,
        salt: Salt,
        delay: u64,
        now: Timepoint,
    ) -> Result<OperationId, TimelockError> {
        self.roles.check_role(&proposer_role(), caller)?;
        let id = hash_operation_batch(actions, predecessor.as_ref(), &salt);
        self.insert_operation(id, delay, now)?;
        self.emit_scheduled(id, actions, predecessor, salt, delay);
        Ok(id)
    }

    /// Cancel a pending operation.
    pub fn cancel(
        &mut self,
        caller: &Address,
        id: &OperationId,
        now: Timepoint,
    ) -> Result<(), TimelockError> {
        self.roles.check_role(&canceller_role(), caller)?;
        let current = self.operation_state(id, now);
        if !current.is_pending() {
            return Err(TimelockError::UnexpectedOperationState {
                id: *id,
                current,
                expected: OperationState::bitmap(&[OperationState::Waiting, OperationState::Ready]),
            });
        }
        self.operations.remove(id);
        tracing::info!(operation = ?id, "operation cancelled");
        self.events.push(TimelockEvent::Cancelled { id: *id });
        Ok(())
    }

    /// Fail unless `caller` may execute operations.
    pub fn check_executor(&self, caller: &Address) -> Result<(), TimelockError> {
        if self.open_execution {
            return Ok(());
        }
        self.roles.check_role(&executor_role(), caller)?;
        Ok(())
    }

    /// Gate the start of an execution: the operation must be ready and its
    /// predecessor, if any, done.
    pub fn before_call(
        &self,
        id: &OperationId,
        predecessor: Option<&OperationId>,
        now: Timepoint,
    ) -> Result<(), TimelockError> {
        self.require_ready(id, now)?;
        if let Some(predecessor) = predecessor {
            if !self.is_operation_done(predecessor) {
                return Err(TimelockError::UnexecutedPredecessor {
                    predecessor: *predecessor,
                });
            }
        }
        Ok(())
    }

    /// Finish an execution: re-check readiness, then mark the operation done.
    pub fn after_call(
        &mut self,
        id: &OperationId,
        actions: &[Action],
        now: Timepoint,
    ) -> Result<(), TimelockError> {
        self.require_ready(id, now)?;
        if let Some(op) = self.operations.get_mut(id) {
            op.done = true;
        }
        for (index, action) in actions.iter().enumerate() {
            self.events.push(TimelockEvent::CallExecuted {
                id: *id,
                index,
                target: action.target.clone(),
                value: action.value,
                payload: action.payload.clone(),
            });
        }
        tracing::info!(operation = ?id, calls = actions.len(), "operation executed");
        Ok(())
    }

    /// Change the minimum delay. Only the timelock itself may call.
    pub fn update_delay(&mut self, caller: &Address, new_delay: u64) -> Result<(), TimelockError> {
        if *caller != self.address {
            return Err(TimelockError::UnauthorizedCaller {
                caller: caller.clone(),
            });
        }
        tracing::info!(old = self.min_delay, new = new_delay, "timelock min delay changed");
        self.events.push(TimelockEvent::MinDelayChange {
            old_duration: self.min_delay,
            new_duration: new_delay,
        });
        self.min_delay = new_delay;
        Ok(())
    }

    pub fn grant_role(
        &mut self,
        caller: &Address,
        role: &RoleId,
        account: &Address,
    ) -> Result<bool, TimelockError> {
        Ok(self.roles.grant_role(caller, role, account)?)
    }

    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: &RoleId,
        account: &Address,
    ) -> Result<bool, TimelockError> {
        Ok(self.roles.revoke_role(caller, role, account)?)
    }

    pub fn renounce_role(
        &mut self,
        caller: &Address,
        role: &RoleId,
        confirmation: &Address,
    ) -> Result<bool, TimelockError> {
        Ok(self.roles.renounce_role(caller, role, confirmation)?)
    }

    /// Apply a decoded call made by `sender`.
    ///
    /// Execution needs an executor and is rejected here; the caller drives
    /// `before_call`/`after_call` around the calls instead.
    pub fn apply(
        &mut self,
        sender: &Address,
        call: TimelockCall,
        now: Timepoint,
    ) -> Result<(), TimelockError> {
        match call {
            TimelockCall::Schedule {
                actions,
                predecessor,
                salt,
                delay,
            } => self
                .schedule_batch(sender, &actions, predecessor, salt, delay, now)
                .map(|_| ()),
            TimelockCall::Cancel { id } => self.cancel(sender, &id, now),
            TimelockCall::UpdateDelay { new_delay } => self.update_delay(sender, new_delay),
            TimelockCall::GrantRole { role, account } => {
                self.grant_role(sender, &role, &account).map(|_| ())
            }
            TimelockCall::RevokeRole { role, account } => {
                self.revoke_role(sender, &role, &account).map(|_| ())
            }
            TimelockCall::Execute { .. } => Err(TimelockError::UnroutedExecution),
        }
    }

    /// Drain events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<TimelockEvent> {
        let mut events: Vec<TimelockEvent> = self
            .roles
            .take_events()
            .into_iter()
            .map(TimelockEvent::Role)
            .collect();
        events.append(&mut self.events);
        events
    }

    fn require_ready(&self, id: &OperationId, now: Timepoint) -> Result<(), TimelockError> {
        let current = self.operation_state(id, now);
        if current != OperationState::Ready {
            return Err(TimelockError::UnexpectedOperationState {
                id: *id,
                current,
                expected: OperationState::Ready.bit(),
            });
        }
        Ok(())
    }

    fn insert_operation(
        &mut self,
        id: OperationId,
        delay: u64,
        now: Timepoint,
    ) -> Result<(), TimelockError> {
        if self.is_operation(&id) {
            return Err(TimelockError::UnexpectedOperationState {
                id,
                current: self.operation_state(&id, now),
                expected: OperationState::Unset.bit(),
            });
        }
        if delay < self.min_delay {
            return Err(TimelockError::InsufficientDelay {
                delay,
                min_delay: self.min_delay,
            });
        }
        self.operations.insert(
            id,
            Operation {
                ready_at: now.saturating_add(delay),
                done: false,
            },
        );
        Ok(())
    }

    fn emit_scheduled(
        &mut self,
        id: OperationId,
        actions: &[Action],
        predecessor: Option<OperationId>,
        salt: Salt,
        delay: u64,
    ) {
        for (index, action) in actions.iter().enumerate() {
            self.events.push(TimelockEvent::CallScheduled {
                id,
                index,
                target: action.target.clone(),
                value: action.value,
                payload: action.payload.clone(),
                predecessor,
                delay,
            });
        }
        if !salt.is_zero() {
            self.events.push(TimelockEvent::CallSalt { id, salt });
        }
        tracing::info!(operation = ?id, calls = actions.len(), delay, "operation scheduled");
    }
}
