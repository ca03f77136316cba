//! The governance engine.
//!
//! All entry points go through [`GovernanceEngine::transact`]: the clock is
//! read once, the executor batch is opened, and on error the batch is
//! aborted. Calls that touch a single component rely on it validating
//! before it writes. Calls that can reach several components (queueing,
//! execution, routed actions) snapshot the governor and the timelock first
//! and restore them on error; voting power and engine roles are never
//! written on those paths.
//!
//! Actions that target the governor or the timelock are routed back into
//! the engine, so a proposal can reconfigure its own governor and reentrant
//! calls meet the same gating as external ones. Those two addresses can only
//! act through routing: no public entry point accepts them as the caller.

use std::rc::Rc;

use covenant_access::{DefaultAdminRules, RoleStore};
use covenant_crypto::{governor_salt, role_id, Signature, SignatureVerifier};
use covenant_governance::{
    GovernanceError, Governor, GovernorCall, ProposalRequest, ProposalState,
};
use covenant_timelock::{OperationState, TimelockCall, TimelockController};
use covenant_types::{
    Action, ActionExecutor, Address, Clock, ClockMode, OperationId, ProposalId, RoleId, Salt,
    Timepoint,
};
use covenant_utils::format_duration;
use covenant_votes::VotesStore;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::EngineEvent;

/// May mint, burn and move voting units.
pub fn votes_operator_role() -> RoleId {
    role_id("VOTES_OPERATOR_ROLE")
}

/// May cancel any proposal that has not reached a terminal state.
pub fn guardian_role() -> RoleId {
    role_id("GUARDIAN_ROLE")
}

#[derive(Debug)]
struct EngineState {
    governor: Governor,
    votes: VotesStore,
    timelock: Option<TimelockController>,
    admin: DefaultAdminRules,
}

/// How a failed call is undone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rollback {
    /// One component validates, then writes. Nothing to undo.
    Validated,
    /// Governor and timelock are copied up front and restored on error.
    Snapshot,
}

/// Copy of the components a multi-step call can write.
struct Snapshot {
    governor: Governor,
    timelock: Option<TimelockController>,
}

/// Collaborators available to one call.
struct Env<'a> {
    executor: &'a mut dyn ActionExecutor,
    verifier: &'a dyn SignatureVerifier,
    now: Timepoint,
}

pub struct GovernanceEngine<E: ActionExecutor> {
    state: EngineState,
    clock: Rc<dyn Clock>,
    executor: E,
    verifier: Box<dyn SignatureVerifier>,
    events: Vec<EngineEvent>,
    #[cfg(test)]
    snapshots: usize,
}

impl<E: ActionExecutor> GovernanceEngine<E> {
    pub fn new(
        config: &EngineConfig,
        clock: Rc<dyn Clock>,
        executor: E,
        verifier: Box<dyn SignatureVerifier>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let mut governor = Governor::new(config.governor_address.clone(), &config.governor)?;

        let timelock = if config.use_timelock {
            let governor_address = [config.governor_address.clone()];
            governor = governor.with_executor(config.timelock_address.clone());
            Some(TimelockController::new(
                config.timelock_address.clone(),
                &config.timelock,
                &governor_address,
                &governor_address,
                None,
            ))
        } else {
            None
        };

        let admin =
            DefaultAdminRules::new(RoleStore::new(), config.admin.clone(), &config.admin_rules);

        tracing::info!(
            governor = %config.governor_address,
            timelock = ?timelock.as_ref().map(TimelockController::address),
            admin = %config.admin,
            clock = clock.mode().description(),
            "governance engine ready"
        );

        let mut engine = Self {
            state: EngineState {
                governor,
                votes: VotesStore::new(&config.votes),
                timelock,
                admin,
            },
            clock,
            executor,
            verifier,
            events: Vec::new(),
            #[cfg(test)]
            snapshots: 0,
        };
        engine.collect_events();
        Ok(engine)
    }

    // ── Views ────────────────────────────────────────────────────────────

    pub fn now(&self) -> Timepoint {
        self.clock.now()
    }

    pub fn clock_mode(&self) -> ClockMode {
        self.clock.mode()
    }

    pub fn governor(&self) -> &Governor {
        &self.state.governor
    }

    pub fn votes(&self) -> &VotesStore {
        &self.state.votes
    }

    pub fn timelock(&self) -> Option<&TimelockController> {
        self.state.timelock.as_ref()
    }

    pub fn admin(&self) -> &DefaultAdminRules {
        &self.state.admin
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Proposal state, with queued proposals resolved against the timelock.
    pub fn proposal_state(&self, id: &ProposalId) -> Result<ProposalState, EngineError> {
        self.state.proposal_state(id, self.clock.now())
    }

    /// Drain events of committed calls.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Proposals ────────────────────────────────────────────────────────

    /// Perform `action` on behalf of `sender`, routing governor and timelock
    /// targets into the engine.
    pub fn call(&mut self, sender: &Address, action: &Action) -> Result<Vec<u8>, EngineError> {
        self.transact("call", Rollback::Snapshot, |state, env| {
            state.check_external(sender)?;
            state.dispatch(sender, action, env)
        })
    }

    pub fn propose(
        &mut self,
        proposer: &Address,
        request: ProposalRequest,
    ) -> Result<ProposalId, EngineError> {
        self.transact("propose", Rollback::Validated, |state, env| {
            state.check_external(proposer)?;
            Ok(state
                .governor
                .propose(proposer, request, &state.votes, env.now)?)
        })
    }

    pub fn cast_vote(
        &mut self,
        voter: &Address,
        id: &ProposalId,
        support: u8,
        reason: &str,
    ) -> Result<u128, EngineError> {
        self.cast_vote_with_params(voter, id, support, reason, &[])
    }

    pub fn cast_vote_with_params(
        &mut self,
        voter: &Address,
        id: &ProposalId,
        support: u8,
        reason: &str,
        params: &[u8],
    ) -> Result<u128, EngineError> {
        self.transact("cast_vote", Rollback::Validated, |state, env| {
            state.check_external(voter)?;
            Ok(state
                .governor
                .cast_vote(id, voter, support, reason, params, &state.votes, env.now)?)
        })
    }

    pub fn cast_vote_by_sig(
        &mut self,
        voter: &Address,
        id: &ProposalId,
        support: u8,
        signature: &Signature,
    ) -> Result<u128, EngineError> {
        self.transact("cast_vote_by_sig", Rollback::Validated, |state, env| {
            state.check_external(voter)?;
            Ok(state.governor.cast_vote_by_sig(
                id,
                voter,
                support,
                signature,
                env.verifier,
                &state.votes,
                env.now,
            )?)
        })
    }

    /// Queue a succeeded proposal in the timelock. Returns its eta.
    pub fn queue(&mut self, id: &ProposalId) -> Result<Timepoint, EngineError> {
        self.transact("queue", Rollback::Snapshot, |state, env| state.queue(id, env.now))
    }

    pub fn execute(&mut self, id: &ProposalId) -> Result<(), EngineError> {
        self.transact("execute", Rollback::Snapshot, |state, env| state.execute(id, env))
    }

    /// Cancel `id`. Guardians may cancel any live proposal; anyone else only
    /// their own, and only while it is pending.
    pub fn cancel(&mut self, caller: &Address, id: &ProposalId) -> Result<(), EngineError> {
        self.transact("cancel", Rollback::Snapshot, |state, env| {
            state.check_external(caller)?;
            if state.admin.has_role(&guardian_role(), caller) {
                return state.cancel_internal(id, env.now);
            }
            state.governor.cancel(caller, id, &state.votes, env.now)?;
            Ok(())
        })
    }

    // ── Timelock ─────────────────────────────────────────────────────────

    pub fn schedule_operation(
        &mut self,
        caller: &Address,
        actions: &[Action],
        predecessor: Option<OperationId>,
        salt: Salt,
        delay: u64,
    ) -> Result<OperationId, EngineError> {
        self.transact("schedule_operation", Rollback::Validated, |state, env| {
            state.check_external(caller)?;
            let timelock = state.timelock.as_mut().ok_or(EngineError::NoTimelock)?;
            Ok(timelock.schedule_batch(caller, actions, predecessor, salt, delay, env.now)?)
        })
    }

    /// Schedule a single action, identified by its single-action hash.
    pub fn schedule_single_operation(
        &mut self,
        caller: &Address,
        action: Action,
        predecessor: Option<OperationId>,
        salt: Salt,
        delay: u64,
    ) -> Result<OperationId, EngineError> {
        self.transact("schedule_operation", Rollback::Validated, |state, env| {
            state.check_external(caller)?;
            let timelock = state.timelock.as_mut().ok_or(EngineError::NoTimelock)?;
            Ok(timelock.schedule(caller, action, predecessor, salt, delay, env.now)?)
        })
    }

    /// Run a ready batch operation, calls in order.
    pub fn execute_operation(
        &mut self,
        caller: &Address,
        actions: &[Action],
        predecessor: Option<OperationId>,
        salt: Salt,
    ) -> Result<(), EngineError> {
        self.transact("execute_operation", Rollback::Snapshot, |state, env| {
            state.check_external(caller)?;
            let id = state.operation_id(actions, predecessor.as_ref(), &salt)?;
            state.execute_operation(caller, id, actions, predecessor, env)
        })
    }

    /// Run a ready operation scheduled with [`schedule_single_operation`](Self::schedule_single_operation).
    pub fn execute_single_operation(
        &mut self,
        caller: &Address,
        action: &Action,
        predecessor: Option<OperationId>,
        salt: Salt,
    ) -> Result<(), EngineError> {
        self.transact("execute_operation", Rollback::Snapshot, |state, env| {
            state.check_external(caller)?;
            let timelock = state.timelock.as_ref().ok_or(EngineError::NoTimelock)?;
            let id = timelock.hash_operation(action, predecessor.as_ref(), &salt);
            state.execute_operation(caller, id, std::slice::from_ref(action), predecessor, env)
        })
    }

    pub fn cancel_operation(&mut self, caller: &Address, id: &OperationId) -> Result<(), EngineError> {
        self.transact("cancel_operation", Rollback::Validated, |state, env| {
            state.check_external(caller)?;
            let timelock = state.timelock.as_mut().ok_or(EngineError::NoTimelock)?;
            Ok(timelock.cancel(caller, id, env.now)?)
        })
    }

    // ── Voting power ─────────────────────────────────────────────────────

    pub fn mint(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<(), EngineError> {
        self.transfer_units(caller, None, Some(to), amount)
    }

    pub fn burn(&mut self, caller: &Address, from: &Address, amount: u128) -> Result<(), EngineError> {
        self.transfer_units(caller, Some(from), None, amount)
    }

    pub fn transfer(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), EngineError> {
        self.transfer_units(caller, Some(from), Some(to), amount)
    }

    pub fn delegate(
        &mut self,
        account: &Address,
        delegatee: Option<&Address>,
    ) -> Result<(), EngineError> {
        self.transact("delegate", Rollback::Validated, |state, env| {
            state.check_external(account)?;
            Ok(state.votes.delegate(account, delegatee, env.now)?)
        })
    }

    pub fn delegate_by_sig(
        &mut self,
        signer: &Address,
        delegatee: &Address,
        nonce: u64,
        expiry: Timepoint,
        signature: &Signature,
    ) -> Result<(), EngineError> {
        self.transact("delegate_by_sig", Rollback::Validated, |state, env| {
            state.check_external(signer)?;
            Ok(state.votes.delegate_by_sig(
                signer,
                delegatee,
                nonce,
                expiry,
                signature,
                env.verifier,
                env.now,
            )?)
        })
    }

    // ── Roles and admin rotation ─────────────────────────────────────────

    pub fn grant_role(
        &mut self,
        caller: &Address,
        role: &RoleId,
        account: &Address,
    ) -> Result<bool, EngineError> {
        self.transact("grant_role", Rollback::Validated, |state, _| {
            state.check_external(caller)?;
            Ok(state.admin.grant_role(caller, role, account)?)
        })
    }

    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: &RoleId,
        account: &Address,
    ) -> Result<bool, EngineError> {
        self.transact("revoke_role", Rollback::Validated, |state, _| {
            state.check_external(caller)?;
            Ok(state.admin.revoke_role(caller, role, account)?)
        })
    }

    pub fn renounce_role(
        &mut self,
        caller: &Address,
        role: &RoleId,
        confirmation: &Address,
    ) -> Result<bool, EngineError> {
        self.transact("renounce_role", Rollback::Validated, |state, env| {
            state.check_external(caller)?;
            Ok(state
                .admin
                .renounce_role(caller, role, confirmation, env.now)?)
        })
    }

    /// Make `admin_role` the role that administers `role`.
    pub fn set_role_admin(
        &mut self,
        caller: &Address,
        role: &RoleId,
        admin_role: &RoleId,
    ) -> Result<(), EngineError> {
        self.transact("set_role_admin", Rollback::Validated, |state, _| {
            state.check_external(caller)?;
            Ok(state.admin.set_role_admin(caller, role, admin_role)?)
        })
    }

    pub fn begin_admin_transfer(
        &mut self,
        caller: &Address,
        new_admin: Option<Address>,
    ) -> Result<Timepoint, EngineError> {
        self.transact("begin_admin_transfer", Rollback::Validated, |state, env| {
            state.check_external(caller)?;
            Ok(state.admin.begin_transfer(caller, new_admin, env.now)?)
        })
    }

    pub fn cancel_admin_transfer(&mut self, caller: &Address) -> Result<(), EngineError> {
        self.transact("cancel_admin_transfer", Rollback::Validated, |state, _| {
            state.check_external(caller)?;
            Ok(state.admin.cancel_transfer(caller)?)
        })
    }

    pub fn accept_admin_transfer(&mut self, caller: &Address) -> Result<(), EngineError> {
        self.transact("accept_admin_transfer", Rollback::Validated, |state, env| {
            state.check_external(caller)?;
            Ok(state.admin.accept_transfer(caller, env.now)?)
        })
    }

    pub fn change_admin_delay(
        &mut self,
        caller: &Address,
        new_delay: u64,
    ) -> Result<Timepoint, EngineError> {
        self.transact("change_admin_delay", Rollback::Validated, |state, env| {
            state.check_external(caller)?;
            Ok(state.admin.change_delay(caller, new_delay, env.now)?)
        })
    }

    pub fn rollback_admin_delay(&mut self, caller: &Address) -> Result<(), EngineError> {
        self.transact("rollback_admin_delay", Rollback::Validated, |state, env| {
            state.check_external(caller)?;
            Ok(state.admin.rollback_delay(caller, env.now)?)
        })
    }

    fn transfer_units(
        &mut self,
        caller: &Address,
        from: Option<&Address>,
        to: Option<&Address>,
        amount: u128,
    ) -> Result<(), EngineError> {
        self.transact("transfer_voting_units", Rollback::Validated, |state, env| {
            state.check_external(caller)?;
            state.admin.check_role(&votes_operator_role(), caller)?;
            Ok(state.votes.transfer_voting_units(from, to, amount, env.now)?)
        })
    }

    /// Run `f` atomically: commit the executor batch and keep the new state
    /// on success, abort the batch and undo per `rollback` on error.
    fn transact<T>(
        &mut self,
        op: &'static str,
        rollback: Rollback,
        f: impl FnOnce(&mut EngineState, &mut Env<'_>) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let now = self.clock.now();
        let snapshot = match rollback {
            Rollback::Validated => None,
            Rollback::Snapshot => {
                #[cfg(test)]
                {
                    self.snapshots += 1;
                }
                Some(self.state.snapshot())
            }
        };
        self.executor.begin_batch();

        let mut env = Env {
            executor: &mut self.executor,
            verifier: self.verifier.as_ref(),
            now,
        };
        match f(&mut self.state, &mut env) {
            Ok(value) => {
                self.executor.commit_batch();
                self.collect_events();
                Ok(value)
            }
            Err(err) => {
                self.executor.abort_batch();
                if let Some(snapshot) = snapshot {
                    self.state.restore(snapshot);
                }
                tracing::warn!(op, %now, error = %err, "call reverted, state rolled back");
                Err(err)
            }
        }
    }

    fn collect_events(&mut self) {
        let state = &mut self.state;
        self.events
            .extend(state.governor.take_events().into_iter().map(EngineEvent::from));
        if let Some(timelock) = state.timelock.as_mut() {
            self.events
                .extend(timelock.take_events().into_iter().map(EngineEvent::from));
        }
        self.events
            .extend(state.votes.take_events().into_iter().map(EngineEvent::from));
        self.events
            .extend(state.admin.take_events().into_iter().map(EngineEvent::from));
    }
}

impl EngineState {
    fn governor_address(&self) -> Address {
        self.governor.address().clone()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            governor: self.governor.clone(),
            timelock: self.timelock.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.governor = snapshot.governor;
        self.timelock = snapshot.timelock;
    }

    /// Reject the governor and the timelock as outside callers.
    fn check_external(&self, account: &Address) -> Result<(), EngineError> {
        let is_timelock = self
            .timelock
            .as_ref()
            .is_some_and(|timelock| timelock.address() == account);
        if account == self.governor.address() || is_timelock {
            return Err(EngineError::ReservedCaller {
                account: account.clone(),
            });
        }
        Ok(())
    }

    fn operation_id(
        &self,
        actions: &[Action],
        predecessor: Option<&OperationId>,
        salt: &Salt,
    ) -> Result<OperationId, EngineError> {
        let timelock = self.timelock.as_ref().ok_or(EngineError::NoTimelock)?;
        Ok(timelock.hash_operation_batch(actions, predecessor, salt))
    }

    fn proposal_state(&self, id: &ProposalId, now: Timepoint) -> Result<ProposalState, EngineError> {
        let state = self.governor.state(id, &self.votes, now)?;
        if !matches!(state, ProposalState::Queued | ProposalState::Expired) {
            return Ok(state);
        }
        let operation = self.governor.proposal_core(id)?.queued_operation;
        let (Some(timelock), Some(operation)) = (self.timelock.as_ref(), operation) else {
            return Ok(state);
        };
        Ok(match timelock.operation_state(&operation, now) {
            OperationState::Done => ProposalState::Executed,
            OperationState::Unset => ProposalState::Canceled,
            OperationState::Waiting | OperationState::Ready => state,
        })
    }

    fn require_state(
        &self,
        id: &ProposalId,
        allowed: &[ProposalState],
        now: Timepoint,
    ) -> Result<ProposalState, EngineError> {
        let current = self.proposal_state(id, now)?;
        if allowed.contains(&current) {
            return Ok(current);
        }
        Err(GovernanceError::UnexpectedProposalState {
            id: *id,
            current,
            expected: ProposalState::bitmap(allowed),
        }
        .into())
    }

    fn queue(&mut self, id: &ProposalId, now: Timepoint) -> Result<Timepoint, EngineError> {
        let details = self.governor.queue_request(id, &self.votes, now)?;
        let governor = self.governor_address();
        let Some(timelock) = self.timelock.as_mut() else {
            return Err(GovernanceError::QueueNotImplemented.into());
        };

        let salt = governor_salt(&governor, &details.description_hash);
        let delay = timelock.min_delay();
        let operation = timelock.schedule_batch(&governor, &details.actions, None, salt, delay, now)?;
        let eta = now.saturating_add(delay);
        tracing::debug!(proposal = ?id, ?operation, delay = %format_duration(delay), "proposal scheduled in timelock");
        self.governor.mark_queued(id, eta, Some(operation))?;
        Ok(eta)
    }

    fn execute(&mut self, id: &ProposalId, env: &mut Env<'_>) -> Result<(), EngineError> {
        self.require_state(
            id,
            &[ProposalState::Succeeded, ProposalState::Queued],
            env.now,
        )?;
        let details = self.governor.begin_execute(id, &self.votes, env.now)?;
        let governor = self.governor_address();

        if self.timelock.is_some() {
            let salt = governor_salt(&governor, &details.description_hash);
            let operation = self.operation_id(&details.actions, None, &salt)?;
            self.execute_operation(&governor, operation, &details.actions, None, env)?;
        } else {
            for action in &details.actions {
                self.dispatch(&governor, action, env)?;
            }
        }

        self.governor.finish_execute(id);
        Ok(())
    }

    fn cancel_internal(&mut self, id: &ProposalId, now: Timepoint) -> Result<(), EngineError> {
        let current = self.proposal_state(id, now)?;
        if current.is_terminal() {
            return Err(GovernanceError::UnexpectedProposalState {
                id: *id,
                current,
                expected: !ProposalState::bitmap(&[
                    ProposalState::Canceled,
                    ProposalState::Expired,
                    ProposalState::Executed,
                ]),
            }
            .into());
        }

        let operation = self.governor.cancel_unchecked(id, &self.votes, now)?;
        let governor = self.governor_address();
        if let (Some(timelock), Some(operation)) = (self.timelock.as_mut(), operation) {
            timelock.cancel(&governor, &operation, now)?;
        }
        Ok(())
    }

    /// Run operation `id` in the timelock: gate, dispatch each action with
    /// the timelock as sender, then re-check and mark it done.
    fn execute_operation(
        &mut self,
        caller: &Address,
        id: OperationId,
        actions: &[Action],
        predecessor: Option<OperationId>,
        env: &mut Env<'_>,
    ) -> Result<(), EngineError> {
        let timelock = self.timelock.as_ref().ok_or(EngineError::NoTimelock)?;
        timelock.check_executor(caller)?;
        timelock.before_call(&id, predecessor.as_ref(), env.now)?;
        let sender = timelock.address().clone();

        for action in actions {
            self.dispatch(&sender, action, env)?;
        }

        let timelock = self.timelock.as_mut().ok_or(EngineError::NoTimelock)?;
        timelock.after_call(&id, actions, env.now)?;
        Ok(())
    }

    /// Perform one action for `sender`.
    fn dispatch(
        &mut self,
        sender: &Address,
        action: &Action,
        env: &mut Env<'_>,
    ) -> Result<Vec<u8>, EngineError> {
        if action.target == *self.governor.address() {
            return self.governor_call(sender, action, env);
        }
        if let Some(timelock) = self.timelock.as_ref() {
            if action.target == *timelock.address() {
                return self.timelock_call(sender, action, env);
            }
        }
        Ok(env.executor.execute(sender, action)?)
    }

    fn governor_call(
        &mut self,
        sender: &Address,
        action: &Action,
        env: &mut Env<'_>,
    ) -> Result<Vec<u8>, EngineError> {
        let now = env.now;
        match GovernorCall::decode(&action.payload)? {
            GovernorCall::Propose(request) => {
                let id = self.governor.propose(sender, request, &self.votes, now)?;
                Ok(id.as_bytes().to_vec())
            }
            GovernorCall::CastVote {
                proposal_id,
                support,
                reason,
                params,
            } => {
                let weight = self.governor.cast_vote(
                    &proposal_id,
                    sender,
                    support,
                    &reason,
                    &params,
                    &self.votes,
                    now,
                )?;
                Ok(weight.to_be_bytes().to_vec())
            }
            GovernorCall::Queue { proposal_id } => {
                let eta = self.queue(&proposal_id, now)?;
                Ok(eta.as_u64().to_be_bytes().to_vec())
            }
            GovernorCall::Execute { proposal_id } => {
                self.execute(&proposal_id, env)?;
                Ok(Vec::new())
            }
            GovernorCall::Cancel { proposal_id } => {
                self.governor.check_governance(sender, &action.payload)?;
                self.cancel_internal(&proposal_id, now)?;
                Ok(Vec::new())
            }
            GovernorCall::Configure(update) => {
                self.governor.configure(sender, &action.payload, update, now)?;
                Ok(Vec::new())
            }
            GovernorCall::Relay { action: inner } => {
                self.governor.check_governance(sender, &action.payload)?;
                let governor = self.governor_address();
                self.dispatch(&governor, &inner, env)
            }
        }
    }

    fn timelock_call(
        &mut self,
        sender: &Address,
        action: &Action,
        env: &mut Env<'_>,
    ) -> Result<Vec<u8>, EngineError> {
        match TimelockCall::decode(&action.payload)? {
            TimelockCall::Execute {
                actions,
                predecessor,
                salt,
            } => {
                let id = self.operation_id(&actions, predecessor.as_ref(), &salt)?;
                self.execute_operation(sender, id, &actions, predecessor, env)?;
            }
            call => {
                let timelock = self.timelock.as_mut().ok_or(EngineError::NoTimelock)?;
                timelock.apply(sender, call, env.now)?;
            }
        }
        Ok(Vec::new())
    }
}
