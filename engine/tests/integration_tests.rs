//! End-to-end tests of the governance engine on a deterministic clock and
//! executor.

use std::rc::Rc;

use covenant_access::{AccessError, AccessEvent, DEFAULT_ADMIN_ROLE};
use covenant_crypto::{governor_salt, Signature};
use covenant_engine::{
    guardian_role, votes_operator_role, EngineConfig, EngineError, EngineEvent, GovernanceEngine,
};
use covenant_governance::{
    GovernanceError, GovernanceEvent, GovernorCall, ProposalRequest, ProposalState, SettingsUpdate,
};
use covenant_nullables::{NullClock, NullExecutor, NullVerifier};
use covenant_timelock::{proposer_role, OperationState, TimelockCall, TimelockError};
use covenant_types::{Action, Address, ProposalId, Salt, Timepoint};

const MIN_DELAY: u64 = 86_400;

fn addr(name: &str) -> Address {
    Address::new(name)
}

fn config(use_timelock: bool) -> EngineConfig {
    let mut config = EngineConfig {
        use_timelock,
        ..EngineConfig::default()
    };
    config.governor.voting_delay = 10;
    config.governor.voting_period = 100;
    config.timelock.min_delay = MIN_DELAY;
    config.admin_rules.initial_delay = 86_400;
    config
}

struct Harness {
    engine: GovernanceEngine<NullExecutor>,
    clock: Rc<NullClock>,
}

impl Harness {
    fn new(config: EngineConfig) -> Self {
        Self::with_verifier(config, NullVerifier::new())
    }

    /// alice 600, bob 300, carol 100, self-delegated at t=0; clock left at 1.
    fn with_verifier(config: EngineConfig, verifier: NullVerifier) -> Self {
        let clock = Rc::new(NullClock::new(0));
        let mut engine =
            GovernanceEngine::new(&config, clock.clone(), NullExecutor::new(), Box::new(verifier))
                .unwrap();
        let admin = addr("admin");
        engine
            .grant_role(&admin, &votes_operator_role(), &addr("minter"))
            .unwrap();
        for (name, amount) in [("alice", 600), ("bob", 300), ("carol", 100)] {
            engine.mint(&addr("minter"), &addr(name), amount).unwrap();
            engine.delegate(&addr(name), Some(&addr(name))).unwrap();
        }
        engine.take_events();
        clock.set(1);
        Self { engine, clock }
    }

    fn proposal(&mut self, actions: Vec<Action>, description: &str) -> ProposalId {
        self.engine
            .propose(&addr("alice"), ProposalRequest::new(actions, description))
            .unwrap()
    }

    /// Propose at the current time, pass with alice's vote, close the vote.
    fn passed(&mut self, actions: Vec<Action>, description: &str) -> ProposalId {
        let start = self.clock_now();
        let id = self.proposal(actions, description);
        self.clock.set(start + 20);
        self.engine.cast_vote(&addr("alice"), &id, 1, "").unwrap();
        self.clock.set(start + 111);
        assert_eq!(self.engine.proposal_state(&id).unwrap(), ProposalState::Succeeded);
        id
    }

    fn clock_now(&self) -> u64 {
        self.engine.now().as_u64()
    }
}

fn is_reserved<T>(result: Result<T, EngineError>, who: &Address) -> bool {
    matches!(result, Err(EngineError::ReservedCaller { account }) if account == *who)
}

fn treasury_actions() -> Vec<Action> {
    vec![
        Action::new(addr("treasury"), 10, b"pay:dev".to_vec()),
        Action::new(addr("treasury"), 0, b"pay:ops".to_vec()),
        Action::new(addr("registry"), 0, b"set".to_vec()),
    ]
}

#[test]
fn proposal_lifecycle_through_timelock() {
    let mut h = Harness::new(config(true));
    let id = h.proposal(treasury_actions(), "fund the dev team");

    assert_eq!(h.engine.governor().proposal_snapshot(&id).unwrap(), Timepoint::new(11));
    assert_eq!(h.engine.proposal_state(&id).unwrap(), ProposalState::Pending);
    h.clock.set(11);
    assert!(h.engine.cast_vote(&addr("bob"), &id, 1, "").is_err());
    h.clock.set(12);
    assert_eq!(h.engine.proposal_state(&id).unwrap(), ProposalState::Active);
    assert_eq!(h.engine.cast_vote(&addr("alice"), &id, 1, "ship it").unwrap(), 600);
    assert_eq!(h.engine.cast_vote(&addr("bob"), &id, 0, "").unwrap(), 300);

    h.clock.set(112);
    assert_eq!(h.engine.proposal_state(&id).unwrap(), ProposalState::Succeeded);
    let eta = h.engine.queue(&id).unwrap();
    assert_eq!(eta, Timepoint::new(112 + MIN_DELAY));
    assert_eq!(h.engine.proposal_state(&id).unwrap(), ProposalState::Queued);

    h.clock.set(112 + MIN_DELAY - 1);
    assert!(matches!(
        h.engine.execute(&id),
        Err(EngineError::Timelock(TimelockError::UnexpectedOperationState {
            current: OperationState::Waiting,
            ..
        }))
    ));
    assert_eq!(h.engine.proposal_state(&id).unwrap(), ProposalState::Queued);
    assert!(h.engine.executor().executed().is_empty());

    h.clock.set(112 + MIN_DELAY);
    h.engine.execute(&id).unwrap();
    assert_eq!(h.engine.proposal_state(&id).unwrap(), ProposalState::Executed);

    let executed = h.engine.executor().executed();
    assert_eq!(executed.len(), 3);
    assert!(executed.iter().all(|(sender, _)| *sender == addr("timelock")));
    let actions: Vec<Action> = executed.iter().map(|(_, a)| a.clone()).collect();
    assert_eq!(actions, treasury_actions());

    let events = h.engine.take_events();
    assert!(events.contains(&EngineEvent::Governance(GovernanceEvent::ProposalExecuted { id })));
    assert!(h.engine.execute(&id).is_err());
}

#[test]
fn queue_without_timelock_is_not_implemented() {
    let mut h = Harness::new(config(false));
    let id = h.passed(treasury_actions(), "direct");
    assert!(matches!(
        h.engine.queue(&id),
        Err(EngineError::Governance(GovernanceError::QueueNotImplemented))
    ));

    h.engine.execute(&id).unwrap();
    let executed = h.engine.executor().executed();
    assert_eq!(executed.len(), 3);
    assert!(executed.iter().all(|(sender, _)| *sender == addr("governor")));
}

#[test]
fn timelocked_proposal_must_be_queued_first() {
    let mut h = Harness::new(config(true));
    let id = h.passed(treasury_actions(), "skip the queue");
    assert!(matches!(
        h.engine.execute(&id),
        Err(EngineError::Timelock(TimelockError::UnexpectedOperationState {
            current: OperationState::Unset,
            ..
        }))
    ));
    assert_eq!(h.engine.proposal_state(&id).unwrap(), ProposalState::Succeeded);
}

#[test]
fn malformed_self_call_aborts_the_batch() {
    let mut h = Harness::new(config(false));
    let id = h.passed(treasury_actions(), "after a bad call");

    let err = h.engine.call(
        &addr("mallory"),
        &Action::new(addr("governor"), 0, vec![0xff, 0xff, 0xff]),
    );
    assert!(matches!(err, Err(EngineError::Governance(GovernanceError::InvalidCall(_)))));
    assert_eq!(h.engine.executor().aborted_batches(), 1);

    h.engine.execute(&id).unwrap();
    assert_eq!(h.engine.executor().executed().len(), 3);
}

#[test]
fn executor_failure_leaves_proposal_executable() {
    let clock = Rc::new(NullClock::new(0));
    let mut executor = NullExecutor::new();
    executor.fail_on(addr("registry"));
    let mut engine = GovernanceEngine::new(
        &config(false),
        clock.clone(),
        executor,
        Box::new(NullVerifier::new()),
    )
    .unwrap();
    engine
        .grant_role(&addr("admin"), &votes_operator_role(), &addr("admin"))
        .unwrap();
    engine.mint(&addr("admin"), &addr("alice"), 1_000).unwrap();
    engine.delegate(&addr("alice"), Some(&addr("alice"))).unwrap();
    clock.set(1);

    let id = engine
        .propose(&addr("alice"), ProposalRequest::new(treasury_actions(), "fails"))
        .unwrap();
    clock.set(20);
    engine.cast_vote(&addr("alice"), &id, 1, "").unwrap();
    clock.set(200);
    engine.take_events();

    assert!(matches!(
        engine.execute(&id),
        Err(EngineError::Execution(_))
    ));
    assert_eq!(engine.proposal_state(&id).unwrap(), ProposalState::Succeeded);
    assert!(engine.executor().executed().is_empty());
    assert!(engine.take_events().is_empty());
}

#[test]
fn executing_a_proposal_twice_in_one_call_fails_atomically() {
    let mut h = Harness::new(config(false));
    let target = h.passed(treasury_actions(), "target");

    let execute_target = GovernorCall::Execute { proposal_id: target }.into_action(&addr("governor"));
    let outer = h.passed(vec![execute_target.clone(), execute_target], "execute twice");

    let err = h.engine.execute(&outer).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Governance(GovernanceError::UnexpectedProposalState {
            current: ProposalState::Executed,
            ..
        })
    ));
    assert_eq!(h.engine.proposal_state(&outer).unwrap(), ProposalState::Succeeded);
    assert_eq!(h.engine.proposal_state(&target).unwrap(), ProposalState::Succeeded);
    assert!(h.engine.executor().executed().is_empty());
}

#[test]
fn governance_reconfigures_itself_through_the_timelock() {
    let mut h = Harness::new(config(true));
    let configure = GovernorCall::Configure(SettingsUpdate::VotingDelay(5));

    assert!(matches!(
        h.engine.call(&addr("alice"), &configure.clone().into_action(&addr("governor"))),
        Err(EngineError::Governance(GovernanceError::OnlyExecutor { .. }))
    ));
    // Only routing may call as the timelock.
    assert!(matches!(
        h.engine.call(&addr("timelock"), &configure.clone().into_action(&addr("governor"))),
        Err(EngineError::ReservedCaller { account }) if account == addr("timelock")
    ));

    let update_delay = TimelockCall::UpdateDelay { new_delay: 3_600 }.into_action(&addr("timelock"));
    let id = h.passed(
        vec![configure.into_action(&addr("governor")), update_delay],
        "faster governance",
    );
    h.engine.queue(&id).unwrap();
    h.clock.set(h.clock_now() + MIN_DELAY);
    h.engine.execute(&id).unwrap();

    assert_eq!(h.engine.governor().voting_delay(), 5);
    assert_eq!(h.engine.timelock().unwrap().min_delay(), 3_600);
    assert!(h.engine.executor().executed().is_empty());
}

#[test]
fn guardian_cancels_queued_proposal_and_its_operation() {
    let mut h = Harness::new(config(true));
    h.engine
        .grant_role(&addr("admin"), &guardian_role(), &addr("guardian"))
        .unwrap();
    let id = h.passed(treasury_actions(), "to be vetoed");
    h.engine.queue(&id).unwrap();
    let operation = h.engine.governor().proposal_core(&id).unwrap().queued_operation.unwrap();

    assert!(matches!(
        h.engine.cancel(&addr("alice"), &id),
        Err(EngineError::Governance(GovernanceError::UnexpectedProposalState { .. }))
    ));
    h.engine.cancel(&addr("guardian"), &id).unwrap();

    assert_eq!(h.engine.proposal_state(&id).unwrap(), ProposalState::Canceled);
    let now = h.engine.now();
    assert_eq!(
        h.engine.timelock().unwrap().operation_state(&operation, now),
        OperationState::Unset
    );
    assert!(h.engine.cancel(&addr("guardian"), &id).is_err());
}

#[test]
fn proposer_cancels_only_while_pending() {
    let mut h = Harness::new(config(true));
    let id = h.proposal(treasury_actions(), "withdrawn");
    assert!(matches!(
        h.engine.cancel(&addr("bob"), &id),
        Err(EngineError::Governance(GovernanceError::OnlyProposer { .. }))
    ));
    h.engine.cancel(&addr("alice"), &id).unwrap();
    assert_eq!(h.engine.proposal_state(&id).unwrap(), ProposalState::Canceled);

    let late = h.proposal(treasury_actions(), "too late");
    h.clock.set(h.clock_now() + 11);
    assert!(h.engine.cancel(&addr("alice"), &late).is_err());
}

#[test]
fn operation_run_directly_in_timelock_reports_executed() {
    let mut h = Harness::new(config(true));
    let id = h.passed(treasury_actions(), "anyone may run it");
    h.engine.queue(&id).unwrap();
    h.clock.set(h.clock_now() + MIN_DELAY);

    let details = h.engine.governor().proposal_details(&id).unwrap().clone();
    let salt = governor_salt(&addr("governor"), &details.description_hash);
    h.engine
        .execute_operation(&addr("bob"), &details.actions, None, salt)
        .unwrap();

    assert_eq!(h.engine.proposal_state(&id).unwrap(), ProposalState::Executed);
    assert!(h.engine.execute(&id).is_err());
    assert_eq!(h.engine.executor().executed().len(), 3);
}

#[test]
fn operation_cancelled_in_timelock_reports_canceled() {
    let mut h = Harness::new(config(true));
    let id = h.passed(treasury_actions(), "cancelled underneath");
    h.engine.queue(&id).unwrap();
    let operation = h.engine.governor().proposal_core(&id).unwrap().queued_operation.unwrap();

    // The governor is the timelock's only canceller, so a second proposal
    // relays the cancellation through it.
    assert!(h.engine.cancel_operation(&addr("alice"), &operation).is_err());
    let cancel = TimelockCall::Cancel { id: operation }.into_action(&addr("timelock"));
    let relay = GovernorCall::Relay { action: cancel }.into_action(&addr("governor"));
    let canceller = h.passed(vec![relay], "cancel underneath");
    h.engine.queue(&canceller).unwrap();
    h.clock.set(h.clock_now() + MIN_DELAY);
    h.engine.execute(&canceller).unwrap();

    assert_eq!(h.engine.proposal_state(&id).unwrap(), ProposalState::Canceled);
    assert!(h.engine.execute(&id).is_err());
}

#[test]
fn queued_proposal_expires_after_grace_period() {
    let mut cfg = config(true);
    cfg.governor.execution_grace_period = Some(1_000);
    let mut h = Harness::new(cfg);
    let id = h.passed(treasury_actions(), "slow");
    let eta = h.engine.queue(&id).unwrap().as_u64();

    h.clock.set(eta + 999);
    assert_eq!(h.engine.proposal_state(&id).unwrap(), ProposalState::Queued);
    h.clock.set(eta + 1_000);
    assert_eq!(h.engine.proposal_state(&id).unwrap(), ProposalState::Expired);
    assert!(h.engine.execute(&id).is_err());
    h.engine
        .grant_role(&addr("admin"), &guardian_role(), &addr("guardian"))
        .unwrap();
    assert!(h.engine.cancel(&addr("guardian"), &id).is_err());
}

#[test]
fn power_changes_after_snapshot_do_not_count() {
    let mut h = Harness::new(config(false));
    let id = h.proposal(treasury_actions(), "snapshot");
    h.clock.set(5);
    h.engine
        .transfer(&addr("minter"), &addr("alice"), &addr("carol"), 600)
        .unwrap();
    h.clock.set(12);
    h.engine
        .transfer(&addr("minter"), &addr("carol"), &addr("bob"), 700)
        .unwrap();
    h.clock.set(13);

    assert_eq!(h.engine.cast_vote(&addr("carol"), &id, 1, "").unwrap(), 700);
    assert_eq!(h.engine.cast_vote(&addr("bob"), &id, 0, "").unwrap(), 300);
    assert_eq!(h.engine.cast_vote(&addr("alice"), &id, 0, "").unwrap(), 0);
}

#[test]
fn voting_units_are_operator_gated() {
    let mut h = Harness::new(config(false));
    assert!(matches!(
        h.engine.mint(&addr("mallory"), &addr("mallory"), 1),
        Err(EngineError::Access(AccessError::UnauthorizedAccount { .. }))
    ));
    h.engine.burn(&addr("minter"), &addr("carol"), 100).unwrap();
    assert_eq!(h.engine.votes().total_supply(), 900);
}

#[test]
fn signed_delegation_and_ballot() {
    let mut verifier = NullVerifier::new();
    verifier.accept(addr("dave"));
    let mut h = Harness::with_verifier(config(false), verifier);
    h.engine.mint(&addr("minter"), &addr("dave"), 50).unwrap();
    h.engine
        .delegate_by_sig(
            &addr("dave"),
            &addr("dave"),
            0,
            Timepoint::new(100),
            &Signature([0; 64]),
        )
        .unwrap();
    assert_eq!(h.engine.votes().nonces(&addr("dave")), 1);
    assert!(h
        .engine
        .delegate_by_sig(&addr("dave"), &addr("dave"), 0, Timepoint::new(100), &Signature([0; 64]))
        .is_err());

    h.clock.set(2);
    let id = h.proposal(treasury_actions(), "signed");
    h.clock.set(20);
    assert_eq!(
        h.engine
            .cast_vote_by_sig(&addr("dave"), &id, 1, &Signature([0; 64]))
            .unwrap(),
        50
    );
    assert!(h
        .engine
        .cast_vote_by_sig(&addr("bob"), &id, 1, &Signature([0; 64]))
        .is_err());
}

#[test]
fn default_admin_rotation() {
    let mut h = Harness::new(config(false));
    let admin = addr("admin");
    let successor = addr("successor");

    assert!(matches!(
        h.engine.grant_role(&admin, &DEFAULT_ADMIN_ROLE, &successor),
        Err(EngineError::Access(AccessError::EnforcedDefaultAdminRules))
    ));

    let schedule = h.engine.begin_admin_transfer(&admin, Some(successor.clone())).unwrap();
    assert_eq!(schedule, Timepoint::new(1 + 86_400));
    h.clock.set(schedule.as_u64());
    assert!(h.engine.accept_admin_transfer(&successor).is_err());
    h.clock.set(schedule.as_u64() + 1);
    assert!(h.engine.accept_admin_transfer(&addr("mallory")).is_err());
    h.engine.accept_admin_transfer(&successor).unwrap();

    assert_eq!(h.engine.admin().default_admin(), Some(&successor));
    assert!(!h.engine.admin().has_role(&DEFAULT_ADMIN_ROLE, &admin));
    assert!(h
        .engine
        .grant_role(&admin, &guardian_role(), &admin)
        .is_err());
    let events = h.engine.take_events();
    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::Access(AccessEvent::RoleGranted { account, .. }) if *account == successor
    )));
}

#[test]
fn admin_delay_change_and_rollback() {
    let mut h = Harness::new(config(false));
    let admin = addr("admin");
    let effect = h.engine.change_admin_delay(&admin, 3_600).unwrap();
    // Decreases wait the difference.
    assert_eq!(effect, Timepoint::new(1 + 86_400 - 3_600));
    assert_eq!(
        h.engine.admin().pending_default_admin_delay(h.engine.now()),
        (3_600, Some(effect))
    );
    h.engine.rollback_admin_delay(&admin).unwrap();
    assert_eq!(h.engine.admin().pending_default_admin_delay(h.engine.now()), (0, None));
    assert_eq!(h.engine.admin().default_admin_delay(h.engine.now()), 86_400);
}

#[test]
fn timelock_operations_from_external_proposers_are_gated() {
    let mut h = Harness::new(config(true));
    let actions = vec![Action::new(addr("treasury"), 0, b"x".to_vec())];
    assert!(matches!(
        h.engine
            .schedule_operation(&addr("ops"), &actions, None, Salt::ZERO, MIN_DELAY),
        Err(EngineError::Timelock(TimelockError::Access(_)))
    ));

    let grant = TimelockCall::GrantRole {
        role: proposer_role(),
        account: addr("ops"),
    }
    .into_action(&addr("timelock"));
    let id = h.passed(vec![grant], "ops may schedule");
    h.engine.queue(&id).unwrap();
    h.clock.set(h.clock_now() + MIN_DELAY);
    h.engine.execute(&id).unwrap();
    assert!(h.engine.timelock().unwrap().has_role(&proposer_role(), &addr("ops")));

    assert!(matches!(
        h.engine
            .schedule_operation(&addr("ops"), &actions, None, Salt::ZERO, MIN_DELAY - 1),
        Err(EngineError::Timelock(TimelockError::InsufficientDelay { .. }))
    ));
    let operation = h
        .engine
        .schedule_operation(&addr("ops"), &actions, None, Salt::ZERO, MIN_DELAY)
        .unwrap();
    assert!(h
        .engine
        .execute_operation(&addr("anyone"), &actions, None, Salt::ZERO)
        .is_err());
    h.clock.set(h.clock_now() + MIN_DELAY);
    h.engine
        .execute_operation(&addr("anyone"), &actions, None, Salt::ZERO)
        .unwrap();
    assert!(h.engine.timelock().unwrap().is_operation_done(&operation));
    assert_eq!(
        h.engine.executor().executed(),
        &[(addr("timelock"), actions[0].clone())]
    );
}

#[test]
fn single_action_operations_run_through_the_engine() {
    let mut h = Harness::new(config(true));
    let grant = TimelockCall::GrantRole {
        role: proposer_role(),
        account: addr("ops"),
    }
    .into_action(&addr("timelock"));
    let id = h.passed(vec![grant], "ops may schedule");
    h.engine.queue(&id).unwrap();
    h.clock.set(h.clock_now() + MIN_DELAY);
    h.engine.execute(&id).unwrap();

    let first = Action::new(addr("treasury"), 0, b"first".to_vec());
    let second = Action::new(addr("treasury"), 0, b"second".to_vec());
    let first_id = h
        .engine
        .schedule_single_operation(&addr("ops"), first.clone(), None, Salt::ZERO, MIN_DELAY)
        .unwrap();
    h.engine
        .schedule_single_operation(&addr("ops"), second.clone(), Some(first_id), Salt::ZERO, MIN_DELAY)
        .unwrap();
    h.clock.set(h.clock_now() + MIN_DELAY);

    assert!(matches!(
        h.engine
            .execute_single_operation(&addr("anyone"), &second, Some(first_id), Salt::ZERO),
        Err(EngineError::Timelock(TimelockError::UnexecutedPredecessor { .. }))
    ));
    h.engine
        .execute_single_operation(&addr("anyone"), &first, None, Salt::ZERO)
        .unwrap();
    h.engine
        .execute_single_operation(&addr("anyone"), &second, Some(first_id), Salt::ZERO)
        .unwrap();
    let payloads: Vec<&[u8]> = h
        .engine
        .executor()
        .executed()
        .iter()
        .map(|(_, action)| action.payload.as_slice())
        .collect();
    assert_eq!(payloads, vec![b"first".as_slice(), b"second".as_slice()]);
}

#[test]
fn nested_timelock_execution_runs_the_inner_operation() {
    let mut h = Harness::new(config(true));
    let grant = TimelockCall::GrantRole {
        role: proposer_role(),
        account: addr("ops"),
    }
    .into_action(&addr("timelock"));
    let id = h.passed(vec![grant], "ops may schedule");
    h.engine.queue(&id).unwrap();
    h.clock.set(h.clock_now() + MIN_DELAY);
    h.engine.execute(&id).unwrap();

    let inner = treasury_actions();
    let outer = vec![TimelockCall::Execute {
        actions: inner.clone(),
        predecessor: None,
        salt: Salt::ZERO,
    }
    .into_action(&addr("timelock"))];
    let inner_id = h
        .engine
        .schedule_operation(&addr("ops"), &inner, None, Salt::ZERO, MIN_DELAY)
        .unwrap();
    h.engine
        .schedule_operation(&addr("ops"), &outer, None, Salt::ZERO, MIN_DELAY)
        .unwrap();
    h.clock.set(h.clock_now() + MIN_DELAY);

    h.engine
        .execute_operation(&addr("anyone"), &outer, None, Salt::ZERO)
        .unwrap();
    assert!(h.engine.timelock().unwrap().is_operation_done(&inner_id));
    assert_eq!(h.engine.executor().executed().len(), inner.len());
}

#[test]
fn outsiders_cannot_call_as_the_timelock() {
    let mut h = Harness::new(config(true));
    let timelock = addr("timelock");

    let update_delay = TimelockCall::UpdateDelay { new_delay: 0 }.into_action(&timelock);
    assert!(is_reserved(h.engine.call(&timelock, &update_delay), &timelock));
    let grant = TimelockCall::GrantRole {
        role: proposer_role(),
        account: addr("mallory"),
    }
    .into_action(&timelock);
    assert!(is_reserved(h.engine.call(&timelock, &grant), &timelock));

    let tl = h.engine.timelock().unwrap();
    assert_eq!(tl.min_delay(), MIN_DELAY);
    assert!(!tl.has_role(&proposer_role(), &addr("mallory")));

    let actions = treasury_actions();
    assert!(is_reserved(
        h.engine
            .schedule_operation(&timelock, &actions, None, Salt::ZERO, MIN_DELAY),
        &timelock
    ));
    assert!(is_reserved(
        h.engine.execute_operation(&timelock, &actions, None, Salt::ZERO),
        &timelock
    ));
    assert!(is_reserved(
        h.engine.mint(&timelock, &addr("mallory"), 1),
        &timelock
    ));
    assert!(h.engine.take_events().is_empty());
}

#[test]
fn outsiders_cannot_call_as_the_governor() {
    for use_timelock in [true, false] {
        let mut h = Harness::new(config(use_timelock));
        let governor = addr("governor");

        let configure = GovernorCall::Configure(SettingsUpdate::VotingDelay(0));
        assert!(is_reserved(
            h.engine.call(&governor, &configure.into_action(&governor)),
            &governor
        ));
        assert_eq!(h.engine.governor().voting_delay(), 10);

        assert!(is_reserved(
            h.engine.propose(&governor, ProposalRequest::new(treasury_actions(), "as governor")),
            &governor
        ));
        assert_eq!(h.engine.governor().proposal_count(), 0);

        if use_timelock {
            let id = h.passed(treasury_actions(), "queued");
            h.engine.queue(&id).unwrap();
            let operation = h.engine.governor().proposal_core(&id).unwrap().queued_operation.unwrap();
            assert!(is_reserved(h.engine.cancel_operation(&governor, &operation), &governor));
            let actions = treasury_actions();
            assert!(is_reserved(
                h.engine
                    .schedule_operation(&governor, &actions, None, Salt::ZERO, MIN_DELAY),
                &governor
            ));
            assert!(h.engine.timelock().unwrap().is_operation(&operation));
        }
    }
}

#[test]
fn events_are_published_only_for_committed_calls() {
    let mut h = Harness::new(config(false));
    h.proposal(treasury_actions(), "events");
    let events = h.engine.take_events();
    assert!(matches!(
        events.as_slice(),
        [EngineEvent::Governance(GovernanceEvent::ProposalCreated { .. })]
    ));

    assert!(h
        .engine
        .propose(&addr("alice"), ProposalRequest::new(treasury_actions(), "events"))
        .is_err());
    assert!(h.engine.take_events().is_empty());
}
