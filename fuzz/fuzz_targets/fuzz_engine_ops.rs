#![no_main]

use std::rc::Rc;

use arbitrary::Arbitrary;
use covenant_engine::{votes_operator_role, EngineConfig, GovernanceEngine};
use covenant_governance::{ProposalRequest, ProposalState};
use covenant_nullables::{NullClock, NullExecutor, NullVerifier};
use covenant_types::{Action, Address, ProposalId};
use libfuzzer_sys::fuzz_target;

const ACCOUNTS: [&str; 4] = ["admin", "alice", "bob", "carol"];

#[derive(Debug, Arbitrary)]
enum Op {
    Advance(u16),
    Mint { to: u8, amount: u32 },
    Delegate { from: u8, to: u8 },
    Propose { who: u8, tag: u8 },
    Vote { who: u8, proposal: u8, support: u8 },
    Queue(u8),
    Execute(u8),
    Cancel { who: u8, proposal: u8 },
}

fn account(index: u8) -> Address {
    Address::new(ACCOUNTS[index as usize % ACCOUNTS.len()])
}

fuzz_target!(|ops: Vec<Op>| {
    let mut config = EngineConfig::default();
    config.governor.voting_delay = 4;
    config.governor.voting_period = 16;
    config.timelock.min_delay = 8;

    let clock = Rc::new(NullClock::new(0));
    let Ok(mut engine) = GovernanceEngine::new(
        &config,
        clock.clone(),
        NullExecutor::new(),
        Box::new(NullVerifier::new()),
    ) else {
        return;
    };
    let admin = Address::new("admin");
    let _ = engine.grant_role(&admin, &votes_operator_role(), &admin);

    let mut proposals: Vec<ProposalId> = Vec::new();
    let pick = |proposals: &[ProposalId], index: u8| {
        (!proposals.is_empty()).then(|| proposals[index as usize % proposals.len()])
    };

    for op in ops {
        let before = pick(&proposals, 0).and_then(|id| engine.proposal_state(&id).ok());
        match op {
            Op::Advance(by) => clock.advance(u64::from(by)),
            Op::Mint { to, amount } => {
                let _ = engine.mint(&admin, &account(to), u128::from(amount));
            }
            Op::Delegate { from, to } => {
                let _ = engine.delegate(&account(from), Some(&account(to)));
            }
            Op::Propose { who, tag } => {
                let action = Action::new(Address::new("target"), 0, vec![tag]);
                let request = ProposalRequest::new(vec![action], format!("proposal {tag}"));
                if let Ok(id) = engine.propose(&account(who), request) {
                    proposals.push(id);
                }
            }
            Op::Vote { who, proposal, support } => {
                if let Some(id) = pick(&proposals, proposal) {
                    let _ = engine.cast_vote(&account(who), &id, support, "");
                }
            }
            Op::Queue(proposal) => {
                if let Some(id) = pick(&proposals, proposal) {
                    let _ = engine.queue(&id);
                }
            }
            Op::Execute(proposal) => {
                if let Some(id) = pick(&proposals, proposal) {
                    let _ = engine.execute(&id);
                }
            }
            Op::Cancel { who, proposal } => {
                if let Some(id) = pick(&proposals, proposal) {
                    let _ = engine.cancel(&account(who), &id);
                }
            }
        }
        // Terminal states never change.
        if let Some(state) = before.filter(|s| {
            matches!(s, ProposalState::Canceled | ProposalState::Executed)
        }) {
            let after = engine.proposal_state(&proposals[0]).expect("known proposal");
            assert_eq!(after, state);
        }
        let _ = engine.take_events();
    }
});
