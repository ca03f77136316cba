//! Property tests for default-admin rotation.

use covenant_access::{DefaultAdminRules, RoleStore, DEFAULT_ADMIN_ROLE};
use covenant_types::{Address, AdminParams, Timepoint};
use proptest::prelude::*;

const ACCOUNTS: [&str; 3] = ["alice", "bob", "carol"];

#[derive(Clone, Debug)]
enum Op {
    Begin { caller: usize, target: Option<usize> },
    Cancel { caller: usize },
    Accept { caller: usize },
    ChangeDelay { caller: usize, delay: u64 },
    Rollback { caller: usize },
    Renounce { caller: usize },
    Wait(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let who = 0..ACCOUNTS.len();
    prop_oneof![
        (who.clone(), proptest::option::of(0..ACCOUNTS.len()))
            .prop_map(|(caller, target)| Op::Begin { caller, target }),
        who.clone().prop_map(|caller| Op::Cancel { caller }),
        who.clone().prop_map(|caller| Op::Accept { caller }),
        (who.clone(), 0u64..500).prop_map(|(caller, delay)| Op::ChangeDelay { caller, delay }),
        who.clone().prop_map(|caller| Op::Rollback { caller }),
        who.prop_map(|caller| Op::Renounce { caller }),
        (0u64..400).prop_map(Op::Wait),
    ]
}

fn addr(i: usize) -> Address {
    Address::new(ACCOUNTS[i])
}

proptest! {
    #[test]
    fn never_two_default_admins(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut rules = DefaultAdminRules::new(
            RoleStore::new(),
            addr(0),
            &AdminParams { initial_delay: 100, delay_increase_wait: 300 },
        );
        let mut now = Timepoint::new(1);

        for op in ops {
            let _ = match op {
                Op::Begin { caller, target } => rules
                    .begin_transfer(&addr(caller), target.map(addr), now)
                    .map(|_| ()),
                Op::Cancel { caller } => rules.cancel_transfer(&addr(caller)),
                Op::Accept { caller } => rules.accept_transfer(&addr(caller), now),
                Op::ChangeDelay { caller, delay } => rules
                    .change_delay(&addr(caller), delay, now)
                    .map(|_| ()),
                Op::Rollback { caller } => rules.rollback_delay(&addr(caller), now),
                Op::Renounce { caller } => rules
                    .renounce_role(&addr(caller), &DEFAULT_ADMIN_ROLE, &addr(caller), now)
                    .map(|_| ()),
                Op::Wait(d) => {
                    now = now.saturating_add(d);
                    Ok(())
                }
            };

            let holders = rules.store().member_count(&DEFAULT_ADMIN_ROLE);
            prop_assert!(holders <= 1);
            match rules.default_admin() {
                Some(admin) => {
                    prop_assert_eq!(holders, 1);
                    prop_assert!(rules.has_role(&DEFAULT_ADMIN_ROLE, admin));
                }
                None => prop_assert_eq!(holders, 0),
            }
        }
    }

    #[test]
    fn increase_wait_never_exceeds_cap(current in 0u64..1_000, new_delay in 0u64..10_000, cap in 1u64..1_000) {
        let mut rules = DefaultAdminRules::new(
            RoleStore::new(),
            addr(0),
            &AdminParams { initial_delay: current, delay_increase_wait: cap },
        );
        let now = Timepoint::new(50);
        let schedule = rules.change_delay(&addr(0), new_delay, now).unwrap();
        let wait = schedule.as_u64() - now.as_u64();
        if new_delay > current {
            prop_assert_eq!(wait, new_delay.min(cap));
        } else {
            prop_assert_eq!(wait, current - new_delay);
        }
    }
}
