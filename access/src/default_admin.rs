//! Single default admin with delayed, two-step rotation.
//!
//! Two independent delayed state machines live here:
//!
//! - **Admin transfer**: the admin schedules a new admin, who accepts once
//!   the current delay has passed. Scheduling again replaces (and cancels)
//!   any pending transfer.
//! - **Delay change**: the admin schedules a new delay. Increases wait at
//!   most `delay_increase_wait`; decreases wait the difference, so a shorter
//!   delay cannot be used to rush a transfer. A passed schedule takes effect
//!   on read with no further call.
//!
//! A schedule is set when it is `Some` and has passed when it is strictly
//! before `now`.

use crate::error::AccessError;
use crate::events::AccessEvent;
use crate::store::{PermissionStore, RoleStore, DEFAULT_ADMIN_ROLE};
use covenant_types::{Address, AdminParams, RoleId, Timepoint};

#[derive(Clone, Debug)]
pub struct DefaultAdminRules<P: PermissionStore = RoleStore> {
    store: P,
    current_admin: Option<Address>,
    pending_admin: Option<Address>,
    pending_admin_schedule: Option<Timepoint>,
    current_delay: u64,
    pending_delay: u64,
    pending_delay_schedule: Option<Timepoint>,
    delay_increase_wait: u64,
    events: Vec<AccessEvent>,
}

fn has_passed(schedule: Option<Timepoint>, now: Timepoint) -> bool {
    schedule.is_some_and(|s| s < now)
}

impl<P: PermissionStore> DefaultAdminRules<P> {
    /// Wrap `store`, making `initial_admin` the default admin.
    pub fn new(mut store: P, initial_admin: Address, params: &AdminParams) -> Self {
        store.grant_unchecked(&DEFAULT_ADMIN_ROLE, &initial_admin, &initial_admin);
        Self {
            store,
            current_admin: Some(initial_admin),
            pending_admin: None,
            pending_admin_schedule: None,
            current_delay: params.initial_delay,
            pending_delay: 0,
            pending_delay_schedule: None,
            delay_increase_wait: params.delay_increase_wait,
            events: Vec::new(),
        }
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn has_role(&self, role: &RoleId, account: &Address) -> bool {
        self.store.has_role(role, account)
    }

    pub fn check_role(&self, role: &RoleId, account: &Address) -> Result<(), AccessError> {
        if self.store.has_role(role, account) {
            Ok(())
        } else {
            Err(AccessError::UnauthorizedAccount {
                account: account.clone(),
                needed_role: *role,
            })
        }
    }

    /// Grant `role`; the default admin role itself can only move by transfer.
    pub fn grant_role(
        &mut self,
        caller: &Address,
        role: &RoleId,
        account: &Address,
    ) -> Result<bool, AccessError> {
        if *role == DEFAULT_ADMIN_ROLE {
            return Err(AccessError::EnforcedDefaultAdminRules);
        }
        self.check_role(&self.store.role_admin(role), caller)?;
        Ok(self.store.grant_unchecked(role, account, caller))
    }

    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: &RoleId,
        account: &Address,
    ) -> Result<bool, AccessError> {
        if *role == DEFAULT_ADMIN_ROLE {
            return Err(AccessError::EnforcedDefaultAdminRules);
        }
        self.check_role(&self.store.role_admin(role), caller)?;
        Ok(self.store.revoke_unchecked(role, account, caller))
    }

    /// Drop `role` from the caller.
    ///
    /// The admin may renounce the default admin role only after a transfer
    /// to nobody has been scheduled and its schedule has passed.
    pub fn renounce_role(
        &mut self,
        caller: &Address,
        role: &RoleId,
        confirmation: &Address,
        now: Timepoint,
    ) -> Result<bool, AccessError> {
        if caller != confirmation {
            return Err(AccessError::BadConfirmation);
        }
        let is_admin = *role == DEFAULT_ADMIN_ROLE && self.current_admin.as_ref() == Some(caller);
        if is_admin {
            let schedule = self.pending_admin_schedule;
            if self.pending_admin.is_some() || !has_passed(schedule, now) {
                return Err(AccessError::EnforcedDefaultAdminDelay { schedule });
            }
            self.pending_admin_schedule = None;
        }
        let removed = self.store.revoke_unchecked(role, caller, caller);
        if is_admin && removed {
            self.current_admin = None;
            tracing::warn!(admin = %caller, "default admin renounced");
        }
        Ok(removed)
    }

    /// Change the admin role of a non-default-admin role. The caller must
    /// hold the role's current admin role.
    pub fn set_role_admin(
        &mut self,
        caller: &Address,
        role: &RoleId,
        admin_role: &RoleId,
    ) -> Result<(), AccessError> {
        if *role == DEFAULT_ADMIN_ROLE {
            return Err(AccessError::EnforcedDefaultAdminRules);
        }
        self.check_role(&self.store.role_admin(role), caller)?;
        self.store.set_role_admin_unchecked(role, admin_role);
        Ok(())
    }

    pub fn default_admin(&self) -> Option<&Address> {
        self.current_admin.as_ref()
    }

    /// Pending admin and the schedule after which it can accept.
    pub fn pending_default_admin(&self) -> (Option<&Address>, Option<Timepoint>) {
        (self.pending_admin.as_ref(), self.pending_admin_schedule)
    }

    /// Delay in force at `now`, switching to a pending delay whose schedule passed.
    pub fn default_admin_delay(&self, now: Timepoint) -> u64 {
        if has_passed(self.pending_delay_schedule, now) {
            self.pending_delay
        } else {
            self.current_delay
        }
    }

    /// Pending delay and its effect schedule, or `(0, None)` once it took effect.
    pub fn pending_default_admin_delay(&self, now: Timepoint) -> (u64, Option<Timepoint>) {
        match self.pending_delay_schedule {
            Some(schedule) if !has_passed(Some(schedule), now) => (self.pending_delay, Some(schedule)),
            _ => (0, None),
        }
    }

    pub fn delay_increase_wait(&self) -> u64 {
        self.delay_increase_wait
    }

    /// Schedule a transfer of the default admin role, cancelling any pending one.
    ///
    /// `None` schedules a renouncement.
    pub fn begin_transfer(
        &mut self,
        caller: &Address,
        new_admin: Option<Address>,
        now: Timepoint,
    ) -> Result<Timepoint, AccessError> {
        self.check_role(&DEFAULT_ADMIN_ROLE, caller)?;
        let accept_schedule = now.saturating_add(self.default_admin_delay(now));
        tracing::info!(new_admin = ?new_admin, %accept_schedule, "default admin transfer scheduled");
        self.set_pending_admin(new_admin.clone(), Some(accept_schedule));
        self.events.push(AccessEvent::DefaultAdminTransferScheduled {
            new_admin,
            accept_schedule,
        });
        Ok(accept_schedule)
    }

    pub fn cancel_transfer(&mut self, caller: &Address) -> Result<(), AccessError> {
        self.check_role(&DEFAULT_ADMIN_ROLE, caller)?;
        self.set_pending_admin(None, None);
        Ok(())
    }

    /// Complete a pending transfer. Only the pending admin may call, and only
    /// after the accept schedule has passed.
    pub fn accept_transfer(&mut self, caller: &Address, now: Timepoint) -> Result<(), AccessError> {
        if self.pending_admin.as_ref() != Some(caller) {
            return Err(AccessError::InvalidDefaultAdmin {
                account: Some(caller.clone()),
            });
        }
        let schedule = self.pending_admin_schedule;
        if !has_passed(schedule, now) {
            return Err(AccessError::EnforcedDefaultAdminDelay { schedule });
        }

        if let Some(old) = self.current_admin.take() {
            self.store.revoke_unchecked(&DEFAULT_ADMIN_ROLE, &old, caller);
        }
        self.store.grant_unchecked(&DEFAULT_ADMIN_ROLE, caller, caller);
        self.current_admin = Some(caller.clone());
        self.pending_admin = None;
        self.pending_admin_schedule = None;
        tracing::info!(admin = %caller, "default admin transfer accepted");
        Ok(())
    }

    /// Schedule a new delay, returning when it takes effect.
    pub fn change_delay(
        &mut self,
        caller: &Address,
        new_delay: u64,
        now: Timepoint,
    ) -> Result<Timepoint, AccessError> {
        self.check_role(&DEFAULT_ADMIN_ROLE, caller)?;
        let effect_schedule = now.saturating_add(self.delay_change_wait(new_delay, now));
        self.set_pending_delay(new_delay, Some(effect_schedule), now);
        self.events.push(AccessEvent::DefaultAdminDelayChangeScheduled {
            new_delay,
            effect_schedule,
        });
        tracing::info!(new_delay, %effect_schedule, "default admin delay change scheduled");
        Ok(effect_schedule)
    }

    /// Drop a pending delay change that has not taken effect.
    pub fn rollback_delay(&mut self, caller: &Address, now: Timepoint) -> Result<(), AccessError> {
        self.check_role(&DEFAULT_ADMIN_ROLE, caller)?;
        self.set_pending_delay(0, None, now);
        Ok(())
    }

    /// Drain role and rotation events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<AccessEvent> {
        let mut events = self.store.take_events();
        events.append(&mut self.events);
        events
    }

    fn delay_change_wait(&self, new_delay: u64, now: Timepoint) -> u64 {
        let current = self.default_admin_delay(now);
        if new_delay > current {
            new_delay.min(self.delay_increase_wait)
        } else {
            current - new_delay
        }
    }

    fn set_pending_admin(&mut self, new_admin: Option<Address>, schedule: Option<Timepoint>) {
        let old_schedule = self.pending_admin_schedule;
        self.pending_admin = new_admin;
        self.pending_admin_schedule = schedule;
        if old_schedule.is_some() {
            self.events.push(AccessEvent::DefaultAdminTransferCanceled);
        }
    }

    fn set_pending_delay(&mut self, new_delay: u64, schedule: Option<Timepoint>, now: Timepoint) {
        if let Some(old) = self.pending_delay_schedule {
            if has_passed(Some(old), now) {
                self.current_delay = self.pending_delay;
            } else {
                self.events.push(AccessEvent::DefaultAdminDelayChangeCanceled);
            }
        }
        self.pending_delay = new_delay;
        self.pending_delay_schedule = schedule;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_crypto::role_id;

    const DAY: u64 = 86_400;

    fn addr(name: &str) -> Address {
        Address::new(name)
    }

    fn t(v: u64) -> Timepoint {
        Timepoint::new(v)
    }

    fn rules(initial_delay: u64, increase_wait: u64) -> DefaultAdminRules {
        let mut rules = DefaultAdminRules::new(
            RoleStore::new(),
            addr("alice"),
            &AdminParams {
                initial_delay,
                delay_increase_wait: increase_wait,
            },
        );
        rules.take_events();
        rules
    }

    fn admins(rules: &DefaultAdminRules) -> usize {
        rules.store().member_count(&DEFAULT_ADMIN_ROLE)
    }

    #[test]
    fn delay_increase_is_capped() {
        let mut r = rules(DAY, 5 * DAY);
        let now = t(1_000);
        let schedule = r.change_delay(&addr("alice"), 7 * DAY, now).unwrap();
        assert_eq!(schedule, t(1_000 + 5 * DAY));
        assert_eq!(r.pending_default_admin_delay(now), (7 * DAY, Some(schedule)));
        assert_eq!(r.default_admin_delay(now), DAY);
    }

    #[test]
    fn delay_decrease_waits_the_difference() {
        let mut r = rules(5 * DAY, 5 * DAY);
        let schedule = r.change_delay(&addr("alice"), 2 * DAY, t(0)).unwrap();
        assert_eq!(schedule, t(3 * DAY));
    }

    #[test]
    fn pending_delay_materializes_on_read() {
        let mut r = rules(DAY, 5 * DAY);
        let schedule = r.change_delay(&addr("alice"), 2 * DAY, t(0)).unwrap();
        assert_eq!(r.default_admin_delay(schedule), DAY);
        assert_eq!(r.default_admin_delay(schedule.saturating_add(1)), 2 * DAY);
        assert_eq!(r.pending_default_admin_delay(schedule.saturating_add(1)), (0, None));
    }

    #[test]
    fn rescheduling_cancels_unpassed_delay_change() {
        let mut r = rules(DAY, 5 * DAY);
        r.change_delay(&addr("alice"), 2 * DAY, t(0)).unwrap();
        r.take_events();
        r.change_delay(&addr("alice"), 3 * DAY, t(10)).unwrap();
        let events = r.take_events();
        assert_eq!(events[0], AccessEvent::DefaultAdminDelayChangeCanceled);
        assert!(matches!(
            events[1],
            AccessEvent::DefaultAdminDelayChangeScheduled { new_delay, .. } if new_delay == 3 * DAY
        ));
    }

    #[test]
    fn rescheduling_after_effect_keeps_the_passed_delay() {
        let mut r = rules(DAY, 5 * DAY);
        let schedule = r.change_delay(&addr("alice"), 2 * DAY, t(0)).unwrap();
        let later = schedule.saturating_add(10);
        r.take_events();
        r.rollback_delay(&addr("alice"), later).unwrap();
        assert!(r.take_events().is_empty());
        assert_eq!(r.default_admin_delay(later), 2 * DAY);
    }

    #[test]
    fn rollback_restores_current_delay() {
        let mut r = rules(DAY, 5 * DAY);
        r.change_delay(&addr("alice"), 3 * DAY, t(0)).unwrap();
        r.rollback_delay(&addr("alice"), t(5)).unwrap();
        assert_eq!(r.pending_default_admin_delay(t(5)), (0, None));
        assert_eq!(r.default_admin_delay(t(10 * DAY)), DAY);
    }

    #[test]
    fn second_transfer_cancels_first() {
        let mut r = rules(DAY, 5 * DAY);
        r.begin_transfer(&addr("alice"), Some(addr("bob")), t(0)).unwrap();
        r.take_events();
        let schedule = r.begin_transfer(&addr("alice"), Some(addr("carol")), t(5)).unwrap();
        let events = r.take_events();
        assert_eq!(events[0], AccessEvent::DefaultAdminTransferCanceled);
        assert_eq!(
            events[1],
            AccessEvent::DefaultAdminTransferScheduled {
                new_admin: Some(addr("carol")),
                accept_schedule: schedule
            }
        );

        let after = schedule.saturating_add(1);
        assert_eq!(
            r.accept_transfer(&addr("bob"), after).unwrap_err(),
            AccessError::InvalidDefaultAdmin {
                account: Some(addr("bob"))
            }
        );
        r.accept_transfer(&addr("carol"), after).unwrap();
        assert_eq!(r.default_admin(), Some(&addr("carol")));
        assert!(!r.has_role(&DEFAULT_ADMIN_ROLE, &addr("alice")));
        assert_eq!(admins(&r), 1);
    }

    #[test]
    fn accept_before_schedule_fails() {
        let mut r = rules(DAY, 5 * DAY);
        let schedule = r.begin_transfer(&addr("alice"), Some(addr("bob")), t(0)).unwrap();
        assert_eq!(
            r.accept_transfer(&addr("bob"), schedule).unwrap_err(),
            AccessError::EnforcedDefaultAdminDelay {
                schedule: Some(schedule)
            }
        );
        assert_eq!(r.default_admin(), Some(&addr("alice")));
    }

    #[test]
    fn cancel_transfer_clears_pending() {
        let mut r = rules(DAY, 5 * DAY);
        r.begin_transfer(&addr("alice"), Some(addr("bob")), t(0)).unwrap();
        r.take_events();
        r.cancel_transfer(&addr("alice")).unwrap();
        assert_eq!(r.pending_default_admin(), (None, None));
        assert_eq!(r.take_events(), vec![AccessEvent::DefaultAdminTransferCanceled]);
        assert!(r.accept_transfer(&addr("bob"), t(10 * DAY)).is_err());
    }

    #[test]
    fn only_admin_rotates() {
        let mut r = rules(DAY, 5 * DAY);
        assert!(matches!(
            r.begin_transfer(&addr("bob"), Some(addr("bob")), t(0)),
            Err(AccessError::UnauthorizedAccount { .. })
        ));
        assert!(r.change_delay(&addr("bob"), 0, t(0)).is_err());
        assert!(r.cancel_transfer(&addr("bob")).is_err());
    }

    #[test]
    fn default_admin_role_cannot_be_granted_directly() {
        let mut r = rules(DAY, 5 * DAY);
        assert_eq!(
            r.grant_role(&addr("alice"), &DEFAULT_ADMIN_ROLE, &addr("bob"))
                .unwrap_err(),
            AccessError::EnforcedDefaultAdminRules
        );
        assert_eq!(
            r.revoke_role(&addr("alice"), &DEFAULT_ADMIN_ROLE, &addr("alice"))
                .unwrap_err(),
            AccessError::EnforcedDefaultAdminRules
        );
        assert!(r
            .set_role_admin(&addr("alice"), &DEFAULT_ADMIN_ROLE, &role_id("X"))
            .is_err());
        assert_eq!(admins(&r), 1);
    }

    #[test]
    fn other_roles_follow_admin() {
        let mut r = rules(DAY, 5 * DAY);
        let guardian = role_id("GUARDIAN_ROLE");
        assert!(r.grant_role(&addr("alice"), &guardian, &addr("gina")).unwrap());
        assert!(r.has_role(&guardian, &addr("gina")));
        assert!(r.grant_role(&addr("gina"), &guardian, &addr("bob")).is_err());
        assert!(r.revoke_role(&addr("alice"), &guardian, &addr("gina")).unwrap());
    }

    #[test]
    fn role_admin_changes_need_the_current_admin_role() {
        let mut r = rules(DAY, 5 * DAY);
        let minter = role_id("MINTER_ROLE");
        let minter_admin = role_id("MINTER_ADMIN_ROLE");
        assert_eq!(
            r.set_role_admin(&addr("mallory"), &minter, &minter_admin)
                .unwrap_err(),
            AccessError::UnauthorizedAccount {
                account: addr("mallory"),
                needed_role: DEFAULT_ADMIN_ROLE,
            }
        );
        assert_eq!(r.store().role_admin(&minter), DEFAULT_ADMIN_ROLE);

        r.set_role_admin(&addr("alice"), &minter, &minter_admin).unwrap();
        r.grant_role(&addr("alice"), &minter_admin, &addr("bob")).unwrap();
        assert!(r.grant_role(&addr("alice"), &minter, &addr("carol")).is_err());
        assert!(r.grant_role(&addr("bob"), &minter, &addr("carol")).unwrap());
        assert!(r
            .set_role_admin(&addr("alice"), &minter, &DEFAULT_ADMIN_ROLE)
            .is_err());
    }

    #[test]
    fn renounce_requires_scheduled_transfer_to_nobody() {
        let mut r = rules(DAY, 5 * DAY);
        let alice = addr("alice");
        assert!(matches!(
            r.renounce_role(&alice, &DEFAULT_ADMIN_ROLE, &alice, t(0)),
            Err(AccessError::EnforcedDefaultAdminDelay { schedule: None })
        ));

        let schedule = r.begin_transfer(&alice, None, t(0)).unwrap();
        assert!(r
            .renounce_role(&alice, &DEFAULT_ADMIN_ROLE, &alice, schedule)
            .is_err());
        assert!(r
            .renounce_role(&alice, &DEFAULT_ADMIN_ROLE, &alice, schedule.saturating_add(1))
            .unwrap());
        assert_eq!(r.default_admin(), None);
        assert_eq!(admins(&r), 0);
        assert_eq!(r.pending_default_admin(), (None, None));
    }

    #[test]
    fn renounce_blocked_while_transfer_to_someone_pending() {
        let mut r = rules(DAY, 5 * DAY);
        let alice = addr("alice");
        let schedule = r.begin_transfer(&alice, Some(addr("bob")), t(0)).unwrap();
        assert!(r
            .renounce_role(&alice, &DEFAULT_ADMIN_ROLE, &alice, schedule.saturating_add(1))
            .is_err());
    }

    #[test]
    fn transfer_uses_delay_in_force() {
        let mut r = rules(DAY, 5 * DAY);
        let effect = r.change_delay(&addr("alice"), 2 * DAY, t(0)).unwrap();
        let now = effect.saturating_add(1);
        let schedule = r.begin_transfer(&addr("alice"), Some(addr("bob")), now).unwrap();
        assert_eq!(schedule, now.saturating_add(2 * DAY));
    }
}
