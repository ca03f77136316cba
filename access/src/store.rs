//! Role membership.
//!
//! Every role has an admin role whose holders may grant and revoke it. A
//! role's admin defaults to [`DEFAULT_ADMIN_ROLE`].

use crate::error::AccessError;
use crate::events::AccessEvent;
use covenant_types::{Address, RoleId};
use std::collections::{BTreeSet, HashMap};

/// The all-zero role, admin of every role that has no other admin.
pub const DEFAULT_ADMIN_ROLE: RoleId = RoleId::ZERO;

/// Unchecked role storage that privileged components build their rules on.
///
/// Implementations only record membership; callers decide who may change it.
pub trait PermissionStore {
    fn has_role(&self, role: &RoleId, account: &Address) -> bool;

    fn role_admin(&self, role: &RoleId) -> RoleId;

    /// Add `account` to `role`. Returns `false` if it already held the role.
    fn grant_unchecked(&mut self, role: &RoleId, account: &Address, sender: &Address) -> bool;

    /// Remove `account` from `role`. Returns `false` if it did not hold the role.
    fn revoke_unchecked(&mut self, role: &RoleId, account: &Address, sender: &Address) -> bool;

    fn set_role_admin_unchecked(&mut self, role: &RoleId, admin_role: &RoleId);

    /// Drain events emitted since the last call.
    fn take_events(&mut self) -> Vec<AccessEvent>;
}

#[derive(Clone, Debug, Default)]
pub struct RoleStore {
    members: HashMap<RoleId, BTreeSet<Address>>,
    admins: HashMap<RoleId, RoleId>,
    events: Vec<AccessEvent>,
}

impl RoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail unless `account` holds `role`.
    pub fn check_role(&self, role: &RoleId, account: &Address) -> Result<(), AccessError> {
        if self.has_role(role, account) {
            Ok(())
        } else {
            Err(AccessError::UnauthorizedAccount {
                account: account.clone(),
                needed_role: *role,
            })
        }
    }

    /// Grant `role` to `account`; `caller` must hold the role's admin role.
    pub fn grant_role(
        &mut self,
        caller: &Address,
        role: &RoleId,
        account: &Address,
    ) -> Result<bool, AccessError> {
        self.check_role(&self.role_admin(role), caller)?;
        Ok(self.grant_unchecked(role, account, caller))
    }

    /// Revoke `role` from `account`; `caller` must hold the role's admin role.
    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: &RoleId,
        account: &Address,
    ) -> Result<bool, AccessError> {
        self.check_role(&self.role_admin(role), caller)?;
        Ok(self.revoke_unchecked(role, account, caller))
    }

    /// Drop `role` from the caller. `confirmation` must repeat the caller.
    pub fn renounce_role(
        &mut self,
        caller: &Address,
        role: &RoleId,
        confirmation: &Address,
    ) -> Result<bool, AccessError> {
        if caller != confirmation {
            return Err(AccessError::BadConfirmation);
        }
        Ok(self.revoke_unchecked(role, caller, caller))
    }

    /// Holders of `role`, in address order.
    pub fn members(&self, role: &RoleId) -> impl Iterator<Item = &Address> {
        self.members.get(role).into_iter().flatten()
    }

    pub fn member_count(&self, role: &RoleId) -> usize {
        self.members.get(role).map(BTreeSet::len).unwrap_or(0)
    }
}

impl PermissionStore for RoleStore {
    fn has_role(&self, role: &RoleId, account: &Address) -> bool {
        self.members
            .get(role)
            .is_some_and(|holders| holders.contains(account))
    }

    fn role_admin(&self, role: &RoleId) -> RoleId {
        self.admins.get(role).copied().unwrap_or(DEFAULT_ADMIN_ROLE)
    }

    fn grant_unchecked(&mut self, role: &RoleId, account: &Address, sender: &Address) -> bool {
        let added = self.members.entry(*role).or_default().insert(account.clone());
        if added {
            tracing::debug!(role = %role, %account, %sender, "role granted");
            self.events.push(AccessEvent::RoleGranted {
                role: *role,
                account: account.clone(),
                sender: sender.clone(),
            });
        }
        added
    }

    fn revoke_unchecked(&mut self, role: &RoleId, account: &Address, sender: &Address) -> bool {
        let removed = self
            .members
            .get_mut(role)
            .is_some_and(|holders| holders.remove(account));
        if removed {
            tracing::debug!(role = %role, %account, %sender, "role revoked");
            self.events.push(AccessEvent::RoleRevoked {
                role: *role,
                account: account.clone(),
                sender: sender.clone(),
            });
        }
        removed
    }

    fn set_role_admin_unchecked(&mut self, role: &RoleId, admin_role: &RoleId) {
        let previous_admin_role = self.role_admin(role);
        self.admins.insert(*role, *admin_role);
        self.events.push(AccessEvent::RoleAdminChanged {
            role: *role,
            previous_admin_role,
            new_admin_role: *admin_role,
        });
    }

    fn take_events(&mut self) -> Vec<AccessEvent> {
        std::mem::take(&mut self.events)
    }
}
