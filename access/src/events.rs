use covenant_types::{Address, RoleId, Timepoint};
use serde::{Deserialize, Serialize};

/// Permission changes, in the order they happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessEvent {
    RoleGranted {
        role: RoleId,
        account: Address,
        sender: Address,
    },
    RoleRevoked {
        role: RoleId,
        account: Address,
        sender: Address,
    },
    RoleAdminChanged {
        role: RoleId,
        previous_admin_role: RoleId,
        new_admin_role: RoleId,
    },
    DefaultAdminTransferScheduled {
        new_admin: Option<Address>,
        accept_schedule: Timepoint,
    },
    DefaultAdminTransferCanceled,
    DefaultAdminDelayChangeScheduled {
        new_delay: u64,
        effect_schedule: Timepoint,
    },
    DefaultAdminDelayChangeCanceled,
}
