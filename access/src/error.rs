//! Permission errors.

use covenant_types::{Address, RoleId, Timepoint};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("{account} is missing role {needed_role}")]
    UnauthorizedAccount { account: Address, needed_role: RoleId },

    #[error("an account can only renounce roles for itself")]
    BadConfirmation,

    #[error("invalid default admin: {account:?}")]
    InvalidDefaultAdmin { account: Option<Address> },

    #[error("default admin role can only be moved through a delayed transfer")]
    EnforcedDefaultAdminRules,

    #[error("default admin delay not elapsed (schedule {schedule:?})")]
    EnforcedDefaultAdminDelay { schedule: Option<Timepoint> },
}
