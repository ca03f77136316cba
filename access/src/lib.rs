//! Role-based permissions for the Covenant governance engine.
//!
//! - [`RoleStore`]: role membership and per-role admin roles
//! - [`PermissionStore`]: the seam consumed by privileged components
//! - [`DefaultAdminRules`]: a single default admin, rotated through a
//!   two-step transfer gated by a changeable delay

pub mod default_admin;
pub mod error;
pub mod events;
pub mod store;

pub use default_admin::DefaultAdminRules;
pub use error::AccessError;
pub use events::AccessEvent;
pub use store::{PermissionStore, RoleStore, DEFAULT_ADMIN_ROLE};
