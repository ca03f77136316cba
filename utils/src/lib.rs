//! Shared utilities for the Covenant workspace.

pub mod logging;
pub mod time;

pub use logging::{env_filter, init_tracing};
pub use time::{format_duration, parse_duration, DurationParseError};
