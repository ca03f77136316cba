//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use covenant_types::{Address, AdminParams, ClockMode, GovernorParams, TimelockParams, VotesParams};

use crate::logging::LogFormat;
use crate::EngineError;

/// Configuration for a governance engine.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Address the governor answers to.
    #[serde(default = "default_governor_address")]
    pub governor_address: Address,

    /// Address of the timelock, when one is used.
    #[serde(default = "default_timelock_address")]
    pub timelock_address: Address,

    /// Route proposal execution through a timelock.
    #[serde(default = "default_true")]
    pub use_timelock: bool,

    /// Initial holder of the default admin role.
    #[serde(default = "default_admin")]
    pub admin: Address,

    /// What the injected clock counts.
    #[serde(default)]
    pub clock_mode: ClockMode,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub governor: GovernorParams,

    #[serde(default)]
    pub timelock: TimelockParams,

    #[serde(default)]
    pub admin_rules: AdminParams,

    #[serde(default)]
    pub votes: VotesParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_governor_address() -> Address {
    Address::new("governor")
}

fn default_timelock_address() -> Address {
    Address::new("timelock")
}

fn default_admin() -> Address {
    Address::new("admin")
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Reject settings the components would refuse at construction.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.governor.voting_period == 0 {
            return Err(EngineError::Config("governor.voting_period must be non-zero".into()));
        }
        if self.governor.quorum_denominator == 0
            || self.governor.quorum_numerator > self.governor.quorum_denominator
        {
            return Err(EngineError::Config(format!(
                "invalid quorum fraction {}/{}",
                self.governor.quorum_numerator, self.governor.quorum_denominator
            )));
        }
        if self.use_timelock && self.timelock_address == self.governor_address {
            return Err(EngineError::Config(
                "timelock_address must differ from governor_address".into(),
            ));
        }
        let admin_is_component = self.admin == self.governor_address
            || (self.use_timelock && self.admin == self.timelock_address);
        if admin_is_component {
            return Err(EngineError::Config(format!(
                "admin {} is an engine component address",
                self.admin
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            governor_address: default_governor_address(),
            timelock_address: default_timelock_address(),
            use_timelock: default_true(),
            admin: default_admin(),
            clock_mode: ClockMode::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            governor: GovernorParams::default(),
            timelock: TimelockParams::default(),
            admin_rules: AdminParams::default(),
            votes: VotesParams::default(),
        }
    }
}
