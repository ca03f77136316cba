//! Engine parameters: everything the governance process can later retune.
//!
//! These are the genesis values; once the engine runs, governor settings,
//! the quorum numerator, the timelock delay, and the admin delay change only
//! through their own governed entry points.

use serde::{Deserialize, Serialize};

/// How votes are tallied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingMode {
    /// Against / For / Abstain, full weight on one option.
    #[default]
    Simple,
    /// Like `Simple`, plus a fractional option that splits weight across
    /// the three buckets.
    Fractional,
}

/// Proposal ledger settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorParams {
    /// Name mixed into signed ballots.
    pub name: String,
    /// Delay between proposal creation and the voting snapshot.
    pub voting_delay: u64,
    /// Length of the voting window. Must be non-zero.
    pub voting_period: u64,
    /// Voting power required to propose.
    #[serde(with = "amount_str")]
    pub proposal_threshold: u128,
    /// Quorum = past total supply * numerator / denominator.
    #[serde(with = "amount_str")]
    pub quorum_numerator: u128,
    #[serde(with = "amount_str")]
    pub quorum_denominator: u128,
    pub counting: CountingMode,
    /// Minimum voting time left after quorum is first reached. 0 disables.
    pub late_quorum_extension: u64,
    /// Time a queued proposal stays executable after its eta. `None` = forever.
    pub execution_grace_period: Option<u64>,
}

impl Default for GovernorParams {
    fn default() -> Self {
        Self {
            name: "Covenant Governor".to_string(),
            voting_delay: 7_200,
            voting_period: 50_400,
            proposal_threshold: 0,
            quorum_numerator: 4,
            quorum_denominator: 100,
            counting: CountingMode::Simple,
            late_quorum_extension: 0,
            execution_grace_period: None,
        }
    }
}

/// Timelock settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelockParams {
    /// Minimum delay between scheduling and execution.
    pub min_delay: u64,
    /// Anyone may execute ready operations.
    pub open_execution: bool,
}

impl Default for TimelockParams {
    fn default() -> Self {
        Self {
            min_delay: 172_800,
            open_execution: true,
        }
    }
}

/// Default-admin rotation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminParams {
    /// Delay between beginning and accepting an admin transfer.
    pub initial_delay: u64,
    /// Cap on the wait before an increased delay takes effect.
    pub delay_increase_wait: u64,
}

impl Default for AdminParams {
    fn default() -> Self {
        Self {
            initial_delay: 259_200,
            delay_increase_wait: 432_000,
        }
    }
}

/// Voting-power store settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VotesParams {
    /// Largest total supply the store accepts.
    #[serde(with = "amount_str")]
    pub max_supply: u128,
}

impl Default for VotesParams {
    fn default() -> Self {
        Self {
            max_supply: u128::MAX,
        }
    }
}

/// `u128` amounts as decimal strings; TOML integers stop at `i64`.
pub mod amount_str {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Int(u64),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s.parse().map_err(de::Error::custom),
            Raw::Int(n) => Ok(n as u128),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let g = GovernorParams::default();
        assert!(g.voting_period > 0);
        assert!(g.quorum_numerator <= g.quorum_denominator);
        assert!(AdminParams::default().delay_increase_wait > 0);
    }

    #[test]
    fn amounts_accept_strings_and_integers() {
        let from_str: VotesParams = serde_json::from_str(r#"{"max_supply":"340282366920938463463374607431768211455"}"#).unwrap();
        assert_eq!(from_str.max_supply, u128::MAX);
        let from_int: VotesParams = serde_json::from_str(r#"{"max_supply":1000}"#).unwrap();
        assert_eq!(from_int.max_supply, 1000);
    }
}
