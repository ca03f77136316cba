use crate::error::GovernanceError;
use covenant_types::GovernorParams;
use serde::{Deserialize, Serialize};

/// Governor timing and admission settings, changeable by governance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorSettings {
    voting_delay: u64,
    voting_period: u64,
    proposal_threshold: u128,
    late_quorum_extension: u64,
}

impl GovernorSettings {
    pub fn new(params: &GovernorParams) -> Result<Self, GovernanceError> {
        if params.voting_period == 0 {
            return Err(GovernanceError::InvalidVotingPeriod);
        }
        Ok(Self {
            voting_delay: params.voting_delay,
            voting_period: params.voting_period,
            proposal_threshold: params.proposal_threshold,
            late_quorum_extension: params.late_quorum_extension,
        })
    }

    pub fn voting_delay(&self) -> u64 {
        self.voting_delay
    }

    pub fn voting_period(&self) -> u64 {
        self.voting_period
    }

    pub fn proposal_threshold(&self) -> u128 {
        self.proposal_threshold
    }

    pub fn late_quorum_extension(&self) -> u64 {
        self.late_quorum_extension
    }

    /// Each setter returns the previous value.
    pub fn set_voting_delay(&mut self, value: u64) -> u64 {
        std::mem::replace(&mut self.voting_delay, value)
    }

    pub fn set_voting_period(&mut self, value: u64) -> Result<u64, GovernanceError> {
        if value == 0 {
            return Err(GovernanceError::InvalidVotingPeriod);
        }
        Ok(std::mem::replace(&mut self.voting_period, value))
    }

    pub fn set_proposal_threshold(&mut self, value: u128) -> u128 {
        std::mem::replace(&mut self.proposal_threshold, value)
    }

    pub fn set_late_quorum_extension(&mut self, value: u64) -> u64 {
        std::mem::replace(&mut self.late_quorum_extension, value)
    }
}
