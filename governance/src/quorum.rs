//! Quorum as a fraction of past total supply.
//!
//! The numerator is checkpointed, so changing it never moves the quorum of
//! proposals whose snapshot has already passed.

use crate::error::GovernanceError;
use covenant_types::Timepoint;
use covenant_votes::{Trace, VotingPowerSource};

#[derive(Clone, Debug)]
pub struct QuorumFraction {
    numerators: Trace,
    denominator: u128,
}

impl QuorumFraction {
    /// The genesis numerator applies from timepoint zero.
    ///
    /// The denominator must be non-zero and fit in 64 bits.
    pub fn new(numerator: u128, denominator: u128) -> Result<Self, GovernanceError> {
        if denominator == 0 || denominator > u64::MAX as u128 || numerator > denominator {
            return Err(GovernanceError::InvalidQuorumFraction {
                numerator,
                denominator,
            });
        }
        let mut numerators = Trace::new();
        numerators
            .push(Timepoint::ZERO, numerator)
            .map_err(covenant_votes::VotesError::from)?;
        Ok(Self {
            numerators,
            denominator,
        })
    }

    pub fn numerator(&self) -> u128 {
        self.numerators.latest()
    }

    /// Numerator in force at `timepoint`.
    pub fn numerator_at(&self, timepoint: Timepoint) -> u128 {
        match self.numerators.latest_checkpoint() {
            Some(latest) if latest.key <= timepoint => latest.value,
            _ => self.numerators.upper_lookup_recent(timepoint),
        }
    }

    pub fn denominator(&self) -> u128 {
        self.denominator
    }

    /// Record a new numerator at `now`. Returns the previous one.
    pub fn update(&mut self, numerator: u128, now: Timepoint) -> Result<u128, GovernanceError> {
        if numerator > self.denominator {
            return Err(GovernanceError::InvalidQuorumFraction {
                numerator,
                denominator: self.denominator,
            });
        }
        let (previous, _) = self
            .numerators
            .push(now, numerator)
            .map_err(covenant_votes::VotesError::from)?;
        Ok(previous)
    }

    /// Quorum for a proposal snapshotted at `timepoint`.
    pub fn quorum(
        &self,
        source: &dyn VotingPowerSource,
        timepoint: Timepoint,
        now: Timepoint,
    ) -> Result<u128, GovernanceError> {
        let supply = source.get_past_total_supply(timepoint, now)?;
        Ok(mul_div(supply, self.numerator_at(timepoint), self.denominator))
    }
}

/// `a * n / d` rounded down, for `n <= d <= u64::MAX`.
fn mul_div(a: u128, n: u128, d: u128) -> u128 {
    match a.checked_mul(n) {
        Some(product) => product / d,
        // (a % d) * n < d * d <= 2^128
        None => (a / d) * n + (a % d) * n / d,
    }
}
