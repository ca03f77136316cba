//! Vote counting policies.
//!
//! A policy turns one cast (support, weight, params) into bucket totals and
//! decides from the totals whether quorum was reached and the vote passed.
//! Both built-in policies count For and Abstain toward quorum and pass a
//! proposal when For strictly exceeds Against.

use crate::error::GovernanceError;
use crate::tally::ProposalVote;
use covenant_types::{Address, CountingMode};
use std::fmt::Debug;
use std::sync::Arc;

/// Ballot options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Support {
    Against = 0,
    For = 1,
    Abstain = 2,
    /// Split weight across the three buckets, see [`fractional_params`].
    Fractional = 255,
}

impl Support {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Against),
            1 => Some(Self::For),
            2 => Some(Self::Abstain),
            255 => Some(Self::Fractional),
            _ => None,
        }
    }
}

impl From<Support> for u8 {
    fn from(support: Support) -> u8 {
        support as u8
    }
}

pub trait CountingPolicy: Debug + Send + Sync {
    /// Machine-readable description of the counting rules.
    fn mode(&self) -> &'static str;

    /// Add a cast to `tally`, returning the weight that was counted.
    ///
    /// The caller has already rejected repeat voters.
    fn count_vote(
        &self,
        tally: &mut ProposalVote,
        voter: &Address,
        support: u8,
        weight: u128,
        params: &[u8],
    ) -> Result<u128, GovernanceError>;

    fn quorum_reached(&self, tally: &ProposalVote, quorum: u128) -> bool {
        tally.for_votes.saturating_add(tally.abstain) >= quorum
    }

    fn vote_succeeded(&self, tally: &ProposalVote) -> bool {
        tally.for_votes > tally.against
    }
}

/// Full weight on one of Against, For, Abstain. Params are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleCounting;

impl CountingPolicy for SimpleCounting {
    fn mode(&self) -> &'static str {
        "support=bravo&quorum=for,abstain"
    }

    fn count_vote(
        &self,
        tally: &mut ProposalVote,
        _voter: &Address,
        support: u8,
        weight: u128,
        _params: &[u8],
    ) -> Result<u128, GovernanceError> {
        match Support::from_u8(support) {
            Some(Support::Against) => tally.add(weight, 0, 0),
            Some(Support::For) => tally.add(0, weight, 0),
            Some(Support::Abstain) => tally.add(0, 0, weight),
            _ => return Err(GovernanceError::InvalidVoteType(support)),
        }
        Ok(weight)
    }
}

/// Like [`SimpleCounting`], plus [`Support::Fractional`] casts that split
/// weight across the buckets. Weight left over from a split is not counted.
#[derive(Clone, Copy, Debug, Default)]
pub struct FractionalCounting;

impl CountingPolicy for FractionalCounting {
    fn mode(&self) -> &'static str {
        "support=bravo,fractional&quorum=for,abstain&params=fractional"
    }

    fn count_vote(
        &self,
        tally: &mut ProposalVote,
        voter: &Address,
        support: u8,
        weight: u128,
        params: &[u8],
    ) -> Result<u128, GovernanceError> {
        match Support::from_u8(support) {
            Some(Support::Fractional) => {
                let (against, for_votes, abstain) = decode_fractional(params)?;
                let used = against
                    .checked_add(for_votes)
                    .and_then(|s| s.checked_add(abstain))
                    .ok_or(GovernanceError::InvalidVoteParams)?;
                if used > weight {
                    return Err(GovernanceError::ExceedRemainingWeight {
                        voter: voter.clone(),
                        used,
                        remaining: weight,
                    });
                }
                tally.add(against, for_votes, abstain);
                Ok(used)
            }
            Some(_) if !params.is_empty() => Err(GovernanceError::InvalidVoteParams),
            Some(_) => SimpleCounting.count_vote(tally, voter, support, weight, params),
            None => Err(GovernanceError::InvalidVoteType(support)),
        }
    }
}

/// Params of a fractional cast: against, for, abstain as big-endian `u128`s.
pub fn fractional_params(against: u128, for_votes: u128, abstain: u128) -> Vec<u8> {
    let mut params = Vec::with_capacity(48);
    params.extend_from_slice(&against.to_be_bytes());
    params.extend_from_slice(&for_votes.to_be_bytes());
    params.extend_from_slice(&abstain.to_be_bytes());
    params
}

fn decode_fractional(params: &[u8]) -> Result<(u128, u128, u128), GovernanceError> {
    if params.len() != 48 {
        return Err(GovernanceError::InvalidVoteParams);
    }
    let word = |i: usize| {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&params[i * 16..(i + 1) * 16]);
        u128::from_be_bytes(bytes)
    };
    Ok((word(0), word(1), word(2)))
}

/// The built-in policy for a configured counting mode.
pub fn policy_for(mode: CountingMode) -> Arc<dyn CountingPolicy> {
    match mode {
        CountingMode::Simple => Arc::new(SimpleCounting),
        CountingMode::Fractional => Arc::new(FractionalCounting),
    }
}
