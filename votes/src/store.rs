//! Checkpointed voting-power store with delegation.
//!
//! Holders own voting units; power belongs to whoever a holder delegates to.
//! Units that were never delegated carry no power, so a holder must delegate
//! (possibly to itself) before its units count.
//!
//! Every mutation validates fully before it writes, so a failed call leaves
//! the store untouched.

use crate::checkpoints::{Checkpoint, Trace};
use crate::error::VotesError;
use crate::events::VotesEvent;
use crate::source::VotingPowerSource;
use covenant_crypto::{delegation_digest, Signature, SignatureVerifier};
use covenant_types::{Address, Timepoint, VotesParams};
use std::collections::HashMap;

/// Per-delegate and total voting power histories.
#[derive(Clone, Debug)]
pub struct VotesStore {
    /// holder → delegate.
    delegates: HashMap<Address, Address>,
    /// delegate → power history.
    delegate_checkpoints: HashMap<Address, Trace>,
    /// Total supply history.
    total_checkpoints: Trace,
    /// holder → voting units held.
    units: HashMap<Address, u128>,
    /// Signature nonces for delegate-by-signature.
    nonces: HashMap<Address, u64>,
    max_supply: u128,
    events: Vec<VotesEvent>,
}

impl VotesStore {
    pub fn new(params: &VotesParams) -> Self {
        Self {
            delegates: HashMap::new(),
            delegate_checkpoints: HashMap::new(),
            total_checkpoints: Trace::new(),
            units: HashMap::new(),
            nonces: HashMap::new(),
            max_supply: params.max_supply,
            events: Vec::new(),
        }
    }

    pub fn max_supply(&self) -> u128 {
        self.max_supply
    }

    /// Current delegate of `account`, if any.
    pub fn delegates(&self, account: &Address) -> Option<&Address> {
        self.delegates.get(account)
    }

    /// Voting units held by `holder` (not its voting power).
    pub fn voting_units(&self, holder: &Address) -> u128 {
        self.units.get(holder).copied().unwrap_or(0)
    }

    /// Latest total supply.
    pub fn total_supply(&self) -> u128 {
        self.total_checkpoints.latest()
    }

    pub fn num_checkpoints(&self, account: &Address) -> usize {
        self.delegate_checkpoints
            .get(account)
            .map(Trace::len)
            .unwrap_or(0)
    }

    pub fn checkpoint_at(&self, account: &Address, pos: usize) -> Option<Checkpoint> {
        self.delegate_checkpoints.get(account)?.at(pos)
    }

    /// Next unused signature nonce of `account`.
    pub fn nonces(&self, account: &Address) -> u64 {
        self.nonces.get(account).copied().unwrap_or(0)
    }

    /// Drain events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<VotesEvent> {
        std::mem::take(&mut self.events)
    }

    /// Point `account`'s voting units at `delegatee` (or at nobody).
    pub fn delegate(
        &mut self,
        account: &Address,
        delegatee: Option<&Address>,
        now: Timepoint,
    ) -> Result<(), VotesError> {
        let previous = self.delegates.get(account).cloned();
        let units = self.voting_units(account);
        let plan = self.plan_move(previous.as_ref(), delegatee, units, now)?;

        match delegatee {
            Some(d) => {
                self.delegates.insert(account.clone(), d.clone());
            }
            None => {
                self.delegates.remove(account);
            }
        }
        self.events.push(VotesEvent::DelegateChanged {
            delegator: account.clone(),
            from_delegate: previous,
            to_delegate: delegatee.cloned(),
        });
        tracing::debug!(%account, delegatee = ?delegatee, units, "delegate changed");

        self.apply_move(plan, now)
    }

    /// Delegate on behalf of `signer`, authorized by an off-chain signature.
    #[allow(clippy::too_many_arguments)]
    pub fn delegate_by_sig(
        &mut self,
        signer: &Address,
        delegatee: &Address,
        nonce: u64,
        expiry: Timepoint,
        signature: &Signature,
        verifier: &dyn SignatureVerifier,
        now: Timepoint,
    ) -> Result<(), VotesError> {
        if now > expiry {
            return Err(VotesError::SignatureExpired { expiry });
        }
        let expected = self.nonces(signer);
        if nonce != expected {
            return Err(VotesError::InvalidAccountNonce {
                account: signer.clone(),
                expected,
            });
        }
        let digest = delegation_digest(delegatee, nonce, expiry);
        if !verifier.verify(signer, &digest, signature) {
            return Err(VotesError::InvalidSignature {
                signer: signer.clone(),
            });
        }

        self.delegate(signer, Some(delegatee), now)?;
        *self.nonces.entry(signer.clone()).or_insert(0) += 1;
        Ok(())
    }

    /// Move `amount` voting units between holders.
    ///
    /// `from = None` mints, `to = None` burns. Power follows the holders'
    /// delegates, and the total supply history changes on mint and burn.
    pub fn transfer_voting_units(
        &mut self,
        from: Option<&Address>,
        to: Option<&Address>,
        amount: u128,
        now: Timepoint,
    ) -> Result<(), VotesError> {
        if amount == 0 {
            return Ok(());
        }

        if let Some(holder) = from {
            let available = self.voting_units(holder);
            if available < amount {
                return Err(VotesError::InsufficientUnits {
                    holder: holder.clone(),
                    needed: amount,
                    available,
                });
            }
        }

        let supply = match (from, to) {
            (None, Some(_)) => {
                let next = self.total_supply().checked_add(amount);
                match next {
                    Some(supply) if supply <= self.max_supply => {
                        self.total_checkpoints.preview_delta(now, amount, true)?;
                        Some(supply)
                    }
                    _ => {
                        return Err(VotesError::ExceededSafeSupply {
                            supply: self.total_supply().saturating_add(amount),
                            cap: self.max_supply,
                        })
                    }
                }
            }
            (Some(_), None) => Some(self.total_checkpoints.preview_delta(now, amount, false)?),
            _ => None,
        };

        if let Some(holder) = to {
            if from != to {
                self.voting_units(holder)
                    .checked_add(amount)
                    .ok_or(crate::error::CheckpointError::Overflow)?;
            }
        }

        let from_delegate = from.and_then(|h| self.delegates.get(h)).cloned();
        let to_delegate = to.and_then(|h| self.delegates.get(h)).cloned();
        let plan = self.plan_move(from_delegate.as_ref(), to_delegate.as_ref(), amount, now)?;

        if let Some(holder) = from {
            let remaining = self.voting_units(holder) - amount;
            if remaining == 0 {
                self.units.remove(holder);
            } else {
                self.units.insert(holder.clone(), remaining);
            }
        }
        if let Some(holder) = to {
            let units = self.voting_units(holder).saturating_add(amount);
            self.units.insert(holder.clone(), units);
        }
        if let Some(supply) = supply {
            self.total_checkpoints.push(now, supply)?;
        }

        self.apply_move(plan, now)
    }

    /// Compute the new power of each delegate touched by a move, without writing.
    fn plan_move(
        &self,
        from: Option<&Address>,
        to: Option<&Address>,
        amount: u128,
        now: Timepoint,
    ) -> Result<Vec<(Address, u128)>, VotesError> {
        let mut plan = Vec::with_capacity(2);
        if from == to || amount == 0 {
            return Ok(plan);
        }
        let empty = Trace::new();
        if let Some(delegate) = from {
            let trace = self.delegate_checkpoints.get(delegate).unwrap_or(&empty);
            plan.push((delegate.clone(), trace.preview_delta(now, amount, false)?));
        }
        if let Some(delegate) = to {
            let trace = self.delegate_checkpoints.get(delegate).unwrap_or(&empty);
            plan.push((delegate.clone(), trace.preview_delta(now, amount, true)?));
        }
        Ok(plan)
    }

    fn apply_move(&mut self, plan: Vec<(Address, u128)>, now: Timepoint) -> Result<(), VotesError> {
        for (delegate, value) in plan {
            let (previous_votes, new_votes) = self
                .delegate_checkpoints
                .entry(delegate.clone())
                .or_default()
                .push(now, value)?;
            self.events.push(VotesEvent::DelegateVotesChanged {
                delegate,
                previous_votes,
                new_votes,
            });
        }
        Ok(())
    }
}

impl VotingPowerSource for VotesStore {
    fn get_votes(&self, account: &Address) -> u128 {
        self.delegate_checkpoints
            .get(account)
            .map(Trace::latest)
            .unwrap_or(0)
    }

    fn get_past_votes(
        &self,
        account: &Address,
        timepoint: Timepoint,
        now: Timepoint,
    ) -> Result<u128, VotesError> {
        if timepoint >= now {
            return Err(VotesError::FutureLookup {
                timepoint,
                clock: now,
            });
        }
        Ok(self
            .delegate_checkpoints
            .get(account)
            .map(|trace| trace.upper_lookup_recent(timepoint))
            .unwrap_or(0))
    }

    fn get_past_total_supply(
        &self,
        timepoint: Timepoint,
        now: Timepoint,
    ) -> Result<u128, VotesError> {
        if timepoint >= now {
            return Err(VotesError::FutureLookup {
                timepoint,
                clock: now,
            });
        }
        Ok(self.total_checkpoints.upper_lookup_recent(timepoint))
    }
}
