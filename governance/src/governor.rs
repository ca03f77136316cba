//! The proposal ledger.
//!
//! The governor records proposals and ballots and answers state queries. It
//! performs no external effects: queueing and execution are two-step
//! handshakes (`queue_request`/`mark_queued`, `begin_execute`/
//! `finish_execute`) driven by the engine, which owns the executor and the
//! timelock.

use crate::calls::SettingsUpdate;
use crate::counting::{policy_for, CountingPolicy};
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::proposal::{ProposalCore, ProposalDetails, ProposalRequest, ProposalState};
use crate::quorum::QuorumFraction;
use crate::settings::GovernorSettings;
use crate::tally::{ProposalVote, VoteReceipt};
use covenant_crypto::{ballot_digest, blake2b_256, hash_proposal, Signature, SignatureVerifier};
use covenant_types::{Action, Address, GovernorParams, OperationId, ProposalId, Timepoint};
use covenant_votes::VotingPowerSource;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

#[derive(Clone, Debug)]
struct ProposalRecord {
    core: ProposalCore,
    details: ProposalDetails,
    votes: ProposalVote,
}

#[derive(Clone, Debug)]
pub struct Governor {
    name: String,
    address: Address,
    /// Account that performs proposal actions: the governor itself, or a timelock.
    executor: Address,
    settings: GovernorSettings,
    quorum: QuorumFraction,
    counting: Arc<dyn CountingPolicy>,
    execution_grace_period: Option<u64>,
    proposals: HashMap<ProposalId, ProposalRecord>,
    /// Proposal ids in creation order.
    order: Vec<ProposalId>,
    nonces: HashMap<Address, u64>,
    /// Payload hashes of governor calls the executing proposal may make.
    governance_calls: VecDeque<[u8; 32]>,
    events: Vec<GovernanceEvent>,
}

impl Governor {
    pub fn new(address: Address, params: &GovernorParams) -> Result<Self, GovernanceError> {
        Ok(Self {
            name: params.name.clone(),
            executor: address.clone(),
            address,
            settings: GovernorSettings::new(params)?,
            quorum: QuorumFraction::new(params.quorum_numerator, params.quorum_denominator)?,
            counting: policy_for(params.counting),
            execution_grace_period: params.execution_grace_period,
            proposals: HashMap::new(),
            order: Vec::new(),
            nonces: HashMap::new(),
            governance_calls: VecDeque::new(),
            events: Vec::new(),
        })
    }

    /// Perform proposal actions through `executor` instead of the governor.
    pub fn with_executor(mut self, executor: Address) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_counting(mut self, counting: Arc<dyn CountingPolicy>) -> Self {
        self.counting = counting;
        self
    }

    // ── Views ────────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn executor(&self) -> &Address {
        &self.executor
    }

    pub fn settings(&self) -> &GovernorSettings {
        &self.settings
    }

    pub fn voting_delay(&self) -> u64 {
        self.settings.voting_delay()
    }

    pub fn voting_period(&self) -> u64 {
        self.settings.voting_period()
    }

    pub fn proposal_threshold(&self) -> u128 {
        self.settings.proposal_threshold()
    }

    pub fn late_quorum_extension(&self) -> u64 {
        self.settings.late_quorum_extension()
    }

    pub fn execution_grace_period(&self) -> Option<u64> {
        self.execution_grace_period
    }

    pub fn counting_mode(&self) -> &'static str {
        self.counting.mode()
    }

    pub fn quorum_numerator(&self) -> u128 {
        self.quorum.numerator()
    }

    pub fn quorum_numerator_at(&self, timepoint: Timepoint) -> u128 {
        self.quorum.numerator_at(timepoint)
    }

    pub fn quorum_denominator(&self) -> u128 {
        self.quorum.denominator()
    }

    /// Quorum for a snapshot at `timepoint`, which must be in the past.
    pub fn quorum(
        &self,
        timepoint: Timepoint,
        votes: &dyn VotingPowerSource,
        now: Timepoint,
    ) -> Result<u128, GovernanceError> {
        self.quorum.quorum(votes, timepoint, now)
    }

    pub fn get_votes(
        &self,
        account: &Address,
        timepoint: Timepoint,
        votes: &dyn VotingPowerSource,
        now: Timepoint,
    ) -> Result<u128, GovernanceError> {
        Ok(votes.get_past_votes(account, timepoint, now)?)
    }

    pub fn nonces(&self, account: &Address) -> u64 {
        self.nonces.get(account).copied().unwrap_or(0)
    }

    pub fn hash_proposal(
        &self,
        actions: &[Action],
        description_hash: &[u8; 32],
        authorized_proposer: Option<&Address>,
    ) -> ProposalId {
        hash_proposal(actions, description_hash, authorized_proposer)
    }

    pub fn proposal_core(&self, id: &ProposalId) -> Result<&ProposalCore, GovernanceError> {
        Ok(&self.record(id)?.core)
    }

    pub fn proposal_snapshot(&self, id: &ProposalId) -> Result<Timepoint, GovernanceError> {
        Ok(self.record(id)?.core.vote_start)
    }

    pub fn proposal_deadline(&self, id: &ProposalId) -> Result<Timepoint, GovernanceError> {
        Ok(self.record(id)?.core.deadline())
    }

    pub fn proposal_proposer(&self, id: &ProposalId) -> Result<&Address, GovernanceError> {
        Ok(&self.record(id)?.core.proposer)
    }

    pub fn proposal_eta(&self, id: &ProposalId) -> Result<Option<Timepoint>, GovernanceError> {
        Ok(self.record(id)?.core.eta)
    }

    /// `(against, for, abstain)` totals.
    pub fn proposal_votes(&self, id: &ProposalId) -> Result<(u128, u128, u128), GovernanceError> {
        let votes = &self.record(id)?.votes;
        Ok((votes.against, votes.for_votes, votes.abstain))
    }

    pub fn has_voted(&self, id: &ProposalId, account: &Address) -> Result<bool, GovernanceError> {
        Ok(self.record(id)?.votes.has_voted(account))
    }

    pub fn receipt(
        &self,
        id: &ProposalId,
        account: &Address,
    ) -> Result<Option<VoteReceipt>, GovernanceError> {
        Ok(self.record(id)?.votes.receipt(account).copied())
    }

    pub fn proposal_count(&self) -> usize {
        self.order.len()
    }

    pub fn proposal_details_at(&self, index: usize) -> Option<(ProposalId, &ProposalDetails)> {
        let id = *self.order.get(index)?;
        self.proposals.get(&id).map(|r| (id, &r.details))
    }

    pub fn proposal_details(&self, id: &ProposalId) -> Result<&ProposalDetails, GovernanceError> {
        Ok(&self.record(id)?.details)
    }

    /// Lifecycle state of `id` at `now`.
    pub fn state(
        &self,
        id: &ProposalId,
        votes: &dyn VotingPowerSource,
        now: Timepoint,
    ) -> Result<ProposalState, GovernanceError> {
        let record = self.record(id)?;
        let core = &record.core;

        if core.executed {
            return Ok(ProposalState::Executed);
        }
        if core.canceled {
            return Ok(ProposalState::Canceled);
        }
        if now <= core.vote_start {
            return Ok(ProposalState::Pending);
        }
        if now <= core.deadline() {
            return Ok(ProposalState::Active);
        }

        let quorum = self.quorum.quorum(votes, core.vote_start, now)?;
        if !self.counting.quorum_reached(&record.votes, quorum)
            || !self.counting.vote_succeeded(&record.votes)
        {
            return Ok(ProposalState::Defeated);
        }

        match (core.eta, self.execution_grace_period) {
            (None, _) => Ok(ProposalState::Succeeded),
            (Some(eta), Some(grace)) if eta.has_elapsed(grace, now) => Ok(ProposalState::Expired),
            (Some(_), _) => Ok(ProposalState::Queued),
        }
    }

    // ── Proposals ────────────────────────────────────────────────────────

    pub fn propose(
        &mut self,
        proposer: &Address,
        request: ProposalRequest,
        votes: &dyn VotingPowerSource,
        now: Timepoint,
    ) -> Result<ProposalId, GovernanceError> {
        if request.actions.is_empty() {
            return Err(GovernanceError::InvalidProposalLength {
                targets: 0,
                values: 0,
                payloads: 0,
            });
        }
        if let Some(authorized) = &request.authorized_proposer {
            if authorized != proposer {
                return Err(GovernanceError::RestrictedProposer {
                    proposer: proposer.clone(),
                });
            }
        }

        let threshold = self.settings.proposal_threshold();
        if threshold > 0 {
            // Nothing can be checkpointed before the first timepoint.
            let proposer_votes = if now == Timepoint::ZERO {
                0
            } else {
                votes.get_past_votes(proposer, now.saturating_sub(1), now)?
            };
            if proposer_votes < threshold {
                return Err(GovernanceError::InsufficientProposerVotes {
                    proposer: proposer.clone(),
                    votes: proposer_votes,
                    threshold,
                });
            }
        }

        let id = request.id();
        if self.proposals.contains_key(&id) {
            return Err(GovernanceError::UnexpectedProposalState {
                id,
                current: self.state(&id, votes, now)?,
                expected: 0,
            });
        }

        let vote_start = now.saturating_add(self.settings.voting_delay());
        let vote_duration = self.settings.voting_period();
        let details = ProposalDetails {
            actions: request.actions.clone(),
            description_hash: request.description_hash(),
            authorized_proposer: request.authorized_proposer.clone(),
        };
        self.proposals.insert(
            id,
            ProposalRecord {
                core: ProposalCore {
                    proposer: proposer.clone(),
                    vote_start,
                    vote_duration,
                    executed: false,
                    canceled: false,
                    eta: None,
                    queued_operation: None,
                    extended_deadline: None,
                },
                details,
                votes: ProposalVote::default(),
            },
        );
        self.order.push(id);

        tracing::info!(proposal = ?id, %proposer, %vote_start, actions = request.actions.len(), "proposal created");
        self.events.push(GovernanceEvent::ProposalCreated {
            id,
            proposer: proposer.clone(),
            actions: request.actions,
            vote_start,
            vote_end: vote_start.saturating_add(vote_duration),
            description: request.description,
        });
        Ok(id)
    }

    /// Cast a ballot. Returns the voter's weight at the snapshot.
    #[allow(clippy::too_many_arguments)]
    pub fn cast_vote(
        &mut self,
        id: &ProposalId,
        voter: &Address,
        support: u8,
        reason: &str,
        params: &[u8],
        votes: &dyn VotingPowerSource,
        now: Timepoint,
    ) -> Result<u128, GovernanceError> {
        self.validate_state(id, &[ProposalState::Active], votes, now)?;
        let vote_start = self.record(id)?.core.vote_start;
        let weight = votes.get_past_votes(voter, vote_start, now)?;

        let extension = self.settings.late_quorum_extension();
        let quorum = if extension > 0 {
            Some(self.quorum.quorum(votes, vote_start, now)?)
        } else {
            None
        };

        let counting = Arc::clone(&self.counting);
        let record = self
            .proposals
            .get_mut(id)
            .ok_or(GovernanceError::NonexistentProposal(*id))?;
        if record.votes.has_voted(voter) {
            return Err(GovernanceError::AlreadyCastVote {
                voter: voter.clone(),
            });
        }
        let counted = counting.count_vote(&mut record.votes, voter, support, weight, params)?;
        record.votes.record(
            voter.clone(),
            VoteReceipt {
                support,
                weight,
                counted,
            },
        );

        tracing::debug!(proposal = ?id, %voter, support, weight, "vote cast");
        if params.is_empty() {
            self.events.push(GovernanceEvent::VoteCast {
                voter: voter.clone(),
                id: *id,
                support,
                weight,
                reason: reason.to_string(),
            });
        } else {
            self.events.push(GovernanceEvent::VoteCastWithParams {
                voter: voter.clone(),
                id: *id,
                support,
                weight,
                reason: reason.to_string(),
                params: params.to_vec(),
            });
        }

        if let Some(quorum) = quorum {
            if record.core.extended_deadline.is_none()
                && counting.quorum_reached(&record.votes, quorum)
            {
                let extended_deadline = now.saturating_add(extension);
                if extended_deadline > record.core.deadline() {
                    tracing::info!(proposal = ?id, %extended_deadline, "late quorum, deadline extended");
                    self.events.push(GovernanceEvent::ProposalExtended {
                        id: *id,
                        extended_deadline,
                    });
                }
                record.core.extended_deadline = Some(extended_deadline);
            }
        }

        Ok(weight)
    }

    /// Cast a ballot signed off-chain by `voter`.
    #[allow(clippy::too_many_arguments)]
    pub fn cast_vote_by_sig(
        &mut self,
        id: &ProposalId,
        voter: &Address,
        support: u8,
        signature: &Signature,
        verifier: &dyn SignatureVerifier,
        votes: &dyn VotingPowerSource,
        now: Timepoint,
    ) -> Result<u128, GovernanceError> {
        let nonce = self.nonces(voter);
        let digest = ballot_digest(&self.name, &self.address, id, support, voter, nonce);
        if !verifier.verify(voter, &digest, signature) {
            return Err(GovernanceError::InvalidSignature {
                voter: voter.clone(),
            });
        }
        let weight = self.cast_vote(id, voter, support, "", &[], votes, now)?;
        *self.nonces.entry(voter.clone()).or_insert(0) += 1;
        Ok(weight)
    }

    /// Check that `id` may be queued and return its content.
    pub fn queue_request(
        &self,
        id: &ProposalId,
        votes: &dyn VotingPowerSource,
        now: Timepoint,
    ) -> Result<ProposalDetails, GovernanceError> {
        self.validate_state(id, &[ProposalState::Succeeded], votes, now)?;
        Ok(self.record(id)?.details.clone())
    }

    /// Record that `id` was queued, executable from `eta`.
    pub fn mark_queued(
        &mut self,
        id: &ProposalId,
        eta: Timepoint,
        operation: Option<OperationId>,
    ) -> Result<(), GovernanceError> {
        let record = self
            .proposals
            .get_mut(id)
            .ok_or(GovernanceError::NonexistentProposal(*id))?;
        record.core.eta = Some(eta);
        record.core.queued_operation = operation;
        tracing::info!(proposal = ?id, %eta, "proposal queued");
        self.events.push(GovernanceEvent::ProposalQueued { id: *id, eta });
        Ok(())
    }

    /// Start executing `id`: mark it executed and return its content.
    ///
    /// The executed flag is set before any action runs, so a reentrant
    /// attempt to execute the same proposal fails.
    pub fn begin_execute(
        &mut self,
        id: &ProposalId,
        votes: &dyn VotingPowerSource,
        now: Timepoint,
    ) -> Result<ProposalDetails, GovernanceError> {
        self.validate_state(
            id,
            &[ProposalState::Succeeded, ProposalState::Queued],
            votes,
            now,
        )?;
        let record = self
            .proposals
            .get_mut(id)
            .ok_or(GovernanceError::NonexistentProposal(*id))?;
        record.core.executed = true;

        if self.executor != self.address {
            for action in &record.details.actions {
                if action.target == self.address {
                    self.governance_calls.push_back(blake2b_256(&action.payload));
                }
            }
        }
        tracing::info!(proposal = ?id, actions = record.details.actions.len(), "proposal executing");
        Ok(record.details.clone())
    }

    pub fn finish_execute(&mut self, id: &ProposalId) {
        self.governance_calls.clear();
        self.events.push(GovernanceEvent::ProposalExecuted { id: *id });
    }

    /// Cancel a pending proposal on behalf of its proposer.
    pub fn cancel(
        &mut self,
        caller: &Address,
        id: &ProposalId,
        votes: &dyn VotingPowerSource,
        now: Timepoint,
    ) -> Result<Option<OperationId>, GovernanceError> {
        self.validate_state(id, &[ProposalState::Pending], votes, now)?;
        if self.record(id)?.core.proposer != *caller {
            return Err(GovernanceError::OnlyProposer {
                account: caller.clone(),
            });
        }
        self.cancel_unchecked(id, votes, now)
    }

    /// Cancel `id` in any non-terminal state. Returns the timelock operation
    /// it was queued as, if any, which the caller must cancel too.
    pub fn cancel_unchecked(
        &mut self,
        id: &ProposalId,
        votes: &dyn VotingPowerSource,
        now: Timepoint,
    ) -> Result<Option<OperationId>, GovernanceError> {
        let current = self.state(id, votes, now)?;
        if current.is_terminal() {
            return Err(GovernanceError::UnexpectedProposalState {
                id: *id,
                current,
                expected: !ProposalState::bitmap(&[
                    ProposalState::Canceled,
                    ProposalState::Expired,
                    ProposalState::Executed,
                ]),
            });
        }
        let record = self
            .proposals
            .get_mut(id)
            .ok_or(GovernanceError::NonexistentProposal(*id))?;
        record.core.canceled = true;
        let operation = if current == ProposalState::Queued {
            record.core.queued_operation
        } else {
            None
        };
        tracing::info!(proposal = ?id, from = %current, "proposal canceled");
        self.events.push(GovernanceEvent::ProposalCanceled { id: *id });
        Ok(operation)
    }

    // ── Governance-only calls ────────────────────────────────────────────

    /// Admit a governor call carrying `payload` from `sender`.
    ///
    /// Only the executor may make governance calls. When the executor is a
    /// timelock, the call must also be one the executing proposal makes, so
    /// other operations in the timelock cannot reconfigure the governor.
    pub fn check_governance(
        &mut self,
        sender: &Address,
        payload: &[u8],
    ) -> Result<(), GovernanceError> {
        if *sender != self.executor {
            return Err(GovernanceError::OnlyExecutor {
                account: sender.clone(),
            });
        }
        if self.executor != self.address {
            let hash = blake2b_256(payload);
            match self.governance_calls.iter().position(|h| *h == hash) {
                Some(pos) => {
                    self.governance_calls.drain(..=pos);
                }
                None => return Err(GovernanceError::UnexpectedGovernanceCall),
            }
        }
        Ok(())
    }

    /// Apply a settings change made by governance.
    pub fn configure(
        &mut self,
        sender: &Address,
        payload: &[u8],
        update: SettingsUpdate,
        now: Timepoint,
    ) -> Result<(), GovernanceError> {
        self.check_governance(sender, payload)?;
        let event = match update {
            SettingsUpdate::VotingDelay(new) => GovernanceEvent::VotingDelaySet {
                old: self.settings.set_voting_delay(new),
                new,
            },
            SettingsUpdate::VotingPeriod(new) => GovernanceEvent::VotingPeriodSet {
                old: self.settings.set_voting_period(new)?,
                new,
            },
            SettingsUpdate::ProposalThreshold(new) => GovernanceEvent::ProposalThresholdSet {
                old: self.settings.set_proposal_threshold(new),
                new,
            },
            SettingsUpdate::QuorumNumerator(new) => GovernanceEvent::QuorumNumeratorUpdated {
                old: self.quorum.update(new, now)?,
                new,
            },
            SettingsUpdate::LateQuorumVoteExtension(new) => {
                GovernanceEvent::LateQuorumVoteExtensionSet {
                    old: self.settings.set_late_quorum_extension(new),
                    new,
                }
            }
        };
        tracing::info!(?event, "governor settings changed");
        self.events.push(event);
        Ok(())
    }

    /// Drain events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut self.events)
    }

    fn record(&self, id: &ProposalId) -> Result<&ProposalRecord, GovernanceError> {
        self.proposals
            .get(id)
            .ok_or(GovernanceError::NonexistentProposal(*id))
    }

    fn validate_state(
        &self,
        id: &ProposalId,
        allowed: &[ProposalState],
        votes: &dyn VotingPowerSource,
        now: Timepoint,
    ) -> Result<ProposalState, GovernanceError> {
        let current = self.state(id, votes, now)?;
        if allowed.contains(&current) {
            Ok(current)
        } else {
            Err(GovernanceError::UnexpectedProposalState {
                id: *id,
                current,
                expected: ProposalState::bitmap(allowed),
            })
        }
    }
}
