//! Scenario scripts: a JSON list of steps replayed against an in-memory
//! engine on a deterministic clock.
//!
//! Every step prints one JSON line with its outcome and the events it
//! produced, so a run can be diffed against a previous one.

use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use anyhow::Context;
use covenant_access::DEFAULT_ADMIN_ROLE;
use covenant_crypto::role_id;
use covenant_engine::{EngineConfig, EngineError, EngineEvent, GovernanceEngine};
use covenant_governance::ProposalRequest;
use covenant_nullables::{NullClock, NullExecutor, NullVerifier};
use covenant_types::params::amount_str;
use covenant_types::{Action, Address, ProposalId, RoleId, Timepoint};
use covenant_utils::parse_duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Clock value before the first step.
    #[serde(default)]
    pub start: u64,
    /// Targets whose actions the simulated executor rejects.
    #[serde(default)]
    pub fail_targets: Vec<Address>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptAction {
    pub target: Address,
    #[serde(default, with = "amount_str")]
    pub value: u128,
    /// UTF-8 payload text.
    #[serde(default)]
    pub payload: String,
}

impl ScriptAction {
    fn to_action(&self) -> Action {
        Action::new(self.target.clone(), self.value, self.payload.as_bytes().to_vec())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Move the clock forward by a duration such as `"2d"` or `"100"`.
    Advance { by: String },
    SetTime { to: u64 },
    GrantRole {
        caller: Address,
        role: String,
        account: Address,
    },
    Mint {
        caller: Address,
        to: Address,
        #[serde(with = "amount_str")]
        amount: u128,
    },
    Delegate {
        account: Address,
        delegatee: Option<Address>,
    },
    Propose {
        proposer: Address,
        actions: Vec<ScriptAction>,
        description: String,
        /// Name later steps use for this proposal. Defaults to the description.
        label: Option<String>,
    },
    CastVote {
        voter: Address,
        proposal: String,
        support: u8,
        #[serde(default)]
        reason: String,
    },
    Queue { proposal: String },
    Execute { proposal: String },
    Cancel { caller: Address, proposal: String },
    State { proposal: String },
    BeginAdminTransfer {
        caller: Address,
        new_admin: Option<Address>,
    },
    AcceptAdminTransfer { caller: Address },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Self::Advance { .. } => "advance",
            Self::SetTime { .. } => "set_time",
            Self::GrantRole { .. } => "grant_role",
            Self::Mint { .. } => "mint",
            Self::Delegate { .. } => "delegate",
            Self::Propose { .. } => "propose",
            Self::CastVote { .. } => "cast_vote",
            Self::Queue { .. } => "queue",
            Self::Execute { .. } => "execute",
            Self::Cancel { .. } => "cancel",
            Self::State { .. } => "state",
            Self::BeginAdminTransfer { .. } => "begin_admin_transfer",
            Self::AcceptAdminTransfer { .. } => "accept_admin_transfer",
        }
    }
}

/// One output line.
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub op: &'static str,
    pub at: Timepoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub events: Vec<EngineEvent>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub failed: usize,
}

pub fn load_script(path: &std::path::Path) -> anyhow::Result<Script> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
}

fn resolve_role(name: &str) -> RoleId {
    match name {
        "DEFAULT_ADMIN_ROLE" => DEFAULT_ADMIN_ROLE,
        other => role_id(other),
    }
}

struct Runner {
    engine: GovernanceEngine<NullExecutor>,
    clock: Rc<NullClock>,
    proposals: HashMap<String, ProposalId>,
}

impl Runner {
    fn proposal(&self, label: &str) -> Result<ProposalId, String> {
        self.proposals
            .get(label)
            .copied()
            .ok_or_else(|| format!("unknown proposal label {label:?}"))
    }

    fn apply(&mut self, step: &Step) -> Result<Option<String>, String> {
        let engine_err = |e: EngineError| e.to_string();
        match step {
            Step::Advance { by } => {
                let delta = parse_duration(by).map_err(|e| e.to_string())?;
                self.clock.advance(delta);
                Ok(None)
            }
            Step::SetTime { to } => {
                self.clock.set(*to);
                Ok(None)
            }
            Step::GrantRole {
                caller,
                role,
                account,
            } => self
                .engine
                .grant_role(caller, &resolve_role(role), account)
                .map(|granted| Some(granted.to_string()))
                .map_err(engine_err),
            Step::Mint { caller, to, amount } => self
                .engine
                .mint(caller, to, *amount)
                .map(|_| None)
                .map_err(engine_err),
            Step::Delegate { account, delegatee } => self
                .engine
                .delegate(account, delegatee.as_ref())
                .map(|_| None)
                .map_err(engine_err),
            Step::Propose {
                proposer,
                actions,
                description,
                label,
            } => {
                let actions = actions.iter().map(ScriptAction::to_action).collect();
                let id = self
                    .engine
                    .propose(proposer, ProposalRequest::new(actions, description.clone()))
                    .map_err(engine_err)?;
                let label = label.clone().unwrap_or_else(|| description.clone());
                self.proposals.insert(label, id);
                Ok(Some(id.to_string()))
            }
            Step::CastVote {
                voter,
                proposal,
                support,
                reason,
            } => {
                let id = self.proposal(proposal)?;
                self.engine
                    .cast_vote(voter, &id, *support, reason)
                    .map(|weight| Some(weight.to_string()))
                    .map_err(engine_err)
            }
            Step::Queue { proposal } => {
                let id = self.proposal(proposal)?;
                self.engine
                    .queue(&id)
                    .map(|eta| Some(eta.to_string()))
                    .map_err(engine_err)
            }
            Step::Execute { proposal } => {
                let id = self.proposal(proposal)?;
                self.engine.execute(&id).map(|_| None).map_err(engine_err)
            }
            Step::Cancel { caller, proposal } => {
                let id = self.proposal(proposal)?;
                self.engine
                    .cancel(caller, &id)
                    .map(|_| None)
                    .map_err(engine_err)
            }
            Step::State { proposal } => {
                let id = self.proposal(proposal)?;
                self.engine
                    .proposal_state(&id)
                    .map(|state| Some(state.to_string()))
                    .map_err(engine_err)
            }
            Step::BeginAdminTransfer { caller, new_admin } => self
                .engine
                .begin_admin_transfer(caller, new_admin.clone())
                .map(|schedule| Some(schedule.to_string()))
                .map_err(engine_err),
            Step::AcceptAdminTransfer { caller } => self
                .engine
                .accept_admin_transfer(caller)
                .map(|_| None)
                .map_err(engine_err),
        }
    }
}

/// Replay `script` against a fresh engine built from `config`, writing one
/// JSON line per step to `out`.
pub fn run(config: &EngineConfig, script: &Script, out: &mut impl Write) -> anyhow::Result<RunSummary> {
    let clock = Rc::new(NullClock::with_mode(script.start, config.clock_mode));
    let mut executor = NullExecutor::new();
    for target in &script.fail_targets {
        executor.fail_on(target.clone());
    }
    let engine = GovernanceEngine::new(config, clock.clone(), executor, Box::new(NullVerifier::new()))
        .context("building engine")?;

    let mut runner = Runner {
        engine,
        clock,
        proposals: HashMap::new(),
    };
    let mut summary = RunSummary::default();
    let genesis = runner.engine.take_events();
    tracing::debug!(events = genesis.len(), "engine genesis events");

    for (index, step) in script.steps.iter().enumerate() {
        let outcome = runner.apply(step);
        let report = StepReport {
            step: index,
            op: step.name(),
            at: runner.engine.now(),
            result: outcome.as_ref().ok().cloned().flatten(),
            error: outcome.as_ref().err().cloned(),
            events: runner.engine.take_events(),
        };
        if let Err(error) = &outcome {
            tracing::info!(step = index, op = step.name(), %error, "step failed");
            summary.failed += 1;
        }
        summary.steps += 1;
        serde_json::to_writer(&mut *out, &report)?;
        writeln!(out)?;
    }

    let executed = runner.engine.executor().executed().len();
    tracing::info!(steps = summary.steps, failed = summary.failed, executed, "scenario finished");
    Ok(summary)
}
