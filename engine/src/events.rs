//! Events drained from the engine's components after each committed call.

use covenant_access::AccessEvent;
use covenant_governance::GovernanceEvent;
use covenant_timelock::TimelockEvent;
use covenant_votes::VotesEvent;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    Governance(GovernanceEvent),
    Votes(VotesEvent),
    Timelock(TimelockEvent),
    Access(AccessEvent),
}

impl From<GovernanceEvent> for EngineEvent {
    fn from(event: GovernanceEvent) -> Self {
        Self::Governance(event)
    }
}

impl From<VotesEvent> for EngineEvent {
    fn from(event: VotesEvent) -> Self {
        Self::Votes(event)
    }
}

impl From<TimelockEvent> for EngineEvent {
    fn from(event: TimelockEvent) -> Self {
        Self::Timelock(event)
    }
}

impl From<AccessEvent> for EngineEvent {
    fn from(event: AccessEvent) -> Self {
        Self::Access(event)
    }
}
