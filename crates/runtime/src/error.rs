//! Errors surfaced by the runtime API.
//!
//! Tactical outcomes (no selection, no position, tier none) are reported as
//! data on agents and squads. Errors are reserved for API misuse such as
//! stale handles or impossible squad links.
use thiserror::Error;

use crate::world::{AgentId, SquadId};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("unknown agent {0:?}")]
    UnknownAgent(AgentId),

    #[error("unknown squad {0:?}")]
    UnknownSquad(SquadId),

    #[error("agent {0:?} is dead")]
    AgentDead(AgentId),

    #[error("agent {agent:?} already belongs to squad {squad:?}")]
    AlreadyInSquad { agent: AgentId, squad: SquadId },

    #[error("agent {0:?} cannot follow itself")]
    SelfFollow(AgentId),

    #[error("agent {0:?} is not in a squad")]
    NotInSquad(AgentId),

    #[error("agent {0:?} does not lead a squad")]
    NotLeader(AgentId),
}
