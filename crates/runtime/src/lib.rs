//! Tick-driven squad tactics runtime.
//!
//! This crate wires the pure rules of `tactics-core` and the selection
//! mechanism of `utility-selector` into a runtime the host embeds. The host
//! owns movement and world queries; every tick it calls [`Runtime::tick`] and
//! reads each agent's `move_target` and `pace` back.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`world`], [`agent`], and [`squad`] hold the handle-based state
//! - [`tasks`] and [`strategies`] are the agent and squad selector options
//! - [`scanner`] and [`threat`] turn combat events into perception and threats
pub mod agent;
pub mod context;
pub mod error;
pub mod runtime;
pub mod scanner;
pub mod squad;
pub mod strategies;
pub mod tasks;
pub mod threat;
pub mod world;

pub use agent::{Agent, AgentSpawn, MAX_FOLLOWERS, NearestEvent, Perception, QuestState};
pub use context::{Oracles, TickContext};
pub use error::{Result, RuntimeError};
pub use runtime::{Runtime, RuntimeBuilder, TickReport};
pub use squad::{ObjectiveState, Squad, SquadObjective, ThreatState};
pub use strategies::{
    BoxedStrategy, PipelineOutcome, RegroupStrategy, TacticalPositioningStrategy,
};
pub use tasks::{BoxedTask, FollowBossTask, InvestigateTask, ObjectiveTask, TacticalPositionTask};
pub use threat::ThreatChange;
pub use world::{AgentId, SquadId, World};

pub use utility_selector::Switch;
