//! Data-driven tactics content and loaders.
//!
//! This crate reads tuning and simulation input from disk:
//! - Tactics configuration (TOML)
//! - Simulation scenarios: agents, squads, scheduled objectives and combat
//!   events (RON)
//!
//! Content is consumed by the runtime and the developer tooling; the pure
//! rules in `tactics-core` never touch the filesystem.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AgentSpec, ConfigLoader, EventSpec, ObjectiveSpec, ObstacleSpec, Scenario, ScenarioLoader,
    SquadSpec,
};
