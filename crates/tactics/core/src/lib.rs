//! Pure squad-tactics rules shared by the runtime and offline tools.
//!
//! `tactics-core` holds the deterministic building blocks: geometry, the role
//! table, per-role tactical positions, spiral fallback sampling, objective
//! sharing tiers, the combat event registry and clustering, configuration,
//! and the oracle contracts the host implements. It performs no logging and no
//! I/O; randomness always comes in through an explicit generator.
pub mod config;
pub mod env;
pub mod error;
pub mod events;
pub mod formation;
pub mod geometry;
pub mod personality;
pub mod rng;
pub mod roles;
pub mod sharing;
pub mod spiral;
pub mod tactical;

pub use config::{
    ConfigAdjustment, EventRegistryConfig, FormationConfig, PositionGates, SquadStrategyConfig,
    TacticsConfig, TaskConfig,
};
pub use env::{
    CoverSource, PositionValidator, ReachabilityOracle, SightlineOracle, TacticalEnv,
};
pub use error::ConfigError;
pub use events::{
    CombatCluster, CombatEvent, CombatEventKind, CombatEventRegistry, EventWeights,
    cluster_events, death_events,
};
pub use formation::{Pace, follow_slot, pace_for};
pub use geometry::{Facing, Vec3};
pub use personality::{SquadPersonality, clamp_coordination};
pub use rng::{TacticsRng, seeded};
pub use roles::{ObjectiveAction, SquadRole, assign_roles};
pub use sharing::{
    Capabilities, SharingMember, SharingParams, SharingTier, compute_tiers, degrade,
    roll_sharing, sharing_chance,
};
pub use spiral::Spiral;
pub use tactical::{GeometryParams, Slot, Variant, candidate, slots};
