//! Tuning parameters.
//!
//! Every struct here is plain data owned by the caller and treated as
//! immutable for the duration of a tick. Malformed values are tolerated:
//! [`TacticsConfig::sanitized`] clamps them and reports each change, while
//! [`TacticsConfig::validate`] is the strict variant used by tooling.

use core::fmt;

use crate::error::ConfigError;
use crate::events::EventWeights;
use crate::personality::{MAX_COORDINATION, MIN_COORDINATION};

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TacticsConfig {
    /// Seed of the generator threaded through every random step.
    pub seed: u64,
    pub squad: SquadStrategyConfig,
    pub formation: FormationConfig,
    pub events: EventRegistryConfig,
    pub tasks: TaskConfig,
}

impl TacticsConfig {
    // ===== compile-time limits =====
    /// Hard upper bound on followers per leader.
    pub const MAX_FOLLOWERS: usize = 16;
    /// Hard upper bound on spiral fallback samples per follower.
    pub const MAX_FALLBACK_CANDIDATES: usize = 128;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SEED: u64 = 0x5eed_7ac7_1c50_0001;

    pub fn new() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            squad: SquadStrategyConfig::default(),
            formation: FormationConfig::default(),
            events: EventRegistryConfig::default(),
            tasks: TaskConfig::default(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::new()
        }
    }

    /// Returns a copy with every out-of-range value clamped, plus the list of
    /// changes that were made.
    pub fn sanitized(&self) -> (Self, Vec<ConfigAdjustment>) {
        let mut config = self.clone();
        let mut sink = Adjustments::default();

        let squad = &mut config.squad;
        for (field, value) in [
            ("squad.guard_distance", &mut squad.guard_distance),
            ("squad.flank_distance", &mut squad.flank_distance),
            ("squad.overwatch_distance", &mut squad.overwatch_distance),
            ("squad.escort_trail_distance", &mut squad.escort_trail_distance),
            ("squad.escort_lateral_spacing", &mut squad.escort_lateral_spacing),
            ("squad.arrival_radius", &mut squad.arrival_radius),
            ("squad.noise_base", &mut squad.noise_base),
            ("squad.comm_range_earpiece", &mut squad.comm_range_earpiece),
            ("squad.comm_range_no_earpiece", &mut squad.comm_range_no_earpiece),
            ("squad.fallback_search_radius", &mut squad.fallback_search_radius),
            ("squad.regroup_distance", &mut squad.regroup_distance),
        ] {
            sink.non_negative(field, value);
        }
        if !(squad.max_path_length_multiplier >= 1.0) {
            sink.push(
                "squad.max_path_length_multiplier",
                f64::from(squad.max_path_length_multiplier),
                1.0,
            );
            squad.max_path_length_multiplier = 1.0;
        }
        let factor = squad.duration_shorten_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            let adjusted = if factor > 1.0 {
                1.0
            } else {
                SquadStrategyConfig::DEFAULT_DURATION_SHORTEN_FACTOR
            };
            sink.push(
                "squad.duration_shorten_factor",
                f64::from(factor),
                f64::from(adjusted),
            );
            squad.duration_shorten_factor = adjusted;
        }
        let coordination = squad
            .default_coordination
            .clamp(MIN_COORDINATION, MAX_COORDINATION);
        if coordination != squad.default_coordination {
            sink.push(
                "squad.default_coordination",
                f64::from(squad.default_coordination),
                f64::from(coordination),
            );
            squad.default_coordination = coordination;
        }
        if squad.max_followers > Self::MAX_FOLLOWERS {
            sink.push(
                "squad.max_followers",
                squad.max_followers as f64,
                Self::MAX_FOLLOWERS as f64,
            );
            squad.max_followers = Self::MAX_FOLLOWERS;
        }
        if squad.trusted_follower_count > Self::MAX_FOLLOWERS {
            sink.push(
                "squad.trusted_follower_count",
                squad.trusted_follower_count as f64,
                Self::MAX_FOLLOWERS as f64,
            );
            squad.trusted_follower_count = Self::MAX_FOLLOWERS;
        }
        if squad.fallback_candidate_count > Self::MAX_FALLBACK_CANDIDATES {
            sink.push(
                "squad.fallback_candidate_count",
                squad.fallback_candidate_count as f64,
                Self::MAX_FALLBACK_CANDIDATES as f64,
            );
            squad.fallback_candidate_count = Self::MAX_FALLBACK_CANDIDATES;
        }

        let formation = &mut config.formation;
        for (field, value) in [
            ("formation.follow_distance", &mut formation.follow_distance),
            ("formation.column_spacing", &mut formation.column_spacing),
            ("formation.lateral_stagger", &mut formation.lateral_stagger),
            ("formation.walk_distance", &mut formation.walk_distance),
            ("formation.sprint_distance", &mut formation.sprint_distance),
        ] {
            sink.non_negative(field, value);
        }
        if formation.sprint_distance < formation.walk_distance {
            sink.push(
                "formation.sprint_distance",
                f64::from(formation.sprint_distance),
                f64::from(formation.walk_distance),
            );
            formation.sprint_distance = formation.walk_distance;
        }

        let events = &mut config.events;
        if events.capacity == 0 {
            sink.push(
                "events.capacity",
                0.0,
                EventRegistryConfig::DEFAULT_CAPACITY as f64,
            );
            events.capacity = EventRegistryConfig::DEFAULT_CAPACITY;
        } else if events.capacity > EventRegistryConfig::MAX_CAPACITY {
            sink.push(
                "events.capacity",
                events.capacity as f64,
                EventRegistryConfig::MAX_CAPACITY as f64,
            );
            events.capacity = EventRegistryConfig::MAX_CAPACITY;
        }
        for (field, value) in [
            ("events.nearest_radius", &mut events.nearest_radius),
            ("events.max_age", &mut events.max_age),
            ("events.intensity_radius", &mut events.intensity_radius),
            ("events.intensity_window", &mut events.intensity_window),
            ("events.boss_zone_radius", &mut events.boss_zone_radius),
            ("events.boss_zone_decay", &mut events.boss_zone_decay),
            ("events.expiry_interval", &mut events.expiry_interval),
            ("events.cluster_radius", &mut events.cluster_radius),
        ] {
            sink.non_negative(field, value);
        }

        let tasks = &mut config.tasks;
        for (field, value) in [
            ("tasks.threat_detection_radius", &mut tasks.threat_detection_radius),
            ("tasks.threat_turn_threshold_deg", &mut tasks.threat_turn_threshold_deg),
            ("tasks.threat_memory", &mut tasks.threat_memory),
        ] {
            sink.non_negative(field, value);
        }

        (config, sink.0)
    }

    /// Strict check: fails on the first value [`sanitized`](Self::sanitized)
    /// would have to change.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (_, adjustments) = self.sanitized();
        match adjustments.into_iter().next() {
            None => Ok(()),
            Some(adjustment)
                if adjustment.field == "formation.sprint_distance" && adjustment.original >= 0.0 =>
            {
                Err(ConfigError::Inconsistent {
                    reason: "formation.sprint_distance must not be below formation.walk_distance",
                })
            }
            Some(adjustment) => Err(ConfigError::OutOfRange {
                field: adjustment.field,
                value: adjustment.original,
            }),
        }
    }
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A single change made by [`TacticsConfig::sanitized`].
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigAdjustment {
    /// Dotted path of the adjusted field.
    pub field: &'static str,
    pub original: f64,
    pub adjusted: f64,
}

impl fmt::Display for ConfigAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} adjusted to {}",
            self.field, self.original, self.adjusted
        )
    }
}

#[derive(Default)]
struct Adjustments(Vec<ConfigAdjustment>);

impl Adjustments {
    fn push(&mut self, field: &'static str, original: f64, adjusted: f64) {
        self.0.push(ConfigAdjustment {
            field,
            original,
            adjusted,
        });
    }

    fn non_negative(&mut self, field: &'static str, value: &mut f32) {
        // NaN fails the comparison and is reset as well.
        if !(*value >= 0.0) {
            self.push(field, f64::from(*value), 0.0);
            *value = 0.0;
        }
    }
}

bitflags::bitflags! {
    /// Gates of the tactical-position pipeline that are switched on.
    ///
    /// A gate that is off always passes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PositionGates: u8 {
        /// Follower must be in communication range of the squad.
        const COMM_RANGE = 1 << 0;
        /// Follower must win the personality-based sharing roll.
        const PERSONALITY = 1 << 1;
        /// Precomputed cover points replace geometry when there are enough.
        const COVER = 1 << 2;
        /// Host validator may snap or reject candidates.
        const VALIDATION = 1 << 3;
        /// Candidate must be reachable from the follower.
        const REACHABILITY = 1 << 4;
        /// Overwatch candidates must see the objective.
        const LINE_OF_SIGHT = 1 << 5;
    }
}

/// Squad tactical strategy tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SquadStrategyConfig {
    pub guard_distance: f32,
    pub flank_distance: f32,
    pub overwatch_distance: f32,
    pub escort_trail_distance: f32,
    /// Side-by-side spacing between escorts.
    pub escort_lateral_spacing: f32,
    pub arrival_radius: f32,

    /// Pick roles from the objective action instead of the default pattern.
    pub use_action_roles: bool,
    /// Recompute with threat-biased geometry when the threat changes.
    pub combat_aware: bool,
    /// Tier followers and degrade relayed positions.
    pub objective_sharing: bool,

    pub comm_range_gate: bool,
    pub personality_gate: bool,
    pub cover_gate: bool,
    pub validation_gate: bool,
    pub reachability_gate: bool,
    pub line_of_sight_gate: bool,

    /// Followers nearest to the leader that receive exact data.
    pub trusted_follower_count: usize,
    /// Noise magnitude at coordination 1.
    pub noise_base: f32,
    pub comm_range_earpiece: f32,
    pub comm_range_no_earpiece: f32,

    pub fallback_search_radius: f32,
    pub fallback_candidate_count: usize,
    pub max_path_length_multiplier: f32,

    /// Applied once to the objective duration when every assigned follower arrived.
    pub duration_shorten_factor: f32,
    /// Coordination level given to newly formed squads.
    pub default_coordination: u8,
    pub max_followers: usize,
    /// Followers beyond this distance from the leader trigger a regroup.
    pub regroup_distance: f32,
}

impl SquadStrategyConfig {
    pub const DEFAULT_DURATION_SHORTEN_FACTOR: f32 = 0.5;

    /// Gates switched on by this configuration.
    pub fn gates(&self) -> PositionGates {
        let mut gates = PositionGates::empty();
        gates.set(PositionGates::COMM_RANGE, self.comm_range_gate);
        gates.set(PositionGates::PERSONALITY, self.personality_gate);
        gates.set(PositionGates::COVER, self.cover_gate);
        gates.set(PositionGates::VALIDATION, self.validation_gate);
        gates.set(PositionGates::REACHABILITY, self.reachability_gate);
        gates.set(PositionGates::LINE_OF_SIGHT, self.line_of_sight_gate);
        gates
    }
}

impl Default for SquadStrategyConfig {
    fn default() -> Self {
        Self {
            guard_distance: 8.0,
            flank_distance: 12.0,
            overwatch_distance: 25.0,
            escort_trail_distance: 4.0,
            escort_lateral_spacing: 2.5,
            arrival_radius: 2.0,
            use_action_roles: true,
            combat_aware: true,
            objective_sharing: true,
            comm_range_gate: true,
            personality_gate: true,
            cover_gate: true,
            validation_gate: true,
            reachability_gate: true,
            line_of_sight_gate: true,
            trusted_follower_count: 2,
            noise_base: 4.0,
            comm_range_earpiece: 120.0,
            comm_range_no_earpiece: 35.0,
            fallback_search_radius: 6.0,
            fallback_candidate_count: 12,
            max_path_length_multiplier: 2.5,
            duration_shorten_factor: Self::DEFAULT_DURATION_SHORTEN_FACTOR,
            default_coordination: 3,
            max_followers: 8,
            regroup_distance: 30.0,
        }
    }
}

/// Movement and follow-the-boss tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FormationConfig {
    /// Distance behind the boss of the first follow slot.
    pub follow_distance: f32,
    /// Extra distance per follower further down the column.
    pub column_spacing: f32,
    /// Sideways offset, alternating left and right.
    pub lateral_stagger: f32,
    /// At or below this distance to the target, walk.
    pub walk_distance: f32,
    /// At or beyond this distance to the target, sprint.
    pub sprint_distance: f32,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            follow_distance: 3.0,
            column_spacing: 1.5,
            lateral_stagger: 1.0,
            walk_distance: 4.0,
            sprint_distance: 25.0,
        }
    }
}

/// Combat event registry, scanner and clustering tuning.
///
/// Times are in seconds, distances in world units.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EventRegistryConfig {
    pub capacity: usize,
    pub weights: EventWeights,
    pub nearest_radius: f32,
    /// Oldest event age any query considers; also the expiry threshold.
    pub max_age: f32,
    pub intensity_radius: f32,
    pub intensity_window: f32,
    pub boss_zone_radius: f32,
    pub boss_zone_decay: f32,
    /// Seconds between expiry sweeps.
    pub expiry_interval: f32,
    pub cluster_radius: f32,
    pub max_clusters: usize,
}

impl EventRegistryConfig {
    pub const DEFAULT_CAPACITY: usize = crate::events::DEFAULT_CAPACITY;
    pub const MAX_CAPACITY: usize = crate::events::MAX_CAPACITY;
}

impl Default for EventRegistryConfig {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            weights: EventWeights::default(),
            nearest_radius: 80.0,
            max_age: 30.0,
            intensity_radius: 40.0,
            intensity_window: 10.0,
            boss_zone_radius: 25.0,
            boss_zone_decay: 60.0,
            expiry_interval: 1.0,
            cluster_radius: 15.0,
            max_clusters: 8,
        }
    }
}

/// Agent task and threat derivation tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TaskConfig {
    /// Derive squad threats from the leader's perception.
    pub auto_threat: bool,
    pub threat_detection_radius: f32,
    /// A known threat only moves when its heading turns by more than this.
    pub threat_turn_threshold_deg: f32,
    /// Seconds a threat survives without a supporting event.
    pub threat_memory: f32,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            auto_threat: true,
            threat_detection_radius: 60.0,
            threat_turn_threshold_deg: 45.0,
            threat_memory: 20.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_already_sane() {
        let config = TacticsConfig::default();
        let (sanitized, adjustments) = config.sanitized();
        assert!(adjustments.is_empty(), "{adjustments:?}");
        assert_eq!(sanitized, config);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_capacity_falls_back_to_default() {
        let mut config = TacticsConfig::default();
        config.events.capacity = 0;
        let (sanitized, adjustments) = config.sanitized();
        assert_eq!(sanitized.events.capacity, EventRegistryConfig::DEFAULT_CAPACITY);
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].field, "events.capacity");
    }

    #[test]
    fn oversized_capacity_is_capped() {
        let mut config = TacticsConfig::default();
        config.events.capacity = usize::MAX;
        let (sanitized, adjustments) = config.sanitized();
        assert_eq!(sanitized.events.capacity, EventRegistryConfig::MAX_CAPACITY);
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].field, "events.capacity");
        assert_eq!(adjustments[0].adjusted, EventRegistryConfig::MAX_CAPACITY as f64);
    }

    #[test]
    fn trusted_followers_are_capped_at_the_follower_limit() {
        let mut config = TacticsConfig::default();
        config.squad.trusted_follower_count = usize::MAX;
        let (sanitized, adjustments) = config.sanitized();
        assert_eq!(
            sanitized.squad.trusted_follower_count,
            TacticsConfig::MAX_FOLLOWERS
        );
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].field, "squad.trusted_follower_count");
        assert!(config.validate().is_err());
    }

    #[test]
    fn clamps_out_of_range_values() {
        let mut config = TacticsConfig::default();
        config.squad.flank_distance = -3.0;
        config.squad.noise_base = f32::NAN;
        config.squad.default_coordination = 9;
        config.squad.max_path_length_multiplier = 0.5;
        config.squad.duration_shorten_factor = 0.0;
        config.squad.max_followers = 99;

        let (sanitized, adjustments) = config.sanitized();
        assert_eq!(sanitized.squad.flank_distance, 0.0);
        assert_eq!(sanitized.squad.noise_base, 0.0);
        assert_eq!(sanitized.squad.default_coordination, 5);
        assert_eq!(sanitized.squad.max_path_length_multiplier, 1.0);
        assert_eq!(
            sanitized.squad.duration_shorten_factor,
            SquadStrategyConfig::DEFAULT_DURATION_SHORTEN_FACTOR
        );
        assert_eq!(sanitized.squad.max_followers, TacticsConfig::MAX_FOLLOWERS);
        assert_eq!(adjustments.len(), 6);
    }

    #[test]
    fn validate_reports_first_problem() {
        let mut config = TacticsConfig::default();
        config.squad.arrival_radius = -1.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "squad.arrival_radius",
                value: -1.0,
            })
        );

        let mut config = TacticsConfig::default();
        config.formation.walk_distance = 30.0;
        config.formation.sprint_distance = 10.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Inconsistent { .. })
        ));
    }

    #[test]
    fn gates_follow_toggles() {
        let mut squad = SquadStrategyConfig::default();
        assert_eq!(squad.gates(), PositionGates::all());
        squad.cover_gate = false;
        squad.line_of_sight_gate = false;
        let gates = squad.gates();
        assert!(!gates.contains(PositionGates::COVER));
        assert!(!gates.contains(PositionGates::LINE_OF_SIGHT));
        assert!(gates.contains(PositionGates::VALIDATION));
    }
}
