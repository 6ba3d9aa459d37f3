//! Per-agent state.

use arrayvec::ArrayVec;
use tactics_core::{
    Capabilities, CombatEventKind, Facing, ObjectiveAction, Pace, SharingTier, SquadRole,
    TacticsConfig, Vec3,
};

use crate::world::{AgentId, SquadId};

/// Upper bound of the follower list carried by every agent.
pub const MAX_FOLLOWERS: usize = TacticsConfig::MAX_FOLLOWERS;

/// Nearest qualifying combat event seen by the scanner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearestEvent {
    pub position: Vec3,
    pub time: f32,
    pub kind: CombatEventKind,
}

/// Fields written by the event scanner every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Perception {
    pub nearest_event: Option<NearestEvent>,
    /// Weighted count of recent events nearby.
    pub intensity: f32,
    /// A boss event happened close by recently.
    pub in_boss_zone: bool,
}

/// Quest data owned by the host and read by scoring.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QuestState {
    pub action: ObjectiveAction,
    pub objective: Option<Vec3>,
    pub objective_active: bool,
    pub close_to_objective: bool,
    pub door_unlocked: bool,
}

/// Initial data for a new agent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AgentSpawn {
    pub position: Vec3,
    pub facing: Facing,
    pub capabilities: Capabilities,
}

impl AgentSpawn {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

/// One controllable unit.
///
/// Squad links (`boss`, `followers`, `squad`) are only changed through
/// [`crate::World`] so both directions stay in sync.
#[derive(Clone, Debug)]
pub struct Agent {
    pub id: AgentId,
    pub alive: bool,
    pub position: Vec3,
    pub facing: Facing,
    pub capabilities: Capabilities,

    pub(crate) boss: Option<AgentId>,
    pub(crate) followers: ArrayVec<AgentId, MAX_FOLLOWERS>,
    pub(crate) squad: Option<SquadId>,

    pub role: SquadRole,
    pub tactical_position: Option<Vec3>,
    pub arrived: bool,
    pub sharing_tier: SharingTier,

    pub perception: Perception,
    pub quest: QuestState,

    /// Latest score of every registered task, by ordinal.
    pub scores: Vec<f32>,
    pub(crate) task: Option<usize>,

    /// Where the host should move this agent.
    pub move_target: Option<Vec3>,
    pub pace: Pace,
}

impl Agent {
    pub(crate) fn new(id: AgentId, spawn: AgentSpawn, task_count: usize) -> Self {
        Self {
            id,
            alive: true,
            position: spawn.position,
            facing: spawn.facing,
            capabilities: spawn.capabilities,
            boss: None,
            followers: ArrayVec::new(),
            squad: None,
            role: SquadRole::None,
            tactical_position: None,
            arrived: false,
            sharing_tier: SharingTier::None,
            perception: Perception::default(),
            quest: QuestState::default(),
            scores: vec![0.0; task_count],
            task: None,
            move_target: None,
            pace: Pace::Walk,
        }
    }

    pub fn boss(&self) -> Option<AgentId> {
        self.boss
    }

    pub fn followers(&self) -> &[AgentId] {
        &self.followers
    }

    pub fn squad(&self) -> Option<SquadId> {
        self.squad
    }

    /// Ordinal of the active task.
    pub fn task(&self) -> Option<usize> {
        self.task
    }

    pub fn is_leader(&self) -> bool {
        self.squad.is_some() && self.boss.is_none()
    }

    pub fn has_tactical_position(&self) -> bool {
        self.tactical_position.is_some()
    }

    /// Drops everything the tactical pipeline assigned.
    pub(crate) fn clear_tactics(&mut self) {
        self.role = SquadRole::None;
        self.tactical_position = None;
        self.arrived = false;
        self.sharing_tier = SharingTier::None;
    }
}
