//! State shared by every selector option during a tick.

use tactics_core::{
    CombatEventRegistry, CoverSource, PositionValidator, ReachabilityOracle, SightlineOracle,
    TacticalEnv, TacticsConfig, TacticsRng,
};
use utility_selector::UtilityHost;

use crate::world::{AgentId, SquadId, World};

/// Host oracles owned by the runtime.
///
/// Any oracle left unset disables its pipeline gate.
#[derive(Default)]
pub struct Oracles {
    pub validator: Option<Box<dyn PositionValidator>>,
    pub reachability: Option<Box<dyn ReachabilityOracle>>,
    pub sightline: Option<Box<dyn SightlineOracle>>,
    pub cover: Option<Box<dyn CoverSource>>,
}

impl Oracles {
    /// Borrowed view handed to the tactical pipeline.
    pub fn env(&self) -> TacticalEnv<'_> {
        TacticalEnv::new(
            self.validator.as_deref(),
            self.reachability.as_deref(),
            self.sightline.as_deref(),
            self.cover.as_deref(),
        )
    }
}

impl core::fmt::Debug for Oracles {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.env(), f)
    }
}

/// Everything a task or strategy may read or write.
///
/// Implements [`UtilityHost`] for both agent and squad keys, so the same
/// context drives the task selector and the strategy selector.
pub struct TickContext {
    pub world: World,
    pub events: CombatEventRegistry,
    pub config: TacticsConfig,
    pub oracles: Oracles,
    pub rng: TacticsRng,
    /// Simulation time in seconds.
    pub now: f32,
}

impl UtilityHost<AgentId> for TickContext {
    fn is_selectable(&self, key: AgentId) -> bool {
        self.world.agent(key).is_some_and(|agent| agent.alive)
    }

    fn write_score(&mut self, key: AgentId, ordinal: usize, score: f32) {
        if let Some(agent) = self.world.agent_mut(key) {
            if agent.scores.len() <= ordinal {
                agent.scores.resize(ordinal + 1, 0.0);
            }
            agent.scores[ordinal] = score;
        }
    }

    fn assignment(&self, key: AgentId) -> Option<usize> {
        self.world.agent(key).and_then(|agent| agent.task)
    }

    fn set_assignment(&mut self, key: AgentId, assignment: Option<usize>) {
        if let Some(agent) = self.world.agent_mut(key) {
            agent.task = assignment;
        }
    }
}

impl UtilityHost<SquadId> for TickContext {
    /// A squad is selectable while its leader is alive.
    fn is_selectable(&self, key: SquadId) -> bool {
        self.world
            .squad(key)
            .and_then(|squad| self.world.agent(squad.leader))
            .is_some_and(|leader| leader.alive)
    }

    fn write_score(&mut self, key: SquadId, ordinal: usize, score: f32) {
        if let Some(squad) = self.world.squad_mut(key) {
            if squad.scores.len() <= ordinal {
                squad.scores.resize(ordinal + 1, 0.0);
            }
            squad.scores[ordinal] = score;
        }
    }

    fn assignment(&self, key: SquadId) -> Option<usize> {
        self.world.squad(key).and_then(|squad| squad.strategy)
    }

    fn set_assignment(&mut self, key: SquadId, assignment: Option<usize>) {
        if let Some(squad) = self.world.squad_mut(key) {
            squad.strategy = assignment;
        }
    }
}
