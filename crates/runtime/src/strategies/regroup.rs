//! Squad strategy that pulls stragglers back to the leader.

use utility_selector::UtilityOption;

use crate::context::TickContext;
use crate::world::SquadId;

const REGROUP_SCORE: f32 = 0.3;

/// Sets a rally point at the leader while no objective is running and some
/// follower has drifted beyond `regroup_distance`.
#[derive(Debug, Default)]
pub struct RegroupStrategy;

impl RegroupStrategy {
    pub const NAME: &'static str = "regroup";

    pub fn new() -> Self {
        Self
    }

    fn rally_at_leader(id: SquadId, ctx: &mut TickContext) {
        let leader_position = ctx
            .world
            .squad(id)
            .and_then(|squad| ctx.world.agent(squad.leader))
            .map(|leader| leader.position);
        if let Some(squad) = ctx.world.squad_mut(id) {
            squad.rally_point = leader_position;
        }
    }
}

impl UtilityOption<SquadId, TickContext> for RegroupStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn score(&self, _ordinal: usize, key: SquadId, ctx: &TickContext) -> f32 {
        let Some(squad) = ctx.world.squad(key) else {
            return 0.0;
        };
        if squad.objective.state.is_running() {
            return 0.0;
        }
        let Some(leader) = ctx.world.agent(squad.leader).filter(|leader| leader.alive) else {
            return 0.0;
        };

        let limit = ctx.config.squad.regroup_distance;
        let scattered = leader
            .followers()
            .iter()
            .filter_map(|&id| ctx.world.agent(id))
            .any(|follower| follower.alive && follower.position.distance(leader.position) > limit);
        if scattered { REGROUP_SCORE } else { 0.0 }
    }

    fn activate(&mut self, key: SquadId, ctx: &mut TickContext) {
        Self::rally_at_leader(key, ctx);
        tracing::debug!("squad {:?}: regrouping", key);
    }

    fn deactivate(&mut self, key: SquadId, ctx: &mut TickContext) {
        if let Some(squad) = ctx.world.squad_mut(key) {
            squad.rally_point = None;
        }
    }

    fn update(&mut self, active: &[SquadId], ctx: &mut TickContext) {
        for &id in active {
            Self::rally_at_leader(id, ctx);
        }
    }
}
