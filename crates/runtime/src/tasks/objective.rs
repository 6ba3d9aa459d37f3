use utility_selector::UtilityOption;

use super::{steer, stop};
use crate::context::TickContext;
use crate::world::AgentId;

const ACTIVE_SCORE: f32 = 0.4;

/// Heads for the agent's own quest objective until the host reports it close.
#[derive(Debug, Default)]
pub struct ObjectiveTask;

impl ObjectiveTask {
    pub const NAME: &'static str = "objective";

    pub fn new() -> Self {
        Self
    }
}

impl UtilityOption<AgentId, TickContext> for ObjectiveTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn score(&self, _ordinal: usize, key: AgentId, ctx: &TickContext) -> f32 {
        match ctx.world.agent(key) {
            Some(agent)
                if agent.quest.objective_active
                    && !agent.quest.close_to_objective
                    && agent.quest.objective.is_some() =>
            {
                ACTIVE_SCORE
            }
            _ => 0.0,
        }
    }

    fn deactivate(&mut self, key: AgentId, ctx: &mut TickContext) {
        stop(ctx, key);
    }

    fn update(&mut self, active: &[AgentId], ctx: &mut TickContext) {
        let TickContext { world, config, .. } = ctx;
        for &key in active {
            if let Some(agent) = world.agent_mut(key)
                && let Some(objective) = agent.quest.objective
            {
                steer(agent, objective, &config.formation);
            }
        }
    }
}
