use utility_selector::UtilityOption;

use super::{steer, stop};
use crate::context::TickContext;
use crate::world::AgentId;

const BASE_SCORE: f32 = 0.2;
const INTENSITY_SCORE: f32 = 0.1;
const MAX_SCORE: f32 = 0.8;

/// Walks towards the nearest recent combat event.
///
/// Scores higher the busier the area is, and never while the agent is
/// inside a boss zone.
#[derive(Debug, Default)]
pub struct InvestigateTask;

impl InvestigateTask {
    pub const NAME: &'static str = "investigate";

    pub fn new() -> Self {
        Self
    }
}

impl UtilityOption<AgentId, TickContext> for InvestigateTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn hysteresis(&self) -> f32 {
        0.15
    }

    fn score(&self, _ordinal: usize, key: AgentId, ctx: &TickContext) -> f32 {
        let Some(agent) = ctx.world.agent(key) else {
            return 0.0;
        };
        let perception = &agent.perception;
        if perception.nearest_event.is_none() || perception.in_boss_zone {
            return 0.0;
        }
        (BASE_SCORE + INTENSITY_SCORE * perception.intensity).min(MAX_SCORE)
    }

    fn deactivate(&mut self, key: AgentId, ctx: &mut TickContext) {
        stop(ctx, key);
    }

    fn update(&mut self, active: &[AgentId], ctx: &mut TickContext) {
        let TickContext { world, config, .. } = ctx;
        for &key in active {
            if let Some(agent) = world.agent_mut(key)
                && let Some(event) = agent.perception.nearest_event
            {
                steer(agent, event.position, &config.formation);
            }
        }
    }
}
