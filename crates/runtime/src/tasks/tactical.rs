use utility_selector::UtilityOption;

use super::{steer, stop};
use crate::context::TickContext;
use crate::world::AgentId;

const MOVING_SCORE: f32 = 0.6;
const HOLDING_SCORE: f32 = 0.55;

/// Moves a follower to its tactical position and holds it there.
#[derive(Debug, Default)]
pub struct TacticalPositionTask;

impl TacticalPositionTask {
    pub const NAME: &'static str = "tactical_position";

    pub fn new() -> Self {
        Self
    }
}

impl UtilityOption<AgentId, TickContext> for TacticalPositionTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn hysteresis(&self) -> f32 {
        0.1
    }

    fn score(&self, _ordinal: usize, key: AgentId, ctx: &TickContext) -> f32 {
        match ctx.world.agent(key) {
            Some(agent) if agent.has_tactical_position() => {
                if agent.arrived {
                    HOLDING_SCORE
                } else {
                    MOVING_SCORE
                }
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
                && let Some(target) = agent.tactical_position
            {
                steer(agent, target, &config.formation);
            }
        }
    }
}
