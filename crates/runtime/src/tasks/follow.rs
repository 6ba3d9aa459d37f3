use tactics_core::follow_slot;
use utility_selector::UtilityOption;

use super::{steer, stop};
use crate::context::TickContext;
use crate::world::AgentId;

const FOLLOW_SCORE: f32 = 0.3;
const REGROUP_SCORE: f32 = 0.45;

/// Keeps a follower in its column slot behind the boss.
///
/// Scores higher while the squad is regrouping and the follower is still
/// out of formation.
#[derive(Debug, Default)]
pub struct FollowBossTask;

impl FollowBossTask {
    pub const NAME: &'static str = "follow_boss";

    pub fn new() -> Self {
        Self
    }
}

impl UtilityOption<AgentId, TickContext> for FollowBossTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn score(&self, _ordinal: usize, key: AgentId, ctx: &TickContext) -> f32 {
        let Some(agent) = ctx.world.agent(key) else {
            return 0.0;
        };
        let Some(boss) = agent
            .boss()
            .and_then(|boss| ctx.world.agent(boss))
            .filter(|boss| boss.alive)
        else {
            return 0.0;
        };

        let regrouping = agent
            .squad()
            .and_then(|squad| ctx.world.squad(squad))
            .is_some_and(|squad| squad.rally_point.is_some());
        let follow_distance = ctx.config.formation.follow_distance;
        if regrouping && agent.position.distance(boss.position) > follow_distance {
            REGROUP_SCORE
        } else {
            FOLLOW_SCORE
        }
    }

    fn deactivate(&mut self, key: AgentId, ctx: &mut TickContext) {
        stop(ctx, key);
    }

    fn update(&mut self, active: &[AgentId], ctx: &mut TickContext) {
        let TickContext { world, config, .. } = ctx;
        for &key in active {
            let Some(slot) = world.agent(key).and_then(|agent| {
                let boss = world.agent(agent.boss()?)?;
                let index = boss.followers().iter().position(|&id| id == key)?;
                Some(follow_slot(
                    boss.position,
                    boss.facing.yaw,
                    index,
                    &config.formation,
                ))
            }) else {
                continue;
            };
            if let Some(agent) = world.agent_mut(key) {
                steer(agent, slot, &config.formation);
            }
        }
    }
}
