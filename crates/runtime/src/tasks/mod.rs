//! Agent-level tasks driven by the task selector.
//!
//! Each task scores one agent at a time and, while active, writes the
//! agent's `move_target` and `pace`. The host moves agents; tasks never
//! touch positions.
//!
//! Declaration order (and therefore tie-break order):
//! [`TacticalPositionTask`], [`InvestigateTask`], [`ObjectiveTask`],
//! [`FollowBossTask`].

mod follow;
mod investigate;
mod objective;
mod tactical;

use tactics_core::{FormationConfig, Vec3, pace_for};
use utility_selector::UtilityOption;

use crate::agent::Agent;
use crate::context::TickContext;
use crate::world::AgentId;

pub use follow::FollowBossTask;
pub use investigate::InvestigateTask;
pub use objective::ObjectiveTask;
pub use tactical::TacticalPositionTask;

/// Boxed task as stored by the selector.
pub type BoxedTask = Box<dyn UtilityOption<AgentId, TickContext>>;

/// Built-in tasks in declaration order.
pub fn default_tasks() -> Vec<BoxedTask> {
    vec![
        Box::new(TacticalPositionTask::new()),
        Box::new(InvestigateTask::new()),
        Box::new(ObjectiveTask::new()),
        Box::new(FollowBossTask::new()),
    ]
}

/// Points an agent at `target` with a pace matching the remaining distance.
fn steer(agent: &mut Agent, target: Vec3, formation: &FormationConfig) {
    agent.pace = pace_for(agent.position.distance(target), formation);
    agent.move_target = Some(target);
}

fn stop(ctx: &mut TickContext, key: AgentId) {
    if let Some(agent) = ctx.world.agent_mut(key) {
        agent.move_target = None;
    }
}
