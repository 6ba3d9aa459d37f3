//! Squad strategy that deploys followers around the leader's objective.

use tactics_core::Variant;
use utility_selector::UtilityOption;

use super::pipeline::{self, PipelineOutcome};
use crate::context::TickContext;
use crate::squad::ObjectiveState;
use crate::world::SquadId;

const ACTIVE_SCORE: f32 = 0.5;

/// Places followers at role-based positions around the squad objective.
///
/// Positions are recomputed when the objective version changes and, when
/// combat awareness is on, whenever the squad threat changes. Between
/// recomputes the strategy only tracks arrivals.
#[derive(Debug, Default)]
pub struct TacticalPositioningStrategy;

impl TacticalPositioningStrategy {
    pub const NAME: &'static str = "tactical_positioning";

    pub fn new() -> Self {
        Self
    }

    fn update_squad(&self, id: SquadId, ctx: &mut TickContext) {
        let combat_aware = ctx.config.squad.combat_aware;
        let Some(squad) = ctx.world.squad(id) else {
            return;
        };
        let version = squad.objective.version;
        let objective_changed = squad.seen_objective_version != Some(version);
        let threat_changed = combat_aware && squad.threat.has_unprocessed_change();

        if objective_changed || threat_changed {
            let variant = if combat_aware && squad.threat.known {
                Variant::Combat
            } else {
                Variant::Standard
            };
            let Some(outcome) = pipeline::recompute(ctx, id, variant) else {
                return;
            };
            let Some(squad) = ctx.world.squad_mut(id) else {
                return;
            };
            squad.seen_objective_version = Some(version);
            if combat_aware {
                squad.threat.last_processed_combat_version = squad.threat.combat_version;
            }
            squad.objective.reset_arrivals(outcome.assigned);
            log_recompute(id, variant, objective_changed, &outcome);
        }

        self.track_arrivals(id, ctx);
    }

    fn track_arrivals(&self, id: SquadId, ctx: &mut TickContext) {
        let radius = ctx.config.squad.arrival_radius;
        let shorten = ctx.config.squad.duration_shorten_factor;

        let mut newly_arrived = 0;
        for follower in ctx.world.followers(id) {
            let Some(agent) = ctx.world.agent_mut(follower) else {
                continue;
            };
            if !agent.alive || agent.arrived {
                continue;
            }
            if let Some(target) = agent.tactical_position
                && agent.position.distance(target) <= radius
            {
                agent.arrived = true;
                newly_arrived += 1;
            }
        }

        let now = ctx.now;
        let Some(squad) = ctx.world.squad_mut(id) else {
            return;
        };
        let objective = &mut squad.objective;
        objective.arrived_count += newly_arrived;
        if newly_arrived > 0 && objective.state == ObjectiveState::Active {
            objective.state = ObjectiveState::Wait;
            tracing::info!("squad {:?}: first follower in position, holding", id);
        }
        if !objective.duration_shortened
            && objective.assigned_count > 0
            && objective.arrived_count >= objective.assigned_count
        {
            objective.duration *= shorten;
            objective.duration_shortened = true;
            tracing::info!(
                "squad {:?}: all {} followers in position at {:.1}s, duration now {:.1}s",
                id,
                objective.assigned_count,
                now,
                objective.duration
            );
        }
    }
}

fn log_recompute(
    id: SquadId,
    variant: Variant,
    objective_changed: bool,
    outcome: &PipelineOutcome,
) {
    tracing::debug!(
        "squad {:?}: {} recompute ({}) assigned={} out_of_range={} not_shared={} cover={} fallback={} failed={}",
        id,
        variant,
        if objective_changed { "objective" } else { "threat" },
        outcome.assigned,
        outcome.out_of_range,
        outcome.not_shared,
        outcome.from_cover,
        outcome.fallbacks,
        outcome.failed,
    );
}

impl UtilityOption<SquadId, TickContext> for TacticalPositioningStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn score(&self, _ordinal: usize, key: SquadId, ctx: &TickContext) -> f32 {
        let Some(squad) = ctx.world.squad(key) else {
            return 0.0;
        };
        let leader_alive = ctx
            .world
            .agent(squad.leader)
            .is_some_and(|leader| leader.alive);
        if leader_alive && squad.objective.state.is_running() {
            ACTIVE_SCORE
        } else {
            0.0
        }
    }

    fn activate(&mut self, key: SquadId, ctx: &mut TickContext) {
        if let Some(squad) = ctx.world.squad_mut(key) {
            squad.seen_objective_version = None;
        }
    }

    fn deactivate(&mut self, key: SquadId, ctx: &mut TickContext) {
        for member in ctx.world.members(key) {
            if let Some(agent) = ctx.world.agent_mut(member) {
                agent.clear_tactics();
            }
        }
    }

    fn update(&mut self, active: &[SquadId], ctx: &mut TickContext) {
        for &id in active {
            self.update_squad(id, ctx);
        }
    }
}
