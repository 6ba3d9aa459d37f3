//! Derives squad threats from what the leader perceives.

use tactics_core::{CombatEventKind, Vec3};

use crate::context::TickContext;
use crate::world::SquadId;

/// How a squad threat changed during one derivation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ThreatChange {
    Detected,
    Turned,
    Forgotten,
}

/// Updates every squad's threat from its leader's nearest combat event.
///
/// Does nothing unless `tasks.auto_threat` is set. Airdrops never count as a
/// threat. Every reported change bumps the squad's combat version.
pub fn derive_threats(ctx: &mut TickContext) -> Vec<(SquadId, ThreatChange)> {
    let config = ctx.config.tasks.clone();
    if !config.auto_threat {
        return Vec::new();
    }
    let turn_threshold = config.threat_turn_threshold_deg.to_radians().cos();

    let mut changes = Vec::new();
    for id in ctx.world.squad_ids() {
        let Some(leader) = ctx
            .world
            .squad(id)
            .and_then(|squad| ctx.world.agent(squad.leader))
            .filter(|leader| leader.alive)
        else {
            continue;
        };
        let leader_position = leader.position;
        let supporting = leader.perception.nearest_event.filter(|event| {
            !matches!(event.kind, CombatEventKind::Airdrop | CombatEventKind::None)
                && event.position.distance(leader_position) <= config.threat_detection_radius
        });

        let now = ctx.now;
        let Some(squad) = ctx.world.squad_mut(id) else {
            continue;
        };
        let threat = squad.threat;

        let Some(event) = supporting else {
            if threat.known && now - threat.last_seen >= config.threat_memory {
                squad.clear_threat();
                tracing::info!("squad {:?}: threat forgotten", id);
                changes.push((id, ThreatChange::Forgotten));
            }
            continue;
        };

        let direction = threat_direction(leader_position, event.position);
        let change = match direction {
            Some(_) if !threat.known => Some(ThreatChange::Detected),
            Some(direction) if direction.dot(threat.direction) < turn_threshold => {
                Some(ThreatChange::Turned)
            }
            _ => None,
        };

        match (change, direction) {
            (Some(change), Some(direction)) => {
                squad.report_threat(direction, now);
                tracing::info!(
                    "squad {:?}: threat {} towards {} ({})",
                    id,
                    change,
                    event.position,
                    event.kind
                );
                changes.push((id, change));
            }
            _ => squad.threat.last_seen = now,
        }
    }
    changes
}

/// Unit direction from `from` towards `to`, or `None` when they coincide.
fn threat_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    (to - from).normalized_horizontal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentSpawn, NearestEvent};
    use crate::context::Oracles;
    use crate::world::{AgentId, World};
    use tactics_core::{CombatEventRegistry, TacticsConfig, seeded};

    fn context() -> (TickContext, SquadId, AgentId) {
        let mut world = World::new();
        let leader = world.spawn(AgentSpawn::at(Vec3::ZERO), 4);
        let squad = world.form_squad(leader, 3, 2).expect("form squad");
        let ctx = TickContext {
            world,
            events: CombatEventRegistry::new(16),
            config: TacticsConfig::default(),
            oracles: Oracles::default(),
            rng: seeded(1),
            now: 0.0,
        };
        (ctx, squad, leader)
    }

    fn perceive(ctx: &mut TickContext, leader: AgentId, at: Option<Vec3>) {
        let agent = ctx.world.agent_mut(leader).expect("leader");
        agent.perception.nearest_event = at.map(|position| NearestEvent {
            position,
            time: 0.0,
            kind: CombatEventKind::Gunshot,
        });
    }

    #[test]
    fn detects_turns_and_forgets() {
        let (mut ctx, squad, leader) = context();

        perceive(&mut ctx, leader, Some(Vec3::flat(10.0, 0.0)));
        assert_eq!(derive_threats(&mut ctx), vec![(squad, ThreatChange::Detected)]);
        let threat = ctx.world.squad(squad).expect("squad").threat;
        assert_eq!(threat.direction, Vec3::X);

        // 30 degrees off: below the turn threshold.
        perceive(&mut ctx, leader, Some(Vec3::flat(10.0, 5.77)));
        assert!(derive_threats(&mut ctx).is_empty());

        perceive(&mut ctx, leader, Some(Vec3::flat(0.0, 10.0)));
        assert_eq!(derive_threats(&mut ctx), vec![(squad, ThreatChange::Turned)]);

        perceive(&mut ctx, leader, None);
        ctx.now = 19.0;
        assert!(derive_threats(&mut ctx).is_empty());
        ctx.now = 20.0;
        assert_eq!(derive_threats(&mut ctx), vec![(squad, ThreatChange::Forgotten)]);

        let threat = ctx.world.squad(squad).expect("squad").threat;
        assert!(!threat.known);
        assert_eq!(threat.combat_version, 3);
    }

    #[test]
    fn distant_events_and_disabled_derivation_are_ignored() {
        let (mut ctx, _, leader) = context();
        perceive(&mut ctx, leader, Some(Vec3::flat(70.0, 0.0)));
        assert!(derive_threats(&mut ctx).is_empty());

        perceive(&mut ctx, leader, Some(Vec3::flat(10.0, 0.0)));
        ctx.config.tasks.auto_threat = false;
        assert!(derive_threats(&mut ctx).is_empty());
    }
}
