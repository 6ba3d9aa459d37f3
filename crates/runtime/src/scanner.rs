//! Writes combat-event perception into agents.

use tactics_core::{CombatEventRegistry, EventRegistryConfig};

use crate::agent::{Agent, NearestEvent, Perception};
use crate::world::World;

/// Scans the registry around one agent and stores the result.
pub fn scan_agent(
    agent: &mut Agent,
    registry: &CombatEventRegistry,
    config: &EventRegistryConfig,
    now: f32,
) {
    let position = agent.position;
    let nearest = registry
        .nearest(position, config.nearest_radius, now, config.max_age)
        .map(|event| NearestEvent {
            position: event.position,
            time: event.time,
            kind: event.kind,
        });

    agent.perception = Perception {
        nearest_event: nearest,
        intensity: registry.intensity(
            position,
            config.intensity_radius,
            now,
            config.intensity_window.min(config.max_age),
        ),
        in_boss_zone: registry.in_boss_zone(
            position,
            config.boss_zone_radius,
            now,
            config.boss_zone_decay,
        ),
    };
}

/// Scans every live agent; dead agents keep their last perception.
pub fn scan_agents(
    world: &mut World,
    registry: &CombatEventRegistry,
    config: &EventRegistryConfig,
    now: f32,
) {
    for agent in world.agents_mut().filter(|agent| agent.alive) {
        scan_agent(agent, registry, config, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentSpawn;
    use tactics_core::{CombatEvent, CombatEventKind, Vec3};

    #[test]
    fn scan_fills_perception_and_skips_dead_agents() {
        let mut world = World::new();
        let near = world.spawn(AgentSpawn::at(Vec3::ZERO), 1);
        let dead = world.spawn(AgentSpawn::at(Vec3::flat(1.0, 0.0)), 1);
        world.agent_mut(dead).expect("agent").alive = false;

        let mut registry = CombatEventRegistry::new(16);
        registry.record(CombatEvent::new(
            CombatEventKind::Gunshot,
            Vec3::flat(5.0, 0.0),
            0.0,
        ));
        registry.record(
            CombatEvent::new(CombatEventKind::Explosion, Vec3::flat(8.0, 0.0), 0.5)
                .with_boss(true),
        );

        scan_agents(&mut world, &registry, &EventRegistryConfig::default(), 1.0);

        let perception = world.agent(near).expect("agent").perception;
        let nearest = perception.nearest_event.expect("event in range");
        assert_eq!(nearest.position, Vec3::flat(5.0, 0.0));
        assert_eq!(perception.intensity, 4.0);
        assert!(perception.in_boss_zone);

        let untouched = world.agent(dead).expect("agent").perception;
        assert_eq!(untouched, Perception::default());
    }
}
