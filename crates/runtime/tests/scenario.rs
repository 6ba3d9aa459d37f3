//! Drives the bundled ambush scenario through a minimal host loop.

use std::collections::HashMap;
use std::path::Path;

use runtime::{AgentId, AgentSpawn, ObjectiveState, Runtime};
use tactics_content::{Scenario, ScenarioLoader};
use tactics_core::{Capabilities, Pace, SharingTier, TacticsConfig, Vec3};

fn bundled_scenario() -> Scenario {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../tactics/content/data/scenarios/ambush.ron");
    ScenarioLoader::load(&path).expect("bundled scenario loads")
}

fn speed(pace: Pace) -> f32 {
    match pace {
        Pace::Walk => 1.5,
        Pace::Run => 4.0,
        Pace::Sprint => 6.0,
    }
}

fn step_agents(runtime: &mut Runtime, dt: f32) {
    let moves: Vec<(AgentId, Vec3)> = runtime
        .world()
        .agents()
        .filter(|agent| agent.alive)
        .filter_map(|agent| {
            let target = agent.move_target?;
            let distance = agent.position.distance(target);
            let step = speed(agent.pace) * dt;
            let next = if distance <= step {
                target
            } else {
                agent.position + (target - agent.position) * (step / distance)
            };
            Some((agent.id, next))
        })
        .collect();
    for (id, position) in moves {
        runtime.set_agent_position(id, position).expect("live agent");
        let mut quest = runtime.agent(id).expect("agent").quest;
        if let Some(objective) = quest.objective {
            quest.close_to_objective = position.distance(objective) <= 2.0;
            runtime.set_quest_state(id, quest).expect("live agent");
        }
    }
}

#[test]
fn bundled_ambush_runs_to_completion() {
    let scenario = bundled_scenario();
    let obstacles = scenario.obstacles.clone();
    let blocked = obstacles.clone();
    let mut runtime = Runtime::builder()
        .config(TacticsConfig::with_seed(7))
        .validator(move |candidate: Vec3| {
            (!blocked.iter().any(|o| o.contains(candidate))).then_some(candidate)
        })
        .build();

    let mut ids = HashMap::new();
    for agent in &scenario.agents {
        let capabilities = if agent.earpiece {
            Capabilities::EARPIECE
        } else {
            Capabilities::empty()
        };
        let id =
            runtime.spawn_agent(AgentSpawn::at(agent.position).with_capabilities(capabilities));
        ids.insert(agent.name.as_str(), id);
    }
    let spec = &scenario.squads[0];
    let squad = runtime
        .form_squad(ids[spec.leader.as_str()], spec.coordination)
        .expect("form squad");
    for follower in &spec.followers {
        assert_eq!(runtime.join_squad(squad, ids[follower.as_str()]), Ok(true));
    }

    let mut next_objective = 0;
    let mut next_event = 0;
    let mut threat_changes = 0;
    let mut completed = false;
    for tick in 0..scenario.tick_count() {
        let now = runtime.now();
        while let Some(objective) = scenario.objectives.get(next_objective) {
            if objective.at > now {
                break;
            }
            next_objective += 1;
            runtime
                .set_leader_objective(
                    ids[objective.leader.as_str()],
                    objective.position,
                    objective.action,
                    objective.duration,
                )
                .expect("leader alive");
        }
        while let Some(event) = scenario.events.get(next_event) {
            if event.at > now {
                break;
            }
            next_event += 1;
            runtime.record_event(event.to_event());
        }

        let report = runtime.tick(scenario.tick);
        threat_changes += report.threat_changes.len();
        completed |= report.completed.contains(&squad);

        if tick == 0 {
            let straggler = runtime.agent(ids["straggler"]).expect("straggler");
            assert_eq!(straggler.sharing_tier, SharingTier::None);
            assert_eq!(straggler.tactical_position, None);
        }
        // Relay noise is applied after validation; only direct data is exact.
        for agent in runtime
            .world()
            .agents()
            .filter(|agent| agent.sharing_tier == SharingTier::Direct)
        {
            if let Some(position) = agent.tactical_position {
                assert!(obstacles.iter().all(|o| !o.contains(position)));
            }
        }

        step_agents(&mut runtime, scenario.tick);
    }

    assert!(completed);
    assert_eq!(
        runtime.squad(squad).map(|s| s.objective.state),
        Some(ObjectiveState::Complete)
    );
    assert!(threat_changes >= 1);
    assert_eq!(runtime.deaths().len(), 1);
}
