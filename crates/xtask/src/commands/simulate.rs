//! Run scenarios headlessly
//!
//! Plays the host's part for a RON scenario: schedules objectives and combat
//! events, moves agents towards their move targets, and reports what the
//! squads did.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::collections::HashMap;
use std::path::PathBuf;

use runtime::{AgentId, AgentSpawn, Runtime, SquadId, TickReport};
use tactics_content::{ConfigLoader, ObstacleSpec, Scenario, ScenarioLoader};
use tactics_core::{Capabilities, Facing, Pace, TacticsConfig, Vec3};

use crate::utils;

/// Run a scenario headlessly and print a summary
#[derive(Parser)]
pub struct Simulate {
    /// Scenario file (RON). Relative names are looked up in the data directory
    #[arg(value_name = "SCENARIO", default_value = "scenarios/ambush.ron")]
    scenario: PathBuf,

    /// Configuration file (TOML); built-in defaults when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the configured seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print a status line every N ticks (0 prints only the summary)
    #[arg(long, value_name = "N", default_value_t = 0)]
    every: usize,
}

/// Host movement speeds, in units per second.
fn speed(pace: Pace) -> f32 {
    match pace {
        Pace::Walk => 1.5,
        Pace::Run => 4.0,
        Pace::Sprint => 6.0,
    }
}

#[derive(Default)]
struct Totals {
    task_switches: usize,
    strategy_switches: usize,
    threat_changes: usize,
    completed: usize,
    expired_events: usize,
    reaped: usize,
}

impl Totals {
    fn add(&mut self, report: &TickReport) {
        self.task_switches += report.task_switches.len();
        self.strategy_switches += report.strategy_switches.len();
        self.threat_changes += report.threat_changes.len();
        self.completed += report.completed.len();
        self.expired_events += report.expired_events;
        self.reaped += report.reaped.len();
    }
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let scenario_path = utils::resolve(&self.scenario);
        let scenario = ScenarioLoader::load(&scenario_path)?;

        let mut config = match &self.config {
            Some(path) => ConfigLoader::load(&utils::resolve(path))?,
            None => TacticsConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        println!(
            "{} {}",
            style("Scenario:").bold().cyan(),
            scenario_path.display()
        );
        println!(
            "{} {} agents, {} squads, {:.1}s at {:.2}s/tick, seed {}",
            style("Setup:").bold().cyan(),
            scenario.agents.len(),
            scenario.squads.len(),
            scenario.duration,
            scenario.tick,
            config.seed
        );
        println!();

        let mut host = Host::new(&scenario, config)?;
        let mut totals = Totals::default();
        for tick in 0..scenario.tick_count() {
            host.schedule(&scenario)?;
            let report = host.runtime.tick(scenario.tick);
            totals.add(&report);
            host.move_agents(scenario.tick)?;

            if self.every > 0 && (tick + 1) % self.every == 0 {
                host.print_status();
            }
        }

        host.print_summary(&totals);
        Ok(())
    }
}

fn lookup(ids: &HashMap<String, AgentId>, name: &str) -> Result<AgentId> {
    ids.get(name)
        .copied()
        .with_context(|| format!("Unknown agent '{}'", name))
}

/// Scenario state on the host side.
struct Host {
    runtime: Runtime,
    names: Vec<(String, AgentId)>,
    squads: Vec<(String, SquadId)>,
    next_objective: usize,
    next_event: usize,
}

impl Host {
    fn new(scenario: &Scenario, config: TacticsConfig) -> Result<Self> {
        let obstacles: Vec<ObstacleSpec> = scenario.obstacles.clone();
        let mut runtime = Runtime::builder()
            .config(config)
            .validator(move |candidate: Vec3| {
                (!obstacles.iter().any(|obstacle| obstacle.contains(candidate)))
                    .then_some(candidate)
            })
            .build();

        let mut ids = HashMap::new();
        let mut names = Vec::with_capacity(scenario.agents.len());
        for agent in &scenario.agents {
            let capabilities = if agent.earpiece {
                Capabilities::EARPIECE
            } else {
                Capabilities::empty()
            };
            let id = runtime.spawn_agent(
                AgentSpawn::at(agent.position)
                    .with_facing(Facing::new(agent.yaw, 0.0))
                    .with_capabilities(capabilities),
            );
            ids.insert(agent.name.clone(), id);
            names.push((agent.name.clone(), id));
        }

        let mut squads = Vec::with_capacity(scenario.squads.len());
        for spec in &scenario.squads {
            let leader = lookup(&ids, &spec.leader)?;
            let squad = runtime
                .form_squad(leader, spec.coordination)
                .with_context(|| format!("Failed to form squad of '{}'", spec.leader))?;
            for follower in &spec.followers {
                let joined = runtime
                    .join_squad(squad, lookup(&ids, follower)?)
                    .with_context(|| format!("Failed to add '{}' to a squad", follower))?;
                if !joined {
                    println!(
                        "{} '{}' ignored, squad of '{}' is full",
                        style("warning:").yellow(),
                        follower,
                        spec.leader
                    );
                }
            }
            squads.push((spec.leader.clone(), squad));
        }

        Ok(Self {
            runtime,
            names,
            squads,
            next_objective: 0,
            next_event: 0,
        })
    }

    fn id(&self, name: &str) -> Option<AgentId> {
        self.names
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, id)| *id)
    }

    /// Applies every objective and event due by the current time.
    fn schedule(&mut self, scenario: &Scenario) -> Result<()> {
        let now = self.runtime.now();
        while let Some(objective) = scenario.objectives.get(self.next_objective) {
            if objective.at > now {
                break;
            }
            self.next_objective += 1;
            let Some(leader) = self.id(&objective.leader) else {
                continue;
            };
            if self.runtime.agent(leader).is_none_or(|agent| !agent.alive) {
                continue;
            }
            self.runtime
                .set_leader_objective(
                    leader,
                    objective.position,
                    objective.action,
                    objective.duration,
                )
                .with_context(|| format!("Failed to set objective for '{}'", objective.leader))?;
        }

        while let Some(event) = scenario.events.get(self.next_event) {
            if event.at > now {
                break;
            }
            self.next_event += 1;
            self.runtime.record_event(event.to_event());
        }
        Ok(())
    }

    /// Moves every live agent towards its move target at its pace.
    fn move_agents(&mut self, dt: f32) -> Result<()> {
        let arrival_radius = self.runtime.config().squad.arrival_radius;
        let moves: Vec<(AgentId, Vec3, Option<f32>)> = self
            .runtime
            .world()
            .agents()
            .filter(|agent| agent.alive)
            .filter_map(|agent| {
                let target = agent.move_target?;
                let offset = (target - agent.position).horizontal();
                let distance = offset.horizontal_length();
                let step = speed(agent.pace) * dt;
                let heading = offset.normalized_horizontal().map(Vec3::heading);
                let next = if distance <= step {
                    target
                } else {
                    agent.position + offset * (step / distance)
                };
                Some((agent.id, next, heading))
            })
            .collect();

        for (id, position, heading) in moves {
            self.runtime.set_agent_position(id, position)?;
            if let Some(yaw) = heading {
                self.runtime.set_agent_facing(id, Facing::new(yaw, 0.0))?;
            }
            if let Some(agent) = self.runtime.agent(id) {
                let mut quest = agent.quest;
                if let Some(objective) = quest.objective {
                    quest.close_to_objective = position.distance(objective) <= arrival_radius;
                    self.runtime.set_quest_state(id, quest)?;
                }
            }
        }
        Ok(())
    }

    fn print_status(&self) {
        let mut line = format!("t={:>6.1}", self.runtime.now());
        for (name, id) in &self.names {
            let task = self.runtime.task_name(*id).unwrap_or("-");
            line.push_str(&format!("  {}:{}", name, task));
        }
        println!("{}", style(line).dim());
    }

    fn print_summary(&self, totals: &Totals) {
        println!("{}", style("=== Simulation Summary ===").bold().green());
        println!();

        println!("{}", style("Squads:").bold().yellow());
        for (leader, id) in &self.squads {
            let Some(squad) = self.runtime.squad(*id) else {
                println!("  {}: {}", leader, style("disbanded").red());
                continue;
            };
            let objective = squad.objective;
            println!(
                "  {} ({}): strategy {}, objective {} {} v{}, arrived {}/{}, duration {:.1}s{}",
                leader,
                squad.personality,
                self.runtime.strategy_name(*id).unwrap_or("none"),
                objective.action,
                objective.state,
                objective.version,
                objective.arrived_count,
                objective.assigned_count,
                objective.duration,
                if squad.threat.known {
                    format!(", threat heading {:.2}", squad.threat.direction.heading())
                } else {
                    String::new()
                }
            );
        }
        println!();

        println!("{}", style("Agents:").bold().yellow());
        for (name, id) in &self.names {
            let Some(agent) = self.runtime.agent(*id) else {
                println!("  {:<12} {}", name, style("removed").red());
                continue;
            };
            let target = agent
                .tactical_position
                .map(|position| position.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<12} at {}  task {:<18} role {:<10} tier {:<8} tactical {}{}",
                name,
                agent.position,
                self.runtime.task_name(*id).unwrap_or("none"),
                agent.role.as_ref(),
                agent.sharing_tier.as_ref(),
                target,
                if agent.arrived { " (arrived)" } else { "" }
            );
        }
        println!();

        let now = self.runtime.now();
        let max_age = self.runtime.config().events.max_age;
        let live = self
            .runtime
            .events()
            .iter()
            .filter(|event| event.is_live(now, max_age))
            .count();
        let clusters = self.runtime.clusters();
        println!("{}", style("Combat:").bold().yellow());
        println!(
            "  {} live events, {} clusters, {} deaths",
            live,
            clusters.len(),
            self.runtime.deaths().len()
        );
        for cluster in &clusters {
            println!(
                "  cluster at {} intensity {:.1} ({} events)",
                cluster.centroid, cluster.intensity, cluster.count
            );
        }
        println!();

        println!("{}", style("Totals:").bold().yellow());
        println!("  Task switches: {}", totals.task_switches);
        println!("  Strategy switches: {}", totals.strategy_switches);
        println!("  Threat changes: {}", totals.threat_changes);
        println!("  Objectives completed: {}", totals.completed);
        println!("  Events expired: {}", totals.expired_events);
        println!("  Agents reaped: {}", totals.reaped);
    }
}
