//! Simulation scenario loader.
//!
//! A scenario declares named agents, groups them into squads and schedules
//! objectives and combat events over time. Agents are referenced by name;
//! the loader rejects references to undeclared agents.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{CombatEvent, CombatEventKind, ObjectiveAction, Vec3};

use crate::loaders::{LoadResult, read_file};

/// A complete simulation scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Simulated seconds.
    pub duration: f32,
    /// Seconds per tick.
    #[serde(default = "default_tick")]
    pub tick: f32,
    pub agents: Vec<AgentSpec>,
    #[serde(default)]
    pub squads: Vec<SquadSpec>,
    #[serde(default)]
    pub objectives: Vec<ObjectiveSpec>,
    #[serde(default)]
    pub events: Vec<EventSpec>,
    /// Circular areas where no tactical position may be placed.
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
}

fn default_tick() -> f32 {
    0.1
}

impl Scenario {
    /// Number of ticks needed to cover `duration`.
    pub fn tick_count(&self) -> usize {
        if self.tick <= 0.0 {
            return 0;
        }
        // Absorb float error so 40.0 / 0.1 yields 400, not 401.
        (self.duration / self.tick - 1e-3).ceil().max(0.0) as usize
    }

    /// Checks names and numeric ranges.
    pub fn check(&self) -> LoadResult<()> {
        if !(self.tick > 0.0) {
            anyhow::bail!("Scenario '{}': tick must be positive", self.name);
        }

        let mut names = HashSet::new();
        for agent in &self.agents {
            if !names.insert(agent.name.as_str()) {
                anyhow::bail!("Scenario '{}': duplicate agent '{}'", self.name, agent.name);
            }
        }
        let known = |name: &str, what: &str| -> LoadResult<()> {
            if names.contains(name) {
                Ok(())
            } else {
                Err(anyhow::anyhow!(
                    "Scenario '{}': {} references unknown agent '{}'",
                    self.name,
                    what,
                    name
                ))
            }
        };

        let mut assigned = HashSet::new();
        for squad in &self.squads {
            known(&squad.leader, "squad leader")?;
            for follower in &squad.followers {
                known(follower, "squad follower")?;
            }
            for member in std::iter::once(&squad.leader).chain(&squad.followers) {
                if !assigned.insert(member.as_str()) {
                    anyhow::bail!(
                        "Scenario '{}': agent '{}' belongs to more than one squad",
                        self.name,
                        member
                    );
                }
            }
        }
        for objective in &self.objectives {
            known(&objective.leader, "objective")?;
        }
        Ok(())
    }
}

/// One agent to spawn at the start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub position: Vec3,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub earpiece: bool,
}

/// A squad formed at the start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadSpec {
    pub leader: String,
    pub followers: Vec<String>,
    /// Overrides the configured default coordination level.
    #[serde(default)]
    pub coordination: Option<u8>,
}

/// An objective handed to a leader at time `at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSpec {
    pub at: f32,
    pub leader: String,
    pub position: Vec3,
    pub action: ObjectiveAction,
    /// Planned seconds before the objective completes.
    pub duration: f32,
}

/// A combat event recorded at time `at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSpec {
    pub at: f32,
    pub kind: CombatEventKind,
    pub position: Vec3,
    #[serde(default)]
    pub power: f32,
    #[serde(default)]
    pub boss: bool,
}

impl EventSpec {
    pub fn to_event(&self) -> CombatEvent {
        CombatEvent::new(self.kind, self.position, self.at)
            .with_power(self.power)
            .with_boss(self.boss)
    }
}

/// A circular no-go area on the horizontal plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub center: Vec3,
    pub radius: f32,
}

impl ObstacleSpec {
    pub fn contains(&self, point: Vec3) -> bool {
        point.horizontal_distance(self.center) < self.radius
    }
}

/// Loader for simulation scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a `Scenario`
    ///
    /// # Returns
    ///
    /// Returns the scenario with objectives and events sorted by time.
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse a scenario from a RON string.
    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let mut scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;
        scenario.check()?;

        scenario.objectives.sort_by(|a, b| a.at.total_cmp(&b.at));
        scenario.events.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(scenario)
    }
}
