//! Tick-driven runtime orchestrator.
//!
//! The runtime owns the world, the combat event registry, both selectors,
//! and the host oracles, and exposes a builder-based API for the host to
//! drive the simulation one fixed step at a time.

use tactics_core::{
    CombatCluster, CombatEvent, CombatEventRegistry, CoverSource, Facing, ObjectiveAction,
    PositionValidator, ReachabilityOracle, SightlineOracle, TacticsConfig, Vec3, cluster_events,
    death_events, seeded,
};
use utility_selector::{Switch, UtilityHost, UtilitySelector};

use crate::agent::{Agent, AgentSpawn, QuestState};
use crate::context::{Oracles, TickContext};
use crate::error::{Result, RuntimeError};
use crate::scanner::scan_agents;
use crate::squad::{ObjectiveState, Squad};
use crate::strategies::{self, BoxedStrategy};
use crate::tasks::{self, BoxedTask};
use crate::threat::{ThreatChange, derive_threats};
use crate::world::{AgentId, SquadId, World};

/// What happened during one [`Runtime::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Simulation time after the tick.
    pub now: f32,
    pub task_switches: Vec<Switch<AgentId>>,
    pub strategy_switches: Vec<Switch<SquadId>>,
    pub threat_changes: Vec<(SquadId, ThreatChange)>,
    /// Squads whose objective completed this tick.
    pub completed: Vec<SquadId>,
    /// Events dropped by the expiry sweep.
    pub expired_events: usize,
    /// Dead agents removed at the end of the tick.
    pub reaped: Vec<AgentId>,
}

/// Squad tactics runtime.
///
/// # Tick order
///
/// 1. Advance the clock
/// 2. Periodic event expiry sweep
/// 3. Objective timers (running objectives past their duration complete)
/// 4. Event scan for every live agent
/// 5. Threat derivation from leader perception
/// 6. Task selection and task updates
/// 7. Strategy selection and strategy updates
/// 8. Reaping of dead agents
pub struct Runtime {
    ctx: TickContext,
    tasks: UtilitySelector<AgentId, TickContext>,
    strategies: UtilitySelector<SquadId, TickContext>,
    last_sweep: f32,
}

impl Runtime {
    /// Runtime with the given configuration, no oracles, and the built-in
    /// tasks and strategies.
    pub fn new(config: TacticsConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    // ===== read access =====

    pub fn config(&self) -> &TacticsConfig {
        &self.ctx.config
    }

    /// Simulation time in seconds.
    pub fn now(&self) -> f32 {
        self.ctx.now
    }

    pub fn world(&self) -> &World {
        &self.ctx.world
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.ctx.world.agent(id)
    }

    pub fn squad(&self, id: SquadId) -> Option<&Squad> {
        self.ctx.world.squad(id)
    }

    pub fn events(&self) -> &CombatEventRegistry {
        &self.ctx.events
    }

    pub fn oracles(&self) -> &Oracles {
        &self.ctx.oracles
    }

    /// Name of the task currently assigned to an agent.
    pub fn task_name(&self, id: AgentId) -> Option<&'static str> {
        let ordinal = self.agent(id)?.task()?;
        self.tasks.option_name(ordinal)
    }

    /// Name of the strategy currently assigned to a squad.
    pub fn strategy_name(&self, id: SquadId) -> Option<&'static str> {
        let ordinal = self.squad(id)?.strategy()?;
        self.strategies.option_name(ordinal)
    }

    pub fn task_ordinal(&self, name: &str) -> Option<usize> {
        self.tasks.ordinal_of(name)
    }

    pub fn strategy_ordinal(&self, name: &str) -> Option<usize> {
        self.strategies.ordinal_of(name)
    }

    // ===== agents and squads =====

    pub fn spawn_agent(&mut self, spawn: AgentSpawn) -> AgentId {
        let id = self.ctx.world.spawn(spawn, self.tasks.len());
        tracing::trace!("spawned agent {:?} at {}", id, spawn.position);
        id
    }

    /// Forms a squad led by `leader`.
    ///
    /// `coordination` defaults to `squad.default_coordination` and is clamped
    /// to 1..=5.
    pub fn form_squad(&mut self, leader: AgentId, coordination: Option<u8>) -> Result<SquadId> {
        let coordination = coordination.unwrap_or(self.ctx.config.squad.default_coordination);
        let id = self
            .ctx
            .world
            .form_squad(leader, coordination, self.strategies.len())?;
        tracing::debug!("agent {:?} formed squad {:?}", leader, id);
        Ok(id)
    }

    /// Adds a follower to a squad.
    ///
    /// # Returns
    ///
    /// `Ok(false)` when the squad is full; the follower is ignored.
    pub fn join_squad(&mut self, squad: SquadId, follower: AgentId) -> Result<bool> {
        let max_followers = self.ctx.config.squad.max_followers;
        let joined = self.ctx.world.attach(squad, follower, max_followers)?;
        if joined {
            tracing::debug!("agent {:?} joined squad {:?}", follower, squad);
        } else {
            tracing::debug!(
                "squad {:?} is full ({} followers), ignoring agent {:?}",
                squad,
                max_followers,
                follower
            );
        }
        Ok(joined)
    }

    /// Removes a follower from its squad.
    pub fn leave_squad(&mut self, follower: AgentId) -> Result<()> {
        self.ctx.world.detach(follower)?;
        tracing::debug!("agent {:?} left its squad", follower);
        Ok(())
    }

    /// Marks an agent dead. Selectors release it on the next tick, which then
    /// removes it.
    pub fn kill(&mut self, id: AgentId) -> Result<()> {
        let agent = self
            .ctx
            .world
            .agent_mut(id)
            .ok_or(RuntimeError::UnknownAgent(id))?;
        agent.alive = false;
        Ok(())
    }

    pub fn set_agent_position(&mut self, id: AgentId, position: Vec3) -> Result<()> {
        self.agent_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_agent_facing(&mut self, id: AgentId, facing: Facing) -> Result<()> {
        self.agent_mut(id)?.facing = facing;
        Ok(())
    }

    /// Replaces the host-owned quest state of an agent.
    pub fn set_quest_state(&mut self, id: AgentId, quest: QuestState) -> Result<()> {
        self.agent_mut(id)?.quest = quest;
        Ok(())
    }

    /// Gives a squad leader a new objective.
    ///
    /// Writes the leader's quest state, bumps the squad objective version and
    /// restarts the objective timer.
    pub fn set_leader_objective(
        &mut self,
        leader: AgentId,
        position: Vec3,
        action: ObjectiveAction,
        duration: f32,
    ) -> Result<SquadId> {
        let now = self.ctx.now;
        let agent = self.agent_mut(leader)?;
        if !agent.alive {
            return Err(RuntimeError::AgentDead(leader));
        }
        let squad_id = match (agent.squad(), agent.boss()) {
            (Some(squad), None) => squad,
            (Some(_), Some(_)) => return Err(RuntimeError::NotLeader(leader)),
            (None, _) => return Err(RuntimeError::NotInSquad(leader)),
        };
        agent.quest = QuestState {
            action,
            objective: Some(position),
            objective_active: true,
            close_to_objective: false,
            ..agent.quest
        };

        let squad = self
            .ctx
            .world
            .squad_mut(squad_id)
            .ok_or(RuntimeError::UnknownSquad(squad_id))?;
        squad.set_objective(position, action, duration, now);
        tracing::info!(
            "squad {:?}: objective {} at {} for {:.1}s (version {})",
            squad_id,
            action,
            position,
            duration,
            squad.objective.version
        );
        Ok(squad_id)
    }

    /// Reports a threat direction for a squad.
    ///
    /// The direction is flattened and normalized. Returns `Ok(false)` for a
    /// zero direction, which is ignored.
    pub fn report_threat(&mut self, squad: SquadId, direction: Vec3) -> Result<bool> {
        let now = self.ctx.now;
        let squad_state = self
            .ctx
            .world
            .squad_mut(squad)
            .ok_or(RuntimeError::UnknownSquad(squad))?;
        let Some(direction) = direction.normalized_horizontal() else {
            return Ok(false);
        };
        squad_state.report_threat(direction, now);
        tracing::info!(
            "squad {:?}: threat reported towards heading {:.2}",
            squad,
            direction.heading()
        );
        Ok(true)
    }

    /// Forgets a squad's threat. Returns `Ok(false)` if none was known.
    pub fn clear_threat(&mut self, squad: SquadId) -> Result<bool> {
        let cleared = self
            .ctx
            .world
            .squad_mut(squad)
            .ok_or(RuntimeError::UnknownSquad(squad))?
            .clear_threat();
        if cleared {
            tracing::info!("squad {:?}: threat cleared", squad);
        }
        Ok(cleared)
    }

    // ===== combat events =====

    pub fn record_event(&mut self, event: CombatEvent) {
        tracing::trace!("{} at {} (t={:.1})", event.kind, event.position, event.time);
        self.ctx.events.record(event);
    }

    /// Drops every event and resizes the registry (0 selects the default).
    pub fn reinitialize_events(&mut self, capacity: usize) {
        self.ctx.events.reinitialize(capacity);
    }

    /// Clusters of live, non-death events.
    pub fn clusters(&self) -> Vec<CombatCluster> {
        let config = &self.ctx.config.events;
        cluster_events(
            self.ctx.events.iter(),
            self.ctx.now,
            config.max_age,
            config.cluster_radius,
            config.max_clusters,
            self.ctx.events.weights(),
        )
    }

    /// Live death events.
    pub fn deaths(&self) -> Vec<CombatEvent> {
        death_events(
            self.ctx.events.iter(),
            self.ctx.now,
            self.ctx.config.events.max_age,
        )
    }

    // ===== simulation =====

    /// Advances the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let ctx = &mut self.ctx;
        ctx.now += dt.max(0.0);
        let now = ctx.now;
        let mut report = TickReport {
            now,
            ..TickReport::default()
        };

        let events = &ctx.config.events;
        if now - self.last_sweep >= events.expiry_interval {
            report.expired_events = ctx.events.expire(now, events.max_age);
            self.last_sweep = now;
        }

        report.completed = complete_objectives(ctx);

        scan_agents(&mut ctx.world, &ctx.events, &ctx.config.events, now);
        report.threat_changes = derive_threats(ctx);

        let agents = ctx.world.agent_ids();
        report.task_switches = self.tasks.tick(&agents, ctx);
        for switch in &report.task_switches {
            tracing::debug!(
                "agent {:?}: {} -> {}",
                switch.key,
                option_label(&self.tasks, switch.from),
                option_label(&self.tasks, switch.to)
            );
        }

        let squads = ctx.world.squad_ids();
        report.strategy_switches = self.strategies.tick(&squads, ctx);
        for switch in &report.strategy_switches {
            tracing::debug!(
                "squad {:?}: {} -> {}",
                switch.key,
                option_label(&self.strategies, switch.from),
                option_label(&self.strategies, switch.to)
            );
        }

        for id in ctx.world.dead_agents() {
            if ctx.world.remove_agent(id).is_some() {
                tracing::debug!("reaped agent {:?}", id);
                report.reaped.push(id);
            }
        }

        report
    }

    fn agent_mut(&mut self, id: AgentId) -> Result<&mut Agent> {
        self.ctx
            .world
            .agent_mut(id)
            .ok_or(RuntimeError::UnknownAgent(id))
    }
}

/// Moves expired objectives to `Complete` and deactivates the leader's quest.
fn complete_objectives(ctx: &mut TickContext) -> Vec<SquadId> {
    let now = ctx.now;
    let mut completed = Vec::new();
    for id in ctx.world.squad_ids() {
        let Some(squad) = ctx.world.squad_mut(id) else {
            continue;
        };
        if !squad.objective.is_expired(now) {
            continue;
        }
        squad.objective.state = ObjectiveState::Complete;
        let leader = squad.leader;
        if let Some(leader) = ctx.world.agent_mut(leader) {
            leader.quest.objective_active = false;
        }
        tracing::info!("squad {:?}: objective complete at {:.1}s", id, now);
        completed.push(id);
    }
    completed
}

fn option_label<K: Copy>(
    selector: &UtilitySelector<K, TickContext>,
    ordinal: Option<usize>,
) -> &'static str
where
    TickContext: UtilityHost<K>,
{
    ordinal
        .and_then(|ordinal| selector.option_name(ordinal))
        .unwrap_or("none")
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: TacticsConfig,
    oracles: Oracles,
    tasks: Option<Vec<BoxedTask>>,
    strategies: Option<Vec<BoxedStrategy>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: TacticsConfig::default(),
            oracles: Oracles::default(),
            tasks: None,
            strategies: None,
        }
    }

    /// Override the configuration. It is sanitized on build.
    pub fn config(mut self, config: TacticsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn validator(mut self, validator: impl PositionValidator + 'static) -> Self {
        self.oracles.validator = Some(Box::new(validator));
        self
    }

    pub fn reachability(mut self, reachability: impl ReachabilityOracle + 'static) -> Self {
        self.oracles.reachability = Some(Box::new(reachability));
        self
    }

    pub fn sightline(mut self, sightline: impl SightlineOracle + 'static) -> Self {
        self.oracles.sightline = Some(Box::new(sightline));
        self
    }

    pub fn cover(mut self, cover: impl CoverSource + 'static) -> Self {
        self.oracles.cover = Some(Box::new(cover));
        self
    }

    /// Replaces the built-in tasks. Declaration order is tie-break order.
    ///
    /// An empty list keeps the built-in tasks.
    pub fn tasks(mut self, tasks: Vec<BoxedTask>) -> Self {
        self.tasks = (!tasks.is_empty()).then_some(tasks);
        self
    }

    /// Replaces the built-in strategies. Declaration order is tie-break order.
    ///
    /// An empty list keeps the built-in strategies.
    pub fn strategies(mut self, strategies: Vec<BoxedStrategy>) -> Self {
        self.strategies = (!strategies.is_empty()).then_some(strategies);
        self
    }

    /// Build the runtime
    pub fn build(self) -> Runtime {
        let (config, adjustments) = self.config.sanitized();
        for adjustment in &adjustments {
            tracing::warn!("config adjusted: {}", adjustment);
        }

        let tasks = self.tasks.unwrap_or_else(tasks::default_tasks);
        let strategies = self.strategies.unwrap_or_else(strategies::default_strategies);
        let events =
            CombatEventRegistry::with_weights(config.events.capacity, config.events.weights);

        Runtime {
            ctx: TickContext {
                world: World::new(),
                events,
                rng: seeded(config.seed),
                config,
                oracles: self.oracles,
                now: 0.0,
            },
            tasks: UtilitySelector::new(tasks),
            strategies: UtilitySelector::new(strategies),
            last_sweep: 0.0,
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(TacticsConfig::default())
    }
}
