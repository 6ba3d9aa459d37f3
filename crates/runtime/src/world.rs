//! Handle-based storage of agents and squads.
//!
//! Agents and squads live in slot maps and refer to each other by key. The
//! boss/follower cycle is stored in both directions (`Agent::boss` and the
//! boss's `Agent::followers`); every link change goes through a `World`
//! method that updates both sides, so no reference can dangle.

use slotmap::SlotMap;

use crate::agent::{Agent, AgentSpawn, MAX_FOLLOWERS};
use crate::error::{Result, RuntimeError};
use crate::squad::Squad;

slotmap::new_key_type! {
    /// Handle of an agent.
    pub struct AgentId;
    /// Handle of a squad.
    pub struct SquadId;
}

#[derive(Clone, Debug, Default)]
pub struct World {
    agents: SlotMap<AgentId, Agent>,
    squads: SlotMap<SquadId, Squad>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn spawn(&mut self, spawn: AgentSpawn, task_count: usize) -> AgentId {
        self.agents
            .insert_with_key(|id| Agent::new(id, spawn, task_count))
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id)
    }

    pub fn squad(&self, id: SquadId) -> Option<&Squad> {
        self.squads.get(id)
    }

    pub fn squad_mut(&mut self, id: SquadId) -> Option<&mut Squad> {
        self.squads.get_mut(id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn squads(&self) -> impl Iterator<Item = &Squad> {
        self.squads.values()
    }

    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.agents.keys().collect()
    }

    pub fn squad_ids(&self) -> Vec<SquadId> {
        self.squads.keys().collect()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn squad_count(&self) -> usize {
        self.squads.len()
    }

    pub(crate) fn agents_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.values_mut()
    }

    /// Leader followed by its followers.
    pub fn members(&self, squad: SquadId) -> Vec<AgentId> {
        let Some(squad) = self.squads.get(squad) else {
            return Vec::new();
        };
        let mut members = vec![squad.leader];
        if let Some(leader) = self.agents.get(squad.leader) {
            members.extend(leader.followers.iter().copied());
        }
        members
    }

    /// Followers of a squad's leader.
    pub fn followers(&self, squad: SquadId) -> Vec<AgentId> {
        self.squads
            .get(squad)
            .and_then(|squad| self.agents.get(squad.leader))
            .map(|leader| leader.followers.to_vec())
            .unwrap_or_default()
    }

    fn live_agent(&self, id: AgentId) -> Result<&Agent> {
        let agent = self.agents.get(id).ok_or(RuntimeError::UnknownAgent(id))?;
        if !agent.alive {
            return Err(RuntimeError::AgentDead(id));
        }
        Ok(agent)
    }

    /// Creates a squad led by `leader`.
    pub(crate) fn form_squad(
        &mut self,
        leader: AgentId,
        coordination: u8,
        strategy_count: usize,
    ) -> Result<SquadId> {
        let agent = self.live_agent(leader)?;
        if let Some(squad) = agent.squad {
            return Err(RuntimeError::AlreadyInSquad {
                agent: leader,
                squad,
            });
        }

        let id = self
            .squads
            .insert_with_key(|id| Squad::new(id, leader, coordination, strategy_count));
        if let Some(agent) = self.agents.get_mut(leader) {
            agent.squad = Some(id);
        }
        Ok(id)
    }

    /// Links `follower` to the squad's leader.
    ///
    /// # Returns
    ///
    /// `Ok(false)` when the squad is already at `max_followers`; the follower
    /// is then left untouched.
    pub(crate) fn attach(
        &mut self,
        squad: SquadId,
        follower: AgentId,
        max_followers: usize,
    ) -> Result<bool> {
        let leader = self
            .squads
            .get(squad)
            .ok_or(RuntimeError::UnknownSquad(squad))?
            .leader;
        if leader == follower {
            return Err(RuntimeError::SelfFollow(follower));
        }
        let agent = self.live_agent(follower)?;
        if let Some(current) = agent.squad {
            return Err(RuntimeError::AlreadyInSquad {
                agent: follower,
                squad: current,
            });
        }

        let limit = max_followers.min(MAX_FOLLOWERS);
        let boss = self
            .agents
            .get_mut(leader)
            .ok_or(RuntimeError::UnknownAgent(leader))?;
        if boss.followers.len() >= limit || boss.followers.try_push(follower).is_err() {
            return Ok(false);
        }

        if let Some(agent) = self.agents.get_mut(follower) {
            agent.boss = Some(leader);
            agent.squad = Some(squad);
        }
        if let Some(squad) = self.squads.get_mut(squad) {
            squad.seen_objective_version = None;
        }
        Ok(true)
    }

    /// Unlinks a follower from its boss and squad.
    pub(crate) fn detach(&mut self, follower: AgentId) -> Result<()> {
        let agent = self
            .agents
            .get_mut(follower)
            .ok_or(RuntimeError::UnknownAgent(follower))?;
        let boss = agent.boss.take().ok_or(RuntimeError::NotInSquad(follower))?;
        let squad = agent.squad.take();
        agent.clear_tactics();

        if let Some(boss) = self.agents.get_mut(boss)
            && let Some(index) = boss.followers.iter().position(|&id| id == follower)
        {
            boss.followers.swap_remove(index);
        }
        if let Some(squad) = squad.and_then(|id| self.squads.get_mut(id)) {
            squad.seen_objective_version = None;
        }
        Ok(())
    }

    /// Dissolves a squad and releases every member.
    ///
    /// # Returns
    ///
    /// The released followers.
    pub(crate) fn disband(&mut self, squad: SquadId) -> Result<Vec<AgentId>> {
        let squad = self
            .squads
            .remove(squad)
            .ok_or(RuntimeError::UnknownSquad(squad))?;

        let followers = match self.agents.get_mut(squad.leader) {
            Some(leader) => {
                leader.squad = None;
                leader.clear_tactics();
                core::mem::take(&mut leader.followers).to_vec()
            }
            None => Vec::new(),
        };
        for &id in &followers {
            if let Some(follower) = self.agents.get_mut(id) {
                follower.boss = None;
                follower.squad = None;
                follower.clear_tactics();
            }
        }
        Ok(followers)
    }

    /// Removes an agent after severing all of its links.
    ///
    /// A leader's squad is disbanded.
    pub(crate) fn remove_agent(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.get(id)?;
        match (agent.squad, agent.boss) {
            (Some(squad), None) => {
                let _ = self.disband(squad);
            }
            (_, Some(_)) => {
                let _ = self.detach(id);
            }
            (None, None) => {}
        }
        self.agents.remove(id)
    }

    pub(crate) fn dead_agents(&self) -> Vec<AgentId> {
        self.agents
            .iter()
            .filter(|(_, agent)| !agent.alive)
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::Vec3;

    fn world_with(count: usize) -> (World, Vec<AgentId>) {
        let mut world = World::new();
        let ids = (0..count)
            .map(|i| world.spawn(AgentSpawn::at(Vec3::flat(i as f32, 0.0)), 4))
            .collect();
        (world, ids)
    }

    fn assert_links_consistent(world: &World) {
        for agent in world.agents() {
            if let Some(boss) = agent.boss() {
                let boss = world.agent(boss).expect("boss exists");
                assert!(boss.followers().contains(&agent.id));
                assert_eq!(boss.squad(), agent.squad());
            }
            for &follower in agent.followers() {
                assert_eq!(world.agent(follower).and_then(|f| f.boss()), Some(agent.id));
            }
        }
    }

    #[test]
    fn attach_and_detach_keep_both_sides_in_sync() {
        let (mut world, ids) = world_with(4);
        let squad = world.form_squad(ids[0], 3, 2).expect("form squad");
        for &id in &ids[1..] {
            assert_eq!(world.attach(squad, id, 8), Ok(true));
        }
        assert_links_consistent(&world);
        assert_eq!(world.members(squad), ids);

        world.detach(ids[1]).expect("detach");
        assert_links_consistent(&world);
        assert_eq!(world.followers(squad).len(), 2);
        assert!(world.agent(ids[1]).and_then(|a| a.squad()).is_none());
        assert_eq!(world.detach(ids[1]), Err(RuntimeError::NotInSquad(ids[1])));
    }

    #[test]
    fn followers_beyond_the_limit_are_ignored() {
        let (mut world, ids) = world_with(4);
        let squad = world.form_squad(ids[0], 3, 2).expect("form squad");
        assert_eq!(world.attach(squad, ids[1], 2), Ok(true));
        assert_eq!(world.attach(squad, ids[2], 2), Ok(true));
        assert_eq!(world.attach(squad, ids[3], 2), Ok(false));
        assert!(world.agent(ids[3]).and_then(|a| a.squad()).is_none());
    }

    #[test]
    fn misuse_is_rejected() {
        let (mut world, ids) = world_with(3);
        let squad = world.form_squad(ids[0], 3, 2).expect("form squad");
        assert_eq!(world.attach(squad, ids[0], 8), Err(RuntimeError::SelfFollow(ids[0])));
        assert!(matches!(
            world.form_squad(ids[0], 3, 2),
            Err(RuntimeError::AlreadyInSquad { .. })
        ));

        world.agent_mut(ids[2]).expect("agent").alive = false;
        assert_eq!(world.attach(squad, ids[2], 8), Err(RuntimeError::AgentDead(ids[2])));
    }

    #[test]
    fn removing_a_leader_disbands_the_squad() {
        let (mut world, ids) = world_with(3);
        let squad = world.form_squad(ids[0], 3, 2).expect("form squad");
        world.attach(squad, ids[1], 8).expect("attach");
        world.attach(squad, ids[2], 8).expect("attach");

        world.remove_agent(ids[0]).expect("leader removed");
        assert!(world.squad(squad).is_none());
        for &id in &ids[1..] {
            let agent = world.agent(id).expect("follower survives");
            assert!(agent.boss().is_none());
            assert!(agent.squad().is_none());
        }
        assert_links_consistent(&world);
    }
}
