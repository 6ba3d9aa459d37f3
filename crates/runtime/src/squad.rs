//! Per-squad state: objective lifecycle and threat tracking.

use tactics_core::{ObjectiveAction, SquadPersonality, Vec3, clamp_coordination};

use crate::world::{AgentId, SquadId};

/// Lifecycle of a squad objective.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ObjectiveState {
    #[default]
    None,
    /// Followers are moving into position.
    Active,
    /// At least one follower arrived; holding.
    Wait,
    Complete,
}

impl ObjectiveState {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Active | Self::Wait)
    }
}

/// The objective a leader set for its squad.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SquadObjective {
    pub position: Vec3,
    pub action: ObjectiveAction,
    pub state: ObjectiveState,
    /// Bumped every time the leader sets an objective.
    pub version: u64,
    /// Planned seconds, possibly shortened once everyone arrived.
    pub duration: f32,
    pub started_at: f32,
    pub duration_shortened: bool,
    pub arrived_count: usize,
    /// Followers that received a tactical position in the last recompute.
    pub assigned_count: usize,
}

impl SquadObjective {
    /// Resets arrival bookkeeping after a recompute.
    pub(crate) fn reset_arrivals(&mut self, assigned_count: usize) {
        self.arrived_count = 0;
        self.assigned_count = assigned_count;
    }

    /// `true` once the (possibly shortened) duration has elapsed.
    pub fn is_expired(&self, now: f32) -> bool {
        self.state.is_running() && now - self.started_at >= self.duration
    }
}

/// What the squad knows about the current threat.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ThreatState {
    /// Horizontal unit vector from the leader towards the threat.
    pub direction: Vec3,
    pub known: bool,
    /// Bumped on every change of the threat.
    pub combat_version: u64,
    pub last_processed_combat_version: u64,
    /// Time of the last event supporting the threat.
    pub last_seen: f32,
}

impl ThreatState {
    pub fn has_unprocessed_change(&self) -> bool {
        self.combat_version != self.last_processed_combat_version
    }
}

/// A group of agents with one leader.
///
/// Followers are stored on the leader agent; [`crate::World::members`] lists
/// the whole squad.
#[derive(Clone, Debug)]
pub struct Squad {
    pub id: SquadId,
    pub leader: AgentId,
    pub objective: SquadObjective,
    /// Objective version the tactical strategy last computed positions for.
    ///
    /// `None` forces a recompute on the next update.
    pub seen_objective_version: Option<u64>,
    pub coordination: u8,
    pub personality: SquadPersonality,
    pub threat: ThreatState,
    /// Latest score of every registered strategy, by ordinal.
    pub scores: Vec<f32>,
    pub(crate) strategy: Option<usize>,
    /// Gathering point while regrouping.
    pub rally_point: Option<Vec3>,
}

impl Squad {
    pub(crate) fn new(
        id: SquadId,
        leader: AgentId,
        coordination: u8,
        strategy_count: usize,
    ) -> Self {
        let coordination = clamp_coordination(coordination);
        Self {
            id,
            leader,
            objective: SquadObjective::default(),
            seen_objective_version: None,
            coordination,
            personality: SquadPersonality::from_coordination(coordination),
            threat: ThreatState::default(),
            scores: vec![0.0; strategy_count],
            strategy: None,
            rally_point: None,
        }
    }

    /// Ordinal of the active strategy.
    pub fn strategy(&self) -> Option<usize> {
        self.strategy
    }

    pub fn set_coordination(&mut self, level: u8) {
        self.coordination = clamp_coordination(level);
        self.personality = SquadPersonality::from_coordination(self.coordination);
    }

    /// Starts a new objective and bumps its version.
    pub(crate) fn set_objective(
        &mut self,
        position: Vec3,
        action: ObjectiveAction,
        duration: f32,
        now: f32,
    ) {
        let version = self.objective.version + 1;
        self.objective = SquadObjective {
            position,
            action,
            state: ObjectiveState::Active,
            version,
            duration: duration.max(0.0),
            started_at: now,
            ..SquadObjective::default()
        };
    }

    /// Records a (new or turned) threat direction.
    pub(crate) fn report_threat(&mut self, direction: Vec3, now: f32) {
        self.threat.direction = direction;
        self.threat.known = true;
        self.threat.last_seen = now;
        self.threat.combat_version += 1;
    }

    /// Forgets the threat. Returns `false` if none was known.
    pub(crate) fn clear_threat(&mut self) -> bool {
        if !self.threat.known {
            return false;
        }
        self.threat.known = false;
        self.threat.combat_version += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn squad() -> Squad {
        let id = SquadId::from(KeyData::from_ffi(1));
        let leader = AgentId::from(KeyData::from_ffi(1));
        Squad::new(id, leader, 9, 2)
    }

    #[test]
    fn coordination_is_clamped_on_creation() {
        let squad = squad();
        assert_eq!(squad.coordination, 5);
        assert_eq!(squad.personality, SquadPersonality::Elite);
    }

    #[test]
    fn objective_versions_increase() {
        let mut squad = squad();
        squad.set_objective(Vec3::ZERO, ObjectiveAction::Ambush, 10.0, 0.0);
        squad.objective.arrived_count = 3;
        squad.set_objective(Vec3::X, ObjectiveAction::Snipe, 10.0, 5.0);

        assert_eq!(squad.objective.version, 2);
        assert_eq!(squad.objective.arrived_count, 0);
        assert_eq!(squad.objective.state, ObjectiveState::Active);
        assert!(!squad.objective.is_expired(14.9));
        assert!(squad.objective.is_expired(15.0));
    }

    #[test]
    fn every_threat_change_bumps_the_combat_version() {
        let mut squad = squad();
        assert!(!squad.clear_threat());
        squad.report_threat(Vec3::X, 1.0);
        squad.report_threat(Vec3::Z, 2.0);
        assert!(squad.clear_threat());
        assert_eq!(squad.threat.combat_version, 3);
        assert!(squad.threat.has_unprocessed_change());
    }
}
