//! Tactical-position pipeline.
//!
//! Turns a squad's objective (or threat) into one position per follower.
//! Gates run in a fixed order and each can be switched off in config:
//!
//! 1. Communication range (through sharing tiers when objective sharing is on)
//! 2. Personality-based sharing roll
//! 3. Cover source (standard layout only; replaces gates 4 to 6 when it has
//!    enough points)
//! 4. Position validation
//! 5. Reachability
//! 6. Line of sight (overwatch only)
//!
//! A candidate rejected by gates 4 to 6 is retried on a sunflower spiral
//! around it, with one shared budget per follower. Followers for whom every
//! candidate fails end up with no tactical position.

use rand::Rng;
use tactics_core::{
    Capabilities, GeometryParams, PositionGates, SharingMember, SharingParams, SharingTier,
    Spiral, SquadRole, SquadStrategyConfig, TacticalEnv, Variant, Vec3, assign_roles, candidate,
    compute_tiers, degrade, roll_sharing, slots,
};

use crate::context::TickContext;
use crate::world::{AgentId, SquadId};

/// Counters describing one pipeline run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Followers that received a tactical position.
    pub assigned: usize,
    /// Followers excluded by communication range (tier none).
    pub out_of_range: usize,
    /// Followers that lost the personality sharing roll.
    pub not_shared: usize,
    /// Followers positioned from cover points.
    pub from_cover: usize,
    /// Followers positioned by a spiral fallback sample.
    pub fallbacks: usize,
    /// Followers for whom every candidate failed.
    pub failed: usize,
}

struct Follower {
    id: AgentId,
    position: Vec3,
    capabilities: Capabilities,
}

/// Recomputes roles, tiers and positions of every live follower of a squad.
///
/// In the combat layout escorts are reassigned to flankers. Returns `None`
/// when the squad or its leader no longer exists.
pub fn recompute(
    ctx: &mut TickContext,
    squad_id: SquadId,
    variant: Variant,
) -> Option<PipelineOutcome> {
    let TickContext {
        world,
        config,
        oracles,
        rng,
        ..
    } = ctx;
    let squad_config = &config.squad;

    let squad = world.squad(squad_id)?;
    let objective = squad.objective;
    let threat = squad.threat;
    let coordination = squad.coordination;
    let leader = world.agent(squad.leader)?;
    let leader_id = leader.id;
    let leader_member = SharingMember::new(leader.position, leader.capabilities);

    let followers: Vec<Follower> = leader
        .followers()
        .iter()
        .filter_map(|&id| world.agent(id))
        .filter(|agent| agent.alive)
        .map(|agent| Follower {
            id: agent.id,
            position: agent.position,
            capabilities: agent.capabilities,
        })
        .collect();

    let mut roles = assign_roles(
        objective.action,
        followers.len(),
        squad_config.use_action_roles,
    );
    if variant == Variant::Combat {
        for role in roles.iter_mut() {
            *role = role.under_threat();
        }
    }
    let slots = slots(&roles);
    let direction = match variant {
        Variant::Standard => leader_member.position - objective.position,
        Variant::Combat => threat.direction,
    };
    let params = GeometryParams::from_config(squad_config);
    let gates = squad_config.gates();
    let env = oracles.env();

    // Gates 1 and 2.
    let members: Vec<SharingMember> = followers
        .iter()
        .map(|f| SharingMember::new(f.position, f.capabilities))
        .collect();
    let tiers = sharing_tiers(&leader_member, &members, squad_config);
    let mut outcome = PipelineOutcome::default();
    let mut included = Vec::with_capacity(followers.len());
    for (follower, tier) in followers.iter().zip(&tiers) {
        let shared = if *tier == SharingTier::None {
            tracing::trace!("follower {:?} out of communication range", follower.id);
            outcome.out_of_range += 1;
            false
        } else if gates.contains(PositionGates::PERSONALITY) && !roll_sharing(coordination, rng) {
            tracing::trace!("follower {:?} lost the sharing roll", follower.id);
            outcome.not_shared += 1;
            false
        } else {
            true
        };
        included.push(shared);
    }
    let included_count = included.iter().filter(|&&shared| shared).count();

    // Gate 3.
    let cover_points = match env.cover() {
        Some(cover)
            if variant == Variant::Standard
                && gates.contains(PositionGates::COVER)
                && included_count > 0 =>
        {
            let radius = params
                .guard_distance
                .max(params.flank_distance)
                .max(params.overwatch_distance);
            let points = cover.supply(objective.position, radius, included_count);
            (points.len() >= included_count).then_some(points)
        }
        _ => None,
    };

    let mut positions = Vec::with_capacity(followers.len());
    let mut next_cover = 0;
    for (index, follower) in followers.iter().enumerate() {
        if !included[index] {
            positions.push(None);
            continue;
        }
        let resolved = match &cover_points {
            Some(points) => {
                outcome.from_cover += 1;
                next_cover += 1;
                Some(points[next_cover - 1])
            }
            None => {
                let slot = &slots[index];
                let geometric = candidate(
                    slot,
                    objective.position,
                    leader_member.position,
                    direction,
                    variant,
                    &params,
                );
                resolve(
                    geometric,
                    follower.position,
                    slot.role,
                    objective.position,
                    &env,
                    gates,
                    squad_config,
                    rng,
                    &mut outcome,
                )
            }
        };
        let delivered = resolved.and_then(|position| {
            degrade(
                position,
                tiers[index],
                squad_config.noise_base,
                coordination,
                rng,
            )
        });
        if delivered.is_some() {
            outcome.assigned += 1;
        } else {
            outcome.failed += 1;
            tracing::trace!("follower {:?}: no valid tactical position", follower.id);
        }
        positions.push(delivered);
    }

    for (index, follower) in followers.iter().enumerate() {
        if let Some(agent) = world.agent_mut(follower.id) {
            agent.role = roles[index];
            agent.sharing_tier = if included[index] {
                tiers[index]
            } else {
                SharingTier::None
            };
            agent.tactical_position = positions[index];
            agent.arrived = false;
        }
    }
    if let Some(leader) = world.agent_mut(leader_id) {
        leader.role = SquadRole::Leader;
    }

    Some(outcome)
}

/// Gate 1: tiers when objective sharing is on, a plain range check otherwise.
fn sharing_tiers(
    leader: &SharingMember,
    members: &[SharingMember],
    config: &SquadStrategyConfig,
) -> Vec<SharingTier> {
    let params = SharingParams::from_config(config);
    if config.objective_sharing {
        return compute_tiers(leader, members, &params);
    }
    members
        .iter()
        .map(|member| {
            if params.in_range(leader, member) {
                SharingTier::Direct
            } else {
                SharingTier::None
            }
        })
        .collect()
}

/// Gates 4 to 6 with spiral fallback.
#[allow(clippy::too_many_arguments)]
fn resolve(
    geometric: Vec3,
    from: Vec3,
    role: SquadRole,
    objective: Vec3,
    env: &TacticalEnv<'_>,
    gates: PositionGates,
    config: &SquadStrategyConfig,
    rng: &mut impl Rng,
    outcome: &mut PipelineOutcome,
) -> Option<Vec3> {
    let check = |point: Vec3| accept(point, from, role, objective, env, gates, config);
    if let Some(point) = check(geometric) {
        return Some(point);
    }

    let fallback = Spiral::random(
        geometric,
        config.fallback_search_radius,
        config.fallback_candidate_count,
        rng,
    )
    .find_map(check);
    if fallback.is_some() {
        outcome.fallbacks += 1;
    }
    fallback
}

fn accept(
    point: Vec3,
    from: Vec3,
    role: SquadRole,
    objective: Vec3,
    env: &TacticalEnv<'_>,
    gates: PositionGates,
    config: &SquadStrategyConfig,
) -> Option<Vec3> {
    let mut point = point;

    if gates.contains(PositionGates::VALIDATION)
        && let Some(validator) = env.validator()
    {
        point = validator.validate(point)?;
    }

    if gates.contains(PositionGates::REACHABILITY)
        && let Some(reachability) = env.reachability()
    {
        let max_path_length = config.max_path_length_multiplier * from.distance(point);
        if !reachability.is_reachable(from, point, max_path_length) {
            return None;
        }
    }

    if role.needs_line_of_sight()
        && gates.contains(PositionGates::LINE_OF_SIGHT)
        && let Some(sightline) = env.sightline()
        && !sightline.has_line_of_sight(point, objective)
    {
        return None;
    }

    Some(point)
}
