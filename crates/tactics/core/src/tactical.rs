//! Per-role candidate positions.
//!
//! Pure geometry on the horizontal plane. `direction` is a horizontal vector
//! pointing from the objective towards what the squad faces: the approaching
//! leader in the [`Variant::Standard`] layout and the threat in the
//! [`Variant::Combat`] layout. It does not need to be normalized.
//!
//! A degenerate (zero) direction never gets normalized; the candidate falls
//! back to `reference − (distance, 0, 0)`. The vertical coordinate is always
//! the reference point's: the objective, or the boss for escorts.

use core::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::config::SquadStrategyConfig;
use crate::geometry::Vec3;
use crate::roles::SquadRole;

/// Which layout to compute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Variant {
    /// Objective-approach layout; guards ring the objective.
    #[default]
    Standard,
    /// Threat-biased layout; guards hold an arc facing the threat.
    Combat,
}

/// Per-role distances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryParams {
    pub guard_distance: f32,
    pub flank_distance: f32,
    pub overwatch_distance: f32,
    pub escort_trail_distance: f32,
    pub escort_lateral_spacing: f32,
}

impl GeometryParams {
    pub fn from_config(config: &SquadStrategyConfig) -> Self {
        Self {
            guard_distance: config.guard_distance,
            flank_distance: config.flank_distance,
            overwatch_distance: config.overwatch_distance,
            escort_trail_distance: config.escort_trail_distance,
            escort_lateral_spacing: config.escort_lateral_spacing,
        }
    }
}

/// Where a follower sits in the squad and within its role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub role: SquadRole,
    /// Index among all followers.
    pub index: usize,
    /// Number of followers.
    pub count: usize,
    /// Index among followers with the same role.
    pub role_index: usize,
    /// Number of followers with the same role.
    pub role_count: usize,
}

/// Builds slots for an ordered role list.
pub fn slots(roles: &[SquadRole]) -> Vec<Slot> {
    let mut seen: Vec<(SquadRole, usize)> = Vec::new();
    roles
        .iter()
        .enumerate()
        .map(|(index, &role)| {
            let role_index = match seen.iter_mut().find(|(r, _)| *r == role) {
                Some((_, n)) => {
                    *n += 1;
                    *n - 1
                }
                None => {
                    seen.push((role, 1));
                    0
                }
            };
            Slot {
                role,
                index,
                count: roles.len(),
                role_index,
                role_count: roles.iter().filter(|&&r| r == role).count(),
            }
        })
        .collect()
}

/// Computes the geometric candidate for one slot.
///
/// # Arguments
///
/// * `slot` - The follower's slot
/// * `objective` - Objective position (reference for every role but escort)
/// * `boss` - Boss position (reference for escorts)
/// * `direction` - Approach or threat direction, see module docs
/// * `variant` - Standard or combat layout
/// * `params` - Per-role distances
pub fn candidate(
    slot: &Slot,
    objective: Vec3,
    boss: Vec3,
    direction: Vec3,
    variant: Variant,
    params: &GeometryParams,
) -> Vec3 {
    let dir = direction.normalized_horizontal();
    let axis_fallback = |reference: Vec3, distance: f32| reference - Vec3::X * distance;

    match slot.role {
        SquadRole::None | SquadRole::Leader => objective,
        SquadRole::Guard => match variant {
            Variant::Standard => {
                let angle = slot.index as f32 * (TAU / slot.count.max(1) as f32);
                on_circle(objective, angle, params.guard_distance)
            }
            Variant::Combat => match dir {
                Some(dir) => {
                    let spread = PI / slot.role_count.max(1) as f32;
                    let offset = spread * (slot.role_index as f32 + 0.5);
                    let angle = dir.heading() - FRAC_PI_2 + offset;
                    on_circle(objective, angle, params.guard_distance)
                }
                None => axis_fallback(objective, params.guard_distance),
            },
        },
        SquadRole::Flanker => match dir {
            Some(dir) => {
                let side = if slot.index % 2 == 0 { 1.0 } else { -1.0 };
                objective + dir.perpendicular() * (params.flank_distance * side)
            }
            None => axis_fallback(objective, params.flank_distance),
        },
        SquadRole::Overwatch => match dir {
            Some(dir) => objective - dir * params.overwatch_distance,
            None => axis_fallback(objective, params.overwatch_distance),
        },
        SquadRole::Escort => match dir {
            Some(dir) => {
                let center = (slot.role_count.max(1) - 1) as f32 / 2.0;
                let lateral = (slot.role_index as f32 - center) * params.escort_lateral_spacing;
                boss + dir * params.escort_trail_distance + dir.perpendicular() * lateral
            }
            None => axis_fallback(boss, params.escort_trail_distance),
        },
    }
}

fn on_circle(center: Vec3, angle: f32, radius: f32) -> Vec3 {
    center + Vec3::from_heading(angle) * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ObjectiveAction, assign_roles};

    fn params() -> GeometryParams {
        GeometryParams::from_config(&SquadStrategyConfig::default())
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn single_ambush_follower_flanks_perpendicular_to_the_approach() {
        let roles = assign_roles(ObjectiveAction::Ambush, 1, true);
        let slot = slots(&roles)[0];
        assert_eq!(slot.role, SquadRole::Flanker);

        let objective = Vec3::new(10.0, 1.5, 10.0);
        let direction = Vec3::flat(0.0, -7.0);
        let params = params();
        let position = candidate(
            &slot,
            objective,
            objective,
            direction,
            Variant::Standard,
            &params,
        );

        let offset = position - objective;
        assert!((offset.horizontal_length() - params.flank_distance).abs() < 1e-4);
        assert!(offset.dot(direction).abs() < 1e-4);
        assert_eq!(position.y, objective.y);
    }

    #[test]
    fn standard_guards_ring_the_objective_by_index() {
        let roles = [SquadRole::Guard; 4];
        let params = params();
        let positions: Vec<Vec3> = slots(&roles)
            .iter()
            .map(|slot| {
                candidate(
                    slot,
                    Vec3::ZERO,
                    Vec3::ZERO,
                    Vec3::X,
                    Variant::Standard,
                    &params,
                )
            })
            .collect();
        let d = params.guard_distance;
        assert!(close(positions[0], Vec3::flat(d, 0.0)));
        assert!(close(positions[1], Vec3::flat(0.0, d)));
        assert!(close(positions[2], Vec3::flat(-d, 0.0)));
        assert!(close(positions[3], Vec3::flat(0.0, -d)));
    }

    #[test]
    fn combat_guards_hold_an_arc_facing_the_threat() {
        let roles = [SquadRole::Guard, SquadRole::Guard];
        let params = params();
        let d = params.guard_distance;
        let positions: Vec<Vec3> = slots(&roles)
            .iter()
            .map(|slot| candidate(slot, Vec3::ZERO, Vec3::ZERO, Vec3::X, Variant::Combat, &params))
            .collect();
        // Two guards land at base ± spread/2 with spread = 90°.
        let quarter = core::f32::consts::FRAC_PI_4;
        assert!(close(positions[0], on_circle(Vec3::ZERO, -quarter, d)));
        assert!(close(positions[1], on_circle(Vec3::ZERO, quarter, d)));
        assert!(positions.iter().all(|p| p.x > 0.0));
    }

    #[test]
    fn overwatch_sits_opposite_the_direction() {
        let slot = slots(&[SquadRole::Overwatch])[0];
        let params = params();
        let position = candidate(
            &slot,
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::flat(0.0, 3.0),
            Variant::Standard,
            &params,
        );
        assert!(close(position, Vec3::flat(0.0, -params.overwatch_distance)));
    }

    #[test]
    fn escorts_spread_side_by_side_around_the_boss_line() {
        let roles = [SquadRole::Escort; 3];
        let params = params();
        let boss = Vec3::new(5.0, 2.0, 0.0);
        let positions: Vec<Vec3> = slots(&roles)
            .iter()
            .map(|slot| candidate(slot, Vec3::ZERO, boss, Vec3::X, Variant::Standard, &params))
            .collect();
        let trail = boss.x + params.escort_trail_distance;
        let spacing = params.escort_lateral_spacing;
        assert!(close(positions[0], Vec3::new(trail, 2.0, -spacing)));
        assert!(close(positions[1], Vec3::new(trail, 2.0, 0.0)));
        assert!(close(positions[2], Vec3::new(trail, 2.0, spacing)));
    }

    #[test]
    fn zero_direction_falls_back_to_axis_offset() {
        let params = params();
        let objective = Vec3::new(1.0, 4.0, 1.0);
        for role in [SquadRole::Flanker, SquadRole::Overwatch] {
            let slot = slots(&[role])[0];
            let position = candidate(
                &slot,
                objective,
                objective,
                Vec3::ZERO,
                Variant::Standard,
                &params,
            );
            assert!(position.is_finite());
            assert_eq!(position.y, objective.y);
            assert!(position.x < objective.x);
        }
    }

    #[test]
    fn flanker_side_follows_follower_index() {
        let roles = assign_roles(ObjectiveAction::Undefined, 5, false);
        let slots = slots(&roles);
        assert_eq!(slots[1].role, SquadRole::Flanker);
        assert_eq!(slots[4].role, SquadRole::Flanker);

        let params = params();
        let d = params.flank_distance;
        let place = |slot: &Slot| {
            candidate(
                slot,
                Vec3::ZERO,
                Vec3::ZERO,
                Vec3::X,
                Variant::Standard,
                &params,
            )
        };
        // Perpendicular of +x is +z; odd indices take the far side.
        assert!(close(place(&slots[1]), Vec3::flat(0.0, -d)));
        assert!(close(place(&slots[4]), Vec3::flat(0.0, d)));
    }

    #[test]
    fn slots_count_roles() {
        let roles = assign_roles(ObjectiveAction::Ambush, 4, true);
        let slots = slots(&roles);
        assert_eq!(slots[3].role, SquadRole::Flanker);
        assert_eq!(slots[3].role_index, 1);
        assert_eq!(slots[3].role_count, 2);
        assert_eq!(slots[1].role_count, 1);
    }
}
