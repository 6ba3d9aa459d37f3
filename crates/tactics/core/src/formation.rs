//! Follow-the-boss slots and movement pace.

use crate::config::FormationConfig;
use crate::geometry::Vec3;

/// Movement speed requested from the host.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::AsRefStr,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case")]
pub enum Pace {
    #[default]
    Walk,
    Run,
    Sprint,
}

/// Pace for a given remaining distance to the move target.
pub fn pace_for(distance: f32, config: &FormationConfig) -> Pace {
    if distance <= config.walk_distance {
        Pace::Walk
    } else if distance >= config.sprint_distance {
        Pace::Sprint
    } else {
        Pace::Run
    }
}

/// Column slot of follower `index` behind a boss facing `heading` (radians).
///
/// Slots step back by `column_spacing` and alternate sides by
/// `lateral_stagger`, starting on the right.
pub fn follow_slot(boss: Vec3, heading: f32, index: usize, config: &FormationConfig) -> Vec3 {
    let forward = Vec3::from_heading(heading);
    let back = config.follow_distance + index as f32 * config.column_spacing;
    let side = if index % 2 == 0 { 1.0 } else { -1.0 };
    let slot = boss - forward * back + forward.perpendicular() * (side * config.lateral_stagger);
    slot.with_y(boss.y)
}
