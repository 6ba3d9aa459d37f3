//! Squad coordination level and the personality derived from it.

/// Lowest coordination level.
pub const MIN_COORDINATION: u8 = 1;
/// Highest coordination level.
pub const MAX_COORDINATION: u8 = 5;

/// Clamps a coordination level into `1..=5`.
pub fn clamp_coordination(level: u8) -> u8 {
    level.clamp(MIN_COORDINATION, MAX_COORDINATION)
}

/// Personality classification of a squad, one per coordination level.
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
pub enum SquadPersonality {
    Disorganized,
    Loose,
    #[default]
    Standard,
    Disciplined,
    Elite,
}

impl SquadPersonality {
    /// Derives the personality from a coordination level (clamped to `1..=5`).
    pub fn from_coordination(level: u8) -> Self {
        match clamp_coordination(level) {
            1 => Self::Disorganized,
            2 => Self::Loose,
            3 => Self::Standard,
            4 => Self::Disciplined,
            _ => Self::Elite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordination_maps_and_clamps() {
        assert_eq!(SquadPersonality::from_coordination(0), SquadPersonality::Disorganized);
        assert_eq!(SquadPersonality::from_coordination(3), SquadPersonality::Standard);
        assert_eq!(SquadPersonality::from_coordination(9), SquadPersonality::Elite);
        assert!(SquadPersonality::Loose < SquadPersonality::Disciplined);
    }
}
