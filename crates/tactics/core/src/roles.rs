//! Squad roles and the objective-action role table.
//!
//! The leader's current objective action decides which roles its followers
//! take. Each action maps to a fixed, ordered role pattern; followers are
//! assigned `pattern[index % pattern.len()]`.

/// Role a squad member plays around the objective.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SquadRole {
    /// No tactical role (solo agent or unassigned follower).
    #[default]
    None,
    /// Squad leader; stands on the objective.
    Leader,
    /// Holds a ring around the objective.
    Guard,
    /// Covers the objective from the side of the approach.
    Flanker,
    /// Watches the objective from range, opposite the approach.
    Overwatch,
    /// Trails the leader.
    Escort,
}

impl SquadRole {
    /// Roles whose candidate must keep a clear sightline to the objective.
    pub const fn needs_line_of_sight(self) -> bool {
        matches!(self, Self::Overwatch)
    }

    /// Role used instead of this one once a threat is known.
    ///
    /// Escorting the leader in a column is unsafe under fire; escorts fan out
    /// as flankers instead.
    pub const fn under_threat(self) -> Self {
        match self {
            Self::Escort => Self::Flanker,
            other => other,
        }
    }
}

/// What the leader is doing at its current objective.
///
/// Read from the host's quest layer; the core only uses it to pick roles.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ObjectiveAction {
    /// No specific action (role table falls back to the default pattern).
    #[default]
    Undefined,
    MoveToPosition,
    Ambush,
    HoldPosition,
    Snipe,
    PlantItem,
    ToggleSwitch,
    CloseDoors,
    RequestExtract,
}

const ESCORT_ONLY: &[SquadRole] = &[SquadRole::Escort];
const AMBUSH: &[SquadRole] = &[SquadRole::Flanker, SquadRole::Overwatch, SquadRole::Guard];
const SNIPE: &[SquadRole] = &[SquadRole::Overwatch, SquadRole::Guard, SquadRole::Guard];
const PLANT: &[SquadRole] = &[SquadRole::Guard, SquadRole::Escort, SquadRole::Flanker];
const GUARD_ONLY: &[SquadRole] = &[SquadRole::Guard];
const DEFAULT: &[SquadRole] = &[SquadRole::Guard, SquadRole::Flanker, SquadRole::Overwatch];

/// Returns the repeating role pattern for an objective action.
pub fn role_pattern(action: ObjectiveAction) -> &'static [SquadRole] {
    match action {
        ObjectiveAction::MoveToPosition => ESCORT_ONLY,
        ObjectiveAction::Ambush | ObjectiveAction::HoldPosition => AMBUSH,
        ObjectiveAction::Snipe => SNIPE,
        ObjectiveAction::PlantItem => PLANT,
        ObjectiveAction::ToggleSwitch | ObjectiveAction::CloseDoors => GUARD_ONLY,
        ObjectiveAction::Undefined | ObjectiveAction::RequestExtract => DEFAULT,
    }
}

/// Assigns roles to `follower_count` followers.
///
/// # Arguments
///
/// * `action` - The leader's current objective action
/// * `follower_count` - Number of followers to assign
/// * `use_action_roles` - When `false`, the default pattern is used for every action
///
/// # Returns
///
/// One role per follower, in follower order. Deterministic for equal inputs.
pub fn assign_roles(
    action: ObjectiveAction,
    follower_count: usize,
    use_action_roles: bool,
) -> Vec<SquadRole> {
    let pattern = if use_action_roles {
        role_pattern(action)
    } else {
        DEFAULT
    };
    (0..follower_count)
        .map(|index| pattern[index % pattern.len()])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn ambush_cycles_flanker_overwatch_guard() {
        let roles = assign_roles(ObjectiveAction::Ambush, 5, true);
        assert_eq!(
            roles,
            vec![
                SquadRole::Flanker,
                SquadRole::Overwatch,
                SquadRole::Guard,
                SquadRole::Flanker,
                SquadRole::Overwatch
            ]
        );
    }

    #[test]
    fn action_roles_can_be_disabled() {
        let roles = assign_roles(ObjectiveAction::MoveToPosition, 3, false);
        assert_eq!(
            roles,
            vec![SquadRole::Guard, SquadRole::Flanker, SquadRole::Overwatch]
        );
    }

    #[test]
    fn every_action_is_deterministic_and_in_vocabulary() {
        let vocabulary: Vec<SquadRole> = SquadRole::iter().collect();
        for action in ObjectiveAction::iter() {
            for count in 0..8 {
                let first = assign_roles(action, count, true);
                let second = assign_roles(action, count, true);
                assert_eq!(first, second);
                assert_eq!(first.len(), count);
                assert!(first.iter().all(|role| vocabulary.contains(role)));
                assert!(
                    first
                        .iter()
                        .all(|role| !matches!(role, SquadRole::None | SquadRole::Leader))
                );
            }
        }
    }

    #[test]
    fn escorts_become_flankers_under_threat() {
        assert_eq!(SquadRole::Escort.under_threat(), SquadRole::Flanker);
        assert_eq!(SquadRole::Guard.under_threat(), SquadRole::Guard);
    }

    #[test]
    fn actions_parse_case_insensitively() {
        assert_eq!(
            "plant_item".parse::<ObjectiveAction>(),
            Ok(ObjectiveAction::PlantItem)
        );
        assert_eq!("SNIPE".parse::<ObjectiveAction>(), Ok(ObjectiveAction::Snipe));
    }
}
