use crate::geometry::Vec3;

/// Navigability check that may snap a candidate onto valid ground.
pub trait PositionValidator {
    /// Returns the (possibly adjusted) position, or `None` to reject it.
    fn validate(&self, candidate: Vec3) -> Option<Vec3>;
}

/// Pathfinding feasibility check.
pub trait ReachabilityOracle {
    /// `true` if `to` can be reached from `from` along a path no longer than
    /// `max_path_length`.
    fn is_reachable(&self, from: Vec3, to: Vec3, max_path_length: f32) -> bool;
}

/// Visibility check.
pub trait SightlineOracle {
    fn has_line_of_sight(&self, from: Vec3, to: Vec3) -> bool;
}

/// Precomputed cover points around an objective.
pub trait CoverSource {
    /// Returns up to `max_count` points within `radius` of `objective`.
    fn supply(&self, objective: Vec3, radius: f32, max_count: usize) -> Vec<Vec3>;
}

impl<F> PositionValidator for F
where
    F: Fn(Vec3) -> Option<Vec3>,
{
    fn validate(&self, candidate: Vec3) -> Option<Vec3> {
        self(candidate)
    }
}

impl<F> ReachabilityOracle for F
where
    F: Fn(Vec3, Vec3, f32) -> bool,
{
    fn is_reachable(&self, from: Vec3, to: Vec3, max_path_length: f32) -> bool {
        self(from, to, max_path_length)
    }
}

impl<F> SightlineOracle for F
where
    F: Fn(Vec3, Vec3) -> bool,
{
    fn has_line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        self(from, to)
    }
}

impl<F> CoverSource for F
where
    F: Fn(Vec3, f32, usize) -> Vec<Vec3>,
{
    fn supply(&self, objective: Vec3, radius: f32, max_count: usize) -> Vec<Vec3> {
        self(objective, radius, max_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TacticalEnv;

    #[test]
    fn closures_act_as_oracles() {
        let validator = |p: Vec3| (p.x >= 0.0).then_some(p.with_y(0.0));
        let reach = |_: Vec3, to: Vec3, max: f32| to.length() <= max;
        let env = TacticalEnv::empty()
            .with_validator(&validator)
            .with_reachability(&reach);

        let validator = env.validator().expect("validator installed");
        assert_eq!(
            validator.validate(Vec3::new(1.0, 3.0, 0.0)),
            Some(Vec3::flat(1.0, 0.0))
        );
        assert_eq!(validator.validate(Vec3::flat(-1.0, 0.0)), None);

        let reach = env.reachability().expect("reachability installed");
        assert!(reach.is_reachable(Vec3::ZERO, Vec3::flat(3.0, 4.0), 5.0));
        assert!(env.sightline().is_none());
        assert!(env.cover().is_none());
    }
}
