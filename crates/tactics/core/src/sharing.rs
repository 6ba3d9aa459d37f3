//! Objective sharing: who receives tactical data and how noisy it is.
//!
//! Followers are ranked by distance to the leader. The nearest trusted ones
//! in range get exact data ([`SharingTier::Direct`]); anyone in range of a
//! direct follower hears it second hand ([`SharingTier::Relayed`]) with
//! Gaussian noise; the rest get nothing. Relaying is a single hop.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::config::SquadStrategyConfig;
use crate::geometry::Vec3;
use crate::personality::clamp_coordination;

bitflags::bitflags! {
    /// Equipment that changes how an agent communicates.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u8 {
        /// Advanced radio; extends the communication range between two carriers.
        const EARPIECE = 1 << 0;
    }
}

/// How a follower receives the squad's tactical data.
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
pub enum SharingTier {
    /// Out of every communication path.
    #[default]
    None,
    /// Relayed through a direct follower, with noise.
    Relayed,
    /// Exact data from the leader.
    Direct,
}

/// Position and equipment of one party.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SharingMember {
    pub position: Vec3,
    pub capabilities: Capabilities,
}

impl SharingMember {
    pub fn new(position: Vec3, capabilities: Capabilities) -> Self {
        Self {
            position,
            capabilities,
        }
    }
}

/// Tiering inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SharingParams {
    pub trusted_count: usize,
    pub range_earpiece: f32,
    pub range_no_earpiece: f32,
    /// When `false` ranges are ignored and ranking alone decides.
    pub range_gating: bool,
}

impl SharingParams {
    pub fn from_config(config: &SquadStrategyConfig) -> Self {
        Self {
            trusted_count: config.trusted_follower_count,
            range_earpiece: config.comm_range_earpiece,
            range_no_earpiece: config.comm_range_no_earpiece,
            range_gating: config.comm_range_gate,
        }
    }

    /// Communication range between two parties.
    pub fn pair_range(&self, a: Capabilities, b: Capabilities) -> f32 {
        if a.contains(Capabilities::EARPIECE) && b.contains(Capabilities::EARPIECE) {
            self.range_earpiece
        } else {
            self.range_no_earpiece
        }
    }

    /// `true` if the two parties can talk (always `true` without gating).
    pub fn in_range(&self, a: &SharingMember, b: &SharingMember) -> bool {
        if !self.range_gating {
            return true;
        }
        let range = self.pair_range(a.capabilities, b.capabilities);
        a.position.distance_squared(b.position) <= range * range
    }
}

/// Computes one tier per follower, in follower order.
pub fn compute_tiers(
    leader: &SharingMember,
    followers: &[SharingMember],
    params: &SharingParams,
) -> Vec<SharingTier> {
    let mut tiers = vec![SharingTier::None; followers.len()];

    let mut ranked: Vec<(usize, f32)> = followers
        .iter()
        .enumerate()
        .map(|(index, follower)| (index, follower.position.distance_squared(leader.position)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

    let mut direct = Vec::with_capacity(params.trusted_count.min(followers.len()));
    for &(index, _) in &ranked {
        if direct.len() >= params.trusted_count {
            break;
        }
        if params.in_range(leader, &followers[index]) {
            tiers[index] = SharingTier::Direct;
            direct.push(index);
        }
    }

    for (index, follower) in followers.iter().enumerate() {
        if tiers[index] != SharingTier::None {
            continue;
        }
        if direct
            .iter()
            .any(|&relay| params.in_range(&followers[relay], follower))
        {
            tiers[index] = SharingTier::Relayed;
        }
    }

    tiers
}

/// Standard deviation of relay noise: `noise_base × (6 − c) / 5`.
pub fn noise_sigma(noise_base: f32, coordination: u8) -> f32 {
    let c = f32::from(clamp_coordination(coordination));
    noise_base.max(0.0) * (6.0 - c) / 5.0
}

/// What a follower of the given tier receives for `position`.
///
/// Direct followers get it exactly, relayed ones get the horizontal
/// coordinates perturbed by independent Gaussian noise, and tier `None`
/// gets nothing. Relayed followers always consume two normal draws, so the
/// stream advances identically for any noise level.
pub fn degrade(
    position: Vec3,
    tier: SharingTier,
    noise_base: f32,
    coordination: u8,
    rng: &mut impl Rng,
) -> Option<Vec3> {
    match tier {
        SharingTier::Direct => Some(position),
        SharingTier::Relayed => {
            let sigma = noise_sigma(noise_base, coordination);
            let dx: f32 = rng.sample(StandardNormal);
            let dz: f32 = rng.sample(StandardNormal);
            Some(Vec3::new(
                position.x + dx * sigma,
                position.y,
                position.z + dz * sigma,
            ))
        }
        SharingTier::None => None,
    }
}

/// Chance in percent that a squad of coordination `c` shares with a follower.
pub fn sharing_chance(coordination: u8) -> u32 {
    25 + 15 * u32::from(clamp_coordination(coordination))
}

/// Rolls the personality-based sharing check for one follower.
pub fn roll_sharing(coordination: u8, rng: &mut impl Rng) -> bool {
    rng.gen_range(0..100) < sharing_chance(coordination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    fn member(x: f32, earpiece: bool) -> SharingMember {
        let capabilities = if earpiece {
            Capabilities::EARPIECE
        } else {
            Capabilities::empty()
        };
        SharingMember::new(Vec3::flat(x, 0.0), capabilities)
    }

    fn params(trusted_count: usize) -> SharingParams {
        SharingParams {
            trusted_count,
            range_earpiece: 100.0,
            range_no_earpiece: 35.0,
            range_gating: true,
        }
    }

    #[test]
    fn follower_out_of_range_gets_nothing() {
        let leader = member(0.0, false);
        let tiers = compute_tiers(&leader, &[member(50.0, false)], &params(2));
        assert_eq!(tiers, vec![SharingTier::None]);
    }

    #[test]
    fn earpiece_needs_both_parties() {
        let tiers = compute_tiers(&member(0.0, true), &[member(50.0, true)], &params(2));
        assert_eq!(tiers, vec![SharingTier::Direct]);
        let tiers = compute_tiers(&member(0.0, false), &[member(50.0, true)], &params(2));
        assert_eq!(tiers, vec![SharingTier::None]);
    }

    #[test]
    fn relay_is_one_hop() {
        let leader = member(0.0, false);
        let followers = [
            member(60.0, false),
            member(10.0, false),
            member(40.0, false),
            member(90.0, false),
        ];
        let tiers = compute_tiers(&leader, &followers, &params(1));
        assert_eq!(
            tiers,
            vec![
                SharingTier::None,
                SharingTier::Direct,
                SharingTier::Relayed,
                SharingTier::None,
            ]
        );
    }

    #[test]
    fn trusted_count_caps_direct_followers() {
        let leader = member(0.0, false);
        let followers = [member(5.0, false), member(10.0, false), member(15.0, false)];
        let tiers = compute_tiers(&leader, &followers, &params(2));
        assert_eq!(
            tiers,
            vec![SharingTier::Direct, SharingTier::Direct, SharingTier::Relayed]
        );
        let tiers = compute_tiers(&leader, &followers, &params(0));
        assert!(tiers.iter().all(|tier| *tier == SharingTier::None));
        let tiers = compute_tiers(&leader, &followers, &params(usize::MAX));
        assert!(tiers.iter().all(|tier| *tier == SharingTier::Direct));
    }

    #[test]
    fn without_gating_ranking_alone_decides() {
        let leader = member(0.0, false);
        let followers = [member(500.0, false), member(9_000.0, false)];
        let mut params = params(1);
        params.range_gating = false;
        let tiers = compute_tiers(&leader, &followers, &params);
        assert_eq!(tiers, vec![SharingTier::Direct, SharingTier::Relayed]);
    }

    #[test]
    fn more_trust_never_reduces_reach() {
        let leader = member(0.0, false);
        let followers: Vec<SharingMember> = [3.0, 70.0, 30.0, 100.0, 64.0, 20.0, 130.0]
            .iter()
            .map(|&x| member(x, false))
            .collect();
        let mut previous = 0;
        for trusted in 0..=followers.len() {
            let reached = compute_tiers(&leader, &followers, &params(trusted))
                .into_iter()
                .filter(|tier| *tier >= SharingTier::Relayed)
                .count();
            assert!(reached >= previous, "trusted {trusted}: {reached} < {previous}");
            previous = reached;
        }
    }

    #[test]
    fn degrade_by_tier() {
        let position = Vec3::new(10.0, 2.0, 10.0);
        let mut rng = seeded(3);
        assert_eq!(
            degrade(position, SharingTier::Direct, 4.0, 1, &mut rng),
            Some(position)
        );
        assert_eq!(degrade(position, SharingTier::None, 4.0, 1, &mut rng), None);

        let relayed = degrade(position, SharingTier::Relayed, 4.0, 1, &mut rng);
        let relayed = relayed.expect("relayed followers receive a position");
        assert_eq!(relayed.y, 2.0);
        assert_ne!(relayed, position);
    }

    #[test]
    fn noise_shrinks_with_coordination() {
        let position = Vec3::ZERO;
        let mut previous = f32::INFINITY;
        for coordination in 1..=5 {
            let mut rng = seeded(11);
            let offset = degrade(position, SharingTier::Relayed, 5.0, coordination, &mut rng)
                .map(|p| p.horizontal_length())
                .unwrap_or_default();
            assert!(offset <= previous, "coordination {coordination}");
            previous = offset;
        }
        assert_eq!(noise_sigma(5.0, 1), 5.0);
        assert_eq!(noise_sigma(5.0, 0), 5.0);
        assert_eq!(noise_sigma(5.0, 5), 1.0);
    }

    #[test]
    fn sharing_chance_grows_with_coordination() {
        assert_eq!(sharing_chance(1), 40);
        assert_eq!(sharing_chance(5), 100);
        assert_eq!(sharing_chance(200), 100);

        let mut rng = seeded(5);
        assert!((0..64).all(|_| roll_sharing(5, &mut rng)));

        let mut rng = seeded(5);
        let wins = (0..1_000).filter(|_| roll_sharing(1, &mut rng)).count();
        assert!((300..500).contains(&wins), "{wins} of 1000 rolls won");
    }
}
