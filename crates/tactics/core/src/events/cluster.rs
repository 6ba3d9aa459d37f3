use super::types::{CombatEvent, CombatEventKind, EventWeights};
use crate::geometry::Vec3;

/// A group of nearby live events.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatCluster {
    /// Arithmetic mean of member positions.
    pub centroid: Vec3,
    /// Sum of member kind weights.
    pub intensity: f32,
    pub count: usize,
}

struct Accumulator {
    sum: Vec3,
    cluster: CombatCluster,
}

impl Accumulator {
    fn start(event: &CombatEvent, weight: f32) -> Self {
        Self {
            sum: event.position,
            cluster: CombatCluster {
                centroid: event.position,
                intensity: weight,
                count: 1,
            },
        }
    }

    fn absorb(&mut self, event: &CombatEvent, weight: f32) {
        self.sum += event.position;
        self.cluster.count += 1;
        self.cluster.intensity += weight;
        self.cluster.centroid = self.sum * (1.0 / self.cluster.count as f32);
    }
}

/// Greedy first-fit clustering of live, non-death events.
///
/// Each event joins the first cluster whose running centroid lies within
/// `radius`; otherwise it starts a new cluster. Once `max_clusters` clusters
/// exist, events that fit none of them are dropped.
pub fn cluster_events<'a>(
    events: impl IntoIterator<Item = &'a CombatEvent>,
    now: f32,
    max_age: f32,
    radius: f32,
    max_clusters: usize,
    weights: &EventWeights,
) -> Vec<CombatCluster> {
    let radius_sq = radius * radius;
    let mut clusters: Vec<Accumulator> = Vec::new();

    for event in events {
        if event.kind == CombatEventKind::Death || !event.is_live(now, max_age) {
            continue;
        }
        let weight = weights.weight(event.kind);
        let len = clusters.len();
        match clusters
            .iter_mut()
            .find(|acc| acc.cluster.centroid.distance_squared(event.position) <= radius_sq)
        {
            Some(acc) => acc.absorb(event, weight),
            None if len < max_clusters => clusters.push(Accumulator::start(event, weight)),
            None => {}
        }
    }

    clusters.into_iter().map(|acc| acc.cluster).collect()
}

/// Live death events, in input order.
pub fn death_events<'a>(
    events: impl IntoIterator<Item = &'a CombatEvent>,
    now: f32,
    max_age: f32,
) -> Vec<CombatEvent> {
    events
        .into_iter()
        .filter(|event| event.kind == CombatEventKind::Death && event.is_live(now, max_age))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: CombatEventKind, x: f32, z: f32) -> CombatEvent {
        CombatEvent::new(kind, Vec3::flat(x, z), 0.0)
    }

    #[test]
    fn nearby_events_share_a_cluster() {
        let events = [
            event(CombatEventKind::Gunshot, 0.0, 0.0),
            event(CombatEventKind::Gunshot, 2.0, 0.0),
            event(CombatEventKind::Explosion, 100.0, 0.0),
        ];
        let clusters = cluster_events(&events, 1.0, 10.0, 5.0, 4, &EventWeights::default());

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].count, 2);
        assert_eq!(clusters[0].centroid, Vec3::flat(1.0, 0.0));
        assert_eq!(clusters[0].intensity, 2.0);
        assert_eq!(clusters[1].intensity, 3.0);
    }

    #[test]
    fn overflow_is_dropped_not_merged() {
        let events: Vec<CombatEvent> = (0..5)
            .map(|i| event(CombatEventKind::Gunshot, i as f32 * 100.0, 0.0))
            .collect();
        let clusters = cluster_events(&events, 0.0, 10.0, 5.0, 2, &EventWeights::default());

        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|cluster| cluster.count == 1));
        assert_eq!(clusters[1].centroid, Vec3::flat(100.0, 0.0));
    }

    #[test]
    fn deaths_and_stale_events_are_skipped() {
        let mut stale = event(CombatEventKind::Gunshot, 0.0, 0.0);
        stale.time = -100.0;
        let mut inactive = event(CombatEventKind::Gunshot, 0.0, 0.0);
        inactive.active = false;
        let events = [
            stale,
            inactive,
            event(CombatEventKind::Death, 0.0, 0.0),
            event(CombatEventKind::Death, 9.0, 9.0),
        ];

        let clusters = cluster_events(&events, 0.0, 10.0, 5.0, 4, &EventWeights::default());
        assert!(clusters.is_empty());

        let deaths = death_events(&events, 0.0, 10.0);
        assert_eq!(deaths.len(), 2);
        assert_eq!(deaths[1].position, Vec3::flat(9.0, 9.0));
    }
}
