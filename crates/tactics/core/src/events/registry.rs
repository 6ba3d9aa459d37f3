use super::types::{CombatEvent, CombatEventKind, EventWeights};
use crate::geometry::Vec3;

/// Capacity used when a non-positive capacity is requested.
pub const DEFAULT_CAPACITY: usize = 256;
/// Largest capacity a registry accepts; larger requests are clamped.
pub const MAX_CAPACITY: usize = 65_536;

/// Fixed-capacity ring buffer of combat events.
///
/// Once full, every [`record`](Self::record) overwrites the oldest slot.
/// Expired events are only marked inactive and keep their slot until they are
/// physically overwritten.
#[derive(Clone, Debug)]
pub struct CombatEventRegistry {
    slots: Vec<CombatEvent>,
    capacity: usize,
    /// Slot the next event is written to once the buffer is full.
    next: usize,
    weights: EventWeights,
}

impl CombatEventRegistry {
    pub fn new(capacity: usize) -> Self {
        Self::with_weights(capacity, EventWeights::default())
    }

    pub fn with_weights(capacity: usize, weights: EventWeights) -> Self {
        let capacity = Self::effective_capacity(capacity);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            next: 0,
            weights,
        }
    }

    fn effective_capacity(requested: usize) -> usize {
        if requested == 0 {
            DEFAULT_CAPACITY
        } else {
            requested.min(MAX_CAPACITY)
        }
    }

    /// Drops every event and resizes the buffer.
    pub fn reinitialize(&mut self, capacity: usize) {
        self.capacity = Self::effective_capacity(capacity);
        self.slots = Vec::with_capacity(self.capacity);
        self.next = 0;
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.next = 0;
    }

    pub fn record(&mut self, event: CombatEvent) {
        if self.slots.len() < self.capacity {
            self.slots.push(event);
        } else {
            self.slots[self.next] = event;
            self.next = (self.next + 1) % self.capacity;
        }
    }

    /// Number of filled slots, including inactive events.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn weights(&self) -> &EventWeights {
        &self.weights
    }

    pub fn set_weights(&mut self, weights: EventWeights) {
        self.weights = weights;
    }

    /// Every stored event, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        let (newer, older) = self.slots.split_at(self.next);
        older.iter().chain(newer.iter())
    }

    /// Closest live event within `radius` of `point`.
    ///
    /// Ties keep the older event.
    pub fn nearest(&self, point: Vec3, radius: f32, now: f32, max_age: f32) -> Option<CombatEvent> {
        let radius_sq = radius * radius;
        let mut best: Option<(f32, CombatEvent)> = None;
        for event in self.iter().filter(|event| event.is_live(now, max_age)) {
            let distance_sq = event.position.distance_squared(point);
            if distance_sq > radius_sq {
                continue;
            }
            match best {
                Some((best_sq, _)) if distance_sq >= best_sq => {}
                _ => best = Some((distance_sq, *event)),
            }
        }
        best.map(|(_, event)| event)
    }

    /// Sum of kind weights of live events within `radius` and `window` seconds.
    pub fn intensity(&self, point: Vec3, radius: f32, now: f32, window: f32) -> f32 {
        let radius_sq = radius * radius;
        self.iter()
            .filter(|event| event.is_live(now, window))
            .filter(|event| event.position.distance_squared(point) <= radius_sq)
            .map(|event| self.weights.weight(event.kind))
            .sum()
    }

    /// `true` if a live boss event lies within `radius` and `decay` seconds.
    pub fn in_boss_zone(&self, point: Vec3, radius: f32, now: f32, decay: f32) -> bool {
        let radius_sq = radius * radius;
        self.iter().any(|event| {
            event.boss
                && event.is_live(now, decay)
                && event.position.distance_squared(point) <= radius_sq
        })
    }

    /// Marks events older than `max_age` inactive.
    ///
    /// # Returns
    ///
    /// The number of events that were deactivated by this sweep.
    pub fn expire(&mut self, now: f32, max_age: f32) -> usize {
        let mut expired = 0;
        for event in self.slots.iter_mut() {
            if event.active && event.age(now) > max_age {
                event.active = false;
                expired += 1;
            }
        }
        expired
    }

    /// Number of live events of a given kind.
    pub fn count_live(&self, kind: CombatEventKind, now: f32, max_age: f32) -> usize {
        self.iter()
            .filter(|event| event.kind == kind && event.is_live(now, max_age))
            .count()
    }
}

impl Default for CombatEventRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gunshot(x: f32, time: f32) -> CombatEvent {
        CombatEvent::new(CombatEventKind::Gunshot, Vec3::flat(x, 0.0), time)
    }

    #[test]
    fn oversized_capacity_is_clamped() {
        let mut registry = CombatEventRegistry::new(usize::MAX);
        assert_eq!(registry.capacity(), MAX_CAPACITY);
        registry.reinitialize(MAX_CAPACITY + 1);
        assert_eq!(registry.capacity(), MAX_CAPACITY);
        assert!(registry.is_empty());
    }

    #[test]
    fn zero_capacity_uses_default() {
        let registry = CombatEventRegistry::new(0);
        assert_eq!(registry.capacity(), DEFAULT_CAPACITY);

        let mut registry = CombatEventRegistry::new(8);
        registry.reinitialize(0);
        assert_eq!(registry.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn ring_buffer_keeps_only_the_latest_events() {
        let mut registry = CombatEventRegistry::new(4);
        for i in 0..10 {
            registry.record(gunshot(i as f32 * 10.0, i as f32));
        }

        assert_eq!(registry.len(), 4);
        let now = 9.0;
        for i in 0..6 {
            let point = Vec3::flat(i as f32 * 10.0, 0.0);
            assert!(registry.nearest(point, 1.0, now, 100.0).is_none(), "event {i}");
        }
        for i in 6..10 {
            let point = Vec3::flat(i as f32 * 10.0, 0.0);
            let found = registry.nearest(point, 1.0, now, 100.0);
            assert_eq!(found.map(|event| event.time), Some(i as f32));
        }

        let times: Vec<f32> = registry.iter().map(|event| event.time).collect();
        assert_eq!(times, vec![6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn overwriting_a_single_extra_event_evicts_the_first() {
        let mut registry = CombatEventRegistry::new(3);
        for i in 0..4 {
            registry.record(gunshot(i as f32 * 50.0, 0.0));
        }
        assert!(registry.nearest(Vec3::ZERO, 5.0, 0.0, 10.0).is_none());
        for i in 1..4 {
            let point = Vec3::flat(i as f32 * 50.0, 0.0);
            assert!(registry.nearest(point, 5.0, 0.0, 10.0).is_some());
        }
    }

    #[test]
    fn nearest_respects_radius_and_age() {
        let mut registry = CombatEventRegistry::new(8);
        registry.record(gunshot(10.0, 0.0));
        registry.record(gunshot(4.0, 0.0));
        registry.record(gunshot(2.0, -50.0));

        let found = registry.nearest(Vec3::ZERO, 20.0, 1.0, 10.0);
        assert_eq!(found.map(|event| event.position.x), Some(4.0));
        assert!(registry.nearest(Vec3::ZERO, 3.0, 1.0, 10.0).is_none());
        assert!(registry.nearest(Vec3::ZERO, 20.0, 100.0, 10.0).is_none());
    }

    #[test]
    fn intensity_weights_gunshots_and_explosions() {
        let mut registry = CombatEventRegistry::new(8);
        registry.record(gunshot(1.0, 0.0));
        registry.record(gunshot(2.0, 0.0));
        registry.record(CombatEvent::new(
            CombatEventKind::Explosion,
            Vec3::flat(3.0, 0.0),
            0.0,
        ));
        registry.record(CombatEvent::new(
            CombatEventKind::Death,
            Vec3::flat(3.0, 0.0),
            0.0,
        ));
        registry.record(gunshot(500.0, 0.0));

        assert_eq!(registry.intensity(Vec3::ZERO, 10.0, 1.0, 5.0), 5.0);
        assert_eq!(registry.intensity(Vec3::ZERO, 10.0, 10.0, 5.0), 0.0);
    }

    #[test]
    fn boss_zone_needs_a_recent_boss_event() {
        let mut registry = CombatEventRegistry::new(8);
        registry.record(gunshot(1.0, 0.0));
        assert!(!registry.in_boss_zone(Vec3::ZERO, 10.0, 0.0, 30.0));

        registry.record(gunshot(2.0, 0.0).with_boss(true));
        assert!(registry.in_boss_zone(Vec3::ZERO, 10.0, 0.0, 30.0));
        assert!(!registry.in_boss_zone(Vec3::ZERO, 1.0, 0.0, 30.0));
        assert!(!registry.in_boss_zone(Vec3::ZERO, 10.0, 31.0, 30.0));
    }

    #[test]
    fn expire_marks_inactive_without_removing() {
        let mut registry = CombatEventRegistry::new(8);
        registry.record(gunshot(1.0, 0.0));
        registry.record(gunshot(2.0, 8.0));

        assert_eq!(registry.expire(10.0, 5.0), 1);
        assert_eq!(registry.expire(10.0, 5.0), 0);
        assert_eq!(registry.len(), 2);
        // Expired events stay invisible even with a generous age limit.
        assert!(registry.nearest(Vec3::flat(1.0, 0.0), 0.5, 10.0, 1_000.0).is_none());
        assert_eq!(registry.count_live(CombatEventKind::Gunshot, 10.0, 1_000.0), 1);
    }

    #[test]
    fn empty_registry_finds_nothing() {
        let mut registry = CombatEventRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.nearest(Vec3::ZERO, 100.0, 0.0, 100.0).is_none());
        assert_eq!(registry.intensity(Vec3::ZERO, 100.0, 0.0, 100.0), 0.0);

        registry.record(gunshot(0.0, 0.0));
        registry.clear();
        assert_eq!(registry.len(), 0);
    }
}
