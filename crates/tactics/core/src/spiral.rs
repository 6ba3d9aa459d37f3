//! Sunflower (phyllotaxis) spiral sampling for fallback candidates.
//!
//! Sample `i` of `n` sits at radius `R * sqrt((i + 0.5) / n)` and angle
//! `rotation + i * GOLDEN_ANGLE`, which spreads points evenly over the disc
//! while visiting the area near the centre first.

use rand::Rng;

use crate::geometry::Vec3;

/// `π (3 − √5)` radians.
pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Iterator over spiral samples around a centre point.
///
/// The vertical coordinate of every sample is the centre's.
#[derive(Clone, Debug)]
pub struct Spiral {
    center: Vec3,
    radius: f32,
    count: usize,
    rotation: f32,
    index: usize,
}

impl Spiral {
    pub fn new(center: Vec3, radius: f32, count: usize, rotation: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            count,
            rotation,
            index: 0,
        }
    }

    /// Spiral with a start rotation drawn from `rng`.
    pub fn random(center: Vec3, radius: f32, count: usize, rng: &mut impl Rng) -> Self {
        let rotation = rng.gen_range(0.0..core::f32::consts::TAU);
        Self::new(center, radius, count, rotation)
    }

    fn sample(&self, index: usize) -> Vec3 {
        let distance = self.radius * ((index as f32 + 0.5) / self.count as f32).sqrt();
        let angle = self.rotation + index as f32 * GOLDEN_ANGLE;
        self.center + Vec3::from_heading(angle) * distance
    }
}

impl Iterator for Spiral {
    type Item = Vec3;

    fn next(&mut self) -> Option<Vec3> {
        if self.index >= self.count {
            return None;
        }
        let sample = self.sample(self.index);
        self.index += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Spiral {}
