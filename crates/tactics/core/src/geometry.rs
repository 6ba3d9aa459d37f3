//! World-space vector math.
//!
//! The world is y-up: `x` and `z` span the horizontal plane and `y` is the
//! vertical coordinate. Tactical geometry works on the horizontal plane and
//! carries `y` through from a reference point.

use core::fmt;
use core::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Directions shorter than this are treated as degenerate.
pub const DIRECTION_EPSILON: f32 = 1e-4;

/// A point or direction in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// A horizontal vector (`y = 0`).
    pub const fn flat(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    /// Unit horizontal vector for a heading angle in radians.
    ///
    /// Angle 0 points along `+x`, angles grow towards `+z`.
    pub fn from_heading(angle: f32) -> Self {
        Self::flat(angle.cos(), angle.sin())
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn horizontal_length(self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Distance on the horizontal plane only.
    pub fn horizontal_distance(self, other: Self) -> f32 {
        (self - other).horizontal_length()
    }

    /// Drops the vertical component.
    pub fn horizontal(self) -> Self {
        Self::flat(self.x, self.z)
    }

    /// Unit horizontal direction, or `None` for (near) zero vectors.
    pub fn normalized_horizontal(self) -> Option<Self> {
        let length = self.horizontal_length();
        if length < DIRECTION_EPSILON || !length.is_finite() {
            return None;
        }
        Some(Self::flat(self.x / length, self.z / length))
    }

    /// Horizontal perpendicular, rotated +90° (`(x, z) -> (-z, x)`).
    pub fn perpendicular(self) -> Self {
        Self::flat(-self.z, self.x)
    }

    /// Heading angle of the horizontal component, in radians.
    pub fn heading(self) -> f32 {
        self.z.atan2(self.x)
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Same horizontal position with the given vertical coordinate.
    pub fn with_y(self, y: f32) -> Self {
        Self::new(self.x, y, self.z)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

/// Facing of an agent: horizontal yaw and vertical pitch, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facing {
    pub yaw: f32,
    pub pitch: f32,
}

impl Facing {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Unit horizontal vector the agent is looking along.
    pub fn forward(self) -> Vec3 {
        Vec3::from_heading(self.yaw)
    }
}
