use crate::geometry::Vec3;

/// Type tag of a combat event.
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
pub enum CombatEventKind {
    #[default]
    None,
    Gunshot,
    Explosion,
    Airdrop,
    Death,
}

/// A timestamped battlefield event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatEvent {
    pub position: Vec3,
    /// Simulation time in seconds.
    pub time: f32,
    /// Loudness or blast radius, as reported by the host.
    pub power: f32,
    pub kind: CombatEventKind,
    /// Raised by a boss (squad leader) or aimed at one.
    pub boss: bool,
    /// Cleared by the expiry sweep; the slot stays until overwritten.
    pub active: bool,
}

impl CombatEvent {
    /// Creates an active, non-boss event.
    pub fn new(kind: CombatEventKind, position: Vec3, time: f32) -> Self {
        Self {
            position,
            time,
            power: 0.0,
            kind,
            boss: false,
            active: true,
        }
    }

    pub fn with_power(mut self, power: f32) -> Self {
        self.power = power;
        self
    }

    pub fn with_boss(mut self, boss: bool) -> Self {
        self.boss = boss;
        self
    }

    #[inline]
    pub fn age(&self, now: f32) -> f32 {
        now - self.time
    }

    /// Active and no older than `max_age`.
    #[inline]
    pub fn is_live(&self, now: f32, max_age: f32) -> bool {
        self.active && self.age(now) <= max_age
    }
}

/// Per-kind intensity weights.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EventWeights {
    pub gunshot: f32,
    pub explosion: f32,
    pub airdrop: f32,
    pub death: f32,
}

impl EventWeights {
    pub fn weight(&self, kind: CombatEventKind) -> f32 {
        match kind {
            CombatEventKind::Gunshot => self.gunshot,
            CombatEventKind::Explosion => self.explosion,
            CombatEventKind::Airdrop => self.airdrop,
            CombatEventKind::Death => self.death,
            CombatEventKind::None => 0.0,
        }
    }
}

impl Default for EventWeights {
    fn default() -> Self {
        Self {
            gunshot: 1.0,
            explosion: 3.0,
            airdrop: 0.0,
            death: 0.0,
        }
    }
}
