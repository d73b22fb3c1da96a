use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Who fired a projectile. Player shots never graze and may be spared by a bulk clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotOwner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotKind {
    Special,
    #[default]
    Ball,
    Laser,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotSize {
    Special,
    Tiny,
    #[default]
    Small,
    Big,
}

impl ShotSize {
    /// Collider radius in pixels.
    pub fn radius(self) -> f32 {
        match self {
            ShotSize::Tiny => 3.0,
            ShotSize::Small => 5.0,
            ShotSize::Special => 7.0,
            ShotSize::Big => 10.0,
        }
    }
}

/// Authored shot look and behaviour, shared by every bullet of a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotTemplate {
    pub kind: ShotKind,
    pub size: ShotSize,
    /// Sprite colour variant.
    pub palette: u8,
    pub damage: f32,
    pub penetrate: bool,
    /// Purely visual spin of the bullet sprite.
    pub spinning: bool,
    /// Heading change in degrees per second. Non-zero values curve the shot.
    pub curve: f32,
}

impl Default for ShotTemplate {
    fn default() -> Self {
        Self {
            kind: ShotKind::Ball,
            size: ShotSize::Small,
            palette: 0,
            damage: 1.0,
            penetrate: false,
            spinning: false,
            curve: 0.0,
        }
    }
}

/// Immutable data of one bullet in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    pub speed: f32,
    /// Heading at spawn, in degrees (0 = up, 180 = down).
    pub rotation: f32,
    pub kind: ShotKind,
    pub size: ShotSize,
    pub palette: u8,
    pub damage: f32,
    pub penetrate: bool,
    pub spinning: bool,
}

impl Shot {
    pub fn from_template(template: &ShotTemplate, speed: f32, rotation: f32) -> Self {
        Self {
            speed,
            rotation,
            kind: template.kind,
            size: template.size,
            palette: template.palette,
            damage: template.damage,
            penetrate: template.penetrate,
            spinning: template.spinning,
        }
    }

    pub fn colour(&self) -> Color {
        match self.palette % 6 {
            0 => Color::srgb(1.0, 0.3, 0.3),
            1 => Color::srgb(0.35, 0.55, 1.0),
            2 => Color::srgb(0.4, 1.0, 0.45),
            3 => Color::srgb(1.0, 0.9, 0.35),
            4 => Color::srgb(0.85, 0.45, 1.0),
            _ => Color::srgb(0.95, 0.95, 0.95),
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub shot: Shot,
    pub owner: ShotOwner,
    /// Weak reference used only for self-hit exclusion and attribution.
    pub source: Option<Entity>,
}

/// Lifecycle of a projectile.
///
/// `Spent` projectiles never move or collide again and are despawned in `PostUpdate`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileState {
    #[default]
    Live,
    Spent,
}

/// Local-space translation applied every fixed tick.
#[derive(Component, Debug, Clone, Copy, Deref)]
pub struct Displacement(pub Vec2);

/// Rotation applied every fixed tick, in degrees.
#[derive(Component, Debug, Clone, Copy, Default, Deref)]
pub struct Spin(pub f32);

/// One-shot graze flag. Consumed the first time the shot leaves a graze zone.
#[derive(Component, Debug, Clone, Copy)]
pub struct GrazeCharge(pub bool);

/// Counts how long a projectile has been outside the visible region.
#[derive(Component, Debug, Clone, Deref, DerefMut)]
pub struct OffscreenClock(pub Timer);

impl OffscreenClock {
    pub fn new(grace_secs: f32) -> Self {
        Self(Timer::from_seconds(grace_secs, TimerMode::Once))
    }
}

/// Decorative child sprite of a `spinning` shot. Turns on its own; the heading is untouched.
#[derive(Component, Debug, Clone, Copy)]
pub struct ShotOrnament;

/// Sensor around the player that detects near misses.
#[derive(Component, Debug, Clone, Copy)]
pub struct GrazeZone {
    pub player: Entity,
}
