//! Projectile messages.
//!
//! Producers (emitters, the player gun) only enqueue intent; `spawn_projectiles`
//! is the single consumer that turns requests into entities.

use bevy::prelude::*;

use super::components::{Shot, ShotOwner};
use crate::common::combat::HitPayload;

/// Request to create one projectile.
#[derive(Message, Clone, Debug)]
pub struct SpawnProjectile {
    pub owner: ShotOwner,
    pub source: Option<Entity>,
    pub position: Vec2,
    pub shot: Shot,
    /// Local-space translation per fixed tick, rotated by the projectile's heading.
    pub displacement: Vec2,
    /// Heading change per fixed tick, in degrees.
    pub spin: f32,
}

/// A live projectile connected with a combatant other than its source.
#[derive(Message, Clone, Debug)]
pub struct ProjectileHit {
    pub target: Entity,
    pub projectile: Entity,
    pub payload: HitPayload,
}

/// Destroy every live projectile in one step.
///
/// Several requests in the same tick merge: a projectile is destroyed (and
/// scored) at most once.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct ClearProjectiles {
    pub include_player_owned: bool,
    /// Award the cleared-shot score for every enemy projectile destroyed.
    pub award_score: bool,
}

/// An enemy projectile passed through a player's graze zone.
#[derive(Message, Clone, Copy, Debug)]
pub struct Grazed {
    pub player: Entity,
    pub projectile: Entity,
}
