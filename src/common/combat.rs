//! Shared combat vocabulary: who can be hit, what a hit carries, and how it is delivered.

use bevy::prelude::*;

use crate::plugins::projectiles::components::Shot;

/// Marks an entity that projectiles recognise as a damageable target.
///
/// A boss is a `Combatant::Boss` *with* a `BossCombat` component; there is no
/// separate boss entity type.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combatant {
    Player,
    /// Plain health: any hit that takes it to zero kills.
    Enemy,
    Boss,
}

/// Data delivered to a target when a projectile connects.
#[derive(Debug, Clone, PartialEq)]
pub struct HitPayload {
    pub damage: f32,
    pub source: Option<Entity>,
    pub shot: Shot,
}

/// Typed hit delivery. Each damageable variant decides what a hit means to it.
pub trait OnHit {
    type Outcome;

    fn on_hit(&mut self, hit: &HitPayload) -> Self::Outcome;
}

/// Marker: entity should be removed from the world.
///
/// Fixed-step systems only mark; despawning happens once per frame in `PostUpdate`.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

/// Despawn everything marked for removal.
pub fn despawn_marked(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
