use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::components::{GrazeCharge, GrazeZone, Projectile, ProjectileState, ShotOwner};
use super::messages::{Grazed, ProjectileHit};
use crate::common::combat::{Combatant, HitPayload};

#[derive(Clone, Copy, Debug)]
struct CollisionSide {
    collider: Entity,
    body: Option<Entity>,
}

impl CollisionSide {
    /// Entity that owns gameplay state: the rigid body if the collider has one.
    #[inline]
    fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
fn sides(
    collider1: Entity,
    collider2: Entity,
    body1: Option<Entity>,
    body2: Option<Entity>,
) -> (CollisionSide, CollisionSide) {
    (
        CollisionSide {
            collider: collider1,
            body: body1,
        },
        CollisionSide {
            collider: collider2,
            body: body2,
        },
    )
}

/// Split a contact into (projectile side, other side). `None` unless exactly one side is a projectile.
#[inline]
fn projectile_and_other(
    a: CollisionSide,
    b: CollisionSide,
    is_projectile: impl Fn(Entity) -> bool,
) -> Option<(CollisionSide, CollisionSide)> {
    match (is_projectile(a.collider), is_projectile(b.collider)) {
        (true, false) => Some((a, b)),
        (false, true) => Some((b, a)),
        _ => None,
    }
}

/// Turn projectile contacts into `ProjectileHit` notifications.
///
/// A non-penetrating projectile is marked `Spent` by its first valid hit, so it
/// resolves at most one hit. A penetrating projectile notifies every distinct
/// target it touches and stays live. Contacts with the source, with graze zones and
/// with non-combatants are ignored.
pub fn resolve_projectile_hits(
    mut started: MessageReader<CollisionStart>,
    q_is_projectile: Query<(), With<Projectile>>,
    mut q_projectiles: Query<(&Projectile, &mut ProjectileState)>,
    q_combatants: Query<(), With<Combatant>>,
    q_graze: Query<(), With<GrazeZone>>,
    mut hits: MessageWriter<ProjectileHit>,
    // Per-frame dedupe of (projectile, target) pairs
    mut seen: Local<HashSet<(Entity, Entity)>>,
) {
    seen.clear();

    for ev in started.read() {
        let (a, b) = sides(ev.collider1, ev.collider2, ev.body1, ev.body2);
        let Some((shot_side, other_side)) =
            projectile_and_other(a, b, |e| q_is_projectile.contains(e))
        else {
            continue;
        };

        if q_graze.contains(other_side.collider) {
            continue;
        }

        let projectile = shot_side.collider;
        let target = other_side.gameplay_owner();
        if !q_combatants.contains(target) {
            continue;
        }
        if !seen.insert((projectile, target)) {
            continue;
        }

        let Ok((data, mut state)) = q_projectiles.get_mut(projectile) else {
            continue;
        };
        if *state != ProjectileState::Live || data.source == Some(target) {
            continue;
        }

        hits.write(ProjectileHit {
            target,
            projectile,
            payload: HitPayload {
                damage: data.shot.damage,
                source: data.source,
                shot: data.shot.clone(),
            },
        });

        if !data.shot.penetrate {
            *state = ProjectileState::Spent;
        }
    }
}

/// Count a graze when an enemy projectile leaves a player's graze zone.
///
/// The charge is one-shot: a projectile grazes at most once in its lifetime.
pub fn detect_grazes(
    mut ended: MessageReader<CollisionEnd>,
    q_zones: Query<&GrazeZone>,
    mut q_projectiles: Query<(&Projectile, &ProjectileState, &mut GrazeCharge)>,
    mut grazed: MessageWriter<Grazed>,
) {
    for ev in ended.read() {
        let (a, b) = sides(ev.collider1, ev.collider2, ev.body1, ev.body2);
        let Some((shot_side, other_side)) =
            projectile_and_other(a, b, |e| q_projectiles.contains(e))
        else {
            continue;
        };
        let Ok(zone) = q_zones.get(other_side.collider) else {
            continue;
        };
        let Ok((data, state, mut charge)) = q_projectiles.get_mut(shot_side.collider) else {
            continue;
        };
        if data.owner == ShotOwner::Player || *state != ProjectileState::Live || !charge.0 {
            continue;
        }

        charge.0 = false;
        grazed.write(Grazed {
            player: zone.player,
            projectile: shot_side.collider,
        });
    }
}
