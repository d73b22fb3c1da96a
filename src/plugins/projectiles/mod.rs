//! Projectiles plugin: message-based producer → consumer spawning, fixed-step
//! motion, collision notification, grazing and culling.
//!
//! # Data flow
//! ```text
//!   FixedUpdate
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  (A) Producers (boss scheduler, player gun)                                │
//!│      - PatternEmitter::fire -> SpawnProjectile + PlayCue                   │
//!│                                                                            │
//!│  (B) Consumer: spawn_projectiles                                           │
//!│      - reads: SpawnProjectile                                              │
//!│      - spawns: Projectile, ProjectileState::Live, Displacement, Spin, ...  │
//!│                                                                            │
//!│  (C) advance_projectiles                                                   │
//!│      - spin, then translate by rotation * local displacement               │
//!└────────────────────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!   FixedPostUpdate
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  (D) Avian writes CollisionStart / CollisionEnd                            │
//!│                                                                            │
//!│  (E) resolve_projectile_hits -> ProjectileHit (Spent unless penetrating)   │
//!│      detect_grazes           -> Grazed (one-shot per projectile)           │
//!│                                                                            │
//!│  (F) hit consumers (boss, enemies, player)                                 │
//!│                                                                            │
//!│  (G) clear_projectiles, cull_projectiles -> Spent                          │
//!└────────────────────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!   PostUpdate: despawn_spent_projectiles
//! ```
//!
//! A projectile never leaves the `Live` state except to become `Spent`, and a
//! spent projectile neither moves nor collides. Despawning happens once per frame,
//! outside the physics step.

pub mod collision;
pub mod components;
pub mod cull;
pub mod emitter;
pub mod messages;
pub mod movement;
pub mod spawn;

use bevy::prelude::*;

use crate::common::schedule::CombatSet;

pub struct ProjectilesPlugin;

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<messages::SpawnProjectile>()
            .add_message::<messages::ProjectileHit>()
            .add_message::<messages::ClearProjectiles>()
            .add_message::<messages::Grazed>();

        app.add_systems(
            FixedUpdate,
            (
                spawn::spawn_projectiles.in_set(CombatSet::Spawn),
                (movement::advance_projectiles, movement::spin_ornaments).in_set(CombatSet::Motion),
            ),
        );

        app.add_systems(
            FixedPostUpdate,
            (
                (collision::resolve_projectile_hits, collision::detect_grazes)
                    .in_set(CombatSet::Detect),
                (cull::clear_projectiles, cull::cull_projectiles)
                    .chain()
                    .in_set(CombatSet::Cleanup),
            ),
        );

        app.add_systems(PostUpdate, cull::despawn_spent_projectiles);
    }
}
