//! Fixed-step ordering shared by every gameplay plugin.
//!
//! ```text
//! FixedUpdate:      Emit -> Spawn -> Motion
//! FixedPostUpdate:  (physics, collision events) -> Detect -> Resolve -> Cleanup
//! PostUpdate:       despawn spent / pending entities
//! ```
//!
//! Anything a hit triggers in `Resolve` is visible to the next tick's `Emit`.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::state::GameState;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Schedulers and guns write spawn requests.
    Emit,
    /// Spawn requests become entities.
    Spawn,
    /// Projectiles, items and the player move.
    Motion,
    /// Contacts become hits, grazes and pickups.
    Detect,
    /// Hits mutate health, player state and boss schedulers.
    Resolve,
    /// Bulk clears and culling.
    Cleanup,
}

pub fn configure(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        (CombatSet::Emit, CombatSet::Spawn, CombatSet::Motion)
            .chain()
            .run_if(in_state(GameState::InGame)),
    );
    app.configure_sets(
        FixedPostUpdate,
        (CombatSet::Detect, CombatSet::Resolve, CombatSet::Cleanup)
            .chain()
            .after(CollisionEventSystems)
            .run_if(in_state(GameState::InGame)),
    );
}
