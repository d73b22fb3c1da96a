//! Projectile removal: off-screen culling, bulk clears, and the end-of-frame despawn.

use bevy::prelude::*;

use super::components::{OffscreenClock, Projectile, ProjectileState, ShotOwner};
use super::messages::ClearProjectiles;
use crate::common::tunables::Tunables;
use crate::plugins::player::messages::AwardScore;

/// Spend projectiles that left the playfield.
///
/// Outside the cull region a projectile is spent at once. Outside the visible
/// region it gets a short grace period, which restarts if it comes back into view.
pub fn cull_projectiles(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut q: Query<(&Transform, &mut ProjectileState, &mut OffscreenClock), With<Projectile>>,
) {
    let view = tunables.view_rect();
    let cull = tunables.cull_rect();

    for (tf, mut state, mut clock) in &mut q {
        if *state != ProjectileState::Live {
            continue;
        }
        let pos = tf.translation.truncate();

        if !cull.contains(pos) {
            debug!("projectile culled at {pos}");
            *state = ProjectileState::Spent;
        } else if !view.contains(pos) {
            clock.tick(time.delta());
            if clock.is_finished() {
                debug!("projectile expired off-screen at {pos}");
                *state = ProjectileState::Spent;
            }
        } else if clock.elapsed_secs() > 0.0 {
            clock.reset();
        }
    }
}

/// Apply every `ClearProjectiles` request written this tick.
pub fn clear_projectiles(
    mut requests: MessageReader<ClearProjectiles>,
    tunables: Res<Tunables>,
    mut q: Query<(&Projectile, &mut ProjectileState)>,
    mut score: MessageWriter<AwardScore>,
) {
    for req in requests.read() {
        let mut cleared = 0u64;
        let mut scored = 0u64;

        for (projectile, mut state) in &mut q {
            if *state != ProjectileState::Live {
                continue;
            }
            if projectile.owner == ShotOwner::Player && !req.include_player_owned {
                continue;
            }
            *state = ProjectileState::Spent;
            cleared += 1;
            if projectile.owner == ShotOwner::Enemy {
                scored += 1;
            }
        }

        if req.award_score && scored > 0 {
            score.write(AwardScore::new(scored * tunables.cleared_shot_score));
        }
        debug!("cleared {cleared} projectiles");
    }
}

/// Despawn projectiles that were spent during the fixed steps of this frame.
pub fn despawn_spent_projectiles(
    mut commands: Commands,
    q: Query<(Entity, &ProjectileState), With<Projectile>>,
) {
    for (e, state) in &q {
        if *state == ProjectileState::Spent {
            commands.entity(e).despawn();
        }
    }
}
