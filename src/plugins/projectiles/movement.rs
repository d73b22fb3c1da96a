use bevy::prelude::*;

use super::components::{Displacement, Projectile, ProjectileState, ShotOrnament, Spin};

/// Ornament turn rate, in degrees per second.
const ORNAMENT_SPIN: f32 = 720.0;

/// Advance every live projectile by one fixed tick.
///
/// The spin delta is applied first, then the local displacement is rotated into
/// world space by the projectile's current heading. Spent projectiles never move.
pub fn advance_projectiles(
    mut q: Query<(&ProjectileState, &Displacement, &Spin, &mut Transform), With<Projectile>>,
) {
    for (state, step, spin, mut tf) in &mut q {
        if *state != ProjectileState::Live {
            continue;
        }
        if spin.0 != 0.0 {
            tf.rotate_z(spin.0.to_radians());
        }
        let delta = tf.rotation * step.0.extend(0.0);
        tf.translation += delta;
    }
}

/// Turn shot ornaments. Purely visual.
pub fn spin_ornaments(time: Res<Time>, mut q: Query<&mut Transform, With<ShotOrnament>>) {
    let angle = (ORNAMENT_SPIN * time.delta_secs()).to_radians();
    for mut tf in &mut q {
        tf.rotate_z(angle);
    }
}
