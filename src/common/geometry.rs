//! Displacement helpers.
//!
//! Angles are in degrees, counter-clockwise, with 0° meaning "local +Y".
//! A shot rotated by 180° therefore travels straight down the screen.

use bevy::prelude::*;

/// Local-space step a shot travels each fixed tick.
///
/// The step is along local +Y; the shot's own rotation turns it into a world direction.
#[inline]
pub fn shot_displacement(speed: f32, tick_secs: f32) -> Vec2 {
    Vec2::Y * speed * tick_secs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displacement_scales_with_tick() {
        let d = shot_displacement(120.0, 0.5);
        assert_eq!(d, Vec2::new(0.0, 60.0));

        let down = Quat::from_rotation_z(180f32.to_radians()) * d.extend(0.0);
        assert!((down.truncate() - Vec2::new(0.0, -60.0)).length() < 1e-4);
    }
}
