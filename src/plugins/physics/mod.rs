//! Physics plugin: Avian for contact detection only.
//!
//! Nothing in combat is simulated. Actors and projectiles are kinematic and move
//! themselves in `FixedUpdate`; Avian reports the contacts in `FixedPostUpdate`.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    let tunables = app.world().resource::<Tunables>();
    let ppm = tunables.pixels_per_meter;
    let hz = tunables.tick_hz;

    app.insert_resource(Time::<Fixed>::from_hz(hz));
    app.add_plugins(PhysicsPlugins::default().with_length_unit(ppm));
    app.insert_resource(Gravity(Vec2::ZERO));
}
