//! Core plugin: shared resources, global settings and the combat schedule.

use bevy::prelude::*;

use crate::common::combat::despawn_marked;
use crate::common::schedule;
use crate::common::session::Session;
use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    app.insert_resource(Tunables::default());
    app.init_resource::<Session>();
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));

    schedule::configure(app);
    app.add_systems(PostUpdate, despawn_marked);
}
