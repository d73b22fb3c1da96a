//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::projectiles::ProjectilesPlugin;

pub mod audio;
pub mod boss;
pub mod core;
pub mod enemies;
pub mod items;
pub mod physics;
pub mod player;
pub mod projectiles;
pub mod world;

// Render-only
pub mod camera;

/// Register gameplay plugins that work in headless tests.
///
/// `core` goes first: later plugins read `Tunables` while building.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    audio::plugin(app);
    world::plugin(app);
    player::plugin(app);
    items::plugin(app);
    enemies::plugin(app);
    boss::plugin(app);
    app.add_plugins(ProjectilesPlugin);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
}
