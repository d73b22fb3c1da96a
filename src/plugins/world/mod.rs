//! World plugin: the playfield backdrop and the walls that keep the player on it.
//!
//! Walls only collide with the player. Projectiles and items leave the view freely
//! and are culled by their own plugins.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;

const WALL_THICKNESS: f32 = 30.0;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), (spawn_arena, spawn_backdrop));
}

fn spawn_arena(mut commands: Commands, tunables: Res<Tunables>) {
    let wall_color = Color::srgb(0.25, 0.27, 0.33);
    let wall_layers = CollisionLayers::new(Layer::World, [Layer::Player]);

    let half = tunables.view_rect().half_size();
    let t = WALL_THICKNESS;

    let mut spawn_wall = |name: &'static str, pos: Vec2, size: Vec2| {
        commands.spawn((
            Name::new(name),
            Sprite {
                color: wall_color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(pos.extend(5.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            wall_layers,
            DespawnOnExit(GameState::InGame),
        ));
    };

    let horizontal = Vec2::new(half.x * 2.0 + t * 2.0, t);
    let vertical = Vec2::new(t, half.y * 2.0);

    spawn_wall("WallTop", Vec2::new(0.0, half.y + t * 0.5), horizontal);
    spawn_wall("WallBottom", Vec2::new(0.0, -half.y - t * 0.5), horizontal);
    spawn_wall("WallLeft", Vec2::new(-half.x - t * 0.5, 0.0), vertical);
    spawn_wall("WallRight", Vec2::new(half.x + t * 0.5, 0.0), vertical);
}

/// Solid-colour playfield, so the project needs no assets.
fn spawn_backdrop(mut commands: Commands, tunables: Res<Tunables>) {
    commands.spawn((
        Name::new("Backdrop"),
        Sprite::from_color(Color::srgb(0.08, 0.08, 0.12), tunables.view_rect().size()),
        Transform::from_xyz(0.0, 0.0, -10.0),
        DespawnOnExit(GameState::InGame),
    ));
}
