//! Consumer: turns `SpawnProjectile` requests into projectile entities.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use super::components::{
    Displacement, GrazeCharge, OffscreenClock, Projectile, ProjectileState, ShotOrnament, ShotOwner,
    Spin,
};
use super::messages::SpawnProjectile;
use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;

/// Projectiles draw above actors.
const PROJECTILE_Z: f32 = 5.0;

/// Collision layers for a live projectile.
///
/// Player shots only see enemies. Enemy shots see the player hitbox and graze zones.
pub fn live_layers(owner: ShotOwner) -> CollisionLayers {
    match owner {
        ShotOwner::Player => CollisionLayers::new(Layer::PlayerBullet, [Layer::Enemy]),
        ShotOwner::Enemy => {
            CollisionLayers::new(Layer::EnemyBullet, [Layer::Player, Layer::GrazeZone])
        }
    }
}

pub fn spawn_projectiles(
    mut commands: Commands,
    mut requests: MessageReader<SpawnProjectile>,
    tunables: Res<Tunables>,
) {
    for req in requests.read() {
        let radius = req.shot.size.radius();
        let rotation = Quat::from_rotation_z(req.shot.rotation.to_radians());

        let mut projectile = commands.spawn((
            (
                Name::new("Projectile"),
                Projectile {
                    shot: req.shot.clone(),
                    owner: req.owner,
                    source: req.source,
                },
                ProjectileState::Live,
                Displacement(req.displacement),
                Spin(req.spin),
                GrazeCharge(req.owner == ShotOwner::Enemy),
                OffscreenClock::new(tunables.offscreen_grace),
            ),
            (
                Sprite::from_color(req.shot.colour(), Vec2::splat(radius * 2.0)),
                Transform::from_translation(req.position.extend(PROJECTILE_Z))
                    .with_rotation(rotation),
                RigidBody::Kinematic,
                Collider::circle(radius),
                Sensor,
                CollisionEventsEnabled,
                live_layers(req.owner),
                DespawnOnExit(GameState::InGame),
            ),
        ));

        if req.shot.spinning {
            projectile.with_children(|parent| {
                parent.spawn((
                    ShotOrnament,
                    Sprite::from_color(Color::WHITE.with_alpha(0.6), Vec2::splat(radius * 1.2)),
                    Transform::from_xyz(0.0, 0.0, 0.1),
                ));
            });
        }
    }
}
