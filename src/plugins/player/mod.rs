//! Player plugin.
//!
//! Pipeline:
//! - Update (full app only): sample the keyboard, write the `PlayerInput` resource
//! - FixedUpdate: bombs and shots (`Emit`), velocity clamped to the playfield (`Motion`)
//! - FixedPostUpdate (`Resolve`): hits, deathbomb window, grazes, item pickups
//! - PostUpdate: score awards, scaled by the session point multiplier
//!
//! Input polling is external: headless apps and tests write `PlayerInput` directly.

pub mod life;
pub mod messages;
pub mod stats;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::combat::Combatant;
use crate::common::geometry::shot_displacement;
use crate::common::layers::Layer;
use crate::common::session::Session;
use crate::common::schedule::CombatSet;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::audio::{Cue, PlayCue, volume};
use crate::plugins::projectiles::components::{GrazeZone, Shot, ShotKind, ShotOwner, ShotTemplate};
use crate::plugins::projectiles::messages::SpawnProjectile;
use life::PlayerLife;
use stats::PlayerStats;

/// Horizontal offset of the two gun barrels.
const BARREL_OFFSET: f32 = 8.0;

#[derive(Component)]
pub struct Player;

/// Shot cadence.
#[derive(Component, Debug, Clone, Deref, DerefMut)]
pub struct PlayerGun(pub Timer);

#[derive(Resource, Default, Debug, Clone)]
pub struct PlayerInput {
    pub move_axis: Vec2,
    /// Slow movement.
    pub focus: bool,
    pub fire: bool,
    /// Latched until a fixed step consumes it.
    pub bomb: bool,
}

pub fn plugin(app: &mut App) {
    let tunables = app.world().resource::<Tunables>().clone();
    let hi_score = app
        .world()
        .get_resource::<Session>()
        .map_or(0, |session| session.hi_score);

    app.insert_resource(PlayerInput::default())
        .insert_resource(PlayerStats::new(&tunables).with_hi_score(hi_score))
        .add_message::<messages::AwardScore>()
        .add_message::<messages::PlayerDied>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(
            FixedUpdate,
            (
                (life::use_bomb, fire_shots).chain().in_set(CombatSet::Emit),
                apply_movement.in_set(CombatSet::Motion),
            ),
        )
        .add_systems(
            FixedPostUpdate,
            (
                life::resolve_player_hits,
                life::tick_player_life,
                life::count_grazes,
                life::collect_items,
            )
                .chain()
                .in_set(CombatSet::Resolve),
        )
        .add_systems(PostUpdate, life::apply_score);
}

/// Keyboard input for the windowed app.
pub fn register_input(app: &mut App) {
    app.add_systems(Update, gather_input);
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    let layers = CollisionLayers::new(
        Layer::Player,
        [Layer::World, Layer::Enemy, Layer::EnemyBullet, Layer::Item],
    );
    let start = life::respawn_point(&tunables);

    let player = commands
        .spawn((
            Name::new("Player"),
            Player,
            Combatant::Player,
            PlayerLife::Vulnerable,
            PlayerGun(Timer::from_seconds(
                tunables.player_shot_interval,
                TimerMode::Once,
            )),
            Sprite {
                color: Color::srgb(0.2, 0.75, 0.9),
                custom_size: Some(Vec2::splat(tunables.player_hitbox_radius * 4.0)),
                ..default()
            },
            Transform::from_translation(start.extend(2.0)),
            RigidBody::Kinematic,
            Collider::circle(tunables.player_hitbox_radius),
            layers,
            CollisionEventsEnabled,
            LinearVelocity::ZERO,
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    commands.entity(player).with_children(|parent| {
        parent.spawn((
            Name::new("GrazeZone"),
            GrazeZone { player },
            Transform::default(),
            Collider::circle(tunables.graze_radius),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(Layer::GrazeZone, [Layer::EnemyBullet]),
        ));
    });
}

fn gather_input(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    let mut axis = Vec2::ZERO;

    if keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        axis.y += 1.0;
    }
    if keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        axis.y -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        axis.x -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        axis.x += 1.0;
    }

    input.move_axis = axis.normalize_or_zero();
    input.focus = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    input.fire = keys.pressed(KeyCode::KeyZ);
    input.bomb |= keys.just_pressed(KeyCode::KeyX);
}

/// Velocity that moves the player by one step, stopping at the playfield edge.
fn apply_movement(
    time: Res<Time>,
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<(&Transform, &PlayerLife, &mut LinearVelocity), With<Player>>,
) {
    let Ok((tf, life, mut vel)) = q_player.single_mut() else {
        return;
    };
    let dt = time.delta_secs();
    if dt <= 0.0 || matches!(life, PlayerLife::Dying(_)) {
        vel.0 = Vec2::ZERO;
        return;
    }

    let speed = if input.focus {
        tunables.player_focus_speed
    } else {
        tunables.player_speed
    };
    let pos = tf.translation.truncate();
    let bounds = tunables.view_rect().inflate(-tunables.player_hitbox_radius);
    let target = (pos + input.move_axis * speed * dt).clamp(bounds.min, bounds.max);
    vel.0 = (target - pos) / dt;
}

fn fire_shots(
    time: Res<Time>,
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<(Entity, &Transform, &PlayerLife, &mut PlayerGun), With<Player>>,
    mut shots: MessageWriter<SpawnProjectile>,
    mut cues: MessageWriter<PlayCue>,
) {
    let Ok((player, tf, life, mut gun)) = q_player.single_mut() else {
        return;
    };
    gun.tick(time.delta());
    if !input.fire || !life.can_shoot() || !gun.is_finished() {
        return;
    }
    gun.reset();

    let template = ShotTemplate {
        kind: ShotKind::Special,
        palette: 5,
        damage: tunables.player_shot_damage,
        ..default()
    };
    let origin = tf.translation.truncate();
    let displacement = shot_displacement(tunables.player_shot_speed, time.delta_secs());

    for dx in [-BARREL_OFFSET, BARREL_OFFSET] {
        shots.write(SpawnProjectile {
            owner: ShotOwner::Player,
            source: Some(player),
            position: origin + Vec2::new(dx, 0.0),
            shot: Shot::from_template(&template, tunables.player_shot_speed, 0.0),
            displacement,
            spin: 0.0,
        });
    }
    cues.write(PlayCue::new(Cue::PlayerShoot, volume::LOW));
}
