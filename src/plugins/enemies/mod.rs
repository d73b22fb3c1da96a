//! Enemies plugin: generic enemies with plain health, a score bounty and loot.
//!
//! ---------------------------
//! HOW THIS IS DESIGNED (ECS)
//! ---------------------------
//! 1) FACTS live in components: `EnemyVitals`, `Bounty`, `Loot`, `EnemyLifeState`.
//!
//! 2) RULES mutate facts in one place: `resolve_enemy_hits` consumes
//!    `ProjectileHit` messages, subtracts damage and starts the death sequence.
//!    Rewards (items, score, cue) are written as messages at the moment of death.
//!
//! 3) PRESENTATION is derived: the dying shrink/fade reads `EnemyLifeState` only.
//!
//! We avoid per-hit structural changes. A dead enemy keeps its collider but
//! switches to non-interacting collision layers immediately, and is despawned via
//! `PendingDespawn` in `PostUpdate`, outside the physics step.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::combat::{Combatant, HitPayload, OnHit, PendingDespawn};
use crate::common::layers::Layer;
use crate::common::schedule::CombatSet;
use crate::common::state::GameState;
use crate::plugins::audio::{Cue, PlayCue, volume};
use crate::plugins::items::{LootTable, SpawnItem};
use crate::plugins::player::messages::AwardScore;
use crate::plugins::projectiles::messages::ProjectileHit;

const ENEMY_RADIUS: f32 = 14.0;
const LOOT_SPREAD: f32 = 24.0;
const DYING_SECS: f32 = 0.35;

// -----------------------------------------------------------------------------
// Components + messages
// -----------------------------------------------------------------------------

#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EnemyVitals {
    pub health: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyHitOutcome {
    Damaged,
    Killed,
}

impl OnHit for EnemyVitals {
    type Outcome = EnemyHitOutcome;

    /// Unconditional subtraction; zero or below is death.
    fn on_hit(&mut self, hit: &HitPayload) -> EnemyHitOutcome {
        self.health -= hit.damage;
        if self.health <= 0.0 {
            EnemyHitOutcome::Killed
        } else {
            EnemyHitOutcome::Damaged
        }
    }
}

/// Base score awarded on death.
#[derive(Component, Debug, Clone, Copy, Deref)]
pub struct Bounty(pub u64);

/// Items dropped on death.
#[derive(Component, Debug, Clone, Default, Deref)]
pub struct Loot(pub LootTable);

/// Enemy lifecycle state machine.
///
/// - Alive: normal gameplay.
/// - Dying: short fade-out; collides with nothing.
/// - Dead: terminal, waiting for `PendingDespawn`.
#[derive(Component, Debug, Clone)]
pub enum EnemyLifeState {
    Alive,
    Dying { timer: Timer },
    Dead,
}

#[derive(Message, Clone, Debug)]
pub struct SpawnEnemy {
    pub position: Vec2,
    pub health: f32,
    pub bounty: u64,
    pub loot: LootTable,
}

// -----------------------------------------------------------------------------
// Plugin wiring
// -----------------------------------------------------------------------------

pub fn plugin(app: &mut App) {
    app.add_message::<SpawnEnemy>();

    app.add_systems(FixedUpdate, spawn_enemies.in_set(CombatSet::Spawn));
    app.add_systems(
        FixedPostUpdate,
        (resolve_enemy_hits, enemy_death_progress)
            .chain()
            .in_set(CombatSet::Resolve),
    );
}

/// Collision layers for an enemy that should no longer interact with anything.
#[inline]
fn non_interacting_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [] as [Layer; 0])
}

fn spawn_enemies(mut commands: Commands, mut requests: MessageReader<SpawnEnemy>) {
    let enemy_layers = CollisionLayers::new(Layer::Enemy, [Layer::Player, Layer::PlayerBullet]);

    for req in requests.read() {
        commands.spawn((
            Name::new("Enemy"),
            Enemy,
            Combatant::Enemy,
            EnemyVitals { health: req.health },
            Bounty(req.bounty),
            Loot(req.loot.clone()),
            EnemyLifeState::Alive,
            Sprite {
                color: Color::srgb(0.9, 0.25, 0.25),
                custom_size: Some(Vec2::splat(ENEMY_RADIUS * 2.0)),
                ..default()
            },
            Transform::from_translation(req.position.extend(1.0)),
            RigidBody::Static,
            Collider::circle(ENEMY_RADIUS),
            enemy_layers,
            DespawnOnExit(GameState::InGame),
        ));
    }
}

// -----------------------------------------------------------------------------
// Rules
// -----------------------------------------------------------------------------

/// Hit resolution for generic enemies.
///
/// On death: loot at the enemy position, bounty score, death cue, and the dying
/// sequence starts. Otherwise a plain damage cue.
fn resolve_enemy_hits(
    mut hits: MessageReader<ProjectileHit>,
    mut q: Query<
        (
            &mut EnemyVitals,
            &mut EnemyLifeState,
            &mut CollisionLayers,
            &Bounty,
            &Loot,
            &Transform,
        ),
        (With<Enemy>, Without<PendingDespawn>),
    >,
    mut items: MessageWriter<SpawnItem>,
    mut score: MessageWriter<AwardScore>,
    mut cues: MessageWriter<PlayCue>,
) {
    for hit in hits.read() {
        let Ok((mut vitals, mut life, mut layers, bounty, loot, tf)) = q.get_mut(hit.target) else {
            continue;
        };
        if !matches!(*life, EnemyLifeState::Alive) {
            continue;
        }

        match vitals.on_hit(&hit.payload) {
            EnemyHitOutcome::Damaged => {
                cues.write(PlayCue::new(Cue::Damage0, volume::LOW));
            }
            EnemyHitOutcome::Killed => {
                let at = tf.translation.truncate();
                for &kind in loot.iter() {
                    items.write(SpawnItem::scattered(kind, at, LOOT_SPREAD));
                }
                score.write(AwardScore::new(**bounty));
                cues.write(PlayCue::new(Cue::EnemyDeath, volume::NORMAL));

                *layers = non_interacting_enemy_layers();
                *life = EnemyLifeState::Dying {
                    timer: Timer::from_seconds(DYING_SECS, TimerMode::Once),
                };
                debug!("enemy {} killed", hit.target);
            }
        }
    }
}

/// Animate Dying state and mark PendingDespawn once finished.
fn enemy_death_progress(
    time: Res<Time>,
    mut commands: Commands,
    mut q: Query<
        (Entity, &mut EnemyLifeState, &mut Sprite, &mut Transform),
        (With<Enemy>, Without<PendingDespawn>),
    >,
) {
    for (e, mut life, mut sprite, mut tf) in &mut q {
        let EnemyLifeState::Dying { timer } = &mut *life else {
            continue;
        };

        timer.tick(time.delta());

        let dur = timer.duration().as_secs_f32().max(0.0001);
        let t = (timer.elapsed_secs() / dur).clamp(0.0, 1.0);
        tf.scale = Vec3::splat(1.0 - t);

        let mut c = sprite.color.to_srgba();
        c.alpha = 1.0 - t;
        sprite.color = c.into();

        if timer.is_finished() {
            *life = EnemyLifeState::Dead;
            commands.entity(e).insert(PendingDespawn);
        }
    }
}
