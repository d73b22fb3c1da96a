//! Items plugin: drops that fall, home onto the player and are picked up.
//!
//! Items move themselves (no physics integration): gravity while falling, a
//! steering acceleration toward the player once collected by a sweep. Avian only
//! reports the pickup contact.

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::common::combat::PendingDespawn;
use crate::common::layers::Layer;
use crate::common::schedule::CombatSet;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::player::Player;

const ITEM_RADIUS: f32 = 8.0;
const ITEM_Z: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    SmallPower,
    BigPower,
    Life,
    Bomb,
    Point,
    FullPower,
}

impl ItemKind {
    fn colour(self) -> Color {
        match self {
            ItemKind::SmallPower | ItemKind::BigPower => Color::srgb(0.95, 0.2, 0.2),
            ItemKind::Point => Color::srgb(0.3, 0.45, 1.0),
            ItemKind::Life => Color::srgb(1.0, 0.5, 0.8),
            ItemKind::Bomb => Color::srgb(0.3, 0.9, 0.4),
            ItemKind::FullPower => Color::srgb(1.0, 0.85, 0.2),
        }
    }

    fn size(self) -> f32 {
        match self {
            ItemKind::SmallPower | ItemKind::Point => 10.0,
            _ => 16.0,
        }
    }
}

/// Items dropped together, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Deref, DerefMut)]
#[serde(transparent)]
pub struct LootTable(pub Vec<ItemKind>);

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnItem {
    pub kind: ItemKind,
    pub position: Vec2,
    /// Maximum horizontal scatter, in pixels.
    pub spread: f32,
    /// Upward launch speed in metres per second. Random in 1..8 when `None`.
    pub launch: Option<f32>,
}

impl SpawnItem {
    pub fn at(kind: ItemKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            spread: 0.0,
            launch: None,
        }
    }

    pub fn scattered(kind: ItemKind, position: Vec2, spread: f32) -> Self {
        Self {
            spread,
            ..Self::at(kind, position)
        }
    }
}

/// Pull every item on screen toward the player.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct CollectAllItems;

#[derive(Message, Clone, Copy, Debug)]
pub struct ItemCollected {
    pub player: Entity,
    pub kind: ItemKind,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Item {
    pub kind: ItemKind,
    pub velocity: Vec2,
    /// Player the item is homing onto. Falls freely when `None`.
    pub homing: Option<Entity>,
}

#[derive(Resource, Debug, Clone)]
pub struct ItemRng(pub SmallRng);

impl Default for ItemRng {
    fn default() -> Self {
        Self(SmallRng::from_os_rng())
    }
}

impl ItemRng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<ItemRng>()
        .add_message::<SpawnItem>()
        .add_message::<CollectAllItems>()
        .add_message::<ItemCollected>();

    app.add_systems(
        FixedUpdate,
        (
            spawn_items.in_set(CombatSet::Spawn),
            (collect_all_items, move_items)
                .chain()
                .in_set(CombatSet::Motion),
        ),
    );
    app.add_systems(
        FixedPostUpdate,
        (
            pickup_items.in_set(CombatSet::Detect),
            cull_items.in_set(CombatSet::Cleanup),
        ),
    );
}

pub(crate) fn spawn_items(
    mut commands: Commands,
    mut requests: MessageReader<SpawnItem>,
    mut rng: ResMut<ItemRng>,
    tunables: Res<Tunables>,
) {
    for req in requests.read() {
        let scatter = if req.spread > 0.0 {
            rng.0.random_range(-req.spread..=req.spread)
        } else {
            0.0
        };
        let launch = req
            .launch
            .unwrap_or_else(|| rng.0.random_range(1.0..8.0));
        let position = req.position + Vec2::new(scatter, 0.0);

        commands.spawn((
            Name::new(format!("Item {:?}", req.kind)),
            Item {
                kind: req.kind,
                velocity: Vec2::Y * launch * tunables.pixels_per_meter,
                homing: None,
            },
            Sprite::from_color(req.kind.colour(), Vec2::splat(req.kind.size())),
            Transform::from_translation(position.extend(ITEM_Z)),
            RigidBody::Kinematic,
            Collider::circle(ITEM_RADIUS),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(Layer::Item, [Layer::Player]),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

pub(crate) fn collect_all_items(
    mut requests: MessageReader<CollectAllItems>,
    q_player: Query<Entity, With<Player>>,
    mut q_items: Query<&mut Item>,
) {
    if requests.read().count() == 0 {
        return;
    }
    let Ok(player) = q_player.single() else {
        debug!("item sweep without a single player");
        return;
    };
    for mut item in &mut q_items {
        item.homing = Some(player);
    }
}

pub(crate) fn move_items(
    time: Res<Time>,
    tunables: Res<Tunables>,
    q_players: Query<&Transform, (With<Player>, Without<Item>)>,
    mut q_items: Query<(&mut Item, &mut Transform)>,
) {
    let dt = time.delta_secs();

    for (mut item, mut tf) in &mut q_items {
        let pos = tf.translation.truncate();
        let target = item.homing.and_then(|p| q_players.get(p).ok());

        match target {
            Some(player_tf) => {
                let towards = (player_tf.translation.truncate() - pos).normalize_or_zero();
                item.velocity += towards * tunables.item_homing_accel * dt;
            }
            None => {
                // Target gone: back to free fall.
                item.homing = None;
                item.velocity.y -= tunables.item_gravity * dt;
            }
        }

        let step = item.velocity * dt;
        tf.translation += step.extend(0.0);
    }
}

pub(crate) fn pickup_items(
    mut commands: Commands,
    mut started: MessageReader<CollisionStart>,
    q_items: Query<&Item, Without<PendingDespawn>>,
    q_players: Query<(), With<Player>>,
    mut collected: MessageWriter<ItemCollected>,
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let pairs = [
            (ev.collider1, ev.body2.unwrap_or(ev.collider2)),
            (ev.collider2, ev.body1.unwrap_or(ev.collider1)),
        ];
        for (item_entity, player) in pairs {
            let Ok(item) = q_items.get(item_entity) else {
                continue;
            };
            if !q_players.contains(player) || !seen.insert(item_entity) {
                continue;
            }
            collected.write(ItemCollected {
                player,
                kind: item.kind,
            });
            commands
                .entity(item_entity)
                .insert((PendingDespawn, CollisionLayers::NONE));
        }
    }
}

pub(crate) fn cull_items(
    mut commands: Commands,
    tunables: Res<Tunables>,
    q_items: Query<(Entity, &Transform), (With<Item>, Without<PendingDespawn>)>,
) {
    let cull = tunables.cull_rect();
    for (e, tf) in &q_items {
        if !cull.contains(tf.translation.truncate()) {
            commands.entity(e).insert(PendingDespawn);
        }
    }
}
