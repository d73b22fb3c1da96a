use avian2d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use super::messages::{
    BossDefeated, DialogueScene, SpawnBoss, SpellcardDeclared, StartDialogue, TriggerBossAttack,
};
use super::scheduler::{BossCombat, BossEffect, BossTimings};
use super::vitals::HitRules;
use crate::common::combat::{Combatant, PendingDespawn};
use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::audio::PlayCue;
use crate::plugins::items::SpawnItem;
use crate::plugins::player::messages::AwardScore;
use crate::plugins::projectiles::messages::{ClearProjectiles, ProjectileHit, SpawnProjectile};

const BOSS_RADIUS: f32 = 24.0;
const LOOT_SPREAD: f32 = 48.0;

/// Everything a boss effect can write to.
#[derive(SystemParam)]
pub struct BossOutbox<'w, 's> {
    commands: Commands<'w, 's>,
    fixed: Res<'w, Time<Fixed>>,
    projectiles: MessageWriter<'w, SpawnProjectile>,
    cues: MessageWriter<'w, PlayCue>,
    clear: MessageWriter<'w, ClearProjectiles>,
    items: MessageWriter<'w, SpawnItem>,
    score: MessageWriter<'w, AwardScore>,
    declared: MessageWriter<'w, SpellcardDeclared>,
    defeated: MessageWriter<'w, BossDefeated>,
    dialogue: MessageWriter<'w, StartDialogue>,
}

impl BossOutbox<'_, '_> {
    fn apply(&mut self, boss: Entity, name: &str, origin: Vec2, effects: &mut Vec<BossEffect>) {
        let tick = self.fixed.timestep().as_secs_f32();

        for effect in effects.drain(..) {
            match effect {
                BossEffect::FirePattern(emitter) => {
                    let volley = emitter.fire(origin, Some(boss), tick);
                    debug!("boss `{name}` fired {} shots", volley.shots.len());
                    self.projectiles.write_batch(volley.shots);
                    self.cues.write(volley.cue);
                }
                BossEffect::PlayCue(cue) => {
                    self.cues.write(cue);
                }
                BossEffect::ClearProjectiles => {
                    self.clear.write(ClearProjectiles {
                        include_player_owned: false,
                        award_score: true,
                    });
                }
                BossEffect::DropLoot(loot) => {
                    for &kind in loot.iter() {
                        self.items.write(SpawnItem::scattered(kind, origin, LOOT_SPREAD));
                    }
                }
                BossEffect::AwardScore(points) => {
                    self.score.write(AwardScore::new(points));
                }
                BossEffect::SpellcardDeclared(card) => {
                    self.declared.write(SpellcardDeclared { boss, name: card });
                }
                BossEffect::DisableCollision => {
                    self.commands.entity(boss).try_insert(CollisionLayers::NONE);
                }
                BossEffect::Defeated => {
                    self.defeated.write(BossDefeated {
                        boss,
                        name: name.to_owned(),
                    });
                }
                BossEffect::StartDefeatDialogue => {
                    self.dialogue.write(StartDialogue {
                        boss,
                        scene: DialogueScene::Outro,
                    });
                }
                BossEffect::Despawn => {
                    self.commands.entity(boss).try_insert(PendingDespawn);
                }
            }
        }
    }
}

pub fn spawn_bosses(
    mut requests: MessageReader<SpawnBoss>,
    tunables: Res<Tunables>,
    mut outbox: BossOutbox,
) {
    let mut fx = Vec::new();

    for req in requests.read() {
        let stages = match req.encounter.stage_queue() {
            Ok(stages) => stages,
            Err(err) => {
                warn!("not spawning boss: {err}");
                continue;
            }
        };

        let mut combat = BossCombat::new(
            &req.encounter,
            stages,
            HitRules::from(&*tunables),
            BossTimings::from(&*tunables),
        );

        let boss = outbox
            .commands
            .spawn((
                Name::new(format!("Boss: {}", req.encounter.name)),
                Combatant::Boss,
                Sprite::from_color(Color::srgb(0.9, 0.35, 0.6), Vec2::splat(BOSS_RADIUS * 2.0)),
                Transform::from_translation(req.position.extend(1.0)),
                RigidBody::Kinematic,
                Collider::circle(BOSS_RADIUS),
                CollisionLayers::new(Layer::Enemy, [Layer::Player, Layer::PlayerBullet]),
                DespawnOnExit(GameState::InGame),
            ))
            .id();
        info!("boss `{}` spawned with {} stages", combat.name, combat.stages.len());

        if combat.midboss {
            combat.trigger_attack(&mut fx);
        } else {
            outbox.dialogue.write(StartDialogue {
                boss,
                scene: DialogueScene::Intro,
            });
        }
        let name = combat.name.clone();
        outbox.commands.entity(boss).insert(combat);
        outbox.apply(boss, &name, req.position, &mut fx);
    }
}

pub fn trigger_boss_attacks(
    mut triggers: MessageReader<TriggerBossAttack>,
    mut q_bosses: Query<(&mut BossCombat, &Transform)>,
    mut outbox: BossOutbox,
) {
    let mut fx = Vec::new();
    for trigger in triggers.read() {
        let Ok((mut combat, tf)) = q_bosses.get_mut(trigger.boss) else {
            continue;
        };
        if combat.trigger_attack(&mut fx) {
            debug!("boss `{}` attacking", combat.name);
        }
        outbox.apply(trigger.boss, &combat.name, tf.translation.truncate(), &mut fx);
    }
}

/// Run every boss's scheduled continuations for this fixed tick.
pub fn tick_bosses(
    time: Res<Time>,
    mut q_bosses: Query<(Entity, &mut BossCombat, &Transform)>,
    mut outbox: BossOutbox,
) {
    let mut fx = Vec::new();
    for (boss, mut combat, tf) in &mut q_bosses {
        combat.tick(time.delta(), &mut fx);
        if !fx.is_empty() {
            outbox.apply(boss, &combat.name, tf.translation.truncate(), &mut fx);
        }
    }
}

/// Hit resolution for bosses.
pub fn resolve_boss_hits(
    mut hits: MessageReader<ProjectileHit>,
    mut q_bosses: Query<(&mut BossCombat, &Transform)>,
    mut outbox: BossOutbox,
) {
    let mut fx = Vec::new();
    for hit in hits.read() {
        let Ok((mut combat, tf)) = q_bosses.get_mut(hit.target) else {
            continue;
        };
        let outcome = combat.receive_hit(&hit.payload, &mut fx);
        debug!(
            "boss `{}` hit: {outcome:?}, health {}",
            combat.name, combat.vitals.health
        );
        outbox.apply(hit.target, &combat.name, tf.translation.truncate(), &mut fx);
    }
}
