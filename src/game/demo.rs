//! A small scripted fight for the full app: a wave of popcorn enemies and one boss.
//!
//! There is no dialogue system, so intro scenes hand control straight back to the
//! boss and outro scenes are only logged. There is no audio backend either; queued
//! cue clips are drained every frame.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::audio::{Cue, CuePlayback};
use crate::plugins::boss::messages::{
    BossDefeated, DialogueScene, SpawnBoss, SpellcardDeclared, StartDialogue, TriggerBossAttack,
};
use crate::plugins::boss::stage::{AttackStage, BossEncounter};
use crate::plugins::enemies::SpawnEnemy;
use crate::plugins::items::{ItemKind, LootTable};
use crate::plugins::projectiles::components::{ShotKind, ShotSize, ShotTemplate};
use crate::plugins::projectiles::emitter::PatternEmitter;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), start_demo)
        .add_systems(Update, (skip_dialogue, announce, drain_cue_playback));
}

fn start_demo(mut enemies: MessageWriter<SpawnEnemy>, mut bosses: MessageWriter<SpawnBoss>) {
    enemies.write_batch((-2..=2).map(|i| SpawnEnemy {
        position: Vec2::new(i as f32 * 96.0, 200.0),
        health: 8.0,
        bounty: 100,
        loot: LootTable(vec![ItemKind::SmallPower, ItemKind::Point]),
    }));

    bosses.write(SpawnBoss {
        encounter: demo_encounter(),
        position: Vec2::new(0.0, 300.0),
    });
}

fn demo_encounter() -> BossEncounter {
    let ring = |count: u32, speed: f32, offset: f32, palette: u8| PatternEmitter {
        count,
        speed,
        spread: 360.0,
        offset,
        shot: ShotTemplate {
            palette,
            ..default()
        },
        delay: 0.6,
        ..default()
    };

    BossEncounter {
        name: "Demo".to_owned(),
        max_health: 600.0,
        midboss: false,
        stages: vec![
            AttackStage {
                name: "Opening".to_owned(),
                emitters: vec![ring(16, 180.0, 0.0, 1), ring(16, 180.0, 11.25, 2)],
                threshold: 300.0,
                spellcard: false,
                loot: LootTable(vec![ItemKind::BigPower]),
            },
            AttackStage {
                name: "Sign \"Falling Petals\"".to_owned(),
                emitters: vec![
                    PatternEmitter {
                        count: 7,
                        speed: 260.0,
                        spread: 90.0,
                        shot: ShotTemplate {
                            kind: ShotKind::Ball,
                            size: ShotSize::Big,
                            palette: 4,
                            curve: 30.0,
                            ..default()
                        },
                        cue: Cue::EnemyShoot1,
                        delay: 0.4,
                        ..default()
                    },
                    ring(24, 140.0, 7.5, 5),
                ],
                threshold: 0.0,
                spellcard: true,
                loot: LootTable(vec![ItemKind::Bomb, ItemKind::Point, ItemKind::Point]),
            },
        ],
    }
}

fn skip_dialogue(
    mut scenes: MessageReader<StartDialogue>,
    mut triggers: MessageWriter<TriggerBossAttack>,
) {
    for scene in scenes.read() {
        match scene.scene {
            DialogueScene::Intro => {
                triggers.write(TriggerBossAttack { boss: scene.boss });
            }
            DialogueScene::Outro => info!("outro dialogue for {}", scene.boss),
        }
    }
}

fn announce(
    mut spellcards: MessageReader<SpellcardDeclared>,
    mut defeats: MessageReader<BossDefeated>,
) {
    for card in spellcards.read() {
        info!("spellcard: {}", card.name);
    }
    for defeat in defeats.read() {
        info!("{} defeated", defeat.name);
    }
}

fn drain_cue_playback(mut playback: ResMut<CuePlayback>) {
    for clip in playback.drain() {
        trace!("play {} @ {:.2}", clip.clip, clip.volume);
    }
}
