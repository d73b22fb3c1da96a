//! Boss plugin tests.
//!
//! Scheduler and hit resolution are exercised directly on `BossCombat`; the ECS
//! glue is checked with `run_system_once` and injected messages.

use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;

use super::agenda::{Agenda, Continuation, Lane};
use super::error::AuthoringError;
use super::messages::{
    BossDefeated, DialogueScene, SpawnBoss, SpellcardDeclared, StartDialogue, TriggerBossAttack,
};
use super::scheduler::{BossCombat, BossEffect, BossTimings, SchedulerState};
use super::stage::{AttackStage, BossEncounter};
use super::systems;
use super::vitals::{HitOutcome, HitRules};
use crate::common::combat::{Combatant, HitPayload};
use crate::common::layers::Layer;
use crate::common::test_utils::{drain_messages, ensure_messages, run_system_once};
use crate::common::tunables::Tunables;
use crate::plugins::audio::{Cue, PlayCue};
use crate::plugins::items::{ItemKind, LootTable, SpawnItem};
use crate::plugins::player::messages::AwardScore;
use crate::plugins::projectiles::components::{Shot, ShotTemplate};
use crate::plugins::projectiles::emitter::PatternEmitter;
use crate::plugins::projectiles::messages::{ClearProjectiles, ProjectileHit, SpawnProjectile};

/// 64 Hz fixed tick.
const TICK: Duration = Duration::from_micros(15_625);
const GRACE_TICKS: usize = 192;

// --------------------------------------------------------------------------------------
// Helpers
// --------------------------------------------------------------------------------------

fn emitter(count: u32, delay: f32) -> PatternEmitter {
    PatternEmitter {
        count,
        delay,
        ..default()
    }
}

fn stage(name: &str, threshold: f32, spellcard: bool) -> AttackStage {
    AttackStage {
        name: name.to_owned(),
        emitters: vec![emitter(1, 0.5)],
        threshold,
        spellcard,
        loot: LootTable::default(),
    }
}

fn encounter(stages: Vec<AttackStage>) -> BossEncounter {
    BossEncounter {
        name: "Test".to_owned(),
        max_health: 1000.0,
        midboss: false,
        stages,
    }
}

fn combat(enc: &BossEncounter) -> BossCombat {
    let stages = enc.stage_queue().expect("encounter should be playable");
    let tunables = Tunables::default();
    BossCombat::new(
        enc,
        stages,
        HitRules::from(&tunables),
        BossTimings::from(&tunables),
    )
}

fn started(enc: &BossEncounter) -> BossCombat {
    let mut c = combat(enc);
    assert!(c.trigger_attack(&mut Vec::new()));
    c
}

fn hit(damage: f32) -> HitPayload {
    HitPayload {
        damage,
        source: None,
        shot: Shot::from_template(&ShotTemplate::default(), 0.0, 0.0),
    }
}

fn strike(c: &mut BossCombat, damage: f32) -> (HitOutcome, Vec<BossEffect>) {
    let mut fx = Vec::new();
    let outcome = c.receive_hit(&hit(damage), &mut fx);
    (outcome, fx)
}

fn run_ticks(c: &mut BossCombat, n: usize) -> Vec<BossEffect> {
    let mut fx = Vec::new();
    for _ in 0..n {
        c.tick(TICK, &mut fx);
    }
    fx
}

fn fired(fx: &[BossEffect]) -> usize {
    fx.iter()
        .filter(|e| matches!(e, BossEffect::FirePattern(_)))
        .count()
}

fn has_cue(fx: &[BossEffect], cue: Cue) -> bool {
    fx.iter()
        .any(|e| matches!(e, BossEffect::PlayCue(p) if p.cue == cue))
}

// --------------------------------------------------------------------------------------
// Agenda
// --------------------------------------------------------------------------------------

#[test]
fn zero_delay_continuation_runs_on_the_next_tick() {
    let mut agenda = Agenda::default();
    agenda.schedule(Lane::AttackLoop, 0.0, Continuation::FireEmitter(0));

    assert_eq!(agenda.advance(TICK), vec![Continuation::FireEmitter(0)]);
    assert!(agenda.is_empty());
}

#[test]
fn cancel_only_touches_its_lane_and_is_idempotent() {
    let mut agenda = Agenda::default();
    agenda.schedule(Lane::AttackLoop, 1.0, Continuation::FireEmitter(1));
    agenda.schedule(Lane::CueCooldown, 0.1, Continuation::ReleaseDamageCue);

    assert_eq!(agenda.cancel(Lane::AttackLoop), 1);
    assert_eq!(agenda.cancel(Lane::AttackLoop), 0);
    assert!(agenda.is_scheduled(Lane::CueCooldown));
    assert_eq!(agenda.len(), 1);
}

// --------------------------------------------------------------------------------------
// Scheduler: firing loop
// --------------------------------------------------------------------------------------

#[test]
fn spawned_boss_is_idle_invincible_and_ignores_hits() {
    let mut c = combat(&encounter(vec![stage("a", 0.0, false)]));

    assert_eq!(c.state, SchedulerState::Idle);
    assert!(c.vitals.invincible);
    assert_eq!(c.vitals.previous_threshold, 1000.0);
    assert_eq!(strike(&mut c, 100.0).0, HitOutcome::Ignored);
    assert_eq!(c.vitals.health, 1000.0);
    assert_eq!(fired(&run_ticks(&mut c, 100)), 0);
}

#[test]
fn trigger_only_works_from_idle() {
    let mut c = combat(&encounter(vec![stage("a", 0.0, false)]));
    assert!(c.trigger_attack(&mut Vec::new()));
    assert!(!c.vitals.invincible);
    assert_eq!(c.state, SchedulerState::Executing { emitter: 0 });
    assert!(!c.trigger_attack(&mut Vec::new()));
}

#[test]
fn emitters_fire_cyclically_with_the_next_emitters_delay() {
    let mut enc = encounter(vec![stage("a", 0.0, false)]);
    enc.stages[0].emitters = vec![emitter(1, 0.5), emitter(2, 0.25)];
    let mut c = started(&enc);

    let mut firings = Vec::new();
    for tick in 1..=60 {
        let mut fx = Vec::new();
        c.tick(TICK, &mut fx);
        for e in fx {
            if let BossEffect::FirePattern(p) = e {
                firings.push((tick, p.count));
            }
        }
    }

    // emitter 0 at once, emitter 1 after 0.25 s, emitter 0 again after 0.5 s
    assert_eq!(firings, vec![(1, 1), (17, 2), (49, 1)]);
}

#[test]
fn stopping_twice_equals_stopping_once() {
    let mut c = started(&encounter(vec![stage("a", 0.0, false)]));
    run_ticks(&mut c, 1);

    c.stop_bullet_loop();
    let after_one = (c.agenda.len(), c.state);
    c.stop_bullet_loop();

    assert_eq!((c.agenda.len(), c.state), after_one);
    assert!(!c.agenda.is_scheduled(Lane::AttackLoop));
    assert_eq!(fired(&run_ticks(&mut c, 200)), 0);
}

// --------------------------------------------------------------------------------------
// Hit resolution
// --------------------------------------------------------------------------------------

#[test]
fn overshooting_hit_clamps_to_threshold_and_advances() {
    let mut c = started(&encounter(vec![
        stage("a", 500.0, false),
        stage("b", 0.0, false),
    ]));

    let (outcome, fx) = strike(&mut c, 600.0);

    assert!(matches!(outcome, HitOutcome::Advance { reset: false, .. }));
    assert_eq!(c.vitals.health, 500.0);
    assert_eq!(c.state, SchedulerState::Transitioning);
    assert_eq!(c.stages.len(), 1);
    assert!(fx.contains(&BossEffect::ClearProjectiles));
}

#[test]
fn hit_just_above_threshold_then_epsilon_lands_exactly() {
    let mut c = started(&encounter(vec![
        stage("a", 500.0, false),
        stage("b", 0.0, false),
    ]));

    assert!(matches!(
        strike(&mut c, 499.75).0,
        HitOutcome::Damaged { .. }
    ));
    assert_eq!(c.vitals.health, 500.25);

    let (outcome, _) = strike(&mut c, 0.25);
    assert_eq!(c.vitals.health, 500.0);
    assert!(matches!(outcome, HitOutcome::Advance { reset: false, .. }));
}

#[test]
fn one_advance_per_threshold_until_death() {
    let mut c = started(&encounter(vec![
        stage("75", 750.0, false),
        stage("50", 500.0, false),
        stage("25", 250.0, false),
        stage("0", 0.0, false),
    ]));

    for (expected_left, prev) in [(3, 750.0), (2, 500.0), (1, 250.0)] {
        let (outcome, _) = strike(&mut c, 250.0);
        assert!(matches!(outcome, HitOutcome::Advance { reset: false, .. }));
        assert_eq!(c.stages.len(), expected_left);

        // further hits while transitioning change nothing
        assert_eq!(strike(&mut c, 250.0).0, HitOutcome::Ignored);

        run_ticks(&mut c, GRACE_TICKS);
        assert_eq!(c.state, SchedulerState::Executing { emitter: 0 });
        assert_eq!(c.vitals.previous_threshold, prev);
        assert_eq!(c.vitals.health, prev);
    }

    let (outcome, fx) = strike(&mut c, 250.0);
    assert!(matches!(outcome, HitOutcome::Advance { reset: true, .. }));
    assert!(c.stages.is_empty());
    assert_eq!(c.state, SchedulerState::Dead);
    assert_eq!(c.vitals.health, 0.0);
    assert!(fx.contains(&BossEffect::Defeated));
    assert!(fx.contains(&BossEffect::DisableCollision));
}

#[test]
fn grace_period_keeps_the_boss_invincible() {
    let mut c = started(&encounter(vec![
        stage("a", 500.0, false),
        stage("b", 0.0, false),
    ]));
    strike(&mut c, 500.0);

    run_ticks(&mut c, GRACE_TICKS - 1);
    assert_eq!(c.state, SchedulerState::Transitioning);
    assert_eq!(strike(&mut c, 100.0).0, HitOutcome::Ignored);

    let fx = run_ticks(&mut c, 1);
    assert_eq!(c.state, SchedulerState::Executing { emitter: 0 });
    assert!(!c.vitals.invincible);
    assert_eq!(fired(&fx), 0);
    assert_eq!(fired(&run_ticks(&mut c, 1)), 1);
}

#[test]
fn full_bar_spellcard_takes_quarter_damage_and_resets_at_zero() {
    let mut c = started(&encounter(vec![stage("Sign", 0.0, true)]));
    assert!(c.vitals.full_bar_spellcard());

    assert!(matches!(
        strike(&mut c, 400.0).0,
        HitOutcome::Damaged { .. }
    ));
    assert_eq!(c.vitals.health, 900.0);

    let (outcome, _) = strike(&mut c, 3600.0);
    assert!(matches!(outcome, HitOutcome::Advance { reset: true, .. }));
    assert_eq!(c.state, SchedulerState::Dead);
}

#[test]
fn sub_bar_spellcard_takes_reduced_damage() {
    let mut c = started(&encounter(vec![
        stage("a", 500.0, false),
        stage("Sign", 0.0, true),
    ]));

    let (_, fx) = strike(&mut c, 500.0);
    assert!(has_cue(&fx, Cue::SpellcardDeclare));

    let fx = run_ticks(&mut c, GRACE_TICKS);
    assert!(fx.contains(&BossEffect::SpellcardDeclared("Sign".to_owned())));
    assert!(c.vitals.spellcard);
    assert!(!c.vitals.full_bar_spellcard());
    assert_eq!(c.vitals.previous_threshold, 500.0);

    strike(&mut c, 240.0);
    assert_eq!(c.vitals.health, 490.0);
}

#[test]
fn sub_bar_spellcard_resets_at_zero_and_measures_criticals_from_its_own_bar() {
    let mut c = started(&encounter(vec![
        stage("a", 500.0, false),
        stage("Sign", 0.0, true),
        stage("b", 0.0, false),
    ]));
    strike(&mut c, 500.0);
    run_ticks(&mut c, GRACE_TICKS);
    assert!(c.vitals.spellcard && !c.vitals.full_bar_spellcard());

    // 150 of a 500 bar is not critical, although it would be against max health.
    let (outcome, fx) = strike(&mut c, 24.0 * 350.0);
    assert_eq!(c.vitals.health, 150.0);
    assert_eq!(outcome, HitOutcome::Damaged { critical: false });
    assert!(has_cue(&fx, Cue::Damage0));

    run_ticks(&mut c, 7);
    let (outcome, fx) = strike(&mut c, 24.0 * 100.0);
    assert_eq!(c.vitals.health, 50.0);
    assert_eq!(outcome, HitOutcome::Damaged { critical: true });
    assert!(has_cue(&fx, Cue::Damage1));

    let (outcome, _) = strike(&mut c, 24.0 * 100.0);
    assert_eq!(
        outcome,
        HitOutcome::Advance {
            reset: true,
            critical: true
        }
    );
    assert_eq!(c.vitals.health, c.vitals.max_health);
    assert_eq!(c.state, SchedulerState::Transitioning);

    run_ticks(&mut c, GRACE_TICKS);
    assert_eq!(c.vitals.previous_threshold, 1000.0);
}

#[test]
fn overflow_carry_records_full_bar_for_the_next_stage() {
    let mut c = started(&encounter(vec![
        stage("a", 0.0, false),
        stage("Sign", 0.0, true),
    ]));

    let (outcome, _) = strike(&mut c, 1500.0);
    assert!(matches!(outcome, HitOutcome::Advance { reset: true, .. }));
    assert_eq!(c.vitals.health, 1000.0);

    run_ticks(&mut c, GRACE_TICKS);
    assert_eq!(c.vitals.previous_threshold, 1000.0);
    assert!(c.vitals.full_bar_spellcard());
}

#[test]
fn spellcard_keeps_running_until_health_reaches_zero() {
    let mut c = started(&encounter(vec![stage("Sign", 0.0, true)]));

    strike(&mut c, 3996.0);
    assert_eq!(c.vitals.health, 1.0);
    assert_eq!(c.state, SchedulerState::Executing { emitter: 0 });
}

#[test]
fn damage_cue_is_debounced_and_critical_near_the_floor() {
    let mut c = started(&encounter(vec![stage("a", 0.0, false)]));

    let (_, first) = strike(&mut c, 10.0);
    let (_, second) = strike(&mut c, 10.0);
    assert!(has_cue(&first, Cue::Damage0));
    assert!(!has_cue(&second, Cue::Damage0));

    run_ticks(&mut c, 7);
    let (_, fx) = strike(&mut c, 830.0);
    assert_eq!(c.vitals.health, 150.0);
    assert!(has_cue(&fx, Cue::Damage1));
}

// --------------------------------------------------------------------------------------
// Defeat
// --------------------------------------------------------------------------------------

#[test]
fn defeated_boss_schedules_dialogue_then_removal() {
    let mut c = started(&encounter(vec![stage("a", 0.0, false)]));
    let (_, fx) = strike(&mut c, 1000.0);
    assert!(has_cue(&fx, Cue::BossDeath));
    assert!(!fx.contains(&BossEffect::Despawn));

    let fx = run_ticks(&mut c, 96);
    assert!(fx.contains(&BossEffect::StartDefeatDialogue));
    assert!(!fx.contains(&BossEffect::Despawn));

    let fx = run_ticks(&mut c, 32);
    assert!(fx.contains(&BossEffect::Despawn));
}

#[test]
fn midboss_leaves_quietly() {
    let mut enc = encounter(vec![stage("a", 0.0, false)]);
    enc.midboss = true;
    let mut c = started(&enc);

    let (_, fx) = strike(&mut c, 1000.0);

    assert!(fx.contains(&BossEffect::Despawn));
    assert!(fx.contains(&BossEffect::DisableCollision));
    assert!(!fx.contains(&BossEffect::Defeated));
    assert!(!has_cue(&fx, Cue::BossDeath));
    assert!(run_ticks(&mut c, 200).is_empty());
}

#[test]
fn cleared_stage_drops_its_loot_and_bonus() {
    let mut enc = encounter(vec![stage("a", 500.0, false), stage("b", 0.0, false)]);
    enc.stages[0].loot = LootTable(vec![ItemKind::BigPower, ItemKind::Point]);
    let mut c = started(&enc);

    let (_, fx) = strike(&mut c, 500.0);

    assert!(fx.contains(&BossEffect::DropLoot(LootTable(vec![
        ItemKind::BigPower,
        ItemKind::Point
    ]))));
    assert!(fx.contains(&BossEffect::AwardScore(
        Tunables::default().stage_clear_bonus
    )));
}

// --------------------------------------------------------------------------------------
// Authoring
// --------------------------------------------------------------------------------------

#[test]
fn malformed_stages_are_skipped() {
    let mut empty = stage("empty", 900.0, false);
    empty.emitters.clear();
    let enc = encounter(vec![
        empty,
        stage("a", 500.0, false),
        stage("rising", 800.0, false),
        stage("bad card", 100.0, true),
        stage("b", 0.0, false),
    ]);

    let queue = enc.stage_queue().unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.try_peek().map(|s| s.name.as_str()), Some("a"));
}

#[test]
fn stage_errors_name_the_problem() {
    let card = stage("card", 100.0, true);
    assert_eq!(
        card.validate(1000.0, 1000.0),
        Err(AuthoringError::SpellcardThreshold {
            stage: "card".into(),
            threshold: 100.0
        })
    );

    let high = stage("high", 1200.0, false);
    assert!(matches!(
        high.validate(1000.0, 1000.0),
        Err(AuthoringError::ThresholdOutOfRange { .. })
    ));
}

#[test]
fn encounter_without_playable_stage_is_rejected() {
    let mut empty = stage("empty", 0.0, false);
    empty.emitters.clear();

    assert_eq!(
        encounter(vec![empty]).stage_queue(),
        Err(AuthoringError::NoPlayableStage {
            boss: "Test".into()
        })
    );
}

#[test]
fn authored_encounter_deserialises_with_defaults() {
    let json = r#"{
        "name": "Rumia",
        "max_health": 500,
        "stages": [
            { "name": "Opening", "threshold": 250, "emitters": [{ "count": 3, "cue": "enemy_shoot1" }],
              "loot": ["big_power", "point"] },
            { "name": "Night Sign", "spellcard": true, "emitters": [{}] }
        ]
    }"#;

    let enc: BossEncounter = serde_json::from_str(json).unwrap();
    assert!(!enc.midboss);

    let queue = enc.stage_queue().unwrap();
    assert_eq!(queue.len(), 2);
    let first = queue.try_peek().unwrap();
    assert_eq!(first.emitters[0].count, 3);
    assert_eq!(first.emitters[0].cue, Cue::EnemyShoot1);
    assert_eq!(first.emitters[0].speed, PatternEmitter::default().speed);
    assert_eq!(first.loot.len(), 2);
}

// --------------------------------------------------------------------------------------
// ECS glue
// --------------------------------------------------------------------------------------

fn boss_world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(Time::<Fixed>::default());
    ensure_messages::<SpawnBoss>(&mut world);
    ensure_messages::<TriggerBossAttack>(&mut world);
    ensure_messages::<ProjectileHit>(&mut world);
    ensure_messages::<SpawnProjectile>(&mut world);
    ensure_messages::<PlayCue>(&mut world);
    ensure_messages::<ClearProjectiles>(&mut world);
    ensure_messages::<SpawnItem>(&mut world);
    ensure_messages::<AwardScore>(&mut world);
    ensure_messages::<SpellcardDeclared>(&mut world);
    ensure_messages::<BossDefeated>(&mut world);
    ensure_messages::<StartDialogue>(&mut world);
    world
}

#[test]
fn spawn_then_trigger_starts_the_attack() {
    let mut world = boss_world();
    world.write_message(SpawnBoss {
        encounter: encounter(vec![stage("a", 0.0, false)]),
        position: Vec2::new(0.0, 200.0),
    });

    run_system_once(&mut world, systems::spawn_bosses);

    let boss = world
        .query_filtered::<Entity, With<BossCombat>>()
        .single(&world)
        .unwrap();
    assert_eq!(world.get::<Combatant>(boss), Some(&Combatant::Boss));
    let layers = world.get::<CollisionLayers>(boss).unwrap();
    assert!(layers.filters.has_all(Layer::Player));
    assert!(layers.filters.has_all(Layer::PlayerBullet));
    let dialogue = drain_messages::<StartDialogue>(&mut world);
    assert_eq!(dialogue.len(), 1);
    assert_eq!(dialogue[0].scene, DialogueScene::Intro);

    world.write_message(TriggerBossAttack { boss });
    run_system_once(&mut world, systems::trigger_boss_attacks);
    assert_eq!(
        world.get::<BossCombat>(boss).unwrap().state,
        SchedulerState::Executing { emitter: 0 }
    );
}

#[test]
fn invalid_encounter_spawns_nothing() {
    let mut world = boss_world();
    world.write_message(SpawnBoss {
        encounter: encounter(Vec::new()),
        position: Vec2::ZERO,
    });

    run_system_once(&mut world, systems::spawn_bosses);

    assert_eq!(world.query::<&BossCombat>().iter(&world).count(), 0);
}

#[test]
fn boss_hit_that_clears_a_stage_writes_clear_and_score() {
    let mut world = boss_world();
    let c = started(&encounter(vec![
        stage("a", 500.0, false),
        stage("b", 0.0, false),
    ]));
    let boss = world.spawn((c, Transform::default())).id();
    let projectile = world.spawn_empty().id();

    world.write_message(ProjectileHit {
        target: boss,
        projectile,
        payload: hit(700.0),
    });
    run_system_once(&mut world, systems::resolve_boss_hits);

    assert_eq!(world.get::<BossCombat>(boss).unwrap().vitals.health, 500.0);
    assert_eq!(drain_messages::<ClearProjectiles>(&mut world).len(), 1);
    let awards = drain_messages::<AwardScore>(&mut world);
    assert_eq!(awards.len(), 1);
    assert_eq!(awards[0].base, Tunables::default().stage_clear_bonus);
}

#[test]
fn tick_fires_the_pattern_from_the_boss_position() {
    let mut world = boss_world();
    world.insert_resource(crate::common::test_utils::time_with_delta(TICK.as_secs_f32()));
    let mut enc = encounter(vec![stage("a", 0.0, false)]);
    enc.stages[0].emitters = vec![emitter(4, 0.5)];
    let boss = world
        .spawn((started(&enc), Transform::from_xyz(10.0, 150.0, 0.0)))
        .id();

    run_system_once(&mut world, systems::tick_bosses);

    let shots = drain_messages::<SpawnProjectile>(&mut world);
    assert_eq!(shots.len(), 4);
    assert!(shots.iter().all(|s| s.source == Some(boss)));
    assert!(shots.iter().all(|s| s.position == Vec2::new(10.0, 150.0)));
    assert_eq!(drain_messages::<PlayCue>(&mut world).len(), 1);
}
