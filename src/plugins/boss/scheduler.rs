//! Boss attack scheduler.
//!
//! `BossCombat` is plain data plus pure transitions. Nothing here touches the
//! `World`; every outward action is pushed as a `BossEffect` and applied by the
//! systems in `systems.rs`.
//!
//! ```text
//!   Idle --trigger_attack--> Executing(i) --fire i, wait delay[i+1]--> Executing(i+1)
//!                                 |
//!                       threshold | (hit resolution)
//!                                 v
//!                           Transitioning --next stage, grace--> Executing(0)
//!                                 |
//!                     queue empty v
//!                               Dead
//! ```

use std::time::Duration;

use bevy::prelude::*;

use super::agenda::{Agenda, Continuation, Lane};
use super::stage::{BossEncounter, StageQueue};
use super::vitals::{BossVitals, HitOutcome, HitRules};
use crate::common::combat::{HitPayload, OnHit};
use crate::common::tunables::Tunables;
use crate::plugins::audio::{Cue, PlayCue, volume};
use crate::plugins::items::LootTable;
use crate::plugins::projectiles::emitter::PatternEmitter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    /// Index of the emitter that fired last (or is about to fire first).
    Executing { emitter: usize },
    Transitioning,
    Dead,
}

/// Delays and bonuses copied from `Tunables` when the boss spawns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossTimings {
    pub stage_grace: f32,
    pub damage_cue_cooldown: f32,
    pub defeat_dialogue_delay: f32,
    pub removal_delay: f32,
    pub stage_clear_bonus: u64,
}

impl From<&Tunables> for BossTimings {
    fn from(t: &Tunables) -> Self {
        Self {
            stage_grace: t.stage_grace,
            damage_cue_cooldown: t.damage_cue_cooldown,
            defeat_dialogue_delay: t.defeat_dialogue_delay,
            removal_delay: t.boss_removal_delay,
            stage_clear_bonus: t.stage_clear_bonus,
        }
    }
}

/// Outward actions requested by the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum BossEffect {
    FirePattern(PatternEmitter),
    PlayCue(PlayCue),
    ClearProjectiles,
    DropLoot(LootTable),
    AwardScore(u64),
    SpellcardDeclared(String),
    /// Collide with nothing from now on.
    DisableCollision,
    Defeated,
    StartDefeatDialogue,
    Despawn,
}

/// Combat state of a boss. A boss is any entity that carries this component.
#[derive(Component, Debug, Clone)]
pub struct BossCombat {
    pub name: String,
    pub midboss: bool,
    pub vitals: BossVitals,
    pub stages: StageQueue,
    pub state: SchedulerState,
    pub agenda: Agenda,
    pub timings: BossTimings,
    /// Previous threshold to record when the next stage is adopted.
    carried_threshold: f32,
    cue_ready: bool,
}

impl BossCombat {
    /// Idle, invincible, with the first stage adopted against a full bar.
    pub fn new(
        encounter: &BossEncounter,
        stages: StageQueue,
        rules: HitRules,
        timings: BossTimings,
    ) -> Self {
        let mut vitals = BossVitals::new(encounter.max_health, rules);
        if let Some(first) = stages.try_peek() {
            vitals.threshold = first.threshold;
            vitals.spellcard = first.spellcard;
        }

        Self {
            name: encounter.name.clone(),
            midboss: encounter.midboss,
            vitals,
            stages,
            state: SchedulerState::Idle,
            agenda: Agenda::default(),
            timings,
            carried_threshold: encounter.max_health,
            cue_ready: true,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == SchedulerState::Dead
    }

    /// Idle → Executing. Returns false if the boss was not idle.
    pub fn trigger_attack(&mut self, fx: &mut Vec<BossEffect>) -> bool {
        if self.state != SchedulerState::Idle {
            return false;
        }
        let Some(stage) = self.stages.try_peek() else {
            self.die(fx);
            return true;
        };
        if stage.spellcard {
            fx.push(BossEffect::PlayCue(PlayCue::new(
                Cue::SpellcardDeclare,
                volume::HIGH,
            )));
            fx.push(BossEffect::SpellcardDeclared(stage.name.clone()));
        }
        self.start_loop();
        true
    }

    /// Cancel the emitter loop. Safe to call any number of times.
    pub fn stop_bullet_loop(&mut self) {
        self.agenda.cancel(Lane::AttackLoop);
    }

    fn start_loop(&mut self) {
        self.vitals.invincible = false;
        self.state = SchedulerState::Executing { emitter: 0 };
        self.stop_bullet_loop();
        self.agenda
            .schedule(Lane::AttackLoop, 0.0, Continuation::FireEmitter(0));
    }

    /// Advance fixed time by `dt` and run every continuation that came due.
    pub fn tick(&mut self, dt: Duration, fx: &mut Vec<BossEffect>) {
        for action in self.agenda.advance(dt) {
            match action {
                Continuation::FireEmitter(index) => self.fire(index, fx),
                Continuation::ResumeAttack => self.resume(fx),
                Continuation::ReleaseDamageCue => self.cue_ready = true,
                Continuation::StartDefeatDialogue => fx.push(BossEffect::StartDefeatDialogue),
                Continuation::Despawn => fx.push(BossEffect::Despawn),
            }
        }
    }

    fn fire(&mut self, index: usize, fx: &mut Vec<BossEffect>) {
        if !matches!(self.state, SchedulerState::Executing { .. }) {
            return;
        }
        let Some(stage) = self.stages.try_peek() else {
            return;
        };
        let Some(emitter) = stage.emitters.get(index) else {
            return;
        };

        fx.push(BossEffect::FirePattern(emitter.clone()));
        self.state = SchedulerState::Executing { emitter: index };

        let next = (index + 1) % stage.emitters.len();
        let delay = stage.emitters[next].delay;
        self.agenda
            .schedule(Lane::AttackLoop, delay, Continuation::FireEmitter(next));
    }

    /// Deliver a hit. Only an executing boss can be damaged.
    pub fn receive_hit(&mut self, hit: &HitPayload, fx: &mut Vec<BossEffect>) -> HitOutcome {
        if !matches!(self.state, SchedulerState::Executing { .. }) {
            return HitOutcome::Ignored;
        }

        let outcome = self.vitals.on_hit(hit);
        let critical = match outcome {
            HitOutcome::Ignored => return outcome,
            HitOutcome::Damaged { critical } | HitOutcome::Advance { critical, .. } => critical,
        };

        if self.cue_ready {
            let cue = if critical { Cue::Damage1 } else { Cue::Damage0 };
            fx.push(BossEffect::PlayCue(PlayCue::new(cue, volume::LOW)));
            self.cue_ready = false;
            self.agenda.schedule(
                Lane::CueCooldown,
                self.timings.damage_cue_cooldown,
                Continuation::ReleaseDamageCue,
            );
        }

        if let HitOutcome::Advance { reset, .. } = outcome {
            self.advance_stage(reset, fx);
        }
        outcome
    }

    /// Executing → Transitioning, then on to the next stage or to Dead.
    pub fn advance_stage(&mut self, reset: bool, fx: &mut Vec<BossEffect>) {
        if matches!(
            self.state,
            SchedulerState::Transitioning | SchedulerState::Dead
        ) {
            return;
        }
        self.state = SchedulerState::Transitioning;
        self.vitals.invincible = true;
        self.stop_bullet_loop();
        fx.push(BossEffect::ClearProjectiles);

        self.carried_threshold = if reset {
            self.vitals.max_health
        } else {
            self.vitals.threshold
        };

        if let Some(cleared) = self.stages.pop() {
            info!("boss `{}` cleared stage `{}`", self.name, cleared.name);
            if !cleared.loot.is_empty() {
                fx.push(BossEffect::DropLoot(cleared.loot));
            }
            fx.push(BossEffect::AwardScore(self.timings.stage_clear_bonus));
        }

        match self.stages.try_peek() {
            Some(next) => {
                if next.spellcard {
                    fx.push(BossEffect::PlayCue(PlayCue::new(
                        Cue::SpellcardDeclare,
                        volume::HIGH,
                    )));
                }
                self.agenda.schedule(
                    Lane::Transition,
                    self.timings.stage_grace,
                    Continuation::ResumeAttack,
                );
            }
            None => self.die(fx),
        }
    }

    /// Transitioning → Executing with the next stage adopted.
    fn resume(&mut self, fx: &mut Vec<BossEffect>) {
        if self.state != SchedulerState::Transitioning {
            return;
        }
        let Some(next) = self.stages.try_peek() else {
            self.die(fx);
            return;
        };

        self.vitals.previous_threshold = self.carried_threshold;
        self.vitals.threshold = next.threshold;
        self.vitals.spellcard = next.spellcard;
        if next.spellcard {
            info!("boss `{}` declares `{}`", self.name, next.name);
            fx.push(BossEffect::SpellcardDeclared(next.name.clone()));
        }
        self.start_loop();
    }

    fn die(&mut self, fx: &mut Vec<BossEffect>) {
        self.state = SchedulerState::Dead;
        self.vitals.dead = true;
        self.vitals.invincible = true;
        self.vitals.health = 0.0;
        self.stop_bullet_loop();
        self.agenda.cancel(Lane::Transition);
        fx.push(BossEffect::DisableCollision);

        if self.midboss {
            fx.push(BossEffect::Despawn);
            return;
        }

        info!("boss `{}` defeated", self.name);
        fx.push(BossEffect::PlayCue(PlayCue::new(Cue::BossDeath, volume::FULL)));
        fx.push(BossEffect::Defeated);
        self.agenda.schedule(
            Lane::Aftermath,
            self.timings.defeat_dialogue_delay,
            Continuation::StartDefeatDialogue,
        );
        self.agenda.schedule(
            Lane::Aftermath,
            self.timings.removal_delay,
            Continuation::Despawn,
        );
    }
}
