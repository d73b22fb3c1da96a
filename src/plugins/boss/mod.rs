//! Boss plugin: staged health bars driving cyclic bullet patterns.
//!
//! A boss is an entity with `Combatant::Boss` and a `BossCombat` component.
//! `BossCombat` owns the health bar, the remaining stage queue, the scheduler
//! state and an `Agenda` of timed continuations. All of its transitions are pure;
//! the systems below only feed it fixed time and hits, and apply the
//! `BossEffect`s it returns.
//!
//! - `FixedUpdate` / `CombatSet::Emit`: spawn requests, attack triggers, agenda ticks.
//!   Emitter firings become `SpawnProjectile` messages consumed in `CombatSet::Spawn`.
//! - `FixedPostUpdate` / `CombatSet::Resolve`: `ProjectileHit`s aimed at bosses.
//!   A stage advance clears projectiles in `CombatSet::Cleanup` of the same tick.
//!
//! Health thresholds split the bar into stages. An ordinary stage ends when a hit
//! lands exactly on its threshold; any stage ends at zero, which refills the bar
//! for the next stage. Spellcards take reduced damage and only end at zero.

pub mod agenda;
pub mod error;
pub mod messages;
pub mod scheduler;
pub mod stage;
pub mod systems;
pub mod vitals;

use bevy::prelude::*;

use crate::common::schedule::CombatSet;

pub fn plugin(app: &mut App) {
    app.add_message::<messages::SpawnBoss>()
        .add_message::<messages::TriggerBossAttack>()
        .add_message::<messages::BossDefeated>()
        .add_message::<messages::SpellcardDeclared>()
        .add_message::<messages::StartDialogue>();

    app.add_systems(
        FixedUpdate,
        (
            systems::spawn_bosses,
            systems::trigger_boss_attacks,
            systems::tick_bosses,
        )
            .chain()
            .in_set(CombatSet::Emit),
    );
    app.add_systems(
        FixedPostUpdate,
        systems::resolve_boss_hits.in_set(CombatSet::Resolve),
    );
}

#[cfg(test)]
mod tests;
