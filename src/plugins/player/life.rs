//! Player life cycle: hits, the deathbomb window, bombs and respawn.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::messages::{AwardScore, PlayerDied};
use super::stats::PlayerStats;
use super::{Player, PlayerInput};
use crate::common::combat::Combatant;
use crate::common::session::Session;
use crate::common::tunables::Tunables;
use crate::plugins::audio::{Cue, PlayCue, volume};
use crate::plugins::items::{CollectAllItems, ItemCollected, ItemKind, SpawnItem};
use crate::plugins::projectiles::messages::{ClearProjectiles, Grazed, ProjectileHit};

const DEATH_DROPS: usize = 3;
const DEATH_DROP_SPREAD: f32 = 32.0;
const DEATH_DROP_LAUNCH: f32 = 12.0;

#[derive(Component, Debug, Clone)]
pub enum PlayerLife {
    Vulnerable,
    /// Hit. Bombing before the timer runs out cancels the death.
    Dying(Timer),
    /// Invulnerable after losing a life.
    Respawning(Timer),
    /// Invulnerable while a bomb is active.
    Bombing(Timer),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeEvent {
    None,
    Died,
    Recovered,
}

impl PlayerLife {
    #[inline]
    pub fn is_vulnerable(&self) -> bool {
        matches!(self, PlayerLife::Vulnerable)
    }

    #[inline]
    pub fn can_bomb(&self) -> bool {
        matches!(self, PlayerLife::Vulnerable | PlayerLife::Dying(_))
    }

    #[inline]
    pub fn can_shoot(&self) -> bool {
        !matches!(self, PlayerLife::Dying(_))
    }

    /// Returns true if the hit opened a deathbomb window.
    pub fn hit(&mut self, deathbomb_window: f32) -> bool {
        if !self.is_vulnerable() {
            return false;
        }
        *self = PlayerLife::Dying(Timer::from_seconds(deathbomb_window, TimerMode::Once));
        true
    }

    /// Returns true if the bomb went off.
    pub fn bomb(&mut self, duration: f32) -> bool {
        if !self.can_bomb() {
            return false;
        }
        *self = PlayerLife::Bombing(Timer::from_seconds(duration, TimerMode::Once));
        true
    }

    pub fn tick(&mut self, dt: std::time::Duration, respawn_invulnerability: f32) -> LifeEvent {
        match self {
            PlayerLife::Vulnerable => LifeEvent::None,
            PlayerLife::Dying(timer) => {
                if timer.tick(dt).is_finished() {
                    *self = PlayerLife::Respawning(Timer::from_seconds(
                        respawn_invulnerability,
                        TimerMode::Once,
                    ));
                    LifeEvent::Died
                } else {
                    LifeEvent::None
                }
            }
            PlayerLife::Respawning(timer) | PlayerLife::Bombing(timer) => {
                if timer.tick(dt).is_finished() {
                    *self = PlayerLife::Vulnerable;
                    LifeEvent::Recovered
                } else {
                    LifeEvent::None
                }
            }
        }
    }
}

/// Where a player reappears after losing a life.
pub fn respawn_point(tunables: &Tunables) -> Vec2 {
    Vec2::new(0.0, -tunables.view_half_height * 0.75)
}

/// Enemy shots and enemy bodies that touch a vulnerable player open the deathbomb window.
pub(crate) fn resolve_player_hits(
    tunables: Res<Tunables>,
    mut hits: MessageReader<ProjectileHit>,
    mut contacts: MessageReader<CollisionStart>,
    q_enemies: Query<&Combatant>,
    mut q_player: Query<&mut PlayerLife, With<Player>>,
    mut cues: MessageWriter<PlayCue>,
) {
    let shot_targets = hits.read().map(|hit| hit.target);
    let body_targets = contacts.read().filter_map(|ev| {
        let a = ev.body1.unwrap_or(ev.collider1);
        let b = ev.body2.unwrap_or(ev.collider2);
        let hostile = |e: Entity| {
            matches!(
                q_enemies.get(e),
                Ok(Combatant::Enemy | Combatant::Boss)
            )
        };
        if q_player.contains(a) && hostile(b) {
            Some(a)
        } else if q_player.contains(b) && hostile(a) {
            Some(b)
        } else {
            None
        }
    });
    let targets: Vec<Entity> = shot_targets.chain(body_targets).collect();

    for target in targets {
        let Ok(mut life) = q_player.get_mut(target) else {
            continue;
        };
        if life.hit(tunables.deathbomb_window) {
            debug!("player hit, deathbomb window open");
            cues.write(PlayCue::new(Cue::PlayerDeath, volume::HIGH));
        }
    }
}

pub(crate) fn use_bomb(
    tunables: Res<Tunables>,
    mut input: ResMut<PlayerInput>,
    mut stats: ResMut<PlayerStats>,
    mut q_player: Query<&mut PlayerLife, With<Player>>,
    mut clear: MessageWriter<ClearProjectiles>,
    mut collect: MessageWriter<CollectAllItems>,
    mut cues: MessageWriter<PlayCue>,
) {
    if !std::mem::take(&mut input.bomb) {
        return;
    }
    let Ok(mut life) = q_player.single_mut() else {
        return;
    };
    if stats.bombs <= 0 {
        return;
    }

    let deathbomb = matches!(*life, PlayerLife::Dying(_));
    if !life.bomb(tunables.bomb_duration) {
        return;
    }
    stats.bombs -= 1;
    if deathbomb {
        info!("deathbomb");
    }

    clear.write(ClearProjectiles {
        include_player_owned: false,
        award_score: true,
    });
    collect.write(CollectAllItems);
    cues.write(PlayCue::new(Cue::MasterSpark, volume::FULL));
}

pub(crate) fn tick_player_life(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut stats: ResMut<PlayerStats>,
    mut q_player: Query<(Entity, &mut PlayerLife, &mut Transform), With<Player>>,
    mut items: MessageWriter<SpawnItem>,
    mut died: MessageWriter<PlayerDied>,
) {
    for (player, mut life, mut tf) in &mut q_player {
        if life.tick(time.delta(), tunables.respawn_invulnerability) != LifeEvent::Died {
            continue;
        }

        stats.lives -= 1;
        stats.add_power(-1.0);
        let at = tf.translation.truncate();
        for _ in 0..DEATH_DROPS {
            items.write(SpawnItem {
                launch: Some(DEATH_DROP_LAUNCH),
                ..SpawnItem::scattered(ItemKind::BigPower, at, DEATH_DROP_SPREAD)
            });
        }

        let spawn = respawn_point(&tunables);
        tf.translation.x = spawn.x;
        tf.translation.y = spawn.y;

        info!("player died, {} lives left", stats.lives);
        died.write(PlayerDied {
            player,
            lives_left: stats.lives,
        });
    }
}

pub(crate) fn count_grazes(
    mut grazes: MessageReader<Grazed>,
    mut stats: ResMut<PlayerStats>,
    mut cues: MessageWriter<PlayCue>,
) {
    for _ in grazes.read() {
        stats.graze += 1;
        cues.write(PlayCue::new(Cue::Graze, volume::LOW));
    }
}

pub(crate) fn collect_items(
    session: Res<Session>,
    mut collected: MessageReader<ItemCollected>,
    mut stats: ResMut<PlayerStats>,
    mut cues: MessageWriter<PlayCue>,
) {
    for pickup in collected.read() {
        let (base, played) = stats.collect(pickup.kind);
        stats.add_score(session.scaled(base));
        for cue in played {
            cues.write(PlayCue::new(cue, volume::NORMAL));
        }
    }
}

/// Every score award goes through the session multiplier.
pub(crate) fn apply_score(
    mut awards: MessageReader<AwardScore>,
    session: Res<Session>,
    mut stats: ResMut<PlayerStats>,
) {
    for award in awards.read() {
        stats.add_score(session.scaled(award.base));
    }
}
