//! Per-boss scheduled continuations.
//!
//! Every delayed step of a boss fight is an entry here, ticked by the fixed clock,
//! so pausing the fixed schedule freezes them. Entries live in lanes; cancelling a
//! lane drops everything in it and is a no-op when the lane is empty.

use std::time::Duration;

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    /// The cyclic emitter loop. Cancelled by `stop_bullet_loop`.
    AttackLoop,
    /// Grace period between stages.
    Transition,
    /// Damage cue debounce.
    CueCooldown,
    /// Post-defeat dialogue and removal.
    Aftermath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    FireEmitter(usize),
    ResumeAttack,
    ReleaseDamageCue,
    StartDefeatDialogue,
    Despawn,
}

#[derive(Debug, Clone)]
struct Scheduled {
    lane: Lane,
    timer: Timer,
    action: Continuation,
}

#[derive(Debug, Clone, Default)]
pub struct Agenda {
    pending: Vec<Scheduled>,
}

impl Agenda {
    /// Queue `action` to run once `delay_secs` of fixed time has passed.
    ///
    /// Entries are only ticked by later calls to `advance`, so even a zero delay
    /// runs on the next fixed tick at the earliest.
    pub fn schedule(&mut self, lane: Lane, delay_secs: f32, action: Continuation) {
        self.pending.push(Scheduled {
            lane,
            timer: Timer::from_seconds(delay_secs.max(0.0), TimerMode::Once),
            action,
        });
    }

    /// Drop every entry in `lane`. Returns how many were dropped.
    pub fn cancel(&mut self, lane: Lane) -> usize {
        let before = self.pending.len();
        self.pending.retain(|s| s.lane != lane);
        before - self.pending.len()
    }

    pub fn is_scheduled(&self, lane: Lane) -> bool {
        self.pending.iter().any(|s| s.lane == lane)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Tick every entry and return the ones that came due, in scheduling order.
    pub fn advance(&mut self, dt: Duration) -> Vec<Continuation> {
        let mut due = Vec::new();
        self.pending.retain_mut(|s| {
            s.timer.tick(dt);
            if s.timer.is_finished() {
                due.push(s.action);
                false
            } else {
                true
            }
        });
        due
    }
}
