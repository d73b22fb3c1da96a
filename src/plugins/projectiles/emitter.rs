//! Pattern emitters: stateless bullet-ring templates.
//!
//! Firing is a pure function of the template, an origin, a source and the fixed
//! tick length. The caller forwards the returned volley to the message queues.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::components::{Shot, ShotOwner, ShotTemplate};
use super::messages::SpawnProjectile;
use crate::common::geometry::shot_displacement;
use crate::plugins::audio::{Cue, PlayCue, volume};
use crate::plugins::boss::error::AuthoringError;

/// Rotation that points straight down the screen.
pub const DOWNWARD: f32 = 180.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternEmitter {
    /// Bullets per firing.
    pub count: u32,
    /// Pixels per second.
    pub speed: f32,
    /// Total arc covered by the ring, in degrees.
    pub spread: f32,
    /// Added to the downward base rotation, in degrees.
    pub offset: f32,
    /// Centre the arc on the base rotation instead of starting at it.
    pub centered: bool,
    pub shot: ShotTemplate,
    pub cue: Cue,
    pub volume: f32,
    /// Seconds to wait before this emitter fires in the attack loop.
    pub delay: f32,
}

impl Default for PatternEmitter {
    fn default() -> Self {
        Self {
            count: 1,
            speed: 240.0,
            spread: 0.0,
            offset: 0.0,
            centered: true,
            shot: ShotTemplate::default(),
            cue: Cue::EnemyShoot0,
            volume: volume::PATTERN,
            delay: 0.5,
        }
    }
}

/// Everything one firing produces.
#[derive(Debug, Clone)]
pub struct Volley {
    pub shots: Vec<SpawnProjectile>,
    pub cue: PlayCue,
}

impl PatternEmitter {
    /// Spawn rotations for every slot, in slot order.
    ///
    /// A single bullet uses a step divisor of 1, so it lands on the start of the arc.
    pub fn rotations(&self) -> impl Iterator<Item = f32> + '_ {
        let base = DOWNWARD + self.offset;
        let step = self.spread / self.count.saturating_sub(1).max(1) as f32;
        let start = if self.centered {
            base - self.spread / 2.0
        } else {
            base
        };
        (0..self.count).map(move |i| start + i as f32 * step)
    }

    pub fn fire(&self, origin: Vec2, source: Option<Entity>, tick_secs: f32) -> Volley {
        let displacement = shot_displacement(self.speed, tick_secs);
        let spin = self.shot.curve * tick_secs;

        let shots = self
            .rotations()
            .map(|rotation| SpawnProjectile {
                owner: ShotOwner::Enemy,
                source,
                position: origin,
                shot: Shot::from_template(&self.shot, self.speed, rotation),
                displacement,
                spin,
            })
            .collect();

        Volley {
            shots,
            cue: PlayCue::new(self.cue, self.volume),
        }
    }

    pub fn validate(&self, stage: &str, index: usize) -> Result<(), AuthoringError> {
        if self.count == 0 {
            return Err(AuthoringError::EmptyPattern {
                stage: stage.to_owned(),
                index,
            });
        }

        let numbers = [
            ("speed", self.speed),
            ("spread", self.spread),
            ("offset", self.offset),
            ("delay", self.delay),
            ("damage", self.shot.damage),
            ("curve", self.shot.curve),
        ];
        for (field, value) in numbers {
            if !value.is_finite() {
                return Err(AuthoringError::InvalidNumber {
                    stage: stage.to_owned(),
                    field,
                });
            }
        }
        if self.delay < 0.0 {
            return Err(AuthoringError::InvalidNumber {
                stage: stage.to_owned(),
                field: "delay",
            });
        }
        Ok(())
    }
}
