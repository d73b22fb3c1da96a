//! Authored encounter data and its validation into a playable stage queue.

use std::collections::VecDeque;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::AuthoringError;
use crate::plugins::items::LootTable;
use crate::plugins::projectiles::emitter::PatternEmitter;

/// One health bar segment of a boss fight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackStage {
    /// Display name. Spellcards announce it when declared.
    pub name: String,
    /// Fired cyclically, in order, while the stage is active.
    pub emitters: Vec<PatternEmitter>,
    /// Health at which the stage ends.
    pub threshold: f32,
    pub spellcard: bool,
    /// Dropped at the boss position when the stage is cleared.
    pub loot: LootTable,
}

impl Default for AttackStage {
    fn default() -> Self {
        Self {
            name: "Nonspell".to_owned(),
            emitters: Vec::new(),
            threshold: 0.0,
            spellcard: false,
            loot: LootTable::default(),
        }
    }
}

impl AttackStage {
    /// Check a stage in isolation against the boss's health bar and the previous
    /// accepted threshold.
    pub fn validate(&self, max_health: f32, previous: f32) -> Result<(), AuthoringError> {
        if self.emitters.is_empty() {
            return Err(AuthoringError::EmptyStage {
                stage: self.name.clone(),
            });
        }
        for (index, emitter) in self.emitters.iter().enumerate() {
            emitter.validate(&self.name, index)?;
        }

        if !self.threshold.is_finite() {
            return Err(AuthoringError::InvalidNumber {
                stage: self.name.clone(),
                field: "threshold",
            });
        }
        if self.threshold < 0.0 || self.threshold > max_health {
            return Err(AuthoringError::ThresholdOutOfRange {
                stage: self.name.clone(),
                threshold: self.threshold,
                max: max_health,
            });
        }
        if self.threshold > previous {
            return Err(AuthoringError::ThresholdIncreasing {
                stage: self.name.clone(),
                threshold: self.threshold,
                previous,
            });
        }
        if self.spellcard && self.threshold > 0.0 {
            return Err(AuthoringError::SpellcardThreshold {
                stage: self.name.clone(),
                threshold: self.threshold,
            });
        }
        Ok(())
    }
}

/// A complete boss: health bar plus the stages that consume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossEncounter {
    pub name: String,
    pub max_health: f32,
    /// Midbosses start attacking on spawn and leave without a death cue or dialogue.
    pub midboss: bool,
    pub stages: Vec<AttackStage>,
}

impl Default for BossEncounter {
    fn default() -> Self {
        Self {
            name: "Boss".to_owned(),
            max_health: 1000.0,
            midboss: false,
            stages: Vec::new(),
        }
    }
}

impl BossEncounter {
    /// Validate every stage and keep the playable ones, in order.
    ///
    /// A malformed stage is logged and skipped. Fails only when nothing playable is left.
    pub fn stage_queue(&self) -> Result<StageQueue, AuthoringError> {
        if !self.max_health.is_finite() || self.max_health <= 0.0 {
            return Err(AuthoringError::InvalidNumber {
                stage: self.name.clone(),
                field: "max_health",
            });
        }

        let mut accepted = VecDeque::with_capacity(self.stages.len());
        let mut previous = self.max_health;
        for stage in &self.stages {
            match stage.validate(self.max_health, previous) {
                Ok(()) => {
                    previous = stage.threshold;
                    accepted.push_back(stage.clone());
                }
                Err(err) => warn!("boss `{}`: skipping stage: {err}", self.name),
            }
        }

        if accepted.is_empty() {
            return Err(AuthoringError::NoPlayableStage {
                boss: self.name.clone(),
            });
        }
        if previous > 0.0 {
            warn!(
                "boss `{}`: last stage ends at {previous}, the boss dies there",
                self.name
            );
        }
        Ok(StageQueue(accepted))
    }
}

/// Remaining stages, consumed front to back and never re-added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageQueue(VecDeque<AttackStage>);

impl StageQueue {
    /// Optimistic peek at the active stage. `None` means the fight is over.
    #[inline]
    pub fn try_peek(&self) -> Option<&AttackStage> {
        self.0.front()
    }

    #[inline]
    pub fn pop(&mut self) -> Option<AttackStage> {
        self.0.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
