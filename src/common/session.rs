//! Session inputs owned by the outer game (menus, save data).
//!
//! The combat core only reads these.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Lunatic,
    Extra,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageNumber {
    #[default]
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Extra,
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub difficulty: Difficulty,
    pub stage: StageNumber,
    pub point_multiplier: f32,
    pub hi_score: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            stage: StageNumber::One,
            point_multiplier: 1.0,
            hi_score: 0,
        }
    }
}

impl Session {
    /// Base score scaled by the point multiplier.
    #[inline]
    pub fn scaled(&self, base: u64) -> u64 {
        (base as f64 * self.point_multiplier.max(0.0) as f64) as u64
    }
}
