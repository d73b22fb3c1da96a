//! Player resources and the item economy.

use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::audio::Cue;
use crate::plugins::items::ItemKind;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub lives: i32,
    pub bombs: i32,
    pub power: f32,
    pub max_power: f32,
    pub points: u32,
    pub graze: u32,
    pub score: u64,
    /// Seeded from the session; follows the score once it is beaten.
    pub hi_score: u64,
}

impl PlayerStats {
    pub fn new(tunables: &Tunables) -> Self {
        Self {
            lives: tunables.player_lives,
            bombs: tunables.player_bombs,
            power: 0.0,
            max_power: tunables.player_max_power,
            points: 0,
            graze: 0,
            score: 0,
            hi_score: 0,
        }
    }

    pub fn with_hi_score(self, hi_score: u64) -> Self {
        Self { hi_score, ..self }
    }

    /// Add already-scaled points to the score.
    #[inline]
    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        self.hi_score = self.hi_score.max(self.score);
    }

    /// Add power, clamped to `[0, max]`. Returns true when the whole-number level went up.
    pub fn add_power(&mut self, amount: f32) -> bool {
        let before = self.power;
        self.power = (self.power + amount).clamp(0.0, self.max_power);
        (before as i32) < (self.power as i32)
    }

    /// Apply an item pickup. Returns the base score to award and the cues to play.
    pub fn collect(&mut self, kind: ItemKind) -> (u64, Vec<Cue>) {
        let mut cues = Vec::with_capacity(2);
        let base = match kind {
            ItemKind::SmallPower => {
                self.power_up(0.01, &mut cues);
                cues.push(Cue::ItemPickup);
                100
            }
            ItemKind::BigPower => {
                self.power_up(0.05, &mut cues);
                cues.push(Cue::ItemPickup);
                1000
            }
            ItemKind::Point => {
                self.points += 1;
                cues.push(Cue::ItemPickup);
                10_000
            }
            ItemKind::Bomb => {
                self.bombs += 1;
                cues.push(Cue::Extend);
                1000
            }
            ItemKind::Life => {
                self.lives += 1;
                cues.push(Cue::Extend);
                1000
            }
            ItemKind::FullPower => {
                self.power_up(self.max_power, &mut cues);
                5000
            }
        };
        (base, cues)
    }

    fn power_up(&mut self, amount: f32, cues: &mut Vec<Cue>) {
        if self.add_power(amount) {
            cues.push(Cue::PowerUp);
        }
    }
}
