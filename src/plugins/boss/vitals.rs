//! Boss health bar and hit resolution.

use crate::common::combat::{HitPayload, OnHit};
use crate::common::tunables::Tunables;

/// Damage scaling rules, copied from `Tunables` when the boss spawns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRules {
    pub full_bar_spellcard_divisor: f32,
    pub sub_bar_spellcard_divisor: f32,
    /// Fraction of the phase range that counts as critical.
    pub critical_fraction: f32,
}

impl From<&Tunables> for HitRules {
    fn from(t: &Tunables) -> Self {
        Self {
            full_bar_spellcard_divisor: t.full_bar_spellcard_divisor,
            sub_bar_spellcard_divisor: t.sub_bar_spellcard_divisor,
            critical_fraction: t.critical_fraction,
        }
    }
}

impl Default for HitRules {
    fn default() -> Self {
        Self::from(&Tunables::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invincible or dead: nothing changed.
    Ignored,
    Damaged { critical: bool },
    /// The stage is over. `reset` is true for the overflow carry at zero.
    Advance { reset: bool, critical: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BossVitals {
    pub health: f32,
    pub max_health: f32,
    /// Health at which the active stage ends.
    pub threshold: f32,
    /// Threshold of the stage before this one, or max health after a reset.
    pub previous_threshold: f32,
    pub spellcard: bool,
    pub invincible: bool,
    pub dead: bool,
    pub rules: HitRules,
}

impl BossVitals {
    pub fn new(max_health: f32, rules: HitRules) -> Self {
        Self {
            health: max_health,
            max_health,
            threshold: 0.0,
            previous_threshold: max_health,
            spellcard: false,
            invincible: true,
            dead: false,
            rules,
        }
    }

    /// A spellcard that started with the bar full.
    #[inline]
    pub fn full_bar_spellcard(&self) -> bool {
        self.spellcard && self.previous_threshold >= self.max_health
    }

    /// Lowest health a single hit may leave.
    #[inline]
    pub fn floor(&self) -> f32 {
        if self.full_bar_spellcard() {
            0.0
        } else {
            self.threshold
        }
    }

    /// Top of the current phase, used for the critical-cue range.
    #[inline]
    pub fn ceiling(&self) -> f32 {
        if self.spellcard && !self.full_bar_spellcard() {
            self.previous_threshold
        } else {
            self.max_health
        }
    }

    #[inline]
    fn scaled_damage(&self, damage: f32) -> f32 {
        let damage = damage.max(0.0);
        match (self.spellcard, self.full_bar_spellcard()) {
            (true, true) => damage / self.rules.full_bar_spellcard_divisor,
            (true, false) => damage / self.rules.sub_bar_spellcard_divisor,
            _ => damage,
        }
    }

    #[inline]
    fn is_critical(&self, health: f32) -> bool {
        let floor = self.floor();
        let range = self.ceiling() - floor;
        health - floor < range * self.rules.critical_fraction
    }

    /// Apply `damage` and decide what the hit means for the stage.
    ///
    /// Health is clamped to `[floor, max]` first; the advance checks compare the
    /// clamped value exactly. An advancing hit makes the boss invincible at once, so
    /// later hits in the same tick are ignored.
    pub fn apply_damage(&mut self, damage: f32) -> HitOutcome {
        if self.invincible || self.dead {
            return HitOutcome::Ignored;
        }

        let result = (self.health - self.scaled_damage(damage)).clamp(self.floor(), self.max_health);
        let critical = self.is_critical(result);

        if result == 0.0 {
            self.health = self.max_health;
            self.invincible = true;
            return HitOutcome::Advance {
                reset: true,
                critical,
            };
        }

        self.health = result;
        if result == self.threshold && !self.spellcard {
            self.invincible = true;
            return HitOutcome::Advance {
                reset: false,
                critical,
            };
        }
        HitOutcome::Damaged { critical }
    }
}

impl OnHit for BossVitals {
    type Outcome = HitOutcome;

    fn on_hit(&mut self, hit: &HitPayload) -> HitOutcome {
        self.apply_damage(hit.damage)
    }
}
