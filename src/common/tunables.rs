//! Tunable gameplay constants.
//!
//! Everything here is plain data with serde defaults, so an external loader can
//! override a subset of fields and keep the rest.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    /// Fixed simulation rate. Every timer in combat advances by this tick.
    pub tick_hz: f64,

    // Player
    pub player_speed: f32,
    pub player_focus_speed: f32,
    pub player_hitbox_radius: f32,
    pub graze_radius: f32,
    pub player_shot_speed: f32,
    pub player_shot_damage: f32,
    pub player_shot_interval: f32,
    pub player_lives: i32,
    pub player_bombs: i32,
    pub player_max_power: f32,
    pub deathbomb_window: f32,
    pub respawn_invulnerability: f32,
    pub bomb_duration: f32,

    // Playfield (half extents around the origin, in pixels)
    pub view_half_width: f32,
    pub view_half_height: f32,
    pub cull_margin: f32,
    pub offscreen_grace: f32,

    // Boss encounter timing
    pub stage_grace: f32,
    pub damage_cue_cooldown: f32,
    pub defeat_dialogue_delay: f32,
    pub boss_removal_delay: f32,

    // Hit resolution
    pub full_bar_spellcard_divisor: f32,
    pub sub_bar_spellcard_divisor: f32,
    pub critical_fraction: f32,

    // Economy
    pub cleared_shot_score: u64,
    pub stage_clear_bonus: u64,
    pub item_gravity: f32,
    pub item_homing_accel: f32,
    pub item_spread_impulse: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            tick_hz: 64.0,

            player_speed: 420.0,
            player_focus_speed: 180.0,
            player_hitbox_radius: 3.0,
            graze_radius: 24.0,
            player_shot_speed: 1200.0,
            player_shot_damage: 1.0,
            player_shot_interval: 0.07,
            player_lives: 3,
            player_bombs: 3,
            player_max_power: 4.0,
            deathbomb_window: 0.2,
            respawn_invulnerability: 5.0,
            bomb_duration: 3.0,

            view_half_width: 384.0,
            view_half_height: 448.0,
            cull_margin: 96.0,
            offscreen_grace: 0.5,

            stage_grace: 3.0,
            damage_cue_cooldown: 0.1,
            defeat_dialogue_delay: 1.5,
            boss_removal_delay: 2.0,

            full_bar_spellcard_divisor: 4.0,
            sub_bar_spellcard_divisor: 24.0,
            critical_fraction: 0.2,

            cleared_shot_score: 100,
            stage_clear_bonus: 10_000,
            item_gravity: 240.0,
            item_homing_accel: 4000.0,
            item_spread_impulse: 50.0,
        }
    }
}

impl Tunables {
    /// The region the camera shows.
    pub fn view_rect(&self) -> Rect {
        Rect::from_center_half_size(
            Vec2::ZERO,
            Vec2::new(self.view_half_width, self.view_half_height),
        )
    }

    /// Anything outside this region is removed from the world.
    pub fn cull_rect(&self) -> Rect {
        Rect::from_center_half_size(
            Vec2::ZERO,
            Vec2::new(
                self.view_half_width + self.cull_margin,
                self.view_half_height + self.cull_margin,
            ),
        )
    }
}
