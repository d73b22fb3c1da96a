use bevy::prelude::*;

/// Add points to the player's score. The session point multiplier is applied on receipt.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AwardScore {
    pub base: u64,
}

impl AwardScore {
    pub fn new(base: u64) -> Self {
        Self { base }
    }
}

/// The deathbomb window closed without a bomb.
#[derive(Message, Clone, Copy, Debug)]
pub struct PlayerDied {
    pub player: Entity,
    pub lives_left: i32,
}
