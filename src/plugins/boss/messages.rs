use bevy::prelude::*;

use super::stage::BossEncounter;

/// Spawn a boss from authored data. Invalid encounters are logged and dropped.
#[derive(Message, Clone, Debug)]
pub struct SpawnBoss {
    pub encounter: BossEncounter,
    pub position: Vec2,
}

/// Start an idle boss's attack loop (usually sent when the intro dialogue ends).
#[derive(Message, Clone, Copy, Debug)]
pub struct TriggerBossAttack {
    pub boss: Entity,
}

#[derive(Message, Clone, Debug)]
pub struct BossDefeated {
    pub boss: Entity,
    pub name: String,
}

/// A spellcard stage became active. Carries the card name for the banner.
#[derive(Message, Clone, Debug)]
pub struct SpellcardDeclared {
    pub boss: Entity,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueScene {
    Intro,
    Outro,
}

/// Hand control to the dialogue system.
#[derive(Message, Clone, Copy, Debug)]
pub struct StartDialogue {
    pub boss: Entity,
    pub scene: DialogueScene,
}
