//! Audio cues.
//!
//! The combat core never plays sound itself. It writes `PlayCue` messages; this
//! plugin resolves each cue to a clip name and volume and queues it in
//! `CuePlayback`, which the audio backend drains every frame.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Every sound effect the combat core can ask for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Cue {
    #[default]
    Ok,
    Cancel,
    Select,
    Pause,
    PowerUp,
    Extend,
    ItemPickup,
    MasterSpark,
    PlayerDeath,
    BossDeath,
    EnemyDeath,
    PlayerShoot,
    Damage0,
    Damage1,
    EnemyShoot0,
    EnemyShoot1,
    EnemyShoot2,
    Graze,
    SpellcardDeclare,
}

impl Cue {
    pub const ALL: [Cue; 19] = [
        Cue::Ok,
        Cue::Cancel,
        Cue::Select,
        Cue::Pause,
        Cue::PowerUp,
        Cue::Extend,
        Cue::ItemPickup,
        Cue::MasterSpark,
        Cue::PlayerDeath,
        Cue::BossDeath,
        Cue::EnemyDeath,
        Cue::PlayerShoot,
        Cue::Damage0,
        Cue::Damage1,
        Cue::EnemyShoot0,
        Cue::EnemyShoot1,
        Cue::EnemyShoot2,
        Cue::Graze,
        Cue::SpellcardDeclare,
    ];

    /// Identifier used in authored data.
    pub fn id(self) -> &'static str {
        match self {
            Cue::Ok => "ok",
            Cue::Cancel => "cancel",
            Cue::Select => "select",
            Cue::Pause => "pause",
            Cue::PowerUp => "power_up",
            Cue::Extend => "extend",
            Cue::ItemPickup => "item_pickup",
            Cue::MasterSpark => "master_spark",
            Cue::PlayerDeath => "player_death",
            Cue::BossDeath => "boss_death",
            Cue::EnemyDeath => "enemy_death",
            Cue::PlayerShoot => "player_shoot",
            Cue::Damage0 => "damage0",
            Cue::Damage1 => "damage1",
            Cue::EnemyShoot0 => "enemy_shoot0",
            Cue::EnemyShoot1 => "enemy_shoot1",
            Cue::EnemyShoot2 => "enemy_shoot2",
            Cue::Graze => "graze",
            Cue::SpellcardDeclare => "spellcard_declare",
        }
    }

    /// Clip file name the backend looks up.
    pub fn clip(self) -> &'static str {
        match self {
            Cue::Ok => "se_ok00",
            Cue::Cancel => "se_cancel00",
            Cue::Select => "se_select00",
            Cue::Pause => "se_pause",
            Cue::PowerUp => "se_powerup",
            Cue::Extend => "se_extend",
            Cue::ItemPickup => "se_item00",
            Cue::MasterSpark => "se_nep00",
            Cue::PlayerDeath => "se_pldead00",
            Cue::BossDeath => "se_enep01",
            Cue::EnemyDeath => "se_enep00",
            Cue::PlayerShoot => "se_plst00",
            Cue::Damage0 => "se_damage00",
            Cue::Damage1 => "se_damage01",
            Cue::EnemyShoot0 => "se_tan00",
            Cue::EnemyShoot1 => "se_tan01",
            Cue::EnemyShoot2 => "se_tan02",
            Cue::Graze => "se_graze",
            Cue::SpellcardDeclare => "se_cat00",
        }
    }

    /// Parse an authored identifier. Unknown ids fall back to the default cue.
    pub fn parse_or_default(id: &str) -> Cue {
        match Cue::ALL.iter().copied().find(|c| c.id() == id) {
            Some(cue) => cue,
            None => {
                warn!("unknown cue id {id:?}, using {:?}", Cue::default());
                Cue::default()
            }
        }
    }
}

impl From<String> for Cue {
    fn from(id: String) -> Self {
        Cue::parse_or_default(&id)
    }
}

impl From<Cue> for String {
    fn from(cue: Cue) -> Self {
        cue.id().to_owned()
    }
}

/// Relative loudness used by callers; multiplied by the master SFX volume.
pub mod volume {
    pub const LOW: f32 = 0.35;
    pub const NORMAL: f32 = 0.5;
    pub const PATTERN: f32 = 0.4;
    pub const HIGH: f32 = 0.6;
    pub const FULL: f32 = 1.0;
}

/// Fire-and-forget playback request.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct PlayCue {
    pub cue: Cue,
    pub volume: f32,
}

impl PlayCue {
    pub fn new(cue: Cue, volume: f32) -> Self {
        Self { cue, volume }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct AudioSettings {
    pub sfx_master_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { sfx_master_volume: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueuedClip {
    pub cue: Cue,
    pub clip: &'static str,
    pub volume: f32,
}

/// Clips waiting for the audio backend.
#[derive(Resource, Debug, Default)]
pub struct CuePlayback {
    pub queued: Vec<QueuedClip>,
}

impl CuePlayback {
    pub fn drain(&mut self) -> impl Iterator<Item = QueuedClip> + '_ {
        self.queued.drain(..)
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<AudioSettings>()
        .init_resource::<CuePlayback>()
        .add_message::<PlayCue>()
        .add_systems(PostUpdate, dispatch_cues);
}

/// Resolve cue requests into backend clips.
fn dispatch_cues(
    settings: Res<AudioSettings>,
    mut playback: ResMut<CuePlayback>,
    mut reader: MessageReader<PlayCue>,
) {
    for req in reader.read() {
        let volume = (req.volume * settings.sfx_master_volume).clamp(0.0, 1.0);
        debug!("cue {:?} -> {} @ {volume:.2}", req.cue, req.cue.clip());
        playback.queued.push(QueuedClip { cue: req.cue, clip: req.cue.clip(), volume });
    }
}
