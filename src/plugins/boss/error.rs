use thiserror::Error;

/// Problems found while turning authored encounter data into combat state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthoringError {
    #[error("stage `{stage}` has no pattern emitters")]
    EmptyStage { stage: String },

    #[error("emitter {index} of stage `{stage}` fires zero bullets")]
    EmptyPattern { stage: String, index: usize },

    #[error("stage `{stage}` has an invalid `{field}`")]
    InvalidNumber { stage: String, field: &'static str },

    #[error("stage `{stage}` threshold {threshold} lies outside 0..={max}")]
    ThresholdOutOfRange {
        stage: String,
        threshold: f32,
        max: f32,
    },

    #[error("stage `{stage}` threshold {threshold} is above the previous stage's {previous}")]
    ThresholdIncreasing {
        stage: String,
        threshold: f32,
        previous: f32,
    },

    #[error("spellcard `{stage}` has threshold {threshold}; spellcards only end at 0")]
    SpellcardThreshold { stage: String, threshold: f32 },

    #[error("encounter `{boss}` has no playable stage")]
    NoPlayableStage { boss: String },
}
