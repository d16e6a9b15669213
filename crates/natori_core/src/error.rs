use crate::emotion::EmotionLabel;
use thiserror::Error;

/// Errors raised when building or mutating a lexicon.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexiconError {
    #[error("unknown emotion label: '{0}'")]
    UnknownLabel(String),

    #[error("invalid keyword input: {0}")]
    InvalidInput(String),

    #[error("lexicon has no entry for '{0}'")]
    MissingLabel(EmotionLabel),

    #[error("lexicon has more than one entry for '{0}'")]
    DuplicateLabel(EmotionLabel),

    #[error("intensity for '{label}' must be in (0, 1], got {value}")]
    InvalidIntensity { label: EmotionLabel, value: f32 },

    #[error("priority '{name}' for '{label}' is not one of its candidates")]
    PriorityNotCandidate { label: EmotionLabel, name: String },
}
