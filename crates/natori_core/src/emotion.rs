//! The closed set of emotion labels the avatar can display.

use crate::error::LexiconError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete emotion tag produced by the classifier.
///
/// The set is closed: new emotional vocabulary is added by extending a
/// label's lexicon entry, not by adding labels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Happy,
    Surprised,
    Sad,
    Angry,
    #[default]
    Neutral,
    Excited,
    Thinking,
}

impl EmotionLabel {
    /// All labels in canonical lexicon order.
    pub const ALL: [EmotionLabel; 7] = [
        EmotionLabel::Happy,
        EmotionLabel::Surprised,
        EmotionLabel::Sad,
        EmotionLabel::Angry,
        EmotionLabel::Neutral,
        EmotionLabel::Excited,
        EmotionLabel::Thinking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Surprised => "surprised",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Neutral => "neutral",
            Self::Excited => "excited",
            Self::Thinking => "thinking",
        }
    }

    /// Negative labels whose keywords veto the exclamation fallback.
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::Sad | Self::Angry)
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionLabel {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == needle)
            .ok_or_else(|| LexiconError::UnknownLabel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_label() {
        for label in EmotionLabel::ALL {
            assert_eq!(label.as_str().parse::<EmotionLabel>().unwrap(), label);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(" Happy ".parse::<EmotionLabel>().unwrap(), EmotionLabel::Happy);
    }

    #[test]
    fn test_parse_unknown_label() {
        let err = "bored".parse::<EmotionLabel>().unwrap_err();
        assert!(matches!(err, LexiconError::UnknownLabel(ref s) if s == "bored"));
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&EmotionLabel::Thinking).unwrap();
        assert_eq!(json, "\"thinking\"");
        let back: EmotionLabel = serde_json::from_str("\"surprised\"").unwrap();
        assert_eq!(back, EmotionLabel::Surprised);
    }

    #[test]
    fn test_default_is_neutral() {
        assert_eq!(EmotionLabel::default(), EmotionLabel::Neutral);
    }
}
