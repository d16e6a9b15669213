//! # Natori Core
//!
//! Emotion side of the virtual-streamer pipeline: the keyword [`Lexicon`],
//! the [`EmotionClassifier`] that turns a bot reply into a
//! [`ClassificationResult`], and the contracts of the external collaborators
//! (avatar renderer, speech engine, reply backend).
//!
//! Classification is pure and needs no live avatar; applying a result to
//! the avatar lives in `natori_expression`.

pub mod avatar;
pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod emotion;
pub mod error;
pub mod lexicon;
pub mod persona;

pub use avatar::{AvatarAssets, AvatarCapability};
pub use classifier::{
    ClassificationResult, EmotionClassifier, EmotionScore, Fallback, KeywordMatch,
};
pub use config::NatoriConfig;
pub use emotion::EmotionLabel;
pub use error::LexiconError;
pub use lexicon::{Lexicon, LexiconEntry, LexiconStats};
pub use persona::Persona;

use async_trait::async_trait;

/// Produces the bot's reply for a user utterance (a generative backend).
#[async_trait]
pub trait ReplySource: Send + Sync {
    async fn reply(&self, message: &str) -> anyhow::Result<String>;
}

/// Sink for speech start/end signals, whichever engine produced them.
pub trait SpeechSignals: Send + Sync {
    fn speech_started(&self, engine_id: &str);
    fn speech_ended(&self);
}
