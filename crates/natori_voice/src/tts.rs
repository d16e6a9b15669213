//! Text-to-Speech (TTS) trait definition

use anyhow::Result;
use async_trait::async_trait;
use natori_core::EmotionLabel;
use std::time::Duration;

/// Encoding of a synthesized clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    #[default]
    Wav,
    Mp3,
    /// Raw PCM
    Pcm { sample_rate: u32, channels: u8 },
}

/// Synthesized audio ready for playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub data: Vec<u8>,
    pub format: AudioFormat,
    /// Playback length
    pub duration: Duration,
}

/// Text-to-Speech trait for synthesizing audio from text
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize text to audio
    ///
    /// # Arguments
    /// * `text` - Text to synthesize, already cleaned for speech
    /// * `emotion` - Optional emotional tone
    async fn synthesize(&self, text: &str, emotion: Option<EmotionLabel>) -> Result<AudioClip>;

    /// Identifier reported in speech-start signals
    fn engine_id(&self) -> &str;

    /// Get the voice identifier being used
    fn voice_id(&self) -> &str;

    /// Check if this TTS engine supports emotional synthesis
    fn supports_emotion(&self) -> bool {
        false
    }
}

/// Playback device. `play` resolves once the clip has finished.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, clip: &AudioClip) -> Result<()>;
}
