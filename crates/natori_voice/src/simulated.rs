//! Engine and sink that need no audio hardware.
//!
//! `SimulatedSpeech` produces a silent clip whose length follows a reading
//! speed, modulated by the emotion; `PacedSink` "plays" a clip by sleeping
//! for its duration. Together they give realistic start/end timing.

use crate::tts::{AudioClip, AudioFormat, AudioSink, TextToSpeech};
use anyhow::Result;
use async_trait::async_trait;
use natori_core::EmotionLabel;
use std::time::Duration;

pub struct SimulatedSpeech {
    chars_per_minute: u32,
}

impl SimulatedSpeech {
    pub const ENGINE_ID: &'static str = "simulated";

    pub fn new(chars_per_minute: u32) -> Self {
        Self {
            chars_per_minute: chars_per_minute.max(1),
        }
    }

    /// How long `text` takes to say in the given tone.
    pub fn speaking_time(&self, text: &str, emotion: Option<EmotionLabel>) -> Duration {
        // Excitement speeds speech up, sadness and pondering slow it down
        let speed_mult = match emotion.unwrap_or_default() {
            EmotionLabel::Happy | EmotionLabel::Excited => 1.2,
            EmotionLabel::Angry => 1.3,
            EmotionLabel::Surprised => 1.1,
            EmotionLabel::Sad => 0.8,
            EmotionLabel::Thinking => 0.9,
            EmotionLabel::Neutral => 1.0,
        };
        let effective_cpm = (self.chars_per_minute as f64 * speed_mult).max(1.0);
        let chars = text.chars().count() as f64;
        Duration::from_secs_f64(chars * 60.0 / effective_cpm)
    }
}

impl Default for SimulatedSpeech {
    fn default() -> Self {
        Self::new(600)
    }
}

#[async_trait]
impl TextToSpeech for SimulatedSpeech {
    async fn synthesize(&self, text: &str, emotion: Option<EmotionLabel>) -> Result<AudioClip> {
        Ok(AudioClip {
            data: Vec::new(),
            format: AudioFormat::Pcm {
                sample_rate: 24_000,
                channels: 1,
            },
            duration: self.speaking_time(text, emotion),
        })
    }

    fn engine_id(&self) -> &str {
        Self::ENGINE_ID
    }

    fn voice_id(&self) -> &str {
        "natori"
    }

    fn supports_emotion(&self) -> bool {
        true
    }
}

/// Waits out the clip instead of playing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PacedSink;

#[async_trait]
impl AudioSink for PacedSink {
    async fn play(&self, clip: &AudioClip) -> Result<()> {
        tokio::time::sleep(clip.duration).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaking_time_follows_cpm() {
        let engine = SimulatedSpeech::new(600);
        // 10 chars at 600 cpm = 1 second
        assert_eq!(engine.speaking_time("あいうえおかきくけこ", None), Duration::from_secs(1));
        assert_eq!(engine.speaking_time("", None), Duration::ZERO);
    }

    #[test]
    fn test_emotion_changes_pace() {
        let engine = SimulatedSpeech::new(600);
        let text = "今日はとても良い天気ですね";
        let neutral = engine.speaking_time(text, Some(EmotionLabel::Neutral));
        assert!(engine.speaking_time(text, Some(EmotionLabel::Excited)) < neutral);
        assert!(engine.speaking_time(text, Some(EmotionLabel::Sad)) > neutral);
    }

    #[test]
    fn test_zero_cpm_is_clamped() {
        let engine = SimulatedSpeech::new(0);
        assert!(engine.speaking_time("a", None) > Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_sink_waits_for_clip() {
        let engine = SimulatedSpeech::new(600);
        let clip = engine.synthesize("あいうえお", None).await.unwrap();
        let started = tokio::time::Instant::now();
        PacedSink.play(&clip).await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(500) && elapsed < Duration::from_millis(510));
    }
}
