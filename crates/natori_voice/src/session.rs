//! One utterance at a time, bracketed by start/end signals.
//!
//! The session is what makes the avatar's emotion last exactly as long as
//! the audio: it signals start before synthesis and end after playback, and
//! the end signal is sent no matter how speaking finished (success, error,
//! or the future being dropped).

use crate::filter::speakable_text;
use crate::tts::{AudioSink, TextToSpeech};
use anyhow::{Context, Result};
use natori_core::{EmotionLabel, SpeechSignals};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechReport {
    pub engine: String,
    /// The text actually spoken, after cleanup.
    pub spoken: String,
    pub duration: Duration,
}

pub struct SpeechSession {
    engine: Arc<dyn TextToSpeech>,
    sink: Arc<dyn AudioSink>,
    signals: Arc<dyn SpeechSignals>,
    /// Serializes utterances; a second `speak` waits for the first to end.
    turn: Mutex<()>,
}

/// Sends the end signal when dropped.
struct SpeakingGuard<'a> {
    signals: &'a dyn SpeechSignals,
}

impl Drop for SpeakingGuard<'_> {
    fn drop(&mut self) {
        self.signals.speech_ended();
    }
}

impl SpeechSession {
    pub fn new(
        engine: Arc<dyn TextToSpeech>,
        sink: Arc<dyn AudioSink>,
        signals: Arc<dyn SpeechSignals>,
    ) -> Self {
        Self {
            engine,
            sink,
            signals,
            turn: Mutex::new(()),
        }
    }

    pub fn engine_id(&self) -> &str {
        self.engine.engine_id()
    }

    /// Speak `text` and return once playback has finished.
    ///
    /// Returns `Ok(None)` without any signal when nothing speakable is left
    /// after cleanup.
    pub async fn speak(
        &self,
        text: &str,
        emotion: Option<EmotionLabel>,
    ) -> Result<Option<SpeechReport>> {
        let spoken = speakable_text(text);
        if spoken.is_empty() {
            tracing::debug!("Nothing speakable in reply, skipping speech");
            return Ok(None);
        }
        let emotion = emotion.filter(|_| self.engine.supports_emotion());

        let _turn = self.turn.lock().await;
        let engine = self.engine.engine_id().to_string();
        tracing::debug!(
            "Speaking {} chars via {} (voice {})",
            spoken.chars().count(),
            engine,
            self.engine.voice_id()
        );

        self.signals.speech_started(&engine);
        let _speaking = SpeakingGuard {
            signals: self.signals.as_ref(),
        };

        let clip = self
            .engine
            .synthesize(&spoken, emotion)
            .await
            .with_context(|| format!("Speech synthesis failed ({})", engine))?;
        self.sink
            .play(&clip)
            .await
            .with_context(|| format!("Audio playback failed ({})", engine))?;

        Ok(Some(SpeechReport {
            engine,
            spoken,
            duration: clip.duration,
        }))
    }
}
