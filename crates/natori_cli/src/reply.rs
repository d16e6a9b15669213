//! Offline reply source so the console works without an AI backend.

use async_trait::async_trait;
use natori_core::persona::{emotional_context, Persona};
use natori_core::{EmotionLabel, ReplySource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Mutex;

/// Answers from the persona's canned responses, or mirrors the user's mood
/// back in words the classifier knows.
pub struct EchoReplySource {
    persona: Persona,
    rng: Mutex<StdRng>,
}

impl EchoReplySource {
    pub fn new(persona: Persona) -> Self {
        Self {
            persona,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(persona: Persona, seed: u64) -> Self {
        Self {
            persona,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn base_reply(message: &str) -> String {
        match emotional_context(message) {
            EmotionLabel::Happy => "それは嬉しいですね！私も楽しい気分になりました！".to_string(),
            EmotionLabel::Surprised => "えー！本当ですか？びっくりしました！".to_string(),
            EmotionLabel::Sad => "それは残念でしたね…とても心配です。".to_string(),
            EmotionLabel::Angry => "それは困るし、迷惑な問題ですね。".to_string(),
            EmotionLabel::Thinking => "う～ん、難しい問題ですね。少し考えてみます。".to_string(),
            EmotionLabel::Excited | EmotionLabel::Neutral => {
                format!("「{}」ですね。ありがとうございます。", message)
            }
        }
    }
}

impl Default for EchoReplySource {
    fn default() -> Self {
        Self::new(Persona::natori())
    }
}

#[async_trait]
impl ReplySource for EchoReplySource {
    async fn reply(&self, message: &str) -> anyhow::Result<String> {
        if let Some(canned) = self.persona.special_response(message) {
            return Ok(canned.to_string());
        }
        let base = Self::base_reply(message);
        let decorated = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| anyhow::anyhow!("reply rng poisoned"))?;
            self.persona.decorate_response(message, &base, &mut *rng)
        };
        Ok(decorated.modified)
    }
}
