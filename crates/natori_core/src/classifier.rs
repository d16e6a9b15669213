//! Emotion Classifier
//!
//! Scores a reply against the [`Lexicon`], picks the dominant label, falls
//! back to punctuation/length heuristics when nothing matched, and computes
//! a confidence in `[0, 1]`. Classification is pure: it never touches the
//! avatar and repeated calls on the same text give the same result.

use crate::avatar::AvatarAssets;
use crate::config::{ConfidenceTuning, FallbackTuning, NatoriConfig};
use crate::emotion::EmotionLabel;
use crate::lexicon::Lexicon;
use serde::Serialize;

/// One keyword that occurred in the classified text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub emotion: EmotionLabel,
    pub count: usize,
}

/// Accumulated score of a label that matched at least once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionScore {
    pub emotion: EmotionLabel,
    pub score: f32,
    pub match_count: usize,
}

/// Heuristic that decided the label when no keyword matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    Question,
    Exclamation,
    LongText,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub emotion: EmotionLabel,
    pub confidence: f32,
    pub raw_score: f32,
    pub matched_keywords: Vec<KeywordMatch>,
    /// Priority expression of the dominant label, if the avatar declares it.
    pub chosen_expression: Option<String>,
    /// Priority motion of the dominant label, if the avatar declares it.
    pub chosen_motion: Option<String>,
    /// Every label that scored, in lexicon order.
    pub scores: Vec<EmotionScore>,
    pub fallback: Option<Fallback>,
}

impl ClassificationResult {
    pub fn is_neutral(&self) -> bool {
        self.emotion == EmotionLabel::Neutral
    }
}

pub struct EmotionClassifier {
    lexicon: Lexicon,
    assets: AvatarAssets,
    confidence: ConfidenceTuning,
    fallback: FallbackTuning,
}

impl EmotionClassifier {
    pub fn new(lexicon: Lexicon, assets: AvatarAssets) -> Self {
        Self {
            lexicon,
            assets,
            confidence: ConfidenceTuning::default(),
            fallback: FallbackTuning::default(),
        }
    }

    pub fn with_tuning(mut self, confidence: ConfidenceTuning, fallback: FallbackTuning) -> Self {
        self.confidence = confidence;
        self.fallback = fallback;
        self
    }

    /// Built-in lexicon plus configured extra keywords, filtered against the
    /// configured avatar assets. Bad extra-keyword entries are logged and
    /// skipped.
    pub fn from_config(config: &NatoriConfig) -> Self {
        let mut lexicon = Lexicon::default();
        for (label, keywords) in &config.lexicon.extra_keywords {
            if let Err(e) = lexicon.add_keywords(label, keywords.as_slice()) {
                tracing::warn!("Ignoring configured keywords for '{}': {}", label, e);
            }
        }
        Self::new(lexicon, AvatarAssets::from_config(&config.avatar)).with_tuning(
            config.emotion.confidence.clone(),
            config.emotion.fallback.clone(),
        )
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn lexicon_mut(&mut self) -> &mut Lexicon {
        &mut self.lexicon
    }

    pub fn assets(&self) -> &AvatarAssets {
        &self.assets
    }

    /// Classify a possibly missing text; `None` behaves like `""`.
    pub fn classify_opt(&self, text: Option<&str>) -> ClassificationResult {
        self.classify(text.unwrap_or_default())
    }

    pub fn classify(&self, text: &str) -> ClassificationResult {
        if text.is_empty() {
            tracing::debug!("Empty text, returning neutral default");
            return self.neutral_default();
        }

        let mut scores = Vec::new();
        let mut matched_keywords = Vec::new();

        for entry in self.lexicon.entries() {
            let mut score = 0.0f32;
            let mut match_count = 0usize;
            for keyword in &entry.keywords {
                let count = keyword.count_in(text);
                if count == 0 {
                    continue;
                }
                score += count as f32 * entry.intensity;
                match_count += count;
                tracing::debug!(
                    "Keyword match: '{}' -> {} (x{})",
                    keyword.text(),
                    entry.label,
                    count
                );
                matched_keywords.push(KeywordMatch {
                    keyword: keyword.text().to_string(),
                    emotion: entry.label,
                    count,
                });
            }
            if score > 0.0 {
                tracing::debug!("{}: score={:.2}, matches={}", entry.label, score, match_count);
                scores.push(EmotionScore {
                    emotion: entry.label,
                    score,
                    match_count,
                });
            }
        }

        // Strictly greater wins, so ties keep the earlier label.
        let mut emotion = EmotionLabel::Neutral;
        let mut raw_score = 0.0f32;
        for s in &scores {
            if s.score > raw_score {
                raw_score = s.score;
                emotion = s.emotion;
            }
        }

        let length = text.chars().count();
        let mut fallback = None;
        if raw_score == 0.0 && length > self.fallback.min_length {
            if text.contains(&['?', '？'][..]) {
                emotion = EmotionLabel::Thinking;
                raw_score = self.fallback.question_score;
                fallback = Some(Fallback::Question);
            } else if text.contains(&['!', '！'][..]) && !self.has_negative_keyword(text) {
                emotion = EmotionLabel::Excited;
                raw_score = self.fallback.exclamation_score;
                fallback = Some(Fallback::Exclamation);
            } else if length > self.fallback.long_text_length {
                emotion = EmotionLabel::Thinking;
                raw_score = self.fallback.long_text_score;
                fallback = Some(Fallback::LongText);
            }
            if let Some(f) = fallback {
                tracing::debug!("No keyword matched, {:?} fallback -> {}", f, emotion);
            }
        }

        let confidence = self.confidence(raw_score, matched_keywords.len(), length);
        let (chosen_expression, chosen_motion) = self.choose_assets(emotion);

        tracing::info!(
            "Emotion analysis: {} (confidence={:.3}, raw_score={:.2}, keywords={})",
            emotion,
            confidence,
            raw_score,
            matched_keywords.len()
        );

        ClassificationResult {
            emotion,
            confidence,
            raw_score,
            matched_keywords,
            chosen_expression,
            chosen_motion,
            scores,
            fallback,
        }
    }

    fn neutral_default(&self) -> ClassificationResult {
        let (chosen_expression, chosen_motion) = self.choose_assets(EmotionLabel::Neutral);
        ClassificationResult {
            emotion: EmotionLabel::Neutral,
            confidence: 0.5,
            raw_score: 0.0,
            chosen_expression,
            chosen_motion,
            ..Default::default()
        }
    }

    /// True if any keyword of a negative label occurs in `text`.
    fn has_negative_keyword(&self, text: &str) -> bool {
        self.lexicon
            .entries()
            .iter()
            .filter(|e| e.label.is_negative())
            .flat_map(|e| e.keywords.iter())
            .any(|k| k.count_in(text) > 0)
    }

    fn confidence(&self, raw_score: f32, distinct_keywords: usize, length: usize) -> f32 {
        let t = &self.confidence;
        let base = (raw_score / t.score_divisor).min(1.0);
        let diversity = (distinct_keywords as f32 / t.diversity_divisor).min(1.0);
        let length_factor = (length as f32 / t.length_divisor).min(1.0);
        let bonus = if distinct_keywords > 0 {
            t.keyword_bonus
        } else {
            0.0
        };
        let confidence = t.base_weight * base
            + t.diversity_weight * diversity
            + t.length_weight * length_factor
            + bonus;
        confidence.clamp(0.0, 1.0)
    }

    fn choose_assets(&self, emotion: EmotionLabel) -> (Option<String>, Option<String>) {
        let entry = self.lexicon.get_entry(emotion);
        let expression = if self.assets.has_expression(&entry.priority_expression) {
            Some(entry.priority_expression.clone())
        } else {
            tracing::debug!(
                "Expression '{}' for {} not declared by avatar",
                entry.priority_expression,
                emotion
            );
            None
        };
        let motion = if self.assets.has_motion_group(&entry.priority_motion) {
            Some(entry.priority_motion.clone())
        } else {
            tracing::debug!(
                "Motion '{}' for {} not declared by avatar",
                entry.priority_motion,
                emotion
            );
            None
        };
        (expression, motion)
    }
}

impl Default for EmotionClassifier {
    fn default() -> Self {
        Self::new(Lexicon::default(), AvatarAssets::natori())
    }
}
