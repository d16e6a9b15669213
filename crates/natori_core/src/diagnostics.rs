//! Debug helpers for operators tuning the lexicon.

use crate::classifier::{ClassificationResult, EmotionClassifier};
use crate::emotion::EmotionLabel;
use crate::lexicon::Lexicon;
use serde::Serialize;
use std::collections::BTreeMap;

/// Canonical phrase that should classify as `label`.
pub fn sample_phrase(label: EmotionLabel) -> &'static str {
    match label {
        EmotionLabel::Happy => "とても嬉しいです！素晴らしい一日ですね！ハッピーな気分です！",
        EmotionLabel::Surprised => "えー！本当ですか？びっくりしました！まさかそんなことが！",
        EmotionLabel::Sad => "悲しいことがありました。とても辛くて残念です。涙が出そうです。",
        EmotionLabel::Angry => "それは許せません！とても腹が立ちます！ムカつく理不尽な話ですね！",
        EmotionLabel::Excited => "やる気満々です！エキサイトしています！テンション上がってきた！",
        EmotionLabel::Thinking => {
            "う～ん、どうしようかな。難しい話ですね。よく考える必要があります。"
        }
        EmotionLabel::Neutral => "こんにちは。よろしくお願いします。ありがとうございます。",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordProbe {
    pub emotion: EmotionLabel,
    pub found: Vec<String>,
}

/// Which keywords of which labels occur in `text`. With `only` set, just
/// that label is probed. Labels with no hit are still reported.
pub fn probe_keywords(lexicon: &Lexicon, text: &str, only: Option<EmotionLabel>) -> Vec<KeywordProbe> {
    lexicon
        .entries()
        .iter()
        .filter(|e| only.map_or(true, |label| e.label == label))
        .map(|e| KeywordProbe {
            emotion: e.label,
            found: e
                .keywords
                .iter()
                .filter(|k| k.count_in(text) > 0)
                .map(|k| k.text().to_string())
                .collect(),
        })
        .collect()
}

pub fn batch_classify<'a, I>(classifier: &EmotionClassifier, texts: I) -> Vec<(String, ClassificationResult)>
where
    I: IntoIterator<Item = &'a str>,
{
    texts
        .into_iter()
        .map(|t| (t.to_string(), classifier.classify(t)))
        .collect()
}

/// How many texts landed on each label.
pub fn emotion_distribution<'a, I>(classifier: &EmotionClassifier, texts: I) -> BTreeMap<EmotionLabel, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut distribution = BTreeMap::new();
    for text in texts {
        *distribution.entry(classifier.classify(text).emotion).or_insert(0) += 1;
    }
    distribution
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfCheck {
    pub expected: EmotionLabel,
    pub actual: EmotionLabel,
    pub confidence: f32,
    pub phrase: &'static str,
}

impl SelfCheck {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// Classify every label's sample phrase and report the outcome.
pub fn keyword_self_check(classifier: &EmotionClassifier) -> Vec<SelfCheck> {
    classifier
        .lexicon()
        .all_labels()
        .into_iter()
        .map(|label| {
            let phrase = sample_phrase(label);
            let result = classifier.classify(phrase);
            SelfCheck {
                expected: label,
                actual: result.emotion,
                confidence: result.confidence,
                phrase,
            }
        })
        .collect()
}
