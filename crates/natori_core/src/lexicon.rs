//! Keyword Lexicon
//!
//! Static table mapping every [`EmotionLabel`] to its keywords, the avatar
//! expressions/motions that can show it, a priority expression/motion and an
//! intensity weight. The table can be extended at runtime with
//! [`Lexicon::add_keywords`]; additions live in memory only.

use crate::emotion::EmotionLabel;
use crate::error::LexiconError;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::BTreeMap;

// ============================================================================
// Keyword
// ============================================================================

/// A single keyword with its precompiled case-insensitive matcher.
#[derive(Debug, Clone)]
pub struct Keyword {
    text: String,
    pattern: Regex,
}

impl Keyword {
    pub fn new(text: &str) -> Result<Self, LexiconError> {
        if text.is_empty() {
            return Err(LexiconError::InvalidInput(
                "keywords must be non-empty strings".to_string(),
            ));
        }
        let pattern = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()
            .map_err(|e| LexiconError::InvalidInput(format!("'{}': {}", text, e)))?;
        Ok(Self {
            text: text.to_string(),
            pattern,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of non-overlapping occurrences in `haystack`.
    pub fn count_in(&self, haystack: &str) -> usize {
        self.pattern.find_iter(haystack).count()
    }
}

// ============================================================================
// LexiconEntry
// ============================================================================

#[derive(Debug, Clone)]
pub struct LexiconEntry {
    pub label: EmotionLabel,
    pub keywords: Vec<Keyword>,
    pub expression_candidates: Vec<String>,
    pub motion_candidates: Vec<String>,
    pub priority_expression: String,
    pub priority_motion: String,
    /// Multiplier applied to every keyword occurrence, in (0, 1].
    pub intensity: f32,
}

impl LexiconEntry {
    /// Build an entry from string slices. The first expression/motion
    /// candidate becomes the priority choice.
    pub fn new(
        label: EmotionLabel,
        keywords: &[&str],
        expressions: &[&str],
        motions: &[&str],
        intensity: f32,
    ) -> Result<Self, LexiconError> {
        let keywords = keywords
            .iter()
            .map(|k| Keyword::new(k))
            .collect::<Result<Vec<_>, _>>()?;
        let entry = Self {
            label,
            keywords,
            expression_candidates: expressions.iter().map(|s| s.to_string()).collect(),
            motion_candidates: motions.iter().map(|s| s.to_string()).collect(),
            priority_expression: expressions.first().copied().unwrap_or_default().to_string(),
            priority_motion: motions.first().copied().unwrap_or_default().to_string(),
            intensity,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Override the priority expression and motion.
    pub fn with_priority(mut self, expression: &str, motion: &str) -> Result<Self, LexiconError> {
        self.priority_expression = expression.to_string();
        self.priority_motion = motion.to_string();
        self.validate()?;
        Ok(self)
    }

    pub fn keyword_texts(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(Keyword::text)
    }

    fn validate(&self) -> Result<(), LexiconError> {
        if !(self.intensity > 0.0 && self.intensity <= 1.0) {
            return Err(LexiconError::InvalidIntensity {
                label: self.label,
                value: self.intensity,
            });
        }
        if !self.expression_candidates.contains(&self.priority_expression) {
            return Err(LexiconError::PriorityNotCandidate {
                label: self.label,
                name: self.priority_expression.clone(),
            });
        }
        if !self.motion_candidates.contains(&self.priority_motion) {
            return Err(LexiconError::PriorityNotCandidate {
                label: self.label,
                name: self.priority_motion.clone(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Lexicon
// ============================================================================

/// Ordered table with exactly one entry per label.
///
/// Iteration order is significant: the classifier breaks score ties in
/// favour of the entry that comes first.
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    /// Build a lexicon from entries in the order given.
    pub fn from_entries(entries: Vec<LexiconEntry>) -> Result<Self, LexiconError> {
        for label in EmotionLabel::ALL {
            match entries.iter().filter(|e| e.label == label).count() {
                0 => return Err(LexiconError::MissingLabel(label)),
                1 => {}
                _ => return Err(LexiconError::DuplicateLabel(label)),
            }
        }
        for entry in &entries {
            entry.validate()?;
        }
        Ok(Self { entries })
    }

    pub fn get_entry(&self, label: EmotionLabel) -> &LexiconEntry {
        // from_entries guarantees one entry per label
        self.entries
            .iter()
            .find(|e| e.label == label)
            .unwrap_or(&self.entries[0])
    }

    /// Labels in lexicon iteration order.
    pub fn all_labels(&self) -> Vec<EmotionLabel> {
        self.entries.iter().map(|e| e.label).collect()
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    /// Append keywords to an existing label, given by name.
    ///
    /// Fails with `UnknownLabel` for names outside the closed label set and
    /// with `InvalidInput` if any keyword is empty. Nothing is appended when
    /// any keyword is rejected.
    pub fn add_keywords<S: AsRef<str>>(
        &mut self,
        label: &str,
        new_keywords: &[S],
    ) -> Result<usize, LexiconError> {
        let label: EmotionLabel = label.parse().inspect_err(|e| {
            tracing::warn!("Rejected keyword addition: {}", e);
        })?;
        self.add_keywords_for(label, new_keywords)
    }

    pub fn add_keywords_for<S: AsRef<str>>(
        &mut self,
        label: EmotionLabel,
        new_keywords: &[S],
    ) -> Result<usize, LexiconError> {
        let compiled = new_keywords
            .iter()
            .map(|k| Keyword::new(k.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| tracing::warn!("Rejected keyword addition for {}: {}", label, e))?;

        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.label == label)
            .ok_or(LexiconError::MissingLabel(label))?;
        let before = entry.keywords.len();
        entry.keywords.extend(compiled);
        let after = entry.keywords.len();
        tracing::info!("Lexicon keywords added: {} ({} -> {})", label, before, after);
        Ok(after)
    }

    /// Untyped configuration surface used by debug tooling: `keywords` must
    /// be a JSON array of strings.
    pub fn add_keywords_json(
        &mut self,
        label: &str,
        keywords: &serde_json::Value,
    ) -> Result<usize, LexiconError> {
        let Some(items) = keywords.as_array() else {
            tracing::warn!("Keywords for '{}' must be given as a list", label);
            return Err(LexiconError::InvalidInput(
                "keywords must be a list of strings".to_string(),
            ));
        };
        let texts = items
            .iter()
            .map(|v| {
                v.as_str().ok_or_else(|| {
                    LexiconError::InvalidInput(format!("keyword is not a string: {}", v))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.add_keywords(label, texts.as_slice())
    }

    pub fn stats(&self) -> LexiconStats {
        let emotions = self
            .entries
            .iter()
            .map(|e| {
                (
                    e.label,
                    EntryStats {
                        keyword_count: e.keywords.len(),
                        intensity: e.intensity,
                        expressions: e.expression_candidates.clone(),
                        motions: e.motion_candidates.clone(),
                        priority_expression: e.priority_expression.clone(),
                        priority_motion: e.priority_motion.clone(),
                    },
                )
            })
            .collect();
        LexiconStats {
            total_emotions: self.entries.len(),
            total_keywords: self.entries.iter().map(|e| e.keywords.len()).sum(),
            emotions,
        }
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        default_lexicon()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexiconStats {
    pub total_emotions: usize,
    pub total_keywords: usize,
    pub emotions: BTreeMap<EmotionLabel, EntryStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryStats {
    pub keyword_count: usize,
    pub intensity: f32,
    pub expressions: Vec<String>,
    pub motions: Vec<String>,
    pub priority_expression: String,
    pub priority_motion: String,
}

// ============================================================================
// Built-in vocabulary (tuned for the Natori model)
// ============================================================================

const HAPPY: &[&str] = &[
    "嬉しい", "うれしい", "楽しい", "たのしい", "喜ぶ", "よろこぶ", "素晴らしい", "すばらしい",
    "ワクワク", "わくわく", "最高", "さいこう", "やった", "おめでとう", "祝福", "しゅくふく",
    "笑顔", "えがお", "幸せ", "しあわせ", "感激", "かんげき", "ハッピー", "ラッキー",
    // Strong wording only; everyday positives live under neutral
    "awesome", "wonderful", "excellent", "perfect", "amazing", "fantastic", "brilliant",
    "バッチリ", "やり遂げ", "やりとげ",
];

const SURPRISED: &[&str] = &[
    "驚き", "おどろき", "びっくり", "ビックリ", "意外", "いがい", "まさか", "え？", "えー",
    "なんと", "想像", "そうぞう", "予想外", "よそうがい", "すごい", "スゴイ", "信じられない",
    "しんじられない", "マジで", "まじで", "本当", "ほんとう", "ホント", "うそ", "ウソ",
    "わあ", "わー", "おお", "オオ", "衝撃", "しょうげき",
    "wow", "amazing", "incredible", "unbelievable", "shocking", "surprise", "astonishing",
    "omg", "really", "seriously", "no way", "what", "whoa", "oh my",
    "えぇ", "えええ", "マジ", "ほんと", "ガチ", "やば", "ヤバ", "やばい", "ヤバい",
    "想定外", "そうていがい", "まじか", "うわあ", "へえ", "ほう", "なるほど",
];

const SAD: &[&str] = &[
    "悲しい", "かなしい", "辛い", "つらい", "苦しい", "くるしい", "残念", "ざんねん",
    "がっかり", "ショック", "しょっく", "落ち込む", "おちこむ", "憂鬱", "ゆううつ",
    "泣く", "なく", "涙", "なみだ", "寂しい", "さびしい", "孤独", "こどく", "心配", "しんぱい",
    "不安", "ふあん", "疲れ", "つかれ", "だるい", "ダルイ", "申し訳", "もうしわけ",
    "ごめん", "すみません", "失敗", "しっぱい",
];

const ANGRY: &[&str] = &[
    "怒り", "いかり", "怒る", "おこる", "怒って", "おこって", "怒った", "おこった",
    "腹立つ", "はらだつ", "腹が立つ", "はらがたつ", "腹が立ちます", "はらがたちます",
    "ムカつく", "むかつく", "ムカついた", "むかついた", "ムカムカ", "むかむか",
    "イライラ", "いらいら", "イライラする", "いらいらする",
    "許せない", "ゆるせない", "許せません", "ゆるせません", "許さない", "ゆるさない",
    "腹立たしい", "はらだたしい", "最悪", "さいあく", "嫌", "いや", "ダメ", "だめ", "駄目",
    "困る", "こまる", "うざい", "ウザイ", "バカ", "ばか", "アホ", "あほ",
    "頭にくる", "あたまにくる", "頭に来る", "頭にきた", "あたまにきた",
    "ふざけるな", "ふざけんな", "やめろ", "やめて", "迷惑", "めいわく",
    "癪に障る", "しゃくにさわる", "気に入らない", "きにいらない",
    "腹黒い", "はらぐろい", "憤り", "いきどおり", "憤慨", "ふんがい",
    "当然", "とうぜん", "当然です", "とうぜんです", "理不尽", "りふじん",
    "理不尽な", "りふじんな", "納得いかない", "なっとくいかない",
    "納得できない", "なっとくできない", "不快", "ふかい", "不愉快", "ふゆかい",
    "腹に据えかねる", "はらにすえかねる", "我慢ならない", "がまんならない",
    "むしゃくしゃ", "ムシャクシャ",
];

const NEUTRAL: &[&str] = &[
    "こんにちは", "おはよう", "こんばんは", "はじめまして", "よろしく", "ありがとう",
    "どうぞ", "なるほど", "そうですね", "わかりました", "はい", "いいえ", "普通", "ふつう",
    "グッド", "good", "ナイス", "nice", "いいね", "良い", "よい", "great", "いい感じ",
    "ぴったり", "気分良い", "きぶんいい", "調子良い", "ちょうしいい", "順調", "じゅんちょう",
    "成功", "せいこう", "達成", "たっせい", "満足", "まんぞく", "happy", "joy", "glad",
    "pleased", "super", "笑", "わら", "愛", "あい",
];

const EXCITED: &[&str] = &[
    "興奮", "こうふん", "テンション", "てんしょん", "盛り上がる", "もりあがる", "エキサイト",
    "エキサイティング", "やる気", "やるき", "元気", "げんき", "パワー", "ぱわー", "活力",
    "かつりょく", "アドレナリン", "あどれなりん", "勢い", "いきおい", "熱い", "あつい",
    "燃える", "もえる", "エクサイト", "ワクワク感", "ドキドキ", "ハイテンション", "ノリノリ",
    "フィーバー",
];

const THINKING: &[&str] = &[
    "考える", "かんがえる", "思考", "しこう", "悩む", "なやむ", "迷う", "まよう",
    "わからない", "分からない", "判断", "はんだん", "検討", "けんとう", "思う", "おもう",
    "どうしよう", "う～ん", "うーん", "ん～", "んー", "難しい", "むずかしい",
    "think", "thinking", "consider", "wondering", "hmm", "let me think", "well",
    "difficult", "complex", "complicated", "challenging", "puzzling",
    "うむ", "そうね", "そうだね", "どうかな", "どうだろう", "たしかに", "確かに",
    "複雑", "ふくざつ", "微妙", "びみょう", "分析", "ぶんせき",
    "もう少し", "もうすこし", "ちょっと", "少し", "すこし",
];

/// The built-in lexicon, in canonical label order.
pub fn default_lexicon() -> Lexicon {
    let build = || -> Result<Lexicon, LexiconError> {
        Lexicon::from_entries(vec![
            LexiconEntry::new(
                EmotionLabel::Happy,
                HAPPY,
                &["Smile", "Blushing"],
                &["Tap", "FlickUp@Head"],
                0.8,
            )?,
            LexiconEntry::new(
                EmotionLabel::Surprised,
                SURPRISED,
                &["Surprised"],
                &["FlickUp@Head", "Tap@Head"],
                0.9,
            )?,
            LexiconEntry::new(
                EmotionLabel::Sad,
                SAD,
                &["Sad"],
                &["FlickDown@Body"],
                0.7,
            )?,
            LexiconEntry::new(
                EmotionLabel::Angry,
                ANGRY,
                &["Angry"],
                &["Flick@Body", "Tap"],
                0.6,
            )?,
            LexiconEntry::new(
                EmotionLabel::Neutral,
                NEUTRAL,
                &["Normal"],
                &["Idle"],
                0.7,
            )?,
            LexiconEntry::new(
                EmotionLabel::Excited,
                EXCITED,
                &["Smile", "Surprised", "Blushing"],
                &["Tap", "FlickUp@Head", "Tap@Head"],
                0.9,
            )?,
            LexiconEntry::new(
                EmotionLabel::Thinking,
                THINKING,
                &["Normal", "exp_01"],
                &["Tap@Head"],
                0.6,
            )?,
        ])
    };
    match build() {
        Ok(lexicon) => lexicon,
        // Built-in data is static; a failure here is a bug in the tables above.
        Err(e) => panic!("built-in lexicon is invalid: {}", e),
    }
}
