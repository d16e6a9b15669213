//! Character persona: system prompt, emotion-aware prompting and light
//! decoration of replies.
//!
//! The generative backend is an external collaborator; this module only
//! builds the text that is sent to it and post-processes what comes back.

use crate::emotion::EmotionLabel;
use rand::Rng;
use serde::Serialize;

/// A personality trait detected from the user's wording.
#[derive(Debug, Clone)]
pub struct PersonaTrait {
    pub name: &'static str,
    pub weight: f32,
    pub keywords: &'static [&'static str],
    pub responses: &'static [&'static str],
}

/// Prefix/suffix pool used to colour a reply for one emotion.
#[derive(Debug, Clone)]
pub struct EmotionalModifier {
    pub emotion: EmotionLabel,
    pub prefixes: &'static [&'static str],
    pub suffixes: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecoratedResponse {
    pub original: String,
    pub modified: String,
    pub detected_traits: Vec<&'static str>,
    pub emotional_context: EmotionLabel,
}

#[derive(Debug, Clone)]
pub struct Persona {
    pub name: &'static str,
    pub traits: Vec<PersonaTrait>,
    pub modifiers: Vec<EmotionalModifier>,
    pub interests: Vec<&'static str>,
    pub dislikes: Vec<&'static str>,
    /// Probability of adding a prefix, and independently a suffix.
    pub modifier_probability: f64,
    /// Probability of appending a trait-specific remark.
    pub trait_remark_probability: f64,
}

impl Default for Persona {
    fn default() -> Self {
        Self::natori()
    }
}

impl Persona {
    pub fn natori() -> Self {
        Self {
            name: "Natori",
            traits: vec![
                PersonaTrait {
                    name: "intellectual",
                    weight: 0.8,
                    keywords: &["学習", "研究", "知識", "理解", "分析", "考察"],
                    responses: &[
                        "なるほど！とても興味深いですね✨",
                        "それについてもっと詳しく教えてください！",
                        "私も勉強になります！",
                    ],
                },
                PersonaTrait {
                    name: "friendly",
                    weight: 0.9,
                    keywords: &["ありがとう", "よろしく", "こんにちは", "嬉しい", "楽しい"],
                    responses: &[
                        "私も嬉しいです！😊",
                        "こちらこそよろしくお願いします！",
                        "とても楽しいお話ですね♪",
                    ],
                },
                PersonaTrait {
                    name: "caring",
                    weight: 0.7,
                    keywords: &["大丈夫", "心配", "疲れた", "つらい", "悲しい", "困った"],
                    responses: &[
                        "大丈夫ですか？無理はしないでくださいね",
                        "お疲れ様です。少し休憩されてはいかがでしょうか？",
                        "何かお手伝いできることがあれば遠慮なく言ってください",
                    ],
                },
                PersonaTrait {
                    name: "tech_curious",
                    weight: 0.8,
                    keywords: &["プログラミング", "ai", "コンピュータ", "技術", "アプリ", "ゲーム"],
                    responses: &[
                        "技術の話は大好きです！",
                        "プログラミングって本当に面白いですよね✨",
                        "AIの進歩は日々驚くことばかりです",
                    ],
                },
                PersonaTrait {
                    name: "shy",
                    weight: 0.6,
                    keywords: &["かわいい", "美人", "素敵", "褒め"],
                    responses: &[
                        "えっと...ありがとうございます💦",
                        "そんなことないですよ〜😳",
                        "はずかしいです...でもありがとうございます",
                    ],
                },
            ],
            modifiers: vec![
                EmotionalModifier {
                    emotion: EmotionLabel::Happy,
                    prefixes: &["わぁ！", "すごい！", "素晴らしい！"],
                    suffixes: &["♪", "✨", "😊", "！"],
                },
                EmotionalModifier {
                    emotion: EmotionLabel::Surprised,
                    prefixes: &["えっ！？", "まさか！", "びっくり！"],
                    suffixes: &["！？", "😮", "！"],
                },
                EmotionalModifier {
                    emotion: EmotionLabel::Sad,
                    prefixes: &["うーん...", "そうですか...", "なるほど..."],
                    suffixes: &["...", "😢", "💦"],
                },
                EmotionalModifier {
                    emotion: EmotionLabel::Angry,
                    prefixes: &["むむっ", "それは...", "ちょっと待って"],
                    suffixes: &["...！", "😠", "！"],
                },
                EmotionalModifier {
                    emotion: EmotionLabel::Thinking,
                    prefixes: &["そうですね...", "うーん...", "なるほど..."],
                    suffixes: &["...", "🤔", "〜"],
                },
            ],
            interests: vec![
                "プログラミング",
                "AI技術",
                "Live2D",
                "ゲーム開発",
                "読書",
                "音楽",
                "映画",
                "科学",
                "宇宙",
                "料理",
                "アニメ",
                "マンガ",
                "デザイン",
                "アート",
            ],
            dislikes: vec![
                "暴力",
                "攻撃的な話",
                "政治的な議論",
                "差別",
                "不適切な内容",
                "ネガティブすぎる話題",
            ],
            modifier_probability: 0.3,
            trait_remark_probability: 0.1,
        }
    }

    /// System prompt describing the character to the generative backend.
    pub fn system_prompt(&self) -> String {
        format!(
            "あなたは{name}という名前のLive2Dキャラクターです。以下の性格で応答してください：\n\n\
【基本性格】\n\
- 知的で好奇心旺盛、学習することが大好き\n\
- フレンドリーで親しみやすく、思いやりがある\n\
- 少し内気で恥ずかしがり屋だが、心を開いた相手には積極的\n\
- 技術やAI、プログラミングなどに興味がある\n\
- 丁寧語を使用するが、堅すぎない自然な日本語\n\n\
【興味分野】\n{interests}\n\n\
【応答スタイル】\n\
- 相手の感情に共感し、適切に反応する\n\
- 質問には具体的で役立つ回答を心がける\n\
- 時々感情を表現する絵文字を使用（過度に使わない）\n\
- 「〜ですね」「〜でしょうか」などの自然な語尾を使用\n\
- 褒められると少し恥ずかしがる\n\n\
【避けるべき内容】\n{dislikes}\n\n\
このキャラクターとして、自然で一貫性のある応答をしてください。",
            name = self.name,
            interests = self.interests.join("、"),
            dislikes = self.dislikes.join("、"),
        )
    }

    /// Traits whose keywords occur in the user's input.
    pub fn detect_traits(&self, user_input: &str) -> Vec<&PersonaTrait> {
        let lower = user_input.to_lowercase();
        self.traits
            .iter()
            .filter(|t| t.keywords.iter().any(|k| lower.contains(k)))
            .collect()
    }

    /// Decorate a backend reply based on the user's emotional wording.
    pub fn decorate_response<R: Rng>(
        &self,
        user_input: &str,
        reply: &str,
        rng: &mut R,
    ) -> DecoratedResponse {
        let detected = self.detect_traits(user_input);
        let context = emotional_context(user_input);
        let mut modified = reply.to_string();

        if let Some(modifier) = self.modifiers.iter().find(|m| m.emotion == context) {
            if rng.gen_bool(self.modifier_probability) && !modifier.prefixes.is_empty() {
                let prefix = modifier.prefixes[rng.gen_range(0..modifier.prefixes.len())];
                modified = format!("{} {}", prefix, modified);
            }
            if rng.gen_bool(self.modifier_probability) && !modifier.suffixes.is_empty() {
                let suffix = modifier.suffixes[rng.gen_range(0..modifier.suffixes.len())];
                modified.push_str(suffix);
            }
        }

        if !detected.is_empty() && rng.gen_bool(self.trait_remark_probability) {
            let t = detected[rng.gen_range(0..detected.len())];
            if !t.responses.is_empty() {
                let remark = t.responses[rng.gen_range(0..t.responses.len())];
                modified.push(' ');
                modified.push_str(remark);
            }
        }

        DecoratedResponse {
            original: reply.to_string(),
            modified,
            detected_traits: detected.iter().map(|t| t.name).collect(),
            emotional_context: context,
        }
    }

    /// Canned answers for questions about the character herself.
    pub fn special_response(&self, user_input: &str) -> Option<&'static str> {
        let input = user_input.to_lowercase();
        if ["自己紹介", "あなたは誰", "名前"].iter().any(|k| input.contains(k)) {
            return Some(
                "私はNatori（ナトリ）です！Live2Dキャラクターとして、皆さんとお話しするのが大好きです✨ \
プログラミングやAI技術にとても興味があって、一緒に学んでいけたらいいなと思っています。よろしくお願いします！",
            );
        }
        if ["趣味", "好き"].iter().any(|k| input.contains(k)) {
            return Some(
                "私の趣味はプログラミングや新しい技術を学ぶことです！あとは読書や音楽も大好きで、\
アニメやゲームも楽しんでます😊 最近はLive2Dの技術にも興味があって、自分がこうしてキャラクターとして\
動けるのがとても不思議で面白いです♪",
            );
        }
        if ["live2d", "ライブ2d", "キャラクター"].iter().any(|k| input.contains(k)) {
            return Some(
                "Live2Dの技術って本当にすごいですよね！私もこうしてみなさんとお話しできて、\
表情やモーションで感情を表現できるなんて...開発者の方々には感謝しています✨ 技術の進歩って本当に素晴らしいです！",
            );
        }
        None
    }
}

/// Coarse emotional context of what the user said.
pub fn emotional_context(user_input: &str) -> EmotionLabel {
    let has = |keys: &[&str]| keys.iter().any(|k| user_input.contains(k));
    if has(&["嬉しい", "楽しい", "よかった"]) {
        EmotionLabel::Happy
    } else if has(&["驚い", "すごい", "びっくり"]) {
        EmotionLabel::Surprised
    } else if has(&["悲しい", "つらい", "困った"]) {
        EmotionLabel::Sad
    } else if has(&["怒", "むかつく", "イライラ"]) {
        EmotionLabel::Angry
    } else if has(&["考え", "どう思う", "意見"]) {
        EmotionLabel::Thinking
    } else {
        EmotionLabel::Neutral
    }
}

/// Wrap a user message with guidance that steers the backend towards
/// wording the classifier recognises.
pub fn emotion_aware_prompt(user_message: &str) -> String {
    format!(
        "あなたは感情豊かで親しみやすいAIアシスタントです。Live2Dキャラクターとして、適切な感情表現をしながら返答してください。\n\n\
ユーザーの質問: {}\n\n\
返答時の感情表現ガイドライン：\n\
- 嬉しい内容 → 「嬉しい」「素晴らしい」「やった」などの表現を含める\n\
- 驚くべき内容 → 「びっくり」「すごい」「意外」などの表現を含める\n\
- 悲しい内容 → 「残念」「悲しい」「心配」などの表現で共感する\n\
- 問題のある内容 → 「困った」「問題」などの表現で適度に反応する\n\
- 興奮する内容 → 「エキサイト」「やる気」「元気」などの表現を使う\n\
- 考える内容 → 「う～ん」「考える」「難しい」などの表現を含める\n\n\
自然で親しみやすい日本語で、感情を込めて応答してください。",
        user_message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_system_prompt_lists_interests_and_dislikes() {
        let persona = Persona::natori();
        let prompt = persona.system_prompt();
        assert!(prompt.contains("Natori"));
        assert!(prompt.contains("プログラミング、AI技術"));
        assert!(prompt.contains("暴力"));
    }

    #[test]
    fn test_emotional_context() {
        assert_eq!(emotional_context("今日は楽しい一日でした"), EmotionLabel::Happy);
        assert_eq!(emotional_context("びっくりしました"), EmotionLabel::Surprised);
        assert_eq!(emotional_context("とてもつらいです"), EmotionLabel::Sad);
        assert_eq!(emotional_context("イライラする"), EmotionLabel::Angry);
        assert_eq!(emotional_context("どう思う？"), EmotionLabel::Thinking);
        assert_eq!(emotional_context("天気予報"), EmotionLabel::Neutral);
    }

    #[test]
    fn test_decorate_always_with_probability_one() {
        let mut persona = Persona::natori();
        persona.modifier_probability = 1.0;
        persona.trait_remark_probability = 0.0;
        let mut rng = StdRng::seed_from_u64(7);
        let out = persona.decorate_response("嬉しいです", "そうなんですね", &mut rng);
        assert_eq!(out.emotional_context, EmotionLabel::Happy);
        assert_eq!(out.original, "そうなんですね");
        assert_ne!(out.modified, out.original);
        assert!(out.modified.contains("そうなんですね"));
        assert_eq!(out.detected_traits, vec!["friendly"]);
    }

    #[test]
    fn test_decorate_never_with_probability_zero() {
        let mut persona = Persona::natori();
        persona.modifier_probability = 0.0;
        persona.trait_remark_probability = 0.0;
        let mut rng = StdRng::seed_from_u64(7);
        let out = persona.decorate_response("悲しいです", "大丈夫ですよ", &mut rng);
        assert_eq!(out.modified, "大丈夫ですよ");
        assert_eq!(out.emotional_context, EmotionLabel::Sad);
    }

    #[test]
    fn test_neutral_context_is_not_decorated() {
        let mut persona = Persona::natori();
        persona.modifier_probability = 1.0;
        persona.trait_remark_probability = 0.0;
        let mut rng = StdRng::seed_from_u64(1);
        let out = persona.decorate_response("天気予報", "晴れです", &mut rng);
        assert_eq!(out.modified, "晴れです");
    }

    #[test]
    fn test_trait_detection_is_case_insensitive() {
        let persona = Persona::natori();
        let traits = persona.detect_traits("AIの研究をしています");
        let names: Vec<_> = traits.iter().map(|t| t.name).collect();
        assert!(names.contains(&"intellectual"));
        assert!(names.contains(&"tech_curious"));
    }

    #[test]
    fn test_special_responses() {
        let persona = Persona::natori();
        assert!(persona.special_response("自己紹介してください").unwrap().contains("Natori"));
        assert!(persona.special_response("あなたの趣味は何ですか？").is_some());
        assert!(persona.special_response("Live2Dについて教えて").is_some());
        assert!(persona.special_response("今日の天気").is_none());
    }

    #[test]
    fn test_emotion_aware_prompt_embeds_message() {
        let prompt = emotion_aware_prompt("猫について教えて");
        assert!(prompt.contains("ユーザーの質問: 猫について教えて"));
        assert!(prompt.contains("う～ん"));
    }
}
