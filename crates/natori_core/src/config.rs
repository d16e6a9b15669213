use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NatoriConfig {
    pub emotion: EmotionConfig,
    pub avatar: AvatarConfig,
    pub lexicon: LexiconConfig,
    pub speech: SpeechConfig,
}

impl NatoriConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: NatoriConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("NATORI_MIN_CONFIDENCE") {
            if let Ok(n) = v.parse() {
                self.emotion.min_confidence = n;
            }
        }
        if let Ok(v) = std::env::var("NATORI_NEUTRAL_EXPRESSION") {
            if !v.is_empty() {
                self.avatar.neutral_expression = v;
            }
        }
        if let Ok(v) = std::env::var("NATORI_SPEECH_ENGINE") {
            if !v.is_empty() {
                self.speech.engine = v;
            }
        }
        if let Ok(v) = std::env::var("NATORI_SPEECH_CPM") {
            if let Ok(n) = v.parse() {
                self.speech.chars_per_minute = n;
            }
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    /// Results below this confidence leave the avatar untouched.
    pub min_confidence: f32,
    pub confidence: ConfidenceTuning,
    pub fallback: FallbackTuning,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.1,
            confidence: ConfidenceTuning::default(),
            fallback: FallbackTuning::default(),
        }
    }
}

/// Empirically tuned weights of the confidence formula.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfidenceTuning {
    pub score_divisor: f32,
    pub diversity_divisor: f32,
    pub length_divisor: f32,
    pub base_weight: f32,
    pub diversity_weight: f32,
    pub length_weight: f32,
    /// Flat bonus once at least one keyword matched.
    pub keyword_bonus: f32,
}

impl Default for ConfidenceTuning {
    fn default() -> Self {
        Self {
            score_divisor: 2.0,
            diversity_divisor: 2.0,
            length_divisor: 50.0,
            base_weight: 0.6,
            diversity_weight: 0.3,
            length_weight: 0.1,
            keyword_bonus: 0.2,
        }
    }
}

/// Punctuation/length heuristics used when no keyword matched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FallbackTuning {
    /// Texts of this many characters or fewer never fall back.
    pub min_length: usize,
    /// Texts longer than this read as "thinking".
    pub long_text_length: usize,
    pub question_score: f32,
    pub exclamation_score: f32,
    pub long_text_score: f32,
}

impl Default for FallbackTuning {
    fn default() -> Self {
        Self {
            min_length: 10,
            long_text_length: 50,
            question_score: 0.3,
            exclamation_score: 0.4,
            long_text_score: 0.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Baseline expression restored after speech ends.
    pub neutral_expression: String,
    /// Expression shown while speaking from the neutral baseline.
    pub speaking_expression: String,
    pub expressions: Vec<String>,
    pub motion_groups: Vec<String>,
    pub lip_sync: bool,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            neutral_expression: "Normal".to_string(),
            speaking_expression: "Smile".to_string(),
            expressions: default_expressions(),
            motion_groups: default_motion_groups(),
            lip_sync: true,
        }
    }
}

fn default_expressions() -> Vec<String> {
    [
        "Angry", "Blushing", "Normal", "Sad", "Smile", "Surprised", "exp_01", "exp_02", "exp_03",
        "exp_04", "exp_05",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_motion_groups() -> Vec<String> {
    ["Idle", "Tap", "FlickUp@Head", "Flick@Body", "FlickDown@Body", "Tap@Head"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    /// Extra keywords appended to the built-in lexicon at start-up,
    /// keyed by label name.
    pub extra_keywords: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub engine: String,
    /// Pacing of the simulated engine.
    pub chars_per_minute: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            engine: "simulated".to_string(),
            chars_per_minute: 600,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
