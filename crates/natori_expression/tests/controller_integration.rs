//! Integration tests for the avatar controller and speech coordinator.
//!
//! A MockAvatar records every command it receives so the tests can check
//! the exact sequence the renderer would see, without a real model.

use anyhow::Result;
use natori_core::{AvatarCapability, ClassificationResult, EmotionLabel, NatoriConfig};
use natori_expression::{ApplyReason, AvatarStateController, EmotionPipeline};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Avatar
// ============================================================================

struct MockAvatar {
    available: AtomicBool,
    expressions: BTreeSet<String>,
    motion_groups: BTreeSet<String>,
    /// Expression names whose call errors out.
    broken: BTreeSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockAvatar {
    fn natori() -> Self {
        let assets = natori_core::AvatarAssets::natori();
        Self {
            available: AtomicBool::new(true),
            expressions: assets.expressions,
            motion_groups: assets.motion_groups,
            broken: BTreeSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn without_motion(mut self, group: &str) -> Self {
        self.motion_groups.remove(group);
        self
    }

    fn with_broken_expression(mut self, name: &str) -> Self {
        self.broken.insert(name.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AvatarCapability for MockAvatar {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn available_expressions(&self) -> BTreeSet<String> {
        self.expressions.clone()
    }

    fn available_motion_groups(&self) -> BTreeSet<String> {
        self.motion_groups.clone()
    }

    fn set_expression(&self, name: &str) -> Result<bool> {
        if self.broken.contains(name) {
            anyhow::bail!("renderer does not know '{}'", name);
        }
        self.record(format!("expression:{}", name));
        Ok(true)
    }

    fn play_motion(&self, group_name: &str) -> Result<bool> {
        self.record(format!("motion:{}", group_name));
        Ok(true)
    }

    fn start_lip_sync(&self) -> Result<()> {
        self.record("lip_sync:start".to_string());
        Ok(())
    }

    fn stop_lip_sync(&self) -> Result<()> {
        self.record("lip_sync:stop".to_string());
        Ok(())
    }
}

fn setup(avatar: MockAvatar) -> (Arc<MockAvatar>, EmotionPipeline) {
    let avatar = Arc::new(avatar);
    let pipeline = EmotionPipeline::from_config(&NatoriConfig::default(), avatar.clone());
    (avatar, pipeline)
}

fn happy_result(confidence: f32) -> ClassificationResult {
    ClassificationResult {
        emotion: EmotionLabel::Happy,
        confidence,
        raw_score: 1.6,
        chosen_expression: Some("Smile".to_string()),
        chosen_motion: Some("Tap".to_string()),
        ..Default::default()
    }
}

// ============================================================================
// Apply
// ============================================================================

#[test]
fn test_happy_reply_then_speech_end_restores_neutral() {
    let (avatar, pipeline) = setup(MockAvatar::natori());

    let outcome = pipeline.process_reply("とても嬉しいです！素晴らしい一日ですね！");
    assert!(outcome.applied);
    assert_eq!(outcome.reason, ApplyReason::Completed);
    assert!(outcome.expression_applied && outcome.motion_applied);
    assert!(outcome.error.is_none());
    assert_eq!(outcome.result.emotion, EmotionLabel::Happy);
    assert_eq!(avatar.calls(), vec!["expression:Smile", "motion:Tap"]);

    let state = pipeline.controller().display_state().snapshot();
    assert_eq!(state.current_expression, "Smile");
    assert!(state.is_emotion_active);
    assert!(pipeline.coordinator().has_pending_hook());

    pipeline.coordinator().notify_speech_end();
    let state = pipeline.controller().display_state().snapshot();
    assert_eq!(state.current_expression, "Normal");
    assert!(!state.is_emotion_active);
    assert_eq!(avatar.calls().last().map(String::as_str), Some("lip_sync:stop"));
    assert!(avatar.calls().contains(&"expression:Normal".to_string()));

    // A second end with nothing pending changes nothing.
    let before = avatar.calls().len();
    pipeline.coordinator().notify_speech_end();
    assert_eq!(avatar.calls().len(), before + 1); // only lip_sync:stop
    assert_eq!(
        pipeline.controller().display_state().snapshot().current_expression,
        "Normal"
    );
}

#[test]
fn test_low_confidence_leaves_state_untouched() {
    let avatar = Arc::new(MockAvatar::natori());
    let controller = AvatarStateController::new(avatar.clone(), "Normal");
    let before = controller.display_state().snapshot();

    let outcome = controller.apply_classification(&happy_result(0.3), 0.5);
    assert!(!outcome.applied);
    assert_eq!(outcome.reason, ApplyReason::LowConfidence);
    assert_eq!(controller.display_state().snapshot(), before);
    assert!(avatar.calls().is_empty());
    assert!(!controller.coordinator().has_pending_hook());
}

#[test]
fn test_unavailable_avatar_is_soft_failure() {
    let avatar = Arc::new(MockAvatar::natori());
    avatar.available.store(false, Ordering::SeqCst);
    let controller = AvatarStateController::new(avatar.clone(), "Normal");

    let outcome = controller.apply(&happy_result(0.9));
    assert!(!outcome.applied);
    assert_eq!(outcome.reason, ApplyReason::ControllerUnavailable);
    assert!(avatar.calls().is_empty());
    assert!(controller.display_state().is_at_baseline());
}

#[test]
fn test_undeclared_motion_is_skipped() {
    let avatar = Arc::new(MockAvatar::natori().without_motion("Tap"));
    let controller = AvatarStateController::new(avatar.clone(), "Normal");

    let outcome = controller.apply(&happy_result(0.9));
    assert!(outcome.applied);
    assert!(outcome.expression_applied);
    assert!(!outcome.motion_applied);
    assert!(outcome.error.unwrap().contains("motion 'Tap' not available"));
    assert_eq!(avatar.calls(), vec!["expression:Smile"]);
}

#[test]
fn test_failing_expression_call_is_caught() {
    let avatar = Arc::new(MockAvatar::natori().with_broken_expression("Smile"));
    let controller = AvatarStateController::new(avatar.clone(), "Normal");

    let outcome = controller.apply(&happy_result(0.9));
    assert!(outcome.applied, "motion still went through");
    assert!(!outcome.expression_applied);
    assert!(outcome.motion_applied);
    assert!(outcome.error.unwrap().contains("failed"));

    // No expression landed, so nothing to restore later.
    assert!(controller.display_state().is_at_baseline());
    assert!(!controller.coordinator().has_pending_hook());
}

// ============================================================================
// Supersession
// ============================================================================

#[test]
fn test_newer_reply_wins_and_restores_once() {
    let (avatar, pipeline) = setup(MockAvatar::natori());

    pipeline.process_reply("嬉しい！楽しい！");
    pipeline.process_reply("悲しいです。涙が出ます。");
    let state = pipeline.controller().display_state().snapshot();
    assert_eq!(state.current_expression, "Sad");
    assert!(state.is_emotion_active);

    pipeline.coordinator().notify_speech_end();
    pipeline.coordinator().notify_speech_end();
    let restores = avatar
        .calls()
        .iter()
        .filter(|c| *c == "expression:Normal")
        .count();
    assert_eq!(restores, 1);
    assert!(pipeline.controller().display_state().is_at_baseline());
}

#[test]
fn test_neutral_reply_drops_pending_restore() {
    let (avatar, pipeline) = setup(MockAvatar::natori());

    pipeline.process_reply("嬉しい！楽しい！");
    assert!(pipeline.coordinator().has_pending_hook());

    let outcome = pipeline.process_reply("こんにちは");
    assert!(outcome.applied);
    assert_eq!(outcome.result.emotion, EmotionLabel::Neutral);
    assert!(!pipeline.coordinator().has_pending_hook());
    assert!(pipeline.controller().display_state().is_at_baseline());
    assert_eq!(
        avatar.calls(),
        vec!["expression:Smile", "motion:Tap", "expression:Normal", "motion:Idle"]
    );
}

#[test]
fn test_thinking_keeps_normal_face_but_is_active() {
    let (avatar, pipeline) = setup(MockAvatar::natori());

    let outcome = pipeline.process_reply("う～ん、どうしようかな。難しい問題ですね。");
    assert_eq!(outcome.result.emotion, EmotionLabel::Thinking);
    assert_eq!(avatar.calls(), vec!["expression:Normal", "motion:Tap@Head"]);
    assert!(pipeline.controller().display_state().snapshot().is_emotion_active);

    pipeline.coordinator().notify_speech_end();
    assert!(!pipeline.controller().display_state().snapshot().is_emotion_active);
}

// ============================================================================
// Lip sync
// ============================================================================

#[test]
fn test_speaking_face_only_from_baseline() {
    let (avatar, pipeline) = setup(MockAvatar::natori());
    let coordinator = pipeline.coordinator();

    coordinator.notify_speech_start("simulated");
    coordinator.notify_speech_end();
    assert_eq!(
        avatar.calls(),
        vec![
            "lip_sync:start",
            "expression:Smile",
            "lip_sync:stop",
            "expression:Normal"
        ]
    );
    // The speaking face is not an emotion.
    assert!(pipeline.controller().display_state().is_at_baseline());
}

#[test]
fn test_emotion_suppresses_speaking_face() {
    let (avatar, pipeline) = setup(MockAvatar::natori());
    let coordinator = pipeline.coordinator();

    pipeline.process_reply("びっくりしました！");
    coordinator.notify_speech_start("simulated");
    assert!(pipeline.controller().display_state().snapshot().speech_in_progress);
    coordinator.notify_speech_end();

    assert_eq!(
        avatar.calls(),
        vec![
            "expression:Surprised",
            "motion:FlickUp@Head",
            "lip_sync:start",
            "expression:Normal",
            "lip_sync:stop"
        ]
    );
}

#[test]
fn test_lip_sync_disabled_by_config() {
    let avatar = Arc::new(MockAvatar::natori());
    let mut config = NatoriConfig::default();
    config.avatar.lip_sync = false;
    let pipeline = EmotionPipeline::from_config(&config, avatar.clone());

    pipeline.coordinator().notify_speech_start("simulated");
    pipeline.coordinator().notify_speech_end();
    assert!(!avatar.calls().iter().any(|c| c.starts_with("lip_sync")));
}

// ============================================================================
// Sample phrases
// ============================================================================

#[test]
fn test_every_sample_phrase_reaches_avatar() {
    let (_avatar, pipeline) = setup(MockAvatar::natori());
    for label in EmotionLabel::ALL {
        let outcome = pipeline.test_label(label);
        assert_eq!(outcome.result.emotion, label);
        assert!(outcome.applied, "{} was not applied", label);
        pipeline.coordinator().notify_speech_end();
    }
}

#[test]
fn test_configured_gate_is_used() {
    let avatar = Arc::new(MockAvatar::natori());
    let mut config = NatoriConfig::default();
    config.emotion.min_confidence = 0.99;
    let pipeline = EmotionPipeline::from_config(&config, avatar.clone());

    let outcome = pipeline.process_reply("悲しい");
    assert_eq!(outcome.reason, ApplyReason::LowConfidence);
    assert!(avatar.calls().is_empty());
}
