//! One reply in, one avatar update out.

use crate::controller::{ApplyOutcome, AvatarStateController};
use crate::lipsync::LipSyncListener;
use crate::speech::SpeechLifecycleCoordinator;
use natori_core::diagnostics::sample_phrase;
use natori_core::{AvatarCapability, EmotionClassifier, EmotionLabel, NatoriConfig};
use std::sync::Arc;

pub struct EmotionPipeline {
    classifier: EmotionClassifier,
    controller: AvatarStateController,
    min_confidence: f32,
}

impl EmotionPipeline {
    pub fn new(classifier: EmotionClassifier, controller: AvatarStateController) -> Self {
        Self {
            classifier,
            controller,
            min_confidence: crate::controller::DEFAULT_MIN_CONFIDENCE,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Classifier, controller and lip sync wired from config.
    pub fn from_config(config: &NatoriConfig, avatar: Arc<dyn AvatarCapability>) -> Self {
        let classifier = EmotionClassifier::from_config(config);
        let controller =
            AvatarStateController::new(avatar.clone(), &config.avatar.neutral_expression);
        let lip_sync = LipSyncListener::new(
            avatar,
            controller.display_state().clone(),
            config.avatar.speaking_expression.clone(),
            config.avatar.lip_sync,
        );
        controller.coordinator().subscribe(Arc::new(lip_sync));
        Self::new(classifier, controller).with_min_confidence(config.emotion.min_confidence)
    }

    /// Classify a bot reply and apply it, strictly in that order.
    pub fn process_reply(&self, reply: &str) -> ApplyOutcome {
        let result = self.classifier.classify(reply);
        self.controller
            .apply_classification(&result, self.min_confidence)
    }

    /// Run the canonical phrase of `label` through the pipeline.
    pub fn test_label(&self, label: EmotionLabel) -> ApplyOutcome {
        self.process_reply(sample_phrase(label))
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    pub fn classifier(&self) -> &EmotionClassifier {
        &self.classifier
    }

    pub fn classifier_mut(&mut self) -> &mut EmotionClassifier {
        &mut self.classifier
    }

    pub fn controller(&self) -> &AvatarStateController {
        &self.controller
    }

    pub fn coordinator(&self) -> Arc<SpeechLifecycleCoordinator> {
        self.controller.coordinator()
    }
}
