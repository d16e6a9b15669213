//! Avatar State Controller
//!
//! Decides whether a [`ClassificationResult`] reaches the avatar, issues the
//! expression and motion commands, and keeps [`AvatarDisplayState`] in step.
//! Nothing here returns an error to the caller: every expected failure ends
//! up in the returned [`ApplyOutcome`].
//!
//! [`AvatarDisplayState`]: crate::state::AvatarDisplayState

use crate::speech::{RestoreHook, SpeechLifecycleCoordinator};
use crate::state::SharedDisplayState;
use natori_core::{AvatarCapability, ClassificationResult};
use serde::Serialize;
use std::sync::Arc;

/// Gate used when the caller does not pass one.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyReason {
    /// Confidence below the gate; nothing was touched.
    LowConfidence,
    /// No model loaded; nothing was touched.
    ControllerUnavailable,
    /// Commands were issued. Check the per-command flags for what landed.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyOutcome {
    pub applied: bool,
    pub reason: ApplyReason,
    pub expression_applied: bool,
    pub motion_applied: bool,
    pub result: ClassificationResult,
    /// Skipped or failed sub-operations, `; `-joined.
    pub error: Option<String>,
}

impl ApplyOutcome {
    fn skipped(reason: ApplyReason, result: &ClassificationResult) -> Self {
        Self {
            applied: false,
            reason,
            expression_applied: false,
            motion_applied: false,
            result: result.clone(),
            error: None,
        }
    }
}

pub struct AvatarStateController {
    avatar: Arc<dyn AvatarCapability>,
    state: SharedDisplayState,
    coordinator: Arc<SpeechLifecycleCoordinator>,
}

impl AvatarStateController {
    /// New session: display state at `neutral_expression` and a fresh
    /// coordinator bound to it.
    pub fn new(avatar: Arc<dyn AvatarCapability>, neutral_expression: &str) -> Self {
        let state = SharedDisplayState::new(neutral_expression);
        let coordinator = Arc::new(SpeechLifecycleCoordinator::new(state.clone()));
        Self {
            avatar,
            state,
            coordinator,
        }
    }

    pub fn coordinator(&self) -> Arc<SpeechLifecycleCoordinator> {
        self.coordinator.clone()
    }

    pub fn display_state(&self) -> &SharedDisplayState {
        &self.state
    }

    pub fn avatar(&self) -> &Arc<dyn AvatarCapability> {
        &self.avatar
    }

    pub fn apply(&self, result: &ClassificationResult) -> ApplyOutcome {
        self.apply_classification(result, DEFAULT_MIN_CONFIDENCE)
    }

    pub fn apply_classification(
        &self,
        result: &ClassificationResult,
        min_confidence: f32,
    ) -> ApplyOutcome {
        if result.confidence < min_confidence {
            tracing::debug!(
                "Confidence too low, avatar unchanged ({:.3} < {})",
                result.confidence,
                min_confidence
            );
            return ApplyOutcome::skipped(ApplyReason::LowConfidence, result);
        }

        if !self.avatar.is_available() {
            tracing::warn!("Avatar not available, skipping {}", result.emotion);
            return ApplyOutcome::skipped(ApplyReason::ControllerUnavailable, result);
        }

        let mut errors = Vec::new();

        let expression_applied = match &result.chosen_expression {
            Some(name) => self.issue(
                "expression",
                name,
                self.avatar.available_expressions().contains(name.as_str()),
                |n| self.avatar.set_expression(n),
                &mut errors,
            ),
            None => false,
        };

        let motion_applied = match &result.chosen_motion {
            Some(group) => self.issue(
                "motion",
                group,
                self.avatar.available_motion_groups().contains(group.as_str()),
                |g| self.avatar.play_motion(g),
                &mut errors,
            ),
            None => false,
        };

        if let (true, Some(expression)) = (expression_applied, result.chosen_expression.as_deref()) {
            if result.is_neutral() {
                self.state.show_neutral(expression);
                self.coordinator.clear_restore_hook();
            } else {
                self.state.show_emotion(expression);
                self.coordinator.register_restore_hook(self.restore_hook());
            }
        }

        let applied = expression_applied || motion_applied;
        if applied {
            tracing::info!(
                "Avatar now showing {} (expression: {}, motion: {}, confidence: {:.3})",
                result.emotion,
                expression_applied,
                motion_applied,
                result.confidence
            );
        }

        ApplyOutcome {
            applied,
            reason: ApplyReason::Completed,
            expression_applied,
            motion_applied,
            result: result.clone(),
            error: if errors.is_empty() {
                None
            } else {
                Some(errors.join("; "))
            },
        }
    }

    /// Run one capability command. A name the avatar does not declare, a
    /// refusal and a failed call all count as "not applied".
    fn issue<F>(
        &self,
        kind: &str,
        name: &str,
        declared: bool,
        command: F,
        errors: &mut Vec<String>,
    ) -> bool
    where
        F: FnOnce(&str) -> anyhow::Result<bool>,
    {
        if !declared {
            tracing::warn!("Avatar has no {} '{}'", kind, name);
            errors.push(format!("{} '{}' not available", kind, name));
            return false;
        }
        match command(name) {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!("Avatar rejected {} '{}'", kind, name);
                errors.push(format!("{} '{}' rejected", kind, name));
                false
            }
            Err(e) => {
                tracing::error!("Failed to apply {} '{}': {:#}", kind, name, e);
                errors.push(format!("{} '{}' failed: {}", kind, name, e));
                false
            }
        }
    }

    /// Puts the neutral baseline back once the utterance is over.
    fn restore_hook(&self) -> RestoreHook {
        let state = self.state.clone();
        let avatar = self.avatar.clone();
        Box::new(move || {
            state.restore_baseline();
            let neutral = state.neutral_expression();
            match avatar.set_expression(neutral) {
                Ok(true) => tracing::debug!("Restored '{}' after speech", neutral),
                Ok(false) => tracing::warn!("Avatar rejected restore to '{}'", neutral),
                Err(e) => tracing::error!("Failed to restore '{}': {:#}", neutral, e),
            }
        })
    }
}
