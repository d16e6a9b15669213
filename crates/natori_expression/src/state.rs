//! AvatarDisplayState: what the avatar is currently showing.
//!
//! One instance per session, shared between the controller (expression and
//! emotion flag) and the speech-lifecycle coordinator (speech flag). The
//! write methods are crate-private so no other component can mutate it.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarDisplayState {
    /// Last expression successfully applied.
    pub current_expression: String,
    /// A non-neutral classification is on display and not yet restored.
    pub is_emotion_active: bool,
    pub speech_in_progress: bool,
    /// Engine that sent the last start signal; diagnostic only.
    pub speaking_engine: Option<String>,
}

impl AvatarDisplayState {
    pub fn new(neutral_expression: impl Into<String>) -> Self {
        Self {
            current_expression: neutral_expression.into(),
            is_emotion_active: false,
            speech_in_progress: false,
            speaking_engine: None,
        }
    }
}

/// Cloneable handle to the session's display state.
#[derive(Debug, Clone)]
pub struct SharedDisplayState {
    inner: Arc<Mutex<AvatarDisplayState>>,
    neutral_expression: Arc<str>,
}

impl SharedDisplayState {
    pub fn new(neutral_expression: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AvatarDisplayState::new(neutral_expression))),
            neutral_expression: Arc::from(neutral_expression),
        }
    }

    pub fn snapshot(&self) -> AvatarDisplayState {
        self.lock().clone()
    }

    pub fn neutral_expression(&self) -> &str {
        &self.neutral_expression
    }

    /// True when the neutral baseline is on display.
    pub fn is_at_baseline(&self) -> bool {
        let state = self.lock();
        !state.is_emotion_active && state.current_expression == *self.neutral_expression
    }

    pub(crate) fn show_emotion(&self, expression: &str) {
        let mut state = self.lock();
        state.current_expression = expression.to_string();
        state.is_emotion_active = true;
    }

    pub(crate) fn show_neutral(&self, expression: &str) {
        let mut state = self.lock();
        state.current_expression = expression.to_string();
        state.is_emotion_active = false;
    }

    pub(crate) fn restore_baseline(&self) {
        self.show_neutral(&self.neutral_expression);
    }

    pub(crate) fn set_speech(&self, engine_id: Option<&str>) {
        let mut state = self.lock();
        state.speech_in_progress = engine_id.is_some();
        state.speaking_engine = engine_id.map(str::to_string);
    }

    // A panic while holding the lock cannot leave the state half-written,
    // every writer assigns whole fields.
    fn lock(&self) -> MutexGuard<'_, AvatarDisplayState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_baseline() {
        let state = SharedDisplayState::new("Normal");
        let snap = state.snapshot();
        assert_eq!(snap.current_expression, "Normal");
        assert!(!snap.is_emotion_active);
        assert!(!snap.speech_in_progress);
        assert!(state.is_at_baseline());
    }

    #[test]
    fn test_emotion_then_restore() {
        let state = SharedDisplayState::new("Normal");
        state.show_emotion("Smile");
        assert!(!state.is_at_baseline());
        assert_eq!(state.snapshot().current_expression, "Smile");

        state.restore_baseline();
        assert!(state.is_at_baseline());
    }

    #[test]
    fn test_clones_share_state() {
        let state = SharedDisplayState::new("Normal");
        let other = state.clone();
        other.set_speech(Some("simulated"));
        let snap = state.snapshot();
        assert!(snap.speech_in_progress);
        assert_eq!(snap.speaking_engine.as_deref(), Some("simulated"));

        other.set_speech(None);
        assert!(!state.snapshot().speech_in_progress);
    }
}
