//! Mouth movement and the "speaking" face.
//!
//! Toggles the avatar's lip sync on speech start/end. When the avatar is at
//! its neutral baseline as speech starts it switches to the speaking
//! expression, and switches back afterwards unless an emotion took over in
//! the meantime. The speaking face is cosmetic: it is not recorded in the
//! display state.

use crate::speech::SpeechListener;
use crate::state::SharedDisplayState;
use natori_core::AvatarCapability;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct LipSyncListener {
    avatar: Arc<dyn AvatarCapability>,
    state: SharedDisplayState,
    speaking_expression: String,
    lip_sync: bool,
    switched: AtomicBool,
}

impl LipSyncListener {
    pub fn new(
        avatar: Arc<dyn AvatarCapability>,
        state: SharedDisplayState,
        speaking_expression: impl Into<String>,
        lip_sync: bool,
    ) -> Self {
        Self {
            avatar,
            state,
            speaking_expression: speaking_expression.into(),
            lip_sync,
            switched: AtomicBool::new(false),
        }
    }
}

impl SpeechListener for LipSyncListener {
    fn on_speech_start(&self, _engine_id: &str) {
        if !self.avatar.is_available() {
            return;
        }
        if self.lip_sync {
            if let Err(e) = self.avatar.start_lip_sync() {
                tracing::error!("Failed to start lip sync: {:#}", e);
            }
        }
        if self.state.is_at_baseline()
            && self
                .avatar
                .available_expressions()
                .contains(self.speaking_expression.as_str())
        {
            match self.avatar.set_expression(&self.speaking_expression) {
                Ok(switched) => self.switched.store(switched, Ordering::SeqCst),
                Err(e) => tracing::warn!(
                    "Failed to set speaking expression '{}': {:#}",
                    self.speaking_expression,
                    e
                ),
            }
        }
    }

    fn on_speech_end(&self) {
        if !self.avatar.is_available() {
            return;
        }
        if self.lip_sync {
            if let Err(e) = self.avatar.stop_lip_sync() {
                tracing::error!("Failed to stop lip sync: {:#}", e);
            }
        }
        if self.switched.swap(false, Ordering::SeqCst) && self.state.is_at_baseline() {
            let neutral = self.state.neutral_expression();
            if let Err(e) = self.avatar.set_expression(neutral) {
                tracing::warn!("Failed to leave speaking expression: {:#}", e);
            }
        }
    }
}
