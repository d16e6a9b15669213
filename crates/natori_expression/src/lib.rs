//! # Natori Expression
//!
//! Puts classified emotions on the avatar and keeps them there for exactly
//! as long as the matching utterance is being spoken.
//!
//! - [`AvatarStateController`] gates a result on confidence and avatar
//!   readiness, issues the commands and records what is on display.
//! - [`SpeechLifecycleCoordinator`] consumes engine-agnostic start/end
//!   signals and runs the pending restore hook when speech ends.
//! - [`LipSyncListener`] drives mouth movement from the same signals.

mod controller;
mod lipsync;
mod pipeline;
mod speech;
mod state;

pub use controller::{ApplyOutcome, ApplyReason, AvatarStateController, DEFAULT_MIN_CONFIDENCE};
pub use lipsync::LipSyncListener;
pub use pipeline::EmotionPipeline;
pub use speech::{RestoreHook, RestoreHookId, SpeechLifecycleCoordinator, SpeechListener};
pub use state::{AvatarDisplayState, SharedDisplayState};
