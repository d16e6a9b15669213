//! Voice module for Natori
//!
//! Provides the Text-to-Speech (TTS) abstraction and the speech session that
//! turns any engine into start/end signals for the avatar.
//! Concrete cloud or local engines implement [`TextToSpeech`] elsewhere.

mod filter;
mod session;
mod simulated;
mod tts;

pub use filter::speakable_text;
pub use session::{SpeechReport, SpeechSession};
pub use simulated::{PacedSink, SimulatedSpeech};
pub use tts::{AudioClip, AudioFormat, AudioSink, TextToSpeech};
