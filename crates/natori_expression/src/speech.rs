//! Speech-Lifecycle Coordinator
//!
//! Binds the avatar's emotion display to the start/end signals of whatever
//! speech engine is active. The coordinator never talks to an engine; it
//! only consumes [`SpeechSignals`].
//!
//! At most one restore hook is pending. Registering a new one supersedes
//! the previous hook, which is dropped without running (last write wins).

use crate::state::SharedDisplayState;
use natori_core::SpeechSignals;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callback run once when the current utterance finishes.
pub type RestoreHook = Box<dyn FnOnce() + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RestoreHookId(u64);

/// Observer of speech start/end, notified after the display state changed.
pub trait SpeechListener: Send + Sync {
    fn on_speech_start(&self, engine_id: &str);
    fn on_speech_end(&self);
}

#[derive(Default)]
struct Pending {
    hook: Option<(RestoreHookId, RestoreHook)>,
    next_id: u64,
    listeners: Vec<Arc<dyn SpeechListener>>,
}

pub struct SpeechLifecycleCoordinator {
    state: SharedDisplayState,
    pending: Mutex<Pending>,
}

impl SpeechLifecycleCoordinator {
    pub fn new(state: SharedDisplayState) -> Self {
        Self {
            state,
            pending: Mutex::new(Pending::default()),
        }
    }

    pub fn display_state(&self) -> &SharedDisplayState {
        &self.state
    }

    pub fn subscribe(&self, listener: Arc<dyn SpeechListener>) {
        self.lock().listeners.push(listener);
    }

    pub fn notify_speech_start(&self, engine_id: &str) {
        tracing::debug!("Speech started (engine: {})", engine_id);
        self.state.set_speech(Some(engine_id));
        for listener in self.listeners() {
            listener.on_speech_start(engine_id);
        }
    }

    /// Clears the speech flag and runs the pending restore hook, if any.
    /// Ending with nothing pending is a silent no-op.
    pub fn notify_speech_end(&self) {
        self.state.set_speech(None);
        // Take the hook out first: it may re-enter the coordinator.
        let hook = self.lock().hook.take();
        match hook {
            Some((id, hook)) => {
                tracing::debug!("Speech ended, running restore hook {:?}", id);
                hook();
            }
            None => tracing::debug!("Speech ended with no pending restore hook"),
        }
        for listener in self.listeners() {
            listener.on_speech_end();
        }
    }

    /// Register the hook to run on the next speech end, replacing any
    /// hook still pending.
    pub fn register_restore_hook(&self, hook: RestoreHook) -> RestoreHookId {
        let (id, superseded) = {
            let mut pending = self.lock();
            let id = RestoreHookId(pending.next_id);
            pending.next_id += 1;
            (id, pending.hook.replace((id, hook)))
        };
        if let Some((old, _)) = superseded {
            tracing::debug!("Restore hook {:?} superseded by {:?}", old, id);
        }
        id
    }

    /// Drop the pending hook if it is still `id`. Returns whether it was.
    pub fn cancel_restore_hook(&self, id: RestoreHookId) -> bool {
        let mut pending = self.lock();
        match &pending.hook {
            Some((current, _)) if *current == id => {
                pending.hook = None;
                true
            }
            _ => false,
        }
    }

    /// Drop whatever hook is pending. Returns whether there was one.
    pub fn clear_restore_hook(&self) -> bool {
        let cleared = self.lock().hook.take();
        if let Some((id, _)) = &cleared {
            tracing::debug!("Restore hook {:?} cleared", id);
        }
        cleared.is_some()
    }

    pub fn has_pending_hook(&self) -> bool {
        self.lock().hook.is_some()
    }

    fn listeners(&self) -> Vec<Arc<dyn SpeechListener>> {
        self.lock().listeners.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SpeechSignals for SpeechLifecycleCoordinator {
    fn speech_started(&self, engine_id: &str) {
        self.notify_speech_start(engine_id);
    }

    fn speech_ended(&self) {
        self.notify_speech_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_hook(counter: &Arc<AtomicUsize>) -> RestoreHook {
        let counter = counter.clone();
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_start_and_end_toggle_speech_flag() {
        let coordinator = SpeechLifecycleCoordinator::new(SharedDisplayState::new("Normal"));
        coordinator.notify_speech_start("voicevox");
        let snap = coordinator.display_state().snapshot();
        assert!(snap.speech_in_progress);
        assert_eq!(snap.speaking_engine.as_deref(), Some("voicevox"));

        coordinator.notify_speech_end();
        let snap = coordinator.display_state().snapshot();
        assert!(!snap.speech_in_progress);
        assert!(snap.speaking_engine.is_none());
    }

    #[test]
    fn test_hook_runs_once() {
        let coordinator = SpeechLifecycleCoordinator::new(SharedDisplayState::new("Normal"));
        let runs = Arc::new(AtomicUsize::new(0));
        coordinator.register_restore_hook(counting_hook(&runs));
        assert!(coordinator.has_pending_hook());

        coordinator.notify_speech_end();
        coordinator.notify_speech_end();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!coordinator.has_pending_hook());
    }

    #[test]
    fn test_end_without_hook_is_noop() {
        let coordinator = SpeechLifecycleCoordinator::new(SharedDisplayState::new("Normal"));
        coordinator.notify_speech_end();
        assert!(coordinator.display_state().is_at_baseline());
    }

    #[test]
    fn test_superseded_hook_is_orphaned() {
        let coordinator = SpeechLifecycleCoordinator::new(SharedDisplayState::new("Normal"));
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let first_id = coordinator.register_restore_hook(counting_hook(&first));
        let second_id = coordinator.register_restore_hook(counting_hook(&second));
        assert_ne!(first_id, second_id);

        coordinator.notify_speech_end();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_only_matching_hook() {
        let coordinator = SpeechLifecycleCoordinator::new(SharedDisplayState::new("Normal"));
        let runs = Arc::new(AtomicUsize::new(0));
        let old = coordinator.register_restore_hook(counting_hook(&runs));
        let current = coordinator.register_restore_hook(counting_hook(&runs));

        assert!(!coordinator.cancel_restore_hook(old));
        assert!(coordinator.has_pending_hook());
        assert!(coordinator.cancel_restore_hook(current));

        coordinator.notify_speech_end();
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_hook_may_register_again() {
        let coordinator = Arc::new(SpeechLifecycleCoordinator::new(SharedDisplayState::new(
            "Normal",
        )));
        let runs = Arc::new(AtomicUsize::new(0));
        let inner = coordinator.clone();
        let counter = runs.clone();
        coordinator.register_restore_hook(Box::new(move || {
            inner.register_restore_hook(counting_hook(&counter));
        }));

        coordinator.notify_speech_end();
        assert!(coordinator.has_pending_hook());
        coordinator.notify_speech_end();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    struct RecordingListener {
        events: Mutex<Vec<String>>,
    }

    impl SpeechListener for RecordingListener {
        fn on_speech_start(&self, engine_id: &str) {
            self.events.lock().unwrap().push(format!("start:{}", engine_id));
        }

        fn on_speech_end(&self) {
            self.events.lock().unwrap().push("end".to_string());
        }
    }

    #[test]
    fn test_listeners_see_signals() {
        let coordinator = SpeechLifecycleCoordinator::new(SharedDisplayState::new("Normal"));
        let listener = Arc::new(RecordingListener {
            events: Mutex::new(Vec::new()),
        });
        coordinator.subscribe(listener.clone());

        coordinator.speech_started("web-speech");
        coordinator.speech_ended();
        assert_eq!(*listener.events.lock().unwrap(), vec!["start:web-speech", "end"]);
    }
}
