//! Shared detection state
//!
//! Single point of synchronization between the host's input-hook callback
//! and the editor UI. The hook calls [`SharedDetectionState::dispatch_single_key`]
//! or [`SharedDetectionState::dispatch_shortcut`] on every key event and is
//! expected back within a strict latency budget, so nothing on that path
//! blocks: every shared piece (mode, session, classifier registry, sinks)
//! sits behind its own short-lived lock, no lock is held while a callback
//! runs, and UI updates go through a bounded channel with `try_send`.
//!
//! The dispatch path has no error return. Whatever happens internally, it
//! produces one of the three hook decisions; anything inconsistent degrades
//! to `ContinueToNextHandler` so system-wide input can never stall here.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, trace};

use crate::core::keys::VirtualKey;
use crate::core::shortcut::Shortcut;
use crate::detection::hold::{
    instant_tick_source, HoldCallbacks, HoldEvent, KeyEventKind, KeyHoldClassifier, TickSource,
};
use crate::detection::sink::{DisplayUpdate, UiSender};

/// Opaque window identifier; equality only, no validity assumptions.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct WindowHandle(pub u64);

/// Which editor surface currently owns input, if any.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UiMode {
    Deactivated,
    /// The single-key detection dialog is recording.
    DetectingSingleKey,
    /// The shortcut detection dialog is recording.
    DetectingShortcut,
    /// The key editor is recording a shortcut target.
    DetectingShortcutWhileEditingKeys,
    /// The key editor window is open but not recording.
    EditingKeysWindowActive,
    /// The shortcut editor window is open but not recording.
    EditingShortcutsWindowActive,
}

impl UiMode {
    fn is_detecting(self) -> bool {
        matches!(
            self,
            UiMode::DetectingSingleKey
                | UiMode::DetectingShortcut
                | UiMode::DetectingShortcutWhileEditingKeys
        )
    }
}

/// Verdict returned to the input-hook layer for each event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HookDecision {
    /// Pass the event to the rest of the handler chain.
    ContinueToNextHandler,
    /// Swallow the event entirely.
    Suppress,
    /// Let the event through without applying live remaps.
    SkipRemaining,
}

/// Host-provided lookup for the OS foreground window.
///
/// Injected rather than read from a global so both the hook adapter and the
/// tests construct the state explicitly.
pub trait ForegroundProbe: Send + Sync {
    fn foreground_window(&self) -> WindowHandle;
}

/// One key event as seen by the hook.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InputKeyEvent {
    pub key: VirtualKey,
    pub kind: KeyEventKind,
    /// Opaque monotonic tick in milliseconds; wraps around.
    pub time: u32,
}

impl InputKeyEvent {
    fn hold_event(&self) -> HoldEvent {
        HoldEvent {
            kind: self.kind,
            time: self.time,
        }
    }
}

/// The shortcut/key currently being recorded for the UI.
#[derive(Debug, Default)]
struct DetectionSession {
    shortcut: Shortcut,
    selected_key: Option<VirtualKey>,
    chord_enabled: bool,
}

struct ModeState {
    mode: UiMode,
    window: WindowHandle,
}

/// Cross-thread coordinator consulted by the input hook on every key event.
///
/// Owns the in-progress detection session, the UI mode, the UI sinks, and
/// the registry of active [`KeyHoldClassifier`] instances (exactly one per
/// registered key).
pub struct SharedDetectionState {
    mode: Mutex<ModeState>,
    session: Mutex<DetectionSession>,
    classifiers: Mutex<HashMap<VirtualKey, KeyHoldClassifier>>,
    key_sink: Mutex<Option<UiSender>>,
    shortcut_sink: Mutex<Option<UiSender>>,
    foreground: Arc<dyn ForegroundProbe>,
}

impl SharedDetectionState {
    pub fn new(foreground: Arc<dyn ForegroundProbe>) -> Self {
        Self {
            mode: Mutex::new(ModeState {
                mode: UiMode::Deactivated,
                window: WindowHandle::default(),
            }),
            session: Mutex::new(DetectionSession::default()),
            classifiers: Mutex::new(HashMap::new()),
            key_sink: Mutex::new(None),
            shortcut_sink: Mutex::new(None),
            foreground,
        }
    }

    /// Switches the UI mode; single writer, called from the UI thread.
    ///
    /// Transitioning to `Deactivated` resets the in-progress session so no
    /// stale shortcut survives a closed dialog.
    pub fn set_mode(&self, mode: UiMode, window: WindowHandle) {
        {
            let mut state = self.mode.lock();
            state.mode = mode;
            state.window = window;
        }
        debug!(?mode, window = window.0, "ui mode changed");

        if mode == UiMode::Deactivated {
            let mut session = self.session.lock();
            session.shortcut.clear();
            session.selected_key = None;
        }
    }

    pub fn current_mode(&self) -> UiMode {
        self.mode.lock().mode
    }

    /// True when the current mode satisfies `wanted`.
    ///
    /// The editing modes are a superset of their detecting modes, so probing
    /// for an editing window also succeeds while its detection dialog is
    /// recording. For the detecting modes the recorded window must be the OS
    /// foreground window; a background detection dialog must not intercept
    /// keys.
    pub fn check_mode(&self, wanted: UiMode) -> bool {
        let (mode, window) = {
            let state = self.mode.lock();
            (state.mode, state.window)
        };

        let matches = mode == wanted
            || matches!(
                (mode, wanted),
                (UiMode::DetectingSingleKey, UiMode::EditingKeysWindowActive)
                    | (
                        UiMode::DetectingShortcutWhileEditingKeys,
                        UiMode::EditingKeysWindowActive
                    )
                    | (UiMode::DetectingShortcut, UiMode::EditingShortcutsWindowActive)
            );
        if !matches {
            return false;
        }

        if wanted.is_detecting() {
            return self.foreground.foreground_window() == window;
        }
        true
    }

    /// Enables chord building for the current session.
    pub fn set_chord_enabled(&self, enabled: bool) {
        self.session.lock().chord_enabled = enabled;
    }

    /// Registers the sink that receives single-key display updates.
    pub fn register_ui_key_sink(&self, sink: UiSender) {
        *self.key_sink.lock() = Some(sink);
    }

    /// Registers the sink that receives shortcut display updates.
    pub fn register_ui_shortcut_sink(&self, sink: UiSender) {
        *self.shortcut_sink.lock() = Some(sink);
    }

    /// The key recorded by the single-key detection dialog, if any.
    pub fn detected_key(&self) -> Option<VirtualKey> {
        self.session.lock().selected_key
    }

    /// Snapshot of the shortcut being recorded.
    pub fn detected_shortcut(&self) -> Shortcut {
        self.session.lock().shortcut.clone()
    }

    /// Spawns and registers the hold classifier for `key`.
    ///
    /// Registering a key twice is a bug in the calling UI code, not a
    /// recoverable runtime condition: it trips a debug assertion and is
    /// ignored (with an error log) in release builds.
    pub fn register_key_hold_classifier(
        &self,
        key: VirtualKey,
        threshold_ms: u32,
        callbacks: HoldCallbacks,
    ) {
        self.register_key_hold_classifier_with_ticks(key, threshold_ms, callbacks, instant_tick_source());
    }

    /// As [`Self::register_key_hold_classifier`], with an injected tick source.
    pub fn register_key_hold_classifier_with_ticks(
        &self,
        key: VirtualKey,
        threshold_ms: u32,
        callbacks: HoldCallbacks,
        ticks: TickSource,
    ) {
        let mut classifiers = self.classifiers.lock();
        if classifiers.contains_key(&key) {
            error!(key = %key, "classifier already registered");
            debug_assert!(false, "classifier already registered for {key}");
            return;
        }
        classifiers.insert(key, KeyHoldClassifier::spawn(key, threshold_ms, callbacks, ticks));
    }

    /// Stops and removes the classifier for `key`.
    ///
    /// Unregistering a key that was never registered is a bug in the calling
    /// UI code, handled like double registration. Must not be called from
    /// inside one of the classifier's own callbacks; the join would deadlock.
    pub fn unregister_key_hold_classifier(&self, key: VirtualKey) {
        let removed = self.classifiers.lock().remove(&key);
        if removed.is_none() {
            error!(key = %key, "classifier was never registered");
            debug_assert!(false, "classifier was never registered for {key}");
        }
        // Dropping outside the registry lock joins the worker without
        // stalling concurrent dispatch.
        drop(removed);
    }

    pub fn has_classifier(&self, key: VirtualKey) -> bool {
        self.classifiers.lock().contains_key(&key)
    }

    /// Clears the session, detaches the UI sinks, and stops all classifiers.
    ///
    /// Called when a detection dialog or editor window closes, so no
    /// callback can fire into a destroyed UI sink afterwards. Must be called
    /// from outside the classifier workers.
    pub fn reset_session(&self) {
        {
            let mut session = self.session.lock();
            session.shortcut.clear();
            session.selected_key = None;
            session.chord_enabled = false;
        }
        *self.key_sink.lock() = None;
        *self.shortcut_sink.lock() = None;

        let drained: Vec<KeyHoldClassifier> = {
            let mut classifiers = self.classifiers.lock();
            classifiers.drain().map(|(_, classifier)| classifier).collect()
        };
        drop(drained);
        debug!("detection session reset");
    }

    /// Hook entry point while the single-key detection dialog may be active.
    pub fn dispatch_single_key(&self, event: InputKeyEvent) -> HookDecision {
        if self.check_mode(UiMode::DetectingSingleKey) {
            // Accelerator keys (Enter/Escape) go to their classifier first.
            if self.feed_classifier(&event) {
                return HookDecision::Suppress;
            }

            if event.kind == KeyEventKind::Down {
                let mut session = self.session.lock();
                session.selected_key = Some(event.key);
                drop(session);
                trace!(key = %event.key, "single key recorded");
                self.push_update(&self.key_sink, DisplayUpdate::new(vec![event.key]));
            }
            return HookDecision::Suppress;
        }

        if self.check_mode(UiMode::EditingKeysWindowActive) {
            return HookDecision::SkipRemaining;
        }

        HookDecision::ContinueToNextHandler
    }

    /// Hook entry point while a shortcut is being recorded.
    ///
    /// `is_for_key_editor` selects the key editor's shortcut-target recording
    /// over the shortcut editor's own dialog.
    pub fn dispatch_shortcut(&self, event: InputKeyEvent, is_for_key_editor: bool) -> HookDecision {
        let wanted = if is_for_key_editor {
            UiMode::DetectingShortcutWhileEditingKeys
        } else {
            UiMode::DetectingShortcut
        };

        if self.check_mode(wanted) {
            if self.feed_classifier(&event) {
                return HookDecision::Suppress;
            }

            let mut session = self.session.lock();
            let chord_enabled = session.chord_enabled;
            let changed = match event.kind {
                KeyEventKind::Down => session.shortcut.set_key(event.key, chord_enabled),
                KeyEventKind::Up => session.shortcut.clear_modifier(event.key),
            };
            let update = changed.then(|| DisplayUpdate::new(session.shortcut.display_keys()));
            drop(session);

            if let Some(update) = update {
                trace!(key = %event.key, ?event.kind, "shortcut updated");
                self.push_update(&self.shortcut_sink, update);
            }
            return HookDecision::Suppress;
        }

        if self.check_mode(UiMode::EditingShortcutsWindowActive) {
            return HookDecision::SkipRemaining;
        }

        // Not detecting: a leftover in-progress shortcut is stale.
        let mut session = self.session.lock();
        if !session.shortcut.is_empty() {
            session.shortcut.clear();
            debug!("cleared stale in-progress shortcut");
        }

        HookDecision::ContinueToNextHandler
    }

    /// Feeds the event to the key's classifier, if one is registered.
    fn feed_classifier(&self, event: &InputKeyEvent) -> bool {
        let classifiers = self.classifiers.lock();
        match classifiers.get(&event.key) {
            Some(classifier) => {
                classifier.feed(event.hold_event());
                true
            }
            None => false,
        }
    }

    /// Posts an update to a sink without ever blocking; a slow or detached
    /// UI just misses intermediate snapshots.
    fn push_update(&self, sink: &Mutex<Option<UiSender>>, update: DisplayUpdate) {
        let guard = sink.lock();
        if let Some(sender) = guard.as_ref() {
            if let Err(e) = sender.try_send(update) {
                trace!("dropping ui update: {e}");
            }
        }
    }
}
