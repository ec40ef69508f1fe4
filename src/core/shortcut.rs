//! src/core/shortcut.rs
//!
//! Shortcut and remap row types
//!
//! A `Shortcut` is an ordered collection of up to four modifier keys plus at
//! most one action key, optionally extended with a second sequential action
//! key press (a chord). `RemapRow` pairs a source key-or-shortcut with a
//! target and an optional target-application scope; `RemapBuffer` is the
//! in-memory list of rows being edited before they are committed.
//!
//! Equality and hashing on `Shortcut` are modifier-order independent, so
//! Ctrl+Shift+K and Shift+Ctrl+K compare equal (the same normalisation the
//! conflict index relies on).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::keys::VirtualKey;

/// Largest number of modifier slots a shortcut editor offers.
pub const MAX_SHORTCUT_MODIFIERS: usize = 4;
/// Largest number of editor slots (modifiers plus the action key).
pub const MAX_SHORTCUT_SLOTS: usize = MAX_SHORTCUT_MODIFIERS + 1;
/// Smallest legal shortcut: one modifier and one action key.
pub const MIN_SHORTCUT_SLOTS: usize = 2;

/// A modifier chord plus at most one action key, optionally extended with a
/// second chord key press.
///
/// Modifiers are kept in press order for display; at most one key per
/// modifier family is held. The chord key is only meaningful once the action
/// key is set.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Shortcut {
    modifiers: Vec<VirtualKey>,
    action_key: Option<VirtualKey>,
    chord_key: Option<VirtualKey>,
}

impl Shortcut {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a shortcut from modifiers-then-action key order.
    ///
    /// Returns `None` when the sequence does not fit the shortcut shape
    /// (modifiers first, exactly one trailing action key, family repeats).
    pub fn from_keys(keys: &[VirtualKey]) -> Option<Self> {
        let mut shortcut = Shortcut::new();

        for (i, &key) in keys.iter().enumerate() {
            if key.is_modifier() {
                if shortcut.action_key.is_some() || shortcut.has_family(key) {
                    return None;
                }
                if shortcut.modifiers.len() == MAX_SHORTCUT_MODIFIERS {
                    return None;
                }
                shortcut.modifiers.push(key);
            } else if key.is_action() {
                if i != keys.len() - 1 || shortcut.modifiers.is_empty() {
                    return None;
                }
                shortcut.action_key = Some(key);
            } else {
                return None;
            }
        }

        shortcut.action_key.map(|_| shortcut)
    }

    pub fn modifiers(&self) -> &[VirtualKey] {
        &self.modifiers
    }

    pub fn action_key(&self) -> Option<VirtualKey> {
        self.action_key
    }

    pub fn chord_key(&self) -> Option<VirtualKey> {
        self.chord_key
    }

    /// True when a held modifier aliases to the same family as `key`.
    pub fn has_family(&self, key: VirtualKey) -> bool {
        match key.family() {
            Some(family) => self.modifiers.iter().any(|m| m.family() == Some(family)),
            None => false,
        }
    }

    /// Applies a key press to the in-progress shortcut.
    ///
    /// Modifiers accumulate (one per family; a same-family press replaces the
    /// held variant). An action key sets the action slot; with chord building
    /// enabled, further action presses keep a rotating window of the last two
    /// action keys: the previous action key becomes the first chord key and
    /// the new press becomes the second.
    ///
    /// Returns true when the shortcut changed.
    pub fn set_key(&mut self, key: VirtualKey, chord_enabled: bool) -> bool {
        if key.is_disabled() {
            return false;
        }

        if key.is_modifier() {
            if let Some(held) = self
                .modifiers
                .iter_mut()
                .find(|m| m.family() == key.family())
            {
                if *held == key {
                    return false;
                }
                *held = key;
                return true;
            }
            if self.modifiers.len() >= MAX_SHORTCUT_MODIFIERS {
                return false;
            }
            self.modifiers.push(key);
            return true;
        }

        match (self.action_key, self.chord_key) {
            (None, _) => {
                self.action_key = Some(key);
                true
            }
            (Some(action), None) => {
                if action == key {
                    false
                } else if chord_enabled {
                    self.chord_key = Some(key);
                    true
                } else {
                    self.action_key = Some(key);
                    true
                }
            }
            (Some(_), Some(chord)) => {
                if chord == key {
                    false
                } else if chord_enabled {
                    self.action_key = Some(chord);
                    self.chord_key = Some(key);
                    true
                } else {
                    self.action_key = Some(key);
                    self.chord_key = None;
                    true
                }
            }
        }
    }

    /// Applies a key release: only modifiers leave the in-progress shortcut.
    ///
    /// Action and chord keys persist until the session resets, so chord
    /// building survives the key-up between the two presses. Returns true
    /// when the shortcut changed.
    pub fn clear_modifier(&mut self, key: VirtualKey) -> bool {
        let Some(family) = key.family() else {
            return false;
        };
        let before = self.modifiers.len();
        self.modifiers.retain(|m| m.family() != Some(family));
        self.modifiers.len() != before
    }

    /// Number of keys held: modifiers, action key, chord key.
    pub fn size(&self) -> usize {
        self.modifiers.len()
            + usize::from(self.action_key.is_some())
            + usize::from(self.chord_key.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// A complete shortcut has at least one modifier and exactly one action key.
    pub fn is_valid(&self) -> bool {
        !self.modifiers.is_empty() && self.action_key.is_some()
    }

    /// Render-ready key list: modifiers in press order, then action, then chord.
    pub fn display_keys(&self) -> Vec<VirtualKey> {
        let mut keys = self.modifiers.clone();
        keys.extend(self.action_key);
        keys.extend(self.chord_key);
        keys
    }

    pub fn clear(&mut self) {
        self.modifiers.clear();
        self.action_key = None;
        self.chord_key = None;
    }

    fn sorted_modifiers(&self) -> Vec<VirtualKey> {
        let mut mods = self.modifiers.clone();
        mods.sort_by_key(|k| k.0);
        mods
    }
}

impl PartialEq for Shortcut {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_modifiers() == other.sorted_modifiers()
            && self.action_key == other.action_key
            && self.chord_key == other.chord_key
    }
}

impl Eq for Shortcut {}

impl Hash for Shortcut {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted_modifiers().hash(state);
        self.action_key.hash(state);
        self.chord_key.hash(state);
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .modifiers
            .iter()
            .copied()
            .chain(self.action_key)
            .map(|k| k.name())
            .collect::<Vec<_>>()
            .join("+");
        write!(f, "{joined}")?;

        if let Some(chord) = self.chord_key {
            write!(f, ", {}", chord.name())?;
        }

        Ok(())
    }
}

/// What a row remaps from.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum RemapSource {
    Key(VirtualKey),
    Shortcut(Shortcut),
}

impl fmt::Display for RemapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemapSource::Key(key) => write!(f, "{key}"),
            RemapSource::Shortcut(shortcut) => write!(f, "{shortcut}"),
        }
    }
}

/// What a row remaps to.
///
/// `Exec` covers the host's execution targets (run program / open URI); the
/// engine treats it as opaque and only requires a non-empty payload.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum RemapTarget {
    Key(VirtualKey),
    Shortcut(Shortcut),
    Text(String),
    Exec(String),
}

impl fmt::Display for RemapTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemapTarget::Key(key) => write!(f, "{key}"),
            RemapTarget::Shortcut(shortcut) => write!(f, "{shortcut}"),
            RemapTarget::Text(text) => write!(f, "text:{text}"),
            RemapTarget::Exec(what) => write!(f, "exec:{what}"),
        }
    }
}

/// One proposed source → target mapping being edited.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RemapRow {
    pub source: RemapSource,
    pub target: RemapTarget,
    /// Target application the row is scoped to; `None` means global.
    pub target_app: Option<String>,
}

impl RemapRow {
    /// Creates a row, normalising a blank application name to global scope.
    pub fn new(source: RemapSource, target: RemapTarget, target_app: Option<String>) -> Self {
        let target_app = target_app
            .map(|app| app.trim().to_lowercase())
            .filter(|app| !app.is_empty());
        Self {
            source,
            target,
            target_app,
        }
    }

    pub fn global(source: RemapSource, target: RemapTarget) -> Self {
        Self::new(source, target, None)
    }

    /// Scope key used for conflict grouping ("" = global).
    pub fn scope(&self) -> &str {
        self.target_app.as_deref().unwrap_or("")
    }
}

impl fmt::Display for RemapRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source, self.target)?;
        if let Some(app) = &self.target_app {
            write!(f, " [{app}]")?;
        }
        Ok(())
    }
}

/// The editable list of remap rows.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RemapBuffer {
    rows: Vec<RemapRow>,
}

impl RemapBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<RemapRow>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, row: RemapRow) {
        self.rows.push(row);
    }

    /// Removes a row; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
    }

    pub fn row(&self, index: usize) -> Option<&RemapRow> {
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut RemapRow> {
        self.rows.get_mut(index)
    }

    pub fn rows(&self) -> &[RemapRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
