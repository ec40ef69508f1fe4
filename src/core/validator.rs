// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Remap validation
//!
//! Pure, stateless checks over edited cells and whole remap buffers. All
//! verdicts are returned as values from the closed [`ValidationError`] set;
//! nothing here panics or performs I/O, so every function is safe to call
//! from any thread.
//!
//! Slot validation additionally returns a [`SlotAction`] telling the editor
//! what structural change to apply to its slot list (add a slot after a
//! modifier, delete on "None", clear stale trailing slots after an action
//! key).

use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

use crate::core::conflict::check_remappings_valid;
use crate::core::keys::{ModifierSide, VirtualKey};
use crate::core::shortcut::{
    RemapBuffer, RemapSource, RemapTarget, Shortcut, MAX_SHORTCUT_SLOTS, MIN_SHORTCUT_SLOTS,
};

/// Validation verdicts shown inline by the editor.
///
/// This is a closed set: the editor recovers from every variant locally by
/// showing the message and resetting the offending control.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
    #[error("Key is already remapped")]
    SameKeyPreviouslyMapped,
    #[error("Cannot remap a key to itself")]
    MapToSameKey,
    #[error("Conflicts with another mapped modifier key")]
    ConflictingModifierKey,
    #[error("Shortcut is already remapped")]
    SameShortcutPreviouslyMapped,
    #[error("Cannot remap a shortcut to itself")]
    MapToSameShortcut,
    #[error("Conflicts with another mapped modifier shortcut")]
    ConflictingModifierShortcut,
    #[error("Shortcut must start with a modifier key")]
    ShortcutStartWithModifier,
    #[error("Shortcut cannot contain a repeated modifier")]
    ShortcutCannotHaveRepeatedModifier,
    #[error("Shortcut must have at least 2 keys")]
    ShortcutAtleast2Keys,
    #[error("Shortcut must end with an action key")]
    ShortcutOneActionKey,
    #[error("Shortcut cannot have more than one action key")]
    ShortcutNotMoreThanOneActionKey,
    #[error("Shortcut is full; the last key must be an action key")]
    ShortcutMaxShortcutSizeOneActionKey,
    #[error("Disable cannot be part of a shortcut")]
    ShortcutDisableAsActionKey,
    #[error("Remapping unsuccessful")]
    RemapUnsuccessful,
    #[error("Failed to save the remappings")]
    SaveFailed,
}

/// Structural change the editor must apply to its slot list after an edit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotAction {
    /// A modifier was chosen in the last slot and capacity remains.
    AddSlot,
    /// "None" was chosen and deletion is legal for the current slot count.
    DeleteSlot,
    /// An action key was chosen while stale empty trailing slots remain.
    ClearTrailingSlots,
    NoAction,
}

/// Verdict plus structural action for one edited slot.
pub type SlotVerdict = (Result<(), ValidationError>, SlotAction);

/// Column index of the source cell in a remap row.
pub const SOURCE_COLUMN: usize = 0;
/// Column index of the target cell in a remap row.
pub const TARGET_COLUMN: usize = 1;

/// Checks whether two source keys collide.
///
/// Identical keys are a duplicate mapping. Two modifier keys conflict unless
/// they are exactly a left/right pair of the same family; that pair
/// identifies two distinct physical keys and is allowed.
pub fn keys_overlap(a: VirtualKey, b: VirtualKey) -> Result<(), ValidationError> {
    if a == b {
        return Err(ValidationError::SameKeyPreviouslyMapped);
    }

    if a.is_modifier() && b.is_modifier() {
        let left_right_pair = a.family() == b.family()
            && matches!(
                (a.side(), b.side()),
                (Some(ModifierSide::Left), Some(ModifierSide::Right))
                    | (Some(ModifierSide::Right), Some(ModifierSide::Left))
            );
        if !left_right_pair {
            return Err(ValidationError::ConflictingModifierKey);
        }
    }

    Ok(())
}

/// Checks whether two source shortcuts collide.
///
/// Identical shortcuts are a duplicate mapping. Shortcuts with the same
/// action and chord keys whose modifier sets alias to the same families
/// conflict when a combined modifier faces a sided one (the combined form
/// matches either physical key); a pure left/right split is two distinct
/// physical chords and does not collide.
pub fn shortcuts_overlap(a: &Shortcut, b: &Shortcut) -> Result<(), ValidationError> {
    if a == b {
        return Err(ValidationError::SameShortcutPreviouslyMapped);
    }

    if a.action_key() != b.action_key() || a.chord_key() != b.chord_key() {
        return Ok(());
    }

    let families = |s: &Shortcut| {
        let mut f: Vec<u8> = s
            .modifiers()
            .iter()
            .filter_map(|m| m.family())
            .map(|f| f as u8)
            .collect();
        f.sort_unstable();
        f
    };
    if families(a) != families(b) {
        return Ok(());
    }

    for first in a.modifiers() {
        let Some(second) = b.modifiers().iter().find(|m| m.family() == first.family()) else {
            continue;
        };
        if first == second {
            continue;
        }
        // A left/right split can never fire from the same physical press.
        if keys_overlap(*first, *second).is_ok() {
            return Ok(());
        }
    }

    Err(ValidationError::ConflictingModifierShortcut)
}

/// True when the candidate's modifier family already appears among the
/// previously selected slots, so adding it would be the second occurrence.
pub fn is_repeated_modifier(selected: &[VirtualKey], candidate: VirtualKey) -> bool {
    match candidate.family() {
        Some(family) => selected.iter().any(|k| k.family() == Some(family)),
        None => false,
    }
}

/// Targets only need structural checks: text and execution payloads must be
/// non-empty, a shortcut target must be complete.
pub fn validate_target(target: &RemapTarget) -> Result<(), ValidationError> {
    match target {
        RemapTarget::Text(payload) | RemapTarget::Exec(payload) => {
            if payload.trim().is_empty() {
                Err(ValidationError::RemapUnsuccessful)
            } else {
                Ok(())
            }
        }
        RemapTarget::Shortcut(shortcut) => {
            if shortcut.action_key().is_none() {
                Err(ValidationError::ShortcutOneActionKey)
            } else if shortcut.modifiers().is_empty() {
                Err(ValidationError::ShortcutStartWithModifier)
            } else {
                Ok(())
            }
        }
        RemapTarget::Key(_) => Ok(()),
    }
}

/// Validates one row's committed source cell against the rest of the buffer.
///
/// Raises the self-map errors and the per-scope duplicate/aliasing errors;
/// rows in other scopes never collide.
pub fn validate_row_source(row_index: usize, buffer: &RemapBuffer) -> Result<(), ValidationError> {
    let Some(row) = buffer.row(row_index) else {
        return Ok(());
    };

    match (&row.source, &row.target) {
        (RemapSource::Key(source), RemapTarget::Key(target)) if source == target => {
            return Err(ValidationError::MapToSameKey);
        }
        (RemapSource::Shortcut(source), RemapTarget::Shortcut(target)) if source == target => {
            return Err(ValidationError::MapToSameShortcut);
        }
        _ => {}
    }

    for (i, other) in buffer.rows().iter().enumerate() {
        if i == row_index || other.scope() != row.scope() {
            continue;
        }
        match (&row.source, &other.source) {
            (RemapSource::Key(a), RemapSource::Key(b)) => keys_overlap(*a, *b)?,
            (RemapSource::Shortcut(a), RemapSource::Shortcut(b)) => shortcuts_overlap(a, b)?,
            _ => {}
        }
    }

    Ok(())
}

/// Whole-buffer validation run on "save".
///
/// Incomplete rows fail the save outright; duplicate sources within a scope
/// surface as the buffer-level remap error.
pub fn validate_for_save(buffer: &RemapBuffer) -> Result<(), ValidationError> {
    for row in buffer.rows() {
        if let RemapSource::Shortcut(shortcut) = &row.source {
            if !shortcut.is_valid() {
                return Err(ValidationError::SaveFailed);
            }
        }
        if validate_target(&row.target).is_err() {
            return Err(ValidationError::SaveFailed);
        }
    }

    check_remappings_valid(buffer)
}

/// Slot-by-slot validator for the multi-slot shortcut editor.
///
/// Carries the one-shot reload suppression: while a shortcut is being
/// reconstructed from saved settings the editor arms the flag, and the next
/// `validate_slot` call skips the lone-action-key warning. The flag is
/// cleared by that call regardless of its outcome.
#[derive(Debug, Default)]
pub struct ShortcutCellValidator {
    suppress_lone_action: AtomicBool,
}

impl ShortcutCellValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the one-shot suppression used while reloading saved shortcuts.
    pub fn arm_reload_suppression(&self) {
        self.suppress_lone_action.store(true, Ordering::Relaxed);
    }

    #[cfg(test)]
    pub(crate) fn suppression_armed(&self) -> bool {
        self.suppress_lone_action.load(Ordering::Relaxed)
    }

    /// Evaluates one edited slot of a shortcut cell.
    ///
    /// `slots` is the slot list after the edit (`None` = the empty "None"
    /// selection), `slot_index` the edited slot. `col_index` distinguishes
    /// the source cell (checked for collisions against the buffer) from the
    /// target cell (checked only against its own row). Rules are applied in
    /// order; the first violation wins and suppresses the structural action.
    #[allow(clippy::too_many_arguments)]
    pub fn validate_slot(
        &self,
        row_index: usize,
        col_index: usize,
        slot_index: usize,
        slots: &[Option<VirtualKey>],
        target_app: Option<&str>,
        is_hybrid: bool,
        buffer: &RemapBuffer,
    ) -> SlotVerdict {
        // One-shot: consumed by this call no matter what it returns.
        let suppress_lone_action = self.suppress_lone_action.swap(false, Ordering::Relaxed);

        let selected = slots.get(slot_index).copied().flatten();
        let trailing = &slots[(slot_index + 1).min(slots.len())..];
        let trailing_nonempty = trailing.iter().any(Option::is_some);
        let earlier: Vec<VirtualKey> = slots[..slot_index.min(slots.len())]
            .iter()
            .copied()
            .flatten()
            .collect();

        let Some(key) = selected else {
            return Self::validate_deletion(slots.len(), is_hybrid);
        };

        let structural = if key.is_disabled() {
            // Disable only stands alone as a hybrid single-key selection.
            if is_hybrid && slot_index == 0 && !trailing_nonempty {
                let action = if slots.len() > 1 {
                    SlotAction::ClearTrailingSlots
                } else {
                    SlotAction::NoAction
                };
                (Ok(()), action)
            } else {
                (
                    Err(ValidationError::ShortcutDisableAsActionKey),
                    SlotAction::NoAction,
                )
            }
        } else if key.is_action() {
            Self::validate_action_slot(
                slot_index,
                slots.len(),
                trailing_nonempty,
                trailing,
                is_hybrid || suppress_lone_action,
            )
        } else {
            Self::validate_modifier_slot(slot_index, slots.len(), &earlier, key)
        };

        if structural.0.is_err() {
            return structural;
        }

        // Structural pass: check the completed selection against the buffer.
        if let Err(e) = Self::check_collisions(row_index, col_index, slots, target_app, buffer) {
            return (Err(e), SlotAction::NoAction);
        }

        structural
    }

    fn validate_deletion(slot_count: usize, is_hybrid: bool) -> SlotVerdict {
        let min_slots = if is_hybrid { 1 } else { MIN_SHORTCUT_SLOTS };
        if slot_count > min_slots {
            (Ok(()), SlotAction::DeleteSlot)
        } else if is_hybrid {
            // A lone hybrid slot is simply cleared, not deleted.
            (Ok(()), SlotAction::NoAction)
        } else {
            (
                Err(ValidationError::ShortcutAtleast2Keys),
                SlotAction::NoAction,
            )
        }
    }

    fn validate_action_slot(
        slot_index: usize,
        slot_count: usize,
        trailing_nonempty: bool,
        trailing: &[Option<VirtualKey>],
        allow_lone_key: bool,
    ) -> SlotVerdict {
        if slot_index == 0 {
            if !allow_lone_key || trailing_nonempty {
                return (
                    Err(ValidationError::ShortcutStartWithModifier),
                    SlotAction::NoAction,
                );
            }
            let action = if slot_count > 1 {
                SlotAction::ClearTrailingSlots
            } else {
                SlotAction::NoAction
            };
            return (Ok(()), action);
        }

        if trailing_nonempty {
            let trailing_action = trailing.iter().copied().flatten().any(VirtualKey::is_action);
            let error = if trailing_action {
                ValidationError::ShortcutNotMoreThanOneActionKey
            } else {
                ValidationError::ShortcutOneActionKey
            };
            return (Err(error), SlotAction::NoAction);
        }

        if trailing.is_empty() {
            (Ok(()), SlotAction::NoAction)
        } else {
            (Ok(()), SlotAction::ClearTrailingSlots)
        }
    }

    fn validate_modifier_slot(
        slot_index: usize,
        slot_count: usize,
        earlier: &[VirtualKey],
        key: VirtualKey,
    ) -> SlotVerdict {
        if is_repeated_modifier(earlier, key) {
            return (
                Err(ValidationError::ShortcutCannotHaveRepeatedModifier),
                SlotAction::NoAction,
            );
        }

        // The final slot is reserved for the action key.
        if slot_index == MAX_SHORTCUT_SLOTS - 1 {
            return (
                Err(ValidationError::ShortcutMaxShortcutSizeOneActionKey),
                SlotAction::NoAction,
            );
        }

        if slot_index == slot_count - 1 && slot_count < MAX_SHORTCUT_SLOTS {
            (Ok(()), SlotAction::AddSlot)
        } else {
            (Ok(()), SlotAction::NoAction)
        }
    }

    fn check_collisions(
        row_index: usize,
        col_index: usize,
        slots: &[Option<VirtualKey>],
        target_app: Option<&str>,
        buffer: &RemapBuffer,
    ) -> Result<(), ValidationError> {
        let keys: Vec<VirtualKey> = slots.iter().copied().flatten().collect();
        let scope = target_app
            .map(|app| app.trim().to_lowercase())
            .unwrap_or_default();

        if keys.len() == 1 {
            let only = keys[0];
            if col_index == SOURCE_COLUMN {
                for (i, row) in buffer.rows().iter().enumerate() {
                    if i == row_index || row.scope() != scope {
                        continue;
                    }
                    if let RemapSource::Key(existing) = &row.source {
                        keys_overlap(only, *existing)?;
                    }
                }
            } else if let Some(RemapSource::Key(source)) =
                buffer.row(row_index).map(|row| &row.source)
            {
                if *source == only {
                    return Err(ValidationError::MapToSameKey);
                }
            }
            return Ok(());
        }

        let Some(candidate) = Shortcut::from_keys(&keys) else {
            // Partial selections are validated once they complete.
            return Ok(());
        };

        if col_index == SOURCE_COLUMN {
            for (i, row) in buffer.rows().iter().enumerate() {
                if i == row_index || row.scope() != scope {
                    continue;
                }
                if let RemapSource::Shortcut(existing) = &row.source {
                    shortcuts_overlap(&candidate, existing)?;
                }
            }
        } else if let Some(RemapSource::Shortcut(source)) =
            buffer.row(row_index).map(|row| &row.source)
        {
            if *source == candidate {
                return Err(ValidationError::MapToSameShortcut);
            }
        }

        Ok(())
    }
}
