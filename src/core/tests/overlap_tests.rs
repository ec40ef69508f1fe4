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

use crate::core::keys::VirtualKey;
use crate::core::shortcut::{RemapBuffer, RemapRow, RemapSource, RemapTarget, Shortcut};
use crate::core::validator::{
    keys_overlap, shortcuts_overlap, validate_row_source, ValidationError,
};

const A: VirtualKey = VirtualKey(0x41);
const B: VirtualKey = VirtualKey(0x42);

fn shortcut(keys: &[VirtualKey]) -> Shortcut {
    Shortcut::from_keys(keys).expect("test shortcut must be well-formed")
}

#[test]
fn test_identical_keys_are_already_mapped() {
    assert_eq!(
        keys_overlap(VirtualKey::LCONTROL, VirtualKey::LCONTROL),
        Err(ValidationError::SameKeyPreviouslyMapped)
    );
    assert_eq!(keys_overlap(A, A), Err(ValidationError::SameKeyPreviouslyMapped));
}

#[test]
fn test_left_right_pair_is_allowed() {
    assert_eq!(keys_overlap(VirtualKey::LCONTROL, VirtualKey::RCONTROL), Ok(()));
    assert_eq!(keys_overlap(VirtualKey::RSHIFT, VirtualKey::LSHIFT), Ok(()));
}

#[test]
fn test_combined_form_conflicts_with_sided_variant() {
    assert_eq!(
        keys_overlap(VirtualKey::CONTROL, VirtualKey::LCONTROL),
        Err(ValidationError::ConflictingModifierKey)
    );
    assert_eq!(
        keys_overlap(VirtualKey::RWIN, VirtualKey::WIN),
        Err(ValidationError::ConflictingModifierKey)
    );
}

#[test]
fn test_distinct_modifier_families_conflict() {
    assert_eq!(
        keys_overlap(VirtualKey::LCONTROL, VirtualKey::LALT),
        Err(ValidationError::ConflictingModifierKey)
    );
}

#[test]
fn test_action_keys_do_not_overlap() {
    assert_eq!(keys_overlap(A, B), Ok(()));
    assert_eq!(keys_overlap(VirtualKey::LCONTROL, A), Ok(()));
}

#[test]
fn test_identical_shortcuts_are_already_mapped() {
    let first = shortcut(&[VirtualKey::LCONTROL, A]);
    let second = shortcut(&[VirtualKey::LCONTROL, A]);

    assert_eq!(
        shortcuts_overlap(&first, &second),
        Err(ValidationError::SameShortcutPreviouslyMapped)
    );
}

#[test]
fn test_combined_modifier_shortcut_conflicts_with_sided_one() {
    let combined = shortcut(&[VirtualKey::CONTROL, A]);
    let sided = shortcut(&[VirtualKey::LCONTROL, A]);

    assert_eq!(
        shortcuts_overlap(&combined, &sided),
        Err(ValidationError::ConflictingModifierShortcut)
    );
}

#[test]
fn test_left_right_split_shortcuts_do_not_conflict() {
    let left = shortcut(&[VirtualKey::LCONTROL, A]);
    let right = shortcut(&[VirtualKey::RCONTROL, A]);

    assert_eq!(shortcuts_overlap(&left, &right), Ok(()));
}

#[test]
fn test_different_action_keys_do_not_conflict() {
    let first = shortcut(&[VirtualKey::CONTROL, A]);
    let second = shortcut(&[VirtualKey::CONTROL, B]);

    assert_eq!(shortcuts_overlap(&first, &second), Ok(()));
}

#[test]
fn test_different_families_do_not_conflict() {
    let ctrl = shortcut(&[VirtualKey::CONTROL, A]);
    let alt = shortcut(&[VirtualKey::ALT, A]);

    assert_eq!(shortcuts_overlap(&ctrl, &alt), Ok(()));
}

#[test]
fn test_row_mapping_key_to_itself_is_rejected() {
    let mut buffer = RemapBuffer::new();
    buffer.push(RemapRow::global(RemapSource::Key(A), RemapTarget::Key(A)));

    assert_eq!(
        validate_row_source(0, &buffer),
        Err(ValidationError::MapToSameKey)
    );
}

#[test]
fn test_row_mapping_shortcut_to_itself_is_rejected() {
    let combo = shortcut(&[VirtualKey::CONTROL, A]);
    let mut buffer = RemapBuffer::new();
    buffer.push(RemapRow::global(
        RemapSource::Shortcut(combo.clone()),
        RemapTarget::Shortcut(combo),
    ));

    assert_eq!(
        validate_row_source(0, &buffer),
        Err(ValidationError::MapToSameShortcut)
    );
}

#[test]
fn test_duplicate_source_in_same_scope_is_rejected() {
    let mut buffer = RemapBuffer::new();
    buffer.push(RemapRow::global(RemapSource::Key(A), RemapTarget::Key(B)));
    buffer.push(RemapRow::global(
        RemapSource::Key(A),
        RemapTarget::Text("hi".into()),
    ));

    assert_eq!(
        validate_row_source(1, &buffer),
        Err(ValidationError::SameKeyPreviouslyMapped)
    );
}

#[test]
fn test_duplicate_source_in_other_scope_is_allowed() {
    let mut buffer = RemapBuffer::new();
    buffer.push(RemapRow::global(RemapSource::Key(A), RemapTarget::Key(B)));
    buffer.push(RemapRow::new(
        RemapSource::Key(A),
        RemapTarget::Text("hi".into()),
        Some("firefox.exe".into()),
    ));

    assert_eq!(validate_row_source(1, &buffer), Ok(()));
}

#[test]
fn test_key_and_shortcut_sources_do_not_collide() {
    let mut buffer = RemapBuffer::new();
    buffer.push(RemapRow::global(RemapSource::Key(A), RemapTarget::Key(B)));
    buffer.push(RemapRow::global(
        RemapSource::Shortcut(shortcut(&[VirtualKey::CONTROL, A])),
        RemapTarget::Key(B),
    ));

    assert_eq!(validate_row_source(1, &buffer), Ok(()));
}
