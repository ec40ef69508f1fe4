use crate::core::keys::VirtualKey;
use crate::core::shortcut::{RemapBuffer, RemapRow, RemapSource, RemapTarget, Shortcut};
use crate::core::validator::{
    ShortcutCellValidator, SlotAction, ValidationError, SOURCE_COLUMN, TARGET_COLUMN,
};

const A: VirtualKey = VirtualKey(0x41);
const B: VirtualKey = VirtualKey(0x42);
const CTRL: VirtualKey = VirtualKey::CONTROL;
const SHIFT: VirtualKey = VirtualKey::SHIFT;
const ALT: VirtualKey = VirtualKey::ALT;
const WIN: VirtualKey = VirtualKey::WIN;

fn validate(
    slot_index: usize,
    slots: &[Option<VirtualKey>],
    is_hybrid: bool,
) -> (Result<(), ValidationError>, SlotAction) {
    ShortcutCellValidator::new().validate_slot(
        0,
        SOURCE_COLUMN,
        slot_index,
        slots,
        None,
        is_hybrid,
        &RemapBuffer::new(),
    )
}

#[test]
fn test_lone_action_key_rejected_outside_hybrid_mode() {
    let (result, action) = validate(0, &[Some(A), None], false);
    assert_eq!(result, Err(ValidationError::ShortcutStartWithModifier));
    assert_eq!(action, SlotAction::NoAction);
}

#[test]
fn test_lone_action_key_allowed_in_hybrid_mode() {
    let (result, action) = validate(0, &[Some(A), None], true);
    assert_eq!(result, Ok(()));
    assert_eq!(action, SlotAction::ClearTrailingSlots);
}

#[test]
fn test_modifier_in_last_slot_grows_the_slot_list() {
    let (result, action) = validate(1, &[Some(CTRL), Some(SHIFT)], false);
    assert_eq!(result, Ok(()));
    assert_eq!(action, SlotAction::AddSlot);
}

#[test]
fn test_repeated_modifier_family_is_rejected() {
    let (result, action) = validate(1, &[Some(CTRL), Some(VirtualKey::LCONTROL), None], false);
    assert_eq!(
        result,
        Err(ValidationError::ShortcutCannotHaveRepeatedModifier)
    );
    assert_eq!(action, SlotAction::NoAction);
}

#[test]
fn test_repeated_family_in_final_slot_is_rejected_as_repeat() {
    let slots = [
        Some(CTRL),
        Some(SHIFT),
        Some(ALT),
        Some(WIN),
        Some(VirtualKey::LSHIFT),
    ];
    let (result, _) = validate(4, &slots, false);
    assert_eq!(
        result,
        Err(ValidationError::ShortcutCannotHaveRepeatedModifier)
    );
}

#[test]
fn test_modifier_in_final_slot_is_rejected() {
    // The final slot is reserved for the action key
    let slots = [
        None,
        Some(SHIFT),
        Some(ALT),
        Some(WIN),
        Some(VirtualKey::LCONTROL),
    ];
    let (result, action) = validate(4, &slots, false);
    assert_eq!(
        result,
        Err(ValidationError::ShortcutMaxShortcutSizeOneActionKey)
    );
    assert_eq!(action, SlotAction::NoAction);
}

#[test]
fn test_action_key_with_stale_empty_trailing_slots_clears_them() {
    let (result, action) = validate(1, &[Some(CTRL), Some(A), None, None], false);
    assert_eq!(result, Ok(()));
    assert_eq!(action, SlotAction::ClearTrailingSlots);
}

#[test]
fn test_action_key_before_filled_trailing_action_is_rejected() {
    let (result, _) = validate(1, &[Some(CTRL), Some(A), Some(B)], false);
    assert_eq!(result, Err(ValidationError::ShortcutNotMoreThanOneActionKey));
}

#[test]
fn test_action_key_before_filled_trailing_modifier_is_rejected() {
    let (result, _) = validate(1, &[Some(CTRL), Some(A), Some(SHIFT)], false);
    assert_eq!(result, Err(ValidationError::ShortcutOneActionKey));
}

#[test]
fn test_none_deletes_a_spare_slot() {
    let (result, action) = validate(1, &[Some(CTRL), None, Some(A)], false);
    assert_eq!(result, Ok(()));
    assert_eq!(action, SlotAction::DeleteSlot);
}

#[test]
fn test_none_below_minimum_size_is_rejected() {
    let (result, action) = validate(0, &[None, Some(A)], false);
    assert_eq!(result, Err(ValidationError::ShortcutAtleast2Keys));
    assert_eq!(action, SlotAction::NoAction);
}

#[test]
fn test_none_on_lone_hybrid_slot_just_clears() {
    let (result, action) = validate(0, &[None], true);
    assert_eq!(result, Ok(()));
    assert_eq!(action, SlotAction::NoAction);
}

#[test]
fn test_disable_must_stand_alone() {
    let (result, _) = validate(1, &[Some(CTRL), Some(VirtualKey::DISABLED)], false);
    assert_eq!(result, Err(ValidationError::ShortcutDisableAsActionKey));

    let (result, action) = validate(0, &[Some(VirtualKey::DISABLED)], true);
    assert_eq!(result, Ok(()));
    assert_eq!(action, SlotAction::NoAction);
}

#[test]
fn test_source_cell_collides_with_existing_row() {
    let mut buffer = RemapBuffer::new();
    let existing = Shortcut::from_keys(&[VirtualKey::LCONTROL, A]).unwrap();
    buffer.push(RemapRow::global(
        RemapSource::Shortcut(existing),
        RemapTarget::Key(B),
    ));
    buffer.push(RemapRow::global(RemapSource::Key(B), RemapTarget::Key(A)));

    // Editing row 1's source into Ctrl+A: the combined form overlaps LCtrl+A
    let validator = ShortcutCellValidator::new();
    let (result, action) = validator.validate_slot(
        1,
        SOURCE_COLUMN,
        1,
        &[Some(CTRL), Some(A)],
        None,
        false,
        &buffer,
    );
    assert_eq!(result, Err(ValidationError::ConflictingModifierShortcut));
    assert_eq!(action, SlotAction::NoAction);
}

#[test]
fn test_target_cell_matching_own_source_is_rejected() {
    let source = Shortcut::from_keys(&[CTRL, A]).unwrap();
    let mut buffer = RemapBuffer::new();
    buffer.push(RemapRow::global(
        RemapSource::Shortcut(source),
        RemapTarget::Key(B),
    ));

    let validator = ShortcutCellValidator::new();
    let (result, _) = validator.validate_slot(
        0,
        TARGET_COLUMN,
        1,
        &[Some(CTRL), Some(A)],
        None,
        false,
        &buffer,
    );
    assert_eq!(result, Err(ValidationError::MapToSameShortcut));
}

#[test]
fn test_reload_suppression_allows_one_lone_action_key() {
    let validator = ShortcutCellValidator::new();
    validator.arm_reload_suppression();

    let (result, _) = validator.validate_slot(
        0,
        SOURCE_COLUMN,
        0,
        &[Some(A), None],
        None,
        false,
        &RemapBuffer::new(),
    );
    assert_eq!(result, Ok(()));

    // The flag was consumed: the same edit now warns again
    let (result, _) = validator.validate_slot(
        0,
        SOURCE_COLUMN,
        0,
        &[Some(A), None],
        None,
        false,
        &RemapBuffer::new(),
    );
    assert_eq!(result, Err(ValidationError::ShortcutStartWithModifier));
}

#[test]
fn test_reload_suppression_is_cleared_even_when_validation_fails() {
    let validator = ShortcutCellValidator::new();
    validator.arm_reload_suppression();

    // This call fails on the repeated modifier, not the lone-action rule
    let (result, _) = validator.validate_slot(
        0,
        SOURCE_COLUMN,
        1,
        &[Some(CTRL), Some(VirtualKey::LCONTROL), None],
        None,
        false,
        &RemapBuffer::new(),
    );
    assert!(result.is_err());

    // Reset happened regardless of the outcome
    assert!(!validator.suppression_armed());
}
