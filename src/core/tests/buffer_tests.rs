use crate::core::conflict::{check_remappings_valid, orphaned_keys, RemapConflictDetector};
use crate::core::keys::VirtualKey;
use crate::core::shortcut::{RemapBuffer, RemapRow, RemapSource, RemapTarget, Shortcut};
use crate::core::validator::{validate_for_save, validate_target, ValidationError};

const A: VirtualKey = VirtualKey(0x41);
const B: VirtualKey = VirtualKey(0x42);
const C: VirtualKey = VirtualKey(0x43);
const D: VirtualKey = VirtualKey(0x44);

fn key_row(source: VirtualKey, target: VirtualKey, app: Option<&str>) -> RemapRow {
    RemapRow::new(
        RemapSource::Key(source),
        RemapTarget::Key(target),
        app.map(String::from),
    )
}

#[test]
fn test_two_global_rows_with_same_source_fail() {
    let mut buffer = RemapBuffer::new();
    buffer.push(key_row(A, B, None));
    buffer.push(key_row(A, C, None));

    assert_eq!(
        check_remappings_valid(&buffer),
        Err(ValidationError::RemapUnsuccessful)
    );
}

#[test]
fn test_same_source_in_different_scopes_is_fine() {
    let mut buffer = RemapBuffer::new();
    buffer.push(key_row(A, B, Some("firefox.exe")));
    buffer.push(key_row(A, C, Some("code.exe")));

    assert_eq!(check_remappings_valid(&buffer), Ok(()));
}

#[test]
fn test_duplicate_shortcut_sources_fail() {
    let combo = Shortcut::from_keys(&[VirtualKey::CONTROL, A]).unwrap();
    let mut buffer = RemapBuffer::new();
    buffer.push(RemapRow::global(
        RemapSource::Shortcut(combo.clone()),
        RemapTarget::Key(B),
    ));
    buffer.push(RemapRow::global(
        RemapSource::Shortcut(combo),
        RemapTarget::Key(C),
    ));

    assert_eq!(
        check_remappings_valid(&buffer),
        Err(ValidationError::RemapUnsuccessful)
    );
}

#[test]
fn test_modifier_order_does_not_hide_duplicates() {
    let first = Shortcut::from_keys(&[VirtualKey::CONTROL, VirtualKey::SHIFT, A]).unwrap();
    let second = Shortcut::from_keys(&[VirtualKey::SHIFT, VirtualKey::CONTROL, A]).unwrap();

    let mut buffer = RemapBuffer::new();
    buffer.push(RemapRow::global(
        RemapSource::Shortcut(first),
        RemapTarget::Key(B),
    ));
    buffer.push(RemapRow::global(
        RemapSource::Shortcut(second),
        RemapTarget::Key(C),
    ));

    let detector = RemapConflictDetector::from_buffer(&buffer);
    assert_eq!(detector.find_conflicts().len(), 1);
}

#[test]
fn test_orphan_detection_follows_the_chain() {
    let mut buffer = RemapBuffer::new();
    buffer.push(key_row(A, B, None));
    assert_eq!(orphaned_keys(&buffer), vec![A]);

    buffer.push(key_row(B, C, None));
    assert_eq!(orphaned_keys(&buffer), Vec::<VirtualKey>::new());

    // Extending the chain further still leaves every source covered
    buffer.push(key_row(C, D, None));
    assert_eq!(orphaned_keys(&buffer), Vec::<VirtualKey>::new());
}

#[test]
fn test_empty_text_target_is_invalid() {
    assert_eq!(
        validate_target(&RemapTarget::Text("   ".into())),
        Err(ValidationError::RemapUnsuccessful)
    );
    assert_eq!(
        validate_target(&RemapTarget::Exec(String::new())),
        Err(ValidationError::RemapUnsuccessful)
    );
    assert_eq!(validate_target(&RemapTarget::Text("hi".into())), Ok(()));
}

#[test]
fn test_save_fails_on_incomplete_rows() {
    let mut incomplete = Shortcut::new();
    incomplete.set_key(VirtualKey::CONTROL, false);

    let mut buffer = RemapBuffer::new();
    buffer.push(RemapRow::global(
        RemapSource::Shortcut(incomplete),
        RemapTarget::Key(B),
    ));

    assert_eq!(validate_for_save(&buffer), Err(ValidationError::SaveFailed));
}

#[test]
fn test_save_fails_on_empty_exec_target() {
    let mut buffer = RemapBuffer::new();
    buffer.push(RemapRow::global(
        RemapSource::Key(A),
        RemapTarget::Exec("  ".into()),
    ));

    assert_eq!(validate_for_save(&buffer), Err(ValidationError::SaveFailed));
}

#[test]
fn test_save_surfaces_buffer_conflicts() {
    let mut buffer = RemapBuffer::new();
    buffer.push(key_row(A, B, None));
    buffer.push(key_row(A, C, None));

    assert_eq!(
        validate_for_save(&buffer),
        Err(ValidationError::RemapUnsuccessful)
    );
}

#[test]
fn test_clean_buffer_saves() {
    let combo = Shortcut::from_keys(&[VirtualKey::CONTROL, VirtualKey::SHIFT, A]).unwrap();
    let mut buffer = RemapBuffer::new();
    buffer.push(key_row(A, B, None));
    buffer.push(key_row(B, A, None));
    buffer.push(RemapRow::new(
        RemapSource::Shortcut(combo),
        RemapTarget::Exec("notepad.exe".into()),
        Some("firefox.exe".into()),
    ));

    assert_eq!(validate_for_save(&buffer), Ok(()));
    assert_eq!(orphaned_keys(&buffer), Vec::<VirtualKey>::new());
}
