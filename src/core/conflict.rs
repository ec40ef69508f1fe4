//! Remap buffer conflict detection
//!
//! HashMap-based indexing over (scope, source) pairs: two rows conflict when
//! they share both a source and a target-application scope. Rows scoped to
//! different applications never conflict, and neither does a global row with
//! an app-scoped one (the app-scoped row simply wins inside that app).
//!
//! Also detects orphaned keys: single-key remaps whose source becomes
//! permanently unreachable once the buffer is applied, surfaced as a
//! confirmation prompt rather than an error.

use std::collections::{HashMap, HashSet};

use crate::core::keys::VirtualKey;
use crate::core::shortcut::{RemapBuffer, RemapRow, RemapSource, RemapTarget};
use crate::core::validator::ValidationError;

/// Detects duplicate sources in O(1) per row using HashMap-based indexing.
///
/// Keys are (scope, source) pairs, values the indices of all rows using that
/// pair. A conflict exists when any vector has length > 1.
pub struct RemapConflictDetector {
    rows: HashMap<(String, RemapSource), Vec<usize>>,
}

/// A detected conflict between remap rows.
#[derive(Clone, Debug, PartialEq)]
pub struct RemapConflict {
    /// Scope the colliding rows share ("" = global).
    pub scope: String,
    /// The source mapped more than once within that scope.
    pub source: RemapSource,
    /// Indices of all rows using this (scope, source) pair (always 2 or more).
    pub row_indices: Vec<usize>,
}

impl RemapConflictDetector {
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }

    /// Indexes a whole buffer.
    pub fn from_buffer(buffer: &RemapBuffer) -> Self {
        let mut detector = Self::new();
        for (index, row) in buffer.rows().iter().enumerate() {
            detector.add_row(index, row);
        }
        detector
    }

    /// Adds one row to the index.
    pub fn add_row(&mut self, index: usize, row: &RemapRow) {
        self.rows
            .entry((row.scope().to_string(), row.source.clone()))
            .or_default()
            .push(index);
    }

    /// Finds all conflicts (sources mapped 2 or more times within a scope).
    pub fn find_conflicts(&self) -> Vec<RemapConflict> {
        self.rows
            .iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|((scope, source), indices)| RemapConflict {
                scope: scope.clone(),
                source: source.clone(),
                row_indices: indices.clone(),
            })
            .collect()
    }

    /// Checks if a specific source has conflicts within a scope.
    pub fn has_conflict(&self, scope: &str, source: &RemapSource) -> bool {
        self.rows
            .get(&(scope.to_string(), source.clone()))
            .map(|indices| indices.len() > 1)
            .unwrap_or(false)
    }

    /// Total number of rows indexed.
    pub fn total_rows(&self) -> usize {
        self.rows.values().map(|v| v.len()).sum()
    }
}

impl Default for RemapConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole-buffer consistency check: within each scope the sources must be
/// pairwise distinct.
pub fn check_remappings_valid(buffer: &RemapBuffer) -> Result<(), ValidationError> {
    if RemapConflictDetector::from_buffer(buffer)
        .find_conflicts()
        .is_empty()
    {
        Ok(())
    } else {
        Err(ValidationError::RemapUnsuccessful)
    }
}

/// Keys that become permanently unreachable once the buffer is applied.
///
/// A single-key source `k` with a key target `t` is orphaned when nothing in
/// the buffer maps onto `k` and `t` is not itself a remapped source (the
/// remap chain dead-ends). The result preserves buffer order and is intended
/// for a confirmation prompt, not an error.
pub fn orphaned_keys(buffer: &RemapBuffer) -> Vec<VirtualKey> {
    let key_targets: HashSet<VirtualKey> = buffer
        .rows()
        .iter()
        .filter_map(|row| match row.target {
            RemapTarget::Key(target) if !target.is_disabled() => Some(target),
            _ => None,
        })
        .collect();
    let key_sources: HashSet<VirtualKey> = buffer
        .rows()
        .iter()
        .filter_map(|row| match row.source {
            RemapSource::Key(source) => Some(source),
            _ => None,
        })
        .collect();

    let mut orphaned = Vec::new();
    for row in buffer.rows() {
        let (RemapSource::Key(source), RemapTarget::Key(target)) = (&row.source, &row.target)
        else {
            continue;
        };
        if key_targets.contains(source) || key_sources.contains(target) {
            continue;
        }
        if !orphaned.contains(source) {
            orphaned.push(*source);
        }
    }

    orphaned
}
