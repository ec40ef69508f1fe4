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

//! src/core/mod.rs
//!
//! Core business logic module
//!
//! This module contains the fundamental data structures and algorithms for
//! remap validation, including:
//! - Virtual-key classification and modifier aliasing
//! - Shortcut and remap row types
//! - Cell/slot validation with the closed error taxonomy
//! - Buffer-level conflict detection and orphaned-key analysis
//! - Rules file parsing for the CLI
//!
//! All business logic here is pure and single-threaded; the cross-thread
//! coordination lives in the `detection` module. This split keeps validation
//! unit-testable without spinning up worker threads.

pub mod conflict;
pub mod keys;
pub mod parser;
pub mod shortcut;
pub mod validator;

pub use conflict::{check_remappings_valid, orphaned_keys, RemapConflict, RemapConflictDetector};
pub use keys::{KeyCapability, ModifierFamily, ModifierSide, VirtualKey};
pub use shortcut::{RemapBuffer, RemapRow, RemapSource, RemapTarget, Shortcut};
pub use validator::{
    keys_overlap, shortcuts_overlap, validate_for_save, ShortcutCellValidator, SlotAction,
    ValidationError,
};

#[cfg(test)]
mod tests;
