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

//! Keyboard Remap Engine
//!
//! The detection and validation core of a desktop key-remapping utility:
//! hold-duration classification, the shared state consulted by a
//! system-wide input hook, and conflict validation for proposed remappings.
//!
//! # Features
//!
//! - **Hold classification:** per-key short-press / long-press semantics
//!   with a worker thread per registered key
//! - **Hook dispatch:** suppress / forward / ignore decisions under a
//!   strict latency budget, never blocking on the UI
//! - **Conflict Validation:** slot-by-slot shortcut editing rules plus
//!   whole-buffer duplicate and orphaned-key detection
//! - **Chord Building:** two-stage shortcuts recorded from live key events
//! - **Rules CLI:** check and list textual remap rules files
//!
//! # Architecture
//!
//! - **`core`:** Pure business logic (keys, shortcuts, validation,
//!   conflict detection, rules parsing)
//! - **`detection`:** Cross-thread coordination (hold classifiers, shared
//!   detection state, UI sinks)
//!
//! The host application supplies the OS input hook, the editor windows, and
//! settings persistence; this crate owns everything between a raw key event
//! and a validated remap buffer.
//!
//! # Examples
//!
//! ## Validating a rules buffer
//!
//! ```no_run
//! use key_remap_engine::core::parser::parse_rules_file;
//! use key_remap_engine::core::{check_remappings_valid, orphaned_keys};
//!
//! let content = std::fs::read_to_string("remaps.conf")?;
//! let buffer = parse_rules_file(&content)?;
//!
//! check_remappings_valid(&buffer)?;
//! for key in orphaned_keys(&buffer) {
//!     println!("warning: {key} becomes unreachable");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Wiring the hook adapter
//!
//! ```no_run
//! use std::sync::Arc;
//! use key_remap_engine::detection::{
//!     display_channel, ForegroundProbe, SharedDetectionState, UiMode, WindowHandle,
//! };
//!
//! struct HostForeground;
//! impl ForegroundProbe for HostForeground {
//!     fn foreground_window(&self) -> WindowHandle {
//!         WindowHandle(0) // ask the OS in a real host
//!     }
//! }
//!
//! let state = Arc::new(SharedDetectionState::new(Arc::new(HostForeground)));
//! let (sink, updates) = display_channel();
//! state.register_ui_shortcut_sink(sink);
//! state.set_mode(UiMode::DetectingShortcut, WindowHandle(0));
//! // hook thread: state.dispatch_shortcut(event, false) per key event
//! // ui thread: render updates.recv() snapshots
//! ```

pub mod core;
pub mod detection;

// Re-export commonly used types for convenience
pub use crate::core::{
    RemapBuffer, RemapRow, RemapSource, RemapTarget, Shortcut, ValidationError, VirtualKey,
};
pub use crate::detection::{HookDecision, SharedDetectionState, UiMode};
