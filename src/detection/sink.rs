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

//! UI sink channel
//!
//! Updates flow from the hook and classifier threads to a single UI-owned
//! consumer loop over a bounded channel; non-UI threads never touch UI-owned
//! data directly. Producers use `try_send` and drop updates when the UI is
//! behind, so the hook path can never block on the UI thread.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use crate::core::keys::VirtualKey;

/// Render-ready snapshot of the in-progress detection session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DisplayUpdate {
    /// Keys in display order: modifiers in press order, action key, chord key.
    pub keys: Vec<VirtualKey>,
}

impl DisplayUpdate {
    pub fn new(keys: Vec<VirtualKey>) -> Self {
        Self { keys }
    }

    /// Display labels, ready for the editor's key list.
    pub fn labels(&self) -> Vec<String> {
        self.keys.iter().map(|k| k.name()).collect()
    }
}

pub type UiSender = SyncSender<DisplayUpdate>;
pub type UiReceiver = Receiver<DisplayUpdate>;

/// Default depth of a display channel; updates beyond it are dropped.
pub const DISPLAY_CHANNEL_DEPTH: usize = 16;

/// Creates a bounded display channel pair.
///
/// The receiver belongs to the UI consumer loop; the sender is handed to
/// [`crate::detection::SharedDetectionState`] via the sink registration
/// hooks.
pub fn display_channel() -> (UiSender, UiReceiver) {
    sync_channel(DISPLAY_CHANNEL_DEPTH)
}
