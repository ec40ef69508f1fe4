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

//! src/detection/mod.rs
//!
//! Cross-thread detection coordination
//!
//! Three thread roles meet here:
//! - the host's hook thread, which calls dispatch on every key event and
//!   must return within a strict latency budget,
//! - one classifier worker thread per registered key,
//! - the UI thread, which only ever receives state through the bounded
//!   display channel.
//!
//! Every shared object is guarded by its own lock, and no lock is held
//! while a callback runs.

pub mod hold;
pub mod sink;
pub mod state;

pub use hold::{
    HoldCallbacks, HoldEvent, HoldState, KeyEventKind, KeyHoldClassifier, TickSource,
};
pub use sink::{display_channel, DisplayUpdate, UiReceiver, UiSender};
pub use state::{
    ForegroundProbe, HookDecision, InputKeyEvent, SharedDetectionState, UiMode, WindowHandle,
};
