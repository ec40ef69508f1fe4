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

//! Per-key hold-duration classification
//!
//! Each registered key owns one classifier with its own worker thread. The
//! worker turns the key's serialized press/release stream into exactly one
//! callback set per physical press cycle:
//!
//! ```text
//! Released --down--> OnHold --up before threshold--> Released  (short press)
//!                    OnHold --up after threshold---> Released  (long detected, long released)
//!                    OnHold --threshold, no up-----> OnHoldTimeout  (long detected)
//!                    OnHoldTimeout --up-----------> Released  (long released)
//! ```
//!
//! Wake conditions: the worker parks on a condition variable and is woken by
//! `feed` or by stop; while `OnHold` it additionally wakes on a short poll
//! interval, because the threshold can pass without any new input event.
//! Timestamps are opaque tick counts compared with wrap-safe subtraction.

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::core::keys::VirtualKey;

/// Poll interval while a key is held and the threshold has not passed yet.
pub const HOLD_POLL_INTERVAL_MS: u64 = 50;

/// Lifecycle of one registered key's classifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HoldState {
    Released,
    OnHold,
    /// Threshold crossed while the key is still down.
    OnHoldTimeout,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyEventKind {
    Down,
    Up,
}

/// One timestamped press/release event for a single key.
///
/// `time` is an opaque monotonic tick in milliseconds; it wraps around and
/// must only be compared via wrapping subtraction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HoldEvent {
    pub kind: KeyEventKind,
    pub time: u32,
}

/// Callbacks fired by the classifier worker, at most one set per press cycle.
///
/// They run on the worker thread with no engine lock held; implementations
/// that touch UI state must marshal onto the UI thread themselves (post to
/// the display channel, never call into widgets directly).
pub struct HoldCallbacks {
    pub on_short_press: Box<dyn Fn() + Send>,
    pub on_long_press_detected: Box<dyn Fn() + Send>,
    pub on_long_press_released: Box<dyn Fn() + Send>,
}

/// Source of the monotonic tick used for threshold polling.
///
/// Injected so tests can drive the clock; the default derives ticks from
/// `Instant`, deliberately truncated to `u32` to match event timestamps.
pub type TickSource = Arc<dyn Fn() -> u32 + Send + Sync>;

/// Tick source backed by `Instant`, starting at zero.
pub fn instant_tick_source() -> TickSource {
    let epoch = Instant::now();
    Arc::new(move || epoch.elapsed().as_millis() as u32)
}

enum Wake {
    Event(HoldEvent),
    Poll,
    Stop,
}

struct Queue {
    events: VecDeque<HoldEvent>,
    stop: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    cond: Condvar,
}

/// Timed state machine for one key, with its own worker thread.
///
/// Dropping the classifier stops and joins the worker. It must never be
/// dropped from inside one of its own callbacks; the join would deadlock.
/// That is a caller contract, not something the classifier enforces.
pub struct KeyHoldClassifier {
    key: VirtualKey,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl KeyHoldClassifier {
    /// Spawns a classifier for `key` with the given hold threshold.
    pub fn spawn(
        key: VirtualKey,
        threshold_ms: u32,
        callbacks: HoldCallbacks,
        ticks: TickSource,
    ) -> Self {
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                events: VecDeque::new(),
                stop: false,
            }),
            cond: Condvar::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker =
            std::thread::spawn(move || run_worker(key, threshold_ms, callbacks, ticks, worker_shared));

        Self {
            key,
            shared,
            worker: Some(worker),
        }
    }

    pub fn key(&self) -> VirtualKey {
        self.key
    }

    /// Enqueues an event and wakes the worker. Never blocks the caller
    /// beyond the queue lock, so it is safe on the hook path.
    pub fn feed(&self, event: HoldEvent) {
        let mut queue = self.shared.queue.lock();
        queue.events.push_back(event);
        drop(queue);
        self.shared.cond.notify_one();
    }
}

impl Drop for KeyHoldClassifier {
    fn drop(&mut self) {
        {
            let mut queue = self.shared.queue.lock();
            queue.stop = true;
        }
        self.shared.cond.notify_one();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_worker(
    key: VirtualKey,
    threshold_ms: u32,
    callbacks: HoldCallbacks,
    ticks: TickSource,
    shared: Arc<Shared>,
) {
    let mut state = HoldState::Released;
    let mut press_time: u32 = 0;

    loop {
        let wake = {
            let mut queue = shared.queue.lock();
            loop {
                if queue.stop {
                    break Wake::Stop;
                }
                if let Some(event) = queue.events.pop_front() {
                    break Wake::Event(event);
                }
                if state == HoldState::OnHold {
                    let result = shared
                        .cond
                        .wait_for(&mut queue, Duration::from_millis(HOLD_POLL_INTERVAL_MS));
                    if result.timed_out() && queue.events.is_empty() && !queue.stop {
                        break Wake::Poll;
                    }
                } else {
                    shared.cond.wait(&mut queue);
                }
            }
        };

        // Callbacks run with the queue lock released.
        match wake {
            Wake::Stop => break,
            Wake::Event(event) => {
                handle_event(key, threshold_ms, &callbacks, &mut state, &mut press_time, event);
            }
            Wake::Poll => {
                let now = ticks();
                if state == HoldState::OnHold && now.wrapping_sub(press_time) >= threshold_ms {
                    debug!(key = %key, "hold threshold crossed without release");
                    state = HoldState::OnHoldTimeout;
                    (callbacks.on_long_press_detected)();
                }
            }
        }
    }
}

fn handle_event(
    key: VirtualKey,
    threshold_ms: u32,
    callbacks: &HoldCallbacks,
    state: &mut HoldState,
    press_time: &mut u32,
    event: HoldEvent,
) {
    match (*state, event.kind) {
        (HoldState::Released, KeyEventKind::Down) => {
            trace!(key = %key, time = event.time, "key down");
            *state = HoldState::OnHold;
            *press_time = event.time;
        }
        // Key repeat delivers further downs while held; tolerate them.
        (HoldState::OnHold, KeyEventKind::Down) | (HoldState::OnHoldTimeout, KeyEventKind::Down) => {}
        (HoldState::OnHold, KeyEventKind::Up) => {
            let held = event.time.wrapping_sub(*press_time);
            *state = HoldState::Released;
            if held < threshold_ms {
                debug!(key = %key, held_ms = held, "short press");
                (callbacks.on_short_press)();
            } else {
                debug!(key = %key, held_ms = held, "long press released late");
                (callbacks.on_long_press_detected)();
                (callbacks.on_long_press_released)();
            }
        }
        (HoldState::OnHoldTimeout, KeyEventKind::Up) => {
            debug!(key = %key, "long press released");
            *state = HoldState::Released;
            (callbacks.on_long_press_released)();
        }
        (HoldState::Released, KeyEventKind::Up) => {}
    }
}
