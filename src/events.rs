/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

//! Change broadcast to playback observers.

use web_time::Duration;

use crate::error::PlaybackError;
use crate::player::PlaybackState;

/// Snapshot of the observable player state, delivered to listeners on every
/// change.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatus {
    pub state: PlaybackState,
    pub seek_position: Duration,
    pub last_error: Option<PlaybackError>,
    pub soft_buffering_enabled: bool,
}

/// Callback invoked with each status snapshot.
pub type StatusListener = Box<dyn Fn(&PlayerStatus) + Send + Sync>;

/// One-way broadcast from the player to its observers.
///
/// Listeners are registered once and kept for the player's lifetime.
/// Notification is synchronous on the caller's thread, in registration
/// order.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<StatusListener>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: StatusListener) {
        self.listeners.push(listener);
    }

    pub fn notify(&self, status: &PlayerStatus) {
        for listener in &self.listeners {
            listener(status);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
