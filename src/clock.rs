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

//! Seek-position clock for the playback engine.

use web_time::{Duration, Instant};

/// An elapsed-time counter with a settable offset, used as the playhead.
///
/// The clock composes a fixed offset with wall-clock elapsed time: seeking
/// is done by replacing the clock with [`SeekClock::with_offset`], which
/// starts in the stopped state. Resolution is the host's wall-clock
/// resolution; there is no catch-up or drift compensation.
#[derive(Debug, Clone)]
pub struct SeekClock {
    offset: Duration,
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl Default for SeekClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SeekClock {
    /// Create a stopped clock at position zero.
    pub fn new() -> Self {
        Self::with_offset(Duration::ZERO)
    }

    /// Create a stopped clock whose elapsed time starts at `offset`.
    pub fn with_offset(offset: Duration) -> Self {
        Self {
            offset,
            accumulated: Duration::ZERO,
            running_since: None,
        }
    }

    /// Start counting. A no-op if already running.
    pub fn start(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    /// Stop counting, folding the running span into the accumulated time.
    pub fn stop(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    /// Stop and rewind to position zero, discarding the offset.
    pub fn reset(&mut self) {
        self.offset = Duration::ZERO;
        self.accumulated = Duration::ZERO;
        self.running_since = None;
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Current playhead position.
    pub fn elapsed(&self) -> Duration {
        let running = self
            .running_since
            .map(|since| since.elapsed())
            .unwrap_or(Duration::ZERO);
        self.offset + self.accumulated + running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_new_clock_is_stopped_at_zero() {
        let clock = SeekClock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_offset_clock_reports_offset_while_stopped() {
        let clock = SeekClock::with_offset(Duration::from_millis(3500));
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(), Duration::from_millis(3500));
    }

    #[test]
    fn test_elapsed_advances_only_while_running() {
        let mut clock = SeekClock::new();
        clock.start();
        sleep(Duration::from_millis(20));
        clock.stop();

        let at_stop = clock.elapsed();
        assert!(at_stop >= Duration::from_millis(20));

        sleep(Duration::from_millis(20));
        assert_eq!(clock.elapsed(), at_stop);
    }

    #[test]
    fn test_offset_adds_to_running_time() {
        let mut clock = SeekClock::with_offset(Duration::from_millis(1000));
        clock.start();
        sleep(Duration::from_millis(10));
        clock.stop();
        assert!(clock.elapsed() >= Duration::from_millis(1010));
    }

    #[test]
    fn test_reset_discards_offset_and_accumulated_time() {
        let mut clock = SeekClock::with_offset(Duration::from_millis(1000));
        clock.start();
        sleep(Duration::from_millis(5));
        clock.stop();
        clock.reset();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut clock = SeekClock::new();
        clock.start();
        sleep(Duration::from_millis(10));
        clock.start();
        clock.stop();
        assert!(clock.elapsed() >= Duration::from_millis(10));
    }
}
