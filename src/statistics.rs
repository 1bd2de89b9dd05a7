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

//! Playback statistics collection.

use serde::{Deserialize, Serialize};

/// Lifetime counters that persist over the player's lifetime.
///
/// Counters only ever grow; hosts diff consecutive snapshots for rates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifetimeStatistics {
    /// Pages decoded and queued into the buffers
    pub pages_buffered: u64,
    /// Void pages replaced by concealment
    pub concealed_pages: u64,
    /// Pages dropped (failed decodes and unconcealable voids)
    pub dropped_pages: u64,
    /// Full rebuilds of the buffers around the playhead
    pub full_buffer_operations: u64,
    /// Incremental forward-buffer top-ups
    pub soft_buffer_operations: u64,
    /// Audio frames handed to the sink
    pub audio_frames_pushed: u64,
    /// Vector-frame queries served
    pub frame_queries: u64,
    /// Queries that found no page at the playhead
    pub buffer_misses: u64,
}

impl LifetimeStatistics {
    pub fn record_page_buffered(&mut self) {
        self.pages_buffered += 1;
    }

    pub fn record_concealment(&mut self) {
        self.concealed_pages += 1;
        self.pages_buffered += 1;
    }

    pub fn record_dropped_page(&mut self) {
        self.dropped_pages += 1;
    }

    pub fn record_full_buffer(&mut self) {
        self.full_buffer_operations += 1;
    }

    pub fn record_soft_buffer(&mut self) {
        self.soft_buffer_operations += 1;
    }

    pub fn record_audio_push(&mut self) {
        self.audio_frames_pushed += 1;
    }

    pub fn record_frame_query(&mut self) {
        self.frame_queries += 1;
    }

    pub fn record_buffer_miss(&mut self) {
        self.buffer_misses += 1;
    }
}

/// Statistics summary assembled on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStats {
    pub lifetime: LifetimeStatistics,
    /// Buffered timeline currently held, in milliseconds
    pub current_buffer_ms: u64,
    /// Pages currently held
    pub buffered_pages: usize,
}
