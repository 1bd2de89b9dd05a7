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

//! The container-reader interface consumed by the playback engine.

use web_time::Duration;

use crate::page::{AudioProperties, ReadableMediaPage};
use crate::Result;

/// Trait for npxl container readers.
///
/// The reader owns parsing and random access into the byte source; the
/// playback engine only ever asks it for pages by time range. Pages lost or
/// corrupted in the container must appear as void entries, in order, so the
/// engine can conceal them. The first page of a video is page number 0 or 1;
/// there is no lost prefix.
pub trait VideoReader: Send {
    /// Open the container and read its directory.
    fn init(&mut self) -> Result<()>;

    /// Total video duration. Zero means unknown (live stream); the engine
    /// then never reports the video as finished.
    fn video_duration(&self) -> Duration;

    /// Audio stream properties, passed through to the decoder and sink.
    fn audio_properties(&self) -> AudioProperties;

    /// Pages overlapping `[inclusive_start, exclusive_end)`, in order.
    /// Pages straddling either boundary are included.
    fn pages_in_range(
        &mut self,
        inclusive_start: Duration,
        exclusive_end: Duration,
    ) -> Result<Vec<ReadableMediaPage>>;

    /// Release the underlying byte source. Idempotent.
    fn release(&mut self) -> Result<()>;
}
