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

//! Audio output interface consumed by the playback engine.

use crate::page::AudioProperties;
use crate::Result;

/// Trait for audio sinks.
///
/// The sink queues PCM for playback and auto-pauses when its queue drains.
pub trait AudioSink: Send {
    /// Open the output device for the given stream properties.
    fn init(&mut self, properties: &AudioProperties) -> Result<()>;

    /// Queue PCM bytes for playback.
    fn write(&mut self, pcm: &[u8]);

    /// Discard queued and currently-playing audio.
    fn clear(&mut self);

    /// Release the output device. Idempotent.
    fn release(&mut self) -> Result<()>;
}
