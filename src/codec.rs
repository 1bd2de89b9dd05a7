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

//! Audio decoder support for the playback engine.

use crate::page::AudioProperties;
use crate::Result;

/// Trait for audio decoders.
///
/// Decoders are stateful across pages: after a playback discontinuity the
/// engine primes the codec with one empty decode before resuming.
pub trait AudioDecoder: Send {
    /// Prepare the codec for the given stream properties.
    fn init(&mut self, properties: &AudioProperties) -> Result<()>;

    /// Decode one compressed audio frame into PCM bytes.
    ///
    /// Empty input requests loss concealment: the decoder returns its best
    /// estimate of the missing frame. A [`crate::PlaybackError::Decoding`]
    /// failure loses only the frame in hand; a
    /// [`crate::PlaybackError::DefunctDecoder`] failure means the codec
    /// cannot recover.
    fn decode(&mut self, compressed: &[u8]) -> Result<Vec<u8>>;

    /// Release codec resources. Idempotent.
    fn release(&mut self) -> Result<()>;
}
