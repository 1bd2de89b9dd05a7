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

use thiserror::Error;

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Errors that can occur during playback
///
/// The coordinator classifies every collaborator failure into one of these
/// variants; the variant determines whether the player keeps going, loses
/// only its look-ahead buffering, or shuts down for good.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// A collaborator failed while being brought up. The player stays paused
    /// and must be discarded.
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// The video reader failed to deliver pages.
    #[error("Media read failed: {0}")]
    Io(String),

    /// A single page could not be decoded. The page is dropped and playback
    /// continues.
    #[error("Decoding failed: {0}")]
    Decoding(String),

    /// The audio decoder can no longer decode anything.
    #[error("Decoder is defunct: {0}")]
    DefunctDecoder(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = PlaybackError::Io("socket closed".to_string());
        assert_eq!(e.to_string(), "Media read failed: socket closed");

        let e = PlaybackError::DefunctDecoder("codec state lost".to_string());
        assert_eq!(e.to_string(), "Decoder is defunct: codec state lost");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            PlaybackError::Decoding("bad frame".into()),
            PlaybackError::Decoding("bad frame".into())
        );
        assert_ne!(
            PlaybackError::Decoding("bad frame".into()),
            PlaybackError::Io("bad frame".into())
        );
    }
}
