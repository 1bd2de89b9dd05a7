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

//! Playback engine for the npxl vector-video format.
//!
//! An npxl video is a sequence of media pages, each carrying a short
//! vector-drawing frame and an optional compressed audio frame. This crate
//! implements the playback side: the host hands the engine a container
//! reader plus optional audio decoder and sink, then polls
//! [`Player::get_current_vector_frame`] at display cadence and paints
//! whatever comes back.
//!
//! Internally a wall-clock playhead indexes a dual buffer of decoded pages
//! sized in time rather than bytes: up to 15 seconds ahead of the playhead
//! and 70% of that behind it. A seek outside the buffered range rebuilds the
//! buffers around the new position; a shrinking look-ahead tops them up
//! while playback continues; pages the reader lost are concealed by
//! repeating the last good frame over decoder-estimated audio. Reader and
//! decoder failures are classified into recoverable ones (a dropped page, a
//! disabled top-up path) and fatal ones that retire the player for good.

pub mod buffers;
pub mod clock;
pub mod codec;
pub mod conceal;
pub mod error;
pub mod events;
pub mod page;
pub mod player;
pub mod queue;
pub mod reader;
pub mod sink;
pub mod statistics;

pub use buffers::{BuffersController, PageLookup, RefillNeed, DEFAULT_FORWARD_CAPACITY};
pub use clock::SeekClock;
pub use codec::AudioDecoder;
pub use error::{PlaybackError, Result};
pub use events::{ChangeNotifier, PlayerStatus, StatusListener};
pub use page::{
    AudioProperties, MediaPageHeader, PayloadLocator, PointerMark, ReadableMediaPage,
    ReadyToPlayPage, RenderingInstructions, StrokedPath, Viewport,
};
pub use player::{PlaybackState, Player, PlayerConfig};
pub use queue::{TimedItem, TimedMediaQueue};
pub use reader::VideoReader;
pub use sink::AudioSink;
pub use statistics::{LifetimeStatistics, PlaybackStats};
