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

//! Contains the fundamental data structures for media pages.

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// The visible drawing area of a vector frame.
///
/// A frame without a viewport is *void*: it stands in for a page that was
/// lost or corrupted in the container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A single stroked path of a vector frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokedPath {
    /// Stroke color as packed RGBA.
    pub color: u32,
    /// Stroke width in viewport units.
    pub width: f32,
    /// Polyline vertices in viewport coordinates.
    pub points: Vec<(f32, f32)>,
}

/// Position of the presenter's pointer within the viewport, if shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerMark {
    pub x: f32,
    pub y: f32,
}

/// Rendering instructions for one media page.
///
/// The playback engine treats these as opaque: it only ever inspects the
/// presence of the viewport to tell a real frame from a void one. Everything
/// else is handed to the host painter untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderingInstructions {
    /// Drawing area; absent for a void frame.
    pub viewport: Option<Viewport>,
    /// Background fill as packed RGBA.
    pub background: Option<u32>,
    /// Stroked paths, in paint order.
    pub strokes: Vec<StrokedPath>,
    /// Optional pointer overlay.
    pub pointer: Option<PointerMark>,
}

impl RenderingInstructions {
    /// A frame with no viewport, representing loss or corruption.
    pub fn void() -> Self {
        Self::default()
    }

    pub fn is_void(&self) -> bool {
        self.viewport.is_none()
    }
}

/// Location of a page's payload inside the container.
///
/// Opaque to the engine; carried through for hosts that re-read payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadLocator {
    pub offset: u64,
    pub length: u64,
}

/// Header of a media page as produced by the container reader.
///
/// Page numbers are assigned monotonically by the producer; a gap in the
/// numbering indicates pages lost in transit or on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaPageHeader {
    /// Monotonically assigned page number.
    pub media_page_number: u64,
    /// Presentation duration of the page in milliseconds.
    pub page_duration_ms: u32,
    /// The page's vector frame.
    pub vector_frame: RenderingInstructions,
    /// Location of the raw payload inside the container, when known.
    pub payload: Option<PayloadLocator>,
}

impl MediaPageHeader {
    pub fn new(media_page_number: u64, page_duration_ms: u32, vector_frame: RenderingInstructions) -> Self {
        Self {
            media_page_number,
            page_duration_ms,
            vector_frame,
            payload: None,
        }
    }

    /// Presentation duration of the page.
    pub fn page_duration(&self) -> Duration {
        Duration::from_millis(self.page_duration_ms as u64)
    }
}

/// A media page as read from the container, audio still compressed.
///
/// A page without a header is *void*: the reader emits these in place of
/// pages it could not recover.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadableMediaPage {
    pub header: Option<MediaPageHeader>,
    pub compressed_audio: Vec<u8>,
}

impl ReadableMediaPage {
    pub fn new(header: MediaPageHeader, compressed_audio: Vec<u8>) -> Self {
        Self {
            header: Some(header),
            compressed_audio,
        }
    }

    /// A page standing in for lost or corrupted data.
    pub fn void() -> Self {
        Self {
            header: None,
            compressed_audio: Vec::new(),
        }
    }

    pub fn is_void(&self) -> bool {
        self.header.is_none()
    }
}

/// A media page with its audio decoded, ready to hand to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyToPlayPage {
    pub header: Option<MediaPageHeader>,
    pub decoded_audio: Vec<u8>,
}

impl ReadyToPlayPage {
    pub fn new(header: MediaPageHeader, decoded_audio: Vec<u8>) -> Self {
        Self {
            header: Some(header),
            decoded_audio,
        }
    }

    pub fn void() -> Self {
        Self {
            header: None,
            decoded_audio: Vec::new(),
        }
    }

    pub fn is_void(&self) -> bool {
        self.header.is_none()
    }

    /// The page's vector frame, or a void frame for a void page.
    pub fn vector_frame(&self) -> RenderingInstructions {
        match &self.header {
            Some(header) => header.vector_frame.clone(),
            None => RenderingInstructions::void(),
        }
    }
}

/// Audio stream properties carried by the container.
///
/// Passed through verbatim from the reader to the decoder and the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioProperties {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of audio channels
    pub channels: u8,
}

impl Default for AudioProperties {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
        }
    }
}
