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

//! Loss concealment for void media pages.

use crate::page::{MediaPageHeader, ReadyToPlayPage};

/// Build the replacement for a void page.
///
/// The replacement repeats the last known non-void header, so the host keeps
/// painting the most recent good vector frame for the span of the lost page,
/// while the supplied concealment audio papers over the missing frame. The
/// header also donates its duration, since a void page carries none of its
/// own.
pub fn replacement_page(last_non_void: &MediaPageHeader, concealment_audio: Vec<u8>) -> ReadyToPlayPage {
    ReadyToPlayPage::new(last_non_void.clone(), concealment_audio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{RenderingInstructions, Viewport};

    #[test]
    fn test_replacement_repeats_header_and_frame() {
        let frame = RenderingInstructions {
            viewport: Some(Viewport::new(200.0, 200.0)),
            ..Default::default()
        };
        let header = MediaPageHeader::new(4, 2000, frame);

        let page = replacement_page(&header, vec![0x10, 0x20]);
        assert!(!page.is_void());
        assert_eq!(page.header.as_ref().unwrap(), &header);
        assert_eq!(page.decoded_audio, vec![0x10, 0x20]);
        assert_eq!(page.vector_frame().viewport, Some(Viewport::new(200.0, 200.0)));
    }
}
