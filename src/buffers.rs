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

//! Forward/backward capacity enforcement over the timed media queue.

use web_time::Duration;

use crate::page::ReadyToPlayPage;
use crate::queue::TimedMediaQueue;

/// Default forward buffer capacity.
///
/// 15 seconds of look-ahead keeps the reader comfortably ahead of the
/// playhead on slow media without holding more than a few dozen pages.
pub const DEFAULT_FORWARD_CAPACITY: Duration = Duration::from_secs(15);

/// Backward capacity as a fraction of the forward capacity.
const BACKWARD_CAPACITY_RATIO: f64 = 0.7;

/// Fraction of the forward capacity below which a soft refill is requested.
const SOFT_REFILL_THRESHOLD: f64 = 0.7;

/// Buffering work the caller must schedule after a page lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefillNeed {
    /// The forward buffer is healthy.
    None,
    /// The forward buffer is running low; top it up in the background.
    Soft,
    /// The lookup missed; the buffers must be rebuilt around the playhead.
    Full,
}

/// Result of a page lookup: the page to hand out plus the refill work it
/// implies.
#[derive(Debug, Clone)]
pub struct PageLookup {
    pub page: ReadyToPlayPage,
    pub refill: RefillNeed,
}

/// Time-indexed dual buffer of ready-to-play pages.
///
/// One contiguous queue holds both buffers: everything at or after the
/// current seek position is the forward buffer, everything before it the
/// backward buffer. Capacities are measured in summed page durations, not
/// bytes. After every lookup the portion behind the playhead is trimmed to
/// the backward capacity.
#[derive(Debug)]
pub struct BuffersController {
    queue: TimedMediaQueue<ReadyToPlayPage>,
    forward_capacity: Duration,
    backward_capacity: Duration,
}

impl Default for BuffersController {
    fn default() -> Self {
        Self::new(DEFAULT_FORWARD_CAPACITY)
    }
}

impl BuffersController {
    pub fn new(forward_capacity: Duration) -> Self {
        Self {
            queue: TimedMediaQueue::new(),
            forward_capacity,
            backward_capacity: forward_capacity.mul_f64(BACKWARD_CAPACITY_RATIO),
        }
    }

    /// Set the forward capacity. The backward capacity follows at 70%.
    pub fn set_forward_capacity(&mut self, capacity: Duration) {
        self.forward_capacity = capacity;
        self.backward_capacity = capacity.mul_f64(BACKWARD_CAPACITY_RATIO);
    }

    pub fn forward_capacity(&self) -> Duration {
        self.forward_capacity
    }

    pub fn backward_capacity(&self) -> Duration {
        self.backward_capacity
    }

    /// End of the last queued page, or zero for an empty queue.
    pub fn end_of_last_queued_page(&self) -> Duration {
        self.queue.last().map(|item| item.end()).unwrap_or(Duration::ZERO)
    }

    /// The last queued page, or the void page for an empty queue.
    pub fn last_page(&self) -> ReadyToPlayPage {
        self.queue
            .last()
            .map(|item| item.payload.clone())
            .unwrap_or_else(ReadyToPlayPage::void)
    }

    /// How much look-ahead is missing beyond the playhead at `seek`.
    pub fn forward_space_to_fill(&self, seek: Duration) -> Duration {
        let buffered_ahead = self.end_of_last_queued_page().saturating_sub(seek);
        self.forward_capacity.saturating_sub(buffered_ahead)
    }

    /// Look up the page at `seek` and report what refill work is needed.
    ///
    /// A miss returns the void page and requests a full rebuild. A hit trims
    /// the backward buffer to capacity before returning, and requests a soft
    /// refill when the remaining look-ahead drops below the threshold.
    pub fn get_at(&mut self, seek: Duration) -> PageLookup {
        let page = match self.queue.get_at(seek) {
            Some(page) => page.clone(),
            None => {
                log::debug!("buffer miss at {}ms", seek.as_millis());
                return PageLookup {
                    page: ReadyToPlayPage::void(),
                    refill: RefillNeed::Full,
                };
            }
        };

        let buffered_ahead = self.end_of_last_queued_page().saturating_sub(seek);
        let refill = if buffered_ahead < self.forward_capacity.mul_f64(SOFT_REFILL_THRESHOLD) {
            RefillNeed::Soft
        } else {
            RefillNeed::None
        };

        if let Some(first) = self.queue.first() {
            let used_back = seek.saturating_sub(first.start);
            if used_back > self.backward_capacity {
                // Any page starting before the cutoff goes whole, even one
                // longer than the overflow itself; nothing kept may leave
                // more than the backward capacity behind the playhead.
                self.queue
                    .pop_front_before(seek.saturating_sub(self.backward_capacity));
            }
        }

        PageLookup { page, refill }
    }

    /// Append a page covering `[start, start + length)`.
    pub fn push_page(&mut self, page: ReadyToPlayPage, start: Duration, length: Duration) {
        self.queue.push_back(page, start, length);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of buffered pages.
    pub fn page_count(&self) -> usize {
        self.queue.len()
    }

    /// Total buffered timeline length.
    pub fn buffered_span(&self) -> Duration {
        self.queue.span()
    }

    #[cfg(test)]
    fn first_start(&self) -> Option<Duration> {
        self.queue.first().map(|item| item.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{MediaPageHeader, RenderingInstructions, Viewport};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn test_page(number: u64, duration_ms: u32) -> ReadyToPlayPage {
        let frame = RenderingInstructions {
            viewport: Some(Viewport::new(100.0, 100.0)),
            ..Default::default()
        };
        ReadyToPlayPage::new(MediaPageHeader::new(number, duration_ms, frame), Vec::new())
    }

    /// Fill `[0, total)` with 1-second pages.
    fn fill_with_one_second_pages(controller: &mut BuffersController, total: u64) {
        for i in 0..total {
            controller.push_page(test_page(i, 1000), ms(i * 1000), ms(1000));
        }
    }

    #[test]
    fn test_backward_capacity_follows_forward() {
        let mut controller = BuffersController::new(Duration::from_secs(15));
        assert_eq!(controller.backward_capacity(), Duration::from_millis(10500));

        controller.set_forward_capacity(Duration::from_secs(10));
        assert_eq!(controller.backward_capacity(), Duration::from_secs(7));
    }

    #[test]
    fn test_empty_controller_misses_and_requests_full_refill() {
        let mut controller = BuffersController::default();
        let lookup = controller.get_at(ms(0));
        assert!(lookup.page.is_void());
        assert_eq!(lookup.refill, RefillNeed::Full);
        assert_eq!(controller.end_of_last_queued_page(), ms(0));
        assert!(controller.last_page().is_void());
    }

    #[test]
    fn test_hit_with_ample_lookahead_needs_no_refill() {
        let mut controller = BuffersController::new(Duration::from_secs(10));
        fill_with_one_second_pages(&mut controller, 10);

        let lookup = controller.get_at(ms(500));
        assert_eq!(lookup.page.header.as_ref().unwrap().media_page_number, 0);
        assert_eq!(lookup.refill, RefillNeed::None);
    }

    #[test]
    fn test_low_lookahead_requests_soft_refill() {
        let mut controller = BuffersController::new(Duration::from_secs(10));
        fill_with_one_second_pages(&mut controller, 10);

        // 6s of look-ahead remain at 4s, below the 7s threshold.
        let lookup = controller.get_at(ms(4000));
        assert_eq!(lookup.page.header.as_ref().unwrap().media_page_number, 4);
        assert_eq!(lookup.refill, RefillNeed::Soft);
    }

    #[test]
    fn test_forward_space_to_fill() {
        let mut controller = BuffersController::new(Duration::from_secs(10));
        assert_eq!(controller.forward_space_to_fill(ms(0)), Duration::from_secs(10));

        fill_with_one_second_pages(&mut controller, 10);
        assert_eq!(controller.forward_space_to_fill(ms(0)), ms(0));
        assert_eq!(controller.forward_space_to_fill(ms(4000)), ms(4000));
        // A playhead beyond the queued timeline needs the whole window.
        assert_eq!(controller.forward_space_to_fill(ms(20000)), Duration::from_secs(10));
    }

    #[test]
    fn test_backward_overflow_is_evicted_on_lookup() {
        let mut controller = BuffersController::new(Duration::from_secs(10));
        fill_with_one_second_pages(&mut controller, 20);

        // 12s sit behind the playhead; capacity is 7s.
        let lookup = controller.get_at(ms(12000));
        assert_eq!(lookup.page.header.as_ref().unwrap().media_page_number, 12);

        let first_start = controller.first_start().unwrap();
        assert!(ms(12000) - first_start <= controller.backward_capacity());
        // 5 whole seconds of overflow were dropped.
        assert_eq!(first_start, ms(5000));
    }

    #[test]
    fn test_oversized_front_page_is_dropped_to_honor_backward_capacity() {
        let mut controller = BuffersController::new(Duration::from_secs(15));
        controller.push_page(test_page(0, 20000), ms(0), ms(20000));

        // The hit still serves the 20s page, but it cannot stay once 15s of
        // it sit behind the playhead (capacity 10.5s).
        let lookup = controller.get_at(ms(15000));
        assert_eq!(lookup.page.header.as_ref().unwrap().media_page_number, 0);
        assert!(controller.is_empty());
    }

    #[test]
    fn test_lookup_behind_buffered_window_misses() {
        let mut controller = BuffersController::new(Duration::from_secs(10));
        controller.push_page(test_page(5, 1000), ms(5000), ms(1000));

        let lookup = controller.get_at(ms(2000));
        assert!(lookup.page.is_void());
        assert_eq!(lookup.refill, RefillNeed::Full);
    }

    #[test]
    fn test_clear_resets_occupancy() {
        let mut controller = BuffersController::default();
        fill_with_one_second_pages(&mut controller, 3);
        assert_eq!(controller.page_count(), 3);
        assert_eq!(controller.buffered_span(), ms(3000));

        controller.clear();
        assert!(controller.is_empty());
        assert_eq!(controller.buffered_span(), ms(0));
        assert!(controller.last_page().is_void());
    }
}
