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

use std::collections::VecDeque;
use web_time::Duration;

/// A queued payload tagged with the `[start, start + length)` seek range it
/// occupies. Never mutated after insertion.
#[derive(Debug, Clone)]
pub struct TimedItem<T> {
    pub payload: T,
    pub start: Duration,
    pub length: Duration,
}

impl<T> TimedItem<T> {
    pub fn end(&self) -> Duration {
        self.start + self.length
    }

    /// Whether `seek` falls inside this item's half-open range. The end
    /// boundary belongs to the next item.
    pub fn contains(&self, seek: Duration) -> bool {
        self.start <= seek && seek < self.end()
    }
}

/// Ordered FIFO of items tagged with contiguous seek ranges.
///
/// The queue trusts its caller to keep the timeline contiguous: every pushed
/// item must start exactly where the previous one ends. Point lookups binary
/// search on the start times; the queue is expected to hold tens of items.
#[derive(Debug)]
pub struct TimedMediaQueue<T> {
    items: VecDeque<TimedItem<T>>,
}

impl<T> Default for TimedMediaQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimedMediaQueue<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Append an item covering `[start, start + length)`.
    pub fn push_back(&mut self, payload: T, start: Duration, length: Duration) {
        self.items.push_back(TimedItem {
            payload,
            start,
            length,
        });
    }

    /// Locate the item whose range contains `seek`.
    pub fn get_at(&self, seek: Duration) -> Option<&T> {
        let index = self.items.partition_point(|item| item.end() <= seek);
        self.items
            .get(index)
            .filter(|item| item.contains(seek))
            .map(|item| &item.payload)
    }

    /// Every payload whose range overlaps `[inclusive_start, exclusive_end)`.
    ///
    /// Items straddling either boundary are included.
    pub fn get_in_range(&self, inclusive_start: Duration, exclusive_end: Duration) -> Vec<&T> {
        if exclusive_end <= inclusive_start {
            return Vec::new();
        }
        let lower = self.items.partition_point(|item| item.end() <= inclusive_start);
        let upper = self.items.partition_point(|item| item.start < exclusive_end);
        self.items
            .range(lower..upper)
            .map(|item| &item.payload)
            .collect()
    }

    /// Remove items from the front while the cumulative removed length stays
    /// within `limit`. An item that would push the total past `limit` stays.
    pub fn pop_front_by_length(&mut self, limit: Duration) {
        let mut removed = Duration::ZERO;
        while let Some(item) = self.items.front() {
            if removed + item.length > limit {
                break;
            }
            removed += item.length;
            self.items.pop_front();
        }
        if !removed.is_zero() {
            log::trace!("evicted {}ms from queue front", removed.as_millis());
        }
    }

    /// Remove items from the front until the queue is empty or its first
    /// item starts at or after `cutoff`. Unlike [`pop_front_by_length`],
    /// an item straddling the cutoff is dropped whole.
    ///
    /// [`pop_front_by_length`]: TimedMediaQueue::pop_front_by_length
    pub fn pop_front_before(&mut self, cutoff: Duration) {
        let mut removed = 0usize;
        while self
            .items
            .front()
            .map_or(false, |item| item.start < cutoff)
        {
            self.items.pop_front();
            removed += 1;
        }
        if removed > 0 {
            log::trace!(
                "evicted {removed} items starting before {}ms",
                cutoff.as_millis()
            );
        }
    }

    /// Remove items from the back while the cumulative removed length stays
    /// within `limit`.
    pub fn pop_back_by_length(&mut self, limit: Duration) {
        let mut removed = Duration::ZERO;
        while let Some(item) = self.items.back() {
            if removed + item.length > limit {
                break;
            }
            removed += item.length;
            self.items.pop_back();
        }
        if !removed.is_zero() {
            log::trace!("evicted {}ms from queue back", removed.as_millis());
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn first(&self) -> Option<&TimedItem<T>> {
        self.items.front()
    }

    pub fn last(&self) -> Option<&TimedItem<T>> {
        self.items.back()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total length of the queued timeline.
    pub fn span(&self) -> Duration {
        match (self.items.front(), self.items.back()) {
            (Some(first), Some(last)) => last.end() - first.start,
            _ => Duration::ZERO,
        }
    }
}
