//! Time tags and their per-stream queue.

use super::timestamp::GnssTime;
use std::collections::VecDeque;

/// A sample offset bound to the absolute time observed at that sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTag {
    /// Absolute sample index within the stream.
    pub offset: u64,
    /// Absolute time at that sample.
    pub time: GnssTime,
}

impl TimeTag {
    /// Create a new time tag.
    pub fn new(offset: u64, time: GnssTime) -> Self {
        Self { offset, time }
    }
}

/// Bounded FIFO of time tags awaiting a correction round.
///
/// When full, pushing drops the oldest tag.
#[derive(Debug, Clone)]
pub struct TagQueue {
    tags: VecDeque<TimeTag>,
    max_len: usize,
}

impl TagQueue {
    /// Create an empty queue holding at most `max_len` tags.
    pub fn new(max_len: usize) -> Self {
        Self {
            tags: VecDeque::new(),
            max_len: max_len.max(1),
        }
    }

    /// Append a tag. Returns the evicted tag if the queue was full.
    pub fn push(&mut self, tag: TimeTag) -> Option<TimeTag> {
        let evicted = if self.tags.len() >= self.max_len {
            self.tags.pop_front()
        } else {
            None
        };
        self.tags.push_back(tag);
        evicted
    }

    /// The oldest queued tag.
    pub fn front(&self) -> Option<&TimeTag> {
        self.tags.front()
    }

    /// Remove and return the oldest queued tag.
    pub fn pop_front(&mut self) -> Option<TimeTag> {
        self.tags.pop_front()
    }

    /// Drop every queued tag.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Number of queued tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Maximum number of tags held.
    pub fn capacity(&self) -> usize {
        self.max_len
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TimeTag> {
        self.tags.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(offset: u64) -> TimeTag {
        TimeTag::new(offset, GnssTime::from_secs(offset))
    }

    #[test]
    fn test_queue_fifo() {
        let mut queue = TagQueue::new(8);
        queue.push(tag(1));
        queue.push(tag(2));
        queue.push(tag(3));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop_front().unwrap().offset, 1);
        assert_eq!(queue.front().unwrap().offset, 2);
        assert_eq!(
            queue.iter().map(|t| t.offset).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn test_queue_evicts_oldest_when_full() {
        let mut queue = TagQueue::new(2);
        assert!(queue.push(tag(1)).is_none());
        assert!(queue.push(tag(2)).is_none());

        let evicted = queue.push(tag(3)).unwrap();
        assert_eq!(evicted.offset, 1);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.front().unwrap().offset, 2);
    }

    #[test]
    fn test_queue_clear() {
        let mut queue = TagQueue::new(4);
        queue.push(tag(1));
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.pop_front().is_none());
    }
}
