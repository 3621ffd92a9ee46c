//! Per-stream alignment state.

use crate::temporal::{TagQueue, TimeTag};

/// Everything the aligner tracks for one stream.
#[derive(Debug, Clone)]
pub struct StreamState {
    /// Sample rate, once announced.
    rate: Option<f64>,
    /// Time tags awaiting a correction round.
    tags: TagQueue,
    /// Samples discarded from the head since start.
    delay: u64,
}

impl StreamState {
    /// Fresh state with an empty tag queue bounded at `max_queued_tags`.
    pub fn new(max_queued_tags: usize) -> Self {
        Self {
            rate: None,
            tags: TagQueue::new(max_queued_tags),
            delay: 0,
        }
    }

    /// Forget everything learned in the current run.
    pub fn reset(&mut self) {
        self.rate = None;
        self.tags.clear();
        self.delay = 0;
    }

    /// Learn the rate as the mean of this batch's announcements.
    ///
    /// Non-finite and non-positive values are ignored. Returns `true` if
    /// the rate was updated.
    pub fn learn_rate(&mut self, announced: impl IntoIterator<Item = f64>) -> bool {
        let (sum, count) = announced
            .into_iter()
            .filter(|r| r.is_finite() && *r > 0.0)
            .fold((0.0, 0usize), |(sum, n), r| (sum + r, n + 1));
        if count == 0 {
            return false;
        }
        self.rate = Some(sum / count as f64);
        true
    }

    /// Current sample rate.
    pub fn rate(&self) -> Option<f64> {
        self.rate
    }

    /// Queue a time tag. Returns the tag evicted by the queue bound, if any.
    pub fn push_tag(&mut self, tag: TimeTag) -> Option<TimeTag> {
        self.tags.push(tag)
    }

    /// Queued time tags.
    pub fn tags(&self) -> &TagQueue {
        &self.tags
    }

    /// Mutable access to the queued time tags.
    pub fn tags_mut(&mut self) -> &mut TagQueue {
        &mut self.tags
    }

    /// Samples discarded from the head since start.
    pub fn delay(&self) -> u64 {
        self.delay
    }

    /// Add discarded samples to the delay.
    pub fn add_delay(&mut self, samples: u64) {
        self.delay += samples;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::GnssTime;

    #[test]
    fn test_learn_rate_mean() {
        let mut state = StreamState::new(8);
        assert_eq!(state.rate(), None);

        assert!(state.learn_rate([1000.0, 1002.0]));
        assert_eq!(state.rate(), Some(1001.0));
    }

    #[test]
    fn test_learn_rate_ignores_invalid() {
        let mut state = StreamState::new(8);
        assert!(!state.learn_rate([0.0, -5.0, f64::NAN]));
        assert_eq!(state.rate(), None);

        assert!(state.learn_rate([0.0, 12_000.0]));
        assert_eq!(state.rate(), Some(12_000.0));

        // No announcements keeps the previous rate
        assert!(!state.learn_rate([]));
        assert_eq!(state.rate(), Some(12_000.0));
    }

    #[test]
    fn test_reset() {
        let mut state = StreamState::new(8);
        state.learn_rate([1e6]);
        state.push_tag(TimeTag::new(0, GnssTime::from_secs(1)));
        state.add_delay(40);

        state.reset();
        assert_eq!(state.rate(), None);
        assert!(state.tags().is_empty());
        assert_eq!(state.delay(), 0);
    }
}
