//! Stream tags and outbound messages.
//!
//! Two kinds of metadata travel alongside the sample streams:
//!
//! - **Stream tags** ([`StreamTag`]): in-band, bound to one sample of one
//!   stream (`rx_rate`, `rx_time`).
//! - **Port messages**: out-of-band announcements a block publishes on a
//!   named [`MessagePort`]. The aligner publishes a [`RateAnnouncement`]
//!   on the `fs` port whenever every stream's rate is known.
//!
//! # Example
//!
//! ```rust
//! use align_streams::event::{MessagePort, RateAnnouncement, RATE_PORT};
//!
//! let mut port = MessagePort::new(RATE_PORT);
//! let rx = port.subscribe();
//!
//! port.publish(RateAnnouncement::new(vec![12_000.0, 12_000.0]));
//!
//! let msg = rx.try_recv().unwrap().unwrap();
//! assert_eq!(msg.rates, vec![12_000.0, 12_000.0]);
//! ```

mod tags;

pub use tags::{RX_RATE, RX_TIME, StreamTag, TagValue};

/// Name of the port carrying sample-rate vectors.
pub const RATE_PORT: &str = "fs";

// ============================================================================
// Rate Announcement
// ============================================================================

/// The full per-stream sample-rate vector, published on the `fs` port.
#[derive(Debug, Clone, PartialEq)]
pub struct RateAnnouncement {
    /// Sample rate of each stream, indexed by stream.
    pub rates: Vec<f64>,
}

impl RateAnnouncement {
    /// Create an announcement from a rate vector.
    pub fn new(rates: Vec<f64>) -> Self {
        Self { rates }
    }

    /// The message key.
    pub fn key(&self) -> &'static str {
        RATE_PORT
    }
}

// ============================================================================
// Message Port
// ============================================================================

/// An outbound message port with any number of subscribers.
///
/// Each subscriber receives every message published after it subscribed.
/// Subscribers whose receiver has been dropped are pruned on publish.
pub struct MessagePort<T> {
    name: &'static str,
    subscribers: Vec<kanal::Sender<T>>,
    published: u64,
}

impl<T: Clone> MessagePort<T> {
    /// Create a port with no subscribers.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            subscribers: Vec::new(),
            published: 0,
        }
    }

    /// Subscribe to the port.
    pub fn subscribe(&mut self) -> kanal::Receiver<T> {
        let (tx, rx) = kanal::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Publish a message to every live subscriber.
    ///
    /// Returns the number of subscribers that received it.
    pub fn publish(&mut self, msg: T) -> usize {
        self.subscribers.retain(|tx| tx.send(msg.clone()).is_ok());
        self.published += 1;
        self.subscribers.len()
    }

    /// Port name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of subscribers still attached as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Total messages published.
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl<T> std::fmt::Debug for MessagePort<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagePort")
            .field("name", &self.name)
            .field("subscribers", &self.subscribers.len())
            .field("published", &self.published)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let mut port = MessagePort::new(RATE_PORT);
        let rx1 = port.subscribe();
        let rx2 = port.subscribe();

        let delivered = port.publish(RateAnnouncement::new(vec![1.0, 2.0]));
        assert_eq!(delivered, 2);
        assert_eq!(port.published(), 1);

        assert_eq!(rx1.try_recv().unwrap().unwrap().rates, vec![1.0, 2.0]);
        assert_eq!(rx2.try_recv().unwrap().unwrap().rates, vec![1.0, 2.0]);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let mut port: MessagePort<RateAnnouncement> = MessagePort::new(RATE_PORT);
        assert_eq!(port.publish(RateAnnouncement::new(vec![1.0])), 0);
        assert_eq!(port.name(), "fs");
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut port = MessagePort::new(RATE_PORT);
        let keep = port.subscribe();
        let gone = port.subscribe();
        drop(gone);

        port.publish(RateAnnouncement::new(vec![3.0]));
        assert_eq!(port.subscriber_count(), 1);
        assert!(keep.try_recv().unwrap().is_some());
    }

    #[test]
    fn test_announcement_key() {
        assert_eq!(RateAnnouncement::new(vec![]).key(), "fs");
    }
}
