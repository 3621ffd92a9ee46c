//! Stream tags: metadata attached to individual samples.
//!
//! # Well-known Tags
//!
//! | Key | Value | Description |
//! |-----|-------|-------------|
//! | `rx_rate` | Double | Stream sample rate in samples/second |
//! | `rx_time` | Time | Absolute time `(secs, frac)` at the tagged sample |
//!
//! # Example
//!
//! ```rust
//! use align_streams::event::{StreamTag, TagValue};
//!
//! let rate = StreamTag::rx_rate(0, 12_000.0);
//! let time = StreamTag::rx_time(0, 1_700_000_000, 0.25);
//!
//! assert_eq!(rate.rate(), Some(12_000.0));
//! assert_eq!(time.time().unwrap().subsec_nanos(), 250_000_000);
//! assert_eq!(rate.value, TagValue::Double(12_000.0));
//! ```

use crate::temporal::GnssTime;

/// Key of sample-rate announcements.
pub const RX_RATE: &str = "rx_rate";

/// Key of absolute-time markers.
pub const RX_TIME: &str = "rx_time";

// ============================================================================
// Tag Value
// ============================================================================

/// Value carried by a stream tag.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Floating point value.
    Double(f64),
    /// Unsigned integer.
    UInt(u64),
    /// Signed integer.
    Int(i64),
    /// String value.
    String(String),
    /// Absolute time as integer seconds plus fractional seconds.
    Time(u64, f64),
}

impl TagValue {
    /// Numeric value as `f64`, accepting any numeric variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Double(v) => Some(*v),
            TagValue::UInt(v) => Some(*v as f64),
            TagValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get as string if this is a String variant.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            TagValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Decode a Time variant into fixed-point time.
    pub fn as_time(&self) -> Option<GnssTime> {
        match self {
            TagValue::Time(secs, frac) => GnssTime::from_secs_frac(*secs, *frac),
            _ => None,
        }
    }
}

impl From<f64> for TagValue {
    fn from(v: f64) -> Self {
        TagValue::Double(v)
    }
}

impl From<u64> for TagValue {
    fn from(v: u64) -> Self {
        TagValue::UInt(v)
    }
}

impl From<i64> for TagValue {
    fn from(v: i64) -> Self {
        TagValue::Int(v)
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::String(s.to_string())
    }
}

impl From<(u64, f64)> for TagValue {
    fn from((secs, frac): (u64, f64)) -> Self {
        TagValue::Time(secs, frac)
    }
}

impl From<GnssTime> for TagValue {
    fn from(t: GnssTime) -> Self {
        TagValue::Time(t.secs(), t.subsec_nanos() as f64 / 1e9)
    }
}

// ============================================================================
// Stream Tag
// ============================================================================

/// A key/value tag bound to an absolute sample offset of one stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamTag {
    /// Absolute sample index the tag refers to.
    pub offset: u64,
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: TagValue,
}

impl StreamTag {
    /// Create a new tag.
    pub fn new(offset: u64, key: impl Into<String>, value: impl Into<TagValue>) -> Self {
        Self {
            offset,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Sample-rate announcement.
    pub fn rx_rate(offset: u64, rate: f64) -> Self {
        Self::new(offset, RX_RATE, rate)
    }

    /// Absolute-time marker from an integer/fractional seconds pair.
    pub fn rx_time(offset: u64, secs: u64, frac: f64) -> Self {
        Self::new(offset, RX_TIME, (secs, frac))
    }

    /// Absolute-time marker from fixed-point time.
    pub fn rx_time_at(offset: u64, time: GnssTime) -> Self {
        Self::new(offset, RX_TIME, time)
    }

    /// Check if this is a sample-rate announcement.
    pub fn is_rx_rate(&self) -> bool {
        self.key == RX_RATE
    }

    /// Check if this is an absolute-time marker.
    pub fn is_rx_time(&self) -> bool {
        self.key == RX_TIME
    }

    /// The announced sample rate, if this is an `rx_rate` tag.
    pub fn rate(&self) -> Option<f64> {
        if self.is_rx_rate() {
            self.value.as_f64()
        } else {
            None
        }
    }

    /// The marked time, if this is a decodable `rx_time` tag.
    pub fn time(&self) -> Option<GnssTime> {
        if self.is_rx_time() {
            self.value.as_time()
        } else {
            None
        }
    }

    /// Copy of this tag moved to another offset.
    pub fn with_offset(&self, offset: u64) -> Self {
        Self {
            offset,
            ..self.clone()
        }
    }
}
