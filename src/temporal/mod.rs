//! Temporal types for GNSS-timestamped streams.
//!
//! This module provides the fixed-point time representation used for
//! alignment math and the per-stream queue of observed time tags:
//!
//! - [`GnssTime`]: Absolute time as whole seconds plus nanoseconds
//! - [`TimeTag`]: A sample offset bound to the absolute time observed there
//! - [`TagQueue`]: Bounded FIFO of time tags awaiting a correction round
//!
//! # Precision
//!
//! Receivers report time as an integer second and a fractional second.
//! Folding both into one `f64` loses precision once the epoch is large,
//! so differences are taken in integer nanoseconds and only the (small)
//! result is converted to floating point.

mod time_tag;
mod timestamp;

pub use time_tag::{TagQueue, TimeTag};
pub use timestamp::GnssTime;
