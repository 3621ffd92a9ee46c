//! # align-streams
//!
//! Sample-accurate alignment of IQ streams from receiver channels that share
//! one GNSS-disciplined clock.
//!
//! Each channel starts streaming at its own, unknown sample offset. Every
//! stream carries `rx_rate` and `rx_time` tags; from those the aligner
//! computes the integer sample delay of each stream against stream 0,
//! discards that many leading samples, and from then on passes all streams
//! through unmodified, sample for sample.
//!
//! ## Features
//!
//! - **Fixed-point time**: GNSS seconds + nanoseconds, differenced exactly
//! - **Sanity gate**: Implausible or fractional offsets are logged and ignored
//! - **Explicit state machine**: Learning, correcting, pass-through
//! - **Framework-agnostic**: Synchronous consume-and-re-invoke block contract
//!
//! ## Quick Start
//!
//! ```rust
//! use align_streams::prelude::*;
//!
//! let mut driver = BlockDriver::new(AlignStreams::new(2, true)?)?;
//! let rates = driver.block_mut().aligner_mut().subscribe();
//! driver.start()?;
//!
//! for i in 0..2 {
//!     driver.push_samples(i, &vec![Sample::default(); 2048])?;
//!     driver.push_tag(i, StreamTag::rx_rate(0, 1e6))?;
//! }
//! // Stream 1 started 50 samples later
//! driver.push_tag(0, StreamTag::rx_time(0, 100, 0.0))?;
//! driver.push_tag(1, StreamTag::rx_time(0, 100, 0.000_05))?;
//!
//! driver.run()?;
//! assert_eq!(driver.block().aligner().delays(), vec![50, 0]);
//! assert_eq!(rates.try_recv().unwrap().unwrap().rates, vec![1e6, 1e6]);
//! # Ok::<(), align_streams::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod align;
pub mod block;
pub mod error;
pub mod event;
pub mod observability;
pub mod pipeline;
pub mod temporal;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::align::{AlignConfig, AlignPhase, OffsetAligner};
    pub use crate::block::{Sample, SyncBlock, WorkContext, WorkStatus};
    pub use crate::error::{Error, Result};
    pub use crate::event::{RateAnnouncement, StreamTag};
    pub use crate::pipeline::{AlignStreams, BlockDriver, DriverStep};
    pub use crate::temporal::GnssTime;
}

pub use error::{Error, Result};
