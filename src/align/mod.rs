//! Sample-offset alignment of streams sharing one clock.
//!
//! Independent receiver channels disciplined by the same GNSS clock start
//! streaming at different, unknown sample offsets. The [`OffsetAligner`]
//! measures those offsets from the `rx_time` tags embedded in each stream
//! and discards leading samples until index `k` of every stream refers to
//! the same instant; afterwards it passes samples through untouched.
//!
//! - [`OffsetAligner`]: The N-in/N-out block
//! - [`AlignConfig`]: Gate thresholds and queue bounds
//! - [`AlignPhase`]: Learning / correcting / pass-through state machine
//! - [`Candidate`]: Offset vector of one correction round, and its gate
//!
//! # What is not corrected
//!
//! Only whole-sample offsets are removed. Fractional skew, carrier phase
//! and clock drift are left as they are, and alignment state does not
//! survive a restart.

mod aligner;
mod config;
mod correction;
mod phase;
mod stream;

pub use aligner::{AlignStats, OffsetAligner};
pub use config::AlignConfig;
pub use correction::{Candidate, GateVerdict, StreamHead, sample_skew};
pub use phase::{AlignPhase, RoundOutcome};
pub use stream::StreamState;
