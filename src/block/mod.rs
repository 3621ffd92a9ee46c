//! Block contract between sample-processing code and the streaming framework.
//!
//! A streaming framework repeatedly hands a block one chunk of samples per
//! stream, together with the tags that fall inside that chunk:
//!
//! - [`SyncBlock`]: N-in/N-out block invoked once per batch
//! - [`WorkContext`]: The batch: input chunks, tags, output slots, consumption
//! - [`WorkStatus`]: What the block did with the batch
//!
//! # Consume and Re-invoke
//!
//! A block either produces an equal-length output chunk on every stream
//! ([`WorkStatus::Produced`]) or consumes some (possibly zero) samples from
//! the head of one or more inputs without producing anything
//! ([`WorkStatus::Consumed`]). In the second case the framework drops the
//! consumed samples and invokes the block again once data is available.
//! Blocks never wait for data themselves.

mod context;
mod traits;

pub use context::{InputChunk, WorkContext};
pub use traits::{SyncBlock, WorkStatus};

/// Complex baseband sample carried by every stream.
pub type Sample = num_complex::Complex32;
