//! Block wiring and execution.
//!
//! - [`AlignStreams`]: The N-in/N-out alignment block
//! - [`BlockDriver`]: Single-threaded driver feeding a block chunk by chunk
//!
//! # Example
//!
//! ```rust
//! use align_streams::pipeline::{AlignStreams, BlockDriver, DriverStep};
//!
//! let mut driver = BlockDriver::new(AlignStreams::new(2, true).unwrap()).unwrap();
//! driver.start().unwrap();
//!
//! // Nothing buffered yet
//! assert_eq!(driver.step().unwrap(), DriverStep::Idle);
//! ```

mod align_streams;
mod driver;

pub use align_streams::AlignStreams;
pub use driver::{BlockDriver, DEFAULT_MAX_CHUNK, DriverStep};
