//! Core block trait.

use super::context::WorkContext;
use crate::error::Result;

/// Outcome of one block invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStatus {
    /// `n` samples were written to every output and consumed from every input.
    Produced(usize),
    /// Nothing was produced; the per-stream consumption recorded on the
    /// context is all the framework should drop before re-invoking.
    Consumed,
}

impl WorkStatus {
    /// Samples produced per stream (zero for [`WorkStatus::Consumed`]).
    pub fn produced(&self) -> usize {
        match self {
            WorkStatus::Produced(n) => *n,
            WorkStatus::Consumed => 0,
        }
    }
}

/// A block with one output per input, invoked synchronously per batch.
///
/// # Lifecycle
///
/// - `start()` is called before the first batch and on every restart; it
///   resets all per-run state
/// - `work()` is called repeatedly; it must not block
///
/// # Example
///
/// ```rust
/// use align_streams::block::{SyncBlock, WorkContext, WorkStatus};
/// use align_streams::error::Result;
///
/// struct Copy2;
///
/// impl SyncBlock for Copy2 {
///     fn work(&mut self, ctx: &mut WorkContext<'_>) -> Result<WorkStatus> {
///         for i in 0..ctx.num_streams() {
///             let input = ctx.input(i);
///             ctx.output_mut(i).copy_from_slice(input);
///         }
///         Ok(WorkStatus::Produced(ctx.len()))
///     }
///
///     fn num_inputs(&self) -> usize {
///         2
///     }
///
///     fn num_outputs(&self) -> usize {
///         2
///     }
/// }
/// ```
pub trait SyncBlock: Send {
    /// Reset per-run state.
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Process one batch.
    fn work(&mut self, ctx: &mut WorkContext<'_>) -> Result<WorkStatus>;

    /// Get the name of this block (for debugging/logging).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Number of input streams.
    fn num_inputs(&self) -> usize;

    /// Number of output streams.
    fn num_outputs(&self) -> usize;
}

impl<B: SyncBlock + ?Sized> SyncBlock for Box<B> {
    fn start(&mut self) -> Result<()> {
        (**self).start()
    }

    fn work(&mut self, ctx: &mut WorkContext<'_>) -> Result<WorkStatus> {
        (**self).work(ctx)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn num_inputs(&self) -> usize {
        (**self).num_inputs()
    }

    fn num_outputs(&self) -> usize {
        (**self).num_outputs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_status_produced() {
        assert_eq!(WorkStatus::Produced(64).produced(), 64);
        assert_eq!(WorkStatus::Consumed.produced(), 0);
    }
}
