//! N-in/N-out alignment block.

use crate::align::{AlignConfig, OffsetAligner};
use crate::block::{SyncBlock, WorkContext, WorkStatus};
use crate::error::Result;

/// Aligns N IQ streams from receiver channels sharing one GNSS clock.
///
/// Input port `i` is wired straight through the inner [`OffsetAligner`]'s
/// port `i` to output port `i`. The wrapper does no buffering or
/// processing of its own.
///
/// # Example
///
/// ```rust
/// use align_streams::block::SyncBlock;
/// use align_streams::pipeline::AlignStreams;
///
/// let mut block = AlignStreams::new(4, true).unwrap();
/// let rates = block.aligner_mut().subscribe();
///
/// assert_eq!(block.num_inputs(), 4);
/// assert_eq!(block.num_outputs(), 4);
/// assert!(block.port_map().all(|(input, output)| input == output));
/// # drop(rates);
/// ```
#[derive(Debug)]
pub struct AlignStreams {
    name: String,
    aligner: OffsetAligner,
}

impl AlignStreams {
    /// Create a block for `num_streams` streams.
    ///
    /// `same_kiwi` asserts that all streams come from one receiver, which
    /// enables the tighter residual check.
    pub fn new(num_streams: usize, same_kiwi: bool) -> Result<Self> {
        Self::with_config(num_streams, AlignConfig::new(same_kiwi))
    }

    /// Create a block with a custom aligner configuration.
    pub fn with_config(num_streams: usize, config: AlignConfig) -> Result<Self> {
        Ok(Self {
            name: "align-streams".to_string(),
            aligner: OffsetAligner::with_config(num_streams, config)?,
        })
    }

    /// Set a custom name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The inner aligner.
    pub fn aligner(&self) -> &OffsetAligner {
        &self.aligner
    }

    /// Mutable access to the inner aligner (e.g. to subscribe to rates).
    pub fn aligner_mut(&mut self) -> &mut OffsetAligner {
        &mut self.aligner
    }

    /// Input-to-output port wiring.
    pub fn port_map(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        (0..self.aligner.num_streams()).map(|i| (i, i))
    }
}

impl SyncBlock for AlignStreams {
    fn start(&mut self) -> Result<()> {
        self.aligner.start()
    }

    fn work(&mut self, ctx: &mut WorkContext<'_>) -> Result<WorkStatus> {
        self.aligner.work(ctx)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn num_inputs(&self) -> usize {
        self.aligner.num_streams()
    }

    fn num_outputs(&self) -> usize {
        self.aligner.num_streams()
    }
}
