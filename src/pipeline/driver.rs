//! Single-threaded driver for synchronous blocks.
//!
//! [`BlockDriver`] plays the streaming framework's role for one
//! [`SyncBlock`]: it buffers samples and tags per input stream, hands the
//! block equal-length chunks together with the tags inside each chunk, and
//! honours the consume-and-re-invoke contract.
//!
//! # Tag Propagation
//!
//! Tags are propagated one-to-one. A tag at absolute input offset `o` that
//! falls inside a produced range lands on output offset
//! `o - nitems_read + nitems_written`. Tags attached to samples the block
//! consumed without producing are dropped along with those samples.
//!
//! # Example
//!
//! ```rust
//! use align_streams::block::Sample;
//! use align_streams::event::StreamTag;
//! use align_streams::pipeline::{AlignStreams, BlockDriver};
//!
//! let block = AlignStreams::new(2, true).unwrap();
//! let mut driver = BlockDriver::new(block).unwrap();
//! driver.start().unwrap();
//!
//! for i in 0..2 {
//!     driver.push_samples(i, &vec![Sample::default(); 1000]).unwrap();
//!     driver.push_tag(i, StreamTag::rx_rate(0, 1e6)).unwrap();
//! }
//! driver.push_tag(0, StreamTag::rx_time(0, 100, 0.0)).unwrap();
//! driver.push_tag(1, StreamTag::rx_time(0, 100, 0.000_05)).unwrap();
//!
//! driver.run().unwrap();
//! assert_eq!(driver.block().aligner().delays(), vec![50, 0]);
//! assert_eq!(driver.output(0).len(), 950);
//! assert_eq!(driver.output(1).len(), 950);
//! ```

use crate::block::{InputChunk, Sample, SyncBlock, WorkContext, WorkStatus};
use crate::error::{Error, Result};
use crate::event::StreamTag;
use std::collections::VecDeque;

/// Default upper bound on chunk length.
pub const DEFAULT_MAX_CHUNK: usize = 4096;

/// Result of one driver step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverStep {
    /// Some stream had no samples; the block was not invoked.
    Idle,
    /// The block produced this many samples per stream.
    Produced(usize),
    /// The block consumed without producing; total samples dropped.
    Consumed(usize),
}

/// Buffered state of one stream.
#[derive(Debug, Default)]
struct StreamQueue {
    samples: VecDeque<Sample>,
    tags: VecDeque<StreamTag>,
    nitems_read: u64,
    nitems_written: u64,
    output: Vec<Sample>,
    output_tags: Vec<StreamTag>,
    scratch: Vec<Sample>,
}

impl StreamQueue {
    /// Drop `n` leading samples and every tag before the new read position.
    fn discard(&mut self, n: usize) {
        self.samples.drain(..n);
        self.nitems_read += n as u64;
        let read = self.nitems_read;
        self.tags.retain(|t| t.offset >= read);
    }

    /// Move `n` produced samples and their tags to the output.
    fn emit(&mut self, n: usize) {
        self.output.extend_from_slice(&self.scratch[..n]);

        let end = self.nitems_read + n as u64;
        while let Some(tag) = self.tags.front() {
            if tag.offset >= end {
                break;
            }
            if let Some(tag) = self.tags.pop_front() {
                if tag.offset >= self.nitems_read {
                    let offset = tag.offset - self.nitems_read + self.nitems_written;
                    self.output_tags.push(tag.with_offset(offset));
                }
            }
        }

        self.samples.drain(..n);
        self.nitems_read = end;
        self.nitems_written += n as u64;
    }
}

/// Drives one [`SyncBlock`] over buffered input streams.
pub struct BlockDriver<B: SyncBlock> {
    block: B,
    streams: Vec<StreamQueue>,
    max_chunk: usize,
}

impl<B: SyncBlock> BlockDriver<B> {
    /// Create a driver for `block`.
    ///
    /// The block must have as many outputs as inputs.
    pub fn new(block: B) -> Result<Self> {
        if block.num_inputs() != block.num_outputs() {
            return Err(Error::StreamCountMismatch {
                expected: block.num_inputs(),
                actual: block.num_outputs(),
            });
        }
        let streams = (0..block.num_inputs())
            .map(|_| StreamQueue::default())
            .collect();
        Ok(Self {
            block,
            streams,
            max_chunk: DEFAULT_MAX_CHUNK,
        })
    }

    /// Limit the chunk length handed to the block per invocation.
    pub fn with_max_chunk(mut self, max_chunk: usize) -> Self {
        self.max_chunk = max_chunk.max(1);
        self
    }

    /// Start (or restart) the block.
    pub fn start(&mut self) -> Result<()> {
        tracing::debug!(block = self.block.name(), "starting block");
        self.block.start()
    }

    fn stream_mut(&mut self, i: usize) -> Result<&mut StreamQueue> {
        let count = self.streams.len();
        self.streams
            .get_mut(i)
            .ok_or(Error::StreamIndex { index: i, count })
    }

    fn stream(&self, i: usize) -> &StreamQueue {
        &self.streams[i]
    }

    /// Append samples to input stream `i`.
    pub fn push_samples(&mut self, i: usize, samples: &[Sample]) -> Result<()> {
        self.stream_mut(i)?.samples.extend(samples.iter().copied());
        Ok(())
    }

    /// Attach a tag to input stream `i` at its absolute offset.
    pub fn push_tag(&mut self, i: usize, tag: StreamTag) -> Result<()> {
        let stream = self.stream_mut(i)?;
        let pos = stream.tags.partition_point(|t| t.offset <= tag.offset);
        stream.tags.insert(pos, tag);
        Ok(())
    }

    /// Invoke the block once on the samples currently available.
    pub fn step(&mut self) -> Result<DriverStep> {
        let n = self
            .streams
            .iter()
            .map(|s| s.samples.len())
            .min()
            .unwrap_or(0)
            .min(self.max_chunk);
        if n == 0 {
            return Ok(DriverStep::Idle);
        }

        let windows: Vec<Vec<StreamTag>> = self
            .streams
            .iter()
            .map(|s| {
                let end = s.nitems_read + n as u64;
                s.tags
                    .iter()
                    .filter(|t| t.offset >= s.nitems_read && t.offset < end)
                    .cloned()
                    .collect()
            })
            .collect();

        let mut inputs = Vec::with_capacity(self.streams.len());
        let mut outputs = Vec::with_capacity(self.streams.len());
        for (stream, tags) in self.streams.iter_mut().zip(&windows) {
            stream.samples.make_contiguous();
            stream.scratch.clear();
            stream.scratch.resize(n, Sample::default());

            let (head, _) = stream.samples.as_slices();
            inputs.push(InputChunk::new(&head[..n], tags, stream.nitems_read));
            outputs.push(&mut stream.scratch[..n]);
        }

        let mut ctx = WorkContext::new(inputs, outputs)?;
        let status = self.block.work(&mut ctx)?;
        let consumed = ctx.consumed_all().to_vec();
        drop(ctx);

        match status {
            WorkStatus::Produced(k) => {
                let k = k.min(n);
                for stream in &mut self.streams {
                    stream.emit(k);
                }
                Ok(DriverStep::Produced(k))
            }
            WorkStatus::Consumed => {
                for (stream, &c) in self.streams.iter_mut().zip(&consumed) {
                    stream.discard(c);
                }
                Ok(DriverStep::Consumed(consumed.iter().sum()))
            }
        }
    }

    /// Step until the block is idle or stops making progress.
    ///
    /// Returns the total samples produced per stream.
    pub fn run(&mut self) -> Result<usize> {
        let mut produced = 0;
        loop {
            match self.step()? {
                DriverStep::Idle | DriverStep::Produced(0) | DriverStep::Consumed(0) => break,
                DriverStep::Produced(k) => produced += k,
                DriverStep::Consumed(_) => {}
            }
        }
        Ok(produced)
    }

    /// Number of streams.
    pub fn num_streams(&self) -> usize {
        self.streams.len()
    }

    /// Samples waiting on input stream `i`.
    pub fn available(&self, i: usize) -> usize {
        self.stream(i).samples.len()
    }

    /// Output samples of stream `i` so far.
    pub fn output(&self, i: usize) -> &[Sample] {
        &self.stream(i).output
    }

    /// Output tags of stream `i` so far, at output offsets.
    pub fn output_tags(&self, i: usize) -> &[StreamTag] {
        &self.stream(i).output_tags
    }

    /// Take and clear the output samples of stream `i`.
    pub fn take_output(&mut self, i: usize) -> Result<Vec<Sample>> {
        Ok(std::mem::take(&mut self.stream_mut(i)?.output))
    }

    /// Absolute input samples consumed from stream `i`.
    pub fn nitems_read(&self, i: usize) -> u64 {
        self.stream(i).nitems_read
    }

    /// Absolute output samples produced on stream `i`.
    pub fn nitems_written(&self, i: usize) -> u64 {
        self.stream(i).nitems_written
    }

    /// The driven block.
    pub fn block(&self) -> &B {
        &self.block
    }

    /// Mutable access to the driven block.
    pub fn block_mut(&mut self) -> &mut B {
        &mut self.block
    }
}

impl<B: SyncBlock> std::fmt::Debug for BlockDriver<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockDriver")
            .field("block", &self.block.name())
            .field("streams", &self.streams.len())
            .field("max_chunk", &self.max_chunk)
            .finish()
    }
}
