//! Per-invocation work context.

use super::Sample;
use crate::error::{Error, Result};
use crate::event::StreamTag;
use smallvec::SmallVec;

/// One stream's input for a single invocation.
#[derive(Debug, Clone, Copy)]
pub struct InputChunk<'a> {
    samples: &'a [Sample],
    tags: &'a [StreamTag],
    nitems_read: u64,
}

impl<'a> InputChunk<'a> {
    /// Create a chunk.
    ///
    /// `nitems_read` is the absolute index of `samples[0]`; tag offsets are
    /// absolute too.
    pub fn new(samples: &'a [Sample], tags: &'a [StreamTag], nitems_read: u64) -> Self {
        Self {
            samples,
            tags,
            nitems_read,
        }
    }

    /// Create a chunk without tags.
    pub fn untagged(samples: &'a [Sample], nitems_read: u64) -> Self {
        Self::new(samples, &[], nitems_read)
    }
}

/// Everything a block sees and writes during one invocation.
///
/// All input chunks have the same length, and every output slot holds at
/// least that many samples.
///
/// # Panics
///
/// Per-stream accessors panic if the stream index is out of range, like
/// slice indexing.
pub struct WorkContext<'a> {
    inputs: Vec<InputChunk<'a>>,
    outputs: Vec<&'a mut [Sample]>,
    consumed: SmallVec<[usize; 4]>,
    len: usize,
}

impl<'a> WorkContext<'a> {
    /// Create a context, validating stream counts and chunk lengths.
    pub fn new(inputs: Vec<InputChunk<'a>>, outputs: Vec<&'a mut [Sample]>) -> Result<Self> {
        if inputs.len() != outputs.len() {
            return Err(Error::StreamCountMismatch {
                expected: inputs.len(),
                actual: outputs.len(),
            });
        }

        let len = inputs.first().map_or(0, |c| c.samples.len());
        for (stream, chunk) in inputs.iter().enumerate() {
            if chunk.samples.len() != len {
                return Err(Error::ChunkLengthMismatch {
                    stream,
                    expected: len,
                    actual: chunk.samples.len(),
                });
            }
        }
        for (stream, out) in outputs.iter().enumerate() {
            if out.len() < len {
                return Err(Error::ChunkLengthMismatch {
                    stream,
                    expected: len,
                    actual: out.len(),
                });
            }
        }

        Ok(Self {
            consumed: SmallVec::from_elem(0, inputs.len()),
            inputs,
            outputs,
            len,
        })
    }

    /// Number of streams.
    pub fn num_streams(&self) -> usize {
        self.inputs.len()
    }

    /// Common chunk length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the chunks are empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Input samples of stream `i`.
    pub fn input(&self, i: usize) -> &'a [Sample] {
        self.inputs[i].samples
    }

    /// Tags of stream `i` whose offsets fall inside the chunk.
    pub fn tags(&self, i: usize) -> &'a [StreamTag] {
        self.inputs[i].tags
    }

    /// Absolute index of the first sample of stream `i`'s chunk.
    pub fn nitems_read(&self, i: usize) -> u64 {
        self.inputs[i].nitems_read
    }

    /// Output slot of stream `i`, trimmed to the chunk length.
    pub fn output_mut(&mut self, i: usize) -> &mut [Sample] {
        let len = self.len;
        &mut self.outputs[i][..len]
    }

    /// Record that `n` samples of stream `i` were consumed without output.
    pub fn consume(&mut self, i: usize, n: usize) -> Result<()> {
        let count = self.inputs.len();
        let slot = self
            .consumed
            .get_mut(i)
            .ok_or(Error::StreamIndex { index: i, count })?;
        let requested = *slot + n;
        if requested > self.len {
            return Err(Error::OverConsume {
                stream: i,
                requested,
                available: self.len,
            });
        }
        *slot = requested;
        Ok(())
    }

    /// Samples of stream `i` consumed so far in this invocation.
    pub fn consumed(&self, i: usize) -> usize {
        self.consumed[i]
    }

    /// Per-stream consumption recorded so far.
    pub fn consumed_all(&self) -> &[usize] {
        &self.consumed
    }
}

impl std::fmt::Debug for WorkContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkContext")
            .field("streams", &self.inputs.len())
            .field("len", &self.len)
            .field("consumed", &self.consumed)
            .finish()
    }
}
