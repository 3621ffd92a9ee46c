//! Offset computation and the sanity gate.
//!
//! One correction round takes the earliest queued time tag of every stream
//! and computes, for each stream `i`, how many samples it runs ahead of
//! stream 0:
//!
//! ```text
//! skew_i = [ (t_i - t_0) - ((n_i - D_i)/fs_i - (n_0 - D_0)/fs_0) ] * fs_i
//! ```
//!
//! where `n` is the tag's absolute sample index and `D` the samples already
//! discarded from that stream. Folding `D` in makes repeated rounds measure
//! only the skew that remains after earlier trims.

use super::config::AlignConfig;
use crate::temporal::TimeTag;
use smallvec::SmallVec;

/// Inputs of one stream to a correction round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamHead {
    /// Earliest queued time tag.
    pub tag: TimeTag,
    /// Known sample rate (> 0).
    pub rate: f64,
    /// Samples already discarded from the head.
    pub delay: u64,
}

impl StreamHead {
    /// Seconds of stream time elapsed at the tag, net of discarded samples.
    fn elapsed_secs(&self) -> f64 {
        (self.tag.offset as i128 - self.delay as i128) as f64 / self.rate
    }
}

/// Skew of `other` relative to `reference`, in samples of `other`.
///
/// Positive means `other` is ahead: its samples carry later times than the
/// reference's samples at the same index.
pub fn sample_skew(reference: &StreamHead, other: &StreamHead) -> f64 {
    let time_diff = other.tag.time.secs_since(&reference.tag.time);
    (time_diff - (other.elapsed_secs() - reference.elapsed_secs())) * other.rate
}

/// Result of checking a candidate against the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateVerdict {
    /// Both checks passed.
    Accept,
    /// Some skew is NaN or infinite, so no offset was measured.
    RejectNonFinite,
    /// The largest offset is implausibly large.
    RejectMagnitude,
    /// Some skew is too far from a whole number of samples.
    RejectResidual,
}

impl GateVerdict {
    /// Whether the candidate may be applied.
    pub fn is_accepted(&self) -> bool {
        matches!(self, GateVerdict::Accept)
    }

    /// Short rejection reason, for logs and metric labels.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            GateVerdict::Accept => None,
            GateVerdict::RejectNonFinite => Some("non_finite"),
            GateVerdict::RejectMagnitude => Some("magnitude"),
            GateVerdict::RejectResidual => Some("residual"),
        }
    }
}

/// A candidate integer offset vector from one correction round.
///
/// Stream 0 is the reference: its skew and offset are always zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    skews: SmallVec<[f64; 4]>,
    offsets: SmallVec<[i64; 4]>,
}

impl Candidate {
    /// Compute the candidate from every stream's head.
    ///
    /// # Panics
    ///
    /// Panics if `heads` is empty.
    pub fn from_heads(heads: &[StreamHead]) -> Self {
        let reference = &heads[0];
        let skews: SmallVec<[f64; 4]> = heads
            .iter()
            .enumerate()
            .map(|(i, head)| {
                if i == 0 {
                    0.0
                } else {
                    sample_skew(reference, head)
                }
            })
            .collect();
        // Ties go to even, matching numpy-style rounding
        let offsets = skews.iter().map(|s| s.round_ties_even() as i64).collect();
        Self { skews, offsets }
    }

    /// Fractional skew of each stream, in samples.
    pub fn skews(&self) -> &[f64] {
        &self.skews
    }

    /// Rounded skew of each stream, in samples.
    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    /// Largest offset magnitude.
    pub fn max_abs_offset(&self) -> u64 {
        self.offsets
            .iter()
            .map(|o| o.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Largest distance between a non-reference skew and its offset.
    pub fn max_residual(&self) -> f64 {
        self.skews
            .iter()
            .zip(&self.offsets)
            .skip(1)
            .map(|(s, o)| (*o as f64 - s).abs())
            .fold(0.0, f64::max)
    }

    /// Check the candidate against the gate.
    ///
    /// `reference_rate` is the sample rate of stream 0.
    pub fn gate(&self, reference_rate: f64, config: &AlignConfig) -> GateVerdict {
        if !self.skews.iter().all(|s| s.is_finite()) {
            return GateVerdict::RejectNonFinite;
        }
        if self.max_abs_offset() as f64 >= config.max_offset_rate_multiple * reference_rate {
            return GateVerdict::RejectMagnitude;
        }
        if config.same_kiwi && self.max_residual() >= config.max_residual_samples {
            return GateVerdict::RejectResidual;
        }
        GateVerdict::Accept
    }

    /// Samples to discard from each stream's head.
    ///
    /// The offsets are shifted so the stream furthest ahead loses nothing
    /// and every other stream drops its lead on it.
    pub fn trims(&self) -> SmallVec<[u64; 4]> {
        let max = self.offsets.iter().copied().max().unwrap_or(0);
        self.offsets
            .iter()
            .map(|o| (max as i128 - *o as i128) as u64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::GnssTime;

    const FS: f64 = 1_000_000.0;

    fn head(offset: u64, secs: u64, nanos: u32, delay: u64) -> StreamHead {
        StreamHead {
            tag: TimeTag::new(offset, GnssTime::new(secs, nanos)),
            rate: FS,
            delay,
        }
    }

    #[test]
    fn test_stream_ahead_by_50_samples() {
        let heads = [head(0, 100, 0, 0), head(0, 100, 50_000, 0)];
        let candidate = Candidate::from_heads(&heads);

        assert!((candidate.skews()[1] - 50.0).abs() < 1e-6);
        assert_eq!(candidate.offsets(), &[0, 50]);
        assert_eq!(
            candidate.gate(FS, &AlignConfig::default()),
            GateVerdict::Accept
        );
        assert_eq!(candidate.trims().as_slice(), &[50, 0]);
    }

    #[test]
    fn test_delay_folds_into_skew() {
        // Stream 0 already dropped 50 samples; later tags agree
        let heads = [head(1_000, 100, 1_000_000, 50), head(950, 100, 1_000_000, 0)];
        let candidate = Candidate::from_heads(&heads);

        assert!(candidate.skews()[1].abs() < 1e-6);
        assert_eq!(candidate.trims().as_slice(), &[0, 0]);
    }

    #[test]
    fn test_stream_behind() {
        let heads = [head(0, 100, 30_000, 0), head(0, 100, 0, 0)];
        let candidate = Candidate::from_heads(&heads);

        assert_eq!(candidate.offsets(), &[0, -30]);
        assert_eq!(candidate.trims().as_slice(), &[0, 30]);
    }

    #[test]
    fn test_three_streams() {
        let heads = [
            head(0, 100, 0, 0),
            head(0, 100, 20_000, 0),
            head(0, 99, 999_990_000, 0),
        ];
        let candidate = Candidate::from_heads(&heads);

        assert_eq!(candidate.offsets(), &[0, 20, -10]);
        assert_eq!(candidate.trims().as_slice(), &[20, 0, 30]);
    }

    #[test]
    fn test_single_stream_is_trivially_aligned() {
        let candidate = Candidate::from_heads(&[head(7, 3, 0, 0)]);
        assert_eq!(candidate.offsets(), &[0]);
        assert_eq!(candidate.max_residual(), 0.0);
        assert!(
            candidate
                .gate(FS, &AlignConfig::default())
                .is_accepted()
        );
        assert_eq!(candidate.trims().as_slice(), &[0]);
    }

    #[test]
    fn test_gate_rejects_huge_offset() {
        // 10 seconds off: 1e7 samples, bound is 5 * fs = 5e6
        let heads = [head(0, 100, 0, 0), head(0, 110, 0, 0)];
        let candidate = Candidate::from_heads(&heads);

        let verdict = candidate.gate(FS, &AlignConfig::default());
        assert_eq!(verdict, GateVerdict::RejectMagnitude);
        assert_eq!(verdict.reason(), Some("magnitude"));

        // The magnitude check applies regardless of the shared-clock flag
        assert_eq!(
            candidate.gate(FS, &AlignConfig::new(false)),
            GateVerdict::RejectMagnitude
        );
    }

    #[test]
    fn test_gate_residual_depends_on_same_kiwi() {
        // Half a sample of skew
        let heads = [head(0, 100, 0, 0), head(0, 100, 500, 0)];
        let candidate = Candidate::from_heads(&heads);

        assert!((candidate.max_residual() - 0.5).abs() < 1e-6);
        assert_eq!(
            candidate.gate(FS, &AlignConfig::new(true)),
            GateVerdict::RejectResidual
        );
        assert_eq!(
            candidate.gate(FS, &AlignConfig::new(false)),
            GateVerdict::Accept
        );
    }

    #[test]
    fn test_gate_accepts_small_residual() {
        // 50.1 samples
        let heads = [head(0, 100, 0, 0), head(0, 100, 50_100, 0)];
        let candidate = Candidate::from_heads(&heads);

        assert_eq!(candidate.offsets(), &[0, 50]);
        assert!(
            candidate
                .gate(FS, &AlignConfig::new(true))
                .is_accepted()
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let heads = [head(0, 100, 0, 0), head(0, 100, 50_100, 0)];
        let candidate = Candidate::from_heads(&heads);

        let tight = AlignConfig::default().with_max_residual_samples(0.05);
        assert_eq!(candidate.gate(FS, &tight), GateVerdict::RejectResidual);

        let narrow = AlignConfig::default().with_max_offset_rate_multiple(40.0 / FS);
        assert_eq!(candidate.gate(FS, &narrow), GateVerdict::RejectMagnitude);
    }

    #[test]
    fn test_gate_rejects_non_finite_skew() {
        // A subnormal rate overflows the elapsed-time term to inf - inf
        let reference = StreamHead {
            rate: 5e-324,
            ..head(1, 100, 0, 0)
        };
        let other = StreamHead {
            rate: 5e-324,
            ..head(1, 100, 0, 0)
        };
        let candidate = Candidate::from_heads(&[reference, other]);
        assert!(candidate.skews()[1].is_nan());

        for same_kiwi in [true, false] {
            let verdict = candidate.gate(FS, &AlignConfig::new(same_kiwi));
            assert_eq!(verdict, GateVerdict::RejectNonFinite);
            assert_eq!(verdict.reason(), Some("non_finite"));
            assert!(!verdict.is_accepted());
        }
    }
}
