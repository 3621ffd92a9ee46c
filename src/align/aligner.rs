//! The Offset Aligner block.

use super::config::AlignConfig;
use super::correction::{Candidate, StreamHead};
use super::phase::{AlignPhase, RoundOutcome};
use super::stream::StreamState;
use crate::block::{SyncBlock, WorkContext, WorkStatus};
use crate::error::{Error, Result};
use crate::event::{MessagePort, RATE_PORT, RateAnnouncement};
use crate::observability::{
    init_metrics, instrument_block, record_correction_applied, record_rate_announcement,
    record_round, record_round_rejected, record_samples_discarded, record_samples_passed,
};
use crate::temporal::{TagQueue, TimeTag};
use smallvec::SmallVec;

/// Counters for one run of an aligner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignStats {
    /// Correction rounds evaluated.
    pub rounds: u64,
    /// Rounds rejected by the gate.
    pub rejected: u64,
    /// Rounds that trimmed samples.
    pub corrections: u64,
    /// Samples passed through, per stream.
    pub samples_passed: u64,
}

/// What the correction loop decided for one batch.
enum Correction {
    /// Discard these many samples from each stream's head.
    Trim(SmallVec<[u64; 4]>),
    /// Pass the batch through.
    Pass,
}

/// Aligns N sample streams by trimming each stream's head.
///
/// Streams share a clock but start at unknown integer sample offsets from
/// each other. The aligner learns each stream's rate from `rx_rate` tags,
/// pairs the `rx_time` tags of all streams one round at a time, and when a
/// round yields a plausible offset vector it discards leading samples so
/// that index `k` of every output stream refers to the same instant.
///
/// # Example
///
/// ```rust
/// use align_streams::align::{AlignPhase, OffsetAligner};
/// use align_streams::block::SyncBlock;
///
/// let mut aligner = OffsetAligner::new(2, true).unwrap();
/// let rates = aligner.subscribe();
/// aligner.start().unwrap();
///
/// assert_eq!(aligner.phase(), AlignPhase::Learning);
/// assert_eq!(aligner.delays(), vec![0, 0]);
/// assert!(rates.try_recv().unwrap().is_none());
/// ```
pub struct OffsetAligner {
    name: String,
    config: AlignConfig,
    streams: Vec<StreamState>,
    phase: AlignPhase,
    rate_port: MessagePort<RateAnnouncement>,
    last_announced: Option<Vec<f64>>,
    stats: AlignStats,
}

impl OffsetAligner {
    /// Create an aligner for `num_streams` streams with default thresholds.
    pub fn new(num_streams: usize, same_kiwi: bool) -> Result<Self> {
        Self::with_config(num_streams, AlignConfig::new(same_kiwi))
    }

    /// Create an aligner with a custom configuration.
    pub fn with_config(num_streams: usize, config: AlignConfig) -> Result<Self> {
        if num_streams == 0 {
            return Err(Error::InvalidStreamCount(num_streams));
        }
        config.validate()?;
        init_metrics();

        Ok(Self {
            name: "offset-aligner".to_string(),
            streams: (0..num_streams)
                .map(|_| StreamState::new(config.max_queued_tags))
                .collect(),
            config,
            phase: AlignPhase::Learning,
            rate_port: MessagePort::new(RATE_PORT),
            last_announced: None,
            stats: AlignStats::default(),
        })
    }

    /// Set a custom name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Subscribe to rate-vector announcements on the `fs` port.
    ///
    /// A vector is published when every rate is known and the vector
    /// differs from the one last published in this run. Rate tags seen
    /// again after a trim do not repeat an announcement.
    pub fn subscribe(&mut self) -> kanal::Receiver<RateAnnouncement> {
        self.rate_port.subscribe()
    }

    /// Number of streams.
    pub fn num_streams(&self) -> usize {
        self.streams.len()
    }

    /// The configuration.
    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> AlignPhase {
        self.phase
    }

    /// Known sample rate of each stream.
    pub fn rates(&self) -> Vec<Option<f64>> {
        self.streams.iter().map(StreamState::rate).collect()
    }

    /// Samples discarded from each stream since start.
    pub fn delays(&self) -> Vec<u64> {
        self.streams.iter().map(StreamState::delay).collect()
    }

    /// Time tags queued for stream `i`, or `None` if `i` is out of range.
    pub fn queued_tags(&self, i: usize) -> Option<&TagQueue> {
        self.streams.get(i).map(StreamState::tags)
    }

    /// Counters for the current run.
    pub fn stats(&self) -> AlignStats {
        self.stats
    }

    /// Learn rates from this batch's `rx_rate` tags and announce the rate
    /// vector when every rate is known and it changed.
    fn learn_rates(&mut self, ctx: &WorkContext<'_>) {
        let mut updated = false;
        for (i, stream) in self.streams.iter_mut().enumerate() {
            updated |= stream.learn_rate(ctx.tags(i).iter().filter_map(|t| t.rate()));
        }
        if !updated {
            return;
        }

        let rates: Option<Vec<f64>> = self.streams.iter().map(StreamState::rate).collect();
        let Some(rates) = rates else {
            return;
        };
        if self.last_announced.as_ref() == Some(&rates) {
            tracing::trace!(block = %self.name, ?rates, "sample rates unchanged");
            return;
        }
        tracing::debug!(block = %self.name, ?rates, "announcing sample rates");
        self.rate_port.publish(RateAnnouncement::new(rates.clone()));
        self.last_announced = Some(rates);
        record_rate_announcement(&self.name);
    }

    /// Queue this batch's `rx_time` tags.
    fn collect_time_tags(&mut self, ctx: &WorkContext<'_>) {
        for (i, stream) in self.streams.iter_mut().enumerate() {
            for tag in ctx.tags(i) {
                if !tag.is_rx_time() {
                    continue;
                }
                let Some(time) = tag.time() else {
                    tracing::warn!(block = %self.name, stream = i, value = ?tag.value, "ignoring undecodable rx_time tag");
                    continue;
                };
                if let Some(evicted) = stream.push_tag(TimeTag::new(tag.offset, time)) {
                    tracing::warn!(
                        block = %self.name,
                        stream = i,
                        offset = evicted.offset,
                        "time tag queue full, dropping oldest tag"
                    );
                }
            }
        }
    }

    /// Heads of all streams, or `None` while some rate is unknown.
    fn heads(&self) -> Option<SmallVec<[StreamHead; 4]>> {
        self.streams
            .iter()
            .map(|s| {
                Some(StreamHead {
                    tag: *s.tags().front()?,
                    rate: s.rate()?,
                    delay: s.delay(),
                })
            })
            .collect()
    }

    /// Run correction rounds while every stream has a queued time tag.
    fn correct(&mut self) -> (Correction, RoundOutcome) {
        let mut outcome = RoundOutcome::AwaitingTags;

        while self.streams.iter().all(|s| !s.tags().is_empty()) {
            // An unknown rate defers the round; tags stay queued until it is known
            let Some(heads) = self.heads() else {
                outcome = outcome.max(RoundOutcome::AwaitingRates);
                break;
            };
            for stream in &mut self.streams {
                stream.tags_mut().pop_front();
            }

            self.stats.rounds += 1;
            record_round(&self.name);

            let candidate = Candidate::from_heads(&heads);
            tracing::debug!(
                block = %self.name,
                skews = ?candidate.skews(),
                offsets = ?candidate.offsets(),
                "computed stream offsets"
            );

            let verdict = candidate.gate(heads[0].rate, &self.config);
            if let Some(reason) = verdict.reason() {
                self.stats.rejected += 1;
                record_round_rejected(&self.name, reason);
                tracing::warn!(
                    block = %self.name,
                    reason,
                    offsets = ?candidate.offsets(),
                    skews = ?candidate.skews(),
                    rates = ?heads.iter().map(|h| h.rate).collect::<Vec<_>>(),
                    "rejected offset candidate"
                );
                outcome = outcome.max(RoundOutcome::Rejected);
                continue;
            }

            let trims = candidate.trims();
            if trims.iter().all(|&t| t == 0) {
                outcome = outcome.max(RoundOutcome::Converged);
                continue;
            }
            return (Correction::Trim(trims), RoundOutcome::Trimmed);
        }

        (Correction::Pass, outcome)
    }

    /// Discard leading samples and start a fresh tag baseline.
    fn apply_trims(&mut self, ctx: &mut WorkContext<'_>, trims: &[u64]) -> Result<()> {
        let available = ctx.len() as u64;
        for (i, (stream, &trim)) in self.streams.iter_mut().zip(trims).enumerate() {
            let n = trim.min(available);
            if n > 0 {
                ctx.consume(i, n as usize)?;
                stream.add_delay(n);
                record_samples_discarded(&self.name, i, n);
            }
            stream.tags_mut().clear();
        }

        self.stats.corrections += 1;
        record_correction_applied(&self.name);
        tracing::info!(
            block = %self.name,
            consumed = ?ctx.consumed_all(),
            delays = ?self.delays(),
            "trimmed stream heads"
        );
        Ok(())
    }

    /// Copy every input chunk to its output.
    fn pass_through(&mut self, ctx: &mut WorkContext<'_>) -> WorkStatus {
        for i in 0..ctx.num_streams() {
            let input = ctx.input(i);
            ctx.output_mut(i).copy_from_slice(input);
        }
        let n = ctx.len();
        self.stats.samples_passed += n as u64;
        record_samples_passed(&self.name, n as u64);
        tracing::trace!(block = %self.name, samples = n, "pass-through");
        WorkStatus::Produced(n)
    }
}

impl SyncBlock for OffsetAligner {
    fn start(&mut self) -> Result<()> {
        for stream in &mut self.streams {
            stream.reset();
        }
        self.phase = AlignPhase::Learning;
        self.last_announced = None;
        self.stats = AlignStats::default();
        tracing::debug!(block = %self.name, streams = self.streams.len(), "aligner started");
        Ok(())
    }

    fn work(&mut self, ctx: &mut WorkContext<'_>) -> Result<WorkStatus> {
        if ctx.num_streams() != self.streams.len() {
            return Err(Error::StreamCountMismatch {
                expected: self.streams.len(),
                actual: ctx.num_streams(),
            });
        }
        let _span = instrument_block(&self.name);

        self.learn_rates(ctx);
        self.collect_time_tags(ctx);

        let (correction, outcome) = self.correct();
        self.phase = self.phase.transition(outcome);

        match correction {
            Correction::Trim(trims) => {
                self.apply_trims(ctx, &trims)?;
                Ok(WorkStatus::Consumed)
            }
            Correction::Pass => Ok(self.pass_through(ctx)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn num_inputs(&self) -> usize {
        self.streams.len()
    }

    fn num_outputs(&self) -> usize {
        self.streams.len()
    }
}

impl std::fmt::Debug for OffsetAligner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffsetAligner")
            .field("name", &self.name)
            .field("streams", &self.streams.len())
            .field("phase", &self.phase)
            .field("delays", &self.delays())
            .finish()
    }
}
