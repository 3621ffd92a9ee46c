//! Alignment state machine.
//!
//! The aligner moves through three phases:
//!
//! | Phase | Meaning | Left on |
//! |-------|---------|---------|
//! | `Learning` | No accepted correction round yet | `Trimmed`, `Converged` |
//! | `Correcting` | Samples were trimmed, alignment unconfirmed | `Converged` |
//! | `PassThrough` | Last accepted round found nothing to trim | `Trimmed` |
//!
//! Each batch of input yields one [`RoundOutcome`], and
//! [`AlignPhase::transition`] maps the current phase and that outcome to the
//! next phase. Outcomes that carry no new evidence (missing tags, missing
//! rates, a rejected candidate) leave the phase unchanged.

/// Phase of an aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignPhase {
    /// No accepted correction round yet.
    #[default]
    Learning,
    /// Samples were trimmed; waiting for a round to confirm alignment.
    Correcting,
    /// The last accepted round found every stream aligned.
    PassThrough,
}

/// What one batch's correction rounds amounted to.
///
/// Variants are ordered by precedence: when a batch runs several rounds,
/// the batch outcome is the greatest of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RoundOutcome {
    /// Some stream has no queued time tag.
    AwaitingTags,
    /// Every stream has a time tag but some rate is unknown.
    AwaitingRates,
    /// A candidate failed the gate.
    Rejected,
    /// A candidate passed the gate with nothing to trim.
    Converged,
    /// A candidate passed the gate and samples were trimmed.
    Trimmed,
}

impl AlignPhase {
    /// Next phase after a batch with the given outcome.
    pub fn transition(self, outcome: RoundOutcome) -> Self {
        match outcome {
            RoundOutcome::Trimmed => AlignPhase::Correcting,
            RoundOutcome::Converged => AlignPhase::PassThrough,
            RoundOutcome::AwaitingTags | RoundOutcome::AwaitingRates | RoundOutcome::Rejected => {
                self
            }
        }
    }

    /// Whether the streams are believed aligned.
    pub fn is_aligned(&self) -> bool {
        matches!(self, AlignPhase::PassThrough)
    }
}
