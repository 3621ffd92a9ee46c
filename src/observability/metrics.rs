//! Metrics collection using metrics-rs.

use metrics::{Unit, counter};
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether metrics have been initialized.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

const ROUNDS_TOTAL: &str = "align_rounds_total";
const ROUNDS_REJECTED: &str = "align_rounds_rejected";
const CORRECTIONS_APPLIED: &str = "align_corrections_applied";
const SAMPLES_DISCARDED: &str = "align_samples_discarded";
const RATE_ANNOUNCEMENTS: &str = "align_rate_announcements";
const SAMPLES_PASSED: &str = "align_samples_passed";

/// Initialize metrics descriptions.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    metrics::describe_counter!(
        ROUNDS_TOTAL,
        Unit::Count,
        "Correction rounds evaluated"
    );
    metrics::describe_counter!(
        ROUNDS_REJECTED,
        Unit::Count,
        "Correction rounds rejected by the sanity gate"
    );
    metrics::describe_counter!(
        CORRECTIONS_APPLIED,
        Unit::Count,
        "Correction rounds that trimmed samples"
    );
    metrics::describe_counter!(
        SAMPLES_DISCARDED,
        Unit::Count,
        "Samples discarded from stream heads"
    );
    metrics::describe_counter!(
        RATE_ANNOUNCEMENTS,
        Unit::Count,
        "Sample-rate vectors published"
    );
    metrics::describe_counter!(
        SAMPLES_PASSED,
        Unit::Count,
        "Samples passed through per stream"
    );
}

/// Record an evaluated correction round.
#[inline]
pub fn record_round(block: &str) {
    counter!(ROUNDS_TOTAL, "block" => block.to_string()).increment(1);
}

/// Record a round rejected by the gate.
#[inline]
pub fn record_round_rejected(block: &str, reason: &'static str) {
    counter!(ROUNDS_REJECTED, "block" => block.to_string(), "reason" => reason).increment(1);
}

/// Record a round that trimmed samples.
#[inline]
pub fn record_correction_applied(block: &str) {
    counter!(CORRECTIONS_APPLIED, "block" => block.to_string()).increment(1);
}

/// Record samples discarded from one stream.
#[inline]
pub fn record_samples_discarded(block: &str, stream: usize, samples: u64) {
    counter!(
        SAMPLES_DISCARDED,
        "block" => block.to_string(),
        "stream" => stream.to_string()
    )
    .increment(samples);
}

/// Record a published rate vector.
#[inline]
pub fn record_rate_announcement(block: &str) {
    counter!(RATE_ANNOUNCEMENTS, "block" => block.to_string()).increment(1);
}

/// Record a pass-through batch.
#[inline]
pub fn record_samples_passed(block: &str, samples: u64) {
    counter!(SAMPLES_PASSED, "block" => block.to_string()).increment(samples);
}
