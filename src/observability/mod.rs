//! Observability features: metrics and tracing.
//!
//! - **Metrics**: Counters via `metrics-rs`
//! - **Tracing**: Structured logging and spans via `tracing`
//!
//! ## Metrics
//!
//! | Metric | Type | Description |
//! |--------|------|-------------|
//! | `align_rounds_total` | Counter | Correction rounds evaluated |
//! | `align_rounds_rejected` | Counter | Rounds rejected by the gate (label `reason`: `non_finite`, `magnitude`, `residual`) |
//! | `align_corrections_applied` | Counter | Rounds that trimmed samples |
//! | `align_samples_discarded` | Counter | Samples trimmed from stream heads (label `stream`) |
//! | `align_rate_announcements` | Counter | Rate vectors published on the `fs` port |
//! | `align_samples_passed` | Counter | Samples passed through per stream |
//!
//! No exporter is installed here; attach one (prometheus, statsd, ...) in
//! the application.

mod metrics;
mod tracing_support;

pub use metrics::{
    init_metrics, record_correction_applied, record_rate_announcement, record_round,
    record_round_rejected, record_samples_discarded, record_samples_passed,
};
pub use tracing_support::{instrument_block, span_block};
