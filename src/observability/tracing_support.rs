//! Tracing integration for structured logging and spans.

use tracing::{Level, Span, span};

/// Create a span for one block invocation.
///
/// # Example
///
/// ```rust
/// use align_streams::observability::span_block;
///
/// let span = span_block("align");
/// let _guard = span.enter();
/// // Block work here...
/// ```
#[inline]
pub fn span_block(name: &str) -> Span {
    span!(Level::DEBUG, "block", name = %name)
}

/// Enter a block span and return the guard.
pub fn instrument_block(name: &str) -> tracing::span::EnteredSpan {
    span_block(name).entered()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_block_without_subscriber() {
        let _guard = instrument_block("align");
        tracing::debug!("inside block span");
    }
}
