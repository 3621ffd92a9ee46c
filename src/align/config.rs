//! Aligner configuration.

use crate::error::{Error, Result};

/// Configuration for an [`OffsetAligner`](super::OffsetAligner).
///
/// The gate thresholds are empirical; the defaults are the values the
/// aligner has always shipped with.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignConfig {
    /// All streams come from one receiver sharing one sample clock.
    ///
    /// Enables the residual gate: skews must be close to whole samples.
    pub same_kiwi: bool,
    /// Largest accepted offset, as a multiple of the reference sample rate.
    pub max_offset_rate_multiple: f64,
    /// Largest accepted distance (in samples) between a skew and its
    /// rounded value when `same_kiwi` is set.
    pub max_residual_samples: f64,
    /// Per-stream bound on queued time tags; the oldest is dropped beyond it.
    pub max_queued_tags: usize,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            same_kiwi: true,
            max_offset_rate_multiple: 5.0,
            max_residual_samples: 0.2,
            max_queued_tags: 1024,
        }
    }
}

impl AlignConfig {
    /// Default configuration with the given `same_kiwi` flag.
    pub fn new(same_kiwi: bool) -> Self {
        Self {
            same_kiwi,
            ..Default::default()
        }
    }

    /// Set the shared-clock flag.
    pub fn with_same_kiwi(mut self, same_kiwi: bool) -> Self {
        self.same_kiwi = same_kiwi;
        self
    }

    /// Set the offset magnitude bound (multiple of the reference rate).
    pub fn with_max_offset_rate_multiple(mut self, multiple: f64) -> Self {
        self.max_offset_rate_multiple = multiple;
        self
    }

    /// Set the residual bound in samples.
    pub fn with_max_residual_samples(mut self, residual: f64) -> Self {
        self.max_residual_samples = residual;
        self
    }

    /// Set the per-stream tag queue bound.
    pub fn with_max_queued_tags(mut self, max: usize) -> Self {
        self.max_queued_tags = max;
        self
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.max_offset_rate_multiple.is_finite() && self.max_offset_rate_multiple > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_offset_rate_multiple must be finite and positive, got {}",
                self.max_offset_rate_multiple
            )));
        }
        if !(self.max_residual_samples.is_finite() && self.max_residual_samples > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_residual_samples must be finite and positive, got {}",
                self.max_residual_samples
            )));
        }
        if self.max_queued_tags == 0 {
            return Err(Error::InvalidConfig(
                "max_queued_tags must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = AlignConfig::default();
        assert!(config.same_kiwi);
        assert_eq!(config.max_offset_rate_multiple, 5.0);
        assert_eq!(config.max_residual_samples, 0.2);
        assert_eq!(config.max_queued_tags, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AlignConfig::new(false)
            .with_max_offset_rate_multiple(2.0)
            .with_max_residual_samples(0.1)
            .with_max_queued_tags(16);

        assert!(!config.same_kiwi);
        assert_eq!(config.max_offset_rate_multiple, 2.0);
        assert_eq!(config.max_residual_samples, 0.1);
        assert_eq!(config.max_queued_tags, 16);
        assert!(config.with_same_kiwi(true).same_kiwi);
    }

    #[test]
    fn test_config_validate_rejects_bad_thresholds() {
        assert!(
            AlignConfig::default()
                .with_max_offset_rate_multiple(0.0)
                .validate()
                .is_err()
        );
        assert!(
            AlignConfig::default()
                .with_max_residual_samples(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(
            AlignConfig::default()
                .with_max_queued_tags(0)
                .validate()
                .is_err()
        );
    }
}
