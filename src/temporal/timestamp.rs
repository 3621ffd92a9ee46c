//! Fixed-point GNSS time.

use std::fmt;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// An absolute GNSS time: whole seconds plus nanoseconds.
///
/// Ordering compares seconds first, then nanoseconds. The nanosecond
/// field is always normalised into `[0, 1e9)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct GnssTime {
    secs: u64,
    nanos: u32,
}

impl GnssTime {
    /// Create a time from seconds and nanoseconds, carrying excess nanoseconds.
    pub const fn new(secs: u64, nanos: u32) -> Self {
        let carry = nanos as u64 / NANOS_PER_SEC;
        Self {
            secs: secs + carry,
            nanos: (nanos as u64 % NANOS_PER_SEC) as u32,
        }
    }

    /// Create a time from whole seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self { secs, nanos: 0 }
    }

    /// Build a time from the `(integer seconds, fractional seconds)` pair
    /// receivers attach to `rx_time` tags.
    ///
    /// The fractional part is rounded to the nearest nanosecond. Values
    /// outside `[0, 1)` are folded into the seconds field. Returns `None`
    /// for a non-finite fraction or a result before the epoch.
    pub fn from_secs_frac(secs: u64, frac: f64) -> Option<Self> {
        if !frac.is_finite() {
            return None;
        }
        let frac_nanos = (frac * NANOS_PER_SEC as f64).round();
        let total = secs as i128 * NANOS_PER_SEC as i128 + frac_nanos as i128;
        Self::from_total_nanos(total)
    }

    /// Build a time from floating-point seconds.
    ///
    /// Convenient for small epochs; precision is that of `f64`.
    pub fn from_secs_f64(secs: f64) -> Option<Self> {
        if !secs.is_finite() || secs < 0.0 {
            return None;
        }
        let whole = secs.floor();
        Self::from_secs_frac(whole as u64, secs - whole)
    }

    fn from_total_nanos(total: i128) -> Option<Self> {
        if total < 0 {
            return None;
        }
        let secs = u64::try_from(total / NANOS_PER_SEC as i128).ok()?;
        let nanos = (total % NANOS_PER_SEC as i128) as u32;
        Some(Self { secs, nanos })
    }

    /// Whole seconds.
    pub const fn secs(&self) -> u64 {
        self.secs
    }

    /// Nanoseconds past the whole second.
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Total nanoseconds since the epoch.
    pub const fn as_nanos(&self) -> u128 {
        self.secs as u128 * NANOS_PER_SEC as u128 + self.nanos as u128
    }

    /// Time in seconds as `f64` (lossy for large epochs).
    pub fn as_secs_f64(&self) -> f64 {
        self.secs as f64 + self.nanos as f64 / NANOS_PER_SEC as f64
    }

    /// Signed nanoseconds from `earlier` to `self`.
    pub fn nanos_since(&self, earlier: &Self) -> i128 {
        self.as_nanos() as i128 - earlier.as_nanos() as i128
    }

    /// Signed seconds from `earlier` to `self`.
    ///
    /// The difference is formed exactly before the conversion to `f64`.
    pub fn secs_since(&self, earlier: &Self) -> f64 {
        self.nanos_since(earlier) as f64 / NANOS_PER_SEC as f64
    }

    /// Shift the time by a signed number of nanoseconds.
    pub fn checked_add_nanos(&self, nanos: i128) -> Option<Self> {
        Self::from_total_nanos(self.as_nanos() as i128 + nanos)
    }
}

impl fmt::Display for GnssTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}s", self.secs, self.nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_carries_nanos() {
        let t = GnssTime::new(10, 1_500_000_000);
        assert_eq!(t.secs(), 11);
        assert_eq!(t.subsec_nanos(), 500_000_000);
    }

    #[test]
    fn test_from_secs_frac_rounds_to_nanos() {
        let t = GnssTime::from_secs_frac(100, 0.000_050_000_4).unwrap();
        assert_eq!(t, GnssTime::new(100, 50_000));

        let carried = GnssTime::from_secs_frac(7, 1.25).unwrap();
        assert_eq!(carried, GnssTime::new(8, 250_000_000));

        let borrowed = GnssTime::from_secs_frac(7, -0.5).unwrap();
        assert_eq!(borrowed, GnssTime::new(6, 500_000_000));
    }

    #[test]
    fn test_from_secs_frac_rejects_invalid() {
        assert!(GnssTime::from_secs_frac(1, f64::NAN).is_none());
        assert!(GnssTime::from_secs_frac(0, -0.5).is_none());
        assert!(GnssTime::from_secs_f64(-1.0).is_none());
    }

    #[test]
    fn test_difference_keeps_precision_at_large_epoch() {
        // 2^40 seconds: an f64 of the absolute time has only ~0.1ms resolution
        let base = GnssTime::new(1 << 40, 0);
        let later = GnssTime::new(1 << 40, 50_000);

        assert_eq!(later.nanos_since(&base), 50_000);
        assert!((later.secs_since(&base) - 50e-6).abs() < 1e-15);
        assert!((base.secs_since(&later) + 50e-6).abs() < 1e-15);
    }

    #[test]
    fn test_ordering() {
        let a = GnssTime::new(5, 999_999_999);
        let b = GnssTime::new(6, 0);
        assert!(a < b);
        assert_eq!(b.checked_add_nanos(-1), Some(a));
    }

    #[test]
    fn test_display() {
        assert_eq!(GnssTime::new(100, 50_000).to_string(), "100.000050000s");
    }
}
