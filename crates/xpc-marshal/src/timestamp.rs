use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Nanoseconds per second; the scale of the foreign timestamp integer.
pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Two timestamps closer than this many seconds are equivalent.
pub const EQUIVALENCE_EPSILON_SECS: f64 = 1e-6;

/// An instant, stored as floating seconds since the Unix epoch.
///
/// The foreign side carries timestamps as a signed 64-bit nanosecond count.
/// Converting through `f64` loses sub-nanosecond precision at large
/// magnitudes, which is why timestamp equivalence uses
/// [`EQUIVALENCE_EPSILON_SECS`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Timestamp {
    secs: f64,
}

impl Timestamp {
    pub const UNIX_EPOCH: Timestamp = Timestamp { secs: 0.0 };

    pub fn from_secs_f64(secs: f64) -> Self {
        Self { secs }
    }

    /// Rebuilds an instant from a foreign nanosecond count.
    pub fn from_nanos(nanos: i64) -> Self {
        Self {
            secs: nanos as f64 / NANOS_PER_SEC as f64,
        }
    }

    pub fn now() -> Self {
        SystemTime::now().into()
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.secs
    }

    /// Seconds × 10⁹, truncated toward zero.
    ///
    /// Out-of-range instants saturate to `i64::MIN`/`i64::MAX`, and a NaN
    /// instant maps to `0`, the epoch. Callers that must not send the epoch
    /// for an undefined instant should check [`Timestamp::is_finite`] first.
    pub fn as_nanos(&self) -> i64 {
        (self.secs * NANOS_PER_SEC as f64) as i64
    }

    pub fn is_finite(&self) -> bool {
        self.secs.is_finite()
    }

    /// Absolute distance to `other` in seconds.
    pub fn distance(&self, other: &Timestamp) -> f64 {
        (self.secs - other.secs).abs()
    }

    /// Returns `None` when the instant is not representable as a `SystemTime`.
    pub fn to_system_time(&self) -> Option<SystemTime> {
        let magnitude = Duration::try_from_secs_f64(self.secs.abs()).ok()?;
        if self.secs >= 0.0 {
            UNIX_EPOCH.checked_add(magnitude)
        } else {
            UNIX_EPOCH.checked_sub(magnitude)
        }
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        let secs = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_secs_f64(),
            Err(before) => -before.duration().as_secs_f64(),
        };
        Self { secs }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nanos_truncate_toward_zero() {
        assert_eq!(Timestamp::from_secs_f64(1.5).as_nanos(), 1_500_000_000);
        assert_eq!(Timestamp::from_secs_f64(-10.0).as_nanos(), -10_000_000_000);
        assert_eq!(Timestamp::from_secs_f64(1e-10).as_nanos(), 0);
    }

    #[test]
    fn nanos_saturate_out_of_range() {
        assert_eq!(Timestamp::from_secs_f64(1e30).as_nanos(), i64::MAX);
        assert_eq!(Timestamp::from_secs_f64(-1e30).as_nanos(), i64::MIN);
    }

    #[test]
    fn nan_maps_to_the_epoch() {
        let nan = Timestamp::from_secs_f64(f64::NAN);
        assert!(!nan.is_finite());
        assert_eq!(nan.as_nanos(), 0);
        assert!(Timestamp::from_secs_f64(-10.0).is_finite());
    }

    #[test]
    fn from_nanos_inverts_as_nanos_within_epsilon() {
        for secs in [0.0, 20.0, -10_000.0, 2_000_000_000.0, 1_700_000_000.123_456] {
            let ts = Timestamp::from_secs_f64(secs);
            let back = Timestamp::from_nanos(ts.as_nanos());
            assert!(ts.distance(&back) < EQUIVALENCE_EPSILON_SECS, "{secs}");
        }
    }

    #[test]
    fn system_time_before_epoch() {
        let before = UNIX_EPOCH - Duration::from_secs(10);
        let ts = Timestamp::from(before);
        assert_eq!(ts.as_secs_f64(), -10.0);
        assert_eq!(ts.to_system_time(), Some(before));
    }

    #[test]
    fn non_finite_has_no_system_time() {
        assert_eq!(Timestamp::from_secs_f64(f64::NAN).to_system_time(), None);
        assert_eq!(Timestamp::from_secs_f64(f64::INFINITY).to_system_time(), None);
    }
}
