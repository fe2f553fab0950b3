//! Injectable time source.
//!
//! Services read time through a [`Clock`] handle passed in from the caller,
//! so expiry and state-transition logic is deterministic under test.

use chrono::{DateTime, Utc};

/// A time source: the system clock in production, a fixed instant in tests.
#[derive(Debug, Clone, Default)]
pub struct Clock(Option<DateTime<Utc>>);

impl Clock {
    /// The real system clock.
    pub fn system() -> Self {
        Self(None)
    }

    /// A clock frozen at the given instant.
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self(Some(at))
    }

    /// Current instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.0.unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_is_frozen() {
        let at = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let clock = Clock::fixed(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), at);
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = Clock::system();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
