use chrono::{DateTime, Duration, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Returns true if this clock is fixed.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Whole seconds between two instants, rounded to the nearest second.
///
/// Returns 0 when `until` is not after `since`.
#[must_use]
pub fn elapsed_secs(since: DateTime<Utc>, until: DateTime<Utc>) -> u64 {
    let millis = (until - since).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    u64::try_from((millis + 500) / 1000).unwrap_or(u64::MAX)
}

/// Formats a total duration for history displays.
///
/// Hours are shown only when non-zero; leftover seconds are dropped:
/// `3725` renders as `"1h 2m"`, `45` renders as `"0m"`.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

/// Formats the remaining time of a running quiz as `m:ss`.
#[must_use]
pub fn format_countdown(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_shows_hours_and_minutes() {
        assert_eq!(format_duration(3725), "1h 2m");
        assert_eq!(format_duration(7200), "2h 0m");
    }

    #[test]
    fn duration_below_an_hour_is_minutes_only() {
        assert_eq!(format_duration(45), "0m");
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(3599), "59m");
    }

    #[test]
    fn countdown_pads_seconds() {
        assert_eq!(format_countdown(900), "15:00");
        assert_eq!(format_countdown(65), "1:05");
        assert_eq!(format_countdown(0), "0:00");
    }

    #[test]
    fn elapsed_rounds_to_nearest_second() {
        let start = fixed_now();
        assert_eq!(elapsed_secs(start, start + Duration::milliseconds(1_499)), 1);
        assert_eq!(elapsed_secs(start, start + Duration::milliseconds(1_500)), 2);
        assert_eq!(elapsed_secs(start, start - Duration::seconds(3)), 0);
    }

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        clock.advance(Duration::seconds(30));
        assert_eq!(clock.now(), fixed_now() + Duration::seconds(30));

        let mut real = Clock::default_clock();
        real.advance(Duration::seconds(30));
        assert!(!real.is_fixed());
    }
}
