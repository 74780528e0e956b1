//! Wall-clock source for hosts.
//!
//! Engine operations take `now` explicitly. Hosts read it from a [`Clock`];
//! the offset it carries decides which calendar date "today" is.

use std::cell::Cell;

use chrono::{DateTime, Duration, FixedOffset, Local};

pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The machine's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A manually driven clock.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_advances() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let clock = FixedClock::new(tz.with_ymd_and_hms(2026, 3, 1, 23, 50, 0).unwrap());
        clock.advance(Duration::minutes(20));
        let now = clock.now();
        assert_eq!(now.date_naive().to_string(), "2026-03-02");
        assert_eq!(now.offset(), &tz);
    }
}
