//! Manual check-in countdown.
//!
//! Counts down the method's check-in intervals while the parent waits
//! outside the room. Wall-clock based with no internal thread: the caller
//! passes `now` to every command and calls `tick()` periodically. This is
//! local UI state and is never persisted; it is independent of the bedtime
//! prompts raised by the night program engine.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused | Elapsed) -> Running -> ...
//! ```

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Idle,
    Running,
    Paused,
    /// Interval ran out; waiting for the parent to check in and restart.
    Elapsed,
}

#[derive(Debug, Clone)]
pub struct CheckInCountdown {
    intervals: Vec<u32>,
    state: CountdownState,
    index: usize,
    remaining_ms: u64,
    last_tick: Option<DateTime<Utc>>,
    repeat_last: bool,
}

impl CheckInCountdown {
    /// Create a countdown over `intervals` (minutes), starting `Idle` on
    /// the first interval.
    pub fn new(intervals: Vec<u32>, repeat_last: bool) -> Self {
        let remaining_ms = intervals.first().map(|m| minutes_to_ms(*m)).unwrap_or(0);
        Self {
            intervals,
            state: CountdownState::Idle,
            index: 0,
            remaining_ms,
            last_tick: None,
            repeat_last,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn interval_index(&self) -> usize {
        self.index
    }

    pub fn current_interval_min(&self) -> Option<u32> {
        self.intervals.get(self.index).copied()
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Whether the last interval has elapsed and nothing follows it.
    pub fn is_exhausted(&self) -> bool {
        self.state == CountdownState::Elapsed
            && !self.repeat_last
            && self.index + 1 >= self.intervals.len()
    }

    pub fn snapshot(&self, now: DateTime<FixedOffset>) -> Event {
        Event::CountdownSnapshot {
            state: self.state,
            interval_index: self.index,
            remaining_ms: self.remaining_ms,
            at: now.with_timezone(&Utc),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        match self.state {
            CountdownState::Idle | CountdownState::Elapsed => {
                if self.state == CountdownState::Elapsed {
                    if self.is_exhausted() {
                        return None;
                    }
                    self.advance();
                }
                let minutes = self.current_interval_min()?;
                self.state = CountdownState::Running;
                self.last_tick = Some(now.with_timezone(&Utc));
                Some(Event::CountdownStarted {
                    interval_index: self.index,
                    duration_secs: u64::from(minutes) * 60,
                    at: now.with_timezone(&Utc),
                })
            }
            CountdownState::Paused => self.resume(now),
            CountdownState::Running => None,
        }
    }

    pub fn pause(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        if self.state != CountdownState::Running {
            return None;
        }
        self.flush_elapsed(now);
        self.state = CountdownState::Paused;
        self.last_tick = None;
        Some(Event::CountdownPaused {
            remaining_ms: self.remaining_ms,
            at: now.with_timezone(&Utc),
        })
    }

    pub fn resume(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        if self.state != CountdownState::Paused {
            return None;
        }
        self.state = CountdownState::Running;
        self.last_tick = Some(now.with_timezone(&Utc));
        Some(Event::CountdownResumed {
            remaining_ms: self.remaining_ms,
            at: now.with_timezone(&Utc),
        })
    }

    /// Jump to the next interval and go idle.
    pub fn skip(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        let from = self.index;
        self.state = CountdownState::Idle;
        self.last_tick = None;
        self.advance();
        Some(Event::CountdownSkipped {
            from_index: from,
            to_index: self.index,
            at: now.with_timezone(&Utc),
        })
    }

    pub fn reset(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        self.state = CountdownState::Idle;
        self.index = 0;
        self.last_tick = None;
        self.remaining_ms = self.intervals.first().map(|m| minutes_to_ms(*m)).unwrap_or(0);
        Some(Event::CountdownReset {
            at: now.with_timezone(&Utc),
        })
    }

    /// Call periodically. Returns `Some(Event::CountdownElapsed)` when the
    /// current interval runs out.
    pub fn tick(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        if self.state != CountdownState::Running {
            return None;
        }
        self.flush_elapsed(now);
        if self.remaining_ms > 0 {
            return None;
        }
        self.state = CountdownState::Elapsed;
        self.last_tick = None;
        Some(Event::CountdownElapsed {
            interval_index: self.index,
            interval_min: self.current_interval_min().unwrap_or(0),
            at: now.with_timezone(&Utc),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush_elapsed(&mut self, now: DateTime<FixedOffset>) {
        if let Some(last) = self.last_tick {
            let now = now.with_timezone(&Utc);
            let elapsed = (now - last).num_milliseconds().max(0) as u64;
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick = Some(now);
        }
    }

    fn advance(&mut self) {
        let last = self.intervals.len().saturating_sub(1);
        self.index = if self.index < last {
            self.index + 1
        } else if self.repeat_last {
            last
        } else {
            self.index
        };
        self.remaining_ms = self
            .intervals
            .get(self.index)
            .map(|m| minutes_to_ms(*m))
            .unwrap_or(0);
    }
}

fn minutes_to_ms(minutes: u32) -> u64 {
    u64::from(minutes).saturating_mul(60_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::fixtures::evening;
    use chrono::Duration;

    fn ferber() -> CheckInCountdown {
        CheckInCountdown::new(vec![3, 5, 10], true)
    }

    #[test]
    fn start_pause_resume() {
        let mut c = ferber();
        let t0 = evening();
        assert_eq!(c.state(), CountdownState::Idle);
        assert!(c.start(t0).is_some());
        assert_eq!(c.state(), CountdownState::Running);

        assert!(c.pause(t0 + Duration::minutes(1)).is_some());
        assert_eq!(c.remaining_ms(), 2 * 60_000);

        // Paused time does not count.
        assert!(c.resume(t0 + Duration::minutes(30)).is_some());
        assert!(c.tick(t0 + Duration::minutes(31)).is_none());
        assert_eq!(c.remaining_ms(), 60_000);
    }

    #[test]
    fn elapsed_then_next_interval() {
        let mut c = ferber();
        let t0 = evening();
        c.start(t0);
        let event = c.tick(t0 + Duration::minutes(3));
        assert!(matches!(
            event,
            Some(Event::CountdownElapsed { interval_index: 0, interval_min: 3, .. })
        ));
        assert_eq!(c.state(), CountdownState::Elapsed);

        c.start(t0 + Duration::minutes(4));
        assert_eq!(c.interval_index(), 1);
        assert_eq!(c.current_interval_min(), Some(5));
    }

    #[test]
    fn last_interval_repeats_when_configured() {
        let mut c = ferber();
        let mut t = evening();
        for _ in 0..5 {
            c.start(t);
            t = t + Duration::minutes(10);
            assert!(c.tick(t).is_some());
        }
        assert_eq!(c.interval_index(), 2);
        assert!(!c.is_exhausted());
    }

    #[test]
    fn exhausted_without_repeat() {
        let mut c = CheckInCountdown::new(vec![1], false);
        let t0 = evening();
        c.start(t0);
        c.tick(t0 + Duration::minutes(1));
        assert!(c.is_exhausted());
        assert!(c.start(t0 + Duration::minutes(2)).is_none());
    }

    #[test]
    fn skip_and_reset() {
        let mut c = ferber();
        let t0 = evening();
        c.skip(t0);
        assert_eq!(c.interval_index(), 1);
        assert_eq!(c.state(), CountdownState::Idle);
        c.reset(t0);
        assert_eq!(c.interval_index(), 0);
        assert_eq!(c.remaining_ms(), 3 * 60_000);
    }

    #[test]
    fn empty_intervals_never_start() {
        let mut c = CheckInCountdown::new(Vec::new(), true);
        assert!(c.start(evening()).is_none());
        assert!(c.tick(evening()).is_none());
    }
}
