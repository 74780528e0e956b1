use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::method::MethodId;
use crate::program::{CheckInKey, CountdownState};

/// Every state change in the night program produces an Event.
/// Hosts print or forward them; the support-channel collaborator listens
/// for [`Event::SupportRequested`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    ProgramInitialized {
        program_id: String,
        method_id: MethodId,
        check_in_intervals: Vec<u32>,
        at: DateTime<Utc>,
    },
    BedtimeStarted {
        night: u32,
        at: DateTime<Utc>,
    },
    /// A timed support prompt is now pending.
    CheckInPrompted {
        key: CheckInKey,
        elapsed_minutes: i64,
        at: DateTime<Utc>,
    },
    CheckInDismissed {
        key: CheckInKey,
        at: DateTime<Utc>,
    },
    /// Parent asked for support from a check-in prompt.
    SupportRequested {
        check_in_key: CheckInKey,
        baby_name: String,
        at: DateTime<Utc>,
    },
    /// Bedtime session abandoned without a morning log.
    BedtimeEnded {
        night: u32,
        elapsed_minutes: i64,
        at: DateTime<Utc>,
    },
    MorningLogged {
        night: u32,
        date: NaiveDate,
        next_night: u32,
        at: DateTime<Utc>,
    },
    ProgramReset {
        at: DateTime<Utc>,
    },
    CountdownStarted {
        interval_index: usize,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    CountdownPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// A manual check-in interval ran out: time to go in.
    CountdownElapsed {
        interval_index: usize,
        interval_min: u32,
        at: DateTime<Utc>,
    },
    CountdownSkipped {
        from_index: usize,
        to_index: usize,
        at: DateTime<Utc>,
    },
    CountdownReset {
        at: DateTime<Utc>,
    },
    CountdownSnapshot {
        state: CountdownState,
        interval_index: usize,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        method_id: MethodId,
        current_night: u32,
        is_active: bool,
        bedtime_active: bool,
        elapsed_minutes: Option<i64>,
        pending_check_in: Option<CheckInKey>,
        check_ins_dismissed: Vec<CheckInKey>,
        nights_logged: usize,
        needs_morning_log: bool,
        at: DateTime<Utc>,
    },
}
