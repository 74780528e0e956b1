//! Daily nap and bedtime schedule.
//!
//! Starting at the wake time, each nap is placed after its wake window and
//! lasts its nap duration; bedtime follows the final wake window. All
//! arithmetic is done on minutes since wake, so the sequence is monotone
//! even when a late bedtime wraps past midnight. Displayed clock times wrap
//! and carry a `day_offset`.

mod bands;

pub use bands::{band_for_age, AgeBand, AGE_BANDS};

use serde::{Deserialize, Serialize};

use crate::assessment::{AssessmentRecord, ClockTime};

/// Minutes between the start of the bedtime routine and lights out.
pub const BEDTIME_ROUTINE_LEAD_MIN: u32 = 30;

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleEventKind {
    Wake,
    NapStart,
    NapEnd,
    BedtimeRoutine,
    InCrib,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub time: ClockTime,
    /// Minutes since the morning wake.
    pub offset_minutes: u32,
    /// 0 for the wake day, 1 once the time has wrapped past midnight.
    pub day_offset: u32,
    pub kind: ScheduleEventKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Inputs for one day's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub age_months: u32,
    pub wake_time: ClockTime,
    pub current_nap_count: u8,
    #[serde(default)]
    pub current_bedtime: Option<ClockTime>,
}

impl From<&AssessmentRecord> for ScheduleRequest {
    fn from(record: &AssessmentRecord) -> Self {
        Self {
            age_months: record.baby_age_months(),
            wake_time: record.current_wake_time(),
            current_nap_count: record.current_nap_count(),
            current_bedtime: Some(record.current_bedtime()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySchedule {
    pub events: Vec<ScheduleEvent>,
    pub recommended_naps: u8,
    pub current_nap_count: u8,
    /// `false` when the caller should show a nap-count notice.
    pub nap_count_matches: bool,
    pub ideal_bedtime: ClockTime,
    /// Ideal minus current bedtime, in minutes, when a current bedtime was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedtime_shift_minutes: Option<i32>,
    pub total_day_sleep_minutes: u32,
}

impl DailySchedule {
    pub fn bedtime_routine_start(&self) -> Option<&ScheduleEvent> {
        self.events
            .iter()
            .find(|e| e.kind == ScheduleEventKind::BedtimeRoutine)
    }

    pub fn in_crib(&self) -> Option<&ScheduleEvent> {
        self.events.iter().find(|e| e.kind == ScheduleEventKind::InCrib)
    }

    pub fn naps(&self) -> impl Iterator<Item = &ScheduleEvent> {
        self.events
            .iter()
            .filter(|e| e.kind == ScheduleEventKind::NapStart)
    }
}

/// Build one day's schedule.
pub fn generate(request: &ScheduleRequest) -> DailySchedule {
    let band = band_for_age(request.age_months);
    let wake_minute = request.wake_time.minutes_of_day();
    let event = |offset: u32, kind: ScheduleEventKind, label: String, note: Option<String>| {
        let absolute = wake_minute + offset;
        ScheduleEvent {
            time: ClockTime::from_minutes_of_day(absolute),
            offset_minutes: offset,
            day_offset: absolute / MINUTES_PER_DAY,
            kind,
            label,
            note,
        }
    };

    let mut events = vec![event(0, ScheduleEventKind::Wake, "Wake up".to_string(), None)];
    let mut cursor = 0u32;
    for nap in 0..band.recommended_naps as usize {
        let window = band.wake_windows[nap];
        let duration = band.nap_durations[nap];
        cursor += window;
        events.push(event(
            cursor,
            ScheduleEventKind::NapStart,
            format!("Nap {} starts", nap + 1),
            Some(format!("after {} awake", format_duration(window))),
        ));
        cursor += duration;
        events.push(event(
            cursor,
            ScheduleEventKind::NapEnd,
            format!("Nap {} ends", nap + 1),
            Some(format!("about {} of sleep", format_duration(duration))),
        ));
    }

    let final_window = band.wake_windows[band.recommended_naps as usize];
    let bedtime_offset = cursor + final_window;
    events.push(event(
        bedtime_offset.saturating_sub(BEDTIME_ROUTINE_LEAD_MIN),
        ScheduleEventKind::BedtimeRoutine,
        "Bedtime routine starts".to_string(),
        Some("bath, feed, book, song".to_string()),
    ));
    events.push(event(
        bedtime_offset,
        ScheduleEventKind::InCrib,
        "In crib".to_string(),
        Some(format!("after {} awake", format_duration(final_window))),
    ));

    let ideal_bedtime = ClockTime::from_minutes_of_day(wake_minute + bedtime_offset);
    let bedtime_shift_minutes = request
        .current_bedtime
        .map(|current| signed_clock_delta(current, ideal_bedtime));

    DailySchedule {
        events,
        recommended_naps: band.recommended_naps,
        current_nap_count: request.current_nap_count,
        nap_count_matches: request.current_nap_count == band.recommended_naps,
        ideal_bedtime,
        bedtime_shift_minutes,
        total_day_sleep_minutes: band.nap_durations.iter().sum(),
    }
}

/// Shortest signed distance from `from` to `to` on a 24h clock.
fn signed_clock_delta(from: ClockTime, to: ClockTime) -> i32 {
    let day = MINUTES_PER_DAY as i32;
    let raw = to.minutes_of_day() as i32 - from.minutes_of_day() as i32;
    (raw + day + day / 2).rem_euclid(day) - day / 2
}

fn format_duration(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}
