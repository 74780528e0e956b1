//! Multi-night guided program.
//!
//! [`ProgramState`] is the only persisted, mutable entity. The
//! [`NightProgramEngine`] owns it, reacts to bedtime-session operations and
//! poll ticks, and writes it back through a [`KvStore`](crate::storage::KvStore)
//! after every change.

mod countdown;
mod engine;
pub mod guidance;
pub mod progress;
pub mod summary;

pub use countdown::{CheckInCountdown, CountdownState};
pub use engine::{NightProgramEngine, PromptThresholds};
pub use guidance::{guidance_for, NightGuidance};
pub use progress::{progress_message, ProgressKind, ProgressMessage};
pub use summary::{ProgramSummary, Trend};

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assessment::{AssessmentRecord, ClockTime};
use crate::error::{LogRejection, ValidationError};
use crate::method::{select_method_id, MethodId, SelectionInput};

/// Key holding the persisted [`ProgramState`].
pub const PROGRAM_KEY: &str = "night_program";

/// Check-in intervals frozen into the program for tolerance 4 and above.
pub const PROGRAM_CHECK_IN_INTERVALS: [u32; 6] = [3, 5, 10, 10, 12, 15];

/// Identifies one of the two elapsed-time support prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CheckInKey {
    #[serde(rename = "20min")]
    TwentyMinutes,
    #[serde(rename = "60min")]
    SixtyMinutes,
}

impl CheckInKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInKey::TwentyMinutes => "20min",
            CheckInKey::SixtyMinutes => "60min",
        }
    }
}

impl fmt::Display for CheckInKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckInKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "20min" => Ok(CheckInKey::TwentyMinutes),
            "60min" => Ok(CheckInKey::SixtyMinutes),
            other => Err(ValidationError::UnknownTag {
                kind: "check-in",
                value: other.to_string(),
            }),
        }
    }
}

/// The parent's morning report for one night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightLog {
    /// Local calendar date the log belongs to.
    pub date: NaiveDate,
    pub bedtime_minutes_to_sleep: u32,
    pub night_wakings: u32,
    pub longest_stretch_minutes: u32,
    pub total_crying_minutes: u32,
    pub morning_wake_time: ClockTime,
    /// 1 (rough) to 5 (great).
    pub parent_mood: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NightLog {
    pub fn validate(&self) -> Result<(), LogRejection> {
        if !(1..=5).contains(&self.parent_mood) {
            return Err(LogRejection::InvalidMood(self.parent_mood));
        }
        Ok(())
    }
}

/// Persisted progress through the night program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramState {
    pub id: Uuid,
    pub start_date: NaiveDate,
    /// Frozen at program start.
    pub method_id: MethodId,
    pub current_night: u32,
    pub is_active: bool,
    /// Frozen at program start.
    pub check_in_intervals: Vec<u32>,
    #[serde(default)]
    pub bedtime_started_at: Option<DateTime<Utc>>,
    /// Prompts resolved during the current bedtime session only.
    #[serde(default)]
    pub check_ins_dismissed: BTreeSet<CheckInKey>,
    #[serde(default)]
    pub night_logs: Vec<NightLog>,
    pub baby_name: String,
    /// `completed_at` of the assessment this program was started from.
    pub assessment_completed_at: DateTime<Utc>,
}

impl ProgramState {
    /// Fresh state for night 1.
    pub fn new(assessment: &AssessmentRecord, now: DateTime<FixedOffset>) -> Self {
        let method_id = select_method_id(&SelectionInput::from(assessment));
        let check_in_intervals = if assessment.crying_tolerance() >= 4 {
            PROGRAM_CHECK_IN_INTERVALS.to_vec()
        } else {
            Vec::new()
        };
        Self {
            id: Uuid::new_v4(),
            start_date: now.date_naive(),
            method_id,
            current_night: 1,
            is_active: true,
            check_in_intervals,
            bedtime_started_at: None,
            check_ins_dismissed: BTreeSet::new(),
            night_logs: Vec::new(),
            baby_name: assessment.baby_name().to_string(),
            assessment_completed_at: assessment.completed_at(),
        }
    }

    /// `current_night == night_logs.len() + 1`.
    pub fn night_count_consistent(&self) -> bool {
        self.current_night as usize == self.night_logs.len() + 1
    }

    pub fn bedtime_active(&self) -> bool {
        self.bedtime_started_at.is_some()
    }

    pub fn has_log_for(&self, date: NaiveDate) -> bool {
        self.night_logs.iter().any(|log| log.date == date)
    }

    pub fn is_tied_to(&self, assessment: &AssessmentRecord) -> bool {
        self.assessment_completed_at == assessment.completed_at()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::assessment::fixtures::record_with;

    #[test]
    fn check_in_key_string_forms() {
        assert_eq!(serde_json::to_string(&CheckInKey::TwentyMinutes).unwrap(), "\"20min\"");
        assert_eq!("60min".parse::<CheckInKey>().unwrap(), CheckInKey::SixtyMinutes);
        assert!("30min".parse::<CheckInKey>().is_err());
    }

    #[test]
    fn new_state_freezes_method_and_intervals() {
        let state = ProgramState::new(&record_with(4, 10), evening());
        assert_eq!(state.method_id, MethodId::Ferber);
        assert_eq!(state.check_in_intervals, vec![3, 5, 10, 10, 12, 15]);
        assert_eq!(state.current_night, 1);
        assert!(state.night_count_consistent());
        assert_eq!(state.start_date.to_string(), "2026-03-02");

        let gentle = ProgramState::new(&record_with(2, 10), evening());
        assert_eq!(gentle.method_id, MethodId::Fading);
        assert!(gentle.check_in_intervals.is_empty());
    }

    #[test]
    fn mood_out_of_range_is_rejected() {
        let mut entry = log(evening().date_naive(), 2, 15);
        assert!(entry.validate().is_ok());
        entry.parent_mood = 0;
        assert_eq!(entry.validate(), Err(LogRejection::InvalidMood(0)));
    }
}
