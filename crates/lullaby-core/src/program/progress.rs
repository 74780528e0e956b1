//! Progress message after a few logged nights.

use serde::{Deserialize, Serialize};

use super::NightLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressKind {
    FewerWakings,
    FasterSettling,
    ExpectedRegression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMessage {
    pub kind: ProgressKind,
    pub message: String,
}

impl ProgressMessage {
    pub fn is_success(&self) -> bool {
        self.kind != ProgressKind::ExpectedRegression
    }
}

/// Compare the first and latest logged nights.
///
/// Needs at least two logs. Fewer wakings wins over faster settling; when
/// neither improved on night 3, the parent gets the night-2 encouragement
/// instead of silence.
pub fn progress_message(logs: &[NightLog], current_night: u32) -> Option<ProgressMessage> {
    if logs.len() < 2 {
        return None;
    }
    let first = logs.first()?;
    let last = logs.last()?;

    if last.night_wakings < first.night_wakings {
        return Some(ProgressMessage {
            kind: ProgressKind::FewerWakings,
            message: format!(
                "Night wakings are down from {} to {}. It's working!",
                first.night_wakings, last.night_wakings
            ),
        });
    }
    if last.bedtime_minutes_to_sleep < first.bedtime_minutes_to_sleep {
        return Some(ProgressMessage {
            kind: ProgressKind::FasterSettling,
            message: format!(
                "Falling asleep now takes {} minutes instead of {}. Great progress!",
                last.bedtime_minutes_to_sleep, first.bedtime_minutes_to_sleep
            ),
        });
    }
    if current_night == 3 {
        return Some(ProgressMessage {
            kind: ProgressKind::ExpectedRegression,
            message: "Night 2 is often the hardest. No improvement yet is completely normal; \
                      keep going and most families see the turn around night 3 or 4."
                .to_string(),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::fixtures::log;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn needs_two_nights() {
        assert!(progress_message(&[], 1).is_none());
        assert!(progress_message(&[log(day(1), 5, 30)], 2).is_none());
    }

    #[test]
    fn fewer_wakings_is_success() {
        let logs = [log(day(1), 5, 30), log(day(2), 6, 40), log(day(3), 2, 45)];
        let msg = progress_message(&logs, 4).unwrap();
        assert_eq!(msg.kind, ProgressKind::FewerWakings);
        assert!(msg.is_success());
        assert!(msg.message.contains("5 to 2"));
    }

    #[test]
    fn faster_settling_when_wakings_flat() {
        let logs = [log(day(1), 4, 45), log(day(2), 4, 20)];
        let msg = progress_message(&logs, 3).unwrap();
        assert_eq!(msg.kind, ProgressKind::FasterSettling);
    }

    #[test]
    fn flat_night_three_gets_regression_encouragement() {
        let logs = [log(day(1), 5, 30), log(day(2), 5, 30)];
        let msg = progress_message(&logs, 3).unwrap();
        assert_eq!(msg.kind, ProgressKind::ExpectedRegression);
        assert!(!msg.is_success());
        assert!(msg.message.starts_with("Night 2 is often the hardest"));
    }

    #[test]
    fn flat_later_nights_say_nothing() {
        let logs = [log(day(1), 5, 30), log(day(2), 5, 30), log(day(3), 6, 35)];
        assert!(progress_message(&logs, 4).is_none());
    }
}
