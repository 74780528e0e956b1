//! Aggregate view over the night log history.

use serde::{Deserialize, Serialize};

use super::NightLog;

/// Direction of a metric where lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Steady,
    Worsening,
    /// Fewer than two nights logged.
    Unknown,
}

impl Trend {
    fn between(first: u32, last: u32) -> Self {
        match last.cmp(&first) {
            std::cmp::Ordering::Less => Trend::Improving,
            std::cmp::Ordering::Equal => Trend::Steady,
            std::cmp::Ordering::Greater => Trend::Worsening,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub nights_logged: usize,
    pub average_wakings: Option<f64>,
    pub average_minutes_to_sleep: Option<f64>,
    pub average_crying_minutes: Option<f64>,
    pub average_parent_mood: Option<f64>,
    pub best_stretch_minutes: Option<u32>,
    pub wakings_trend: Trend,
    pub settling_trend: Trend,
    pub crying_trend: Trend,
}

impl ProgramSummary {
    pub fn from_logs(logs: &[NightLog]) -> Self {
        let average = |f: fn(&NightLog) -> u32| -> Option<f64> {
            if logs.is_empty() {
                return None;
            }
            let total: u64 = logs.iter().map(|l| u64::from(f(l))).sum();
            Some(total as f64 / logs.len() as f64)
        };
        let trend = |f: fn(&NightLog) -> u32| -> Trend {
            match (logs.first(), logs.last()) {
                (Some(first), Some(last)) if logs.len() >= 2 => Trend::between(f(first), f(last)),
                _ => Trend::Unknown,
            }
        };

        Self {
            nights_logged: logs.len(),
            average_wakings: average(|l| l.night_wakings),
            average_minutes_to_sleep: average(|l| l.bedtime_minutes_to_sleep),
            average_crying_minutes: average(|l| l.total_crying_minutes),
            average_parent_mood: average(|l| u32::from(l.parent_mood)),
            best_stretch_minutes: logs.iter().map(|l| l.longest_stretch_minutes).max(),
            wakings_trend: trend(|l| l.night_wakings),
            settling_trend: trend(|l| l.bedtime_minutes_to_sleep),
            crying_trend: trend(|l| l.total_crying_minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::fixtures::log;
    use chrono::NaiveDate;

    #[test]
    fn empty_history() {
        let s = ProgramSummary::from_logs(&[]);
        assert_eq!(s.nights_logged, 0);
        assert_eq!(s.average_wakings, None);
        assert_eq!(s.best_stretch_minutes, None);
        assert_eq!(s.wakings_trend, Trend::Unknown);
    }

    #[test]
    fn averages_and_trends() {
        let d = |n| NaiveDate::from_ymd_opt(2026, 3, n).unwrap();
        let mut worst = log(d(1), 6, 50);
        worst.total_crying_minutes = 60;
        let mut best = log(d(3), 2, 50);
        best.longest_stretch_minutes = 420;
        best.total_crying_minutes = 75;
        let s = ProgramSummary::from_logs(&[worst, log(d(2), 4, 40), best]);

        assert_eq!(s.nights_logged, 3);
        assert_eq!(s.average_wakings, Some(4.0));
        assert_eq!(s.best_stretch_minutes, Some(420));
        assert_eq!(s.wakings_trend, Trend::Improving);
        assert_eq!(s.settling_trend, Trend::Steady);
        assert_eq!(s.crying_trend, Trend::Worsening);
        assert_eq!(s.average_parent_mood, Some(3.0));
    }
}
