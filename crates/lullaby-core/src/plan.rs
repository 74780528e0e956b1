//! One-time plan view: the recommended method plus a daily schedule.

use serde::{Deserialize, Serialize};

use crate::assessment::AssessmentRecord;
use crate::method::{select, RecommendedMethod};
use crate::schedule::{generate, DailySchedule, ScheduleRequest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepPlan {
    pub baby_name: String,
    pub baby_age_months: u32,
    pub method: RecommendedMethod,
    pub schedule: DailySchedule,
    /// Shown when the current nap count differs from the recommendation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nap_notice: Option<String>,
}

impl SleepPlan {
    pub fn build(record: &AssessmentRecord) -> Self {
        let method = select(record);
        let schedule = generate(&ScheduleRequest::from(record));
        let nap_notice = (!schedule.nap_count_matches).then(|| {
            format!(
                "{} is taking {} nap{} a day; at {} months we suggest {}.",
                record.baby_name(),
                schedule.current_nap_count,
                if schedule.current_nap_count == 1 { "" } else { "s" },
                record.baby_age_months(),
                schedule.recommended_naps,
            )
        });
        Self {
            baby_name: record.baby_name().to_string(),
            baby_age_months: record.baby_age_months(),
            method,
            schedule,
            nap_notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::fixtures::{completed_at, draft, record_with};
    use crate::method::MethodId;

    #[test]
    fn plan_combines_method_and_schedule() {
        let plan = SleepPlan::build(&record_with(4, 10));
        assert_eq!(plan.method.id, MethodId::Ferber);
        assert_eq!(plan.schedule.recommended_naps, 2);
        assert!(plan.nap_notice.is_none());
        assert_eq!(plan.schedule.bedtime_shift_minutes, Some(15));
    }

    #[test]
    fn nap_mismatch_produces_notice() {
        let mut d = draft();
        d.baby_age_months = 4;
        d.current_nap_count = 2;
        let plan = SleepPlan::build(&d.complete(completed_at()).unwrap());
        assert_eq!(
            plan.nap_notice.as_deref(),
            Some("Mila is taking 2 naps a day; at 4 months we suggest 3.")
        );
    }
}
