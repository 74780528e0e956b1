//! Integration tests for the plan view: method selection plus schedule.

use std::collections::BTreeSet;

use chrono::Utc;
use lullaby_core::schedule::ScheduleEventKind;
use lullaby_core::{
    generate, select, select_method_id, AssessmentDraft, AssociationTag, AttemptTag, ClockTime,
    MethodId, PartnerAlignment, ProblemTag, ScheduleRequest, SelectionInput, SleepPlan,
};

fn draft(tolerance: u8, age: u32, attempts: &[AttemptTag]) -> AssessmentDraft {
    AssessmentDraft {
        baby_name: "Theo".into(),
        baby_age_months: age,
        main_problems: BTreeSet::from([ProblemTag::FallingAsleep]),
        night_wakings: 2,
        current_sleep_associations: BTreeSet::from([AssociationTag::Rocking]),
        previous_attempts: attempts.iter().copied().collect(),
        crying_tolerance: tolerance,
        partner_alignment: Some(PartnerAlignment::Solo),
        current_wake_time: ClockTime::new(7, 0),
        current_bedtime: ClockTime::new(20, 0),
        current_nap_count: 3,
        medical_concerns: BTreeSet::new(),
    }
}

#[test]
fn test_ferber_example() {
    let record = draft(4, 10, &[AttemptTag::None]).complete(Utc::now()).unwrap();
    let method = select(&record);
    assert_eq!(method.id, MethodId::Ferber);
    assert_eq!(method.check_in_intervals, Some(vec![3, 5, 10, 10, 10]));
    assert!(method.night_one_instructions.iter().any(|s| s.contains("Theo")));
}

#[test]
fn test_chair_example() {
    let record = draft(3, 10, &[AttemptTag::Pupd]).complete(Utc::now()).unwrap();
    assert_eq!(select(&record).id, MethodId::Chair);
    assert_eq!(
        select_method_id(&SelectionInput::from(&record)),
        MethodId::Chair
    );
}

#[test]
fn test_plan_for_solo_parent_with_extra_nap() {
    let record = draft(5, 10, &[AttemptTag::Ferber]).complete(Utc::now()).unwrap();
    let plan = SleepPlan::build(&record);
    assert_eq!(plan.method.id, MethodId::Extinction);
    assert_eq!(plan.method.notes.len(), 1);
    assert!(plan.nap_notice.is_some());
    assert_eq!(plan.schedule.recommended_naps, 2);
    assert_eq!(plan.schedule.current_nap_count, 3);

    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["method"]["id"], "extinction");
    assert_eq!(json["schedule"]["ideal_bedtime"], "19:45");
}

#[test]
fn test_newborn_schedule_has_four_naps() {
    let schedule = generate(&ScheduleRequest {
        age_months: 2,
        wake_time: ClockTime::new(6, 0).unwrap(),
        current_nap_count: 4,
        current_bedtime: None,
    });
    assert_eq!(
        schedule
            .events
            .iter()
            .filter(|e| e.kind == ScheduleEventKind::NapStart)
            .count(),
        4
    );
    let routine = schedule.bedtime_routine_start().unwrap();
    let crib = schedule.in_crib().unwrap();
    assert_eq!(crib.offset_minutes - routine.offset_minutes, 30);
}
