//! Method decision tree.
//!
//! There is one canonical rule set, [`select_method_id`], over the reduced
//! [`SelectionInput`]. Both the plan view (full assessment) and the night
//! program go through it, so they always agree on the method id.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{content, MethodId, RecommendedMethod};
use crate::assessment::{AssessmentRecord, AttemptTag};

/// Check-in intervals (minutes) prescribed with the timed check-in method.
pub const FERBER_CHECK_IN_INTERVALS: [u32; 5] = [3, 5, 10, 10, 10];

/// Youngest age, in months, for anything other than fading.
const MIN_AGE_FOR_CRYING_METHODS: u32 = 4;

/// The subset of an assessment the decision tree reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionInput {
    pub crying_tolerance: u8,
    pub baby_age_months: u32,
    #[serde(default)]
    pub previous_attempts: BTreeSet<AttemptTag>,
}

impl From<&AssessmentRecord> for SelectionInput {
    fn from(record: &AssessmentRecord) -> Self {
        Self {
            crying_tolerance: record.crying_tolerance(),
            baby_age_months: record.baby_age_months(),
            previous_attempts: record.previous_attempts().clone(),
        }
    }
}

/// Pick a method id. First matching rule wins.
///
/// 1. Tolerance 1-2, or younger than 4 months: fading.
/// 2. Tolerance 3: pick-up/put-down, unless it was already tried, then chair.
/// 3. Tolerance 4: timed check-ins (ferber).
/// 4. Otherwise: extinction.
pub fn select_method_id(input: &SelectionInput) -> MethodId {
    if input.crying_tolerance <= 2 || input.baby_age_months < MIN_AGE_FOR_CRYING_METHODS {
        return MethodId::Fading;
    }
    match input.crying_tolerance {
        3 if input.previous_attempts.contains(&AttemptTag::Pupd) => MethodId::Chair,
        3 => MethodId::Pupd,
        4 => MethodId::Ferber,
        _ => MethodId::Extinction,
    }
}

/// Full selection: method id plus the rendered content bundle.
pub fn select(record: &AssessmentRecord) -> RecommendedMethod {
    let id = select_method_id(&SelectionInput::from(record));
    content::render(id, record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::fixtures::{completed_at, draft, record_with};
    use proptest::prelude::*;

    fn input(tolerance: u8, age: u32, attempts: &[AttemptTag]) -> SelectionInput {
        SelectionInput {
            crying_tolerance: tolerance,
            baby_age_months: age,
            previous_attempts: attempts.iter().copied().collect(),
        }
    }

    #[test]
    fn low_tolerance_is_fading() {
        assert_eq!(select_method_id(&input(1, 10, &[])), MethodId::Fading);
        assert_eq!(select_method_id(&input(2, 10, &[])), MethodId::Fading);
    }

    #[test]
    fn young_babies_always_get_fading() {
        for tolerance in 1..=5 {
            assert_eq!(select_method_id(&input(tolerance, 3, &[])), MethodId::Fading);
        }
    }

    #[test]
    fn tolerance_three_prefers_pupd_unless_tried() {
        assert_eq!(select_method_id(&input(3, 8, &[AttemptTag::None])), MethodId::Pupd);
        assert_eq!(select_method_id(&input(3, 8, &[AttemptTag::Pupd])), MethodId::Chair);
        assert_eq!(
            select_method_id(&input(3, 8, &[AttemptTag::Ferber, AttemptTag::Pupd])),
            MethodId::Chair
        );
    }

    #[test]
    fn tolerance_four_is_ferber_with_intervals() {
        let method = select(&record_with(4, 10));
        assert_eq!(method.id, MethodId::Ferber);
        assert_eq!(method.check_in_intervals, Some(vec![3, 5, 10, 10, 10]));
    }

    #[test]
    fn tolerance_five_is_extinction() {
        assert_eq!(select(&record_with(5, 10)).id, MethodId::Extinction);
    }

    #[test]
    fn previously_tried_pupd_moves_to_chair() {
        let mut d = draft();
        d.crying_tolerance = 3;
        d.previous_attempts = BTreeSet::from([AttemptTag::Pupd]);
        let record = d.complete(completed_at()).unwrap();
        assert_eq!(select(&record).id, MethodId::Chair);
    }

    fn attempt_strategy() -> impl Strategy<Value = AttemptTag> {
        prop_oneof![
            Just(AttemptTag::None),
            Just(AttemptTag::Fading),
            Just(AttemptTag::Chair),
            Just(AttemptTag::Pupd),
            Just(AttemptTag::Ferber),
            Just(AttemptTag::Extinction),
            Just(AttemptTag::ShushPat),
        ]
    }

    proptest! {
        #[test]
        fn full_and_reduced_selection_agree(
            tolerance in 1u8..=5,
            age in 0u32..=36,
            attempts in proptest::collection::btree_set(attempt_strategy(), 1..4),
        ) {
            let mut d = draft();
            d.crying_tolerance = tolerance;
            d.baby_age_months = age;
            d.previous_attempts = attempts.clone();
            let record = d.complete(completed_at()).unwrap();

            let reduced = SelectionInput {
                crying_tolerance: tolerance,
                baby_age_months: age,
                previous_attempts: attempts,
            };
            prop_assert_eq!(select(&record).id, select_method_id(&reduced));
        }

        #[test]
        fn selection_is_deterministic(
            tolerance in 0u8..=9,
            age in 0u32..=48,
            attempts in proptest::collection::btree_set(attempt_strategy(), 0..4),
        ) {
            let i = SelectionInput { crying_tolerance: tolerance, baby_age_months: age, previous_attempts: attempts };
            prop_assert_eq!(select_method_id(&i), select_method_id(&i.clone()));
        }
    }
}
