//! Per-night guidance text.
//!
//! Pure lookup over `(method, night)`. Every method gets hardest-night
//! framing on night 1. Ferber, extinction and pick-up/put-down warn on
//! night 2 that things may get worse before they get better. Fading moves
//! in weeks rather than nights; chair moves the chair every three nights.

use indoc::indoc;
use serde::{Deserialize, Serialize};

use crate::method::content::render_template;
use crate::method::MethodId;

/// Ferber check-in intervals (minutes) for nights 1, 2 and 3+.
const FERBER_NIGHT_INTERVALS: [&[u32]; 3] = [&[3, 5, 10], &[5, 10, 12], &[10, 12, 15]];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightGuidance {
    pub title: String,
    pub narrative: String,
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_intervals: Option<Vec<u32>>,
}

struct Band {
    title: &'static str,
    narrative: &'static str,
    tips: &'static [&'static str],
}

const FIRST_NIGHT_TITLE: &str = "Night 1: the hardest night";

const EXPECTED_BURST: &str = indoc! {"
    Tonight may be harder than last night. Crying can get longer or louder
    on night 2; this is called an extinction burst. It is expected, it is
    not failure, and it usually means {baby} is starting to learn the new
    pattern. Stay consistent and it passes, often by night 3 or 4.
"};

fn ferber_band(night: u32) -> Band {
    match night {
        1 => Band {
            title: FIRST_NIGHT_TITLE,
            narrative: indoc! {"
                Tonight {baby} meets the new routine for the first time. Expect
                protest. Your job is to stay calm, keep check-ins short and
                follow the timer.
            "},
            tips: &[
                "Keep each check-in under a minute.",
                "Use the same short phrase every visit.",
                "Do not pick {baby} up during check-ins.",
            ],
        },
        2 => Band {
            title: "Night 2: the extinction burst",
            narrative: EXPECTED_BURST,
            tips: &[
                "Intervals are a little longer tonight.",
                "If it is worse than night 1, you are on track.",
                "Tag-team with your partner if you can.",
            ],
        },
        _ => Band {
            title: "Night 3 and beyond: seeing progress",
            narrative: indoc! {"
                Most families see real improvement from here. {baby} is learning
                to settle between check-ins, and crying stretches get shorter.
            "},
            tips: &[
                "Keep the same intervals even if tonight goes well.",
                "Apply the same approach to night wakings.",
            ],
        },
    }
}

fn extinction_band(night: u32) -> Band {
    match night {
        1 => Band {
            title: FIRST_NIGHT_TITLE,
            narrative: indoc! {"
                This is the night with the most crying. {baby} is safe, fed and
                loved. Watch the monitor, not the clock.
            "},
            tips: &[
                "Agree in advance on when you will go in (feeds, safety only).",
                "Step away from the door if listening gets too hard.",
            ],
        },
        2 => Band {
            title: "Night 2: the extinction burst",
            narrative: EXPECTED_BURST,
            tips: &[
                "A worse night 2 is the method working, not failing.",
                "Giving in now teaches that longer crying works. Hold steady.",
            ],
        },
        _ => Band {
            title: "Night 3 and beyond: the turn",
            narrative: indoc! {"
                Crying usually drops sharply from here. Many babies settle within
                minutes by the end of the first week.
            "},
            tips: &[
                "Keep bedtime and the routine identical every night.",
                "An occasional rough night is normal; respond the same way.",
            ],
        },
    }
}

fn pupd_band(night: u32) -> Band {
    match night {
        1 => Band {
            title: FIRST_NIGHT_TITLE,
            narrative: indoc! {"
                Tonight may take many pick-ups. Every time you put {baby} down
                awake, {baby} practices the new skill.
            "},
            tips: &[
                "Pick up to calm, never to sleep.",
                "Put down the moment the crying stops.",
                "Count repetitions if it helps you stay steady.",
            ],
        },
        2 => Band {
            title: "Night 2: the extinction burst",
            narrative: EXPECTED_BURST,
            tips: &[
                "Expect more repetitions than night 1.",
                "Consistency tonight makes night 3 much easier.",
            ],
        },
        _ => Band {
            title: "Night 3 and beyond: fewer repetitions",
            narrative: indoc! {"
                The number of pick-ups should start to fall. {baby} is learning
                that the crib is where sleep happens.
            "},
            tips: &[
                "Start waiting a little longer before picking up.",
                "Use the same response for night wakings.",
            ],
        },
    }
}

fn chair_band(night: u32) -> Band {
    match night {
        1 => Band {
            title: FIRST_NIGHT_TITLE,
            narrative: indoc! {"
                Sit right beside the crib. {baby} can see you the whole time,
                which helps, but expect protest while {baby} works out that you
                will not pick them up.
            "},
            tips: &[
                "Quiet voice, minimal touch.",
                "Stay until {baby} is fully asleep.",
            ],
        },
        2..=3 => Band {
            title: "Nights 2-3: chair beside the crib",
            narrative: indoc! {"
                Keep the chair where it is. {baby} is getting used to falling
                asleep with you nearby but not helping.
            "},
            tips: &["Touch less than on night 1.", "Avoid eye contact games."],
        },
        4..=6 => Band {
            title: "Nights 4-6: chair in the middle of the room",
            narrative: indoc! {"
                Move the chair halfway to the door. A night of protest after the
                move is normal.
            "},
            tips: &["Use your voice instead of touch.", "Keep the routine identical."],
        },
        7..=9 => Band {
            title: "Nights 7-9: chair by the door",
            narrative: indoc! {"
                Move the chair to the doorway. {baby} can still hear you and
                knows you are close.
            "},
            tips: &["Stay quiet unless {baby} is very upset."],
        },
        _ => Band {
            title: "Night 10 and beyond: outside the door",
            narrative: indoc! {"
                Sit just outside the door, out of sight. {baby} has the skill now;
                you are only there as backup.
            "},
            tips: &["Say goodnight and leave once {baby} settles quickly."],
        },
    }
}

fn fading_band(night: u32) -> Band {
    match (night.max(1) - 1) / 7 {
        0 => Band {
            title: "Week 1: small first steps",
            narrative: indoc! {"
                Fading works over weeks, not nights. This week, reduce one piece
                of help a little every 3-4 nights. Progress will feel slow. That
                is expected.
            "},
            tips: &[
                "Stop rocking or feeding a minute or two earlier.",
                "Lay {baby} down drowsy and keep a hand on the tummy.",
            ],
        },
        1 => Band {
            title: "Week 2: doing less",
            narrative: indoc! {"
                Keep stepping back. {baby} should need less help to settle, even
                if night wakings have not changed yet.
            "},
            tips: &[
                "Move from holding to patting in the crib.",
                "Keep responses the same at night wakings.",
            ],
        },
        _ => Band {
            title: "Week 3 and beyond: letting go",
            narrative: indoc! {"
                {baby} is close to falling asleep independently. Keep removing the
                last bits of help until you can say goodnight and leave.
            "},
            tips: &["Sit beside the crib rather than touching.", "Celebrate small wins."],
        },
    }
}

/// Guidance for `night` of a program using `method`.
pub fn guidance_for(method: MethodId, night: u32, baby_name: &str) -> NightGuidance {
    let night = night.max(1);
    let band = match method {
        MethodId::Ferber => ferber_band(night),
        MethodId::Extinction => extinction_band(night),
        MethodId::Pupd => pupd_band(night),
        MethodId::Chair => chair_band(night),
        MethodId::Fading => fading_band(night),
    };
    let check_in_intervals = (method == MethodId::Ferber).then(|| {
        let idx = (night as usize - 1).min(FERBER_NIGHT_INTERVALS.len() - 1);
        FERBER_NIGHT_INTERVALS[idx].to_vec()
    });

    NightGuidance {
        title: band.title.to_string(),
        narrative: render_template(band.narrative.trim_end(), baby_name),
        tips: band
            .tips
            .iter()
            .map(|t| render_template(t, baby_name))
            .collect(),
        check_in_intervals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_one_is_hardest_night_for_per_night_methods() {
        for method in [MethodId::Ferber, MethodId::Extinction, MethodId::Pupd, MethodId::Chair] {
            assert_eq!(guidance_for(method, 1, "Mila").title, FIRST_NIGHT_TITLE);
        }
    }

    #[test]
    fn night_two_warns_about_regression() {
        for method in MethodId::ALL {
            let g = guidance_for(method, 2, "Mila");
            assert_eq!(
                g.narrative.contains("not failure"),
                method.expects_night_two_burst(),
                "{method}"
            );
            if method.expects_night_two_burst() {
                assert!(g.title.contains("extinction burst"), "{method}");
                assert!(g.narrative.contains("Mila"));
            }
        }
    }

    #[test]
    fn ferber_intervals_grow_by_night() {
        assert_eq!(guidance_for(MethodId::Ferber, 1, "x").check_in_intervals, Some(vec![3, 5, 10]));
        assert_eq!(guidance_for(MethodId::Ferber, 2, "x").check_in_intervals, Some(vec![5, 10, 12]));
        assert_eq!(guidance_for(MethodId::Ferber, 9, "x").check_in_intervals, Some(vec![10, 12, 15]));
        assert_eq!(guidance_for(MethodId::Pupd, 1, "x").check_in_intervals, None);
    }

    #[test]
    fn fading_uses_week_bands() {
        let week1 = guidance_for(MethodId::Fading, 1, "x").title;
        assert_eq!(guidance_for(MethodId::Fading, 7, "x").title, week1);
        assert!(guidance_for(MethodId::Fading, 8, "x").title.starts_with("Week 2"));
        assert!(guidance_for(MethodId::Fading, 15, "x").title.starts_with("Week 3"));
    }

    #[test]
    fn chair_moves_every_three_nights() {
        assert!(guidance_for(MethodId::Chair, 3, "x").title.contains("beside the crib"));
        assert!(guidance_for(MethodId::Chair, 4, "x").title.contains("middle"));
        assert!(guidance_for(MethodId::Chair, 9, "x").title.contains("door"));
        assert!(guidance_for(MethodId::Chair, 12, "x").title.contains("outside"));
    }

    #[test]
    fn night_zero_is_treated_as_night_one() {
        assert_eq!(
            guidance_for(MethodId::Ferber, 0, "x"),
            guidance_for(MethodId::Ferber, 1, "x")
        );
    }
}
