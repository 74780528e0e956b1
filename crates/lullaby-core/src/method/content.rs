//! Instructional content for each method.
//!
//! Text is stored once as static templates. The only template variable is
//! `{baby}`, replaced with the baby's name at render time.

use super::{Difficulty, MethodId, RecommendedMethod, Science, FERBER_CHECK_IN_INTERVALS};
use crate::assessment::{AssessmentRecord, PartnerAlignment};

/// Placeholder replaced with the baby's name.
pub const BABY_PLACEHOLDER: &str = "{baby}";

/// Substitute the baby's name into a template.
pub fn render_template(template: &str, baby_name: &str) -> String {
    template.replace(BABY_PLACEHOLDER, baby_name)
}

fn render_all(templates: &[&str], baby_name: &str) -> Vec<String> {
    templates
        .iter()
        .map(|t| render_template(t, baby_name))
        .collect()
}

struct Bundle {
    name: &'static str,
    tagline: &'static str,
    description: &'static str,
    difficulty: Difficulty,
    typical_duration: &'static str,
    how_it_works: &'static [&'static str],
    what_to_expect: &'static [&'static str],
    night_one: &'static [&'static str],
    science_summary: &'static str,
    science_points: &'static [&'static str],
    why_it_works: &'static str,
}

const FADING: Bundle = Bundle {
    name: "Gradual Fading",
    tagline: "Step back slowly, one small change at a time.",
    description: "You keep helping {baby} fall asleep, but do a little less every few nights until {baby} is doing the last part alone.",
    difficulty: Difficulty::Gentle,
    typical_duration: "2-4 weeks",
    how_it_works: &[
        "Write down exactly how you help {baby} fall asleep today.",
        "Every 3-4 nights, reduce one part of that help: shorter rocking, less feeding, less patting.",
        "Put {baby} down a little more awake each time.",
        "Stay close and calm if {baby} fusses; comfort, then step back again.",
    ],
    what_to_expect: &[
        "Very little crying; some fussing during each transition.",
        "Progress is measured in weeks, not nights.",
        "Some nights feel like no change at all. That is normal.",
    ],
    night_one: &[
        "Start the bedtime routine at the usual time.",
        "Help {baby} get drowsy exactly as you do now, but stop a minute or two earlier than usual.",
        "Lay {baby} down drowsy and keep a hand on the tummy until settled.",
        "If {baby} gets upset, pick up and soothe, then try again when calm.",
    ],
    science_summary: "Fading changes the sleep association slowly enough that the baby rarely experiences it as a loss.",
    science_points: &[
        "Sleep associations present at bedtime are expected again at every night waking.",
        "Small, consistent reductions let a baby adapt without a large stress response.",
    ],
    why_it_works: "Each step is small enough that {baby} learns to fill the gap alone.",
};

const CHAIR: Bundle = Bundle {
    name: "The Chair Method",
    tagline: "Your presence, a little farther away each few nights.",
    description: "You sit in a chair beside {baby}'s crib until {baby} falls asleep, then move the chair farther away every few nights.",
    difficulty: Difficulty::Moderate,
    typical_duration: "2-3 weeks",
    how_it_works: &[
        "Place a chair right next to the crib for the first nights.",
        "Sit calmly until {baby} is asleep; offer quiet words, minimal touch.",
        "Every 3 nights move the chair: middle of the room, then doorway, then outside the door.",
        "Return to the chair for every night waking.",
    ],
    what_to_expect: &[
        "Some crying, with you present the whole time.",
        "Each chair move can bring a night or two of protest.",
        "Most babies settle within 2-3 weeks.",
    ],
    night_one: &[
        "Finish the routine and put {baby} in the crib awake.",
        "Sit in the chair beside the crib.",
        "Soothe with your voice; touch briefly only if {baby} is very upset.",
        "Stay until {baby} is fully asleep, then leave quietly.",
    ],
    science_summary: "Parental presence lowers stress while the baby practices falling asleep without being held or fed.",
    science_points: &[
        "Gradual withdrawal of presence is a recognized form of graduated extinction.",
        "Predictable parent behavior helps a baby settle faster over successive nights.",
    ],
    why_it_works: "{baby} keeps the reassurance of seeing you while learning the skill of falling asleep alone.",
};

const PUPD: Bundle = Bundle {
    name: "Pick Up / Put Down",
    tagline: "Comfort in your arms, sleep in the crib.",
    description: "When {baby} cries, you pick {baby} up until calm, then put {baby} back down awake. Repeat until sleep.",
    difficulty: Difficulty::Moderate,
    typical_duration: "1-2 weeks",
    how_it_works: &[
        "Put {baby} in the crib drowsy but awake.",
        "If {baby} cries, pick up and hold until calm, not asleep.",
        "Put {baby} back down as soon as the crying stops.",
        "Repeat as many times as it takes; consistency matters more than speed.",
    ],
    what_to_expect: &[
        "The first nights can take many repetitions and a lot of patience.",
        "Night 2 is often harder than night 1.",
        "Most families see clear improvement within a week.",
    ],
    night_one: &[
        "Keep the routine short and calm.",
        "Put {baby} down awake and say your goodnight phrase.",
        "Pick up only when crying escalates; put down the moment {baby} calms.",
        "Expect this to take a while tonight. Count repetitions if it helps you stay steady.",
    ],
    science_summary: "Responding to distress while never letting sleep happen in arms teaches that the crib is where sleep happens.",
    science_points: &[
        "Behaviors that stop being reinforced often intensify briefly before fading.",
        "Consistent responses across caregivers speed up learning.",
    ],
    why_it_works: "{baby} is comforted every time, but always falls asleep in the crib.",
};

const FERBER: Bundle = Bundle {
    name: "Timed Check-Ins",
    tagline: "Short, predictable visits at growing intervals.",
    description: "You put {baby} down awake and leave, returning for brief check-ins at gradually longer intervals.",
    difficulty: Difficulty::Direct,
    typical_duration: "3-7 nights",
    how_it_works: &[
        "Put {baby} down awake after the routine and leave the room.",
        "If {baby} cries, wait the first interval, then check in for under a minute.",
        "Check-ins are calm and boring: a few words, a brief pat, no picking up.",
        "Each wait gets a little longer, following the interval list.",
    ],
    what_to_expect: &[
        "Crying on the first nights, usually shorter each night.",
        "An extinction burst around night 2: crying may get worse before it gets better.",
        "Many babies sleep through within a week.",
    ],
    night_one: &[
        "Do the full routine and say goodnight to {baby} in the crib.",
        "Leave the room and start the check-in timer.",
        "Wait 3 minutes before the first check-in, then 5, then 10 for every check-in after.",
        "Keep each visit under a minute. Do not pick {baby} up.",
    ],
    science_summary: "Graduated extinction reduces the attention that follows crying while keeping regular reassurance.",
    science_points: &[
        "Studies of graduated extinction show improved sleep without lasting stress effects.",
        "Predictable check-ins reassure both baby and parent.",
    ],
    why_it_works: "{baby} learns that you are nearby, and that falling asleep happens without help.",
};

const EXTINCTION: Bundle = Bundle {
    name: "Full Extinction",
    tagline: "The fastest route, with the most crying up front.",
    description: "After a loving routine, you put {baby} down awake and do not return until the morning, apart from feeds and safety checks.",
    difficulty: Difficulty::Direct,
    typical_duration: "3-5 nights",
    how_it_works: &[
        "Do a consistent, loving bedtime routine.",
        "Put {baby} down awake and leave the room.",
        "Do not return until the agreed wake time, except for planned feeds or safety concerns.",
        "Use a monitor so you can see {baby} is safe.",
    ],
    what_to_expect: &[
        "Significant crying on night 1.",
        "Night 2 is often worse than night 1. This is the extinction burst and it means the method is working.",
        "Most babies improve dramatically by night 3-5.",
    ],
    night_one: &[
        "Agree with any other caregiver on the plan before bedtime.",
        "Complete the routine and put {baby} down awake.",
        "Leave the room and watch the monitor.",
        "Go in only for a planned feed or a safety concern.",
    ],
    science_summary: "When crying no longer brings a response, the behavior fades quickly, usually after a brief spike.",
    science_points: &[
        "Extinction bursts are a well-documented, temporary part of behavior change.",
        "Controlled studies found no lasting harm to attachment from extinction-based methods.",
    ],
    why_it_works: "The clear, consistent signal helps {baby} learn the new pattern in the fewest nights.",
};

fn bundle(id: MethodId) -> &'static Bundle {
    match id {
        MethodId::Fading => &FADING,
        MethodId::Chair => &CHAIR,
        MethodId::Pupd => &PUPD,
        MethodId::Ferber => &FERBER,
        MethodId::Extinction => &EXTINCTION,
    }
}

/// Render the full content bundle for `id` and the given assessment.
pub fn render(id: MethodId, record: &AssessmentRecord) -> RecommendedMethod {
    let b = bundle(id);
    let name = record.baby_name();

    let mut notes = Vec::new();
    match record.partner_alignment() {
        PartnerAlignment::Aligned => {}
        PartnerAlignment::NotAligned => notes.push(render_template(
            "Agree on the plan with your partner before night 1. Mixed responses make it harder for {baby} to learn.",
            name,
        )),
        PartnerAlignment::Solo => notes.push(
            "Doing this on your own is hard. Line up someone you can call or message during the first nights."
                .to_string(),
        ),
    }
    if record.has_medical_concerns() {
        notes.push(render_template(
            "You flagged a medical concern. Check with {baby}'s doctor before starting.",
            name,
        ));
    }

    RecommendedMethod {
        id,
        name: b.name.to_string(),
        tagline: b.tagline.to_string(),
        description: render_template(b.description, name),
        difficulty: b.difficulty,
        typical_duration: b.typical_duration.to_string(),
        how_it_works: render_all(b.how_it_works, name),
        what_to_expect: render_all(b.what_to_expect, name),
        night_one_instructions: render_all(b.night_one, name),
        check_in_intervals: (id == MethodId::Ferber).then(|| FERBER_CHECK_IN_INTERVALS.to_vec()),
        science: Science {
            summary: render_template(b.science_summary, name),
            key_points: render_all(b.science_points, name),
            why_it_works: render_template(b.why_it_works, name),
        },
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::fixtures::{completed_at, draft, record_with};
    use crate::assessment::ConcernTag;

    #[test]
    fn every_bundle_renders_name_and_no_placeholder() {
        let record = record_with(3, 10);
        for id in MethodId::ALL {
            let method = render(id, &record);
            let all_text = [
                vec![method.description.clone(), method.science.why_it_works.clone()],
                method.how_it_works.clone(),
                method.night_one_instructions.clone(),
                method.what_to_expect.clone(),
            ]
            .concat()
            .join(" ");
            assert!(!all_text.contains(BABY_PLACEHOLDER), "{id} left a placeholder");
            assert!(all_text.contains("Mila"), "{id} never names the baby");
            assert!(!method.how_it_works.is_empty());
            assert!(!method.night_one_instructions.is_empty());
        }
    }

    #[test]
    fn only_ferber_carries_check_in_intervals() {
        let record = record_with(4, 10);
        for id in MethodId::ALL {
            let method = render(id, &record);
            assert_eq!(method.check_in_intervals.is_some(), id == MethodId::Ferber);
        }
    }

    #[test]
    fn notes_follow_partner_and_medical_answers() {
        let aligned = render(MethodId::Pupd, &record_with(3, 10));
        assert!(aligned.notes.is_empty());

        let mut d = draft();
        d.partner_alignment = Some(PartnerAlignment::NotAligned);
        d.medical_concerns = [ConcernTag::Reflux].into_iter().collect();
        let record = d.complete(completed_at()).unwrap();
        let method = render(MethodId::Pupd, &record);
        assert_eq!(method.notes.len(), 2);
        assert!(method.notes[1].contains("Mila's doctor"));
    }

    #[test]
    fn render_template_replaces_every_occurrence() {
        assert_eq!(render_template("{baby} and {baby}", "Ada"), "Ada and Ada");
    }
}
