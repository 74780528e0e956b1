//! Parent questionnaire answers.
//!
//! An [`AssessmentDraft`] collects answers as the parent moves through the
//! questionnaire. [`AssessmentDraft::complete`] validates it and produces an
//! immutable [`AssessmentRecord`]. Editing answers means building a new draft
//! (see [`AssessmentRecord::to_draft`]) and completing it again; the
//! [`AssessmentRepository`] then swaps the active record and discards any
//! night program started from the old one.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, StorageError, ValidationError};
use crate::program::PROGRAM_KEY;
use crate::storage::KvStore;

/// Key holding the active assessment record.
pub const ACTIVE_ASSESSMENT_KEY: &str = "assessment/active";
/// Key holding superseded assessment records, oldest first.
pub const ASSESSMENT_HISTORY_KEY: &str = "assessment/history";
/// Where an unreadable history is moved before a fresh one is started.
pub const CORRUPT_HISTORY_KEY: &str = "assessment/history.corrupt";

/// Upper bound of the night-wakings answer; 8 stands for "8 or more".
pub const MAX_NIGHT_WAKINGS: u8 = 8;

// ── Time of day ──────────────────────────────────────────────────────

/// Wall-clock time of day, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes since midnight.
    pub fn minutes_of_day(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    /// Build from minutes since midnight, wrapping past 24h.
    pub fn from_minutes_of_day(minutes: u32) -> Self {
        let wrapped = minutes % (24 * 60);
        // Both components are in range after wrapping.
        Self(NaiveTime::from_hms_opt(wrapped / 60, wrapped % 60, 0).unwrap_or(NaiveTime::MIN))
    }

    /// Render as 12-hour clock text, e.g. `7:05 PM`.
    pub fn to_12h_string(&self) -> String {
        self.0.format("%-I:%M %p").to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| ValidationError::InvalidClockTime(s.to_string()))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── Answer tags ──────────────────────────────────────────────────────

/// What the parent reports as the main sleep problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemTag {
    FallingAsleep,
    NightWakings,
    EarlyWaking,
    ShortNaps,
    FeedToSleep,
    ContactNaps,
    BedtimeBattles,
}

/// How the baby currently falls asleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssociationTag {
    Feeding,
    Rocking,
    Holding,
    Pacifier,
    CoSleeping,
    Motion,
    Independent,
}

/// Approaches the parent has already tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptTag {
    None,
    Fading,
    Chair,
    /// Pick-up/put-down.
    Pupd,
    Ferber,
    Extinction,
    ShushPat,
    Other,
}

/// Medical context the parent flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConcernTag {
    None,
    Reflux,
    Allergies,
    Breathing,
    Weight,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartnerAlignment {
    Aligned,
    NotAligned,
    Solo,
}

// ── Draft ────────────────────────────────────────────────────────────

/// Answers in progress. Every field is optional until completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentDraft {
    #[serde(default)]
    pub baby_name: String,
    #[serde(default)]
    pub baby_age_months: u32,
    #[serde(default)]
    pub main_problems: BTreeSet<ProblemTag>,
    #[serde(default)]
    pub night_wakings: u8,
    #[serde(default)]
    pub current_sleep_associations: BTreeSet<AssociationTag>,
    #[serde(default)]
    pub previous_attempts: BTreeSet<AttemptTag>,
    #[serde(default)]
    pub crying_tolerance: u8,
    #[serde(default)]
    pub partner_alignment: Option<PartnerAlignment>,
    #[serde(default)]
    pub current_wake_time: Option<ClockTime>,
    #[serde(default)]
    pub current_bedtime: Option<ClockTime>,
    #[serde(default)]
    pub current_nap_count: u8,
    #[serde(default)]
    pub medical_concerns: BTreeSet<ConcernTag>,
}

impl AssessmentDraft {
    /// Validate the answers and freeze them into a record.
    ///
    /// # Errors
    /// Returns the first [`ValidationError`] found; the draft is left as is.
    pub fn complete(&self, now: DateTime<Utc>) -> std::result::Result<AssessmentRecord, ValidationError> {
        let baby_name = self.baby_name.trim();
        if baby_name.is_empty() {
            return Err(ValidationError::Blank("baby_name"));
        }
        if self.main_problems.is_empty() {
            return Err(ValidationError::EmptySelection("main_problems"));
        }
        if self.current_sleep_associations.is_empty() {
            return Err(ValidationError::EmptySelection("current_sleep_associations"));
        }
        if self.previous_attempts.is_empty() {
            return Err(ValidationError::EmptySelection("previous_attempts"));
        }
        check_range("crying_tolerance", self.crying_tolerance.into(), 1, 5)?;
        check_range("current_nap_count", self.current_nap_count.into(), 1, 4)?;
        let partner_alignment = self
            .partner_alignment
            .ok_or(ValidationError::Blank("partner_alignment"))?;
        let current_wake_time = self
            .current_wake_time
            .ok_or(ValidationError::Blank("current_wake_time"))?;
        let current_bedtime = self
            .current_bedtime
            .ok_or(ValidationError::Blank("current_bedtime"))?;

        let medical_concerns = if self.medical_concerns.is_empty() {
            BTreeSet::from([ConcernTag::None])
        } else {
            self.medical_concerns.clone()
        };

        Ok(AssessmentRecord {
            baby_name: baby_name.to_string(),
            baby_age_months: self.baby_age_months,
            main_problems: self.main_problems.clone(),
            night_wakings: self.night_wakings.min(MAX_NIGHT_WAKINGS),
            current_sleep_associations: self.current_sleep_associations.clone(),
            previous_attempts: self.previous_attempts.clone(),
            crying_tolerance: self.crying_tolerance,
            partner_alignment,
            current_wake_time,
            current_bedtime,
            current_nap_count: self.current_nap_count,
            medical_concerns,
            completed_at: now,
        })
    }
}

fn check_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> std::result::Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

// ── Record ───────────────────────────────────────────────────────────

/// Completed, immutable questionnaire answers.
///
/// Only produced by [`AssessmentDraft::complete`] (or read back from
/// storage). There are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    baby_name: String,
    baby_age_months: u32,
    main_problems: BTreeSet<ProblemTag>,
    night_wakings: u8,
    current_sleep_associations: BTreeSet<AssociationTag>,
    previous_attempts: BTreeSet<AttemptTag>,
    crying_tolerance: u8,
    partner_alignment: PartnerAlignment,
    current_wake_time: ClockTime,
    current_bedtime: ClockTime,
    current_nap_count: u8,
    medical_concerns: BTreeSet<ConcernTag>,
    completed_at: DateTime<Utc>,
}

impl AssessmentRecord {
    pub fn baby_name(&self) -> &str {
        &self.baby_name
    }

    pub fn baby_age_months(&self) -> u32 {
        self.baby_age_months
    }

    pub fn main_problems(&self) -> &BTreeSet<ProblemTag> {
        &self.main_problems
    }

    /// Reported wakings per night; 8 means "8 or more".
    pub fn night_wakings(&self) -> u8 {
        self.night_wakings
    }

    pub fn current_sleep_associations(&self) -> &BTreeSet<AssociationTag> {
        &self.current_sleep_associations
    }

    pub fn previous_attempts(&self) -> &BTreeSet<AttemptTag> {
        &self.previous_attempts
    }

    /// 1 = minimal crying only, 5 = fastest/most direct.
    pub fn crying_tolerance(&self) -> u8 {
        self.crying_tolerance
    }

    pub fn partner_alignment(&self) -> PartnerAlignment {
        self.partner_alignment
    }

    pub fn current_wake_time(&self) -> ClockTime {
        self.current_wake_time
    }

    pub fn current_bedtime(&self) -> ClockTime {
        self.current_bedtime
    }

    pub fn current_nap_count(&self) -> u8 {
        self.current_nap_count
    }

    pub fn medical_concerns(&self) -> &BTreeSet<ConcernTag> {
        &self.medical_concerns
    }

    pub fn has_medical_concerns(&self) -> bool {
        self.medical_concerns.iter().any(|c| *c != ConcernTag::None)
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Copy the answers into a fresh draft for editing.
    pub fn to_draft(&self) -> AssessmentDraft {
        AssessmentDraft {
            baby_name: self.baby_name.clone(),
            baby_age_months: self.baby_age_months,
            main_problems: self.main_problems.clone(),
            night_wakings: self.night_wakings,
            current_sleep_associations: self.current_sleep_associations.clone(),
            previous_attempts: self.previous_attempts.clone(),
            crying_tolerance: self.crying_tolerance,
            partner_alignment: Some(self.partner_alignment),
            current_wake_time: Some(self.current_wake_time),
            current_bedtime: Some(self.current_bedtime),
            current_nap_count: self.current_nap_count,
            medical_concerns: self.medical_concerns.clone(),
        }
    }
}

// ── Repository ───────────────────────────────────────────────────────

/// Keeps exactly one active assessment per store.
pub struct AssessmentRepository<'a, S: KvStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KvStore + ?Sized> AssessmentRepository<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The active record, if one has been completed.
    pub fn active(&self) -> Result<Option<AssessmentRecord>> {
        match self.store.load(ACTIVE_ASSESSMENT_KEY)? {
            Some(json) => {
                let record = serde_json::from_str(&json).map_err(|source| StorageError::Malformed {
                    key: ACTIVE_ASSESSMENT_KEY.to_string(),
                    source,
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Superseded records, oldest first.
    pub fn history(&self) -> Result<Vec<AssessmentRecord>> {
        match self.store.load(ASSESSMENT_HISTORY_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json).map_err(|source| StorageError::Malformed {
                key: ASSESSMENT_HISTORY_KEY.to_string(),
                source,
            })?),
            None => Ok(Vec::new()),
        }
    }

    /// Make `record` the active assessment.
    ///
    /// The previous record moves to history and any night program tied to it
    /// is discarded. Returns `true` when a program was discarded.
    pub fn replace_active(&self, record: &AssessmentRecord) -> Result<bool> {
        if let Some(previous) = self.active()? {
            if previous == *record {
                return Ok(false);
            }
            let mut history = match self.history() {
                Ok(history) => history,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "assessment history is unreadable; moving it aside and starting a new one"
                    );
                    if let Some(raw) = self.store.load(ASSESSMENT_HISTORY_KEY)? {
                        self.store.save(CORRUPT_HISTORY_KEY, &raw)?;
                    }
                    Vec::new()
                }
            };
            history.push(previous);
            self.store
                .save(ASSESSMENT_HISTORY_KEY, &serde_json::to_string(&history)?)?;
        }
        self.store
            .save(ACTIVE_ASSESSMENT_KEY, &serde_json::to_string(record)?)?;

        let had_program = self.store.load(PROGRAM_KEY)?.is_some();
        if had_program {
            self.store.remove(PROGRAM_KEY)?;
            tracing::info!(
                baby = record.baby_name(),
                "assessment replaced; previous night program discarded"
            );
        }
        Ok(had_program)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// A complete draft for a 10-month-old with mid-range answers.
    pub fn draft() -> AssessmentDraft {
        AssessmentDraft {
            baby_name: "Mila".into(),
            baby_age_months: 10,
            main_problems: BTreeSet::from([ProblemTag::NightWakings]),
            night_wakings: 3,
            current_sleep_associations: BTreeSet::from([AssociationTag::Feeding]),
            previous_attempts: BTreeSet::from([AttemptTag::None]),
            crying_tolerance: 3,
            partner_alignment: Some(PartnerAlignment::Aligned),
            current_wake_time: ClockTime::new(7, 0),
            current_bedtime: ClockTime::new(19, 30),
            current_nap_count: 2,
            medical_concerns: BTreeSet::new(),
        }
    }

    pub fn completed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap()
    }

    pub fn record_with(tolerance: u8, age_months: u32) -> AssessmentRecord {
        let mut d = draft();
        d.crying_tolerance = tolerance;
        d.baby_age_months = age_months;
        d.complete(completed_at()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn clock_time_parses_and_displays() {
        let t: ClockTime = "07:05".parse().unwrap();
        assert_eq!(t.hour(), 7);
        assert_eq!(t.minute(), 5);
        assert_eq!(t.to_string(), "07:05");
        assert_eq!(t.to_12h_string(), "7:05 AM");
        assert!("7pm".parse::<ClockTime>().is_err());
    }

    #[test]
    fn clock_time_wraps_past_midnight() {
        let t = ClockTime::from_minutes_of_day(24 * 60 + 30);
        assert_eq!(t.to_string(), "00:30");
    }

    #[test]
    fn complete_defaults_medical_concerns_to_none() {
        let record = draft().complete(completed_at()).unwrap();
        assert_eq!(
            record.medical_concerns(),
            &BTreeSet::from([ConcernTag::None])
        );
        assert!(!record.has_medical_concerns());
    }

    #[test]
    fn complete_rejects_empty_required_sets() {
        let mut d = draft();
        d.previous_attempts.clear();
        assert_eq!(
            d.complete(completed_at()).unwrap_err(),
            ValidationError::EmptySelection("previous_attempts")
        );
    }

    #[test]
    fn complete_rejects_out_of_range_tolerance() {
        let mut d = draft();
        d.crying_tolerance = 6;
        assert!(matches!(
            d.complete(completed_at()),
            Err(ValidationError::OutOfRange { field: "crying_tolerance", .. })
        ));
    }

    #[test]
    fn complete_rejects_blank_name() {
        let mut d = draft();
        d.baby_name = "   ".into();
        assert_eq!(
            d.complete(completed_at()),
            Err(ValidationError::Blank("baby_name"))
        );
    }

    #[test]
    fn complete_rejects_nap_count_outside_one_to_four() {
        for naps in [0, 5] {
            let mut d = draft();
            d.current_nap_count = naps;
            assert_eq!(
                d.complete(completed_at()),
                Err(ValidationError::OutOfRange {
                    field: "current_nap_count",
                    min: 1,
                    max: 4,
                    value: i64::from(naps),
                })
            );
        }
        let mut d = draft();
        d.current_nap_count = 4;
        assert!(d.complete(completed_at()).is_ok());
    }

    #[test]
    fn complete_caps_night_wakings_at_eight() {
        let mut d = draft();
        d.night_wakings = 12;
        assert_eq!(d.complete(completed_at()).unwrap().night_wakings(), 8);
    }

    #[test]
    fn draft_deserializes_kebab_case_tags() {
        let json = r#"{
            "baby_name": "Otto",
            "baby_age_months": 6,
            "main_problems": ["night-wakings", "feed-to-sleep"],
            "night_wakings": 4,
            "current_sleep_associations": ["co-sleeping"],
            "previous_attempts": ["pupd"],
            "crying_tolerance": 3,
            "partner_alignment": "not-aligned",
            "current_wake_time": "06:45",
            "current_bedtime": "19:15",
            "current_nap_count": 3
        }"#;
        let d: AssessmentDraft = serde_json::from_str(json).unwrap();
        let record = d.complete(completed_at()).unwrap();
        assert!(record.previous_attempts().contains(&AttemptTag::Pupd));
        assert_eq!(record.partner_alignment(), PartnerAlignment::NotAligned);
    }

    #[test]
    fn replace_active_archives_and_discards_program() {
        let store = MemoryStore::new();
        let repo = AssessmentRepository::new(&store);
        let first = record_with(3, 10);
        assert!(!repo.replace_active(&first).unwrap());

        store.save(PROGRAM_KEY, "{}").unwrap();
        let mut edited = first.to_draft();
        edited.crying_tolerance = 5;
        let second = edited
            .complete(completed_at() + chrono::Duration::days(1))
            .unwrap();

        assert!(repo.replace_active(&second).unwrap());
        assert_eq!(repo.active().unwrap(), Some(second));
        assert_eq!(repo.history().unwrap(), vec![first]);
        assert!(store.load(PROGRAM_KEY).unwrap().is_none());
    }

    #[test]
    fn corrupt_history_is_moved_aside_not_lost() {
        let store = MemoryStore::new();
        let repo = AssessmentRepository::new(&store);
        let first = record_with(3, 10);
        repo.replace_active(&first).unwrap();
        store.save(ASSESSMENT_HISTORY_KEY, "[not json").unwrap();

        let second = record_with(4, 10)
            .to_draft()
            .complete(completed_at() + chrono::Duration::days(1))
            .unwrap();
        repo.replace_active(&second).unwrap();

        assert_eq!(repo.history().unwrap(), vec![first]);
        assert_eq!(
            store.load(CORRUPT_HISTORY_KEY).unwrap().as_deref(),
            Some("[not json")
        );
    }
}
