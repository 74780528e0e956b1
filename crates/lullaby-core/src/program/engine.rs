//! Night program engine.
//!
//! A poll-driven state machine over [`ProgramState`]. It holds no timers;
//! the host calls [`NightProgramEngine::tick`] periodically (every 30s is
//! plenty) and elapsed time is always recomputed from the persisted
//! `bedtime_started_at`, so a reload mid-bedtime picks up where it left off.
//!
//! ## State Transitions
//!
//! ```text
//! Uninitialized -> Night-pending -> Bedtime-active -> Night-pending
//!                       ^                                   |
//!                       +------- submit_morning_log --------+
//! ```
//!
//! Storage failures are logged and swallowed. Losing a write is tolerable;
//! failing a bedtime session is not.

use chrono::{DateTime, FixedOffset, Utc};

use super::guidance::{guidance_for, NightGuidance};
use super::progress::{progress_message, ProgressMessage};
use super::summary::ProgramSummary;
use super::{CheckInKey, NightLog, ProgramState, PROGRAM_KEY};
use crate::assessment::AssessmentRecord;
use crate::error::LogRejection;
use crate::events::Event;
use crate::storage::{KvStore, ProgramConfig};

/// Elapsed minutes at which the two support prompts fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptThresholds {
    pub first_min: i64,
    pub second_min: i64,
}

impl Default for PromptThresholds {
    fn default() -> Self {
        Self {
            first_min: 20,
            second_min: 60,
        }
    }
}

/// Prompts later than a full day are treated as a day.
const MAX_PROMPT_MIN: i64 = 24 * 60;

impl From<&ProgramConfig> for PromptThresholds {
    fn from(cfg: &ProgramConfig) -> Self {
        let first_min = cfg.first_prompt_min.clamp(0, MAX_PROMPT_MIN);
        Self {
            first_min,
            second_min: cfg
                .second_prompt_min
                .clamp(first_min + 1, MAX_PROMPT_MIN + 1),
        }
    }
}

/// Orchestrates one night program.
pub struct NightProgramEngine<S: KvStore> {
    store: S,
    state: ProgramState,
    /// At most one prompt waits for a response. Not persisted.
    pending: Option<CheckInKey>,
    thresholds: PromptThresholds,
    /// Set when `open` had to start a fresh program. Taken once.
    initialized: Option<Event>,
}

impl<S: KvStore> NightProgramEngine<S> {
    /// Load the persisted program for `assessment`, or start a new one.
    ///
    /// Missing or unreadable state, and state left over from a different
    /// assessment, are replaced by a fresh night-1 program that is saved
    /// immediately.
    pub fn open(store: S, assessment: &AssessmentRecord, now: DateTime<FixedOffset>) -> Self {
        let loaded = load_state(&store).filter(|state| {
            let tied = state.is_tied_to(assessment);
            if !tied {
                tracing::info!(
                    program = %state.id,
                    "stored program belongs to a previous assessment; starting over"
                );
            }
            tied
        });

        let mut engine = match loaded {
            Some(state) => Self {
                store,
                state,
                pending: None,
                thresholds: PromptThresholds::default(),
                initialized: None,
            },
            None => {
                let state = ProgramState::new(assessment, now);
                tracing::info!(
                    program = %state.id,
                    method = %state.method_id,
                    baby = %state.baby_name,
                    "night program initialized"
                );
                let initialized = Some(Event::ProgramInitialized {
                    program_id: state.id.to_string(),
                    method_id: state.method_id,
                    check_in_intervals: state.check_in_intervals.clone(),
                    at: now.with_timezone(&Utc),
                });
                let engine = Self {
                    store,
                    state,
                    pending: None,
                    thresholds: PromptThresholds::default(),
                    initialized,
                };
                engine.persist();
                engine
            }
        };
        engine.repair();
        engine
    }

    /// Replace the default 20/60 minute prompt thresholds.
    pub fn with_thresholds(mut self, thresholds: PromptThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// The `ProgramInitialized` event, if `open` started a new program.
    /// Returns `None` on every later call.
    pub fn take_initialized_event(&mut self) -> Option<Event> {
        self.initialized.take()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &ProgramState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current_night(&self) -> u32 {
        self.state.current_night
    }

    pub fn pending_check_in(&self) -> Option<CheckInKey> {
        self.pending
    }

    /// Whole minutes since bedtime started, clamped at 0.
    /// `None` when no bedtime session is running.
    pub fn elapsed_minutes(&self, now: DateTime<FixedOffset>) -> Option<i64> {
        self.state.bedtime_started_at.map(|started| {
            (now.with_timezone(&Utc) - started).num_minutes().max(0)
        })
    }

    /// Whether to show the "log last night" prompt.
    ///
    /// Compares against the local calendar date carried by `now`.
    pub fn needs_morning_log(&self, now: DateTime<FixedOffset>) -> bool {
        self.state.is_active
            && !self.state.bedtime_active()
            && !self.state.has_log_for(now.date_naive())
    }

    /// Tonight's guidance for the frozen method.
    pub fn guidance(&self) -> NightGuidance {
        guidance_for(
            self.state.method_id,
            self.state.current_night,
            &self.state.baby_name,
        )
    }

    pub fn progress_message(&self) -> Option<ProgressMessage> {
        progress_message(&self.state.night_logs, self.state.current_night)
    }

    pub fn summary(&self) -> ProgramSummary {
        ProgramSummary::from_logs(&self.state.night_logs)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<FixedOffset>) -> Event {
        Event::StateSnapshot {
            method_id: self.state.method_id,
            current_night: self.state.current_night,
            is_active: self.state.is_active,
            bedtime_active: self.state.bedtime_active(),
            elapsed_minutes: self.elapsed_minutes(now),
            pending_check_in: self.pending,
            check_ins_dismissed: self.state.check_ins_dismissed.iter().copied().collect(),
            nights_logged: self.state.night_logs.len(),
            needs_morning_log: self.needs_morning_log(now),
            at: now.with_timezone(&Utc),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a bedtime session. No-op while one is already running.
    pub fn start_bedtime(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        if !self.state.is_active || self.state.bedtime_active() {
            return None;
        }
        let at = now.with_timezone(&Utc);
        self.state.bedtime_started_at = Some(at);
        self.state.check_ins_dismissed.clear();
        self.pending = None;
        self.persist();
        tracing::info!(night = self.state.current_night, "bedtime started");
        Some(Event::BedtimeStarted {
            night: self.state.current_night,
            at,
        })
    }

    /// Call periodically. Returns `Some(Event::CheckInPrompted)` when a
    /// support prompt becomes pending.
    pub fn tick(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        let elapsed = self.elapsed_minutes(now)?;
        tracing::debug!(elapsed_minutes = elapsed, pending = ?self.pending, "bedtime tick");
        if self.pending.is_some() {
            return None;
        }

        let dismissed = &self.state.check_ins_dismissed;
        let key = if elapsed >= self.thresholds.first_min
            && elapsed < self.thresholds.second_min
            && !dismissed.contains(&CheckInKey::TwentyMinutes)
        {
            CheckInKey::TwentyMinutes
        } else if elapsed >= self.thresholds.second_min
            && !dismissed.contains(&CheckInKey::SixtyMinutes)
        {
            CheckInKey::SixtyMinutes
        } else {
            return None;
        };

        self.pending = Some(key);
        tracing::info!(key = %key, elapsed_minutes = elapsed, "check-in prompt raised");
        Some(Event::CheckInPrompted {
            key,
            elapsed_minutes: elapsed,
            at: now.with_timezone(&Utc),
        })
    }

    /// Resolve a check-in prompt.
    ///
    /// The key is always recorded as dismissed for this session. When the
    /// parent wants support the returned event carries what the support
    /// channel needs; otherwise it is a plain dismissal.
    pub fn respond_to_check_in(
        &mut self,
        key: CheckInKey,
        wants_support: bool,
        now: DateTime<FixedOffset>,
    ) -> Event {
        self.state.check_ins_dismissed.insert(key);
        if self.pending == Some(key) {
            self.pending = None;
        }
        self.persist();

        let at = now.with_timezone(&Utc);
        if wants_support {
            tracing::info!(key = %key, "support requested from check-in");
            Event::SupportRequested {
                check_in_key: key,
                baby_name: self.state.baby_name.clone(),
                at,
            }
        } else {
            Event::CheckInDismissed { key, at }
        }
    }

    /// Abandon the running bedtime session. No night is logged.
    pub fn end_bedtime_session(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        let elapsed_minutes = self.elapsed_minutes(now)?;
        self.state.bedtime_started_at = None;
        self.pending = None;
        self.persist();
        tracing::info!(night = self.state.current_night, elapsed_minutes, "bedtime session ended");
        Some(Event::BedtimeEnded {
            night: self.state.current_night,
            elapsed_minutes,
            at: now.with_timezone(&Utc),
        })
    }

    /// Record the morning report and advance to the next night.
    ///
    /// # Errors
    /// Refused when the program is inactive, the mood is out of range, or
    /// a log for `entry.date` already exists. State is unchanged then.
    pub fn submit_morning_log(
        &mut self,
        entry: NightLog,
        now: DateTime<FixedOffset>,
    ) -> Result<Event, LogRejection> {
        if !self.state.is_active {
            return Err(LogRejection::Inactive);
        }
        entry.validate()?;
        if self.state.has_log_for(entry.date) {
            return Err(LogRejection::AlreadyLogged(entry.date));
        }

        let night = self.state.current_night;
        let date = entry.date;
        self.state.night_logs.push(entry);
        self.state.current_night = self.state.night_logs.len() as u32 + 1;
        self.state.bedtime_started_at = None;
        self.state.check_ins_dismissed.clear();
        self.pending = None;
        self.persist();
        tracing::info!(night, %date, "morning log submitted");

        Ok(Event::MorningLogged {
            night,
            date,
            next_night: self.state.current_night,
            at: now.with_timezone(&Utc),
        })
    }

    /// Discard the program entirely.
    pub fn reset(self, now: DateTime<FixedOffset>) -> Event {
        if let Err(e) = self.store.remove(PROGRAM_KEY) {
            tracing::warn!(error = %e, "failed to remove night program");
        }
        tracing::info!(program = %self.state.id, "night program reset");
        Event::ProgramReset {
            at: now.with_timezone(&Utc),
        }
    }

    /// Pick up changes another process wrote to the same program.
    ///
    /// The pending prompt survives unless it was answered or the bedtime
    /// session changed underneath it. Returns `false`, leaving the engine
    /// untouched, when the stored program is gone or was replaced.
    pub fn reload(&mut self) -> bool {
        let Some(stored) = load_state(&self.store) else {
            return false;
        };
        if stored.id != self.state.id {
            return false;
        }
        let session_changed = stored.bedtime_started_at != self.state.bedtime_started_at;
        if session_changed
            || self
                .pending
                .is_some_and(|key| stored.check_ins_dismissed.contains(&key))
        {
            self.pending = None;
        }
        self.state = stored;
        true
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn repair(&mut self) {
        if !self.state.night_count_consistent() {
            tracing::warn!(
                current_night = self.state.current_night,
                logs = self.state.night_logs.len(),
                "current night out of step with night logs; repairing"
            );
            self.state.current_night = self.state.night_logs.len() as u32 + 1;
            self.persist();
        }
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.state) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize night program");
                return;
            }
        };
        if let Err(e) = self.store.save(PROGRAM_KEY, &json) {
            tracing::warn!(error = %e, "failed to persist night program");
        }
    }
}

fn load_state<S: KvStore>(store: &S) -> Option<ProgramState> {
    match store.load(PROGRAM_KEY) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(error = %e, "stored night program is unreadable; reinitializing");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load night program; reinitializing");
            None
        }
    }
}
