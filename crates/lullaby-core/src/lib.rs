//! # Lullaby Core Library
//!
//! This library provides the decision and engine logic behind the Lullaby
//! infant sleep coach. All operations are available through the standalone
//! CLI binary; any GUI is a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Assessment**: validated, immutable questionnaire answers
//! - **Method selection**: a deterministic rule tree from assessment to method
//! - **Schedule**: age-banded nap and bedtime schedule for one day
//! - **Night program**: a wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` during bedtime
//! - **Storage**: key-value persistence (SQLite or in-memory) and TOML config
//!
//! ## Key Components
//!
//! - [`AssessmentRecord`]: the parent's answers
//! - [`select`]: assessment to [`RecommendedMethod`]
//! - [`generate`]: age and wake time to [`DailySchedule`]
//! - [`NightProgramEngine`]: the multi-night program
//! - [`Database`]: on-disk [`KvStore`]
//! - [`Config`]: application configuration

pub mod assessment;
pub mod clock;
pub mod error;
pub mod events;
pub mod method;
pub mod plan;
pub mod program;
pub mod schedule;
pub mod storage;

pub use assessment::{
    AssessmentDraft, AssessmentRecord, AssessmentRepository, AssociationTag, AttemptTag,
    ClockTime, ConcernTag, PartnerAlignment, ProblemTag,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, LogRejection, StorageError, ValidationError};
pub use events::Event;
pub use method::{select, select_method_id, MethodId, RecommendedMethod, SelectionInput};
pub use plan::SleepPlan;
pub use program::{
    CheckInCountdown, CheckInKey, NightGuidance, NightLog, NightProgramEngine, ProgramState,
    ProgramSummary, ProgressMessage, PromptThresholds,
};
pub use schedule::{generate, DailySchedule, ScheduleEvent, ScheduleRequest};
pub use storage::{Config, Database, KvStore, MemoryStore};
