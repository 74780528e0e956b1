use chrono::NaiveDate;
use clap::Subcommand;
use lullaby_core::{
    CheckInKey, Clock, ClockTime, Config, Database, Event, NightLog, NightProgramEngine,
    PromptThresholds, SystemClock,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::{print_json, require_assessment, CliResult};

#[derive(Subcommand)]
pub enum ProgramAction {
    /// Print the current program state as JSON
    Status,
    /// Tonight's guidance and the latest progress message
    Guidance,
    /// Start tonight's bedtime session
    StartBedtime,
    /// Poll once and print any check-in prompt that is due
    Tick,
    /// Poll until the bedtime session ends, printing prompts as they come
    Watch,
    /// Answer a check-in prompt
    Respond {
        /// Prompt key: 20min or 60min
        key: CheckInKey,
        /// Ask for support instead of just dismissing
        #[arg(long)]
        support: bool,
    },
    /// Abandon the running bedtime session without logging the night
    EndBedtime,
    /// Submit the morning log and move on to the next night
    Log {
        /// Minutes it took to fall asleep at bedtime
        #[arg(long)]
        minutes_to_sleep: u32,
        /// Number of night wakings
        #[arg(long)]
        wakings: u32,
        /// Longest sleep stretch in minutes
        #[arg(long)]
        longest_stretch: u32,
        /// Total minutes of crying
        #[arg(long, default_value = "0")]
        crying: u32,
        /// Morning wake time (HH:MM)
        #[arg(long)]
        wake_time: ClockTime,
        /// How you feel this morning, 1 (rough) to 5 (great)
        #[arg(long)]
        mood: u8,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Night date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Summary of every logged night
    History,
    /// Discard the program
    Reset,
}

fn open_engine<'a>(
    db: &'a Database,
    config: &Config,
    clock: &SystemClock,
) -> Result<NightProgramEngine<&'a Database>, Box<dyn std::error::Error>> {
    let record = require_assessment(db)?;
    Ok(NightProgramEngine::open(db, &record, clock.now())
        .with_thresholds(PromptThresholds::from(&config.program)))
}

pub fn run(action: ProgramAction) -> CliResult {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let clock = SystemClock;
    let mut engine = open_engine(&db, &config, &clock)?;
    let now = clock.now();
    let initialized = engine.take_initialized_event();
    if let Some(event) = &initialized {
        tracing::info!(event = ?event, "started a new night program");
    }

    match action {
        ProgramAction::Status => {
            engine.tick(now);
            print_json(&with_field(&engine.snapshot(now), "initialized", &initialized)?)?;
        }
        ProgramAction::Guidance => {
            print_json(&json!({
                "night": engine.current_night(),
                "method_id": engine.state().method_id,
                "guidance": engine.guidance(),
                "progress": engine.progress_message(),
            }))?;
        }
        ProgramAction::StartBedtime => match engine.start_bedtime(now) {
            Some(event) => print_json(&event)?,
            None => print_json(&engine.snapshot(now))?,
        },
        ProgramAction::Tick => match engine.tick(now) {
            Some(event) => print_json(&event)?,
            None => print_json(&engine.snapshot(now))?,
        },
        ProgramAction::Watch => watch(&db, &config, &clock)?,
        ProgramAction::Respond { key, support } => {
            print_json(&engine.respond_to_check_in(key, support, now))?;
        }
        ProgramAction::EndBedtime => match engine.end_bedtime_session(now) {
            Some(event) => print_json(&event)?,
            None => return Err("no bedtime session is running".into()),
        },
        ProgramAction::Log {
            minutes_to_sleep,
            wakings,
            longest_stretch,
            crying,
            wake_time,
            mood,
            notes,
            date,
        } => {
            let entry = NightLog {
                date: date.unwrap_or_else(|| now.date_naive()),
                bedtime_minutes_to_sleep: minutes_to_sleep,
                night_wakings: wakings,
                longest_stretch_minutes: longest_stretch,
                total_crying_minutes: crying,
                morning_wake_time: wake_time,
                parent_mood: mood,
                notes,
            };
            let event = engine.submit_morning_log(entry, now)?;
            print_json(&with_field(&event, "progress", &engine.progress_message())?)?;
        }
        ProgramAction::History => {
            print_json(&json!({
                "summary": engine.summary(),
                "night_logs": engine.state().night_logs,
            }))?;
        }
        ProgramAction::Reset => {
            print_json(&engine.reset(now))?;
        }
    }
    Ok(())
}

/// Serialize `event` and add `key` when `extra` is present, keeping a
/// single JSON document on stdout.
fn with_field<T: Serialize>(
    event: &Event,
    key: &str,
    extra: &Option<T>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut value = serde_json::to_value(event)?;
    if let (Some(extra), Value::Object(map)) = (extra, &mut value) {
        map.insert(key.to_string(), serde_json::to_value(extra)?);
    }
    Ok(value)
}

/// Poll one engine until the bedtime session ends. Answers and session
/// changes made from another shell are picked up through `reload`.
fn watch(db: &Database, config: &Config, clock: &SystemClock) -> CliResult {
    let interval = config.program.poll_interval();
    let mut engine = open_engine(db, config, clock)?;

    loop {
        let now = clock.now();
        if !engine.reload() {
            return Err("the night program was reset while watching".into());
        }
        if !engine.state().bedtime_active() {
            print_json(&engine.snapshot(now))?;
            return Ok(());
        }
        if let Some(event) = engine.tick(now) {
            print_json(&event)?;
        }
        std::thread::sleep(interval);
    }
}
