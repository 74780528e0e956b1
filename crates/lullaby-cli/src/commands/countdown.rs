use clap::Args;
use lullaby_core::{CheckInCountdown, Clock, Config, Database, NightProgramEngine, SystemClock};

use super::{print_json, require_assessment, CliResult};

#[derive(Args)]
pub struct CountdownArgs {
    /// Interval minutes, comma separated. Defaults to tonight's intervals.
    #[arg(long, value_delimiter = ',')]
    intervals: Vec<u32>,
    /// Stop after the first interval elapses
    #[arg(long)]
    once: bool,
}

/// Tonight's check-in intervals from the running program.
fn program_intervals(config: &Config, clock: &SystemClock) -> Result<Vec<u32>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let record = require_assessment(&db)?;
    let engine = NightProgramEngine::open(&db, &record, clock.now());
    let intervals = engine
        .guidance()
        .check_in_intervals
        .unwrap_or_else(|| engine.state().check_in_intervals.clone());
    if intervals.is_empty() {
        return Err(format!(
            "{} has no timed check-ins; pass --intervals to use the countdown anyway",
            engine.state().method_id
        )
        .into());
    }
    tracing::debug!(?intervals, repeat_last = config.countdown.repeat_last_interval, "countdown intervals");
    Ok(intervals)
}

pub fn run(args: CountdownArgs) -> CliResult {
    let config = Config::load_or_default();
    let clock = SystemClock;
    let intervals = if args.intervals.is_empty() {
        program_intervals(&config, &clock)?
    } else {
        args.intervals
    };

    let mut countdown = CheckInCountdown::new(intervals, config.countdown.repeat_last_interval);
    let poll = std::time::Duration::from_secs(1);

    if let Some(event) = countdown.start(clock.now()) {
        print_json(&event)?;
    }
    loop {
        std::thread::sleep(poll);
        let now = clock.now();
        let Some(event) = countdown.tick(now) else {
            continue;
        };
        print_json(&event)?;
        if args.once || countdown.is_exhausted() {
            return Ok(());
        }
        if let Some(next) = countdown.start(now) {
            print_json(&next)?;
        }
    }
}
