use clap::Args;
use lullaby_core::{generate, ClockTime, Config, DailySchedule, ScheduleRequest};

use super::{print_json, CliResult};

#[derive(Args)]
pub struct ScheduleArgs {
    /// Baby's age in months
    #[arg(long)]
    age: u32,
    /// Morning wake time (HH:MM)
    #[arg(long)]
    wake: ClockTime,
    /// Naps the baby takes today
    #[arg(long)]
    naps: u8,
    /// Current bedtime (HH:MM), to report the suggested shift
    #[arg(long)]
    bedtime: Option<ClockTime>,
    /// Print a plain-text timeline instead of JSON
    #[arg(long)]
    text: bool,
}

pub fn run(args: ScheduleArgs) -> CliResult {
    let schedule = generate(&ScheduleRequest {
        age_months: args.age,
        wake_time: args.wake,
        current_nap_count: args.naps,
        current_bedtime: args.bedtime,
    });

    if args.text {
        let config = Config::load_or_default();
        print_timeline(&schedule, config.display.use_24h_clock);
        Ok(())
    } else {
        print_json(&schedule)
    }
}

fn print_timeline(schedule: &DailySchedule, use_24h_clock: bool) {
    for event in &schedule.events {
        let time = if use_24h_clock {
            event.time.to_string()
        } else {
            event.time.to_12h_string()
        };
        let next_day = if event.day_offset > 0 { " (+1 day)" } else { "" };
        match &event.note {
            Some(note) => println!("{time:>8}{next_day}  {}  ({note})", event.label),
            None => println!("{time:>8}{next_day}  {}", event.label),
        }
    }
    if !schedule.nap_count_matches {
        println!(
            "note: {} naps today, {} recommended",
            schedule.current_nap_count, schedule.recommended_naps
        );
    }
    if let Some(shift) = schedule.bedtime_shift_minutes.filter(|s| *s != 0) {
        let direction = if shift > 0 { "later" } else { "earlier" };
        println!("note: move bedtime {} min {direction}", shift.abs());
    }
}
