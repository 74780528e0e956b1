pub mod assessment;
pub mod config;
pub mod countdown;
pub mod plan;
pub mod program;
pub mod schedule;

use lullaby_core::{AssessmentRecord, AssessmentRepository, Database};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Pretty-print any serializable value to stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The active assessment, or an error telling the user to import one.
pub fn require_assessment(db: &Database) -> Result<AssessmentRecord, Box<dyn std::error::Error>> {
    AssessmentRepository::new(db)
        .active()?
        .ok_or_else(|| "no assessment yet; run `lullaby assessment import <file.json>` first".into())
}
