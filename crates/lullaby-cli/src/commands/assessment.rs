use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;
use lullaby_core::{AssessmentDraft, AssessmentRepository, Database};
use serde_json::json;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum AssessmentAction {
    /// Validate answers from a JSON file and make them the active assessment
    Import {
        /// Path to the answers (AssessmentDraft JSON)
        file: PathBuf,
    },
    /// Print the active assessment
    Show,
    /// Print superseded assessments, oldest first
    History,
}

pub fn run(action: AssessmentAction) -> CliResult {
    let db = Database::open()?;
    let repo = AssessmentRepository::new(&db);

    match action {
        AssessmentAction::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .map_err(|e| format!("cannot read {}: {e}", file.display()))?;
            let draft: AssessmentDraft = serde_json::from_str(&raw)?;
            let record = draft.complete(Utc::now())?;
            let program_discarded = repo.replace_active(&record)?;
            print_json(&json!({
                "type": "assessment_completed",
                "baby_name": record.baby_name(),
                "completed_at": record.completed_at(),
                "program_discarded": program_discarded,
            }))?;
        }
        AssessmentAction::Show => match repo.active()? {
            Some(record) => print_json(&record)?,
            None => return Err("no assessment yet".into()),
        },
        AssessmentAction::History => {
            print_json(&repo.history()?)?;
        }
    }
    Ok(())
}
