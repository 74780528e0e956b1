use lullaby_core::{Database, SleepPlan};

use super::{print_json, require_assessment, CliResult};

pub fn run() -> CliResult {
    let db = Database::open()?;
    let record = require_assessment(&db)?;
    print_json(&SleepPlan::build(&record))
}
