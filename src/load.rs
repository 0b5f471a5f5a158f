use anyhow::Result;

use crate::config::Settings;
use crate::db;

/// Stage 2: publish staging into the final table. All-or-nothing: any
/// failure inside the copy rolls back and the previously published rows
/// survive. Expects staging to exist; running it first is the pipeline's
/// ordering contract.
pub fn run(settings: &Settings) -> Result<usize> {
    let conn = db::connect(&settings.db_path)?;
    db::ensure_final(&conn)?;
    db::publish_users(&conn)
}
