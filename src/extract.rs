use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

use crate::api::{self, UserRecord};
use crate::config::Settings;
use crate::db;

/// Stage 1: fetch the roster and replace the staging table with it.
///
/// An empty payload is a soft condition: nothing is fetched, no database
/// connection is opened, and staging keeps whatever it held before.
pub async fn run(settings: &Settings) -> Result<usize> {
    let token = settings.bearer_token()?;
    let records = api::fetch_users(&settings.api_url, &token).await?;
    if records.is_empty() {
        info!("Roster API returned no records; staging left untouched");
        return Ok(0);
    }
    let conn = db::connect(&settings.db_path)?;
    stage_records(&conn, &records)
}

/// Write fetched records into staging. Empty input never touches the
/// table (it is not even created); non-empty input replaces it wholesale.
pub fn stage_records(conn: &Connection, records: &[UserRecord]) -> Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }
    db::ensure_staging(conn)?;
    db::replace_staging(conn, records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, id_number: f64, national_id: &str) -> UserRecord {
        UserRecord {
            name: Some(name.to_string()),
            id_number: Some(id_number),
            national_id: Some(national_id.to_string()),
        }
    }

    #[test]
    fn stage_records_replaces_staging() {
        let conn = Connection::open_in_memory().unwrap();
        stage_records(&conn, &[rec("Ana", 1.0, "111")]).unwrap();
        let second = vec![rec("Bruno", 2.0, "222"), rec("Carla", 3.0, "333")];
        let n = stage_records(&conn, &second).unwrap();
        assert_eq!(n, 2);
        assert_eq!(db::staging_rows(&conn).unwrap(), second);
    }

    #[test]
    fn empty_input_leaves_existing_rows() {
        let conn = Connection::open_in_memory().unwrap();
        let records = vec![rec("Ana", 1.0, "111")];
        stage_records(&conn, &records).unwrap();
        assert_eq!(stage_records(&conn, &[]).unwrap(), 0);
        assert_eq!(db::staging_rows(&conn).unwrap(), records);
    }

    #[test]
    fn empty_input_does_not_create_the_table() {
        let conn = Connection::open_in_memory().unwrap();
        stage_records(&conn, &[]).unwrap();
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master
                 WHERE type = 'table' AND name = 'staging_users')",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert!(!exists);
    }
}
