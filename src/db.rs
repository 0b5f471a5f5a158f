use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::api::UserRecord;

pub fn connect(path: &str) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("Failed to open {}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn ensure_staging(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS staging_users (
            name        TEXT,
            id_number   NUMERIC,
            national_id TEXT
        );",
    )?;
    Ok(())
}

pub fn ensure_final(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            name        TEXT,
            id_number   NUMERIC,
            national_id TEXT
        );",
    )?;
    Ok(())
}

/// Replace the staging table's contents with `records`. The delete and
/// the insert loop share one transaction, so a failed insert leaves the
/// prior staging contents intact.
pub fn replace_staging(conn: &Connection, records: &[UserRecord]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM staging_users", [])?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO staging_users (name, id_number, national_id) VALUES (?1, ?2, ?3)",
        )?;
        for r in records {
            count += stmt.execute(rusqlite::params![r.name, r.id_number, r.national_id])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

/// Overwrite the published table from staging: delete everything, then
/// insert-select, in one transaction. On error the transaction drops
/// uncommitted and the previously published rows survive.
pub fn publish_users(conn: &Connection) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM users", [])?;
    let copied = tx.execute(
        "INSERT INTO users (name, id_number, national_id)
         SELECT name, id_number, national_id FROM staging_users",
        [],
    )?;
    tx.commit()?;
    Ok(copied)
}

pub fn staging_rows(conn: &Connection) -> Result<Vec<UserRecord>> {
    fetch_rows(conn, "SELECT name, id_number, national_id FROM staging_users")
}

pub fn user_rows(conn: &Connection) -> Result<Vec<UserRecord>> {
    fetch_rows(conn, "SELECT name, id_number, national_id FROM users")
}

fn fetch_rows(conn: &Connection, sql: &str) -> Result<Vec<UserRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(UserRecord {
                name: row.get(0)?,
                id_number: row.get(1)?,
                national_id: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn staging_count(conn: &Connection) -> Result<usize> {
    table_count(conn, "staging_users")
}

pub fn users_count(conn: &Connection) -> Result<usize> {
    table_count(conn, "users")
}

// Tables are created lazily by the stage that needs them, so counts
// treat a missing table as zero rows.
fn table_count(conn: &Connection, table: &str) -> Result<usize> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [table],
        |r| r.get(0),
    )?;
    if !exists {
        return Ok(0);
    }
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
    Ok(count)
}

pub struct Stats {
    pub staged: usize,
    pub published: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    Ok(Stats {
        staged: staging_count(conn)?,
        published: users_count(conn)?,
    })
}
