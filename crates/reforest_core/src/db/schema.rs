//! Key-value table creation and version check.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::cmp::Ordering;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const KV_TABLE: &str = "kv_entries";
const KV_ENTRIES_SQL: &str = include_str!("kv_entries.sql");

/// Creates the `kv_entries` table on a fresh database, or checks that an
/// existing one matches this build.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    match found.cmp(&SCHEMA_VERSION) {
        Ordering::Greater => Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        }),
        Ordering::Equal if table_exists(conn, KV_TABLE)? => Ok(()),
        Ordering::Equal => Err(DbError::MissingTable(KV_TABLE)),
        Ordering::Less => {
            let tx = conn.transaction()?;
            tx.execute_batch(KV_ENTRIES_SQL)?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tx.commit()?;
            info!("event=db_schema module=db status=created from={found} to={SCHEMA_VERSION}");
            Ok(())
        }
    }
}

/// Reads the version stored in `PRAGMA user_version`; 0 on a fresh file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn table_exists(conn: &Connection, name: &str) -> DbResult<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [name],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}
