//! SQLite bootstrap for the key-value store.
//!
//! # Responsibility
//! - Open file or in-memory connections ready for `SqliteKeyValueStore`.
//! - Own the single `kv_entries` table and its schema version.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A database written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{ensure_schema, schema_version, SCHEMA_VERSION};

pub type DbResult<T> = Result<T, DbError>;

/// Errors raised while opening or preparing the store database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File was written by a build with a newer key-value schema.
    SchemaTooNew { found: u32, supported: u32 },
    /// Version says the schema is current but the table is gone.
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "store schema version {found} is newer than this build supports ({supported})"
            ),
            Self::MissingTable(table) => {
                write!(f, "store schema is marked current but table `{table}` is missing")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
