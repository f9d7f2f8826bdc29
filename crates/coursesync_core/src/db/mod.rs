//! SQLite bootstrap for the persistent key-value store.
//!
//! # Responsibility
//! - Open and configure SQLite connections backing `SqliteKvStore`.
//! - Apply schema steps in deterministic order.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Store code must not read/write entries before the schema is current.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::schema_version;

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open, upgrade or query the key-value database.
#[derive(Debug)]
pub enum DbError {
    /// The database at `location` could not be opened at all.
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build; it is left untouched.
    NewerSchema { found: u32, supported: u32 },
    Sqlite(rusqlite::Error),
}

impl DbError {
    pub(crate) fn open(location: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Open {
            location: location.into(),
            source,
        }
    }

    /// Stable code used in `db_open` log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "db_open_failed",
            Self::NewerSchema { .. } => "db_schema_newer",
            Self::Sqlite(_) => "db_sqlite",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open store database at {location}: {source}")
            }
            Self::NewerSchema { found, supported } => write!(
                f,
                "store schema version {found} was written by a newer build (supported: {supported})"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::NewerSchema { .. } => None,
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
