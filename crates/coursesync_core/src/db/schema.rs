//! Versioned schema steps for the key-value table.
//!
//! # Invariants
//! - Step versions increase strictly; the applied version lives in `PRAGMA user_version`.
//! - A database stamped with a newer version than this binary knows is never touched.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_kv_store.sql"))];

/// Schema version this binary writes.
pub fn schema_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings the schema up to [`schema_version`] inside one transaction.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let stamped: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let target = schema_version();

    if stamped > target {
        return Err(DbError::NewerSchema {
            found: stamped,
            supported: target,
        });
    }

    let pending: Vec<_> = SCHEMA_STEPS
        .iter()
        .filter(|(version, _)| *version > stamped)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    Ok(())
}
