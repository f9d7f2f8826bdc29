//! Connection bootstrap for the key-value store database.

use super::schema::ensure_schema;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const MEMORY_LOCATION: &str = ":memory:";

/// Opens a store database file and brings its schema up to date.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with(Connection::open(path), &path.display().to_string())
}

/// Opens an in-memory store database and brings its schema up to date.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(Connection::open_in_memory(), MEMORY_LOCATION)
}

fn open_with(opened: rusqlite::Result<Connection>, location: &str) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = if location == MEMORY_LOCATION { "memory" } else { "file" };
    info!("event=db_open module=db status=start mode={mode}");

    let result = opened
        .map_err(|err| DbError::open(location, err))
        .and_then(|mut conn| bootstrap_connection(&mut conn).map(|()| conn));

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error_code={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    // Other page contexts may hold the file lock.
    conn.busy_timeout(Duration::from_secs(5))?;
    ensure_schema(conn)
}
