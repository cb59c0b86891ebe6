//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open (or create) the database file for a single storage call.
//! - Configure connection settings required by the storage gateway.
//!
//! # Invariants
//! - Returned connections have `busy_timeout` set.
//! - Schema is not touched here; `ContactStore::init_schema` owns that.

use super::{DbError, DbResult};
use log::{debug, error};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file, creating it when missing.
///
/// # Side effects
/// - Creates the file if it does not exist (parent directory must exist).
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    debug!("event=db_open module=db status=start path={}", path.display());

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error duration_ms={} error_code=db_open_failed path={} error={}",
                started_at.elapsed().as_millis(),
                path.display(),
                err
            );
            return Err(DbError::Open {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    match conn.busy_timeout(BUSY_TIMEOUT) {
        Ok(()) => {
            debug!(
                "event=db_open module=db status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error duration_ms={} error_code=db_bootstrap_failed path={} error={}",
                started_at.elapsed().as_millis(),
                path.display(),
                err
            );
            Err(DbError::Bootstrap {
                path: path.to_path_buf(),
                source: err,
            })
        }
    }
}
