//! SQLite connection bootstrap and schema definition.
//!
//! # Responsibility
//! - Open and configure one SQLite connection per storage call.
//! - Hold the DDL for the `Contact` table.
//!
//! # Invariants
//! - Connections are never cached or pooled; callers drop them when done.
//! - Schema creation is idempotent (`CREATE TABLE IF NOT EXISTS`).

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;
pub mod schema;

pub use open::open_db;

pub type DbResult<T> = Result<T, DbError>;

/// Failure to obtain a usable connection.
#[derive(Debug)]
pub enum DbError {
    /// The database file could not be opened or created.
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    /// The file opened but connection setup failed.
    Bootstrap {
        path: PathBuf,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "failed to open database `{}`: {source}", path.display())
            }
            Self::Bootstrap { path, source } => write!(
                f,
                "failed to configure connection to `{}`: {source}",
                path.display()
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Bootstrap { source, .. } => Some(source),
        }
    }
}
