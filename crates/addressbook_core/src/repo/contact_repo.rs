//! Contact storage gateway over a single SQLite file.
//!
//! # Responsibility
//! - Create the `Contact` table, upsert rows, list rows and widen the schema.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every operation opens its own connection and drops it on every exit path.
//! - Upserts replace the whole row keyed by `CustomerID`; there is no patching.
//! - Read paths reject NULL in never-null columns instead of masking it.
//! - `add_column` trusts its type declaration; only the column name is checked.

use crate::db::schema::{contact_columns, CONTACT_TABLE, CREATE_CONTACT_TABLE_SQL};
use crate::db::{open_db, DbError};
use crate::model::contact::{Contact, ContactField, FieldDefault};
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

static COLUMN_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("column name pattern is valid")
});

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage gateway error.
#[derive(Debug)]
pub enum StoreError {
    /// No connection could be established; the operation did not run.
    Connection(DbError),
    /// DDL statement rejected (duplicate column, bad type, ...).
    Schema {
        operation: &'static str,
        source: rusqlite::Error,
    },
    /// Read/write statement failed.
    Query(rusqlite::Error),
    InvalidColumnName(String),
    InvalidData(String),
}

impl StoreError {
    /// Whether the operation failed before reaching the database.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "connection failed: {err}"),
            Self::Schema { operation, source } => {
                write!(f, "schema change `{operation}` failed: {source}")
            }
            Self::Query(err) => write!(f, "{err}"),
            Self::InvalidColumnName(name) => write!(
                f,
                "invalid column name `{name}`; expected letters, digits and underscores"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Schema { source, .. } => Some(source),
            Self::Query(err) => Some(err),
            Self::InvalidColumnName(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Connection(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Query(value)
    }
}

/// SQLite-backed contact store addressed by file path.
#[derive(Debug, Clone)]
pub struct ContactStore {
    path: PathBuf,
}

impl ContactStore {
    /// Creates a gateway for the database at `path`. No connection is opened.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the `Contact` table when absent. Safe to call repeatedly.
    pub fn init_schema(&self) -> StoreResult<()> {
        self.with_connection("init_schema", |conn| {
            conn.execute_batch(CREATE_CONTACT_TABLE_SQL)
                .map_err(|source| StoreError::Schema {
                    operation: "init_schema",
                    source,
                })
        })
    }

    /// Inserts `contact`, or replaces every column of the row with its id.
    pub fn upsert(&self, contact: &Contact) -> StoreResult<()> {
        let sql = format!(
            "INSERT OR REPLACE INTO {CONTACT_TABLE} ({}) VALUES ({});",
            contact_columns(),
            placeholders(ContactField::ALL.len())
        );
        self.with_connection("upsert", |conn| {
            conn.execute(
                &sql,
                params_from_iter(ContactField::ALL.iter().map(|field| contact.get(*field))),
            )?;
            Ok(())
        })
    }

    /// Reads every row. Order is whatever SQLite yields; no sorting applied.
    pub fn list_all(&self) -> StoreResult<Vec<Contact>> {
        self.with_connection("list_all", |conn| {
            let mut stmt = conn.prepare(&format!("SELECT * FROM {CONTACT_TABLE};"))?;
            let mut rows = stmt.query([])?;
            let mut contacts = Vec::new();

            while let Some(row) = rows.next()? {
                contacts.push(parse_contact_row(row)?);
            }

            Ok(contacts)
        })
    }

    /// Adds column `name` declared as `type_decl` to the contact table.
    ///
    /// `type_decl` is spliced into the DDL verbatim and must come from a
    /// trusted operator, never from document content.
    ///
    /// # Errors
    /// - `StoreError::InvalidColumnName` before any connection is opened.
    /// - `StoreError::Schema` when SQLite rejects the change (e.g. duplicate).
    pub fn add_column(&self, name: &str, type_decl: &str) -> StoreResult<()> {
        if !COLUMN_NAME_PATTERN.is_match(name) {
            return Err(StoreError::InvalidColumnName(name.to_string()));
        }

        let sql = format!("ALTER TABLE {CONTACT_TABLE} ADD COLUMN {name} {type_decl};");
        self.with_connection("add_column", |conn| {
            conn.execute_batch(&sql)
                .map_err(|source| StoreError::Schema {
                    operation: "add_column",
                    source,
                })
        })
    }

    fn with_connection<T>(
        &self,
        operation: &'static str,
        body: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        let conn = open_db(&self.path).map_err(|err| {
            error!(
                "event=contact_store module=repo op={} status=error duration_ms={} error_code=connection_failed error={}",
                operation,
                started_at.elapsed().as_millis(),
                err
            );
            StoreError::from(err)
        })?;

        let result = body(&conn);
        drop(conn);

        match &result {
            Ok(_) => info!(
                "event=contact_store module=repo op={} status=ok duration_ms={}",
                operation,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=contact_store module=repo op={} status=error duration_ms={} error={}",
                operation,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

fn parse_contact_row(row: &Row<'_>) -> StoreResult<Contact> {
    let mut contact = Contact::default();
    for field in ContactField::ALL {
        let value: Option<String> = row.get(field.column())?;
        if value.is_none() && field.default_policy() == FieldDefault::EmptyString {
            return Err(StoreError::InvalidData(format!(
                "NULL in {CONTACT_TABLE}.{}",
                field.column()
            )));
        }
        contact.set(field, value);
    }
    Ok(contact)
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::{placeholders, COLUMN_NAME_PATTERN};

    #[test]
    fn placeholders_are_numbered_from_one() {
        assert_eq!(placeholders(3), "?1, ?2, ?3");
    }

    #[test]
    fn column_name_pattern_accepts_identifiers_only() {
        assert!(COLUMN_NAME_PATTERN.is_match("Birthday"));
        assert!(COLUMN_NAME_PATTERN.is_match("_notes2"));
        assert!(!COLUMN_NAME_PATTERN.is_match("2fast"));
        assert!(!COLUMN_NAME_PATTERN.is_match("x; DROP TABLE Contact"));
        assert!(!COLUMN_NAME_PATTERN.is_match(""));
    }
}
