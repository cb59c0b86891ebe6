//! Address-book import use case.
//!
//! # Responsibility
//! - Run one pass: schema init, load, map, upsert, export, listing.
//! - Turn storage failures into report entries so export still happens.
//!
//! # Invariants
//! - Input and export failures abort the run; storage failures never do.
//! - A failed schema init skips every later storage call for the run.
//! - Contacts are upserted in document order.

use crate::export::json::{to_document, write_document, ExportError};
use crate::markup::document::{load_document, ParseError};
use crate::markup::mapper::map_address_book;
use crate::model::contact::{Contact, IdConflict};
use crate::repo::contact_repo::{ContactStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Instant;

pub type ImportResult<T> = Result<T, ImportError>;

/// Fatal import failure.
#[derive(Debug)]
pub enum ImportError {
    Parse(ParseError),
    Export(ExportError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<ParseError> for ImportError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<ExportError> for ImportError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

/// Paths for one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    /// Address-book markup to read.
    pub input: PathBuf,
    /// JSON file to create or overwrite.
    pub output: PathBuf,
}

/// Non-fatal storage failure recorded during a run.
#[derive(Debug)]
pub struct StorageFailure {
    /// Gateway operation name (`init_schema`, `upsert`, `list_all`).
    pub operation: &'static str,
    /// Contact being written, for `upsert` failures.
    pub contact_id: Option<String>,
    pub error: StoreError,
}

impl Display for StorageFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.contact_id {
            Some(id) => write!(f, "{} (id `{id}`): {}", self.operation, self.error),
            None => write!(f, "{}: {}", self.operation, self.error),
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub contacts_mapped: usize,
    pub contacts_stored: usize,
    pub id_conflicts: Vec<IdConflict>,
    pub storage_failures: Vec<StorageFailure>,
    /// Rows read back after the upserts; `None` when storage was unavailable
    /// or the read failed.
    pub listing: Option<Vec<Contact>>,
}

impl ImportReport {
    /// True when every storage step succeeded.
    pub fn storage_ok(&self) -> bool {
        self.storage_failures.is_empty()
    }
}

/// Use-case service wrapping a contact store.
pub struct ImportService {
    store: ContactStore,
}

impl ImportService {
    pub fn new(store: ContactStore) -> Self {
        Self { store }
    }

    /// Runs the whole import pass for `request`.
    ///
    /// # Errors
    /// - `ImportError::Parse` when the input cannot be loaded.
    /// - `ImportError::Export` when the JSON file cannot be written.
    pub fn run(&self, request: &ImportRequest) -> ImportResult<ImportReport> {
        let started_at = Instant::now();
        info!(
            "event=import_run module=service status=start input={} output={} db={}",
            request.input.display(),
            request.output.display(),
            self.store.path().display()
        );

        let mut report = ImportReport::default();

        let storage_ready = match self.store.init_schema() {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    "event=import_run module=service op=init_schema status=error error={}",
                    error
                );
                report.storage_failures.push(StorageFailure {
                    operation: "init_schema",
                    contact_id: None,
                    error,
                });
                false
            }
        };

        let document = load_document(&request.input)?;
        let book = map_address_book(&document);
        report.contacts_mapped = book.len();

        report.id_conflicts = book.id_conflicts();
        for conflict in &report.id_conflicts {
            match conflict {
                IdConflict::EmptyId { index } => warn!(
                    "event=contact_id_conflict module=service kind=empty index={}",
                    index
                ),
                IdConflict::Duplicate { id, indices } => warn!(
                    "event=contact_id_conflict module=service kind=duplicate id={} count={}",
                    id,
                    indices.len()
                ),
            }
        }

        if storage_ready {
            for contact in book.contacts() {
                match self.store.upsert(contact) {
                    Ok(()) => report.contacts_stored += 1,
                    Err(error) => {
                        warn!(
                            "event=import_run module=service op=upsert status=error id={} error={}",
                            contact.id, error
                        );
                        report.storage_failures.push(StorageFailure {
                            operation: "upsert",
                            contact_id: Some(contact.id.clone()),
                            error,
                        });
                    }
                }
            }
        } else {
            warn!(
                "event=import_run module=service op=upsert status=skipped contacts={}",
                book.len()
            );
        }

        write_document(&to_document(&book), &request.output)?;

        if storage_ready {
            match self.store.list_all() {
                Ok(contacts) => report.listing = Some(contacts),
                Err(error) => {
                    warn!(
                        "event=import_run module=service op=list_all status=error error={}",
                        error
                    );
                    report.storage_failures.push(StorageFailure {
                        operation: "list_all",
                        contact_id: None,
                        error,
                    });
                }
            }
        }

        info!(
            "event=import_run module=service status=ok duration_ms={} mapped={} stored={} storage_failures={}",
            started_at.elapsed().as_millis(),
            report.contacts_mapped,
            report.contacts_stored,
            report.storage_failures.len()
        );
        Ok(report)
    }
}
