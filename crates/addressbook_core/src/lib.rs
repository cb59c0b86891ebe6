//! Core import pipeline for address-book documents.
//!
//! Reads contact markup, stores contacts in SQLite and exports them as JSON.

pub mod db;
pub mod export;
pub mod logging;
pub mod markup;
pub mod model;
pub mod repo;
pub mod service;

pub use export::json::{
    render_document, to_document, write_document, ContactsDocument, ExportError, ExportResult,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use markup::document::{
    load_document, parse_document, MarkupDocument, MarkupElement, MarkupNode, ParseError,
    ParseResult,
};
pub use markup::mapper::{map_address_book, map_contact};
pub use model::contact::{AddressBook, Contact, ContactField, FieldDefault, IdConflict};
pub use repo::contact_repo::{ContactStore, StoreError, StoreResult};
pub use service::import_service::{
    ImportError, ImportReport, ImportRequest, ImportResult, ImportService, StorageFailure,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
