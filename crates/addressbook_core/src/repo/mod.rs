//! Persistence gateway for contacts.
//!
//! # Responsibility
//! - Isolate SQLite statements from the import workflow.
//!
//! # Invariants
//! - Gateway APIs return typed errors; connection failures are never swallowed.

pub mod contact_repo;
