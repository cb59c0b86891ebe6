//! Address-book domain model.
//!
//! # Responsibility
//! - Define the canonical contact record used by mapping, storage and export.
//!
//! # Invariants
//! - Contacts are built once per run and never mutated afterwards.
//! - Every projection follows `ContactField::ALL` ordering.

pub mod contact;
