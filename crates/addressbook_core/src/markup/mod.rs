//! Address-book markup input.
//!
//! # Responsibility
//! - Load XML documents into an owned tree (`document`).
//! - Map contact elements into domain records (`mapper`).
//!
//! # Invariants
//! - Load failures are fatal to an import run; mapping itself never fails.

pub mod document;
pub mod mapper;
