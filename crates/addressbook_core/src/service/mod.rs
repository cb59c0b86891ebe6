//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate loading, mapping, storage and export into one import run.
//! - Keep the CLI decoupled from storage and markup details.

pub mod import_service;
