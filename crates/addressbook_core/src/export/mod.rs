//! Structured-text output of mapped contacts.

pub mod json;
