//! `Contact` table definition.

use crate::model::contact::ContactField;

/// Table holding one row per contact.
pub const CONTACT_TABLE: &str = "Contact";

/// Idempotent DDL for the contact table.
pub const CREATE_CONTACT_TABLE_SQL: &str = include_str!("contact_table.sql");

/// Comma-separated column list in canonical field order.
pub fn contact_columns() -> String {
    ContactField::ALL
        .iter()
        .map(|field| field.column())
        .collect::<Vec<_>>()
        .join(", ")
}
