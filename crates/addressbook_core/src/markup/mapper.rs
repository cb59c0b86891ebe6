//! Markup-to-record mapping.
//!
//! # Responsibility
//! - Turn every `Contact` element into one `Contact` record.
//!
//! # Invariants
//! - Fields are read from direct children only, first match wins.
//! - Missing fields follow `ContactField::default_policy`; mapping never fails.
//! - Output order is document order.

use crate::markup::document::{MarkupDocument, MarkupElement};
use crate::model::contact::{AddressBook, Contact, ContactField, FieldDefault};
use log::debug;

/// Element name that marks one address-book record.
pub const CONTACT_TAG: &str = "Contact";

/// Maps all contact elements of `document` into an address book.
pub fn map_address_book(document: &MarkupDocument) -> AddressBook {
    let contacts: Vec<Contact> = document
        .elements_named(CONTACT_TAG)
        .into_iter()
        .map(map_contact)
        .collect();

    debug!(
        "event=address_book_map module=markup status=ok contacts={}",
        contacts.len()
    );
    AddressBook::new(contacts)
}

/// Maps a single contact element.
pub fn map_contact(element: &MarkupElement) -> Contact {
    let mut contact = Contact::default();
    for field in ContactField::ALL {
        let value = match element.first_child(field.tag()) {
            Some(child) => Some(child.text_content()),
            None => match field.default_policy() {
                FieldDefault::EmptyString => Some(String::new()),
                FieldDefault::Absent => None,
            },
        };
        contact.set(field, value);
    }
    contact
}
