//! Contact and address-book domain model.
//!
//! # Responsibility
//! - Define the canonical contact record shared by mapping, storage and export.
//! - Keep the 12-field table (XML tag, SQL column, JSON key, default policy)
//!   in one place.
//!
//! # Invariants
//! - `ContactField::ALL` is the canonical field order for every projection.
//! - Policy-A fields are never null; policy-B fields may be absent.
//! - `id` is the natural key for storage upserts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default applied when a field is missing from the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// Policy A: missing field becomes `""`.
    EmptyString,
    /// Policy B: missing field stays absent (`None` / SQL NULL / JSON null).
    Absent,
}

/// One of the 12 recognized contact fields, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Id,
    CompanyName,
    Name,
    Title,
    Address,
    City,
    Email,
    Region,
    Zip,
    Country,
    Phone,
    Fax,
}

impl ContactField {
    /// All fields in canonical order.
    pub const ALL: [ContactField; 12] = [
        ContactField::Id,
        ContactField::CompanyName,
        ContactField::Name,
        ContactField::Title,
        ContactField::Address,
        ContactField::City,
        ContactField::Email,
        ContactField::Region,
        ContactField::Zip,
        ContactField::Country,
        ContactField::Phone,
        ContactField::Fax,
    ];

    /// Element tag used by the address-book markup.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Id => "CustomerID",
            Self::CompanyName => "CompanyName",
            Self::Name => "ContactName",
            Self::Title => "ContactTitle",
            Self::Address => "Address",
            Self::City => "City",
            Self::Email => "Email",
            Self::Region => "Region",
            Self::Zip => "PostalCode",
            Self::Country => "Country",
            Self::Phone => "Phone",
            Self::Fax => "Fax",
        }
    }

    /// Column name in the `Contact` table. Same as the markup tag.
    pub fn column(self) -> &'static str {
        self.tag()
    }

    /// Key used in the exported JSON document.
    pub fn json_key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::CompanyName => "companyName",
            Self::Name => "name",
            Self::Title => "title",
            Self::Address => "address",
            Self::City => "city",
            Self::Email => "email",
            Self::Region => "region",
            Self::Zip => "zip",
            Self::Country => "country",
            Self::Phone => "phone",
            Self::Fax => "fax",
        }
    }

    pub fn default_policy(self) -> FieldDefault {
        match self {
            Self::Region | Self::Zip | Self::Fax => FieldDefault::Absent,
            _ => FieldDefault::EmptyString,
        }
    }
}

/// One address-book entry.
///
/// Field declaration order is the canonical order and drives JSON key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Natural key (`CustomerID`). Empty when the source omitted it.
    pub id: String,
    pub company_name: String,
    pub name: String,
    pub title: String,
    pub address: String,
    pub city: String,
    pub email: String,
    pub region: Option<String>,
    pub zip: Option<String>,
    pub country: String,
    pub phone: String,
    pub fax: Option<String>,
}

impl Contact {
    /// Creates a contact with the given id and every other field defaulted
    /// according to its policy.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Returns the value of `field`, `None` meaning absent.
    pub fn get(&self, field: ContactField) -> Option<&str> {
        match field {
            ContactField::Id => Some(self.id.as_str()),
            ContactField::CompanyName => Some(self.company_name.as_str()),
            ContactField::Name => Some(self.name.as_str()),
            ContactField::Title => Some(self.title.as_str()),
            ContactField::Address => Some(self.address.as_str()),
            ContactField::City => Some(self.city.as_str()),
            ContactField::Email => Some(self.email.as_str()),
            ContactField::Region => self.region.as_deref(),
            ContactField::Zip => self.zip.as_deref(),
            ContactField::Country => Some(self.country.as_str()),
            ContactField::Phone => Some(self.phone.as_str()),
            ContactField::Fax => self.fax.as_deref(),
        }
    }

    /// Sets `field`. `None` on a policy-A field stores `""`.
    pub fn set(&mut self, field: ContactField, value: Option<String>) {
        match field {
            ContactField::Region => self.region = value,
            ContactField::Zip => self.zip = value,
            ContactField::Fax => self.fax = value,
            ContactField::Id => self.id = value.unwrap_or_default(),
            ContactField::CompanyName => self.company_name = value.unwrap_or_default(),
            ContactField::Name => self.name = value.unwrap_or_default(),
            ContactField::Title => self.title = value.unwrap_or_default(),
            ContactField::Address => self.address = value.unwrap_or_default(),
            ContactField::City => self.city = value.unwrap_or_default(),
            ContactField::Email => self.email = value.unwrap_or_default(),
            ContactField::Country => self.country = value.unwrap_or_default(),
            ContactField::Phone => self.phone = value.unwrap_or_default(),
        }
    }
}

/// Problem found with contact identities before storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdConflict {
    /// Contact at `index` has an empty `id`.
    EmptyId { index: usize },
    /// `id` occurs at every listed index; later rows replace earlier ones.
    Duplicate { id: String, indices: Vec<usize> },
}

/// Ordered, immutable collection of contacts produced by one mapping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBook {
    contacts: Vec<Contact>,
}

impl AddressBook {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Reports empty ids and ids shared by more than one contact.
    ///
    /// Upserts replace by primary key, so duplicates collapse into one row
    /// (last one wins) and empty ids all share the `""` key.
    pub fn id_conflicts(&self) -> Vec<IdConflict> {
        let mut conflicts = Vec::new();
        let mut seen: BTreeMap<&str, Vec<usize>> = BTreeMap::new();

        for (index, contact) in self.contacts.iter().enumerate() {
            if contact.id.is_empty() {
                conflicts.push(IdConflict::EmptyId { index });
            }
            seen.entry(contact.id.as_str()).or_default().push(index);
        }

        conflicts.extend(
            seen.into_iter()
                .filter(|(_, indices)| indices.len() > 1)
                .map(|(id, indices)| IdConflict::Duplicate {
                    id: id.to_string(),
                    indices,
                }),
        );
        conflicts
    }
}
