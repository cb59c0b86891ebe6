//! Console output for a finished import.

use addressbook_core::{Contact, ImportReport};
use std::path::Path;

/// One line per stored contact: id, name, company, city, country.
pub fn format_contact(contact: &Contact) -> String {
    format!(
        "{} | {} | {} | {} | {}",
        contact.id, contact.name, contact.company_name, contact.city, contact.country
    )
}

pub fn print_report(report: &ImportReport, output: &Path, db: &Path) {
    match &report.listing {
        Some(contacts) => {
            println!("Stored contacts ({}):", contacts.len());
            for contact in contacts {
                println!("  {}", format_contact(contact));
            }
        }
        None => println!("Stored contacts: unavailable"),
    }

    for failure in &report.storage_failures {
        eprintln!("storage error: {failure}");
    }

    println!(
        "Import complete: {} mapped, {} stored.",
        report.contacts_mapped, report.contacts_stored
    );
    println!("JSON output located at {}", output.display());
    println!("DB output located at {}", db.display());
}

#[cfg(test)]
mod tests {
    use super::format_contact;
    use addressbook_core::Contact;

    #[test]
    fn format_contact_uses_pipe_separated_columns() {
        let mut contact = Contact::with_id("ALFKI");
        contact.name = "Maria Anders".to_string();
        contact.company_name = "Alfreds Futterkiste".to_string();
        contact.city = "Berlin".to_string();
        contact.country = "Germany".to_string();

        assert_eq!(
            format_contact(&contact),
            "ALFKI | Maria Anders | Alfreds Futterkiste | Berlin | Germany"
        );
    }
}
