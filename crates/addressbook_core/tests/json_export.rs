use addressbook_core::{to_document, write_document, AddressBook, Contact};
use serde_json::{json, Value};

const CANONICAL_KEYS: [&str; 12] = [
    "id",
    "companyName",
    "name",
    "title",
    "address",
    "city",
    "email",
    "region",
    "zip",
    "country",
    "phone",
    "fax",
];

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn single_contact_document_has_expected_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let book = AddressBook::new(vec![Contact {
        company_name: "Acme".to_string(),
        name: "Jane".to_string(),
        ..Contact::with_id("1")
    }]);

    write_document(&to_document(&book), &path).unwrap();

    assert_eq!(
        read_json(&path),
        json!({
            "contacts": [{
                "id": "1",
                "companyName": "Acme",
                "name": "Jane",
                "title": "",
                "address": "",
                "city": "",
                "email": "",
                "region": null,
                "zip": null,
                "country": "",
                "phone": "",
                "fax": null
            }]
        })
    );
}

#[test]
fn keys_follow_canonical_field_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let book = AddressBook::new(vec![Contact::with_id("1"), Contact::with_id("2")]);

    write_document(&to_document(&book), &path).unwrap();

    let parsed = read_json(&path);
    for contact in parsed["contacts"].as_array().unwrap() {
        let keys: Vec<&str> = contact
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, CANONICAL_KEYS);
    }
}

#[test]
fn empty_book_writes_empty_contacts_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");

    write_document(&to_document(&AddressBook::default()), &path).unwrap();

    assert_eq!(read_json(&path), json!({ "contacts": [] }));
}

#[test]
fn file_uses_four_space_indent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let book = AddressBook::new(vec![Contact::with_id("1")]);

    write_document(&to_document(&book), &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n    \"contacts\": [\n        {\n            \"id\": \"1\""));
}

#[test]
fn write_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    std::fs::write(&path, "x".repeat(4096)).unwrap();

    write_document(&to_document(&AddressBook::default()), &path).unwrap();

    assert_eq!(read_json(&path), json!({ "contacts": [] }));
}

#[test]
fn write_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope").join("out.json");

    let err = write_document(&to_document(&AddressBook::default()), &path).unwrap_err();
    assert!(err.to_string().contains("out.json"));
}
