use addressbook_core::{Contact, ContactStore, StoreError};
use rusqlite::Connection;
use std::path::Path;

fn full_contact(id: &str) -> Contact {
    Contact {
        id: id.to_string(),
        company_name: "Test Co.".to_string(),
        name: "John Doe".to_string(),
        title: "Employee".to_string(),
        address: "123 Test St".to_string(),
        city: "Test City".to_string(),
        email: "johndoe@test.com".to_string(),
        region: None,
        zip: Some("12345".to_string()),
        country: "US".to_string(),
        phone: "1234567890".to_string(),
        fax: None,
    }
}

fn ready_store(dir: &tempfile::TempDir) -> ContactStore {
    let store = ContactStore::new(dir.path().join("contacts.sqlite"));
    store.init_schema().unwrap();
    store
}

#[test]
fn upsert_then_list_roundtrips_all_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = ready_store(&dir);

    let contact = full_contact("1");
    store.upsert(&contact).unwrap();

    let listed = store.list_all().unwrap();
    assert_eq!(listed, vec![contact]);
}

#[test]
fn upsert_roundtrips_present_optional_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = ready_store(&dir);

    let mut contact = full_contact("2");
    contact.region = Some("WA".to_string());
    contact.fax = Some("555-0100".to_string());
    contact.zip = None;
    store.upsert(&contact).unwrap();

    assert_eq!(store.list_all().unwrap(), vec![contact]);
}

#[test]
fn upsert_with_existing_id_replaces_whole_row() {
    let dir = tempfile::tempdir().unwrap();
    let store = ready_store(&dir);

    let mut first = full_contact("ALFKI");
    first.fax = Some("030-0076545".to_string());
    store.upsert(&first).unwrap();

    let second = Contact {
        name: "Maria Anders".to_string(),
        ..Contact::with_id("ALFKI")
    };
    store.upsert(&second).unwrap();

    let listed = store.list_all().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], second);
    assert_eq!(listed[0].fax, None);
    assert_eq!(listed[0].company_name, "");
}

#[test]
fn distinct_ids_are_stored_as_distinct_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = ready_store(&dir);

    for id in ["A", "B", "C"] {
        store.upsert(&full_contact(id)).unwrap();
    }

    let mut ids: Vec<String> = store
        .list_all()
        .unwrap()
        .into_iter()
        .map(|contact| contact.id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["A", "B", "C"]);
}

#[test]
fn init_schema_twice_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = ready_store(&dir);
    store.upsert(&full_contact("1")).unwrap();

    store.init_schema().unwrap();

    assert_eq!(store.list_all().unwrap(), vec![full_contact("1")]);
}

#[test]
fn add_column_widens_table_without_breaking_reads() {
    let dir = tempfile::tempdir().unwrap();
    let store = ready_store(&dir);
    store.upsert(&full_contact("1")).unwrap();

    store.add_column("Birthday", "TEXT").unwrap();
    store.upsert(&full_contact("2")).unwrap();

    assert_eq!(column_names(store.path()).last().unwrap(), "Birthday");
    assert_eq!(store.list_all().unwrap().len(), 2);
}

#[test]
fn add_duplicate_column_is_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = ready_store(&dir);

    let err = store.add_column("City", "TEXT").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Schema {
            operation: "add_column",
            ..
        }
    ));
}

#[test]
fn add_column_rejects_non_identifier_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = ready_store(&dir);

    let err = store
        .add_column("x TEXT; DROP TABLE Contact; --", "TEXT")
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidColumnName(_)));
    assert_eq!(column_names(store.path()).len(), 12);
}

#[test]
fn unreachable_database_reports_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = ContactStore::new(dir.path().join("missing").join("contacts.sqlite"));

    let err = store.init_schema().unwrap_err();
    assert!(err.is_connection());
    assert!(matches!(
        store.upsert(&full_contact("1")).unwrap_err(),
        StoreError::Connection(_)
    ));
    assert!(store.list_all().unwrap_err().is_connection());
}

#[test]
fn list_all_before_init_schema_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = ContactStore::new(dir.path().join("contacts.sqlite"));

    let err = store.list_all().unwrap_err();
    assert!(matches!(err, StoreError::Query(_)));
}

#[test]
fn null_in_required_column_is_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let store = ready_store(&dir);

    let conn = Connection::open(store.path()).unwrap();
    conn.execute(
        "INSERT INTO Contact (CustomerID, CompanyName) VALUES ('X', NULL);",
        [],
    )
    .unwrap();
    drop(conn);

    let err = store.list_all().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(message) if message.contains("CompanyName")));
}

fn column_names(path: &Path) -> Vec<String> {
    let conn = Connection::open(path).unwrap();
    let mut stmt = conn.prepare("PRAGMA table_info(Contact);").unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>("name"))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}
