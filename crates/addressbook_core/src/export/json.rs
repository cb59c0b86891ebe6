//! JSON export of an address book.
//!
//! # Responsibility
//! - Shape contacts into the `{"contacts": [...]}` document.
//! - Write it with a fixed 4-space indent, replacing any existing file.
//!
//! # Invariants
//! - Per-contact keys follow canonical field order.
//! - Absent optional fields are written as `null`, never omitted.

use crate::model::contact::{AddressBook, Contact};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const INDENT: &[u8] = b"    ";

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize(serde_json::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to serialize contacts: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl ExportError {
    /// Sorts a serializer failure: writer errors keep the target path.
    fn from_serializer(path: &Path, err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Io {
                path: path.to_path_buf(),
                source: err.into(),
            }
        } else {
            Self::Serialize(err)
        }
    }
}

/// Top-level exported document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactsDocument {
    pub contacts: Vec<Contact>,
}

/// Builds the export document for `book`, preserving contact order.
pub fn to_document(book: &AddressBook) -> ContactsDocument {
    ContactsDocument {
        contacts: book.contacts().to_vec(),
    }
}

/// Renders `document` as pretty JSON with a 4-space indent.
pub fn render_document(document: &ContactsDocument) -> ExportResult<String> {
    let mut buffer = Vec::new();
    write_pretty(&mut buffer, document).map_err(ExportError::Serialize)?;
    String::from_utf8(buffer).map_err(|err| {
        ExportError::Serialize(serde_json::Error::io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            err,
        )))
    })
}

/// Writes `document` to `path`, truncating any previous content.
pub fn write_document(document: &ContactsDocument, path: impl AsRef<Path>) -> ExportResult<()> {
    let path = path.as_ref();
    let result = File::create(path)
        .map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|file| write_to(file, document, path));

    match &result {
        Ok(()) => info!(
            "event=json_export module=export status=ok contacts={} path={}",
            document.contacts.len(),
            path.display()
        ),
        Err(err) => error!(
            "event=json_export module=export status=error path={} error={}",
            path.display(),
            err
        ),
    }
    result
}

fn write_to<W: Write>(sink: W, document: &ContactsDocument, path: &Path) -> ExportResult<()> {
    let mut writer = BufWriter::new(sink);
    write_pretty(&mut writer, document)
        .map_err(|err| ExportError::from_serializer(path, err))?;
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_pretty<W: Write>(writer: W, document: &ContactsDocument) -> serde_json::Result<()> {
    let mut serializer =
        serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    document.serialize(&mut serializer)
}

#[cfg(test)]
mod tests {
    use super::{render_document, to_document, write_to, ContactsDocument, ExportError};
    use crate::model::contact::{AddressBook, Contact};
    use std::io::{self, Write};
    use std::path::Path;

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn many_contacts(count: usize) -> ContactsDocument {
        ContactsDocument {
            contacts: (0..count).map(|i| Contact::with_id(i.to_string())).collect(),
        }
    }

    #[test]
    fn writer_failure_mid_document_is_io_error_with_path() {
        // Large enough to overflow the buffer while serializing.
        let err = write_to(FullDisk, &many_contacts(500), Path::new("out.json")).unwrap_err();
        assert!(
            matches!(err, ExportError::Io { ref path, .. } if path == Path::new("out.json")),
            "{err:?}"
        );
        assert!(err.to_string().contains("no space left"));
    }

    #[test]
    fn writer_failure_on_flush_is_io_error_with_path() {
        let err = write_to(FullDisk, &many_contacts(1), Path::new("out.json")).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn empty_book_renders_empty_contacts_array() {
        let rendered = render_document(&to_document(&AddressBook::default())).unwrap();
        assert_eq!(rendered, "{\n    \"contacts\": []\n}");
    }

    #[test]
    fn nested_levels_use_four_space_steps() {
        let document = ContactsDocument {
            contacts: vec![Contact::with_id("1")],
        };
        let rendered = render_document(&document).unwrap();
        assert!(rendered.contains("\n    \"contacts\": [\n        {\n            \"id\": \"1\","));
        assert!(rendered.contains("\"fax\": null\n        }"));
    }
}
