//! Markup loading into an owned element tree.
//!
//! # Responsibility
//! - Read and parse a whole XML document in one pass.
//! - Hand callers a tree that owns its text, so it outlives the source buffer.
//!
//! # Invariants
//! - Element names are stored as written, prefix included (`x:City`).
//! - File bytes are decoded by BOM, then by the XML declaration's
//!   `encoding`, then as UTF-8.
//! - Comments and processing instructions are not part of the tree.
//! - Text is kept verbatim; no trimming or whitespace normalization.

use encoding_rs::{Encoding, UTF_8};
use log::{error, info};
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use roxmltree::ParsingOptions;
use std::borrow::Cow;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

static ENCODING_DECL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^<\?xml\s[^>]*?\bencoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
        .expect("encoding declaration pattern is valid")
});

pub type ParseResult<T> = Result<T, ParseError>;

/// Fatal input error: the document could not be read, decoded or parsed.
#[derive(Debug)]
pub enum ParseError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The XML declaration names an encoding label nobody knows.
    UnsupportedEncoding { path: PathBuf, label: String },
    /// The bytes are not valid in the detected encoding.
    Undecodable {
        path: PathBuf,
        encoding: &'static str,
    },
    Malformed {
        path: Option<PathBuf>,
        source: roxmltree::Error,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read markup `{}`: {source}", path.display())
            }
            Self::UnsupportedEncoding { path, label } => write!(
                f,
                "markup `{}` declares unsupported encoding `{label}`",
                path.display()
            ),
            Self::Undecodable { path, encoding } => write!(
                f,
                "markup `{}` is not valid {encoding}",
                path.display()
            ),
            Self::Malformed {
                path: Some(path),
                source,
            } => write!(f, "malformed markup in `{}`: {source}", path.display()),
            Self::Malformed { path: None, source } => write!(f, "malformed markup: {source}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            Self::UnsupportedEncoding { .. } | Self::Undecodable { .. } => None,
        }
    }
}

/// A node inside an element: either a nested element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element(MarkupElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupElement {
    pub name: String,
    pub children: Vec<MarkupNode>,
}

impl MarkupElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Builder helper: appends a child element.
    pub fn with_child(mut self, child: MarkupElement) -> Self {
        self.children.push(MarkupNode::Element(child));
        self
    }

    /// Direct child elements, in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &MarkupElement> {
        self.children.iter().filter_map(|node| match node {
            MarkupNode::Element(element) => Some(element),
            MarkupNode::Text(_) => None,
        })
    }

    /// First direct child element whose name equals `name` exactly.
    pub fn first_child(&self, name: &str) -> Option<&MarkupElement> {
        self.child_elements().find(|child| child.name == name)
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                MarkupNode::Text(text) => out.push_str(text),
                MarkupNode::Element(element) => element.collect_text(out),
            }
        }
    }

    /// This element and all descendant elements named `name`, pre-order.
    pub fn elements_named<'a>(&'a self, name: &str) -> Vec<&'a MarkupElement> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a MarkupElement>) {
        if self.name == name {
            found.push(self);
        }
        for child in self.child_elements() {
            child.collect_named(name, found);
        }
    }
}

/// Parsed document; owns the whole element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupDocument {
    root: MarkupElement,
}

impl MarkupDocument {
    pub fn new(root: MarkupElement) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &MarkupElement {
        &self.root
    }

    /// Every element named `name` anywhere in the document, in document order.
    pub fn elements_named<'a>(&'a self, name: &str) -> Vec<&'a MarkupElement> {
        self.root.elements_named(name)
    }
}

/// Reads and parses the markup file at `path`.
///
/// # Errors
/// - `ParseError::Io` when the file is missing or unreadable.
/// - `ParseError::UnsupportedEncoding` / `ParseError::Undecodable` when the
///   bytes cannot be turned into text.
/// - `ParseError::Malformed` when the content is not well-formed XML.
pub fn load_document(path: impl AsRef<Path>) -> ParseResult<MarkupDocument> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(
        "event=markup_load module=markup status=start path={}",
        path.display()
    );

    let bytes = std::fs::read(path).map_err(|source| {
        error!(
            "event=markup_load module=markup status=error duration_ms={} error_code=read_failed error={}",
            started_at.elapsed().as_millis(),
            source
        );
        ParseError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let text = decode_markup(&bytes, path).inspect_err(|err| {
        error!(
            "event=markup_load module=markup status=error duration_ms={} error_code=undecodable error={}",
            started_at.elapsed().as_millis(),
            err
        );
    })?;

    let document = parse_tree(&text).map_err(|source| {
        error!(
            "event=markup_load module=markup status=error duration_ms={} error_code=malformed error={}",
            started_at.elapsed().as_millis(),
            source
        );
        ParseError::Malformed {
            path: Some(path.to_path_buf()),
            source,
        }
    })?;

    info!(
        "event=markup_load module=markup status=ok duration_ms={} bytes={}",
        started_at.elapsed().as_millis(),
        bytes.len()
    );
    Ok(document)
}

/// Turns raw file bytes into text. A BOM wins over the declaration.
fn decode_markup<'a>(bytes: &'a [u8], path: &Path) -> ParseResult<Cow<'a, str>> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes, path)?, bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| ParseError::Undecodable {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        })
}

fn declared_encoding(bytes: &[u8], path: &Path) -> ParseResult<&'static Encoding> {
    let Some(captures) = ENCODING_DECL_PATTERN.captures(bytes) else {
        return Ok(UTF_8);
    };
    let label = &captures[1];
    // A declaration readable as ASCII rules out UTF-16, so labels like
    // `UTF-16` collapse to UTF-8 here.
    Encoding::for_label(label)
        .map(Encoding::output_encoding)
        .ok_or_else(|| ParseError::UnsupportedEncoding {
            path: path.to_path_buf(),
            label: String::from_utf8_lossy(label).into_owned(),
        })
}

/// Parses markup already held in memory.
pub fn parse_document(text: &str) -> ParseResult<MarkupDocument> {
    parse_tree(text).map_err(|source| ParseError::Malformed { path: None, source })
}

fn parse_tree(text: &str) -> Result<MarkupDocument, roxmltree::Error> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let parsed = roxmltree::Document::parse_with_options(text, options)?;
    Ok(MarkupDocument::new(convert_element(parsed.root_element())))
}

fn convert_element(node: roxmltree::Node<'_, '_>) -> MarkupElement {
    let mut element = MarkupElement::new(qualified_name(node));
    for child in node.children() {
        if child.is_element() {
            element
                .children
                .push(MarkupNode::Element(convert_element(child)));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.children.push(MarkupNode::Text(text.to_string()));
            }
        }
    }
    element
}

/// Element name as written in the source, e.g. `x:City`.
///
/// Falls back to the local name when the node's source range does not
/// start with its own tag (elements expanded from DTD entities).
fn qualified_name<'i>(node: roxmltree::Node<'_, 'i>) -> &'i str {
    let local = node.tag_name().name();
    let input = node.document().input_text();
    let Some(tail) = input.get(node.range().start..).and_then(|t| t.strip_prefix('<')) else {
        return local;
    };
    let end = tail
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(tail.len());
    let written = &tail[..end];

    match written.strip_suffix(local) {
        Some("") => written,
        Some(prefix) if prefix.ends_with(':') => written,
        _ => local,
    }
}
