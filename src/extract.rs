//! Packet extraction from export documents.
//!
//! Each subsection names a list element by its rank among same-tag elements
//! and a policy for turning the list's items into rows. Documents are loaded
//! one at a time; every subsection of a section is read from the same parse.

use tracing::{debug, info};

use crate::dom::{self, Document, Selection};
use crate::encoding::load_document;
use crate::error::{Error, Result};
use crate::options::{Options, RowPolicy, Section, Subsection};
use crate::result::{Packet, Row};

/// Runs the configured extraction against the export on disk.
#[derive(Debug, Clone)]
pub struct Extractor {
    options: Options,
}

impl Extractor {
    /// Creates an extractor after validating `options`.
    pub fn new(options: Options) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Extracts every configured section, in declared order.
    pub fn extract_all(&self) -> Result<Vec<Packet>> {
        let sections: Vec<&Section> = self.options.sections.iter().collect();
        self.extract_sections(&sections)
    }

    /// Extracts the named categories, in the order given.
    ///
    /// Every name is resolved before any document is opened, so an unknown
    /// category fails without touching the filesystem.
    pub fn extract_categories(&self, categories: &[&str]) -> Result<Vec<Packet>> {
        let sections = categories
            .iter()
            .map(|name| self.options.section(name))
            .collect::<Result<Vec<_>>>()?;
        self.extract_sections(&sections)
    }

    fn extract_sections(&self, sections: &[&Section]) -> Result<Vec<Packet>> {
        let mut packets = Vec::new();
        for section in sections {
            let path = self.options.document_path(section);
            info!(section = %section.name, path = %path.display(), "Parsing section");
            let doc = load_document(&path)?;
            packets.extend(extract_section(&doc, section)?);
        }
        Ok(packets)
    }
}

/// Extracts one packet per subsection of `section` from its parsed document.
pub fn extract_section(doc: &Document, section: &Section) -> Result<Vec<Packet>> {
    section
        .subsections
        .iter()
        .map(|sub| extract_packet(doc, section, sub))
        .collect()
}

/// Extracts a single subsection as a packet of `section`'s category.
pub fn extract_packet(doc: &Document, section: &Section, sub: &Subsection) -> Result<Packet> {
    let rows = extract_rows(doc, &section.file, sub)?;
    let columns = column_names(sub, &rows);
    info!(
        category = %section.name,
        subcategory = %sub.name,
        rows = rows.len(),
        "Extracted subsection"
    );
    Packet::new(section.name.as_str(), sub.name.as_str(), columns, rows)
}

/// Locates the subsection's list element and builds one row per item.
///
/// `document` only labels errors.
pub fn extract_rows(doc: &Document, document: &str, sub: &Subsection) -> Result<Vec<Row>> {
    let list = dom::nth_element_by_tag(doc, &sub.list_tag, sub.position).map_err(|found| {
        Error::UnexpectedStructure {
            document: document.to_string(),
            tag: sub.list_tag.clone(),
            position: sub.position,
            found,
        }
    })?;
    let items = dom::element_children(&list);
    debug!(subsection = %sub.name, items = items.len(), "found list items");

    match &sub.policy {
        RowPolicy::Enumerate {
            index_column,
            value_column,
        } => Ok(enumerate_rows(&items, index_column, value_column)),
        RowPolicy::Records { .. } => items
            .iter()
            .enumerate()
            .map(|(record, item)| parse_record(&dom::text_lines(item), &sub.name, record))
            .collect(),
    }
}

/// Column order for a subsection's packet.
///
/// Record columns are the declared ones followed by any other field names,
/// in the order they first appear.
#[must_use]
pub fn column_names(sub: &Subsection, rows: &[Row]) -> Vec<String> {
    match &sub.policy {
        RowPolicy::Enumerate {
            index_column,
            value_column,
        } => vec![index_column.clone(), value_column.clone()],
        RowPolicy::Records { columns } => {
            let mut names = columns.clone();
            for key in rows.iter().flat_map(|row| row.keys()) {
                if !names.iter().any(|n| n == key) {
                    debug!(subsection = %sub.name, column = key, "undeclared record field");
                    names.push(key.to_string());
                }
            }
            names
        }
    }
}

fn enumerate_rows(items: &[Selection], index_column: &str, value_column: &str) -> Vec<Row> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let mut row = Row::new();
            row.insert(index_column, index.to_string());
            row.insert(value_column, dom::visible_text(item));
            row
        })
        .collect()
}

/// Builds a row from `name: value` lines, splitting each on its first colon.
///
/// A line with no colon or with nothing before it is malformed.
fn parse_record(lines: &[String], subsection: &str, record: usize) -> Result<Row> {
    let mut row = Row::new();
    for line in lines {
        let malformed = || Error::MalformedField {
            subsection: subsection.to_string(),
            record,
            line: line.clone(),
        };
        let (name, value) = line.split_once(':').ok_or_else(malformed)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(malformed());
        }
        row.insert(name, value.trim());
    }
    Ok(row)
}
