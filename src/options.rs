//! Run configuration.
//!
//! The `Options` struct fixes everything a run does: where the export lives,
//! where output goes, and which list elements of which documents become
//! which packets. `Options::default()` is the hardcoded configuration the
//! `fb-export` binary runs with.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::result::check_path_component;
use crate::writer::OutputFormat;

/// Configuration for a complete extract-and-write run.
///
/// # Example
///
/// ```rust
/// use fb_export::Options;
///
/// let options = Options {
///     output_dir: "out".into(),
///     ..Options::default()
/// };
/// assert!(options.section("security").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Root of the unpacked export.
    ///
    /// Default: `facebook_data`
    pub base_dir: PathBuf,

    /// Directory under `base_dir` holding the HTML documents.
    ///
    /// Default: `html`
    pub html_dir: PathBuf,

    /// Root directory for written packets.
    ///
    /// Default: `data`
    pub output_dir: PathBuf,

    /// Format of written packets.
    ///
    /// Default: `OutputFormat::Csv`
    pub output_format: OutputFormat,

    /// Sections to extract, in output order.
    ///
    /// Default: [`default_sections`]
    pub sections: Vec<Section>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("facebook_data"),
            html_dir: PathBuf::from("html"),
            output_dir: PathBuf::from("data"),
            output_format: OutputFormat::Csv,
            sections: default_sections(),
        }
    }
}

impl Options {
    /// Path of the document backing `section`.
    #[must_use]
    pub fn document_path(&self, section: &Section) -> PathBuf {
        self.base_dir.join(&self.html_dir).join(&section.file)
    }

    /// Looks up a configured section by name.
    pub fn section(&self, name: &str) -> Result<&Section> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::invalid("section", name, self.sections.iter().map(|s| &s.name)))
    }

    /// Checks that section and subsection names are unique and usable as path components.
    pub fn validate(&self) -> Result<()> {
        let mut sections = HashSet::new();
        for section in &self.sections {
            check_path_component("section", &section.name)?;
            if !sections.insert(section.name.as_str()) {
                return Err(duplicate("section", &section.name));
            }

            let mut subsections = HashSet::new();
            for sub in &section.subsections {
                check_path_component("subsection", &sub.name)?;
                if !subsections.insert(sub.name.as_str()) {
                    return Err(duplicate("subsection", &sub.name));
                }
                if sub.list_tag.is_empty() || !sub.list_tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(Error::InvalidConfiguration {
                        kind: "list tag",
                        name: sub.list_tag.clone(),
                        options: "an HTML tag name such as ul or ol".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn duplicate(kind: &'static str, name: &str) -> Error {
    Error::InvalidConfiguration {
        kind,
        name: name.to_string(),
        options: "a name not already configured".to_string(),
    }
}

/// One export document and the packets extracted from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Category name; also the output directory name.
    pub name: String,
    /// Document file name under the HTML directory.
    pub file: String,
    /// Subsections in output order.
    pub subsections: Vec<Subsection>,
}

/// A list element at a fixed position and how its items become rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    /// Subcategory name; also the output file stem.
    pub name: String,
    /// Tag of the list element, matched case-insensitively.
    pub list_tag: String,
    /// Zero-based rank among all `list_tag` elements in document order.
    pub position: usize,
    pub policy: RowPolicy,
}

impl Subsection {
    /// A `ul` at `position` read with the flat enumeration policy.
    #[must_use]
    pub fn enumerate(name: &str, position: usize, index_column: &str, value_column: &str) -> Self {
        Self {
            name: name.to_string(),
            list_tag: "ul".to_string(),
            position,
            policy: RowPolicy::Enumerate {
                index_column: index_column.to_string(),
                value_column: value_column.to_string(),
            },
        }
    }

    /// A `ul` at `position` read with the field-delimited record policy.
    #[must_use]
    pub fn records(name: &str, position: usize, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            list_tag: "ul".to_string(),
            position,
            policy: RowPolicy::Records {
                columns: columns.iter().map(ToString::to_string).collect(),
            },
        }
    }
}

/// How list items map to rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowPolicy {
    /// One row per item: its zero-based ordinal and its visible text.
    Enumerate {
        index_column: String,
        value_column: String,
    },
    /// One row per item whose text is `name: value` lines.
    ///
    /// `columns` fixes the leading column order; field names not listed are
    /// appended in the order they are first seen.
    Records { columns: Vec<String> },
}

/// Sections of a Facebook account export handled by the default run.
#[must_use]
pub fn default_sections() -> Vec<Section> {
    vec![
        Section {
            name: "security".to_string(),
            file: "security.htm".to_string(),
            subsections: vec![
                Subsection::enumerate("ip_addresses", 1, "Index", "IP Address"),
                Subsection::records(
                    "recognized_machines",
                    2,
                    &["Name", "Created", "Updated", "IP Address", "Browser", "Cookie"],
                ),
            ],
        },
        Section {
            name: "apps".to_string(),
            file: "apps.htm".to_string(),
            subsections: vec![Subsection::enumerate("installed_apps", 0, "Index", "App")],
        },
        Section {
            name: "ads".to_string(),
            file: "ads.htm".to_string(),
            subsections: vec![Subsection::enumerate("advertisers", 1, "Index", "Advertiser")],
        },
    ]
}
