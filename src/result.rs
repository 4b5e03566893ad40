//! Extraction output types.
//!
//! A [`Packet`] holds one subsection's rows together with its column schema.
//! Packets are built by the extractor and handed to the writer unchanged.

use crate::error::{Error, Result};

/// One extracted record: an ordered mapping from column name to value.
///
/// Field order is insertion order. Inserting a name that is already present
/// replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Returns the value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// One subsection's extracted data plus its column schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    category: String,
    subcategory: String,
    column_names: Vec<String>,
    rows: Vec<Row>,
}

impl Packet {
    /// Builds a packet, checking that both names are usable as a single path
    /// component and that every row key is one of `column_names`.
    pub fn new(
        category: impl Into<String>,
        subcategory: impl Into<String>,
        column_names: Vec<String>,
        rows: Vec<Row>,
    ) -> Result<Self> {
        let category = category.into();
        let subcategory = subcategory.into();
        check_path_component("category", &category)?;
        check_path_component("subcategory", &subcategory)?;

        for row in &rows {
            if let Some(key) = row.keys().find(|k| !column_names.iter().any(|c| c == k)) {
                return Err(Error::invalid("column", key, &column_names));
            }
        }

        Ok(Self {
            category,
            subcategory,
            column_names,
            rows,
        })
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Rows in source document order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

/// Rejects names that would escape or nest under the output directory.
pub(crate) fn check_path_component(kind: &'static str, name: &str) -> Result<()> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if unsafe_name {
        return Err(Error::InvalidConfiguration {
            kind,
            name: format!("{name:?}"),
            options: "a non-empty name without path separators".to_string(),
        });
    }
    Ok(())
}
