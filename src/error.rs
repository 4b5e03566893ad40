//! Error types for fb-export.
//!
//! Every failure is fatal to the run that encounters it. Errors propagate to
//! the binary, which prints them and exits non-zero.

use std::io;
use std::path::PathBuf;

/// Error type for extraction and output operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A requested category, output format or name is not configured or not allowed.
    #[error("{name} is not a valid {kind}. Enter one of: {options}")]
    InvalidConfiguration {
        /// What was being looked up (e.g. "section", "output type").
        kind: &'static str,
        /// The rejected value.
        name: String,
        /// The accepted values, comma separated.
        options: String,
    },

    /// An export document could not be opened or read.
    #[error("document not found: {}", .path.display())]
    DocumentNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The list element expected at a fixed position does not exist.
    #[error(
        "unexpected document structure in {document}: no <{tag}> at position {position} ({found} found)"
    )]
    UnexpectedStructure {
        document: String,
        tag: String,
        position: usize,
        found: usize,
    },

    /// A record line has no `:` separating field name from value.
    #[error("malformed record field in {subsection} record {record}: {line:?} has no ':' delimiter")]
    MalformedField {
        subsection: String,
        record: usize,
        line: String,
    },

    /// An output directory or file could not be created or written.
    #[error("output unwritable: {}", .path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Builds an `InvalidConfiguration` error from the rejected value and the accepted ones.
    pub(crate) fn invalid<I, S>(kind: &'static str, name: &str, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let options = options
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self::InvalidConfiguration {
            kind,
            name: name.to_string(),
            options,
        }
    }
}

/// Result type alias for fb-export operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_configuration_lists_options() {
        let err = Error::invalid("section", "photos", ["security", "apps"]);
        assert_eq!(
            err.to_string(),
            "photos is not a valid section. Enter one of: security, apps"
        );
    }

    #[test]
    fn io_errors_are_exposed_as_source() {
        use std::error::Error as _;

        let err = Error::OutputUnwritable {
            path: PathBuf::from("/nope/data"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "output unwritable: /nope/data");
        assert!(err.source().is_some());
    }
}
