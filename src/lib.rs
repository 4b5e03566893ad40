//! # fb-export
//!
//! Extracts tabular records from the HTML pages of a Facebook account data
//! export (login IP addresses, recognized machines, installed apps,
//! advertisers holding your contact info) and writes each one to its own
//! CSV file.
//!
//! ## Quick Start
//!
//! ```rust
//! use fb_export::dom;
//! use fb_export::extract::extract_rows;
//! use fb_export::options::Subsection;
//!
//! let doc = dom::parse("<ul><li>1.1.1.1</li><li>2.2.2.2</li></ul>");
//! let sub = Subsection::enumerate("ip_addresses", 0, "Index", "IP Address");
//! let rows = extract_rows(&doc, "security.htm", &sub)?;
//! assert_eq!(rows[1].get("IP Address"), Some("2.2.2.2"));
//! # Ok::<(), fb_export::Error>(())
//! ```
//!
//! A full run reads `facebook_data/html/*.htm` and writes
//! `data/<category>/<subcategory>.csv`; see [`run`].

mod error;
mod patterns;
mod result;

/// DOM lookups and text flattening over `dom_query`.
pub mod dom;

/// Reading and decoding export documents.
pub mod encoding;

/// Locating list elements and turning their items into packets.
pub mod extract;

/// Run configuration and the default export layout.
pub mod options;

/// Output formats and the packet writer.
pub mod writer;

use std::path::PathBuf;

// Public API - re-exports
pub use error::{Error, Result};
pub use extract::Extractor;
pub use options::{Options, RowPolicy, Section, Subsection};
pub use result::{Packet, Row};
pub use writer::{CsvFormat, OutputFormat, PacketFormat, Writer};

/// Extracts every configured section, then writes every packet.
///
/// Nothing is written unless extraction of all sections succeeds. Returns
/// the written file paths in packet order.
pub fn run(options: &Options) -> Result<Vec<PathBuf>> {
    let extractor = Extractor::new(options.clone())?;
    let packets = extractor.extract_all()?;
    Writer::new(&options.output_dir, options.output_format).dump(&packets)
}
