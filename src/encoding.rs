//! Loading export documents from disk.
//!
//! Export files are normally UTF-8, but older archives were written with a
//! legacy charset declared in a `<meta>` tag. Bytes are decoded according to
//! that declaration before parsing.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use dom_query::Document;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252, X_USER_DEFINED};
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};

/// Only this many leading bytes are searched for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// `<meta charset="...">` or `<meta http-equiv="Content-Type" content="...; charset=...">`.
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s;>]+)"#).expect("valid regex")
});

/// Reads, decodes and parses the document at `path`.
///
/// The file is read in one call, so the handle is closed before parsing
/// starts and on every error path.
pub fn load_document(path: &Path) -> Result<Document> {
    let bytes = fs::read(path).map_err(|source| Error::DocumentNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let html = decode(&bytes);
    debug!(path = %path.display(), bytes = bytes.len(), "loaded document");
    Ok(Document::from(html.as_str()))
}

/// Charset declared in the head of `html`, or UTF-8.
///
/// A `<meta>` declaration found in ASCII-compatible bytes cannot be
/// UTF-16, so UTF-16 labels mean UTF-8 and `x-user-defined` means
/// windows-1252, as in the HTML prescan algorithm.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_LEN)]);
    let declared = META_CHARSET_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        .unwrap_or(UTF_8);

    if declared == UTF_16LE || declared == UTF_16BE {
        UTF_8
    } else if declared == X_USER_DEFINED {
        WINDOWS_1252
    } else {
        declared
    }
}

/// Decodes `html` to a string, replacing invalid sequences with U+FFFD.
///
/// A byte order mark overrides any `<meta>` declaration and is removed.
#[must_use]
pub fn decode(html: &[u8]) -> String {
    let (text, _encoding, _had_errors) = detect_encoding(html).decode(html);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_meta_charset() {
        let html = br#"<html><head><meta charset="windows-1252"></head></html>"#;
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn detects_http_equiv_charset() {
        let html = br#"<META HTTP-EQUIV="content-type" CONTENT="text/html; charset=ISO-8859-1">"#;
        // encoding_rs maps ISO-8859-1 to windows-1252 per WHATWG
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn defaults_to_utf8() {
        assert_eq!(detect_encoding(b"<ul><li>x</li></ul>"), UTF_8);
        assert_eq!(detect_encoding(br#"<meta charset="bogus">"#), UTF_8);
    }

    #[test]
    fn detects_utf16_label_as_utf8() {
        for label in ["utf-16", "UTF-16LE", "utf-16be"] {
            let html = format!(r#"<meta charset="{label}"><ul><li>1.1.1.1</li></ul>"#);
            assert_eq!(detect_encoding(html.as_bytes()), UTF_8);
            assert!(decode(html.as_bytes()).contains("<li>1.1.1.1</li>"));
        }
    }

    #[test]
    fn detects_x_user_defined_as_windows_1252() {
        let html = br#"<meta charset="x-user-defined">"#;
        assert_eq!(detect_encoding(html), WINDOWS_1252);
    }

    #[test]
    fn decodes_legacy_charset() {
        let html = b"<meta charset=\"ISO-8859-1\"><li>Caf\xE9</li>";
        assert!(decode(html).contains("Café"));
    }

    #[test]
    fn strips_utf8_bom() {
        let html = b"\xEF\xBB\xBF<ul></ul>";
        assert_eq!(decode(html), "<ul></ul>");
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        let text = decode(b"<li>1.1.1.1 \xFF</li>");
        assert!(text.contains("1.1.1.1"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn missing_file_is_document_not_found() {
        let Err(err) = load_document(Path::new("does/not/exist.htm")) else {
            panic!("expected DocumentNotFound for a missing file");
        };
        assert!(matches!(err, Error::DocumentNotFound { .. }));
    }
}
