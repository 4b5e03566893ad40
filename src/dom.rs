//! DOM Operations Adapter
//!
//! Thin layer over `dom_query` with the handful of lookups extraction needs:
//! positional element lookup, element children, and text flattening that
//! keeps the line structure of `<br>` and block elements.

pub use dom_query::{Document, NodeRef, Selection};

use crate::patterns::collapse_whitespace;

/// Elements that start a new line of text before and after their content.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Elements whose text is never visible.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template", "noscript"];

/// Parse an HTML string into a document.
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// All elements named `tag`, in document order.
#[must_use]
pub fn elements_by_tag<'a>(doc: &'a Document, tag: &str) -> Selection<'a> {
    doc.select(tag)
}

/// The element ranked `position` (zero-based) among all `tag` elements in
/// document order.
///
/// Returns the number of `tag` elements found when the rank is out of range.
pub fn nth_element_by_tag<'a>(
    doc: &'a Document,
    tag: &str,
    position: usize,
) -> Result<Selection<'a>, usize> {
    let all = elements_by_tag(doc, tag);
    let nodes = all.nodes();
    nodes
        .get(position)
        .map(|node| Selection::from(*node))
        .ok_or(nodes.len())
}

/// Direct element children, skipping text and comment nodes.
#[must_use]
pub fn element_children<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes()
        .first()
        .map(|node| {
            node.children()
                .into_iter()
                .filter(NodeRef::is_element)
                .map(Selection::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Text as rendered on one line: whitespace collapsed, trimmed.
#[must_use]
pub fn visible_text(sel: &Selection) -> String {
    collapse_whitespace(&flatten_text(sel))
}

/// Non-blank lines of text, each with whitespace collapsed.
///
/// Lines are broken at `<br>`, around block-level elements, and at literal
/// newlines in text nodes.
#[must_use]
pub fn text_lines(sel: &Selection) -> Vec<String> {
    flatten_text(sel)
        .split('\n')
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}

fn flatten_text(sel: &Selection) -> String {
    let mut out = String::new();
    for node in sel.nodes() {
        push_text(node, &mut out);
    }
    out
}

fn push_text(node: &NodeRef, out: &mut String) {
    if node.is_text() {
        out.push_str(&node.text());
        return;
    }
    if !node.is_element() {
        return;
    }

    let tag = node
        .node_name()
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_default();
    if HIDDEN_ELEMENTS.contains(&tag.as_str()) {
        return;
    }
    if tag == "br" {
        out.push('\n');
        return;
    }

    let block = BLOCK_ELEMENTS.contains(&tag.as_str());
    if block {
        out.push('\n');
    }
    for child in node.children() {
        push_text(&child, out);
    }
    if block {
        out.push('\n');
    } else if tag == "td" || tag == "th" {
        out.push(' ');
    }
}
