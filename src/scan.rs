// src/scan.rs
// =============================================================================
// This module inspects a parsed HTML tree for things developers left behind.
//
// Two scans exist:
// - find_comments: every comment node in the document, in document order
// - find_hidden_fields: every element whose type attribute is "hidden"
//   (CSRF tokens, state carriers, debug leftovers)
//
// Both are pure reads over the tree built by the `scraper` crate: nothing is
// mutated, and a document with zero matches yields an empty vector.
//
// Rust concepts:
// - Pattern matching on node kinds (Node::Comment)
// - Iterator chains over a tree's descendants
// =============================================================================

use scraper::{Html, Node, Selector};
use serde::Serialize;

/// One thing the scanner dug up.
///
/// Findings are plain text projections of the tree - they borrow nothing
/// from it and live on after the document is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// An HTML comment, carrying its raw text.
    Comment { text: String },
    /// An element with type="hidden", carrying its full serialized markup.
    HiddenField { markup: String },
}

/// Collects every comment node in the document, in document order.
///
/// The walk covers the entire tree from the document node down, so comments
/// sitting outside the root element (before `<html>`, say) are found too.
pub fn find_comments(document: &Html) -> Vec<Finding> {
    let mut findings = Vec::new();

    for node in document.tree.root().descendants() {
        if let Node::Comment(comment) = node.value() {
            findings.push(Finding::Comment {
                text: comment.comment.to_string(),
            });
        }
    }

    findings
}

/// Collects every element whose `type` attribute equals "hidden".
///
/// Matching follows the selector engine's attribute rules; each hit is
/// reported as the element's full serialized markup so the reader sees
/// name, value, and anything else the author attached.
pub fn find_hidden_fields(document: &Html) -> Vec<Finding> {
    // Constant selector, known to be valid, so unwrap() cannot fire
    let selector = Selector::parse(r#"[type="hidden"]"#).unwrap();

    document
        .select(&selector)
        .map(|element| Finding::HiddenField {
            markup: element.html(),
        })
        .collect()
}
