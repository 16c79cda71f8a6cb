//! Section scanning over parsed wiki pages
//!
//! Exposes a page as a document-ordered stream of language headings and
//! preformatted blocks. Nodes are converted lazily, so a scan that stops
//! early never reads the rest of the page.

use super::DocumentNode;
use crate::error::{Error, Result};
use dom_query::{Document, NodeRef, Selection};

/// Language headings inside the article body, plus every preformatted block
pub const SECTION_SELECTOR: &str = "#mw-content-text h2, pre";

/// Element holding a heading's display label
const LABEL_SELECTOR: &str = "span.mw-headline";

/// Parse a fetched page body into a document
pub fn parse_document(page: &str, body: &[u8]) -> Result<Document> {
    let html = std::str::from_utf8(body).map_err(|e| Error::Parse {
        page: page.to_string(),
        reason: format!("body is not valid UTF-8: {}", e),
    })?;

    if html.trim().is_empty() {
        return Err(Error::Parse {
            page: page.to_string(),
            reason: "empty body".to_string(),
        });
    }

    Ok(Document::from(html))
}

/// Iterate a document's headings and code blocks in document order
pub fn section_nodes(doc: &Document) -> impl Iterator<Item = DocumentNode> + '_ {
    doc.select(SECTION_SELECTOR)
        .nodes()
        .to_vec()
        .into_iter()
        .map(to_document_node)
}

fn to_document_node(node: NodeRef<'_>) -> DocumentNode {
    let is_heading = node
        .node_name()
        .map(|name| name.eq_ignore_ascii_case("h2"))
        .unwrap_or(false);
    let sel = Selection::from(node);

    if is_heading {
        DocumentNode::Heading {
            label: heading_label(&sel),
        }
    } else if node
        .ancestors_it(None)
        .any(|a| a.node_name().map_or(false, |n| n.eq_ignore_ascii_case("pre")))
    {
        // Nested blocks are already part of their enclosing block's markup
        DocumentNode::Block { markup: None }
    } else {
        DocumentNode::Block {
            markup: Some(sel.inner_html().to_string()),
        }
    }
}

fn heading_label(heading: &Selection) -> String {
    let label = heading.select(LABEL_SELECTOR);
    if label.exists() {
        label.text().to_string()
    } else {
        heading.text().to_string()
    }
}
