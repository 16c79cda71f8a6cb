//! Task index parsing
//!
//! A language's index page lists every task it has a solution for as links
//! under `#mw-pages`.

use dom_query::{Document, Selection};
use serde::{Deserialize, Serialize};

/// Task links on a language index page
pub const TASK_LINK_SELECTOR: &str = "#mw-pages a[href]";

/// A task listed on a language's index page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Page name taken from the link target, e.g. `Zero_to_the_zero_power`
    pub name: String,
    /// Link text shown on the index page
    pub display_label: String,
}

impl TaskDescriptor {
    /// Build a descriptor from a link's `href` and text
    pub fn from_link(href: &str, text: &str) -> Option<Self> {
        let name = href.trim_matches('/').rsplit('/').next().unwrap_or("");
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            display_label: text.trim().to_string(),
        })
    }
}

/// Read every task link from an index page, in page order
pub fn parse_task_index(doc: &Document) -> Vec<TaskDescriptor> {
    doc.select(TASK_LINK_SELECTOR)
        .nodes()
        .iter()
        .filter_map(|node| {
            let link = Selection::from(*node);
            let href = link.attr("href")?;
            TaskDescriptor::from_link(&href, &link.text())
        })
        .collect()
}
