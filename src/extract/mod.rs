//! Language section extraction from wiki pages
//!
//! This module handles:
//! - Walking a parsed page as an ordered stream of headings and code blocks
//! - Matching that stream against two requested languages
//! - Rendering matched code as language-tagged markup
//! - Reading a language's task index

pub mod matcher;
pub mod render;
pub mod scanner;
pub mod tasks;

pub use matcher::{scan, DualLanguageMatcher, ScanReport, SlotAccumulator};
pub use render::{escape_html, fragment_text, raw_block, render_fragment, sanitize, side_by_side, wrap_block};
pub use scanner::{parse_document, section_nodes};
pub use tasks::{parse_task_index, TaskDescriptor};

use serde::{Deserialize, Serialize};

/// A position in the ordered traversal of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
    /// Start of a named section, carrying its display label
    Heading { label: String },
    /// A preformatted block; `None` when the block could not be read
    Block { markup: Option<String> },
}

impl DocumentNode {
    /// Create a heading node
    pub fn heading(label: &str) -> Self {
        DocumentNode::Heading {
            label: label.to_string(),
        }
    }

    /// Create a block node with the given inner markup
    pub fn block(markup: &str) -> Self {
        DocumentNode::Block {
            markup: Some(markup.to_string()),
        }
    }
}

/// One of the two output accumulators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    First,
    Second,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::First => write!(f, "1"),
            Slot::Second => write!(f, "2"),
        }
    }
}

/// The two requested languages, normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPair {
    pub first: String,
    pub second: String,
}

impl TargetPair {
    /// Create a target pair, normalizing both identifiers
    pub fn new(first: &str, second: &str) -> Self {
        Self {
            first: normalize_label(first),
            second: normalize_label(second),
        }
    }

    /// The identifier bound to a slot
    pub fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::First => &self.first,
            Slot::Second => &self.second,
        }
    }

    /// Which slot a normalized heading label activates, first target winning ties
    pub fn slot_for(&self, label: &str) -> Option<Slot> {
        if label == self.first {
            Some(Slot::First)
        } else if label == self.second {
            Some(Slot::Second)
        } else {
            None
        }
    }

    /// Whether both identifiers are the same language
    pub fn is_degenerate(&self) -> bool {
        self.first == self.second
    }
}

/// Normalize a heading label or language identifier for comparison
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}
