//! Dual-language section matching
//!
//! Consumes a page's heading/block stream in a single forward pass and
//! collects the code under each of two target languages. The scan stops at
//! the first unrelated heading once both targets have produced code, which
//! assumes each language's section is contiguous on the page.

use super::render::raw_block;
use super::{normalize_label, DocumentNode, Slot, TargetPair};
use std::ops::ControlFlow;

/// Accumulated raw block markup for the two slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotAccumulator {
    pub first: String,
    pub second: String,
}

impl SlotAccumulator {
    /// Markup collected for a slot
    pub fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::First => &self.first,
            Slot::Second => &self.second,
        }
    }

    fn append(&mut self, slot: Slot, markup: &str) {
        match slot {
            Slot::First => self.first.push_str(markup),
            Slot::Second => self.second.push_str(markup),
        }
    }

    /// Whether both slots have collected something
    pub fn is_complete(&self) -> bool {
        !self.first.is_empty() && !self.second.is_empty()
    }
}

/// Outcome of a scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Collected fragments
    pub slots: SlotAccumulator,
    /// Nodes consumed, including the one that stopped the scan
    pub nodes_visited: usize,
    /// Blocks that could not be read and were skipped
    pub skipped_blocks: usize,
    /// Whether the scan ended before the node stream was exhausted
    pub stopped_early: bool,
}

/// Online matcher for two target languages
#[derive(Debug)]
pub struct DualLanguageMatcher<'a> {
    targets: &'a TargetPair,
    active: Option<Slot>,
    report: ScanReport,
}

impl<'a> DualLanguageMatcher<'a> {
    /// Create a matcher for the given targets
    pub fn new(targets: &'a TargetPair) -> Self {
        Self {
            targets,
            active: None,
            report: ScanReport::default(),
        }
    }

    /// The slot currently absorbing blocks
    pub fn active(&self) -> Option<Slot> {
        self.active
    }

    /// Feed the next node; `Break` means nothing further can match
    pub fn feed(&mut self, node: DocumentNode) -> ControlFlow<()> {
        self.report.nodes_visited += 1;

        match node {
            DocumentNode::Heading { label } => {
                let label = normalize_label(&label);
                match self.targets.slot_for(&label) {
                    Some(slot) => {
                        tracing::debug!("Section '{}' feeds slot {}", label, slot);
                        self.active = Some(slot);
                    }
                    None if self.report.slots.is_complete() => {
                        tracing::debug!("Both languages captured, stopping at '{}'", label);
                        self.report.stopped_early = true;
                        return ControlFlow::Break(());
                    }
                    None => self.active = None,
                }
            }
            DocumentNode::Block { markup } => {
                let Some(slot) = self.active else {
                    return ControlFlow::Continue(());
                };
                match markup {
                    Some(markup) => {
                        self.report.slots.append(slot, &raw_block(&markup));
                    }
                    None => {
                        tracing::debug!("Skipping unreadable block in slot {}", slot);
                        self.report.skipped_blocks += 1;
                    }
                }
            }
        }

        ControlFlow::Continue(())
    }

    /// Finish the scan and return what was collected
    pub fn finish(self) -> ScanReport {
        self.report
    }
}

/// Scan a node stream for the two target languages
pub fn scan<I>(targets: &TargetPair, nodes: I) -> ScanReport
where
    I: IntoIterator<Item = DocumentNode>,
{
    let mut matcher = DualLanguageMatcher::new(targets);

    for node in nodes {
        if matcher.feed(node).is_break() {
            break;
        }
    }

    matcher.finish()
}
