//! Check results.

use serde::{Deserialize, Serialize};

use super::options::CheckMode;
use crate::diff::{AppliedCorrection, DiffRecord};
use crate::model::ParagraphHandle;
use crate::outline::{DuplicateGroup, NodeId, NodeKind, SkippedItem, UnmatchedNode};
use crate::style::FieldError;

/// Run-level differences of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run index within the paragraph
    pub run: usize,
    /// Run text
    pub text: String,
    /// Differences found
    pub diffs: Vec<DiffRecord>,
}

/// Everything found (and fixed) on one outline node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeReport {
    /// Outline node
    pub node: NodeId,
    /// Node type
    pub kind: NodeKind,
    /// Matched paragraph
    pub paragraph: ParagraphHandle,
    /// Paragraph text
    pub text: String,
    /// Text-level findings
    pub text_issues: Vec<DiffRecord>,
    /// Paragraph-level differences
    pub paragraph_diffs: Vec<DiffRecord>,
    /// Runs with differences
    pub runs: Vec<RunReport>,
    /// Corrections applied (correct mode)
    pub corrections: Vec<AppliedCorrection>,
    /// Comments written
    pub comments: usize,
}

impl NodeReport {
    /// Number of findings on this node.
    pub fn issue_count(&self) -> usize {
        self.text_issues.len()
            + self.paragraph_diffs.len()
            + self.runs.iter().map(|r| r.diffs.len()).sum::<usize>()
    }

    /// Whether the node had no findings.
    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }
}

/// Result of checking one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Mode the check ran in
    pub mode: CheckMode,
    /// Per-node results, depth-first
    pub nodes: Vec<NodeReport>,
    /// Classified items with unknown categories
    pub skipped: Vec<SkippedItem>,
    /// Nodes not linked to a paragraph
    pub unmatched: Vec<UnmatchedNode>,
    /// Fingerprints shared by several paragraphs
    pub duplicates: Vec<DuplicateGroup>,
    /// Rulebook fields that could not be used
    pub field_errors: Vec<FieldError>,
    /// Nodes reclassified by promotion
    pub promoted: usize,
}

impl CheckReport {
    /// Total findings.
    pub fn issue_count(&self) -> usize {
        self.nodes.iter().map(NodeReport::issue_count).sum()
    }

    /// Total corrections applied.
    pub fn correction_count(&self) -> usize {
        self.nodes.iter().map(|n| n.corrections.len()).sum()
    }

    /// Total comments written.
    pub fn comment_count(&self) -> usize {
        self.nodes.iter().map(|n| n.comments).sum()
    }

    /// Whether nothing was found.
    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }

    /// Nodes with findings.
    pub fn nodes_with_issues(&self) -> impl Iterator<Item = &NodeReport> {
        self.nodes.iter().filter(|n| !n.is_clean())
    }
}
