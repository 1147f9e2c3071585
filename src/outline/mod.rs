//! Document outline: node types, the level-stack tree and fingerprint matching.
//!
//! The classifier yields a flat list of categorized paragraphs. [`Outline::build`]
//! turns it into a tree whose heading spine is strictly increasing in level,
//! [`Outline::promote`] recovers content paragraphs from their position under
//! title nodes, and [`attach_paragraphs`] links each node back to its live
//! paragraph by content fingerprint.

mod checks;
mod fingerprint;
mod registry;
mod tree;

pub use checks::TextCheck;
pub use fingerprint::{attach_paragraphs, fingerprint, DuplicateGroup, MatchReport, UnmatchedNode};
pub use registry::{
    lookup, promotion_rules, NodeKind, NodeTypeDescriptor, PromotionRule, BODY_LEVEL,
    DEFAULT_PROMOTIONS,
};
pub use tree::{NodeId, Outline, OutlineNode, SkippedItem};
