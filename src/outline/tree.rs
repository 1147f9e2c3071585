//! Outline tree built from a flat classified paragraph list.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

use super::registry::{lookup, NodeKind, PromotionRule};
use crate::classify::ClassifiedParagraph;
use crate::model::ParagraphHandle;
use crate::render::preview;

/// Index of a node in its [`Outline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// One node of the outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    /// Node type (`None` for the synthetic root)
    pub kind: Option<NodeKind>,
    /// Category label
    pub category: String,
    /// Outline level (0 for the root)
    pub level: u32,
    /// Content fingerprint of the source paragraph
    pub fingerprint: Option<String>,
    /// Rulebook path of the node's fragment
    pub config_path: String,
    /// Live paragraph, once matched
    pub paragraph: Option<ParagraphHandle>,
    /// Paragraph text as classified
    pub text: String,
    /// Classifier confidence
    pub confidence: f32,
    /// Parent node
    pub parent: Option<NodeId>,
    /// Children, in document order
    pub children: Vec<NodeId>,
}

impl OutlineNode {
    fn root() -> Self {
        Self {
            kind: None,
            category: "root".to_string(),
            level: 0,
            fingerprint: None,
            config_path: String::new(),
            paragraph: None,
            text: String::new(),
            confidence: 1.0,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// An input item that did not become a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedItem {
    /// Position in the classified list
    pub index: usize,
    /// The unknown category
    pub category: String,
    /// Paragraph text
    pub text: String,
}

/// Rooted outline; nodes live in one arena and refer to each other by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    nodes: Vec<OutlineNode>,
    skipped: Vec<SkippedItem>,
}

impl Default for Outline {
    fn default() -> Self {
        Self::new()
    }
}

impl Outline {
    /// The synthetic root.
    pub const ROOT: NodeId = NodeId(0);

    /// An outline holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![OutlineNode::root()],
            skipped: Vec::new(),
        }
    }

    /// Build the tree with a level stack.
    ///
    /// A heading-class node pops every stack entry with a level at or above
    /// its own, becomes a child of the new top and is pushed. A body-class
    /// node becomes a child of the current top and leaves the stack alone.
    /// Unknown categories are skipped with a warning.
    pub fn build(items: &[ClassifiedParagraph]) -> Self {
        let mut outline = Self::new();
        let mut stack = vec![Self::ROOT];

        for (index, item) in items.iter().enumerate() {
            let descriptor = match lookup(&item.category) {
                Ok(d) => d,
                Err(err) => {
                    log::warn!("skipping paragraph {}: {}", index, err);
                    outline.skipped.push(SkippedItem {
                        index,
                        category: item.category.clone(),
                        text: item.text.clone(),
                    });
                    continue;
                }
            };

            let node = OutlineNode {
                kind: Some(descriptor.kind),
                category: descriptor.category.to_string(),
                level: descriptor.level,
                fingerprint: Some(item.fingerprint.clone()),
                config_path: descriptor.config_path.to_string(),
                paragraph: None,
                text: item.text.clone(),
                confidence: item.confidence,
                parent: None,
                children: Vec::new(),
            };

            if descriptor.heading {
                while stack.len() > 1
                    && stack
                        .last()
                        .is_some_and(|top| outline.nodes[top.0].level >= descriptor.level)
                {
                    stack.pop();
                }
                let parent = stack.last().copied().unwrap_or(Self::ROOT);
                let id = outline.attach(parent, node);
                stack.push(id);
            } else {
                let parent = stack.last().copied().unwrap_or(Self::ROOT);
                outline.attach(parent, node);
            }
        }

        outline
    }

    fn attach(&mut self, parent: NodeId, mut node: OutlineNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> &OutlineNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut OutlineNode {
        &mut self.nodes[id.0]
    }

    /// The root node.
    pub fn root(&self) -> &OutlineNode {
        self.node(Self::ROOT)
    }

    /// Number of nodes, root excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Whether the outline has no nodes besides the root.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items that were skipped during construction.
    pub fn skipped(&self) -> &[SkippedItem] {
        &self.skipped
    }

    /// Change a node's type in place. Identity, fingerprint, position and
    /// children are kept.
    pub fn reclassify(&mut self, id: NodeId, kind: NodeKind) {
        let node = &mut self.nodes[id.0];
        node.kind = Some(kind);
        node.category = kind.category().to_string();
        node.config_path = kind.config_path().to_string();
        node.level = kind.level();
    }

    /// Reclassify generic body descendants of matching ancestors.
    ///
    /// Returns how many nodes changed.
    pub fn promote(&mut self, rules: &[PromotionRule]) -> usize {
        let mut promoted = 0;
        for rule in rules {
            let ancestors: Vec<NodeId> = self
                .depth_first()
                .into_iter()
                .filter(|id| self.node(*id).kind == Some(rule.ancestor))
                .collect();
            for ancestor in ancestors {
                for id in self.descendants(ancestor) {
                    if self.node(id).kind == Some(NodeKind::BodyText) {
                        log::debug!(
                            "promoting node {} under {} to {}",
                            id.0,
                            rule.ancestor,
                            rule.target
                        );
                        self.reclassify(id, rule.target);
                        promoted += 1;
                    }
                }
            }
        }
        promoted
    }

    /// Every node below `id`, pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.node(next).children.iter().rev().copied());
        }
        out
    }

    /// All nodes except the root, depth-first pre-order (document order).
    pub fn depth_first(&self) -> Vec<NodeId> {
        self.descendants(Self::ROOT)
    }

    /// All nodes except the root, breadth-first.
    pub fn breadth_first(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut queue: VecDeque<NodeId> = self.root().children.iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            out.push(id);
            queue.extend(self.node(id).children.iter().copied());
        }
        out
    }

    /// Distinct node kinds present in the tree.
    pub fn kinds(&self) -> BTreeSet<NodeKind> {
        self.nodes.iter().filter_map(|n| n.kind).collect()
    }

    /// Indented text rendering, one node per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(Self::ROOT, 0, &mut out);
        out
    }

    fn render_into(&self, id: NodeId, depth: usize, out: &mut String) {
        for child in &self.node(id).children {
            let node = self.node(*child);
            let marker = if node.paragraph.is_some() { "" } else { " (unmatched)" };
            out.push_str(&format!(
                "{}[{}] {}{}\n",
                "  ".repeat(depth),
                node.category,
                preview(&node.text, 40),
                marker
            ));
            self.render_into(*child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::DEFAULT_PROMOTIONS;

    fn item(category: &str, text: &str) -> ClassifiedParagraph {
        ClassifiedParagraph {
            category: category.to_string(),
            confidence: 0.9,
            text: text.to_string(),
            fingerprint: format!("fp-{}", text),
        }
    }

    #[test]
    fn test_level_stack() {
        let outline = Outline::build(&[
            item("heading_level_1", "第一章"),
            item("heading_level_2", "1.1"),
            item("body_text", "正文"),
            item("heading_level_1", "第二章"),
        ]);
        let root = outline.root();
        assert_eq!(root.children.len(), 2);

        let first = outline.node(root.children[0]);
        let second = outline.node(root.children[1]);
        assert_eq!(first.level, 1);
        assert_eq!(second.level, 1);
        assert!(second.children.is_empty());

        let h2 = outline.node(first.children[0]);
        assert_eq!(h2.category, "heading_level_2");
        assert_eq!(h2.children.len(), 1);
        assert_eq!(outline.node(h2.children[0]).category, "body_text");
    }

    #[test]
    fn test_skips_unknown_category() {
        let outline = Outline::build(&[
            item("heading_level_1", "第一章"),
            item("sidebar", "?"),
            item("body_text", "正文"),
        ]);
        assert_eq!(outline.len(), 2);
        assert_eq!(outline.skipped().len(), 1);
        assert_eq!(outline.skipped()[0].index, 1);
    }

    #[test]
    fn test_body_before_any_heading_hangs_off_root() {
        let outline = Outline::build(&[item("body_text", "封面"), item("heading_level_2", "1.1")]);
        assert_eq!(outline.root().children.len(), 2);
    }

    #[test]
    fn test_promotion_keeps_position_and_fingerprint() {
        let mut outline = Outline::build(&[
            item("abstract_title_cn", "摘要"),
            item("body_text", "本文研究"),
            item("keywords_cn", "关键词：排版"),
            item("heading_level_1", "第一章"),
            item("body_text", "正文"),
        ]);
        let abstract_id = outline.root().children[0];
        let content_id = outline.node(abstract_id).children[0];

        let promoted = outline.promote(&DEFAULT_PROMOTIONS);
        assert_eq!(promoted, 1);

        let content = outline.node(content_id);
        assert_eq!(content.kind, Some(NodeKind::AbstractContentCn));
        assert_eq!(content.config_path, "abstract.chinese.chinese_content");
        assert_eq!(content.fingerprint.as_deref(), Some("fp-本文研究"));
        assert_eq!(content.parent, Some(abstract_id));

        let keywords = outline.node(outline.node(abstract_id).children[1]);
        assert_eq!(keywords.kind, Some(NodeKind::KeywordsCn));

        let chapter = outline.node(outline.root().children[1]);
        assert_eq!(outline.node(chapter.children[0]).kind, Some(NodeKind::BodyText));
    }

    #[test]
    fn test_traversal_orders() {
        let outline = Outline::build(&[
            item("heading_level_1", "A"),
            item("heading_level_2", "A.1"),
            item("heading_level_1", "B"),
        ]);
        let text = |ids: Vec<NodeId>| -> Vec<String> {
            ids.into_iter().map(|id| outline.node(id).text.clone()).collect()
        };
        assert_eq!(text(outline.depth_first()), vec!["A", "A.1", "B"]);
        assert_eq!(text(outline.breadth_first()), vec!["A", "B", "A.1"]);
        assert!(outline.render().contains("  [heading_level_2] A.1"));
    }
}
