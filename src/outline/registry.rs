//! Node type registry: category labels → level, config path, text check.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::checks::TextCheck;
use crate::config::PromotionEntry;
use crate::error::{Error, Result};

/// Level of body-class nodes; they never enter the heading spine.
pub const BODY_LEVEL: u32 = 999;

/// Every paragraph category the outline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Chapter heading
    #[serde(rename = "heading_level_1")]
    HeadingLevel1,
    /// Section heading
    #[serde(rename = "heading_level_2")]
    HeadingLevel2,
    /// Subsection heading
    #[serde(rename = "heading_level_3")]
    HeadingLevel3,
    /// 摘要
    AbstractTitleCn,
    /// Chinese abstract body
    AbstractContentCn,
    /// 关键词 line
    KeywordsCn,
    /// Abstract
    AbstractTitleEn,
    /// English abstract body
    AbstractContentEn,
    /// Keywords line
    KeywordsEn,
    /// Generic body paragraph
    BodyText,
    /// Figure caption
    CaptionFigure,
    /// Table caption
    CaptionTable,
    /// 参考文献
    ReferencesTitle,
    /// One bibliography entry
    ReferenceEntry,
    /// 致谢
    AcknowledgementsTitle,
    /// Acknowledgements body
    AcknowledgementsContent,
}

/// Static description of a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTypeDescriptor {
    /// The kind
    pub kind: NodeKind,
    /// Category label used by classifiers and persisted lists
    pub category: &'static str,
    /// Outline level ([`BODY_LEVEL`] for body-class nodes)
    pub level: u32,
    /// Dotted rulebook path of the node's fragment
    pub config_path: &'static str,
    /// Heading-class: participates in the level stack
    pub heading: bool,
    /// Extra text-level check
    pub text_check: Option<TextCheck>,
}

const fn heading(
    kind: NodeKind,
    category: &'static str,
    level: u32,
    config_path: &'static str,
    text_check: Option<TextCheck>,
) -> NodeTypeDescriptor {
    NodeTypeDescriptor {
        kind,
        category,
        level,
        config_path,
        heading: true,
        text_check,
    }
}

const fn body(
    kind: NodeKind,
    category: &'static str,
    config_path: &'static str,
    text_check: Option<TextCheck>,
) -> NodeTypeDescriptor {
    NodeTypeDescriptor {
        kind,
        category,
        level: BODY_LEVEL,
        config_path,
        heading: false,
        text_check,
    }
}

static REGISTRY: [NodeTypeDescriptor; 16] = [
    heading(
        NodeKind::HeadingLevel1,
        "heading_level_1",
        1,
        "headings.level_1",
        Some(TextCheck::HeadingNumbering(1)),
    ),
    heading(
        NodeKind::HeadingLevel2,
        "heading_level_2",
        2,
        "headings.level_2",
        Some(TextCheck::HeadingNumbering(2)),
    ),
    heading(
        NodeKind::HeadingLevel3,
        "heading_level_3",
        3,
        "headings.level_3",
        Some(TextCheck::HeadingNumbering(3)),
    ),
    heading(
        NodeKind::AbstractTitleCn,
        "abstract_title_cn",
        1,
        "abstract.chinese.chinese_title",
        None,
    ),
    body(
        NodeKind::AbstractContentCn,
        "abstract_content_cn",
        "abstract.chinese.chinese_content",
        None,
    ),
    body(
        NodeKind::KeywordsCn,
        "keywords_cn",
        "abstract.keywords.chinese",
        Some(TextCheck::Keywords),
    ),
    heading(
        NodeKind::AbstractTitleEn,
        "abstract_title_en",
        1,
        "abstract.english.english_title",
        None,
    ),
    body(
        NodeKind::AbstractContentEn,
        "abstract_content_en",
        "abstract.english.english_content",
        None,
    ),
    body(
        NodeKind::KeywordsEn,
        "keywords_en",
        "abstract.keywords.english",
        Some(TextCheck::Keywords),
    ),
    body(NodeKind::BodyText, "body_text", "body_text", None),
    body(
        NodeKind::CaptionFigure,
        "caption_figure",
        "captions.figure",
        Some(TextCheck::Caption),
    ),
    body(
        NodeKind::CaptionTable,
        "caption_table",
        "captions.table",
        Some(TextCheck::Caption),
    ),
    heading(
        NodeKind::ReferencesTitle,
        "references_title",
        1,
        "references.title",
        None,
    ),
    body(
        NodeKind::ReferenceEntry,
        "reference_entry",
        "references.content",
        Some(TextCheck::ReferenceEntry),
    ),
    heading(
        NodeKind::AcknowledgementsTitle,
        "acknowledgements_title",
        1,
        "acknowledgements.title",
        None,
    ),
    body(
        NodeKind::AcknowledgementsContent,
        "acknowledgements_content",
        "acknowledgements.content",
        None,
    ),
];

impl NodeKind {
    /// Registry entry.
    pub fn descriptor(self) -> &'static NodeTypeDescriptor {
        // REGISTRY is declared in variant order
        &REGISTRY[self as usize]
    }

    /// Category label.
    pub fn category(self) -> &'static str {
        self.descriptor().category
    }

    /// Outline level.
    pub fn level(self) -> u32 {
        self.descriptor().level
    }

    /// Rulebook path.
    pub fn config_path(self) -> &'static str {
        self.descriptor().config_path
    }

    /// Whether the kind is heading-class.
    pub fn is_heading(self) -> bool {
        self.descriptor().heading
    }

    /// Extra text check, if any.
    pub fn text_check(self) -> Option<TextCheck> {
        self.descriptor().text_check
    }

    /// Kind for a category label.
    pub fn from_category(category: &str) -> Option<NodeKind> {
        lookup(category).ok().map(|d| d.kind)
    }

    /// All kinds, in registry order.
    pub fn all() -> impl Iterator<Item = NodeKind> {
        REGISTRY.iter().map(|d| d.kind)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// Look up a category label.
pub fn lookup(category: &str) -> Result<&'static NodeTypeDescriptor> {
    let category = category.trim();
    REGISTRY
        .iter()
        .find(|d| d.category == category)
        .ok_or_else(|| Error::UnknownCategory(category.to_string()))
}

/// Body descendants of `ancestor` nodes are reclassified to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionRule {
    /// Kind of the ancestor
    pub ancestor: NodeKind,
    /// New kind for its body descendants
    pub target: NodeKind,
}

/// Built-in promotion pairs.
pub const DEFAULT_PROMOTIONS: [PromotionRule; 4] = [
    PromotionRule {
        ancestor: NodeKind::AbstractTitleCn,
        target: NodeKind::AbstractContentCn,
    },
    PromotionRule {
        ancestor: NodeKind::AbstractTitleEn,
        target: NodeKind::AbstractContentEn,
    },
    PromotionRule {
        ancestor: NodeKind::ReferencesTitle,
        target: NodeKind::ReferenceEntry,
    },
    PromotionRule {
        ancestor: NodeKind::AcknowledgementsTitle,
        target: NodeKind::AcknowledgementsContent,
    },
];

/// Promotion rules from the rulebook, or the built-ins when it has none.
pub fn promotion_rules(configured: Option<&[PromotionEntry]>) -> Result<Vec<PromotionRule>> {
    let Some(entries) = configured else {
        return Ok(DEFAULT_PROMOTIONS.to_vec());
    };
    entries
        .iter()
        .map(|entry| -> Result<PromotionRule> {
            let resolve = |label: &str| {
                NodeKind::from_category(label).ok_or_else(|| {
                    Error::config_invalid("promotion", format!("unknown category '{}'", label))
                })
            };
            Ok(PromotionRule {
                ancestor: resolve(&entry.ancestor)?,
                target: resolve(&entry.target)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_variant_order() {
        for (i, descriptor) in REGISTRY.iter().enumerate() {
            assert_eq!(descriptor.kind as usize, i);
        }
    }

    #[test]
    fn test_category_labels_match_serde_names() {
        for kind in NodeKind::all() {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.category()));
        }
    }

    #[test]
    fn test_lookup() {
        let d = lookup("heading_level_2").unwrap();
        assert_eq!(d.level, 2);
        assert!(d.heading);
        assert_eq!(lookup("body_text").unwrap().level, BODY_LEVEL);
        assert!(matches!(lookup("sidebar"), Err(Error::UnknownCategory(_))));
    }

    #[test]
    fn test_titles_are_heading_class() {
        for kind in [
            NodeKind::AbstractTitleCn,
            NodeKind::AbstractTitleEn,
            NodeKind::ReferencesTitle,
            NodeKind::AcknowledgementsTitle,
        ] {
            assert!(kind.is_heading());
            assert_eq!(kind.level(), 1);
        }
        assert!(!NodeKind::KeywordsCn.is_heading());
    }

    #[test]
    fn test_configured_promotions() {
        assert_eq!(promotion_rules(None).unwrap().len(), 4);
        let entries = vec![PromotionEntry {
            ancestor: "heading_level_1".into(),
            target: "abstract_content_cn".into(),
        }];
        let rules = promotion_rules(Some(&entries)).unwrap();
        assert_eq!(rules[0].ancestor, NodeKind::HeadingLevel1);

        let bad = vec![PromotionEntry {
            ancestor: "nope".into(),
            target: "body_text".into(),
        }];
        assert!(matches!(
            promotion_rules(Some(&bad)),
            Err(Error::ConfigInvalid { .. })
        ));
    }
}
