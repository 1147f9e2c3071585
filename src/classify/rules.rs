//! Regex classifier for common thesis conventions.

use rayon::prelude::*;
use regex::Regex;

use super::{Classification, Classifier};
use crate::error::{Error, Result};

/// Longest text still considered a heading or title.
const MAX_HEADING_CHARS: usize = 60;

struct Rule {
    pattern: Regex,
    category: &'static str,
    confidence: f32,
    heading_like: bool,
}

/// Deterministic classifier keyed on numbering and title words.
///
/// Titles (`摘要`, `Abstract`, `参考文献`, `致谢`) and numbered headings are
/// recognised with high confidence; everything else is body text with a
/// confidence below the default threshold.
pub struct RuleClassifier {
    rules: Vec<Rule>,
}

const RULES: &[(&str, &str, f32, bool)] = &[
    (r"^摘\s*要$", "abstract_title_cn", 0.95, true),
    (r"(?i)^abstract$", "abstract_title_en", 0.95, true),
    (r"^(关键词|关键字)\s*[:：]", "keywords_cn", 0.95, false),
    (r"(?i)^key\s*words?\s*[:：]", "keywords_en", 0.95, false),
    (r"^参\s*考\s*文\s*献$", "references_title", 0.95, true),
    (r"(?i)^(references|bibliography)$", "references_title", 0.9, true),
    (r"^致\s*谢$", "acknowledgements_title", 0.95, true),
    (r"(?i)^acknowledge?ments?$", "acknowledgements_title", 0.9, true),
    (r"^\[\d+\]", "reference_entry", 0.9, false),
    (r"(?i)^(图|figure|fig\.)\s*\d+([.\-]\d+)?(\s|$)", "caption_figure", 0.85, true),
    (r"(?i)^(表|table)\s*\d+([.\-]\d+)?(\s|$)", "caption_table", 0.85, true),
    (r"^第[一二三四五六七八九十百零〇\d]+章", "heading_level_1", 0.9, true),
    (r"^\d+\.\d+\.\d+(\s|$)", "heading_level_3", 0.8, true),
    (r"^\d+\.\d+(\s|$)", "heading_level_2", 0.8, true),
    (r"^\d+\s+\S", "heading_level_1", 0.7, true),
];

impl RuleClassifier {
    /// Build the classifier.
    pub fn new() -> Result<Self> {
        let rules = RULES
            .iter()
            .map(|(pattern, category, confidence, heading_like)| {
                Ok(Rule {
                    pattern: Regex::new(pattern)
                        .map_err(|e| Error::Classifier(format!("bad rule {}: {}", pattern, e)))?,
                    category: *category,
                    confidence: *confidence,
                    heading_like: *heading_like,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Classify one text.
    pub fn classify_text(&self, text: &str) -> Classification {
        let text = text.trim();
        let short = text.chars().count() <= MAX_HEADING_CHARS;
        self.rules
            .iter()
            .find(|rule| (short || !rule.heading_like) && rule.pattern.is_match(text))
            .map(|rule| Classification::new(rule.category, rule.confidence))
            .unwrap_or_else(|| Classification::new("body_text", 0.5))
    }
}

impl Classifier for RuleClassifier {
    fn classify_batch(&self, texts: &[String]) -> Result<Vec<Classification>> {
        Ok(texts.par_iter().map(|t| self.classify_text(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str) -> String {
        RuleClassifier::new().unwrap().classify_text(text).label
    }

    #[test]
    fn test_titles() {
        assert_eq!(label("摘 要"), "abstract_title_cn");
        assert_eq!(label("ABSTRACT"), "abstract_title_en");
        assert_eq!(label("参考文献"), "references_title");
        assert_eq!(label("致谢"), "acknowledgements_title");
    }

    #[test]
    fn test_numbering() {
        assert_eq!(label("第一章 绪论"), "heading_level_1");
        assert_eq!(label("1 绪论"), "heading_level_1");
        assert_eq!(label("1.2 研究现状"), "heading_level_2");
        assert_eq!(label("1.2.3 方法"), "heading_level_3");
        assert_eq!(label("图3-1 系统架构"), "caption_figure");
        assert_eq!(label("表2 参数"), "caption_table");
        assert_eq!(label("[12] 李四. 标题[J]. 期刊, 2021."), "reference_entry");
        assert_eq!(label("关键词：排版；检查"), "keywords_cn");
        assert_eq!(label("Key words: layout"), "keywords_en");
    }

    #[test]
    fn test_long_numbered_text_is_body() {
        let long = format!("1 {}", "很长的正文".repeat(20));
        assert_eq!(label(&long), "body_text");
        assert_eq!(label("本文研究了论文格式检查。"), "body_text");
    }

    #[test]
    fn test_batch_keeps_order() {
        let classifier = RuleClassifier::new().unwrap();
        let texts = vec!["摘要".to_string(), "正文".to_string(), "第二章".to_string()];
        let labels: Vec<_> = classifier
            .classify_batch(&texts)
            .unwrap()
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec!["abstract_title_cn", "body_text", "heading_level_1"]);
    }
}
