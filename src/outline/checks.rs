//! Text-level checks attached to specific node types.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::diff::{DiffRecord, Language};

/// A text check a node type runs in addition to style diffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextCheck {
    /// Heading numbering for the given level (`第一章`, `1.1`, `1.1.1`)
    HeadingNumbering(u32),
    /// `关键词：` / `Keywords:` line with one separator style
    Keywords,
    /// `图2-1 ...` / `Table 3 ...` captions
    Caption,
    /// GB/T 7714 style bibliography entry
    ReferenceEntry,
}

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).unwrap())
        }
    };
}

cached_regex!(chapter_number, r"^(第[一二三四五六七八九十百零〇\d]+章|\d+)(\s+|$)");
cached_regex!(section_number, r"^\d+\.\d+(\s+|$)");
cached_regex!(subsection_number, r"^\d+\.\d+\.\d+(\s+|$)");
cached_regex!(keywords_prefix, r"(?i)^(关键词|关键字|key\s*words?)\s*[:：]");
cached_regex!(caption_number, r"(?i)^(图|表|figure|fig\.|table)\s*\d+([.\-]\d+)?(\s+|$)");
cached_regex!(reference_number, r"^\[\d+\]");
cached_regex!(reference_type, r"\[(J|M|C|D|R|S|P|N|G|Z|A|EB/OL|DB/OL|CP/DK|J/OL|M/OL)\]");

const TRAILING_PUNCTUATION: &[char] = &['。', '.', '，', ',', '；', ';', '：', ':'];

fn issue(language: Language, zh: String, en: String) -> DiffRecord {
    DiffRecord::text_issue(match language {
        Language::Zh => zh,
        Language::En => en,
    })
}

impl TextCheck {
    /// Run the check on a paragraph's visible text.
    pub fn run(self, text: &str, language: Language) -> Vec<DiffRecord> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        match self {
            TextCheck::HeadingNumbering(level) => check_heading(level, text, language),
            TextCheck::Keywords => check_keywords(text, language),
            TextCheck::Caption => check_caption(text, language),
            TextCheck::ReferenceEntry => check_reference(text, language),
        }
    }
}

fn check_heading(level: u32, text: &str, language: Language) -> Vec<DiffRecord> {
    let mut records = Vec::new();
    let (pattern, example) = match level {
        1 => (chapter_number(), "第一章 / 1"),
        2 => (section_number(), "1.1"),
        _ => (subsection_number(), "1.1.1"),
    };
    if !pattern.is_match(text) {
        records.push(issue(
            language,
            format!("{}级标题编号格式应为“{}”", level, example),
            format!("level-{} heading should be numbered like \"{}\"", level, example),
        ));
    }
    if text.ends_with(TRAILING_PUNCTUATION) {
        records.push(issue(
            language,
            "标题末尾不应有标点".to_string(),
            "heading should not end with punctuation".to_string(),
        ));
    }
    records
}

fn check_keywords(text: &str, language: Language) -> Vec<DiffRecord> {
    let Some(prefix) = keywords_prefix().find(text) else {
        return vec![issue(
            language,
            "关键词行应以“关键词：”开头".to_string(),
            "keywords line should start with \"Keywords:\"".to_string(),
        )];
    };

    let list = &text[prefix.end()..];
    let separators: Vec<char> = ['；', ';', '，', ',', '、']
        .into_iter()
        .filter(|sep| list.contains(*sep))
        .collect();
    let mut records = Vec::new();
    if separators.len() > 1 {
        let used: String = separators.iter().collect();
        records.push(issue(
            language,
            format!("关键词分隔符不统一（{}）", used),
            format!("keywords use mixed separators ({})", used),
        ));
    }
    if list.trim_end().ends_with(TRAILING_PUNCTUATION) {
        records.push(issue(
            language,
            "关键词末尾不应有标点".to_string(),
            "keywords should not end with punctuation".to_string(),
        ));
    }
    records
}

fn check_caption(text: &str, language: Language) -> Vec<DiffRecord> {
    let mut records = Vec::new();
    match caption_number().find(text) {
        None => records.push(issue(
            language,
            "题注应以“图1-1”或“表1-1”形式编号".to_string(),
            "caption should be numbered like \"Figure 1-1\"".to_string(),
        )),
        Some(m) if text[m.end()..].trim().is_empty() => records.push(issue(
            language,
            "题注缺少标题文字".to_string(),
            "caption has no title text".to_string(),
        )),
        Some(_) => {}
    }
    if text.ends_with(TRAILING_PUNCTUATION) {
        records.push(issue(
            language,
            "题注末尾不应有标点".to_string(),
            "caption should not end with punctuation".to_string(),
        ));
    }
    records
}

fn check_reference(text: &str, language: Language) -> Vec<DiffRecord> {
    let mut records = Vec::new();
    if !reference_number().is_match(text) {
        records.push(issue(
            language,
            "参考文献条目应以“[序号]”开头".to_string(),
            "reference entry should start with \"[n]\"".to_string(),
        ));
    }
    if !reference_type().is_match(text) {
        records.push(issue(
            language,
            "参考文献条目缺少文献类型标识（如[J]、[M]）".to_string(),
            "reference entry lacks a document type marker such as [J] or [M]".to_string(),
        ));
    }
    if !text.ends_with(['.', '。']) {
        records.push(issue(
            language,
            "参考文献条目应以“.”结尾".to_string(),
            "reference entry should end with a period".to_string(),
        ));
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(check: TextCheck, text: &str) -> usize {
        check.run(text, Language::En).len()
    }

    #[test]
    fn test_heading_numbering() {
        assert_eq!(count(TextCheck::HeadingNumbering(1), "第一章 绪论"), 0);
        assert_eq!(count(TextCheck::HeadingNumbering(1), "1 绪论"), 0);
        assert_eq!(count(TextCheck::HeadingNumbering(1), "绪论"), 1);
        assert_eq!(count(TextCheck::HeadingNumbering(2), "2.1 研究背景"), 0);
        assert_eq!(count(TextCheck::HeadingNumbering(2), "2.1 研究背景。"), 1);
        assert_eq!(count(TextCheck::HeadingNumbering(3), "2.1 研究背景"), 1);
        assert_eq!(count(TextCheck::HeadingNumbering(3), "2.1.3 实验"), 0);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(count(TextCheck::Keywords, "关键词：排版；检查；文档"), 0);
        assert_eq!(count(TextCheck::Keywords, "Keywords: layout; lint"), 0);
        assert_eq!(count(TextCheck::Keywords, "关键词：排版，检查；文档"), 1);
        assert_eq!(count(TextCheck::Keywords, "排版；检查"), 1);
        assert_eq!(count(TextCheck::Keywords, "关键词：排版；检查。"), 1);
    }

    #[test]
    fn test_caption() {
        assert_eq!(count(TextCheck::Caption, "图2-1 系统结构"), 0);
        assert_eq!(count(TextCheck::Caption, "Table 3 Results"), 0);
        assert_eq!(count(TextCheck::Caption, "系统结构图"), 1);
        assert_eq!(count(TextCheck::Caption, "图2-1"), 1);
    }

    #[test]
    fn test_reference_entry() {
        assert_eq!(
            count(
                TextCheck::ReferenceEntry,
                "[1] 张三. 论文排版研究[J]. 计算机学报, 2020, 43(1): 1-10."
            ),
            0
        );
        assert_eq!(count(TextCheck::ReferenceEntry, "张三. 论文排版研究"), 3);
    }

    #[test]
    fn test_messages_are_text_patterns() {
        let records = TextCheck::Caption.run("系统结构图", Language::Zh);
        assert_eq!(records[0].field, crate::diff::FieldId::TextPattern);
        assert_eq!(records[0].severity, 0);
        assert!(records[0].message.contains("题注"));
        assert!(TextCheck::Caption.run("   ", Language::Zh).is_empty());
    }
}
