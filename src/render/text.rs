//! Plain text rendering of check reports.

use std::fmt::{self, Write};

use super::preview;
use crate::check::{CheckMode, CheckReport};
use crate::diff::Language;
use crate::outline::Outline;

const PREVIEW_CHARS: usize = 30;

/// Human-readable report, one block per node with findings.
pub fn to_text(report: &CheckReport, language: Language) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_report(&mut out, report, language == Language::Zh);
    out
}

fn write_report(out: &mut impl Write, report: &CheckReport, zh: bool) -> fmt::Result {
    for node in report.nodes_with_issues() {
        writeln!(
            out,
            "[{}] #{} {}",
            node.kind,
            node.paragraph.0,
            preview(&node.text, PREVIEW_CHARS)
        )?;
        for record in node.text_issues.iter().chain(&node.paragraph_diffs) {
            writeln!(out, "  - {}", record.message)?;
        }
        for run in &node.runs {
            let text = preview(&run.text, PREVIEW_CHARS);
            for record in &run.diffs {
                writeln!(out, "  - “{}” {}", text, record.message)?;
            }
        }
        for correction in &node.corrections {
            writeln!(out, "  ✓ {}", correction.message)?;
        }
    }

    for item in &report.skipped {
        let text = preview(&item.text, PREVIEW_CHARS);
        if zh {
            writeln!(out, "跳过未知类别 {}：{}", item.category, text)?;
        } else {
            writeln!(out, "skipped unknown category {}: {}", item.category, text)?;
        }
    }
    for node in &report.unmatched {
        let text = preview(&node.text, PREVIEW_CHARS);
        if zh {
            writeln!(out, "未匹配到段落：[{}] {}", node.category, text)?;
        } else {
            writeln!(out, "no paragraph matched: [{}] {}", node.category, text)?;
        }
    }
    for error in &report.field_errors {
        writeln!(
            out,
            "{}.{}: {} ({})",
            error.path, error.field, error.literal, error.reason
        )?;
    }

    write_summary(out, report, zh)
}

fn write_summary(out: &mut impl Write, report: &CheckReport, zh: bool) -> fmt::Result {
    let issues = report.issue_count();
    match (report.mode, zh) {
        (CheckMode::Annotate, true) => writeln!(
            out,
            "共发现 {} 处问题，添加批注 {} 条",
            issues,
            report.comment_count()
        ),
        (CheckMode::Annotate, false) => writeln!(
            out,
            "{} issue(s) found, {} comment(s) added",
            issues,
            report.comment_count()
        ),
        (CheckMode::Correct, true) => writeln!(
            out,
            "共发现 {} 处问题，已修正 {} 处",
            issues,
            report.correction_count()
        ),
        (CheckMode::Correct, false) => writeln!(
            out,
            "{} issue(s) found, {} correction(s) applied",
            issues,
            report.correction_count()
        ),
    }
}

/// Indented outline tree.
pub fn outline_to_text(outline: &Outline) -> String {
    outline.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::NodeReport;
    use crate::diff::{DiffRecord, DiffValue, FieldId};
    use crate::model::ParagraphHandle;
    use crate::outline::{NodeId, NodeKind, SkippedItem};

    #[test]
    fn test_to_text() {
        let report = CheckReport {
            mode: CheckMode::Annotate,
            nodes: vec![NodeReport {
                node: NodeId(1),
                kind: NodeKind::HeadingLevel1,
                paragraph: ParagraphHandle(0),
                text: "第一章 绪论".into(),
                text_issues: Vec::new(),
                paragraph_diffs: vec![DiffRecord::new(
                    FieldId::Bold,
                    DiffValue::Flag(true),
                    DiffValue::Flag(false),
                    Language::En,
                )],
                runs: Vec::new(),
                corrections: Vec::new(),
                comments: 1,
            }],
            skipped: Vec::new(),
            unmatched: Vec::new(),
            duplicates: Vec::new(),
            field_errors: Vec::new(),
            promoted: 0,
        };
        let text = to_text(&report, Language::En);
        assert!(text.contains("[heading_level_1] #0 第一章 绪论"));
        assert!(text.contains("bold: expected bold, found not bold"));
        assert!(text.contains("1 issue(s) found, 1 comment(s) added"));
    }

    #[test]
    fn test_skipped_items_are_truncated_in_chinese() {
        let long = "封面".repeat(20);
        let report = CheckReport {
            mode: CheckMode::Correct,
            nodes: Vec::new(),
            skipped: vec![SkippedItem {
                index: 0,
                category: "cover_page".into(),
                text: long,
            }],
            unmatched: Vec::new(),
            duplicates: Vec::new(),
            field_errors: Vec::new(),
            promoted: 0,
        };
        let text = to_text(&report, Language::Zh);
        let expected = format!("跳过未知类别 cover_page：{}…", "封面".repeat(15));
        assert!(text.contains(&expected), "{}", text);
        assert!(text.ends_with("共发现 0 处问题，已修正 0 处\n"));
    }
}
