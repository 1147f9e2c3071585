//! Writing diff records back into the document.

use serde::{Deserialize, Serialize};

use super::record::{sort_by_severity, DiffRecord, DiffValue, FieldId, Language};
use crate::error::Result;
use crate::model::{IndentSide, ParagraphMut, RunMut, SpacingSide, StyleSheet};
use crate::units::{MeasurementValue, UnitKind};

/// A diff record that was applied, with its past-tense message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedCorrection {
    /// The record that was applied
    pub record: DiffRecord,
    /// "changed from X to Y"
    pub message: String,
}

/// Applies diff records through the mutable paragraph and run views.
///
/// Records are applied in severity order. Fields that cannot be written
/// (text patterns, values of the wrong kind) are skipped and left out of the
/// result.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrectionEngine {
    language: Language,
}

impl CorrectionEngine {
    /// Create an engine writing messages in `language`.
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    fn applied(&self, record: &DiffRecord) -> AppliedCorrection {
        AppliedCorrection {
            record: record.clone(),
            message: record.correction_message(self.language),
        }
    }

    fn ordered(diffs: &[DiffRecord]) -> Vec<DiffRecord> {
        let mut ordered = diffs.to_vec();
        sort_by_severity(&mut ordered);
        ordered
    }

    /// Apply paragraph-level records. Run-level records are ignored.
    pub fn apply_paragraph(
        &self,
        para: &mut ParagraphMut<'_>,
        styles: &StyleSheet,
        diffs: &[DiffRecord],
    ) -> Result<Vec<AppliedCorrection>> {
        let mut applied = Vec::new();
        for record in Self::ordered(diffs) {
            let done = match (record.field, &record.expected) {
                (FieldId::Alignment, DiffValue::Alignment(a)) => {
                    para.set_alignment(*a);
                    true
                }
                (FieldId::BuiltinStyleName, DiffValue::Text(name)) => {
                    para.set_style_id(&resolve_style_id(styles, name));
                    true
                }
                (FieldId::SpaceBefore, DiffValue::Lines(v)) => {
                    para.set_spacing_lines(SpacingSide::Before, *v);
                    true
                }
                (FieldId::SpaceAfter, DiffValue::Lines(v)) => {
                    para.set_spacing_lines(SpacingSide::After, *v);
                    true
                }
                (FieldId::LineSpacing, DiffValue::LineSpacing(ls)) => {
                    para.set_line_spacing(*ls);
                    true
                }
                (FieldId::FirstLineIndent, DiffValue::Measure(m)) => {
                    apply_first_line_indent(para, *m)?
                }
                (FieldId::LeftIndent, DiffValue::Measure(m)) => {
                    apply_indent(para, IndentSide::Left, *m)?
                }
                (FieldId::RightIndent, DiffValue::Measure(m)) => {
                    apply_indent(para, IndentSide::Right, *m)?
                }
                _ => false,
            };
            if done {
                applied.push(self.applied(&record));
            } else if !record.field.is_character() {
                log::debug!("not correcting {} ({:?})", record.field, record.expected);
            }
        }
        Ok(applied)
    }

    /// Apply run-level records. Paragraph-level records are ignored.
    pub fn apply_run(&self, run: &mut RunMut<'_>, diffs: &[DiffRecord]) -> Vec<AppliedCorrection> {
        let mut applied = Vec::new();
        for record in Self::ordered(diffs) {
            let done = match (record.field, &record.expected) {
                (FieldId::Bold, DiffValue::Flag(on)) => {
                    run.set_bold(*on);
                    true
                }
                (FieldId::Italic, DiffValue::Flag(on)) => {
                    run.set_italic(*on);
                    true
                }
                (FieldId::Underline, DiffValue::Flag(on)) => {
                    run.set_underline(*on);
                    true
                }
                (FieldId::FontSize, DiffValue::Points(pt)) => {
                    run.set_size_points(*pt);
                    true
                }
                (FieldId::FontColor, DiffValue::Color(c)) => {
                    run.set_color(*c);
                    true
                }
                (FieldId::ChineseFont, DiffValue::Text(name)) => {
                    run.set_east_asia_font(name);
                    true
                }
                (FieldId::EnglishFont, DiffValue::Text(name)) => {
                    run.set_ascii_font(name);
                    true
                }
                _ => false,
            };
            if done {
                applied.push(self.applied(&record));
            }
        }
        applied
    }
}

fn apply_first_line_indent(para: &mut ParagraphMut<'_>, value: MeasurementValue) -> Result<bool> {
    match value.unit {
        UnitKind::CharacterWidth => para.set_first_line_indent_chars(value.magnitude),
        UnitKind::LineMultiple => return Ok(false),
        _ => para.set_first_line_indent_length(value)?,
    }
    Ok(true)
}

fn apply_indent(
    para: &mut ParagraphMut<'_>,
    side: IndentSide,
    value: MeasurementValue,
) -> Result<bool> {
    match value.unit {
        UnitKind::CharacterWidth => para.set_indent_chars(side, value.magnitude),
        UnitKind::LineMultiple => return Ok(false),
        _ => para.set_indent_length(side, value)?,
    }
    Ok(true)
}

/// Map a style display name to a style id.
///
/// Falls back to the name with whitespace removed (`heading 1` → `heading1`),
/// which is how Word derives ids for built-in styles.
fn resolve_style_id(styles: &StyleSheet, name: &str) -> String {
    if let Some(def) = styles.find_by_name(name) {
        return def.id.clone();
    }
    if styles.get(name).is_some() {
        return name.to_string();
    }
    log::warn!("style '{}' is not defined in the document", name);
    name.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffEngine;
    use crate::model::{Alignment, Paragraph, XmlElement};
    use crate::style::{CharacterStyleSpec, ParagraphStyleSpec, StyleCascade};

    const STYLES: &str = concat!(
        r#"<w:styles><w:style w:type="paragraph" w:styleId="Heading1">"#,
        r#"<w:name w:val="heading 1"/><w:pPr><w:jc w:val="center"/></w:pPr></w:style></w:styles>"#
    );

    #[test]
    fn test_apply_paragraph_then_rediff_is_clean() {
        let styles = StyleSheet::parse(STYLES).unwrap();
        let mut el = XmlElement::parse(r#"<w:p><w:r><w:t>绪论</w:t></w:r></w:p>"#).unwrap();
        let target = ParagraphStyleSpec {
            alignment: Some(Alignment::Center),
            space_before: Some(0.5),
            first_line_indent: Some(MeasurementValue::chars(0.0)),
            builtin_style_name: Some("heading 1".into()),
            ..Default::default()
        };
        let diff = DiffEngine::new(Language::En);
        let cascade = StyleCascade::new(&styles);

        let records = diff.diff_paragraph(&cascade.paragraph_spec(&Paragraph::new(&el)), &target);
        assert!(!records.is_empty());

        let applied = CorrectionEngine::new(Language::En)
            .apply_paragraph(&mut ParagraphMut::new(&mut el), &styles, &records)
            .unwrap();
        assert_eq!(applied.len(), records.len());
        assert_eq!(Paragraph::new(&el).style_id(), Some("Heading1"));

        let after = diff.diff_paragraph(&cascade.paragraph_spec(&Paragraph::new(&el)), &target);
        assert!(after.is_empty(), "{:?}", after);
    }

    #[test]
    fn test_apply_run() {
        let styles = StyleSheet::new();
        let mut el = XmlElement::parse(r#"<w:p><w:r><w:t>正文</w:t></w:r></w:p>"#).unwrap();
        let target = CharacterStyleSpec {
            bold: Some(true),
            font_size: Some(12.0),
            east_asia_font: Some("宋体".into()),
            ..Default::default()
        };
        let diff = DiffEngine::new(Language::Zh);
        let records = {
            let p = Paragraph::new(&el);
            let run = p.runs()[0];
            diff.diff_character(&StyleCascade::new(&styles).run_spec(&p, &run), &target)
        };
        // size already falls back to 12pt
        assert_eq!(records.len(), 2);

        let applied = {
            let mut para = ParagraphMut::new(&mut el);
            let mut run = para.run_mut(0).unwrap();
            CorrectionEngine::new(Language::Zh).apply_run(&mut run, &records)
        };
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0].message, "加粗：已由不加粗改为加粗");

        let p = Paragraph::new(&el);
        let run = p.runs()[0];
        let after = diff.diff_character(&StyleCascade::new(&styles).run_spec(&p, &run), &target);
        assert!(after.is_empty());
    }

    #[test]
    fn test_text_records_are_skipped() {
        let mut el = XmlElement::parse(r#"<w:p/>"#).unwrap();
        let applied = CorrectionEngine::default()
            .apply_paragraph(
                &mut ParagraphMut::new(&mut el),
                &StyleSheet::new(),
                &[DiffRecord::text_issue("numbering")],
            )
            .unwrap();
        assert!(applied.is_empty());
    }
}
