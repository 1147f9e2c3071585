//! Field-by-field comparison of effective and target formatting.

use super::record::{sort_by_severity, DiffRecord, DiffValue, FieldId, Language};
use crate::model::{normalize_style_name, LineSpacing, Rgb};
use crate::style::{CharacterStyleSpec, ParagraphStyleSpec, DEFAULT_FONT_SIZE};
use crate::units::MeasurementValue;

/// Tolerance for line counts and point sizes.
const TOLERANCE: f64 = 0.01;

/// Compares style specs and produces ordered [`DiffRecord`]s.
///
/// Only fields set in the target are compared. An unset effective value
/// compares as its rendered default: zero spacing and indent, single line
/// spacing, not bold/italic/underlined, black, 12pt.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine {
    language: Language,
}

impl DiffEngine {
    /// Create an engine writing messages in `language`.
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Message language.
    pub fn language(&self) -> Language {
        self.language
    }

    fn record(&self, field: FieldId, expected: DiffValue, current: DiffValue) -> DiffRecord {
        DiffRecord::new(field, expected, current, self.language)
    }

    /// Diff paragraph-level fields.
    pub fn diff_paragraph(
        &self,
        effective: &ParagraphStyleSpec,
        target: &ParagraphStyleSpec,
    ) -> Vec<DiffRecord> {
        let mut records = Vec::new();

        if let Some(expected) = target.alignment {
            let current = effective.alignment.unwrap_or_default();
            if current != expected {
                records.push(self.record(
                    FieldId::Alignment,
                    DiffValue::Alignment(expected),
                    DiffValue::Alignment(current),
                ));
            }
        }

        for (field, expected, current) in [
            (FieldId::SpaceBefore, target.space_before, effective.space_before),
            (FieldId::SpaceAfter, target.space_after, effective.space_after),
        ] {
            if let Some(expected) = expected {
                if (current.unwrap_or(0.0) - expected).abs() >= TOLERANCE {
                    records.push(self.record(
                        field,
                        DiffValue::Lines(expected),
                        current.map_or(DiffValue::Unset, DiffValue::Lines),
                    ));
                }
            }
        }

        if let Some(expected) = target.line_spacing {
            let current = effective
                .line_spacing
                .unwrap_or_else(|| LineSpacing::multiple(1.0));
            if !current.approx_eq(&expected) {
                records.push(self.record(
                    FieldId::LineSpacing,
                    DiffValue::LineSpacing(expected),
                    DiffValue::LineSpacing(current),
                ));
            }
        }

        for (field, expected, current) in [
            (
                FieldId::FirstLineIndent,
                target.first_line_indent,
                effective.first_line_indent,
            ),
            (FieldId::LeftIndent, target.left_indent, effective.left_indent),
            (FieldId::RightIndent, target.right_indent, effective.right_indent),
        ] {
            if let Some(expected) = expected {
                let zero = MeasurementValue::new(0.0, expected.unit);
                if !current.unwrap_or(zero).approx_eq(&expected) {
                    records.push(self.record(
                        field,
                        DiffValue::Measure(expected),
                        current.map_or(DiffValue::Unset, DiffValue::Measure),
                    ));
                }
            }
        }

        if let Some(expected) = &target.builtin_style_name {
            let matches = effective
                .builtin_style_name
                .as_deref()
                .is_some_and(|name| normalize_style_name(name) == normalize_style_name(expected));
            if !matches {
                records.push(self.record(
                    FieldId::BuiltinStyleName,
                    DiffValue::Text(expected.clone()),
                    effective
                        .builtin_style_name
                        .clone()
                        .map_or(DiffValue::Unset, DiffValue::Text),
                ));
            }
        }

        sort_by_severity(&mut records);
        records
    }

    /// Diff run-level fields.
    pub fn diff_character(
        &self,
        effective: &CharacterStyleSpec,
        target: &CharacterStyleSpec,
    ) -> Vec<DiffRecord> {
        let mut records = Vec::new();

        for (field, expected, current) in [
            (FieldId::Bold, target.bold, effective.bold),
            (FieldId::Italic, target.italic, effective.italic),
            (FieldId::Underline, target.underline, effective.underline),
        ] {
            if let Some(expected) = expected {
                let current = current.unwrap_or(false);
                if current != expected {
                    records.push(self.record(
                        field,
                        DiffValue::Flag(expected),
                        DiffValue::Flag(current),
                    ));
                }
            }
        }

        if let Some(expected) = target.font_size {
            let current = effective.font_size.unwrap_or(DEFAULT_FONT_SIZE);
            if (current - expected).abs() >= TOLERANCE {
                records.push(self.record(
                    FieldId::FontSize,
                    DiffValue::Points(expected),
                    DiffValue::Points(current),
                ));
            }
        }

        if let Some(expected) = target.color {
            let current = effective.color.unwrap_or(Rgb::BLACK);
            if current != expected {
                records.push(self.record(
                    FieldId::FontColor,
                    DiffValue::Color(expected),
                    DiffValue::Color(current),
                ));
            }
        }

        for (field, expected, current) in [
            (
                FieldId::ChineseFont,
                &target.east_asia_font,
                &effective.east_asia_font,
            ),
            (FieldId::EnglishFont, &target.latin_font, &effective.latin_font),
        ] {
            if let Some(expected) = expected {
                let matches = current
                    .as_deref()
                    .is_some_and(|name| name.trim().eq_ignore_ascii_case(expected.trim()));
                if !matches {
                    records.push(self.record(
                        field,
                        DiffValue::Text(expected.clone()),
                        current.clone().map_or(DiffValue::Unset, DiffValue::Text),
                    ));
                }
            }
        }

        sort_by_severity(&mut records);
        records
    }
}
