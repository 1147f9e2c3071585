//! Turning a rulebook fragment into target specs.

use serde::{Deserialize, Serialize};

use super::spec::{CharacterStyleSpec, ParagraphStyleSpec};
use crate::config::{Scalar, StyleFragment};
use crate::diff::FieldId;
use crate::error::{Error, Result};
use crate::model::{Alignment, LineSpacing, LineSpacingRule, Rgb};
use crate::units::{parse_measurement_with_default, MeasurementValue, UnitKind};

const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("黑色", Rgb(0, 0, 0)),
    ("black", Rgb(0, 0, 0)),
    ("auto", Rgb(0, 0, 0)),
    ("自动", Rgb(0, 0, 0)),
    ("白色", Rgb(255, 255, 255)),
    ("white", Rgb(255, 255, 255)),
    ("红色", Rgb(255, 0, 0)),
    ("red", Rgb(255, 0, 0)),
    ("蓝色", Rgb(0, 0, 255)),
    ("blue", Rgb(0, 0, 255)),
    ("绿色", Rgb(0, 128, 0)),
    ("green", Rgb(0, 128, 0)),
];

/// A field whose literal could not be resolved; the field is left unchecked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Node path in the rulebook
    pub path: String,
    /// Affected field
    pub field: FieldId,
    /// Literal as written
    pub literal: String,
    /// Why it was rejected
    pub reason: String,
}

/// Target formatting for one node type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetStyle {
    /// Paragraph-level target
    pub paragraph: ParagraphStyleSpec,
    /// Run-level target
    pub character: CharacterStyleSpec,
    /// Fields skipped because their literal was unusable
    pub field_errors: Vec<FieldError>,
}

struct Builder<'p> {
    path: &'p str,
    errors: Vec<FieldError>,
}

impl Builder<'_> {
    fn soft<T>(&mut self, field: FieldId, literal: &Scalar, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!(
                    "{}: ignoring {} = {:?}: {}",
                    self.path,
                    field,
                    literal.to_string(),
                    err
                );
                self.errors.push(FieldError {
                    path: self.path.to_string(),
                    field,
                    literal: literal.to_string(),
                    reason: err.to_string(),
                });
                None
            }
        }
    }
}

fn measure(literal: &Scalar, default_unit: UnitKind) -> Result<MeasurementValue> {
    match literal {
        Scalar::Number(n) => Ok(MeasurementValue::new(*n, default_unit)),
        Scalar::Text(s) => parse_measurement_with_default(s, default_unit),
    }
}

fn require_unit(value: MeasurementValue, unit: UnitKind) -> Result<MeasurementValue> {
    value.convert_to(unit)
}

fn spacing_lines(literal: &Scalar) -> Result<f64> {
    let value = measure(literal, UnitKind::LineMultiple)?;
    Ok(require_unit(value, UnitKind::LineMultiple)?.magnitude)
}

fn indent(literal: &Scalar) -> Result<MeasurementValue> {
    let value = measure(literal, UnitKind::CharacterWidth)?;
    if value.unit == UnitKind::LineMultiple {
        return Err(Error::UnitIncompatible {
            from: value.unit.to_string(),
            to: UnitKind::CharacterWidth.to_string(),
        });
    }
    Ok(value)
}

fn line_spacing(literal: &Scalar, rule: Option<LineSpacingRule>) -> Result<LineSpacing> {
    let value = measure(literal, UnitKind::LineMultiple)?;
    match value.unit {
        UnitKind::LineMultiple => match rule {
            Some(r) if !r.is_proportional() => Err(Error::UnitIncompatible {
                from: UnitKind::LineMultiple.to_string(),
                to: UnitKind::Point.to_string(),
            }),
            _ => Ok(LineSpacing::multiple(value.magnitude)),
        },
        UnitKind::CharacterWidth => Err(Error::UnitIncompatible {
            from: value.unit.to_string(),
            to: UnitKind::LineMultiple.to_string(),
        }),
        _ => {
            let points = value.to_points()?;
            Ok(match rule {
                Some(LineSpacingRule::AtLeast) => LineSpacing::at_least(points),
                _ => LineSpacing::exact(points),
            })
        }
    }
}

fn font_size(literal: &Scalar) -> Result<f64> {
    measure(literal, UnitKind::Point)?.to_points()
}

fn color(path: &str, literal: &str) -> Result<Rgb> {
    let lowered = literal.trim().to_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, rgb)| *rgb)
        .or_else(|| Rgb::from_hex(&lowered))
        .ok_or_else(|| Error::config_invalid(path, format!("unknown font color '{}'", literal)))
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Build the target for a node from its (defaults-merged) fragment.
///
/// Unknown alignment, line-spacing rule or color labels fail with
/// [`Error::ConfigInvalid`]. Measurement literals that do not parse, or whose
/// unit cannot serve the field, are recorded in
/// [`TargetStyle::field_errors`] and that field is not checked.
pub fn build_target(path: &str, fragment: &StyleFragment) -> Result<TargetStyle> {
    let mut b = Builder {
        path,
        errors: Vec::new(),
    };

    let alignment = match &fragment.alignment {
        Some(label) => Some(Alignment::from_label(label).ok_or_else(|| {
            Error::config_invalid(path, format!("unknown alignment '{}'", label))
        })?),
        None => None,
    };

    let rule = match &fragment.line_spacing_rule {
        Some(label) => Some(LineSpacingRule::from_label(label).ok_or_else(|| {
            Error::config_invalid(path, format!("unknown line spacing rule '{}'", label))
        })?),
        None => None,
    };

    let paragraph = ParagraphStyleSpec {
        alignment,
        space_before: fragment
            .space_before
            .as_ref()
            .and_then(|l| b.soft(FieldId::SpaceBefore, l, spacing_lines(l))),
        space_after: fragment
            .space_after
            .as_ref()
            .and_then(|l| b.soft(FieldId::SpaceAfter, l, spacing_lines(l))),
        line_spacing: fragment
            .line_spacing
            .as_ref()
            .and_then(|l| b.soft(FieldId::LineSpacing, l, line_spacing(l, rule))),
        first_line_indent: fragment
            .first_line_indent
            .as_ref()
            .and_then(|l| b.soft(FieldId::FirstLineIndent, l, indent(l))),
        left_indent: fragment
            .left_indent
            .as_ref()
            .and_then(|l| b.soft(FieldId::LeftIndent, l, indent(l))),
        right_indent: fragment
            .right_indent
            .as_ref()
            .and_then(|l| b.soft(FieldId::RightIndent, l, indent(l))),
        builtin_style_name: non_blank(&fragment.builtin_style_name),
    };

    let character = CharacterStyleSpec {
        east_asia_font: non_blank(&fragment.chinese_font_name),
        latin_font: non_blank(&fragment.english_font_name),
        font_size: fragment
            .font_size
            .as_ref()
            .and_then(|l| b.soft(FieldId::FontSize, l, font_size(l))),
        color: match &fragment.font_color {
            Some(literal) => Some(color(path, literal)?),
            None => None,
        },
        bold: fragment.bold,
        italic: fragment.italic,
        underline: fragment.underline,
    };

    Ok(TargetStyle {
        paragraph,
        character,
        field_errors: b.errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(yaml: &str) -> StyleFragment {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_full_fragment() {
        let target = build_target(
            "headings.level_1",
            &fragment(concat!(
                "alignment: 居中\n",
                "space_before: 0.5\n",
                "space_after: 0.5行\n",
                "line_spacing: 1.5倍\n",
                "first_line_indent: 0\n",
                "builtin_style_name: Heading 1\n",
                "chinese_font_name: 黑体\n",
                "english_font_name: Times New Roman\n",
                "font_size: 三号\n",
                "font_color: 黑色\n",
                "bold: true\n",
            )),
        )
        .unwrap();
        let p = &target.paragraph;
        assert_eq!(p.alignment, Some(Alignment::Center));
        assert_eq!(p.space_before, Some(0.5));
        assert_eq!(p.space_after, Some(0.5));
        assert_eq!(p.line_spacing, Some(LineSpacing::multiple(1.5)));
        assert_eq!(p.first_line_indent, Some(MeasurementValue::chars(0.0)));
        assert_eq!(p.builtin_style_name.as_deref(), Some("Heading 1"));
        let c = &target.character;
        assert_eq!(c.font_size, Some(16.0));
        assert_eq!(c.color, Some(Rgb::BLACK));
        assert_eq!(c.bold, Some(true));
        assert_eq!(c.italic, None);
        assert!(target.field_errors.is_empty());
    }

    #[test]
    fn test_absolute_line_spacing() {
        let target = build_target("body_text", &fragment("line_spacing: 20磅\n")).unwrap();
        assert_eq!(target.paragraph.line_spacing, Some(LineSpacing::exact(20.0)));

        let target = build_target(
            "body_text",
            &fragment("line_spacing: 20pt\nline_spacing_rule: 最小值\n"),
        )
        .unwrap();
        assert_eq!(target.paragraph.line_spacing, Some(LineSpacing::at_least(20.0)));
    }

    #[test]
    fn test_bad_measurement_is_soft() {
        let target = build_target(
            "body_text",
            &fragment("font_size: 巨大\nspace_before: 12pt\nbold: true\n"),
        )
        .unwrap();
        assert_eq!(target.character.font_size, None);
        assert_eq!(target.paragraph.space_before, None);
        assert_eq!(target.character.bold, Some(true));
        let fields: Vec<_> = target.field_errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![FieldId::SpaceBefore, FieldId::FontSize]);
    }

    #[test]
    fn test_bad_labels_are_fatal() {
        assert!(matches!(
            build_target("x", &fragment("alignment: sideways\n")),
            Err(Error::ConfigInvalid { .. })
        ));
        assert!(matches!(
            build_target("x", &fragment("font_color: 彩虹\n")),
            Err(Error::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_hex_color() {
        let target = build_target("x", &fragment("font_color: \"#FF0000\"\n")).unwrap();
        assert_eq!(target.character.color, Some(Rgb(255, 0, 0)));
    }
}
