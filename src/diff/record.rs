//! Field identifiers, diff records and their bilingual messages.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::model::{Alignment, LineSpacing, LineSpacingRule, Rgb};
use crate::units::{MeasurementValue, UnitKind};

/// A checkable formatting field.
///
/// Variant order is the reporting order within one severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    /// Paragraph alignment
    Alignment,
    /// Space before, in lines
    SpaceBefore,
    /// Space after, in lines
    SpaceAfter,
    /// Line spacing
    LineSpacing,
    /// First-line indent
    FirstLineIndent,
    /// Left indent
    LeftIndent,
    /// Right indent
    RightIndent,
    /// Built-in paragraph style
    BuiltinStyleName,
    /// Bold
    Bold,
    /// Italic
    Italic,
    /// Underline
    Underline,
    /// Font size
    FontSize,
    /// Font color
    FontColor,
    /// East-Asian font
    ChineseFont,
    /// Latin font
    EnglishFont,
    /// Text-level pattern (numbering, captions, keyword lists)
    TextPattern,
}

impl FieldId {
    /// Paragraph-level fields, in reporting order.
    pub const PARAGRAPH: [FieldId; 8] = [
        FieldId::Alignment,
        FieldId::SpaceBefore,
        FieldId::SpaceAfter,
        FieldId::LineSpacing,
        FieldId::FirstLineIndent,
        FieldId::LeftIndent,
        FieldId::RightIndent,
        FieldId::BuiltinStyleName,
    ];

    /// Run-level fields, in reporting order.
    pub const CHARACTER: [FieldId; 7] = [
        FieldId::Bold,
        FieldId::Italic,
        FieldId::Underline,
        FieldId::FontSize,
        FieldId::FontColor,
        FieldId::ChineseFont,
        FieldId::EnglishFont,
    ];

    /// Severity rank; lower is reported (and corrected) first.
    ///
    /// Text problems come before structure, structure before spacing and
    /// indentation, and those before cosmetic run formatting.
    pub fn severity(self) -> u8 {
        match self {
            FieldId::TextPattern => 0,
            FieldId::Alignment | FieldId::BuiltinStyleName => 1,
            FieldId::SpaceBefore
            | FieldId::SpaceAfter
            | FieldId::LineSpacing
            | FieldId::FirstLineIndent
            | FieldId::LeftIndent
            | FieldId::RightIndent => 2,
            _ => 3,
        }
    }

    /// Whether the correction engine can fix this field.
    pub fn is_correctable(self) -> bool {
        self != FieldId::TextPattern
    }

    /// Whether this is a run-level field.
    pub fn is_character(self) -> bool {
        FieldId::CHARACTER.contains(&self)
    }

    /// Human label.
    pub fn label(self, language: Language) -> &'static str {
        match language {
            Language::Zh => match self {
                FieldId::Alignment => "对齐方式",
                FieldId::SpaceBefore => "段前间距",
                FieldId::SpaceAfter => "段后间距",
                FieldId::LineSpacing => "行距",
                FieldId::FirstLineIndent => "首行缩进",
                FieldId::LeftIndent => "左缩进",
                FieldId::RightIndent => "右缩进",
                FieldId::BuiltinStyleName => "样式",
                FieldId::Bold => "加粗",
                FieldId::Italic => "倾斜",
                FieldId::Underline => "下划线",
                FieldId::FontSize => "字号",
                FieldId::FontColor => "字体颜色",
                FieldId::ChineseFont => "中文字体",
                FieldId::EnglishFont => "西文字体",
                FieldId::TextPattern => "文本格式",
            },
            Language::En => match self {
                FieldId::Alignment => "alignment",
                FieldId::SpaceBefore => "space before",
                FieldId::SpaceAfter => "space after",
                FieldId::LineSpacing => "line spacing",
                FieldId::FirstLineIndent => "first-line indent",
                FieldId::LeftIndent => "left indent",
                FieldId::RightIndent => "right indent",
                FieldId::BuiltinStyleName => "style",
                FieldId::Bold => "bold",
                FieldId::Italic => "italic",
                FieldId::Underline => "underline",
                FieldId::FontSize => "font size",
                FieldId::FontColor => "font color",
                FieldId::ChineseFont => "CJK font",
                FieldId::EnglishFont => "Latin font",
                FieldId::TextPattern => "text",
            },
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(Language::En))
    }
}

/// Message language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Simplified Chinese
    #[default]
    Zh,
    /// English
    En,
}

impl std::str::FromStr for Language {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "cn" | "zh-cn" | "chinese" => Ok(Language::Zh),
            "en" | "english" => Ok(Language::En),
            other => Err(crate::error::Error::Other(format!(
                "unknown language: {}",
                other
            ))),
        }
    }
}

/// One side of a diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DiffValue {
    /// Not set anywhere
    Unset,
    /// Alignment
    Alignment(Alignment),
    /// Line count (paragraph spacing)
    Lines(f64),
    /// Line spacing
    LineSpacing(LineSpacing),
    /// Indent or other measurement
    Measure(MeasurementValue),
    /// Font size in points
    Points(f64),
    /// On/off property of the given field
    Flag(bool),
    /// Color
    Color(Rgb),
    /// Font name, style name or text
    Text(String),
}

impl DiffValue {
    /// Render for a message about `field`.
    pub fn describe(&self, field: FieldId, language: Language) -> String {
        let zh = language == Language::Zh;
        match self {
            DiffValue::Unset => if zh { "未设置" } else { "not set" }.to_string(),
            DiffValue::Alignment(a) => {
                if zh {
                    a.label_zh().to_string()
                } else {
                    a.to_string()
                }
            }
            DiffValue::Lines(v) => {
                if zh {
                    format!("{}行", v)
                } else {
                    format!("{} lines", v)
                }
            }
            DiffValue::LineSpacing(ls) => describe_line_spacing(ls, zh),
            DiffValue::Measure(m) => match (m.unit, zh) {
                (UnitKind::CharacterWidth, true) => format!("{}字符", m.magnitude),
                (UnitKind::CharacterWidth, false) => format!("{} chars", m.magnitude),
                (UnitKind::LineMultiple, true) => format!("{}行", m.magnitude),
                _ => m.to_string(),
            },
            DiffValue::Points(p) => {
                if zh {
                    format!("{}磅", p)
                } else {
                    format!("{}pt", p)
                }
            }
            DiffValue::Flag(on) => describe_flag(field, *on, zh).to_string(),
            DiffValue::Color(c) => c.to_string(),
            DiffValue::Text(s) => {
                if zh {
                    format!("“{}”", s)
                } else {
                    format!("\"{}\"", s)
                }
            }
        }
    }
}

fn describe_line_spacing(ls: &LineSpacing, zh: bool) -> String {
    match (ls.rule, zh) {
        (LineSpacingRule::Single, true) => "单倍行距".to_string(),
        (LineSpacingRule::OneAndHalf, true) => "1.5倍行距".to_string(),
        (LineSpacingRule::Double, true) => "双倍行距".to_string(),
        (LineSpacingRule::Multiple, true) => format!("{}倍行距", ls.value),
        (LineSpacingRule::Exact, true) => format!("固定值{}磅", ls.value),
        (LineSpacingRule::AtLeast, true) => format!("最小值{}磅", ls.value),
        (LineSpacingRule::Single, false) => "single".to_string(),
        (LineSpacingRule::OneAndHalf, false) => "1.5 lines".to_string(),
        (LineSpacingRule::Double, false) => "double".to_string(),
        (LineSpacingRule::Multiple, false) => format!("{} lines", ls.value),
        (LineSpacingRule::Exact, false) => format!("exactly {}pt", ls.value),
        (LineSpacingRule::AtLeast, false) => format!("at least {}pt", ls.value),
    }
}

fn describe_flag(field: FieldId, on: bool, zh: bool) -> &'static str {
    match (field, on, zh) {
        (FieldId::Bold, true, true) => "加粗",
        (FieldId::Bold, false, true) => "不加粗",
        (FieldId::Bold, true, false) => "bold",
        (FieldId::Bold, false, false) => "not bold",
        (FieldId::Italic, true, true) => "倾斜",
        (FieldId::Italic, false, true) => "不倾斜",
        (FieldId::Italic, true, false) => "italic",
        (FieldId::Italic, false, false) => "not italic",
        (FieldId::Underline, true, true) => "有下划线",
        (FieldId::Underline, false, true) => "无下划线",
        (FieldId::Underline, true, false) => "underlined",
        (FieldId::Underline, false, false) => "not underlined",
        (_, true, true) => "是",
        (_, false, true) => "否",
        (_, true, false) => "on",
        (_, false, false) => "off",
    }
}

/// One mismatch between effective and target formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    /// Field that differs
    pub field: FieldId,
    /// Value the rulebook asks for
    pub expected: DiffValue,
    /// Value found in the document
    pub current: DiffValue,
    /// Human message
    pub message: String,
    /// Severity rank (see [`FieldId::severity`])
    pub severity: u8,
}

impl DiffRecord {
    /// Build a record and its message.
    pub fn new(
        field: FieldId,
        expected: DiffValue,
        current: DiffValue,
        language: Language,
    ) -> Self {
        let message = mismatch_message(field, &expected, &current, language);
        Self {
            field,
            expected,
            current,
            message,
            severity: field.severity(),
        }
    }

    /// A text-level finding with a free-form message.
    pub fn text_issue(message: impl Into<String>) -> Self {
        Self {
            field: FieldId::TextPattern,
            expected: DiffValue::Unset,
            current: DiffValue::Unset,
            message: message.into(),
            severity: FieldId::TextPattern.severity(),
        }
    }

    /// Past-tense message used after the record has been applied.
    pub fn correction_message(&self, language: Language) -> String {
        let label = self.field.label(language);
        let from = self.current.describe(self.field, language);
        let to = self.expected.describe(self.field, language);
        match language {
            Language::Zh => format!("{}：已由{}改为{}", label, from, to),
            Language::En => format!("{}: changed from {} to {}", label, from, to),
        }
    }
}

fn mismatch_message(
    field: FieldId,
    expected: &DiffValue,
    current: &DiffValue,
    language: Language,
) -> String {
    let label = field.label(language);
    let expected = expected.describe(field, language);
    let current = current.describe(field, language);
    match language {
        Language::Zh => format!("{}：应为{}，当前为{}", label, expected, current),
        Language::En => format!("{}: expected {}, found {}", label, expected, current),
    }
}

/// Stable sort by severity; fields of equal severity keep their order.
pub fn sort_by_severity(records: &mut [DiffRecord]) {
    records.sort_by_key(|r| r.severity);
}

/// Per-field switch for which checks are reported.
///
/// Masking is applied after diffing, so disabled fields are still computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningMask {
    disabled: BTreeSet<FieldId>,
}

impl WarningMask {
    /// Every field enabled.
    pub fn all_enabled() -> Self {
        Self::default()
    }

    /// Build from `field: bool` flags; unlisted fields stay enabled.
    pub fn from_flags(flags: BTreeMap<FieldId, bool>) -> Self {
        Self {
            disabled: flags
                .into_iter()
                .filter(|(_, enabled)| !enabled)
                .map(|(field, _)| field)
                .collect(),
        }
    }

    /// Disable one field.
    pub fn disable(mut self, field: FieldId) -> Self {
        self.disabled.insert(field);
        self
    }

    /// Whether a field is reported.
    pub fn is_enabled(&self, field: FieldId) -> bool {
        !self.disabled.contains(&field)
    }

    /// Drop records of disabled fields.
    pub fn apply(&self, records: Vec<DiffRecord>) -> Vec<DiffRecord> {
        records
            .into_iter()
            .filter(|r| self.is_enabled(r.field))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(FieldId::TextPattern.severity() < FieldId::Alignment.severity());
        assert_eq!(
            FieldId::Alignment.severity(),
            FieldId::BuiltinStyleName.severity()
        );
        assert!(FieldId::FirstLineIndent.severity() < FieldId::Bold.severity());
        assert!(!FieldId::TextPattern.is_correctable());
    }

    #[test]
    fn test_messages() {
        let record = DiffRecord::new(
            FieldId::Bold,
            DiffValue::Flag(true),
            DiffValue::Flag(false),
            Language::En,
        );
        assert_eq!(record.message, "bold: expected bold, found not bold");
        assert_eq!(
            record.correction_message(Language::En),
            "bold: changed from not bold to bold"
        );

        let record = DiffRecord::new(
            FieldId::FontSize,
            DiffValue::Points(12.0),
            DiffValue::Points(10.5),
            Language::Zh,
        );
        assert_eq!(record.message, "字号：应为12磅，当前为10.5磅");
    }

    fn flag_record(field: FieldId, expected: bool) -> DiffRecord {
        DiffRecord::new(
            field,
            DiffValue::Flag(expected),
            DiffValue::Flag(!expected),
            Language::En,
        )
    }

    #[test]
    fn test_stable_sort() {
        let alignment = DiffRecord::new(
            FieldId::Alignment,
            DiffValue::Alignment(Alignment::Center),
            DiffValue::Alignment(Alignment::Left),
            Language::En,
        );
        let mut records = vec![
            flag_record(FieldId::Bold, true),
            alignment,
            flag_record(FieldId::Italic, false),
            DiffRecord::text_issue("numbering"),
        ];
        sort_by_severity(&mut records);
        let fields: Vec<_> = records.iter().map(|r| r.field).collect();
        assert_eq!(
            fields,
            vec![FieldId::TextPattern, FieldId::Alignment, FieldId::Bold, FieldId::Italic]
        );
    }

    #[test]
    fn test_mask() {
        let mut flags = BTreeMap::new();
        flags.insert(FieldId::Italic, false);
        flags.insert(FieldId::Bold, true);
        let mask = WarningMask::from_flags(flags);
        assert!(mask.is_enabled(FieldId::Bold));
        assert!(!mask.is_enabled(FieldId::Italic));
        assert!(mask.is_enabled(FieldId::FontSize));

        let records = vec![
            flag_record(FieldId::Italic, false),
            flag_record(FieldId::Bold, true),
        ];
        let kept = mask.apply(records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].field, FieldId::Bold);
    }

    #[test]
    fn test_field_id_yaml_names() {
        let flags: BTreeMap<FieldId, bool> =
            serde_yaml::from_str("first_line_indent: false\nchinese_font: true\n").unwrap();
        assert_eq!(flags.get(&FieldId::FirstLineIndent), Some(&false));
        assert_eq!(flags.get(&FieldId::ChineseFont), Some(&true));
    }
}
