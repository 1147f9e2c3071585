//! Paragraph and character attribute sets.
//!
//! The same shapes serve as *effective* values (read from a live paragraph,
//! `None` = set nowhere in the cascade) and as *targets* (built from the
//! rulebook, `None` = not checked).

use serde::{Deserialize, Serialize};

use crate::model::{Alignment, LineSpacing, Rgb};
use crate::units::MeasurementValue;

/// Paragraph-level formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyleSpec {
    /// Alignment
    pub alignment: Option<Alignment>,
    /// Space before, in lines
    pub space_before: Option<f64>,
    /// Space after, in lines
    pub space_after: Option<f64>,
    /// Line spacing
    pub line_spacing: Option<LineSpacing>,
    /// First-line indent (negative = hanging)
    pub first_line_indent: Option<MeasurementValue>,
    /// Left indent
    pub left_indent: Option<MeasurementValue>,
    /// Right indent
    pub right_indent: Option<MeasurementValue>,
    /// Built-in style display name
    pub builtin_style_name: Option<String>,
}

/// Character-level formatting of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterStyleSpec {
    /// East-Asian (CJK) font
    pub east_asia_font: Option<String>,
    /// Latin font
    pub latin_font: Option<String>,
    /// Size in points
    pub font_size: Option<f64>,
    /// Font color
    pub color: Option<Rgb>,
    /// Bold
    pub bold: Option<bool>,
    /// Italic
    pub italic: Option<bool>,
    /// Underline
    pub underline: Option<bool>,
}

impl CharacterStyleSpec {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == CharacterStyleSpec::default()
    }
}

impl ParagraphStyleSpec {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == ParagraphStyleSpec::default()
    }
}
