//! Per-node style fragments as written in the rulebook.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rulebook scalar: YAML numbers and strings are both accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Bare number
    Number(f64),
    /// Literal such as `"2字符"` or `"小四"`
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Unit-agnostic key/value pairs describing one node type's formatting.
///
/// Every field is optional; absent fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleFragment {
    /// Alignment label (`居中`, `justify`, ...)
    pub alignment: Option<String>,
    /// Space before, in lines
    pub space_before: Option<Scalar>,
    /// Space after, in lines
    pub space_after: Option<Scalar>,
    /// Line spacing (`1.5倍`, `20磅`, `单倍行距`)
    pub line_spacing: Option<Scalar>,
    /// Explicit line spacing rule (`exact`, `at_least`, `multiple`)
    pub line_spacing_rule: Option<String>,
    /// First-line indent (`2字符`, `0.74cm`)
    pub first_line_indent: Option<Scalar>,
    /// Left indent
    pub left_indent: Option<Scalar>,
    /// Right indent
    pub right_indent: Option<Scalar>,
    /// Built-in paragraph style name (`Heading 1`)
    pub builtin_style_name: Option<String>,
    /// East-Asian font
    pub chinese_font_name: Option<String>,
    /// Latin font
    pub english_font_name: Option<String>,
    /// Font size (`小四`, `12pt`, `12`)
    pub font_size: Option<Scalar>,
    /// Font color (`黑色`, `#000000`)
    pub font_color: Option<String>,
    /// Bold
    pub bold: Option<bool>,
    /// Italic
    pub italic: Option<bool>,
    /// Underline
    pub underline: Option<bool>,
}

impl StyleFragment {
    /// Fill every unset field from `base`.
    pub fn merged_over(&self, base: &StyleFragment) -> StyleFragment {
        StyleFragment {
            alignment: self.alignment.clone().or_else(|| base.alignment.clone()),
            space_before: self.space_before.clone().or_else(|| base.space_before.clone()),
            space_after: self.space_after.clone().or_else(|| base.space_after.clone()),
            line_spacing: self.line_spacing.clone().or_else(|| base.line_spacing.clone()),
            line_spacing_rule: self
                .line_spacing_rule
                .clone()
                .or_else(|| base.line_spacing_rule.clone()),
            first_line_indent: self
                .first_line_indent
                .clone()
                .or_else(|| base.first_line_indent.clone()),
            left_indent: self.left_indent.clone().or_else(|| base.left_indent.clone()),
            right_indent: self.right_indent.clone().or_else(|| base.right_indent.clone()),
            builtin_style_name: self
                .builtin_style_name
                .clone()
                .or_else(|| base.builtin_style_name.clone()),
            chinese_font_name: self
                .chinese_font_name
                .clone()
                .or_else(|| base.chinese_font_name.clone()),
            english_font_name: self
                .english_font_name
                .clone()
                .or_else(|| base.english_font_name.clone()),
            font_size: self.font_size.clone().or_else(|| base.font_size.clone()),
            font_color: self.font_color.clone().or_else(|| base.font_color.clone()),
            bold: self.bold.or(base.bold),
            italic: self.italic.or(base.italic),
            underline: self.underline.or(base.underline),
        }
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == StyleFragment::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_accepts_numbers_and_text() {
        let fragment: StyleFragment =
            serde_yaml::from_str("font_size: 12\nfirst_line_indent: 2字符\nbold: true").unwrap();
        assert_eq!(fragment.font_size, Some(Scalar::Number(12.0)));
        assert_eq!(
            fragment.first_line_indent,
            Some(Scalar::Text("2字符".to_string()))
        );
        assert_eq!(fragment.bold, Some(true));
    }

    #[test]
    fn test_merge_keeps_own_values() {
        let base = StyleFragment {
            bold: Some(false),
            font_size: Some(Scalar::Text("小四".into())),
            ..Default::default()
        };
        let node = StyleFragment {
            bold: Some(true),
            ..Default::default()
        };
        let merged = node.merged_over(&base);
        assert_eq!(merged.bold, Some(true));
        assert_eq!(merged.font_size, Some(Scalar::Text("小四".into())));
        assert!(StyleFragment::default().is_empty());
        assert!(!merged.is_empty());
    }
}
