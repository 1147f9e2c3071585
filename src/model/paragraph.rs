//! Paragraph-level views, setters and the raw attribute escape hatch.
//!
//! Line-based spacing (`w:beforeLines`) and character-based indents
//! (`w:firstLineChars`) have no portable high-level equivalent, so they are
//! written through the narrowly scoped `set_*` methods on [`ParagraphMut`].
//! Each of those keeps exactly one representational key per attribute.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::run::{Run, RunMut};
use super::xml::XmlElement;
use crate::error::Result;
use crate::units::{points_to_twips, twips_to_points, MeasurementValue, UnitKind};

/// Schema order of the `w:pPr` children.
pub(crate) const PPR_ORDER: &[&str] = &[
    "w:pStyle",
    "w:keepNext",
    "w:keepLines",
    "w:pageBreakBefore",
    "w:framePr",
    "w:widowControl",
    "w:numPr",
    "w:suppressLineNumbers",
    "w:pBdr",
    "w:shd",
    "w:tabs",
    "w:suppressAutoHyphens",
    "w:kinsoku",
    "w:wordWrap",
    "w:overflowPunct",
    "w:topLinePunct",
    "w:autoSpaceDE",
    "w:autoSpaceDN",
    "w:bidi",
    "w:adjustRightInd",
    "w:snapToGrid",
    "w:spacing",
    "w:ind",
    "w:contextualSpacing",
    "w:mirrorIndents",
    "w:suppressOverlap",
    "w:jc",
    "w:textDirection",
    "w:textAlignment",
    "w:textboxTightWrap",
    "w:outlineLvl",
    "w:divId",
    "w:cnfStyle",
    "w:rPr",
    "w:sectPr",
    "w:pPrChange",
];

/// Base line pitch for `lineRule="auto"` (240 = single spacing).
const AUTO_LINE_UNIT: f64 = 240.0;

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
    /// Distributed alignment
    Distribute,
}

impl Alignment {
    /// Parse a `w:jc` value.
    pub fn from_ooxml(value: &str) -> Option<Alignment> {
        match value {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "justify" => Some(Alignment::Justify),
            "distribute" => Some(Alignment::Distribute),
            _ => None,
        }
    }

    /// Value written to `w:jc`.
    pub fn to_ooxml(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
            Alignment::Distribute => "distribute",
        }
    }

    /// Parse a rulebook label (English or Chinese).
    pub fn from_label(label: &str) -> Option<Alignment> {
        match label.trim().to_lowercase().as_str() {
            "left" | "左对齐" | "左" => Some(Alignment::Left),
            "center" | "centre" | "居中" | "居中对齐" => Some(Alignment::Center),
            "right" | "右对齐" | "右" => Some(Alignment::Right),
            "justify" | "both" | "两端对齐" => Some(Alignment::Justify),
            "distribute" | "分散对齐" => Some(Alignment::Distribute),
            _ => None,
        }
    }

    /// Chinese display label.
    pub fn label_zh(self) -> &'static str {
        match self {
            Alignment::Left => "左对齐",
            Alignment::Center => "居中",
            Alignment::Right => "右对齐",
            Alignment::Justify => "两端对齐",
            Alignment::Distribute => "分散对齐",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
            Alignment::Distribute => "distribute",
        };
        f.write_str(name)
    }
}

/// Line spacing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineSpacingRule {
    /// Single (1.0 lines)
    Single,
    /// 1.5 lines
    OneAndHalf,
    /// Double (2.0 lines)
    Double,
    /// At least the given points
    AtLeast,
    /// Exactly the given points
    Exact,
    /// Arbitrary multiple of single spacing
    Multiple,
}

impl LineSpacingRule {
    /// Whether the value is a multiple of single spacing (OOXML `auto`).
    pub fn is_proportional(self) -> bool {
        !matches!(self, LineSpacingRule::AtLeast | LineSpacingRule::Exact)
    }

    /// Parse a rulebook label.
    pub fn from_label(label: &str) -> Option<LineSpacingRule> {
        match label.trim().to_lowercase().as_str() {
            "single" | "单倍行距" => Some(LineSpacingRule::Single),
            "one_and_half" | "1.5" | "1.5倍行距" => Some(LineSpacingRule::OneAndHalf),
            "double" | "双倍行距" | "2倍行距" => Some(LineSpacingRule::Double),
            "at_least" | "atleast" | "最小值" => Some(LineSpacingRule::AtLeast),
            "exact" | "exactly" | "固定值" => Some(LineSpacingRule::Exact),
            "multiple" | "多倍行距" => Some(LineSpacingRule::Multiple),
            _ => None,
        }
    }
}

/// Line spacing value and rule.
///
/// Proportional rules carry a line multiple, `AtLeast`/`Exact` carry points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSpacing {
    /// How `value` is interpreted
    pub rule: LineSpacingRule,
    /// Line multiple or points
    pub value: f64,
}

impl LineSpacing {
    /// Proportional spacing; picks the named rule for 1, 1.5 and 2.
    pub fn multiple(lines: f64) -> Self {
        let rule = if (lines - 1.0).abs() < 1e-6 {
            LineSpacingRule::Single
        } else if (lines - 1.5).abs() < 1e-6 {
            LineSpacingRule::OneAndHalf
        } else if (lines - 2.0).abs() < 1e-6 {
            LineSpacingRule::Double
        } else {
            LineSpacingRule::Multiple
        };
        Self { rule, value: lines }
    }

    /// Exact spacing in points.
    pub fn exact(points: f64) -> Self {
        Self {
            rule: LineSpacingRule::Exact,
            value: points,
        }
    }

    /// Minimum spacing in points.
    pub fn at_least(points: f64) -> Self {
        Self {
            rule: LineSpacingRule::AtLeast,
            value: points,
        }
    }

    /// Field equality: proportional rules compare by multiple.
    pub fn approx_eq(&self, other: &LineSpacing) -> bool {
        match (self.rule.is_proportional(), other.rule.is_proportional()) {
            (true, true) => (self.value - other.value).abs() < 0.01,
            (false, false) => self.rule == other.rule && (self.value - other.value).abs() < 0.05,
            _ => false,
        }
    }
}

impl fmt::Display for LineSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            LineSpacingRule::AtLeast => write!(f, ">={}pt", self.value),
            LineSpacingRule::Exact => write!(f, "{}pt", self.value),
            _ => write!(f, "{}x", self.value),
        }
    }
}

/// Before/after paragraph spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingSide {
    /// Space before
    Before,
    /// Space after
    After,
}

impl SpacingSide {
    fn lines_key(self) -> &'static str {
        match self {
            SpacingSide::Before => "w:beforeLines",
            SpacingSide::After => "w:afterLines",
        }
    }

    fn length_key(self) -> &'static str {
        match self {
            SpacingSide::Before => "w:before",
            SpacingSide::After => "w:after",
        }
    }

    fn autospacing_key(self) -> &'static str {
        match self {
            SpacingSide::Before => "w:beforeAutospacing",
            SpacingSide::After => "w:afterAutospacing",
        }
    }
}

/// Left/right paragraph indent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentSide {
    /// Left (start) indent
    Left,
    /// Right (end) indent
    Right,
}

impl IndentSide {
    fn keys(self) -> [&'static str; 4] {
        match self {
            IndentSide::Left => ["w:leftChars", "w:startChars", "w:left", "w:start"],
            IndentSide::Right => ["w:rightChars", "w:endChars", "w:right", "w:end"],
        }
    }
}

const FIRST_LINE_KEYS: [&str; 4] = [
    "w:firstLineChars",
    "w:hangingChars",
    "w:firstLine",
    "w:hanging",
];

fn parse_num(element: &XmlElement, key: &str) -> Option<f64> {
    element.attr(key).and_then(|v| v.trim().parse::<f64>().ok())
}

/// Read-only view over a `w:pPr` element (direct or style level).
#[derive(Debug, Clone, Copy)]
pub struct ParagraphProperties<'a> {
    element: &'a XmlElement,
}

impl<'a> ParagraphProperties<'a> {
    /// Wrap a `w:pPr` element.
    pub fn new(element: &'a XmlElement) -> Self {
        Self { element }
    }

    /// Paragraph style id (`w:pStyle`).
    pub fn style_id(&self) -> Option<&'a str> {
        self.element.child("w:pStyle").and_then(|e| e.attr("w:val"))
    }

    /// Alignment (`w:jc`).
    pub fn alignment(&self) -> Option<Alignment> {
        self.element
            .child("w:jc")
            .and_then(|e| e.attr("w:val"))
            .and_then(Alignment::from_ooxml)
    }

    /// Spacing in lines; only the line-count attribute is consulted.
    pub fn spacing_lines(&self, side: SpacingSide) -> Option<f64> {
        let spacing = self.element.child("w:spacing")?;
        parse_num(spacing, side.lines_key()).map(|hundredths| hundredths / 100.0)
    }

    /// Line spacing (`w:line` + `w:lineRule`).
    pub fn line_spacing(&self) -> Option<LineSpacing> {
        let spacing = self.element.child("w:spacing")?;
        let line = parse_num(spacing, "w:line")?;
        let spacing = match spacing.attr("w:lineRule").unwrap_or("auto") {
            "exact" => LineSpacing::exact(twips_to_points(line)),
            "atLeast" => LineSpacing::at_least(twips_to_points(line)),
            _ => LineSpacing::multiple(line / AUTO_LINE_UNIT),
        };
        Some(spacing)
    }

    /// First-line indent; hanging indents come back negative.
    ///
    /// A non-zero character-unit key wins over a length key. Word ignores a
    /// zero character key, so `firstLineChars="0"` falls through to the
    /// length keys and reads as zero only when they are zero or absent.
    pub fn first_line_indent(&self) -> Option<MeasurementValue> {
        let ind = self.element.child("w:ind")?;
        let first_chars = parse_num(ind, "w:firstLineChars");
        let hanging_chars = parse_num(ind, "w:hangingChars");
        if let Some(v) = first_chars.filter(|v| *v != 0.0) {
            return Some(MeasurementValue::chars(v / 100.0));
        }
        if let Some(v) = hanging_chars.filter(|v| *v != 0.0) {
            return Some(MeasurementValue::chars(-v / 100.0));
        }

        let first = parse_num(ind, "w:firstLine");
        let hanging = parse_num(ind, "w:hanging");
        if let Some(v) = first.filter(|v| *v != 0.0) {
            return Some(MeasurementValue::points(twips_to_points(v)));
        }
        if let Some(v) = hanging.filter(|v| *v != 0.0) {
            return Some(MeasurementValue::points(-twips_to_points(v)));
        }
        if first_chars.is_some() || hanging_chars.is_some() {
            return Some(MeasurementValue::chars(0.0));
        }
        first.or(hanging).map(|_| MeasurementValue::points(0.0))
    }

    /// Left or right indent.
    pub fn indent(&self, side: IndentSide) -> Option<MeasurementValue> {
        let ind = self.element.child("w:ind")?;
        let [chars, chars_alt, length, length_alt] = side.keys();
        if let Some(v) = parse_num(ind, chars).or_else(|| parse_num(ind, chars_alt)) {
            return Some(MeasurementValue::chars(v / 100.0));
        }
        parse_num(ind, length)
            .or_else(|| parse_num(ind, length_alt))
            .map(|v| MeasurementValue::points(twips_to_points(v)))
    }

    /// Paragraph-mark run properties.
    pub fn run_properties(&self) -> Option<&'a XmlElement> {
        self.element.child("w:rPr")
    }
}

/// Read-only view of a `w:p` element.
#[derive(Debug, Clone, Copy)]
pub struct Paragraph<'a> {
    element: &'a XmlElement,
}

impl<'a> Paragraph<'a> {
    /// Wrap a `w:p` element.
    pub fn new(element: &'a XmlElement) -> Self {
        Self { element }
    }

    /// Underlying element.
    pub fn element(&self) -> &'a XmlElement {
        self.element
    }

    /// Direct paragraph properties.
    pub fn properties(&self) -> Option<ParagraphProperties<'a>> {
        self.element.child("w:pPr").map(ParagraphProperties::new)
    }

    /// Paragraph style id.
    pub fn style_id(&self) -> Option<&'a str> {
        self.properties().and_then(|p| p.style_id())
    }

    /// Text-bearing runs directly under the paragraph, in order.
    ///
    /// Comment reference runs are excluded so indices stay stable across
    /// annotation passes.
    pub fn runs(&self) -> Vec<Run<'a>> {
        self.element
            .children_named("w:r")
            .map(Run::new)
            .filter(|r| !r.is_comment_reference())
            .collect()
    }

    /// Visible text of the paragraph.
    pub fn text(&self) -> String {
        self.runs().iter().map(|r| r.text()).collect()
    }

    /// Whether the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }
}

/// Mutable view of a `w:p` element.
pub struct ParagraphMut<'a> {
    element: &'a mut XmlElement,
}

impl<'a> ParagraphMut<'a> {
    /// Wrap a `w:p` element.
    pub fn new(element: &'a mut XmlElement) -> Self {
        Self { element }
    }

    /// Read-only view of the same paragraph.
    pub fn as_view(&self) -> Paragraph<'_> {
        Paragraph::new(self.element)
    }

    /// Underlying element.
    pub fn element_mut(&mut self) -> &mut XmlElement {
        self.element
    }

    fn ppr(&mut self) -> &mut XmlElement {
        self.element.ensure_first_child("w:pPr")
    }

    fn spacing(&mut self) -> &mut XmlElement {
        self.ppr().ensure_child("w:spacing", PPR_ORDER)
    }

    fn ind(&mut self) -> &mut XmlElement {
        self.ppr().ensure_child("w:ind", PPR_ORDER)
    }

    /// Set alignment.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.ppr()
            .ensure_child("w:jc", PPR_ORDER)
            .set_attr("w:val", alignment.to_ooxml());
    }

    /// Set the paragraph style id.
    pub fn set_style_id(&mut self, style_id: &str) {
        self.ppr()
            .ensure_child("w:pStyle", PPR_ORDER)
            .set_attr("w:val", style_id);
    }

    /// Set spacing in lines, dropping any length representation.
    pub fn set_spacing_lines(&mut self, side: SpacingSide, lines: f64) {
        let spacing = self.spacing();
        spacing.set_attr(side.lines_key(), ((lines * 100.0).round() as i64).to_string());
        spacing.remove_attr(side.length_key());
        spacing.remove_attr(side.autospacing_key());
    }

    /// Set line spacing and rule.
    pub fn set_line_spacing(&mut self, value: LineSpacing) {
        let (line, rule) = match value.rule {
            LineSpacingRule::Exact => (points_to_twips(value.value), "exact"),
            LineSpacingRule::AtLeast => (points_to_twips(value.value), "atLeast"),
            _ => ((value.value * AUTO_LINE_UNIT).round() as i64, "auto"),
        };
        let spacing = self.spacing();
        spacing.set_attr("w:line", line.to_string());
        spacing.set_attr("w:lineRule", rule);
    }

    /// Set the first-line indent in character widths (negative = hanging).
    pub fn set_first_line_indent_chars(&mut self, chars: f64) {
        if chars.abs() < 1e-9 {
            self.clear_first_line_indent();
            return;
        }
        let ind = self.ind();
        for key in FIRST_LINE_KEYS {
            ind.remove_attr(key);
        }
        let hundredths = ((chars.abs() * 100.0).round() as i64).to_string();
        let key = if chars > 0.0 {
            "w:firstLineChars"
        } else {
            "w:hangingChars"
        };
        ind.set_attr(key, hundredths);
    }

    /// Set the first-line indent as an absolute length (negative = hanging).
    pub fn set_first_line_indent_length(&mut self, length: MeasurementValue) -> Result<()> {
        let points = length.to_points()?;
        if points.abs() < 1e-9 {
            self.clear_first_line_indent();
            return Ok(());
        }
        let ind = self.ind();
        for key in FIRST_LINE_KEYS {
            ind.remove_attr(key);
        }
        let key = if points > 0.0 { "w:firstLine" } else { "w:hanging" };
        ind.set_attr(key, points_to_twips(points.abs()).to_string());
        Ok(())
    }

    /// Reset the first-line indent to zero.
    ///
    /// Every representation key is cleared and both the character and the
    /// length key are written as zero, so no reader falls through to an
    /// inherited value.
    pub fn clear_first_line_indent(&mut self) {
        let ind = self.ind();
        for key in FIRST_LINE_KEYS {
            ind.remove_attr(key);
        }
        ind.set_attr("w:firstLineChars", "0");
        ind.set_attr("w:firstLine", "0");
    }

    /// Set a left/right indent in character widths; sibling keys survive.
    pub fn set_indent_chars(&mut self, side: IndentSide, chars: f64) {
        let [chars_key, chars_alt, length, length_alt] = side.keys();
        let ind = self.ind();
        ind.remove_attr(chars_alt);
        ind.remove_attr(length);
        ind.remove_attr(length_alt);
        ind.set_attr(chars_key, ((chars * 100.0).round() as i64).to_string());
    }

    /// Set a left/right indent as an absolute length.
    pub fn set_indent_length(&mut self, side: IndentSide, length: MeasurementValue) -> Result<()> {
        let points = length.convert_to(UnitKind::Point)?.magnitude;
        let [chars_key, chars_alt, length_key, length_alt] = side.keys();
        let ind = self.ind();
        ind.remove_attr(chars_key);
        ind.remove_attr(chars_alt);
        ind.remove_attr(length_alt);
        ind.set_attr(length_key, points_to_twips(points).to_string());
        Ok(())
    }

    /// Mutable access to the `index`-th text-bearing run (see [`Paragraph::runs`]).
    pub fn run_mut(&mut self, index: usize) -> Option<RunMut<'_>> {
        self.element
            .elements_mut()
            .filter(|e| e.name == "w:r" && e.child("w:commentReference").is_none())
            .nth(index)
            .map(RunMut::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(xml: &str) -> XmlElement {
        XmlElement::parse(xml).unwrap()
    }

    #[test]
    fn test_read_direct_properties() {
        let el = para(concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/>"#,
            r#"<w:spacing w:before="240" w:beforeLines="50" w:line="360" w:lineRule="auto"/>"#,
            r#"<w:ind w:firstLine="480" w:firstLineChars="200" w:left="420"/><w:jc w:val="both"/></w:pPr>"#,
            r#"<w:r><w:t>第一章 绪论</w:t></w:r></w:p>"#
        ));
        let p = Paragraph::new(&el);
        let props = p.properties().unwrap();
        assert_eq!(p.style_id(), Some("Heading1"));
        assert_eq!(props.alignment(), Some(Alignment::Justify));
        assert_eq!(props.spacing_lines(SpacingSide::Before), Some(0.5));
        assert_eq!(props.spacing_lines(SpacingSide::After), None);
        assert_eq!(
            props.line_spacing().map(|l| l.rule),
            Some(LineSpacingRule::OneAndHalf)
        );
        assert_eq!(props.first_line_indent(), Some(MeasurementValue::chars(2.0)));
        assert_eq!(
            props.indent(IndentSide::Left),
            Some(MeasurementValue::points(21.0))
        );
        assert_eq!(p.text(), "第一章 绪论");
    }

    #[test]
    fn test_spacing_lines_keeps_single_key() {
        let mut el = para(r#"<w:p><w:pPr><w:spacing w:before="240" w:line="240"/></w:pPr></w:p>"#);
        ParagraphMut::new(&mut el).set_spacing_lines(SpacingSide::Before, 0.5);

        let spacing = el.child("w:pPr").unwrap().child("w:spacing").unwrap();
        assert_eq!(spacing.attr("w:beforeLines"), Some("50"));
        assert!(!spacing.has_attr("w:before"));
        assert_eq!(spacing.attr("w:line"), Some("240"));
    }

    #[test]
    fn test_left_indent_preserves_right_indent() {
        let mut el = para(r#"<w:p><w:pPr><w:ind w:right="200" w:left="100"/></w:pPr></w:p>"#);
        ParagraphMut::new(&mut el).set_indent_chars(IndentSide::Left, 2.0);

        let ind = el.child("w:pPr").unwrap().child("w:ind").unwrap();
        assert_eq!(ind.attr("w:right"), Some("200"));
        assert_eq!(ind.attr("w:leftChars"), Some("200"));
        assert!(!ind.has_attr("w:left"));
    }

    #[test]
    fn test_zero_first_line_indent_clears_all_keys() {
        let mut el = para(
            r#"<w:p><w:pPr><w:ind w:left="420" w:hanging="480" w:hangingChars="200"/></w:pPr></w:p>"#,
        );
        ParagraphMut::new(&mut el).set_first_line_indent_chars(0.0);

        let ind = el.child("w:pPr").unwrap().child("w:ind").unwrap();
        assert!(!ind.has_attr("w:hanging"));
        assert!(!ind.has_attr("w:hangingChars"));
        assert_eq!(ind.attr("w:firstLineChars"), Some("0"));
        assert_eq!(ind.attr("w:firstLine"), Some("0"));
        assert_eq!(ind.attr("w:left"), Some("420"));

        let props = ParagraphProperties::new(el.child("w:pPr").unwrap());
        assert_eq!(props.first_line_indent(), Some(MeasurementValue::chars(0.0)));
    }

    #[test]
    fn test_zero_chars_key_falls_through_to_length() {
        let el = para(r#"<w:p><w:pPr><w:ind w:firstLineChars="0" w:firstLine="420"/></w:pPr></w:p>"#);
        let props = Paragraph::new(&el).properties().unwrap();
        assert_eq!(props.first_line_indent(), Some(MeasurementValue::points(21.0)));

        let el = para(r#"<w:p><w:pPr><w:ind w:firstLineChars="0" w:hanging="240"/></w:pPr></w:p>"#);
        let props = Paragraph::new(&el).properties().unwrap();
        assert_eq!(props.first_line_indent(), Some(MeasurementValue::points(-12.0)));

        let el = para(r#"<w:p><w:pPr><w:ind w:hangingChars="0" w:firstLine="0"/></w:pPr></w:p>"#);
        let props = Paragraph::new(&el).properties().unwrap();
        assert_eq!(props.first_line_indent(), Some(MeasurementValue::chars(0.0)));
    }

    #[test]
    fn test_first_line_chars_replaces_length() {
        let mut el = para(r#"<w:p><w:pPr><w:ind w:firstLine="420"/></w:pPr></w:p>"#);
        ParagraphMut::new(&mut el).set_first_line_indent_chars(2.0);
        let view = Paragraph::new(&el);
        let props = view.properties().unwrap();
        assert_eq!(props.first_line_indent(), Some(MeasurementValue::chars(2.0)));
        let ind = el.child("w:pPr").unwrap().child("w:ind").unwrap();
        assert_eq!(ind.attributes.len(), 1);
    }

    #[test]
    fn test_setters_create_ppr_first() {
        let mut el = para(r#"<w:p><w:r><w:t>x</w:t></w:r></w:p>"#);
        {
            let mut p = ParagraphMut::new(&mut el);
            p.set_alignment(Alignment::Center);
            p.set_style_id("Heading1");
            p.set_line_spacing(LineSpacing::exact(20.0));
        }
        assert_eq!(el.position_of("w:pPr"), Some(0));
        let ppr = el.child("w:pPr").unwrap();
        let names: Vec<_> = ppr.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["w:pStyle", "w:spacing", "w:jc"]);
        let spacing = ppr.child("w:spacing").unwrap();
        assert_eq!(spacing.attr("w:line"), Some("400"));
        assert_eq!(spacing.attr("w:lineRule"), Some("exact"));
    }

    #[test]
    fn test_alignment_labels() {
        assert_eq!(Alignment::from_label("居中"), Some(Alignment::Center));
        assert_eq!(Alignment::from_label("Justify"), Some(Alignment::Justify));
        assert_eq!(Alignment::from_label("sideways"), None);
    }
}
