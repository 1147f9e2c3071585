//! Effective formatting: direct formatting → paragraph style → base styles.

use super::spec::{CharacterStyleSpec, ParagraphStyleSpec};
use crate::model::{
    Alignment, IndentSide, LineSpacing, Paragraph, ParagraphProperties, Run, RunProperties,
    SpacingSide, StyleSheet,
};

/// Font size used when neither the run nor any style sets one.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Name reported when a paragraph has no style and the sheet has no default.
const FALLBACK_STYLE_NAME: &str = "Normal";

/// Resolves effective paragraph and run formatting against a style sheet.
#[derive(Debug, Clone, Copy)]
pub struct StyleCascade<'s> {
    styles: &'s StyleSheet,
}

impl<'s> StyleCascade<'s> {
    /// Create a cascade over a document's styles.
    pub fn new(styles: &'s StyleSheet) -> Self {
        Self { styles }
    }

    fn paragraph_style_id<'a>(&'a self, para: &Paragraph<'a>) -> Option<&'a str> {
        para.style_id()
            .or_else(|| self.styles.default_paragraph_style())
    }

    /// Property levels, nearest first: direct, style chain, document defaults.
    fn paragraph_levels<'a>(&'a self, para: &Paragraph<'a>) -> Vec<ParagraphProperties<'a>> {
        let mut levels = Vec::new();
        levels.extend(para.properties());
        if let Some(id) = self.paragraph_style_id(para) {
            levels.extend(
                self.styles
                    .chain(id)
                    .into_iter()
                    .filter_map(|s| s.paragraph_properties.as_ref())
                    .map(ParagraphProperties::new),
            );
        }
        levels.extend(
            self.styles
                .default_paragraph_properties
                .as_ref()
                .map(ParagraphProperties::new),
        );
        levels
    }

    /// Effective paragraph formatting.
    ///
    /// Spacing is read only from the line-count attributes: a level that sets
    /// `beforeLines` (even to zero) wins, a level that only sets a length is
    /// skipped, and a chain without any line count yields `None`.
    pub fn paragraph_spec(&self, para: &Paragraph<'_>) -> ParagraphStyleSpec {
        let levels = self.paragraph_levels(para);

        let builtin_style_name = match self.paragraph_style_id(para) {
            Some(id) => Some(
                self.styles
                    .get(id)
                    .map_or_else(|| id.to_string(), |s| s.name.clone()),
            ),
            None => Some(FALLBACK_STYLE_NAME.to_string()),
        };

        ParagraphStyleSpec {
            alignment: Some(
                levels
                    .iter()
                    .find_map(|l| l.alignment())
                    .unwrap_or(Alignment::Left),
            ),
            space_before: levels.iter().find_map(|l| l.spacing_lines(SpacingSide::Before)),
            space_after: levels.iter().find_map(|l| l.spacing_lines(SpacingSide::After)),
            line_spacing: Some(
                levels
                    .iter()
                    .find_map(|l| l.line_spacing())
                    .unwrap_or_else(|| LineSpacing::multiple(1.0)),
            ),
            first_line_indent: levels.iter().find_map(|l| l.first_line_indent()),
            left_indent: levels.iter().find_map(|l| l.indent(IndentSide::Left)),
            right_indent: levels.iter().find_map(|l| l.indent(IndentSide::Right)),
            builtin_style_name,
        }
    }

    /// Effective character formatting of one run.
    ///
    /// Only the run's own properties count for everything but the size, which
    /// falls back to the run's character style, then the paragraph style, then
    /// the `rPrDefault` of the document, then [`DEFAULT_FONT_SIZE`].
    pub fn run_spec(&self, para: &Paragraph<'_>, run: &Run<'_>) -> CharacterStyleSpec {
        let own = run.properties();
        let font_size = own
            .and_then(|p| p.size_points())
            .or_else(|| {
                own.and_then(|p| p.style_id())
                    .and_then(|id| self.style_run_size(id))
            })
            .or_else(|| {
                self.paragraph_style_id(para)
                    .and_then(|id| self.style_run_size(id))
            })
            .or_else(|| {
                self.styles
                    .default_run_properties
                    .as_ref()
                    .and_then(|rpr| RunProperties::new(rpr).size_points())
            })
            .unwrap_or(DEFAULT_FONT_SIZE);

        CharacterStyleSpec {
            east_asia_font: own.and_then(|p| p.east_asia_font()).map(str::to_string),
            latin_font: own.and_then(|p| p.ascii_font()).map(str::to_string),
            font_size: Some(font_size),
            color: own.and_then(|p| p.color()),
            bold: Some(own.and_then(|p| p.bold()).unwrap_or(false)),
            italic: Some(own.and_then(|p| p.italic()).unwrap_or(false)),
            underline: Some(own.and_then(|p| p.underline()).unwrap_or(false)),
        }
    }

    fn style_run_size(&self, style_id: &str) -> Option<f64> {
        self.styles
            .chain(style_id)
            .into_iter()
            .filter_map(|s| s.run_properties.as_ref())
            .find_map(|rpr| RunProperties::new(rpr).size_points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineSpacingRule, XmlElement};
    use crate::units::MeasurementValue;

    const STYLES: &str = concat!(
        r#"<w:styles>"#,
        r#"<w:docDefaults><w:pPrDefault><w:pPr><w:spacing w:line="240" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults>"#,
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/>"#,
        r#"<w:pPr><w:jc w:val="both"/><w:ind w:firstLineChars="200"/></w:pPr></w:style>"#,
        r#"<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/>"#,
        r#"<w:pPr><w:spacing w:before="340" w:beforeLines="100" w:after="330"/><w:jc w:val="center"/></w:pPr>"#,
        r#"<w:rPr><w:sz w:val="32"/></w:rPr></w:style>"#,
        r#"</w:styles>"#
    );

    fn sheet() -> StyleSheet {
        StyleSheet::parse(STYLES).unwrap()
    }

    fn para(xml: &str) -> XmlElement {
        XmlElement::parse(xml).unwrap()
    }

    #[test]
    fn test_direct_beats_style() {
        let sheet = sheet();
        let el = para(r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="right"/></w:pPr></w:p>"#);
        let spec = StyleCascade::new(&sheet).paragraph_spec(&Paragraph::new(&el));
        assert_eq!(spec.alignment, Some(Alignment::Right));
        assert_eq!(spec.builtin_style_name.as_deref(), Some("heading 1"));
    }

    #[test]
    fn test_style_then_base_style() {
        let sheet = sheet();
        let el = para(r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr></w:p>"#);
        let spec = StyleCascade::new(&sheet).paragraph_spec(&Paragraph::new(&el));
        assert_eq!(spec.alignment, Some(Alignment::Center));
        // inherited from Normal through basedOn
        assert_eq!(spec.first_line_indent, Some(MeasurementValue::chars(2.0)));
        assert_eq!(spec.space_before, Some(1.0));
        // Heading1 sets only a length for "after": no line value anywhere
        assert_eq!(spec.space_after, None);
        assert_eq!(
            spec.line_spacing.map(|l| l.rule),
            Some(LineSpacingRule::Single)
        );
    }

    #[test]
    fn test_unstyled_paragraph_uses_default_style() {
        let sheet = sheet();
        let el = para(r#"<w:p><w:r><w:t>x</w:t></w:r></w:p>"#);
        let spec = StyleCascade::new(&sheet).paragraph_spec(&Paragraph::new(&el));
        assert_eq!(spec.alignment, Some(Alignment::Justify));
        assert_eq!(spec.builtin_style_name.as_deref(), Some("Normal"));
    }

    #[test]
    fn test_empty_sheet_defaults() {
        let sheet = StyleSheet::new();
        let el = para(r#"<w:p/>"#);
        let spec = StyleCascade::new(&sheet).paragraph_spec(&Paragraph::new(&el));
        assert_eq!(spec.alignment, Some(Alignment::Left));
        assert_eq!(spec.first_line_indent, None);
        assert_eq!(spec.builtin_style_name.as_deref(), Some("Normal"));
    }

    #[test]
    fn test_run_size_fallbacks() {
        let sheet = sheet();
        let el = para(concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr>"#,
            r#"<w:r><w:t>a</w:t></w:r>"#,
            r#"<w:r><w:rPr><w:b/><w:sz w:val="22"/></w:rPr><w:t>b</w:t></w:r></w:p>"#
        ));
        let p = Paragraph::new(&el);
        let cascade = StyleCascade::new(&sheet);
        let runs = p.runs();

        let first = cascade.run_spec(&p, &runs[0]);
        assert_eq!(first.font_size, Some(16.0));
        assert_eq!(first.bold, Some(false));

        let second = cascade.run_spec(&p, &runs[1]);
        assert_eq!(second.font_size, Some(11.0));
        assert_eq!(second.bold, Some(true));

        let plain = para(r#"<w:p><w:r><w:t>c</w:t></w:r></w:p>"#);
        let plain_p = Paragraph::new(&plain);
        let spec = StyleCascade::new(&StyleSheet::new()).run_spec(&plain_p, &plain_p.runs()[0]);
        assert_eq!(spec.font_size, Some(DEFAULT_FONT_SIZE));
    }

    #[test]
    fn test_run_size_falls_back_to_document_defaults() {
        let sheet = StyleSheet::parse(concat!(
            r#"<w:styles><w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="21"/></w:rPr></w:rPrDefault></w:docDefaults>"#,
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>"#,
            r#"<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:rPr><w:sz w:val="44"/></w:rPr></w:style>"#,
            r#"</w:styles>"#
        ))
        .unwrap();
        let cascade = StyleCascade::new(&sheet);

        let el = para(r#"<w:p><w:r><w:t>正文</w:t></w:r></w:p>"#);
        let p = Paragraph::new(&el);
        assert_eq!(cascade.run_spec(&p, &p.runs()[0]).font_size, Some(10.5));

        // a style size still wins over the document default
        let el = para(r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>题目</w:t></w:r></w:p>"#);
        let p = Paragraph::new(&el);
        assert_eq!(cascade.run_spec(&p, &p.runs()[0]).font_size, Some(22.0));
    }
}
