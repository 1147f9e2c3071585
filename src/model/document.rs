//! The live document: body paragraphs, styles and comments.

use std::ops::Range;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::comments::Comments;
use super::paragraph::{Paragraph, ParagraphMut};
use super::styles::StyleSheet;
use super::xml::{XmlElement, XmlNode};
use crate::error::{Error, Result};
use crate::parser::{DocxPackage, COMMENTS_PART, DOCUMENT_PART, STYLES_PART};

/// Index of a top-level body paragraph, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParagraphHandle(pub usize);

/// A loaded Word document, exclusively owned for the duration of a run.
#[derive(Debug, Clone)]
pub struct Document {
    package: DocxPackage,
    root: XmlElement,
    body_index: usize,
    /// Positions of top-level `w:p` elements inside `w:body`
    paragraph_positions: Vec<usize>,
    styles: StyleSheet,
    comments: Comments,
}

impl Document {
    /// Open a `.docx` file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_package(DocxPackage::open(path)?)
    }

    /// Load a `.docx` from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_package(DocxPackage::from_bytes(data)?)
    }

    /// Build a document from raw `document.xml` and optional `styles.xml`.
    pub fn from_parts(document_xml: &str, styles_xml: Option<&str>) -> Result<Self> {
        Self::from_package(DocxPackage::minimal(document_xml, styles_xml))
    }

    /// Load from an already opened package.
    pub fn from_package(package: DocxPackage) -> Result<Self> {
        let document_xml = package
            .part_str(DOCUMENT_PART)?
            .ok_or_else(|| Error::MissingPart(DOCUMENT_PART.to_string()))?;
        let root = XmlElement::parse(&document_xml)?;
        let body_index = root
            .position_of("w:body")
            .ok_or_else(|| Error::MissingPart("w:body".to_string()))?;

        let styles = match package.part_str(STYLES_PART)? {
            Some(xml) => StyleSheet::parse(&xml)?,
            None => StyleSheet::new(),
        };
        let comments = match package.part_str(COMMENTS_PART)? {
            Some(xml) => Comments::parse(&xml)?,
            None => Comments::new(),
        };

        let mut doc = Self {
            package,
            root,
            body_index,
            paragraph_positions: Vec::new(),
            styles,
            comments,
        };
        doc.index_paragraphs();
        log::debug!(
            "loaded document with {} paragraphs and {} styles",
            doc.paragraph_count(),
            doc.styles.len()
        );
        Ok(doc)
    }

    fn index_paragraphs(&mut self) {
        self.paragraph_positions = self
            .body()
            .children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| match c {
                XmlNode::Element(e) if e.name == "w:p" => Some(i),
                _ => None,
            })
            .collect();
    }

    fn body(&self) -> &XmlElement {
        match &self.root.children[self.body_index] {
            XmlNode::Element(e) => e,
            XmlNode::Text(_) => unreachable!("body_index points at w:body"),
        }
    }

    fn body_mut(&mut self) -> &mut XmlElement {
        match &mut self.root.children[self.body_index] {
            XmlNode::Element(e) => e,
            XmlNode::Text(_) => unreachable!("body_index points at w:body"),
        }
    }

    fn paragraph_element_mut(&mut self, handle: ParagraphHandle) -> Option<&mut XmlElement> {
        let position = *self.paragraph_positions.get(handle.0)?;
        self.body_mut().element_at_mut(position)
    }

    /// Style definitions.
    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// Review comments.
    pub fn comments(&self) -> &Comments {
        &self.comments
    }

    /// Number of top-level body paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraph_positions.len()
    }

    /// Read-only paragraph view.
    pub fn paragraph(&self, handle: ParagraphHandle) -> Option<Paragraph<'_>> {
        let position = *self.paragraph_positions.get(handle.0)?;
        match self.body().children.get(position) {
            Some(XmlNode::Element(e)) => Some(Paragraph::new(e)),
            _ => None,
        }
    }

    /// Mutable paragraph view.
    pub fn paragraph_mut(&mut self, handle: ParagraphHandle) -> Option<ParagraphMut<'_>> {
        self.paragraph_element_mut(handle).map(ParagraphMut::new)
    }

    /// Mutable paragraph view together with the style sheet it resolves against.
    pub fn paragraph_mut_with_styles(
        &mut self,
        handle: ParagraphHandle,
    ) -> Option<(ParagraphMut<'_>, &StyleSheet)> {
        let position = *self.paragraph_positions.get(handle.0)?;
        let body = match self.root.children.get_mut(self.body_index)? {
            XmlNode::Element(e) => e,
            XmlNode::Text(_) => return None,
        };
        let element = body.element_at_mut(position)?;
        Some((ParagraphMut::new(element), &self.styles))
    }

    /// All body paragraphs with their handles, in document order.
    pub fn paragraphs(&self) -> impl Iterator<Item = (ParagraphHandle, Paragraph<'_>)> {
        (0..self.paragraph_count()).filter_map(move |i| {
            let handle = ParagraphHandle(i);
            self.paragraph(handle).map(|p| (handle, p))
        })
    }

    /// Attach a review comment to a range of text runs of a paragraph.
    ///
    /// An empty `runs` range (or a paragraph without runs) anchors the comment
    /// at the start of the paragraph content. Blank text creates nothing and
    /// returns `None`.
    pub fn add_comment(
        &mut self,
        handle: ParagraphHandle,
        runs: Range<usize>,
        text: &str,
        author: &str,
        initials: &str,
    ) -> Result<Option<u32>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        if self.paragraph(handle).is_none() {
            return Err(Error::Other(format!("no paragraph at index {}", handle.0)));
        }

        let id = self.comments.add(text, author, initials, Utc::now());
        let id_str = id.to_string();
        let Some(para) = self.paragraph_element_mut(handle) else {
            return Ok(None);
        };

        let run_positions: Vec<usize> = para
            .children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| match c {
                XmlNode::Element(e)
                    if e.name == "w:r" && e.child("w:commentReference").is_none() =>
                {
                    Some(i)
                }
                _ => None,
            })
            .collect();

        let (start, end) = if runs.is_empty() || runs.start >= run_positions.len() {
            let anchor = para.position_of("w:pPr").map_or(0, |p| p + 1);
            (anchor, anchor)
        } else {
            let last = runs.end.min(run_positions.len()) - 1;
            (run_positions[runs.start], run_positions[last] + 1)
        };

        let reference = XmlElement::new("w:r")
            .with_child(XmlElement::new("w:commentReference").with_attr("w:id", id_str.clone()));
        para.children.insert(end, XmlNode::Element(reference));
        para.children.insert(
            end,
            XmlNode::Element(XmlElement::new("w:commentRangeEnd").with_attr("w:id", id_str.clone())),
        );
        para.children.insert(
            start,
            XmlNode::Element(XmlElement::new("w:commentRangeStart").with_attr("w:id", id_str)),
        );

        Ok(Some(id))
    }

    /// Serialize the document back into a `.docx` package.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut package = self.package.clone();
        package.set_part(DOCUMENT_PART, self.root.to_xml()?.into_bytes());
        if !self.comments.is_empty() {
            package.set_part(COMMENTS_PART, self.comments.to_xml()?.into_bytes());
            package.register_comments_part()?;
        }
        package.to_bytes()
    }

    /// Save to a `.docx` file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = concat!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
        r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>摘要</w:t></w:r></w:p>"#,
        r#"<w:tbl/>"#,
        r#"<w:p><w:r><w:t>第一段</w:t></w:r><w:r><w:t>第二段</w:t></w:r></w:p>"#,
        r#"<w:sectPr/></w:body></w:document>"#
    );

    #[test]
    fn test_paragraph_indexing() {
        let doc = Document::from_parts(DOC, None).unwrap();
        assert_eq!(doc.paragraph_count(), 2);
        assert_eq!(doc.paragraph(ParagraphHandle(1)).unwrap().text(), "第一段第二段");
        assert!(doc.paragraph(ParagraphHandle(2)).is_none());
    }

    #[test]
    fn test_add_comment_anchors_runs() {
        let mut doc = Document::from_parts(DOC, None).unwrap();
        let id = doc
            .add_comment(ParagraphHandle(1), 0..2, "字号不符", "thesisfmt", "TF")
            .unwrap();
        assert_eq!(id, Some(0));

        let para = doc.paragraph(ParagraphHandle(1)).unwrap();
        let names: Vec<_> = para.element().elements().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            ["w:commentRangeStart", "w:r", "w:r", "w:commentRangeEnd", "w:r"]
        );
        // the reference run is not a text run
        assert_eq!(para.runs().len(), 2);
        assert_eq!(para.text(), "第一段第二段");
    }

    #[test]
    fn test_empty_comment_is_skipped() {
        let mut doc = Document::from_parts(DOC, None).unwrap();
        let id = doc
            .add_comment(ParagraphHandle(0), 0..1, "  ", "thesisfmt", "TF")
            .unwrap();
        assert_eq!(id, None);
        assert!(doc.comments().is_empty());
    }

    #[test]
    fn test_save_round_trip_with_comments() {
        let mut doc = Document::from_parts(DOC, None).unwrap();
        doc.add_comment(ParagraphHandle(0), 0..1, "标题应为黑体", "thesisfmt", "TF")
            .unwrap();
        let bytes = doc.to_bytes().unwrap();

        let again = Document::from_bytes(&bytes).unwrap();
        assert_eq!(again.paragraph_count(), 2);
        assert_eq!(again.comments().len(), 1);
        assert_eq!(again.comments().text(0).as_deref(), Some("标题应为黑体"));
    }
}
