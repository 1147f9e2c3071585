//! Content fingerprints of paragraphs and re-attaching them to the outline.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

use super::tree::{NodeId, Outline};
use crate::error::Error;
use crate::model::{Document, Paragraph, ParagraphHandle, XmlElement, XmlNode};

/// Elements that carry editing history or review markup, not content.
const IGNORED_ELEMENTS: &[&str] = &[
    "w:proofErr",
    "w:bookmarkStart",
    "w:bookmarkEnd",
    "w:commentRangeStart",
    "w:commentRangeEnd",
    "w:lastRenderedPageBreak",
];

fn ignored_attribute(key: &str) -> bool {
    key.starts_with("w:rsid") || key == "w14:paraId" || key == "w14:textId"
}

fn ignored_element(element: &XmlElement) -> bool {
    IGNORED_ELEMENTS.contains(&element.name.as_str())
        || (element.name == "w:r" && element.child("w:commentReference").is_some())
}

fn canonicalize(element: &XmlElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        if !ignored_attribute(key) {
            out.push(' ');
            out.push_str(key);
            out.push('=');
            out.push_str(&value.replace('\\', "\\\\").replace('"', "\\\""));
        }
    }
    out.push('>');
    for child in &element.children {
        match child {
            XmlNode::Element(e) if !ignored_element(e) => canonicalize(e, out),
            XmlNode::Element(_) => {}
            XmlNode::Text(t) => {
                out.push('"');
                out.push_str(&t.replace('\\', "\\\\").replace('"', "\\\""));
                out.push('"');
            }
        }
    }
    out.push_str("</>");
}

/// Hex MD5 of the paragraph's canonical structure.
///
/// Formatting and text both contribute; revision ids, proofing marks,
/// bookmarks and comment anchors do not, so a paragraph keeps its
/// fingerprint after it has been annotated.
pub fn fingerprint(paragraph: &Paragraph<'_>) -> String {
    let mut canonical = String::new();
    canonicalize(paragraph.element(), &mut canonical);
    let mut hasher = Md5::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A node whose fingerprint matched no paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedNode {
    /// Node id
    pub node: NodeId,
    /// Category label
    pub category: String,
    /// Node text
    pub text: String,
}

/// Paragraphs sharing one fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The shared fingerprint
    pub fingerprint: String,
    /// Paragraphs carrying it
    pub paragraphs: Vec<ParagraphHandle>,
}

/// Outcome of one matching pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Nodes linked to a paragraph
    pub attached: usize,
    /// Nodes left unattached
    pub unmatched: Vec<UnmatchedNode>,
    /// Fingerprints found on more than one paragraph
    pub duplicates: Vec<DuplicateGroup>,
}

/// Link outline nodes to live paragraphs by fingerprint.
///
/// Every paragraph, in document order, attaches to the first unattached node
/// with its fingerprint in breadth-first order. Previous links are cleared,
/// so rerunning on an unchanged document reproduces the same links.
pub fn attach_paragraphs(outline: &mut Outline, doc: &Document) -> MatchReport {
    let mut candidates: HashMap<String, VecDeque<NodeId>> = HashMap::new();
    for id in outline.breadth_first() {
        let node = outline.node_mut(id);
        node.paragraph = None;
        if let Some(fp) = &node.fingerprint {
            candidates.entry(fp.clone()).or_default().push_back(id);
        }
    }

    let mut report = MatchReport::default();
    let mut seen: BTreeMap<String, Vec<ParagraphHandle>> = BTreeMap::new();

    for (handle, paragraph) in doc.paragraphs() {
        let fp = fingerprint(&paragraph);
        if let Some(id) = candidates.get_mut(&fp).and_then(VecDeque::pop_front) {
            outline.node_mut(id).paragraph = Some(handle);
            report.attached += 1;
        }
        seen.entry(fp).or_default().push(handle);
    }

    for (fp, paragraphs) in seen {
        if paragraphs.len() > 1 && !paragraphs.iter().all(|h| is_blank(doc, *h)) {
            let err =
                Error::DuplicateFingerprint(format!("{} ({} paragraphs)", fp, paragraphs.len()));
            log::warn!("{}", err);
            report.duplicates.push(DuplicateGroup {
                fingerprint: fp,
                paragraphs,
            });
        }
    }

    for id in outline.depth_first() {
        let node = outline.node(id);
        if node.paragraph.is_none() {
            log::warn!("{}", Error::FingerprintUnmatched(node.text.clone()));
            report.unmatched.push(UnmatchedNode {
                node: id,
                category: node.category.clone(),
                text: node.text.clone(),
            });
        }
    }

    report
}

fn is_blank(doc: &Document, handle: ParagraphHandle) -> bool {
    doc.paragraph(handle).map_or(true, |p| p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(xml: &str) -> XmlElement {
        XmlElement::parse(xml).unwrap()
    }

    #[test]
    fn test_formatting_changes_fingerprint() {
        let plain = para(r#"<w:p><w:r><w:t>绪论</w:t></w:r></w:p>"#);
        let bold = para(r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>绪论</w:t></w:r></w:p>"#);
        assert_ne!(
            fingerprint(&Paragraph::new(&plain)),
            fingerprint(&Paragraph::new(&bold))
        );
    }

    #[test]
    fn test_revision_noise_is_ignored() {
        let a = para(r#"<w:p w:rsidR="00A1"><w:r><w:t>绪论</w:t></w:r></w:p>"#);
        let b = para(concat!(
            r#"<w:p w:rsidR="00B2" w14:paraId="1234"><w:proofErr w:type="spellStart"/>"#,
            r#"<w:commentRangeStart w:id="0"/><w:r w:rsidRPr="00C3"><w:t>绪论</w:t></w:r>"#,
            r#"<w:commentRangeEnd w:id="0"/><w:r><w:commentReference w:id="0"/></w:r></w:p>"#
        ));
        let fp = fingerprint(&Paragraph::new(&a));
        assert_eq!(fp, fingerprint(&Paragraph::new(&b)));
        assert_eq!(fp.len(), 32);
    }
}
