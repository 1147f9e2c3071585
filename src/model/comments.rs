//! Review comments (`word/comments.xml`).

use chrono::{DateTime, Utc};

use super::xml::{XmlElement, XmlNode};
use crate::error::Result;

const W_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// The comments part of a document.
#[derive(Debug, Clone)]
pub struct Comments {
    root: XmlElement,
    next_id: u32,
}

impl Comments {
    /// Empty comments part.
    pub fn new() -> Self {
        Self {
            root: XmlElement::new("w:comments").with_attr("xmlns:w", W_NAMESPACE),
            next_id: 0,
        }
    }

    /// Parse an existing comments part; new ids continue after the largest one.
    pub fn parse(xml: &str) -> Result<Self> {
        let root = XmlElement::parse(xml)?;
        let next_id = root
            .children_named("w:comment")
            .filter_map(|c| c.attr("w:id"))
            .filter_map(|id| id.parse::<u32>().ok())
            .max()
            .map_or(0, |max| max + 1);
        Ok(Self { root, next_id })
    }

    /// Append a comment and return its id. Each line becomes a paragraph.
    pub fn add(&mut self, text: &str, author: &str, initials: &str, date: DateTime<Utc>) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        let mut comment = XmlElement::new("w:comment")
            .with_attr("w:id", id.to_string())
            .with_attr("w:author", author)
            .with_attr("w:date", date.format("%Y-%m-%dT%H:%M:%SZ").to_string())
            .with_attr("w:initials", initials);
        for line in text.lines() {
            let t = XmlElement::new("w:t")
                .with_attr("xml:space", "preserve")
                .with_text(line);
            comment = comment
                .with_child(XmlElement::new("w:p").with_child(XmlElement::new("w:r").with_child(t)));
        }
        self.root.children.push(XmlNode::Element(comment));
        id
    }

    /// Total number of comments, including pre-existing ones.
    pub fn len(&self) -> usize {
        self.root.children_named("w:comment").count()
    }

    /// Whether the part holds no comments.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text of a comment by id.
    pub fn text(&self, id: u32) -> Option<String> {
        let id = id.to_string();
        self.root
            .children_named("w:comment")
            .find(|c| c.attr("w:id") == Some(id.as_str()))
            .map(|c| {
                c.children_named("w:p")
                    .map(|p| p.inner_text())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
    }

    /// Serialize the part.
    pub fn to_xml(&self) -> Result<String> {
        self.root.to_xml()
    }
}

impl Default for Comments {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_comments() {
        let mut comments = Comments::new();
        let first = comments.add("对齐方式：期望居中\n字号：期望12pt", "thesisfmt", "TF", Utc::now());
        let second = comments.add("x", "thesisfmt", "TF", Utc::now());
        assert_eq!((first, second), (0, 1));
        assert_eq!(comments.len(), 2);
        assert_eq!(
            comments.text(0).as_deref(),
            Some("对齐方式：期望居中\n字号：期望12pt")
        );
    }

    #[test]
    fn test_ids_continue_after_existing() {
        let xml = r#"<w:comments><w:comment w:id="7"><w:p><w:r><w:t>old</w:t></w:r></w:p></w:comment></w:comments>"#;
        let mut comments = Comments::parse(xml).unwrap();
        assert_eq!(comments.add("new", "a", "A", Utc::now()), 8);
        assert_eq!(comments.len(), 2);
    }
}
