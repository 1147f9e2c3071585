//! Minimal owned XML tree used for WordprocessingML parts.
//!
//! Element names are kept fully qualified (`w:p`, `w:rPr`), which is how
//! every Word-produced part spells them.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};

/// A node inside an element.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Child element
    Element(XmlElement),
    /// Character data (already unescaped)
    Text(String),
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// Qualified element name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Builder-style text appender.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Attribute value by qualified name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the attribute is present.
    pub fn has_attr(&self, key: &str) -> bool {
        self.attributes.iter().any(|(k, _)| k == key)
    }

    /// Set (or replace) an attribute, keeping its original position.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Remove an attribute, returning its old value.
    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(pos).1)
    }

    /// Child elements in order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Mutable child elements in order.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.name == name)
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// Index in `children` of the first element with the given name.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|c| matches!(c, XmlNode::Element(e) if e.name == name))
    }

    /// Element stored at `children[index]`.
    pub fn element_at_mut(&mut self, index: usize) -> Option<&mut XmlElement> {
        match self.children.get_mut(index) {
            Some(XmlNode::Element(e)) => Some(e),
            _ => None,
        }
    }

    /// Locate or create a child element.
    ///
    /// A new child is inserted before the first sibling that `order` ranks
    /// after it, so schema sequence order is preserved; names missing from
    /// `order` are appended.
    pub fn ensure_child(&mut self, name: &str, order: &[&str]) -> &mut XmlElement {
        let index = match self.position_of(name) {
            Some(index) => index,
            None => {
                let index = insertion_index(&self.children, name, order);
                self.children
                    .insert(index, XmlNode::Element(XmlElement::new(name)));
                index
            }
        };
        match &mut self.children[index] {
            XmlNode::Element(e) => e,
            XmlNode::Text(_) => unreachable!("index always points at an element"),
        }
    }

    /// Locate or create a child element that must be the first element child
    /// (`w:pPr` in a paragraph, `w:rPr` in a run).
    pub fn ensure_first_child(&mut self, name: &str) -> &mut XmlElement {
        let index = match self.position_of(name) {
            Some(index) => index,
            None => {
                self.children
                    .insert(0, XmlNode::Element(XmlElement::new(name)));
                0
            }
        };
        match &mut self.children[index] {
            XmlNode::Element(e) => e,
            XmlNode::Text(_) => unreachable!("index always points at an element"),
        }
    }

    /// Concatenated character data of this element and its descendants.
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Parse an XML document and return its root element.
    pub fn parse(xml: &str) -> Result<XmlElement> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    if let Some(top) = stack.last_mut() {
                        let value = text.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                        top.children.push(XmlNode::Text(value.into_owned()));
                    }
                }
                Event::CData(data) => {
                    if let Some(top) = stack.last_mut() {
                        let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                        top.children.push(XmlNode::Text(value));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::Xml(format!("unclosed element <{}>", stack[0].name)));
        }
        root.ok_or_else(|| Error::Xml("document has no root element".to_string()))
    }

    /// Serialize as a standalone XML part (with declaration).
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(|e| Error::Xml(e.to_string()))?;
        write_element(&mut writer, self)?;
        String::from_utf8(writer.into_inner()).map_err(|e| Error::Xml(e.to_string()))
    }
}

fn insertion_index(children: &[XmlNode], name: &str, order: &[&str]) -> usize {
    let Some(rank) = order.iter().position(|n| *n == name) else {
        return children.len();
    };
    children
        .iter()
        .position(|c| match c {
            XmlNode::Element(e) => order
                .iter()
                .position(|n| *n == e.name)
                .is_some_and(|r| r > rank),
            XmlNode::Text(_) => false,
        })
        .unwrap_or(children.len())
}

fn collect_text(element: &XmlElement, out: &mut String) {
    for child in &element.children {
        match child {
            XmlNode::Text(t) => out.push_str(t),
            XmlNode::Element(e) => collect_text(e, out),
        }
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Xml(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => *root = Some(element),
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::Xml(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::Xml(e.to_string()))?;
    for child in &element.children {
        match child {
            XmlNode::Element(e) => write_element(writer, e)?,
            XmlNode::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(|e| Error::Xml(e.to_string()))?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| Error::Xml(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let xml = r#"<w:p a="1"><w:r><w:t xml:space="preserve"> a &amp; b </w:t></w:r><w:r/></w:p>"#;
        let root = XmlElement::parse(xml).unwrap();
        assert_eq!(root.name, "w:p");
        assert_eq!(root.attr("a"), Some("1"));
        assert_eq!(root.children_named("w:r").count(), 2);
        assert_eq!(root.inner_text(), " a & b ");

        let xml = root.to_xml().unwrap();
        assert!(xml.starts_with("<?xml"));
        let again = XmlElement::parse(&xml).unwrap();
        assert_eq!(again, root);
    }

    #[test]
    fn test_ensure_child_respects_order() {
        let order = ["w:pStyle", "w:spacing", "w:ind", "w:jc"];
        let mut ppr = XmlElement::new("w:pPr").with_child(XmlElement::new("w:jc"));
        ppr.ensure_child("w:spacing", &order).set_attr("w:beforeLines", "100");
        ppr.ensure_child("w:pStyle", &order);
        ppr.ensure_child("w:ind", &order);

        let names: Vec<_> = ppr.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["w:pStyle", "w:spacing", "w:ind", "w:jc"]);
        assert_eq!(
            ppr.child("w:spacing").and_then(|s| s.attr("w:beforeLines")),
            Some("100")
        );
    }

    #[test]
    fn test_attribute_editing() {
        let mut el = XmlElement::new("w:ind").with_attr("w:left", "420");
        el.set_attr("w:right", "0");
        el.set_attr("w:left", "840");
        assert_eq!(el.attributes[0], ("w:left".to_string(), "840".to_string()));
        assert_eq!(el.remove_attr("w:right").as_deref(), Some("0"));
        assert!(!el.has_attr("w:right"));
    }

    #[test]
    fn test_unbalanced_xml_fails() {
        assert!(XmlElement::parse("<a><b></a>").is_err());
        assert!(XmlElement::parse("").is_err());
    }
}
