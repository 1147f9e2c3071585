//! Style definitions from `word/styles.xml`.

use std::collections::{HashMap, HashSet};

use super::xml::XmlElement;
use crate::error::Result;

/// Longest `basedOn` chain followed before giving up.
const MAX_STYLE_DEPTH: usize = 32;

/// Kind of a style definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    /// Paragraph style
    Paragraph,
    /// Character style
    Character,
    /// Table, numbering or anything else
    Other,
}

/// One `w:style` entry.
#[derive(Debug, Clone)]
pub struct StyleDef {
    /// Style id (`w:styleId`)
    pub id: String,
    /// Display name (`w:name`), e.g. `heading 1`
    pub name: String,
    /// Kind of style
    pub kind: StyleKind,
    /// Parent style id
    pub based_on: Option<String>,
    /// Paragraph properties
    pub paragraph_properties: Option<XmlElement>,
    /// Run properties
    pub run_properties: Option<XmlElement>,
    /// Whether this is the default style of its kind
    pub is_default: bool,
}

/// All styles of a document plus document defaults.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: HashMap<String, StyleDef>,
    default_paragraph_style: Option<String>,
    /// `w:docDefaults/w:pPrDefault/w:pPr`
    pub default_paragraph_properties: Option<XmlElement>,
    /// `w:docDefaults/w:rPrDefault/w:rPr`
    pub default_run_properties: Option<XmlElement>,
}

impl StyleSheet {
    /// Empty style sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `styles.xml`.
    pub fn parse(xml: &str) -> Result<Self> {
        let root = XmlElement::parse(xml)?;
        let mut sheet = StyleSheet::new();

        if let Some(defaults) = root.child("w:docDefaults") {
            sheet.default_paragraph_properties = defaults
                .child("w:pPrDefault")
                .and_then(|d| d.child("w:pPr"))
                .cloned();
            sheet.default_run_properties = defaults
                .child("w:rPrDefault")
                .and_then(|d| d.child("w:rPr"))
                .cloned();
        }

        for style in root.children_named("w:style") {
            let Some(id) = style.attr("w:styleId") else {
                continue;
            };
            let kind = match style.attr("w:type") {
                Some("paragraph") => StyleKind::Paragraph,
                Some("character") => StyleKind::Character,
                _ => StyleKind::Other,
            };
            let is_default = matches!(style.attr("w:default"), Some("1") | Some("true"));
            let def = StyleDef {
                id: id.to_string(),
                name: style
                    .child("w:name")
                    .and_then(|n| n.attr("w:val"))
                    .unwrap_or(id)
                    .to_string(),
                kind,
                based_on: style
                    .child("w:basedOn")
                    .and_then(|b| b.attr("w:val"))
                    .map(str::to_string),
                paragraph_properties: style.child("w:pPr").cloned(),
                run_properties: style.child("w:rPr").cloned(),
                is_default,
            };
            sheet.insert(def);
        }

        Ok(sheet)
    }

    /// Add or replace a style.
    pub fn insert(&mut self, def: StyleDef) {
        if def.is_default && def.kind == StyleKind::Paragraph {
            self.default_paragraph_style = Some(def.id.clone());
        }
        self.styles.insert(def.id.clone(), def);
    }

    /// Style by id.
    pub fn get(&self, id: &str) -> Option<&StyleDef> {
        self.styles.get(id)
    }

    /// Style whose display name matches (case- and whitespace-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&StyleDef> {
        let wanted = normalize_style_name(name);
        let mut matches: Vec<&StyleDef> = self
            .styles
            .values()
            .filter(|s| {
                normalize_style_name(&s.name) == wanted || normalize_style_name(&s.id) == wanted
            })
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches.into_iter().next()
    }

    /// Id of the default paragraph style (usually `Normal`).
    pub fn default_paragraph_style(&self) -> Option<&str> {
        self.default_paragraph_style.as_deref()
    }

    /// The style and its `basedOn` ancestors, nearest first.
    ///
    /// Stops on unknown ids and on cycles.
    pub fn chain(&self, id: &str) -> Vec<&StyleDef> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);
        while let Some(id) = current {
            if chain.len() >= MAX_STYLE_DEPTH || !seen.insert(id) {
                log::warn!("style chain through '{}' is cyclic or too deep", id);
                break;
            }
            let Some(style) = self.styles.get(id) else {
                break;
            };
            chain.push(style);
            current = style.based_on.as_deref();
        }
        chain
    }

    /// Number of styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether no styles are defined.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Normalize a style name for comparison (`Heading 1` == `heading1`).
pub fn normalize_style_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = r#"<w:styles>
        <w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="21"/></w:rPr></w:rPrDefault></w:docDefaults>
        <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:pPr><w:jc w:val="both"/></w:pPr></w:style>
        <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/></w:style>
        <w:style w:type="paragraph" w:styleId="LoopA"><w:name w:val="a"/><w:basedOn w:val="LoopB"/></w:style>
        <w:style w:type="paragraph" w:styleId="LoopB"><w:name w:val="b"/><w:basedOn w:val="LoopA"/></w:style>
    </w:styles>"#;

    #[test]
    fn test_parse_styles() {
        let sheet = StyleSheet::parse(STYLES).unwrap();
        assert_eq!(sheet.len(), 4);
        assert_eq!(sheet.default_paragraph_style(), Some("Normal"));
        assert!(sheet.default_run_properties.is_some());
        assert_eq!(sheet.get("Heading1").unwrap().name, "heading 1");
    }

    #[test]
    fn test_chain_and_cycles() {
        let sheet = StyleSheet::parse(STYLES).unwrap();
        let ids: Vec<_> = sheet.chain("Heading1").iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["Heading1", "Normal"]);
        assert_eq!(sheet.chain("LoopA").len(), 2);
        assert!(sheet.chain("Missing").is_empty());
    }

    #[test]
    fn test_find_by_name() {
        let sheet = StyleSheet::parse(STYLES).unwrap();
        assert_eq!(sheet.find_by_name("Heading 1").unwrap().id, "Heading1");
        assert_eq!(normalize_style_name("Heading 1"), "heading1");
    }
}
