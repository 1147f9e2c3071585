//! `.docx` zip container.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::XmlElement;

/// Main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";
/// Style definitions part.
pub const STYLES_PART: &str = "word/styles.xml";
/// Comments part.
pub const COMMENTS_PART: &str = "word/comments.xml";
/// Package content types.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
/// Relationships of the main document part.
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

const COMMENTS_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.comments+xml";
const COMMENTS_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";
const RELS_NAMESPACE: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const MINIMAL_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const MINIMAL_ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const MINIMAL_DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// The raw parts of a `.docx` file, in archive order.
///
/// Parts the checker does not understand are carried through untouched.
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    parts: Vec<(String, Vec<u8>)>,
}

impl DocxPackage {
    /// Open a `.docx` file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Read a package from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_format_from_bytes(data)?;
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            parts.push((name, buf));
        }

        let package = Self { parts };
        if !package.contains(DOCUMENT_PART) {
            return Err(Error::UnknownFormat);
        }
        Ok(package)
    }

    /// Read a package from any reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Minimal package around a document body and optional styles.
    pub fn minimal(document_xml: &str, styles_xml: Option<&str>) -> Self {
        let mut package = Self::default();
        package.set_part(CONTENT_TYPES_PART, MINIMAL_CONTENT_TYPES.as_bytes().to_vec());
        package.set_part("_rels/.rels", MINIMAL_ROOT_RELS.as_bytes().to_vec());
        package.set_part(DOCUMENT_RELS_PART, MINIMAL_DOCUMENT_RELS.as_bytes().to_vec());
        package.set_part(DOCUMENT_PART, document_xml.as_bytes().to_vec());
        if let Some(styles) = styles_xml {
            package.set_part(STYLES_PART, styles.as_bytes().to_vec());
        }
        package
    }

    /// Whether a part exists.
    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|(n, _)| n == name)
    }

    /// Raw part bytes.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    /// Part decoded as UTF-8 text.
    pub fn part_str(&self, name: &str) -> Result<Option<String>> {
        match self.part(name) {
            Some(data) => String::from_utf8(data.to_vec())
                .map(Some)
                .map_err(|e| Error::Xml(format!("{}: {}", name, e))),
            None => Ok(None),
        }
    }

    /// Add or replace a part.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = data,
            None => self.parts.push((name.to_string(), data)),
        }
    }

    /// Part names in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(n, _)| n.as_str())
    }

    /// Register the comments part in content types and document relationships.
    pub fn register_comments_part(&mut self) -> Result<()> {
        let types_xml = self
            .part_str(CONTENT_TYPES_PART)?
            .ok_or_else(|| Error::MissingPart(CONTENT_TYPES_PART.to_string()))?;
        let mut types = XmlElement::parse(&types_xml)?;
        let part_name = format!("/{}", COMMENTS_PART);
        let registered = types
            .children_named("Override")
            .any(|o| o.attr("PartName") == Some(part_name.as_str()));
        if !registered {
            types.children.push(crate::model::XmlNode::Element(
                XmlElement::new("Override")
                    .with_attr("PartName", part_name)
                    .with_attr("ContentType", COMMENTS_CONTENT_TYPE),
            ));
            self.set_part(CONTENT_TYPES_PART, types.to_xml()?.into_bytes());
        }

        let mut rels = match self.part_str(DOCUMENT_RELS_PART)? {
            Some(xml) => XmlElement::parse(&xml)?,
            None => XmlElement::new("Relationships").with_attr("xmlns", RELS_NAMESPACE),
        };
        let linked = rels
            .children_named("Relationship")
            .any(|r| r.attr("Type") == Some(COMMENTS_REL_TYPE));
        if !linked {
            let next_id = rels
                .children_named("Relationship")
                .filter_map(|r| r.attr("Id"))
                .filter_map(|id| id.strip_prefix("rId"))
                .filter_map(|n| n.parse::<u32>().ok())
                .max()
                .unwrap_or(0)
                + 1;
            rels.children.push(crate::model::XmlNode::Element(
                XmlElement::new("Relationship")
                    .with_attr("Id", format!("rId{}", next_id))
                    .with_attr("Type", COMMENTS_REL_TYPE)
                    .with_attr("Target", "comments.xml"),
            ));
            self.set_part(DOCUMENT_RELS_PART, rels.to_xml()?.into_bytes());
        }
        Ok(())
    }

    /// Serialize the package as a zip archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, data) in &self.parts {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
        }
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// Write the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}
