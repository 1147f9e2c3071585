//! Document object model for WordprocessingML.
//!
//! This is the boundary the checker reads and writes through: read-only
//! views (`Paragraph`, `Run`, `ParagraphProperties`, `RunProperties`) used
//! by the style cascade, and mutable views (`ParagraphMut`, `RunMut`) that
//! expose high-level setters plus the line/character-unit escape hatch.

mod comments;
mod document;
mod paragraph;
mod run;
mod styles;
mod xml;

pub use comments::Comments;
pub use document::{Document, ParagraphHandle};
pub use paragraph::{
    Alignment, IndentSide, LineSpacing, LineSpacingRule, Paragraph, ParagraphMut,
    ParagraphProperties, SpacingSide,
};
pub use run::{Rgb, Run, RunMut, RunProperties};
pub use styles::{normalize_style_name, StyleDef, StyleKind, StyleSheet};
pub use xml::{XmlElement, XmlNode};
