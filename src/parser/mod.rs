//! `.docx` package reading and writing.

mod package;

pub use package::{
    DocxPackage, COMMENTS_PART, CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART, STYLES_PART,
};
