//! # thesisfmt
//!
//! Check and correct thesis formatting in Word (`.docx`) documents against a
//! declarative YAML rulebook.
//!
//! ## Quick Start
//!
//! ```no_run
//! use thesisfmt::{check_file, CheckOptions, RuleConfig};
//!
//! fn main() -> thesisfmt::Result<()> {
//!     let config = RuleConfig::default_rules()?;
//!     let options = CheckOptions::new();
//!     let report = check_file("thesis.docx", "thesis_checked.docx", &config, options)?;
//!     println!("{} issue(s)", report.issue_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Classify**: every non-empty paragraph gets a category label
//! - **Outline**: labels become a heading tree, linked back to paragraphs by fingerprint
//! - **Diff**: effective styles (direct formatting, style chain, defaults) are compared with
//!   targets built from the rulebook
//! - **Annotate or correct**: findings become review comments, or are written back

pub mod check;
pub mod classify;
pub mod config;
pub mod detect;
pub mod diff;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;
pub mod style;
pub mod units;

// Re-export commonly used types
pub use check::{CheckMode, CheckOptions, CheckReport, Checker, NodeReport};
pub use classify::{
    ClassifiedParagraph, Classifier, ClassifyOptions, ClassifyStats, RuleClassifier,
};
pub use config::RuleConfig;
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx};
pub use diff::{DiffRecord, FieldId, Language, WarningMask};
pub use error::{Error, Result};
pub use model::{Document, ParagraphHandle};
pub use outline::{MatchReport, NodeKind, Outline};
pub use render::JsonFormat;
pub use units::{MeasurementValue, UnitKind};

use std::path::Path;

/// Open a `.docx` file.
///
/// # Example
///
/// ```no_run
/// let doc = thesisfmt::open("thesis.docx").unwrap();
/// println!("Paragraphs: {}", doc.paragraph_count());
/// ```
pub fn open<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    detect_format_from_path(path)?;
    Document::open(path)
}

/// Classification and outline of a document, before any check runs.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Classified paragraphs in document order
    pub classified: Vec<ClassifiedParagraph>,
    /// Outline with promotions applied and paragraphs attached
    pub outline: Outline,
    /// Classifier batch statistics
    pub stats: ClassifyStats,
    /// Fingerprint matching summary
    pub matches: MatchReport,
    /// Nodes reclassified by promotion
    pub promoted: usize,
}

/// Classify a document and build its outline.
pub fn analyze(
    doc: &Document,
    config: &RuleConfig,
    classifier: &dyn Classifier,
    options: &ClassifyOptions,
) -> Result<Analysis> {
    let (classified, stats) = classify::collect_classified(doc, classifier, options);
    let checker = Checker::new(config, CheckOptions::default());
    let (mut outline, promoted) = checker.build_outline(&classified)?;
    let matches = outline::attach_paragraphs(&mut outline, doc);
    Ok(Analysis {
        classified,
        outline,
        stats,
        matches,
        promoted,
    })
}

/// Check (or correct) an open document from an already classified list.
pub fn check_document(
    doc: &mut Document,
    config: &RuleConfig,
    classified: &[ClassifiedParagraph],
    options: CheckOptions,
) -> Result<CheckReport> {
    Checker::new(config, options).check(doc, classified)
}

/// Open, classify with [`RuleClassifier`], check and save to `output`.
///
/// # Example
///
/// ```no_run
/// use thesisfmt::{check_file, CheckOptions, RuleConfig};
///
/// let config = RuleConfig::from_file("rules.yaml").unwrap();
/// let options = CheckOptions::new().correct();
/// check_file("thesis.docx", "thesis_fixed.docx", &config, options).unwrap();
/// ```
pub fn check_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: &RuleConfig,
    options: CheckOptions,
) -> Result<CheckReport> {
    let mut doc = open(input)?;
    let classifier = RuleClassifier::new()?;
    let (classified, _) =
        classify::collect_classified(&doc, &classifier, &ClassifyOptions::default());
    let report = check_document(&mut doc, config, &classified, options)?;
    doc.save(output)?;
    Ok(report)
}
