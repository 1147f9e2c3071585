//! The classified paragraph list and its JSON interchange form.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

use super::{classify_paragraphs, Classifier, ClassifyOptions, ClassifyStats};
use crate::error::Result;
use crate::model::Document;
use crate::outline::fingerprint;

/// One classified paragraph, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedParagraph {
    /// Category label
    pub category: String,
    /// Classifier confidence
    pub confidence: f32,
    /// NFC-normalized paragraph text
    pub text: String,
    /// Content fingerprint of the paragraph
    pub fingerprint: String,
}

/// Classify every non-empty body paragraph of a document.
pub fn collect_classified(
    doc: &Document,
    classifier: &dyn Classifier,
    options: &ClassifyOptions,
) -> (Vec<ClassifiedParagraph>, ClassifyStats) {
    let (texts, fingerprints): (Vec<String>, Vec<String>) = doc
        .paragraphs()
        .filter(|(_, p)| !p.is_empty())
        .map(|(_, p)| (p.text().trim().nfc().collect::<String>(), fingerprint(&p)))
        .unzip();

    let (classifications, stats) = classify_paragraphs(classifier, &texts, options);
    log::debug!(
        "classified {} paragraphs in {} batches",
        texts.len(),
        stats.batches
    );

    let items = classifications
        .into_iter()
        .zip(texts)
        .zip(fingerprints)
        .map(|((c, text), fingerprint)| ClassifiedParagraph {
            category: c.label,
            confidence: c.confidence,
            text,
            fingerprint,
        })
        .collect();
    (items, stats)
}

/// Serialize a classified list as pretty JSON.
pub fn to_json(items: &[ClassifiedParagraph]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

/// Parse a classified list from JSON.
pub fn from_json(json: &str) -> Result<Vec<ClassifiedParagraph>> {
    Ok(serde_json::from_str(json)?)
}

/// Write a classified list to a JSON file.
pub fn save_classified<P: AsRef<Path>>(path: P, items: &[ClassifiedParagraph]) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, items)?;
    Ok(())
}

/// Read a classified list from a JSON file.
pub fn load_classified<P: AsRef<Path>>(path: P) -> Result<Vec<ClassifiedParagraph>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_keeps_duplicates_and_order() {
        let items = vec![
            ClassifiedParagraph {
                category: "body_text".into(),
                confidence: 0.5,
                text: "同一段".into(),
                fingerprint: "abc".into(),
            },
            ClassifiedParagraph {
                category: "body_text".into(),
                confidence: 0.5,
                text: "同一段".into(),
                fingerprint: "abc".into(),
            },
        ];
        let json = to_json(&items).unwrap();
        assert!(json.contains("\"fingerprint\""));
        assert_eq!(from_json(&json).unwrap(), items);
    }
}
