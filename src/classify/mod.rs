//! Paragraph classification boundary.
//!
//! A [`Classifier`] labels paragraph texts with a category and confidence.
//! [`classify_paragraphs`] drives it in fixed-size batches, retries failed
//! batches item by item, and downgrades low-confidence results to the
//! fallback category before anything reaches the outline builder.

mod persist;
mod rules;

pub use persist::{
    collect_classified, from_json, load_classified, save_classified, to_json, ClassifiedParagraph,
};
pub use rules::RuleClassifier;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One classifier verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Category label
    pub label: String,
    /// Confidence in `[0, 1]`
    pub confidence: f32,
}

impl Classification {
    /// Create a classification.
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Something that assigns categories to paragraph texts.
pub trait Classifier: Send + Sync {
    /// Classify a batch; the result must have one entry per input.
    fn classify_batch(&self, texts: &[String]) -> Result<Vec<Classification>>;

    /// Classify a single text.
    fn classify_one(&self, text: &str) -> Result<Classification> {
        self.classify_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Classifier("empty result for single item".to_string()))
    }
}

/// Options for [`classify_paragraphs`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyOptions {
    /// Texts per classifier call
    pub batch_size: usize,
    /// Results below this confidence become the fallback category
    pub threshold: f32,
    /// Category for low-confidence and failed items
    pub fallback_category: String,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            batch_size: 32,
            threshold: 0.6,
            fallback_category: "body_text".to_string(),
        }
    }
}

impl ClassifyOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the batch size (at least 1).
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the confidence threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the fallback category.
    pub fn with_fallback(mut self, category: impl Into<String>) -> Self {
        self.fallback_category = category.into();
        self
    }
}

/// Counters from one classification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyStats {
    /// Batches sent
    pub batches: usize,
    /// Batches that failed and were retried per item
    pub batch_failures: usize,
    /// Items that failed on their own
    pub item_failures: usize,
    /// Items downgraded for low confidence
    pub downgraded: usize,
}

/// Classify texts in batches with per-item fallback.
///
/// The output has exactly one classification per input, in input order.
pub fn classify_paragraphs(
    classifier: &dyn Classifier,
    texts: &[String],
    options: &ClassifyOptions,
) -> (Vec<Classification>, ClassifyStats) {
    let mut stats = ClassifyStats::default();
    let mut results = Vec::with_capacity(texts.len());

    for batch in texts.chunks(options.batch_size.max(1)) {
        stats.batches += 1;
        let outcome = classifier.classify_batch(batch).and_then(|r| {
            if r.len() == batch.len() {
                Ok(r)
            } else {
                Err(Error::ClassifierBatchFailure(format!(
                    "expected {} results, got {}",
                    batch.len(),
                    r.len()
                )))
            }
        });

        match outcome {
            Ok(batch_results) => results.extend(batch_results),
            Err(err) => {
                log::warn!("classifier batch failed, retrying per item: {}", err);
                stats.batch_failures += 1;
                for text in batch {
                    match classifier.classify_one(text) {
                        Ok(c) => results.push(c),
                        Err(err) => {
                            log::warn!("classifier failed on one paragraph: {}", err);
                            stats.item_failures += 1;
                            results.push(Classification::new(&options.fallback_category, 0.0));
                        }
                    }
                }
            }
        }
    }

    for c in &mut results {
        if c.confidence < options.threshold && c.label != options.fallback_category {
            log::debug!(
                "downgrading '{}' ({:.2}) to {}",
                c.label,
                c.confidence,
                options.fallback_category
            );
            c.label = options.fallback_category.clone();
            stats.downgraded += 1;
        }
    }

    (results, stats)
}
