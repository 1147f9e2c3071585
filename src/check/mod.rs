//! The check pipeline: outline → targets → diff → annotate or correct.

mod options;
mod report;

pub use options::{CheckMode, CheckOptions};
pub use report::{CheckReport, NodeReport, RunReport};

use std::collections::BTreeMap;
use std::ops::Range;

use crate::classify::ClassifiedParagraph;
use crate::config::RuleConfig;
use crate::diff::{AppliedCorrection, CorrectionEngine, DiffEngine, DiffRecord, FieldId};
use crate::error::{Error, Result};
use crate::model::{Document, Paragraph, ParagraphHandle};
use crate::outline::{attach_paragraphs, promotion_rules, NodeId, NodeKind, Outline};
use crate::style::{build_target, CharacterStyleSpec, FieldError, StyleCascade, TargetStyle};

/// Resolved targets for every node kind in an outline.
#[derive(Debug, Clone, Default)]
pub struct Targets {
    styles: BTreeMap<NodeKind, TargetStyle>,
}

impl Targets {
    /// Target for a kind.
    pub fn get(&self, kind: NodeKind) -> Option<&TargetStyle> {
        self.styles.get(&kind)
    }

    /// Field errors across all targets.
    pub fn field_errors(&self) -> Vec<FieldError> {
        self.styles
            .values()
            .flat_map(|t| t.field_errors.iter().cloned())
            .collect()
    }
}

/// Checks (and optionally corrects) a document against a rulebook.
pub struct Checker<'c> {
    config: &'c RuleConfig,
    options: CheckOptions,
    diff: DiffEngine,
    correction: CorrectionEngine,
}

impl<'c> Checker<'c> {
    /// Create a checker.
    pub fn new(config: &'c RuleConfig, options: CheckOptions) -> Self {
        Self {
            config,
            diff: DiffEngine::new(options.language),
            correction: CorrectionEngine::new(options.language),
            options,
        }
    }

    /// Options in use.
    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Build the outline and apply the configured promotions.
    ///
    /// Returns the outline and the number of promoted nodes.
    pub fn build_outline(&self, items: &[ClassifiedParagraph]) -> Result<(Outline, usize)> {
        let rules = promotion_rules(self.config.promotion())?;
        let mut outline = Outline::build(items);
        let promoted = outline.promote(&rules);
        Ok((outline, promoted))
    }

    /// Resolve the target of every kind present in the outline.
    ///
    /// Any missing or malformed node configuration fails the whole run here,
    /// before the document is touched.
    pub fn resolve_targets(&self, outline: &Outline) -> Result<Targets> {
        let mut styles = BTreeMap::new();
        for kind in outline.kinds() {
            let path = kind.config_path();
            let fragment = self.config.resolved_fragment(path)?;
            styles.insert(kind, build_target(path, &fragment)?);
        }
        Ok(Targets { styles })
    }

    /// Classified list → outline → check.
    pub fn check(&self, doc: &mut Document, items: &[ClassifiedParagraph]) -> Result<CheckReport> {
        let (mut outline, promoted) = self.build_outline(items)?;
        let mut report = self.check_outline(doc, &mut outline)?;
        report.promoted = promoted;
        Ok(report)
    }

    /// Check a prepared outline, linking it to the document first.
    pub fn check_outline(&self, doc: &mut Document, outline: &mut Outline) -> Result<CheckReport> {
        let targets = self.resolve_targets(outline)?;
        let matches = attach_paragraphs(outline, doc);
        log::debug!(
            "{} of {} outline nodes matched a paragraph",
            matches.attached,
            outline.len()
        );

        let mut nodes = Vec::new();
        for id in outline.depth_first() {
            let node = outline.node(id);
            let (Some(kind), Some(handle)) = (node.kind, node.paragraph) else {
                continue;
            };
            let Some(target) = targets.get(kind) else {
                continue;
            };
            nodes.push(self.check_node(doc, id, kind, handle, target)?);
        }

        Ok(CheckReport {
            mode: self.options.mode,
            nodes,
            skipped: outline.skipped().to_vec(),
            unmatched: matches.unmatched,
            duplicates: matches.duplicates,
            field_errors: targets.field_errors(),
            promoted: 0,
        })
    }

    fn paragraph_diffs(
        &self,
        doc: &Document,
        para: &Paragraph<'_>,
        target: &TargetStyle,
    ) -> Vec<DiffRecord> {
        let effective = StyleCascade::new(doc.styles()).paragraph_spec(para);
        self.config
            .warnings()
            .apply(self.diff.diff_paragraph(&effective, &target.paragraph))
    }

    fn run_diffs(
        &self,
        doc: &Document,
        para: &Paragraph<'_>,
        target: &CharacterStyleSpec,
    ) -> Vec<RunReport> {
        let cascade = StyleCascade::new(doc.styles());
        para.runs()
            .iter()
            .enumerate()
            .filter_map(|(index, run)| {
                let text = run.text();
                if text.trim().is_empty() {
                    return None;
                }
                let effective = cascade.run_spec(para, run);
                let diffs = self
                    .config
                    .warnings()
                    .apply(self.diff.diff_character(&effective, target));
                (!diffs.is_empty()).then_some(RunReport {
                    run: index,
                    text,
                    diffs,
                })
            })
            .collect()
    }

    fn check_node(
        &self,
        doc: &mut Document,
        id: NodeId,
        kind: NodeKind,
        handle: ParagraphHandle,
        target: &TargetStyle,
    ) -> Result<NodeReport> {
        let mut report = {
            let para = doc
                .paragraph(handle)
                .ok_or_else(|| Error::Other(format!("no paragraph at index {}", handle.0)))?;
            let text = para.text();
            let text_issues = match kind.text_check() {
                Some(check) if self.config.warnings().is_enabled(FieldId::TextPattern) => {
                    check.run(&text, self.options.language)
                }
                _ => Vec::new(),
            };
            NodeReport {
                node: id,
                kind,
                paragraph: handle,
                text_issues,
                paragraph_diffs: self.paragraph_diffs(doc, &para, target),
                runs: self.run_diffs(doc, &para, &target.character),
                text,
                corrections: Vec::new(),
                comments: 0,
            }
        };

        match self.options.mode {
            CheckMode::Annotate => self.annotate(doc, &mut report)?,
            CheckMode::Correct => self.correct(doc, target, &mut report)?,
        }

        if !report.is_clean() {
            log::debug!(
                "{} [{}]: {} issue(s), {} correction(s)",
                kind,
                handle.0,
                report.issue_count(),
                report.corrections.len()
            );
        }
        Ok(report)
    }

    fn comment(
        &self,
        doc: &mut Document,
        handle: ParagraphHandle,
        runs: Range<usize>,
        lines: &[&str],
    ) -> Result<usize> {
        let added = doc.add_comment(
            handle,
            runs,
            &lines.join("\n"),
            &self.options.author,
            &self.options.initials,
        )?;
        Ok(usize::from(added.is_some()))
    }

    fn run_count(doc: &Document, handle: ParagraphHandle) -> usize {
        doc.paragraph(handle).map_or(0, |p| p.runs().len())
    }

    /// One comment for paragraph-level findings over all runs, one per run
    /// with run-level findings.
    fn annotate(&self, doc: &mut Document, report: &mut NodeReport) -> Result<()> {
        let handle = report.paragraph;
        let group: Vec<&str> = report
            .text_issues
            .iter()
            .chain(&report.paragraph_diffs)
            .map(|r| r.message.as_str())
            .collect();
        let mut comments = self.comment(doc, handle, 0..Self::run_count(doc, handle), &group)?;

        for run in &report.runs {
            let lines: Vec<&str> = run.diffs.iter().map(|r| r.message.as_str()).collect();
            comments += self.comment(doc, handle, run.run..run.run + 1, &lines)?;
        }
        report.comments = comments;
        Ok(())
    }

    fn correct_paragraph(
        &self,
        doc: &mut Document,
        handle: ParagraphHandle,
        diffs: &[DiffRecord],
    ) -> Result<Vec<AppliedCorrection>> {
        if diffs.is_empty() {
            return Ok(Vec::new());
        }
        match doc.paragraph_mut_with_styles(handle) {
            Some((mut para, styles)) => self.correction.apply_paragraph(&mut para, styles, diffs),
            None => Ok(Vec::new()),
        }
    }

    /// Paragraph pass, a second paragraph pass if the style changed, then
    /// the run pass against the final cascade.
    fn correct(
        &self,
        doc: &mut Document,
        target: &TargetStyle,
        report: &mut NodeReport,
    ) -> Result<()> {
        let handle = report.paragraph;
        let mut corrections = self.correct_paragraph(doc, handle, &report.paragraph_diffs)?;

        if corrections
            .iter()
            .any(|c| c.record.field == FieldId::BuiltinStyleName)
        {
            let rediff = match doc.paragraph(handle) {
                Some(para) => self.paragraph_diffs(doc, &para, target),
                None => Vec::new(),
            };
            corrections.extend(self.correct_paragraph(doc, handle, &rediff)?);
        }

        let runs = match doc.paragraph(handle) {
            Some(para) => self.run_diffs(doc, &para, &target.character),
            None => Vec::new(),
        };
        if let Some(mut para) = doc.paragraph_mut(handle) {
            for run_report in &runs {
                if let Some(mut run) = para.run_mut(run_report.run) {
                    corrections.extend(self.correction.apply_run(&mut run, &run_report.diffs));
                }
            }
        }

        let mut comments = 0;
        if self.options.comment_corrections && !corrections.is_empty() {
            let lines: Vec<&str> = corrections.iter().map(|c| c.message.as_str()).collect();
            comments += self.comment(doc, handle, 0..Self::run_count(doc, handle), &lines)?;
        }
        if !report.text_issues.is_empty() {
            let lines: Vec<&str> = report.text_issues.iter().map(|r| r.message.as_str()).collect();
            comments += self.comment(doc, handle, 0..Self::run_count(doc, handle), &lines)?;
        }

        report.corrections = corrections;
        report.comments = comments;
        Ok(())
    }
}
