//! Benchmarks for thesisfmt checking performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks run on synthetic documents built from chapters of
//! headings and body paragraphs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use thesisfmt::classify::collect_classified;
use thesisfmt::{
    check_document, CheckOptions, ClassifyOptions, Document, RuleClassifier, RuleConfig,
};

/// Creates a synthetic document with the given number of chapters.
fn create_test_document(chapters: usize) -> String {
    let mut body = String::new();
    for chapter in 1..=chapters {
        body.push_str(&format!(
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/><w:sz w:val="32"/></w:rPr><w:t>第{}章 标题</w:t></w:r></w:p>"#,
            chapter
        ));
        for section in 1..=3 {
            body.push_str(&format!(
                r#"<w:p><w:r><w:t>{}.{} 小节</w:t></w:r></w:p>"#,
                chapter, section
            ));
            for paragraph in 0..5 {
                body.push_str(&format!(
                    r#"<w:p><w:pPr><w:ind w:firstLineChars="200"/></w:pPr><w:r><w:rPr><w:rFonts w:eastAsia="宋体" w:ascii="Times New Roman"/></w:rPr><w:t>第{}章第{}节的第{}段正文，用于性能测试。</w:t></w:r></w:p>"#,
                    chapter, section, paragraph
                ));
            }
        }
    }
    format!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    )
}

/// Benchmark measurement literal parsing.
fn bench_unit_parsing(c: &mut Criterion) {
    c.bench_function("parse_measurements", |b| {
        b.iter(|| {
            for literal in ["2字符", "12pt", "1.5倍", "小四", "2.54cm"] {
                let _ = thesisfmt::units::parse_measurement(black_box(literal));
            }
        });
    });
}

/// Benchmark classification at various sizes.
fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");
    let classifier = RuleClassifier::new().unwrap();

    for chapters in [1, 5, 20].iter() {
        let doc = Document::from_parts(&create_test_document(*chapters), None).unwrap();

        group.bench_function(format!("{}_chapters", chapters), |b| {
            let options = ClassifyOptions::default();
            b.iter(|| collect_classified(black_box(&doc), &classifier, &options));
        });
    }

    group.finish();
}

/// Benchmark a full check in both modes.
fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check");
    let config = RuleConfig::default_rules().unwrap();
    let classifier = RuleClassifier::new().unwrap();
    let xml = create_test_document(5);
    let doc = Document::from_parts(&xml, None).unwrap();
    let (classified, _) = collect_classified(&doc, &classifier, &ClassifyOptions::default());

    for (name, options) in [
        ("annotate", CheckOptions::new()),
        ("correct", CheckOptions::new().correct()),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut doc = Document::from_parts(&xml, None).unwrap();
                check_document(&mut doc, &config, black_box(&classified), options.clone())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_unit_parsing, bench_classification, bench_check);
criterion_main!(benches);
