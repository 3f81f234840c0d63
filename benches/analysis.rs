//! Benchmarks for the content pipeline.
//!
//! Run with: cargo bench

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};

use plume::analysis::{
    Analyzer, ComplexityClassifier, DictionaryCache, NoSource, mark_complex_words, strip_marks,
};
use plume::dom::parse_fragment;
use plume::normalize;

const PARAGRAPH: &str = "<div class=\"MsoNormal\"><span style=\"font-family:Arial\">\
    La biologie moléculaire étudie les mécanismes de la réplication, \
    de la transcription et de la traduction du matériel génétique. \
    Cette hypothèse reste <b>controversée</b> parmi les chercheurs.</span></div>";

/// A pasted article of a few thousand words.
fn sample_article() -> String {
    PARAGRAPH.repeat(120)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// ============================================================================
// Normalization
// ============================================================================

fn bench_normalize(c: &mut Criterion) {
    let article = sample_article();
    c.bench_function("normalize", |b| {
        b.iter(|| normalize(black_box(&article)));
    });
}

// ============================================================================
// Marking
// ============================================================================

fn bench_mark(c: &mut Criterion) {
    let rt = runtime();
    let classifier = ComplexityClassifier::new(Arc::new(DictionaryCache::new(NoSource)), "fr");
    let normalized = normalize(&sample_article());

    c.bench_function("mark_complex_words", |b| {
        b.iter(|| {
            let mut fragment = parse_fragment(black_box(&normalized));
            rt.block_on(mark_complex_words(&mut fragment.dom, fragment.body, &classifier))
        });
    });

    let mut marked = parse_fragment(&normalized);
    rt.block_on(mark_complex_words(&mut marked.dom, marked.body, &classifier));
    let marked = marked.inner_html();
    c.bench_function("strip_marks", |b| {
        b.iter(|| {
            let mut fragment = parse_fragment(black_box(&marked));
            strip_marks(&mut fragment.dom, fragment.body)
        });
    });
}

fn bench_analyze(c: &mut Criterion) {
    let rt = runtime();
    let analyzer = Analyzer::new(ComplexityClassifier::new(
        Arc::new(DictionaryCache::new(NoSource)),
        "fr",
    ));
    let article = sample_article();

    c.bench_function("analyze", |b| {
        b.iter(|| rt.block_on(analyzer.analyze(black_box(&article))));
    });
}

criterion_group!(benches, bench_normalize, bench_mark, bench_analyze);
criterion_main!(benches);
