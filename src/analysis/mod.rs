//! Linguistic complexity analysis.
//!
//! The [`Analyzer`] runs the whole pipeline on an HTML snapshot of the
//! editable surface: stale marks are stripped, the content is normalized,
//! complex words are marked again and the words are counted.
//!
//! ```no_run
//! use std::sync::Arc;
//! use plume::analysis::{Analyzer, ComplexityClassifier, DictionaryCache, FileSource};
//!
//! # async fn run() {
//! let cache = Arc::new(DictionaryCache::new(FileSource::new("dictionaries")));
//! let analyzer = Analyzer::new(ComplexityClassifier::new(cache, "fr"));
//! let analysis = analyzer.analyze("<div>Une phrase simple.</div>").await;
//! println!("{} words, {}", analysis.word_count, analysis.rating.label);
//! # }
//! ```

pub mod classifier;
pub mod dictionary;
pub mod lexicon;
pub mod marker;
pub mod syllables;
pub mod tokens;
pub mod wordcount;

pub use classifier::{ClassifierOptions, ComplexityClassifier, Reason, Verdict, normalize_word};
pub use dictionary::{
    DEFAULT_FETCH_TIMEOUT, Dictionary, DictionaryCache, DictionaryOrigin, DictionarySource,
    FileSource, NoSource, StaticSource,
};
pub use marker::{MARK_CLASS, MarkReport, mark_complex_words, strip_marks};
pub use wordcount::{Rating, Tier, count_words, rate};

use serde::Serialize;

use crate::dom::parse_fragment;
use crate::normalize::normalize_tree;

/// Result of analyzing one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Normalized HTML with complex words marked.
    pub html: String,
    pub word_count: usize,
    pub rating: Rating,
    /// Normalized form of every marked word, in document order.
    pub complex_words: Vec<String>,
}

/// Full analysis pipeline over HTML snapshots.
#[derive(Debug, Clone)]
pub struct Analyzer<S> {
    classifier: ComplexityClassifier<S>,
}

impl<S: DictionarySource> Analyzer<S> {
    pub fn new(classifier: ComplexityClassifier<S>) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &ComplexityClassifier<S> {
        &self.classifier
    }

    /// Strip, normalize, mark and count an HTML snapshot.
    pub async fn analyze(&self, html: &str) -> Analysis {
        let mut snapshot = parse_fragment(html);
        strip_marks(&mut snapshot.dom, snapshot.body);
        let normalized = normalize_tree(&snapshot.dom, snapshot.body);

        let mut fragment = parse_fragment(&normalized);
        let report = mark_complex_words(&mut fragment.dom, fragment.body, &self.classifier).await;

        let word_count = count_words(&fragment.dom.plain_text(fragment.body));
        let rating = rate(word_count);
        log::info!(
            "analyzed {} words ({}), {} complex",
            word_count,
            rating.label,
            report.marked
        );

        Analysis {
            html: fragment.inner_html(),
            word_count,
            rating,
            complex_words: report.complex,
        }
    }
}
