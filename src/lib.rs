//! # plume
//!
//! Content engine for a rich-text editing surface: HTML normalization,
//! complex-word analysis for French text, word counting, and selection-aware
//! editing state.
//!
//! ## Features
//!
//! - Normalize pasted or edited HTML down to a small tag subset
//! - Mark hard-to-read words with `<span class="complex-word">`, backed by a
//!   lazily fetched dictionary with an embedded fallback
//! - Count words and rate the length of an article
//! - Track active formats at the selection and run formatting, link and
//!   image intents against an editing surface
//!
//! ## Quick Start
//!
//! ```
//! use plume::{count_words, normalize, rate, Tier};
//!
//! let html = normalize(r#"<div style="color:red">Bonjour</div><div>le monde</div>"#);
//! assert_eq!(html, "<p>Bonjour</p><p>le monde</p>");
//!
//! let words = count_words("Bonjour le monde");
//! assert_eq!(rate(words).tier, Tier::Insufficient);
//! ```
//!
//! Complex-word analysis is asynchronous, since the dictionary may have to
//! be fetched first:
//!
//! ```
//! use std::sync::Arc;
//! use plume::analysis::{Analyzer, ComplexityClassifier, DictionaryCache, NoSource};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let cache = Arc::new(DictionaryCache::new(NoSource));
//! let analyzer = Analyzer::new(ComplexityClassifier::new(cache, "fr"));
//!
//! let analysis = analyzer.analyze("<p>Une hypothèse</p>").await;
//! assert_eq!(analysis.complex_words, ["hypothèse"]);
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod dom;
pub mod editor;
pub mod error;
pub mod normalize;
pub mod util;

pub use analysis::{
    Analysis, Analyzer, ComplexityClassifier, DictionaryCache, Rating, Tier, count_words, rate,
};
pub use config::Config;
pub use editor::{EditingHost, EditingState, MemoryHost};
pub use error::{Error, Result};
pub use normalize::normalize;
