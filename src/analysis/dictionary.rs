//! Dictionary acquisition and caching.
//!
//! A dictionary is a set of known words for a language. It is fetched once
//! per language through a [`DictionarySource`] and memoized for the lifetime
//! of the [`DictionaryCache`]. Concurrent callers arriving while the first
//! fetch is in flight wait for it instead of starting their own.
//!
//! Any failure (I/O, malformed payload, timeout, empty list) degrades to the
//! embedded fallback list, which is then cached like a fetched dictionary so
//! the failure is not retried on every lookup.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::OnceCell;

use super::lexicon::fallback_words;
use crate::error::{Error, Result};

/// Default fetch timeout before falling back to the embedded list.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a cached dictionary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryOrigin {
    Fetched,
    Fallback,
}

/// A set of known lowercase words.
#[derive(Debug, Clone)]
pub struct Dictionary {
    words: HashSet<String>,
    origin: DictionaryOrigin,
}

impl Dictionary {
    /// Build a dictionary, lowercasing and trimming every entry.
    pub fn from_words<I, W>(words: I, origin: DictionaryOrigin) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words, origin }
    }

    /// The embedded common-word list.
    pub fn fallback() -> Self {
        Self::from_words(fallback_words(), DictionaryOrigin::Fallback)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn origin(&self) -> DictionaryOrigin {
        self.origin
    }
}

/// A provider of word lists, one per language.
pub trait DictionarySource: Send + Sync {
    /// Fetch the word list for `lang`.
    fn fetch(&self, lang: &str) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Accepted payload shapes: a bare JSON array or `{"words": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum WordList {
    Plain(Vec<String>),
    Wrapped { words: Vec<String> },
}

/// Parse a JSON word list payload.
pub fn parse_word_list(bytes: &[u8]) -> Result<Vec<String>> {
    let list: WordList = serde_json::from_slice(bytes)?;
    Ok(match list {
        WordList::Plain(words) | WordList::Wrapped { words } => words,
    })
}

/// Reads word lists from disk.
///
/// If `path` is a directory, the list for `lang` is `<path>/<lang>.json`;
/// otherwise `path` itself is read for every language.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn resolve(&self, lang: &str) -> PathBuf {
        if self.path.is_dir() {
            self.path.join(format!("{lang}.json"))
        } else {
            self.path.clone()
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DictionarySource for FileSource {
    async fn fetch(&self, lang: &str) -> Result<Vec<String>> {
        let path = self.resolve(lang);
        log::debug!("reading dictionary {}", path.display());
        let bytes = tokio::fs::read(&path).await?;
        parse_word_list(&bytes)
    }
}

/// An in-memory word list, returned for every language.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    words: Vec<String>,
}

impl StaticSource {
    pub fn new<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl DictionarySource for StaticSource {
    async fn fetch(&self, _lang: &str) -> Result<Vec<String>> {
        Ok(self.words.clone())
    }
}

/// A source that never has a dictionary; every load uses the fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl DictionarySource for NoSource {
    async fn fetch(&self, lang: &str) -> Result<Vec<String>> {
        Err(Error::Unavailable(format!("no dictionary source for '{lang}'")))
    }
}

type Slot = Arc<OnceCell<Arc<Dictionary>>>;

/// Process-wide dictionary cache with single-flight loading.
pub struct DictionaryCache<S> {
    source: S,
    timeout: Option<Duration>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl<S: DictionarySource> DictionaryCache<S> {
    /// Create a cache with the default fetch timeout.
    pub fn new(source: S) -> Self {
        Self {
            source,
            timeout: Some(DEFAULT_FETCH_TIMEOUT),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Override the fetch timeout; `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load the dictionary for `lang`, fetching it on first use.
    pub async fn load(&self, lang: &str) -> Arc<Dictionary> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.entry(lang.to_string()).or_default().clone()
        };
        slot.get_or_init(|| self.fetch_or_fallback(lang))
            .await
            .clone()
    }

    /// Check whether `word` is known in `lang`.
    pub async fn contains(&self, lang: &str, word: &str) -> bool {
        self.load(lang).await.contains(word)
    }

    /// Check whether `lang` has been loaded already (fetched or fallback).
    pub fn is_loaded(&self, lang: &str) -> bool {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(lang)
            .is_some_and(|slot| slot.initialized())
    }

    async fn fetch_or_fallback(&self, lang: &str) -> Arc<Dictionary> {
        let fetched = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.source.fetch(lang))
                .await
                .unwrap_or(Err(Error::Timeout(limit))),
            None => self.source.fetch(lang).await,
        };

        let dictionary = match fetched {
            Ok(words) if !words.is_empty() => {
                Dictionary::from_words(words, DictionaryOrigin::Fetched)
            }
            Ok(_) => {
                log::warn!("dictionary for '{lang}' is empty, using fallback list");
                Dictionary::fallback()
            }
            Err(e) => {
                log::warn!("dictionary for '{lang}' unavailable ({e}), using fallback list");
                Dictionary::fallback()
            }
        };
        log::debug!(
            "dictionary for '{lang}' ready: {} words ({:?})",
            dictionary.len(),
            dictionary.origin()
        );
        Arc::new(dictionary)
    }
}

impl<S> std::fmt::Debug for DictionaryCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictionaryCache")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Counts fetches and yields a few times so concurrent callers overlap.
    struct CountingSource {
        calls: AtomicUsize,
    }

    impl DictionarySource for CountingSource {
        async fn fetch(&self, _lang: &str) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
            Ok(vec!["anticonstitutionnellement".to_string()])
        }
    }

    struct PendingSource;

    impl DictionarySource for PendingSource {
        async fn fetch(&self, _lang: &str) -> Result<Vec<String>> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_fetch() {
        let cache = DictionaryCache::new(CountingSource {
            calls: AtomicUsize::new(0),
        });

        let (a, b) = tokio::join!(cache.load("fr"), cache.load("fr"));

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.origin(), DictionaryOrigin::Fetched);

        cache.load("fr").await;
        assert_eq!(cache.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_falls_back_once() {
        let cache = DictionaryCache::new(NoSource);
        assert!(!cache.is_loaded("fr"));

        let dict = cache.load("fr").await;

        assert_eq!(dict.origin(), DictionaryOrigin::Fallback);
        assert!(dict.contains("beaucoup"));
        assert!(cache.is_loaded("fr"));
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let cache = DictionaryCache::new(PendingSource).with_timeout(Some(Duration::from_millis(20)));
        let dict = cache.load("fr").await;
        assert_eq!(dict.origin(), DictionaryOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_empty_list_falls_back() {
        let cache = DictionaryCache::new(StaticSource::new(Vec::<String>::new()));
        assert_eq!(cache.load("fr").await.origin(), DictionaryOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_words_are_lowercased() {
        let cache = DictionaryCache::new(StaticSource::new([" Maintenant ", "ÉTÉ"]));
        assert!(cache.contains("fr", "maintenant").await);
        assert!(cache.contains("fr", "été").await);
    }

    #[test]
    fn test_parse_word_list_shapes() {
        assert_eq!(parse_word_list(br#"["a","b"]"#).unwrap(), vec!["a", "b"]);
        assert_eq!(parse_word_list(br#"{"words":["c"]}"#).unwrap(), vec!["c"]);
        assert!(matches!(parse_word_list(b"{oops"), Err(Error::Json(_))));
    }
}
