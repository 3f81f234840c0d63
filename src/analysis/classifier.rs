//! Per-word complexity heuristics.
//!
//! Rules are applied in a fixed order and the first decisive rule wins:
//!
//! 1. four-digit numbers (years) are simple
//! 2. words of three letters or fewer are simple
//! 3. curated common words are simple
//! 4. words with an embedded digit are complex
//! 5. long words are complex when the dictionary does not know them, and
//!    simple when curated as common long words
//! 6. technical suffixes and intensifier prefixes are complex
//! 7. words with many syllables are complex
//! 8. hard consonant or vowel runs are complex
//!
//! Shorter words skip the dictionary entirely: an incomplete word list must
//! not flag everyday vocabulary.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::dictionary::{DictionaryCache, DictionarySource};
use super::lexicon::{
    COMPLEX_PREFIXES, COMPLEX_SUFFIXES, ORDINARY_VOWEL_TRIPLES, PREFIX_MIN_REMAINDER,
    SHORT_MENT_MAX_LEN, SOFT_CLUSTER_LETTERS, is_affix_exception, is_common_long_word,
    is_common_polysyllabic, is_common_word,
};
use super::syllables::{count_syllables, is_vowel};

/// French elided articles and pronouns, longest first.
const ELISIONS: &[&str] = &[
    "jusqu'", "lorsqu'", "puisqu'", "qu'", "c'", "d'", "j'", "l'", "m'", "n'", "s'", "t'",
];

/// Tunable thresholds of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// Words at least this long are checked against the dictionary.
    pub long_word_threshold: usize,
    /// Words with at least this many syllables are complex.
    pub syllable_threshold: usize,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            long_word_threshold: 10,
            syllable_threshold: 4,
        }
    }
}

/// The rule that decided a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "rule", content = "detail")]
pub enum Reason {
    Year,
    Short,
    CommonWord,
    EmbeddedDigit,
    CommonLongWord,
    UnknownLongWord,
    Affix(&'static str),
    Syllables(usize),
    LetterRun,
    Plain,
}

impl Reason {
    /// Whether this rule marks the word complex.
    pub fn is_complex(self) -> bool {
        matches!(
            self,
            Reason::EmbeddedDigit
                | Reason::UnknownLongWord
                | Reason::Affix(_)
                | Reason::Syllables(_)
                | Reason::LetterRun
        )
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Year => f.write_str("year"),
            Reason::Short => f.write_str("short word"),
            Reason::CommonWord => f.write_str("common word"),
            Reason::EmbeddedDigit => f.write_str("embedded digit"),
            Reason::CommonLongWord => f.write_str("common long word"),
            Reason::UnknownLongWord => f.write_str("long word not in dictionary"),
            Reason::Affix(affix) => write!(f, "affix \"{affix}\""),
            Reason::Syllables(n) => write!(f, "{n} syllables"),
            Reason::LetterRun => f.write_str("hard letter run"),
            Reason::Plain => f.write_str("plain"),
        }
    }
}

/// Classification result for one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// The normalized form that was classified.
    pub word: String,
    pub complex: bool,
    pub reason: Reason,
}

/// Decides whether words are too complex for a general audience.
#[derive(Debug)]
pub struct ComplexityClassifier<S> {
    dictionary: Arc<DictionaryCache<S>>,
    lang: String,
    options: ClassifierOptions,
}

impl<S> Clone for ComplexityClassifier<S> {
    fn clone(&self) -> Self {
        Self {
            dictionary: Arc::clone(&self.dictionary),
            lang: self.lang.clone(),
            options: self.options,
        }
    }
}

impl<S: DictionarySource> ComplexityClassifier<S> {
    pub fn new(dictionary: Arc<DictionaryCache<S>>, lang: impl Into<String>) -> Self {
        Self {
            dictionary,
            lang: lang.into(),
            options: ClassifierOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ClassifierOptions) -> Self {
        self.options = options;
        self
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn options(&self) -> ClassifierOptions {
        self.options
    }

    /// Check whether a raw token is complex.
    pub async fn is_complex(&self, word: &str) -> bool {
        self.classify(word).await.complex
    }

    /// Classify a raw token and report the deciding rule.
    pub async fn classify(&self, word: &str) -> Verdict {
        let word = normalize_word(word);
        let reason = self.decide(&word).await;
        Verdict {
            word,
            complex: reason.is_complex(),
            reason,
        }
    }

    async fn decide(&self, word: &str) -> Reason {
        let len = word.chars().count();

        if len == 4 && word.bytes().all(|b| b.is_ascii_digit()) {
            return Reason::Year;
        }
        if len <= 3 {
            return Reason::Short;
        }
        if is_common_word(word) {
            return Reason::CommonWord;
        }
        if word.chars().any(|c| c.is_numeric()) {
            return Reason::EmbeddedDigit;
        }

        if len >= self.options.long_word_threshold {
            if is_common_long_word(word) {
                return Reason::CommonLongWord;
            }
            if !self.dictionary.contains(&self.lang, word).await {
                return Reason::UnknownLongWord;
            }
        }

        if let Some(affix) = complex_affix(word, len) {
            return Reason::Affix(affix);
        }

        let syllables = count_syllables(word);
        if syllables >= self.options.syllable_threshold && !is_common_polysyllabic(word) {
            return Reason::Syllables(syllables);
        }

        if has_hard_letter_run(word) {
            return Reason::LetterRun;
        }
        Reason::Plain
    }
}

/// Strip surrounding punctuation and elided prefixes, then lowercase.
pub fn normalize_word(word: &str) -> String {
    let lower = word
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
        .replace('’', "'");

    let stripped = ELISIONS
        .iter()
        .find_map(|prefix| lower.strip_prefix(prefix))
        .filter(|rest| rest.chars().any(char::is_alphanumeric))
        .unwrap_or(lower.as_str());

    stripped
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

/// Find the technical suffix or prefix that makes `word` complex.
fn complex_affix(word: &str, len: usize) -> Option<&'static str> {
    if is_affix_exception(word) {
        return None;
    }

    let suffix = COMPLEX_SUFFIXES
        .iter()
        .copied()
        .find(|suffix| word.len() > suffix.len() && word.ends_with(suffix));
    match suffix {
        Some("ment") if len <= SHORT_MENT_MAX_LEN => {}
        Some(suffix) => return Some(suffix),
        None => {}
    }

    COMPLEX_PREFIXES.iter().copied().find(|prefix| {
        word.strip_prefix(prefix)
            .is_some_and(|rest| rest.chars().count() >= PREFIX_MIN_REMAINDER)
    })
}

/// Detect letter runs that are hard to read.
///
/// Three identical letters in a row, five or more consonants, three or four
/// consonants without a softening letter, four or more vowels, or an
/// unusual three-vowel run.
fn has_hard_letter_run(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();

    if letters.windows(3).any(|w| w[0] == w[1] && w[1] == w[2]) {
        return true;
    }

    letters
        .chunk_by(|a, b| is_vowel(*a) == is_vowel(*b))
        .any(|run| {
            if is_vowel(run[0]) {
                match run.len() {
                    0..=2 => false,
                    3 => {
                        let triple: String = run.iter().collect();
                        !ORDINARY_VOWEL_TRIPLES.contains(&triple.as_str())
                    }
                    _ => true,
                }
            } else {
                match run.len() {
                    0..=2 => false,
                    3 | 4 => !run.iter().any(|c| SOFT_CLUSTER_LETTERS.contains(c)),
                    _ => true,
                }
            }
        })
}
