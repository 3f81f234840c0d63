//! TOML configuration.
//!
//! ```toml
//! lang = "fr"
//! dictionary = "/usr/share/plume/dictionaries"
//! fetch_timeout_ms = 5000
//! long_word_threshold = 10
//! syllable_threshold = 4
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::{ClassifierOptions, DEFAULT_FETCH_TIMEOUT};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language of the analyzed content.
    pub lang: String,
    /// Word list file, or a directory holding `<lang>.json` lists.
    pub dictionary: Option<PathBuf>,
    /// Dictionary fetch timeout; `0` waits forever.
    pub fetch_timeout_ms: u64,
    pub long_word_threshold: usize,
    pub syllable_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        let options = ClassifierOptions::default();
        Self {
            lang: "fr".to_string(),
            dictionary: None,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT.as_millis() as u64,
            long_word_threshold: options.long_word_threshold,
            syllable_threshold: options.syllable_threshold,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file. A missing file yields the defaults.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_ms > 0).then(|| Duration::from_millis(self.fetch_timeout_ms))
    }

    pub fn classifier_options(&self) -> ClassifierOptions {
        ClassifierOptions {
            long_word_threshold: self.long_word_threshold,
            syllable_threshold: self.syllable_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn test_defaults_for_missing_keys() {
        let config = Config::from_toml("lang = \"en\"").unwrap();
        assert_eq!(config.lang, "en");
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.classifier_options(), ClassifierOptions::default());
        assert_eq!(config.dictionary, None);
    }

    #[test]
    fn test_zero_timeout_waits_forever() {
        let config = Config::from_toml("fetch_timeout_ms = 0\nsyllable_threshold = 5").unwrap();
        assert_eq!(config.fetch_timeout(), None);
        assert_eq!(config.classifier_options().syllable_threshold, 5);
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::from_toml("long_word_threshold = \"dix\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Config::load_from_path(dir.path().join("absent.toml")).unwrap();
        assert_eq!(missing, Config::default());

        let path = dir.path().join("plume.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "dictionary = \"dicts\"").unwrap();
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.dictionary, Some(PathBuf::from("dicts")));
        assert_eq!(config.lang, "fr");
    }
}
