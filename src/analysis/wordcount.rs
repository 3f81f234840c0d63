//! Word counting and length rating.

use std::fmt;

use serde::Serialize;

/// Qualitative length band, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Excellent,
    Good,
    Average,
    Insufficient,
}

impl Tier {
    /// Bands as `(minimum word count, tier)`, checked top-down.
    const BANDS: [(usize, Tier); 4] = [
        (1000, Tier::Excellent),
        (700, Tier::Good),
        (400, Tier::Average),
        (0, Tier::Insufficient),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tier::Excellent => "excellent",
            Tier::Good => "good",
            Tier::Average => "average",
            Tier::Insufficient => "insufficient",
        }
    }

    /// Lowest word count that reaches this tier.
    pub fn minimum(self) -> usize {
        Self::BANDS
            .iter()
            .find(|(_, tier)| *tier == self)
            .map_or(0, |(min, _)| *min)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A word count rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rating {
    pub label: &'static str,
    pub tier: Tier,
}

/// Count whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Rate a word count.
pub fn rate(count: usize) -> Rating {
    let tier = Tier::BANDS
        .iter()
        .find(|(min, _)| count >= *min)
        .map_or(Tier::Insufficient, |(_, tier)| *tier);
    Rating {
        label: tier.label(),
        tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("  one   two\tthree  "), 3);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words(" \n\t "), 0);
        assert_eq!(count_words("l'été\u{a0}arrive"), 2);
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(rate(1000).label, "excellent");
        assert_eq!(rate(999).label, "good");
        assert_eq!(rate(700).tier, Tier::Good);
        assert_eq!(rate(699).tier, Tier::Average);
        assert_eq!(rate(400).label, "average");
        assert_eq!(rate(399).label, "insufficient");
        assert_eq!(rate(0).label, "insufficient");
    }

    #[test]
    fn test_tier_minimum() {
        assert_eq!(Tier::Good.minimum(), 700);
        assert_eq!(Tier::Insufficient.minimum(), 0);
        assert!(Tier::Excellent < Tier::Insufficient);
    }

    #[test]
    fn test_rating_serializes() {
        let json = serde_json::to_string(&rate(450)).unwrap();
        assert_eq!(json, r#"{"label":"average","tier":"average"}"#);
    }
}
