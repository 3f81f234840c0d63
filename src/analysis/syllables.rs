//! Approximate French syllable counting.
//!
//! Counts vowel groups, collapses diphthongs and triphthongs, splits groups
//! at hiatus markers (`é` followed by a vowel, diaeresis letters) and drops
//! a silent trailing `e`/`es`. The result is an estimate for written French,
//! good enough to rank words, not to hyphenate them.

use super::lexicon::ONE_SYLLABLE_CLUSTERS;

/// Check if a letter is a vowel (accented forms and `y` included).
pub fn is_vowel(c: char) -> bool {
    matches!(
        c,
        'a' | 'e'
            | 'i'
            | 'o'
            | 'u'
            | 'y'
            | 'à'
            | 'â'
            | 'ä'
            | 'é'
            | 'è'
            | 'ê'
            | 'ë'
            | 'î'
            | 'ï'
            | 'ô'
            | 'ö'
            | 'ù'
            | 'û'
            | 'ü'
            | 'ÿ'
            | 'æ'
            | 'œ'
    )
}

/// Letters that force a new syllable inside a vowel group.
fn is_hiatus_mark(c: char) -> bool {
    matches!(c, 'é' | 'ë' | 'ï' | 'ü')
}

/// Estimate the number of syllables of a lowercase word.
///
/// Non-letters are ignored; any word with at least one letter counts as
/// one syllable or more.
pub fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphabetic())
        .collect();
    if letters.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut i = 0;
    while i < letters.len() {
        if is_vowel(letters[i]) {
            let start = i;
            while i < letters.len() && is_vowel(letters[i]) {
                i += 1;
            }
            count += group_syllables(&letters[start..i]);
        } else {
            i += 1;
        }
    }

    if count > 1 && has_silent_ending(&letters) {
        count -= 1;
    }
    count.max(1)
}

fn group_syllables(group: &[char]) -> usize {
    if group.len() == 1 {
        return 1;
    }
    let cluster: String = group.iter().collect();
    if ONE_SYLLABLE_CLUSTERS.contains(&cluster.as_str()) {
        return 1;
    }
    let breaks = group
        .windows(2)
        .filter(|pair| pair[0] == 'é' || is_hiatus_mark(pair[1]))
        .count();
    let base = if group.len() >= 4 { group.len() / 2 } else { 1 };
    base + breaks
}

/// A final `e` or `es` after a consonant (or after `é`) is mute.
fn has_silent_ending(letters: &[char]) -> bool {
    let n = letters.len();
    let consonant_at = |idx: usize| !is_vowel(letters[idx]);
    match letters {
        [.., 'é', 'e'] | [.., 'é', 'e', 's'] => true,
        [.., 'e'] if n >= 2 => consonant_at(n - 2),
        [.., 'e', 's'] if n >= 3 => consonant_at(n - 3),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_words() {
        assert_eq!(count_syllables("chat"), 1);
        assert_eq!(count_syllables("maison"), 2);
        assert_eq!(count_syllables("table"), 1);
        assert_eq!(count_syllables("tables"), 1);
    }

    #[test]
    fn test_clusters_collapse() {
        assert_eq!(count_syllables("beaucoup"), 2);
        assert_eq!(count_syllables("nation"), 2);
        assert_eq!(count_syllables("aujourd'hui"), 3);
    }

    #[test]
    fn test_hiatus_splits_groups() {
        assert_eq!(count_syllables("réalité"), 4);
        assert_eq!(count_syllables("naïf"), 2);
        assert_eq!(count_syllables("poésie"), 3);
        assert_eq!(count_syllables("année"), 2);
    }

    #[test]
    fn test_long_words() {
        assert_eq!(count_syllables("information"), 4);
        assert_eq!(count_syllables("électricité"), 5);
    }

    #[test]
    fn test_no_letters() {
        assert_eq!(count_syllables(""), 0);
        assert_eq!(count_syllables("2025"), 0);
        assert_eq!(count_syllables("brr"), 1);
    }
}
