//! Implementations of algorithms that primarily operate on text.

use std::collections::{BTreeMap, BTreeSet};

/// Finds all anagrams of words contained within an input set of words.
///
/// Words sharing a signature (their characters sorted alphabetically) form a
/// group; only groups with at least two members are returned. Output is
/// deterministic: groups are ordered by signature and members by word order.
pub fn anagrams(word_set: &BTreeSet<String>) -> Vec<Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for word in word_set {
        let mut chars: Vec<char> = word.chars().collect();
        chars.sort_unstable();
        let signature: String = chars.into_iter().collect();
        groups.entry(signature).or_default().push(word.clone());
    }

    groups
        .into_values()
        .filter(|group| group.len() > 1)
        .collect()
}

/// Splits free text into the word set [`anagrams`] consumes.
pub fn word_set(input: &str) -> BTreeSet<String> {
    input.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_anagram_groups() {
        let words = word_set("below on the elbow is the bowel");
        assert_eq!(
            anagrams(&words),
            vec![vec![
                "below".to_string(),
                "bowel".to_string(),
                "elbow".to_string()
            ]]
        );
    }

    #[test]
    fn singleton_groups_are_dropped() {
        let words = word_set("eat tea tan ate nat bat");
        assert_eq!(
            anagrams(&words),
            vec![
                vec!["ate".to_string(), "eat".to_string(), "tea".to_string()],
                vec!["nat".to_string(), "tan".to_string()],
            ]
        );
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(anagrams(&word_set("")).is_empty());
        assert!(anagrams(&word_set("no anagrams here")).is_empty());
    }

    #[test]
    fn duplicate_words_collapse() {
        let words = word_set("the the the");
        assert_eq!(words.len(), 1);
        assert!(anagrams(&words).is_empty());
    }
}
