//! Input helpers for the command-line front end.

use std::collections::BTreeSet;
use std::io::BufRead;

/// Reads whitespace-separated words from a reader into a word set.
///
/// Generic over [`BufRead`] so the CLI can pass a locked stdin handle and
/// tests can pass an in-memory cursor.
pub fn read_words<R: BufRead>(reader: R) -> std::io::Result<BTreeSet<String>> {
    let mut words = BTreeSet::new();
    for line in reader.lines() {
        let line = line?;
        words.extend(line.split_whitespace().map(str::to_string));
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_words_across_lines() {
        let input = Cursor::new("the elbow on\nthe arc is below the car\n");
        let words = read_words(input).unwrap();
        assert!(words.contains("elbow"));
        assert!(words.contains("car"));
        // duplicates collapse into the set
        assert_eq!(words.iter().filter(|w| w.as_str() == "the").count(), 1);
    }

    #[test]
    fn empty_input_yields_empty_set() {
        let words = read_words(Cursor::new("")).unwrap();
        assert!(words.is_empty());
    }
}
