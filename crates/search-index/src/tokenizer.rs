//! Whitespace tokenizer.
//!
//! Splits text on runs of ASCII space, discarding leading, trailing, and
//! consecutive separators. No allocation: tokens are borrowed slices of the
//! input. Validity (no control bytes) is left to callers — this module never
//! fails.

/// Split `text` into whitespace-delimited tokens.
///
/// Mirrors the original `SplitIntoWords`: splits only on `b' '` (0x20), not
/// on tabs or newlines, since the source data model assumes single-line
/// space-separated documents and queries.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ').filter(|tok| !tok.is_empty())
}

/// A token is valid iff it contains no byte with codepoint < 0x20.
pub fn is_valid_word(word: &str) -> bool {
    !word.bytes().any(|b| b < 0x20)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_single_spaces() {
        let words: Vec<_> = tokenize("curly cat curly tail").collect();
        assert_eq!(words, vec!["curly", "cat", "curly", "tail"]);
    }

    #[test]
    fn collapses_runs_of_spaces_and_trims() {
        let words: Vec<_> = tokenize("  big   dog  ").collect();
        assert_eq!(words, vec!["big", "dog"]);
    }

    #[test]
    fn empty_text_yields_no_tokens() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize("   ").count(), 0);
    }

    #[test]
    fn valid_word_rejects_control_bytes() {
        assert!(is_valid_word("cat"));
        assert!(!is_valid_word("ca\tt"));
        assert!(!is_valid_word("ca\nt"));
    }
}
