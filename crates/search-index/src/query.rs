//! Query parsing: plus/minus term sets with stop-word filtering.

use std::collections::HashSet;

use crate::error::IndexError;
use crate::tokenizer::{is_valid_word, tokenize};

/// A parsed query: disjoint, deduplicated plus and minus term sets.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub plus_words: Vec<String>,
    pub minus_words: Vec<String>,
}

/// Parse `text` into a [`Query`], dropping stop words and deduplicating.
///
/// Mirrors the original `ParseQuery`/`ParseQueryWord`: every token is
/// validated (non-empty after stripping one leading `-`, no double minus,
/// no control bytes) *before* any word is classified, so an invalid query
/// never partially populates `plus_words`/`minus_words`.
pub fn parse_query(text: &str, stop_words: &HashSet<String>) -> Result<Query, IndexError> {
    let mut plus_words = Vec::new();
    let mut minus_words = Vec::new();

    for raw_token in tokenize(text) {
        let (word, is_minus) = classify_token(raw_token)?;
        if stop_words.contains(word) {
            continue;
        }
        if is_minus {
            minus_words.push(word.to_string());
        } else {
            plus_words.push(word.to_string());
        }
    }

    dedup(&mut plus_words);
    dedup(&mut minus_words);

    Ok(Query { plus_words, minus_words })
}

/// Parse `text` into a [`Query`] for the parallel read path.
///
/// Differs from [`parse_query`] only in that the plus/minus vectors are
/// left with duplicates; callers sort-then-dedup after a final parallel
/// materialization step (§4.2, §4.5 of the spec).
pub fn parse_query_unsorted(
    text: &str,
    stop_words: &HashSet<String>,
) -> Result<Query, IndexError> {
    let mut plus_words = Vec::new();
    let mut minus_words = Vec::new();

    for raw_token in tokenize(text) {
        let (word, is_minus) = classify_token(raw_token)?;
        if stop_words.contains(word) {
            continue;
        }
        if is_minus {
            minus_words.push(word.to_string());
        } else {
            plus_words.push(word.to_string());
        }
    }

    Ok(Query { plus_words, minus_words })
}

/// Classify one raw query token, returning `(word_without_minus, is_minus)`.
fn classify_token(token: &str) -> Result<(&str, bool), IndexError> {
    let (word, is_minus) = match token.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (token, false),
    };

    if word.is_empty() {
        return Err(IndexError::InvalidQuery(format!(
            "empty query word in token {token:?}"
        )));
    }
    if word.starts_with('-') {
        return Err(IndexError::InvalidQuery(format!(
            "double minus in token {token:?}"
        )));
    }
    if !is_valid_word(word) {
        return Err(IndexError::InvalidQuery(format!(
            "control byte in query word {word:?}"
        )));
    }

    Ok((word, is_minus))
}

fn dedup(words: &mut Vec<String>) {
    words.sort_unstable();
    words.dedup();
}
