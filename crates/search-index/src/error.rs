//! Error types for search-index.

use thiserror::Error;

/// Errors that can occur while building or querying an [`Index`](crate::Index).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A document id, stop word, or document token violated a precondition.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A query token was empty, a double minus, or contained a control byte.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// `match_document` or `get_word_frequencies` referenced an id not present.
    #[error("unknown document id {0}")]
    UnknownDocument(i64),
}
