//! Document status, the per-document record, and the `Hit` result type.

use std::fmt;

/// Lifecycle status of an indexed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Indexed and eligible for the default query filter.
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

/// Internal bookkeeping for one indexed document: everything `Index`
/// tracks besides its terms (which live in `doc_terms`).
#[derive(Debug, Clone, Copy)]
pub(crate) struct DocumentRecord {
    pub rating: i64,
    pub status: Status,
}

/// One scored search result.
///
/// Printed form matches the original engine's `operator<<`:
/// `{ document_id = <id>, relevance = <relevance>, rating = <rating> }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: i64,
    pub relevance: f64,
    pub rating: i64,
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}

/// `tf` is a count divided by document length, so `rating_sum / count` — this
/// truncates toward zero exactly as the original's signed `int` division
/// does, because Rust's `/` on signed integers truncates toward zero too.
pub(crate) fn compute_average_rating(ratings: &[i64]) -> i64 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().sum();
    sum / ratings.len() as i64
}
