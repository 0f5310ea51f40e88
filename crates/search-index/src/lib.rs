//! In-memory TF-IDF full-text index.
//!
//! Documents are tokenized on whitespace, filtered against a stop-word
//! list, and indexed into a dual inverted/forward posting representation
//! (`word -> {doc -> tf}` and `doc -> {word -> tf}`) so that both
//! word-first and document-first lookups stay proportional to the number
//! of postings touched rather than to corpus or vocabulary size.
//!
//! Queries are a flat list of space-separated words, optionally prefixed
//! with `-` to exclude any document containing that word. Relevance is
//! TF-IDF: the inverse document frequency of a query word (`ln(N / df)`)
//! times its term frequency in each candidate document, summed across the
//! query's plus words.
//!
//! # Example
//!
//! ```rust
//! use search_index::{Index, Status};
//!
//! let mut index = Index::new(["and", "in", "at"]).unwrap();
//! index.add_document(1, "curly cat curly tail", Status::Actual, &[7, 2, 7]).unwrap();
//! index.add_document(2, "curly dog and fancy collar", Status::Actual, &[1, 2, 3]).unwrap();
//!
//! let hits = index.find_top_default("curly cat").unwrap();
//! assert_eq!(hits[0].id, 1);
//! ```
//!
//! Sequential and parallel (`_par`-suffixed) variants of the read
//! operations are both provided; see [`Index`] for the full surface.

pub mod concurrent_map;
pub mod consts;
pub mod document;
pub mod error;
pub mod index;
pub mod intern;
pub mod query;
pub mod tokenizer;

pub use consts::{DEFAULT_BUCKET_COUNT, MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
pub use document::{Hit, Status};
pub use error::IndexError;
pub use index::Index;
pub use query::{parse_query, parse_query_unsorted, Query};
