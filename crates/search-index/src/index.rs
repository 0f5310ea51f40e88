//! The inverted-index search engine: write path, read path, and the
//! invariants that tie them together (§3–§5 of the spec).

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use rayon::prelude::*;

use crate::concurrent_map::ConcurrentMap;
use crate::consts::{DEFAULT_BUCKET_COUNT, MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
use crate::document::{compute_average_rating, DocumentRecord};
use crate::error::IndexError;
use crate::intern::WordStore;
use crate::query::{parse_query, parse_query_unsorted};
use crate::tokenizer::{is_valid_word, tokenize};

pub use crate::document::{Hit, Status};

/// An in-memory TF-IDF full-text index.
///
/// Maintains the dual `postings` (word -> doc -> tf) / `doc_terms`
/// (doc -> word -> tf) representation described in §3 of the spec: every
/// write keeps both in lockstep so that lookups keyed by either word or
/// document stay O(postings for that key) rather than O(vocabulary) or
/// O(corpus).
///
/// Not thread-safe across a write and a read: the parallel read methods
/// (`find_top_par`, `match_document_par`) only parallelize *within* a
/// single call. Callers that mix writes and reads across threads must
/// provide their own exclusion (a `RwLock<Index>` at a higher layer, for
/// instance).
pub struct Index {
    stop_words: HashSet<String>,
    word_store: WordStore,
    postings: HashMap<Arc<str>, HashMap<i64, f64>>,
    doc_terms: HashMap<i64, HashMap<Arc<str>, f64>>,
    documents: HashMap<i64, DocumentRecord>,
    doc_order: Vec<i64>,
}

impl Index {
    /// Build an index with the given stop words. Fails with
    /// [`IndexError::InvalidInput`] if any stop word contains a control byte.
    pub fn new<I, S>(stop_words: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = HashSet::new();
        for word in stop_words {
            let word = word.into();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(&word) {
                return Err(IndexError::InvalidInput(format!(
                    "stop word {word:?} contains a control byte"
                )));
            }
            set.insert(word);
        }
        Ok(Self {
            stop_words: set,
            word_store: WordStore::new(),
            postings: HashMap::new(),
            doc_terms: HashMap::new(),
            documents: HashMap::new(),
            doc_order: Vec::new(),
        })
    }

    /// Convenience constructor: splits `stop_words_text` on spaces.
    pub fn from_stop_words_text(stop_words_text: &str) -> Result<Self, IndexError> {
        Self::new(tokenize(stop_words_text).map(str::to_string))
    }

    /// Number of live documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Ids in insertion order minus removals.
    pub fn iter_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.doc_order.iter().copied()
    }

    /// Index `text` under `id` with the given `status` and rating history.
    ///
    /// All-or-nothing: on any `InvalidInput` failure the index is left
    /// exactly as it was before the call.
    pub fn add_document(
        &mut self,
        id: i64,
        text: &str,
        status: Status,
        ratings: &[i64],
    ) -> Result<(), IndexError> {
        if id < 0 {
            return Err(IndexError::InvalidInput(format!(
                "document id {id} must be non-negative"
            )));
        }
        if self.documents.contains_key(&id) {
            return Err(IndexError::InvalidInput(format!(
                "document id {id} already exists"
            )));
        }

        let tokens: Vec<&str> = tokenize(text).collect();
        for token in &tokens {
            if !is_valid_word(token) {
                return Err(IndexError::InvalidInput(format!(
                    "document token {token:?} contains a control byte"
                )));
            }
        }

        let filtered: Vec<&str> = tokens
            .into_iter()
            .filter(|word| !self.stop_words.contains(*word))
            .collect();
        if filtered.is_empty() {
            return Err(IndexError::InvalidInput(format!(
                "document {id} has no indexable terms after stop-word filtering"
            )));
        }

        let term_count = filtered.len() as f64;
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for word in &filtered {
            *counts.entry(word).or_insert(0) += 1;
        }

        let mut doc_word_freqs: HashMap<Arc<str>, f64> = HashMap::with_capacity(counts.len());
        for (word, count) in counts {
            let handle = self.word_store.intern(word);
            let tf = count as f64 / term_count;
            self.postings.entry(handle.clone()).or_default().insert(id, tf);
            doc_word_freqs.insert(handle, tf);
        }

        let term_count = doc_word_freqs.len();
        self.doc_terms.insert(id, doc_word_freqs);
        self.documents.insert(
            id,
            DocumentRecord { rating: compute_average_rating(ratings), status },
        );
        self.doc_order.push(id);

        tracing::debug!(document_id = id, terms = term_count, ?status, "document indexed");
        Ok(())
    }

    /// Remove `id`. A no-op, not an error, if `id` is absent.
    pub fn remove_document(&mut self, id: i64) {
        let Some(words) = self.doc_terms.remove(&id) else {
            return;
        };
        for word in words.into_keys() {
            self.release_posting(&word, id);
        }
        self.documents.remove(&id);
        self.doc_order.retain(|&existing| existing != id);
        tracing::debug!(document_id = id, "document removed");
    }

    /// Parallel variant of [`Index::remove_document`]: the per-word
    /// posting-emptiness check runs via `rayon`, the (O(1)-per-word)
    /// mutation is then applied by the caller's thread. `postings` is a
    /// single shared map, so the actual removal cannot safely run
    /// multi-threaded without per-bucket locking (§4.9's `ConcurrentMap`
    /// solves that for accumulation, not for structural map edits); this
    /// keeps the expensive read-heavy fan-out parallel while the cheap
    /// mutation stays sequential.
    pub fn remove_document_par(&mut self, id: i64) {
        let Some(words) = self.doc_terms.remove(&id) else {
            return;
        };
        let words: Vec<Arc<str>> = words.into_keys().collect();
        let becomes_empty: Vec<bool> = words
            .par_iter()
            .map(|word| {
                self.postings
                    .get(word.as_ref())
                    .map(|posting| posting.len() == 1 && posting.contains_key(&id))
                    .unwrap_or(false)
            })
            .collect();

        for (word, empty_after) in words.into_iter().zip(becomes_empty) {
            if empty_after {
                self.postings.remove(word.as_ref());
                self.word_store.release(&word);
            } else if let Some(posting) = self.postings.get_mut(word.as_ref()) {
                posting.remove(&id);
            }
        }

        self.documents.remove(&id);
        self.doc_order.retain(|&existing| existing != id);
        tracing::debug!(document_id = id, "document removed (parallel)");
    }

    fn release_posting(&mut self, word: &Arc<str>, id: i64) {
        if let Some(posting) = self.postings.get_mut(word.as_ref()) {
            posting.remove(&id);
            if posting.is_empty() {
                self.postings.remove(word.as_ref());
                self.word_store.release(word);
            }
        }
    }

    /// Word -> tf mapping for `id`. Fails with `UnknownDocument` if absent.
    pub fn get_word_frequencies(&self, id: i64) -> Result<BTreeMap<String, f64>, IndexError> {
        let words = self
            .doc_terms
            .get(&id)
            .ok_or(IndexError::UnknownDocument(id))?;
        Ok(words.iter().map(|(word, &tf)| (word.to_string(), tf)).collect())
    }

    /// Top-k documents for `raw_query` whose `(id, status, rating)` satisfy
    /// `predicate`, ranked by TF-IDF relevance with rating as tie-break.
    pub fn find_top<F>(&self, raw_query: &str, predicate: F) -> Result<Vec<Hit>, IndexError>
    where
        F: Fn(i64, Status, i64) -> bool,
    {
        let query = parse_query(raw_query, &self.stop_words)?;
        let hits = self.find_all_documents(&query, &predicate);
        Ok(top_k(hits))
    }

    /// `find_top` filtered to documents with the given `status`.
    pub fn find_top_status(&self, raw_query: &str, status: Status) -> Result<Vec<Hit>, IndexError> {
        self.find_top(raw_query, |_, doc_status, _| doc_status == status)
    }

    /// `find_top` filtered to `Status::Actual` documents (the default).
    pub fn find_top_default(&self, raw_query: &str) -> Result<Vec<Hit>, IndexError> {
        self.find_top_status(raw_query, Status::Actual)
    }

    fn find_all_documents<F>(&self, query: &crate::query::Query, predicate: &F) -> Vec<Hit>
    where
        F: Fn(i64, Status, i64) -> bool,
    {
        let mut relevance: HashMap<i64, f64> = HashMap::new();

        for word in &query.plus_words {
            let Some(posting) = self.postings.get(word.as_str()) else {
                continue;
            };
            let idf = self.inverse_document_frequency(posting.len());
            for (&doc_id, &tf) in posting {
                let record = &self.documents[&doc_id];
                if predicate(doc_id, record.status, record.rating) {
                    *relevance.entry(doc_id).or_insert(0.0) += tf * idf;
                }
            }
        }

        for word in &query.minus_words {
            if let Some(posting) = self.postings.get(word.as_str()) {
                for &doc_id in posting.keys() {
                    relevance.remove(&doc_id);
                }
            }
        }

        relevance
            .into_iter()
            .map(|(id, relevance)| Hit { id, relevance, rating: self.documents[&id].rating })
            .collect()
    }

    /// Parallel variant of [`Index::find_top`]. Accumulates relevance into a
    /// sharded [`ConcurrentMap`] instead of a plain `HashMap` so that
    /// distinct buckets can be updated from different `rayon` worker
    /// threads concurrently; only cells that hash to the same bucket ever
    /// contend on a lock. Results match the sequential path exactly (same
    /// ids, same order, relevance equal within `1e-9`), modulo the
    /// floating-point reassociation allowed by a single accumulator cell's
    /// addition order.
    pub fn find_top_par<F>(&self, raw_query: &str, predicate: F) -> Result<Vec<Hit>, IndexError>
    where
        F: Fn(i64, Status, i64) -> bool + Sync,
    {
        let query = parse_query(raw_query, &self.stop_words)?;
        let relevance = ConcurrentMap::new(DEFAULT_BUCKET_COUNT);

        query.plus_words.par_iter().for_each(|word| {
            let Some(posting) = self.postings.get(word.as_str()) else {
                return;
            };
            let idf = self.inverse_document_frequency(posting.len());
            posting.par_iter().for_each(|(&doc_id, &tf)| {
                let record = &self.documents[&doc_id];
                if predicate(doc_id, record.status, record.rating) {
                    *relevance.get_mut(doc_id) += tf * idf;
                }
            });
        });

        query.minus_words.par_iter().for_each(|word| {
            if let Some(posting) = self.postings.get(word.as_str()) {
                posting.par_iter().for_each(|(&doc_id, _)| relevance.erase(doc_id));
            }
        });

        let merged = relevance.into_ordinary_map();
        let mut hits: Vec<Hit> = merged
            .into_par_iter()
            .map(|(id, relevance)| Hit { id, relevance, rating: self.documents[&id].rating })
            .collect();
        hits.par_sort_unstable_by(relevance_then_rating);
        hits.truncate(MAX_RESULT_DOCUMENT_COUNT);
        Ok(hits)
    }

    /// `find_top_par` filtered to documents with the given `status`.
    pub fn find_top_par_status(
        &self,
        raw_query: &str,
        status: Status,
    ) -> Result<Vec<Hit>, IndexError> {
        self.find_top_par(raw_query, |_, doc_status, _| doc_status == status)
    }

    /// `find_top_par` filtered to `Status::Actual` documents (the default).
    pub fn find_top_par_default(&self, raw_query: &str) -> Result<Vec<Hit>, IndexError> {
        self.find_top_par_status(raw_query, Status::Actual)
    }

    /// Plus-words of `raw_query` occurring in `id`, sorted and deduplicated,
    /// and `id`'s current status. If any minus word occurs in `id`, returns
    /// an empty word list (the document still matched on status).
    pub fn match_document(
        &self,
        raw_query: &str,
        id: i64,
    ) -> Result<(Vec<String>, Status), IndexError> {
        let query = parse_query(raw_query, &self.stop_words)?;
        let doc_words = self
            .doc_terms
            .get(&id)
            .ok_or(IndexError::UnknownDocument(id))?;
        let status = self.documents[&id].status;

        if query.minus_words.iter().any(|word| doc_words.contains_key(word.as_str())) {
            return Ok((Vec::new(), status));
        }

        let mut matched: Vec<String> = query
            .plus_words
            .into_iter()
            .filter(|word| doc_words.contains_key(word.as_str()))
            .collect();
        matched.sort_unstable();
        matched.dedup();
        Ok((matched, status))
    }

    /// Parallel variant of [`Index::match_document`]: uses `rayon`'s
    /// `any()`/`filter()` for the minus/plus checks, then a parallel sort
    /// with a sequential dedup pass (duplicates from the unsorted parse are
    /// collapsed here rather than during parsing, per §4.2).
    pub fn match_document_par(
        &self,
        raw_query: &str,
        id: i64,
    ) -> Result<(Vec<String>, Status), IndexError> {
        let query = parse_query_unsorted(raw_query, &self.stop_words)?;
        let doc_words = self
            .doc_terms
            .get(&id)
            .ok_or(IndexError::UnknownDocument(id))?;
        let status = self.documents[&id].status;

        let any_minus = query
            .minus_words
            .par_iter()
            .any(|word| doc_words.contains_key(word.as_str()));
        if any_minus {
            return Ok((Vec::new(), status));
        }

        let mut matched: Vec<String> = query
            .plus_words
            .into_par_iter()
            .filter(|word| doc_words.contains_key(word.as_str()))
            .collect();
        matched.par_sort_unstable();
        matched.dedup();
        Ok((matched, status))
    }

    fn inverse_document_frequency(&self, document_frequency: usize) -> f64 {
        (self.documents.len() as f64 / document_frequency as f64).ln()
    }
}

/// Partial top-k sort by (relevance desc, rating desc) with epsilon
/// equality on relevance, then truncate to `MAX_RESULT_DOCUMENT_COUNT`.
fn top_k(mut hits: Vec<Hit>) -> Vec<Hit> {
    hits.sort_unstable_by(relevance_then_rating);
    hits.truncate(MAX_RESULT_DOCUMENT_COUNT);
    hits
}

/// `a` precedes `b` iff the two relevances are within `RELEVANCE_EPSILON`
/// and `a.rating > b.rating`, or they differ by at least epsilon and
/// `a.relevance > b.relevance`.
fn relevance_then_rating(a: &Hit, b: &Hit) -> Ordering {
    if (a.relevance - b.relevance).abs() < RELEVANCE_EPSILON {
        b.rating.cmp(&a.rating)
    } else {
        b.relevance.partial_cmp(&a.relevance).unwrap_or(Ordering::Equal)
    }
}
