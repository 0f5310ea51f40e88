//! Tunable constants from the specification.

/// Maximum number of hits returned by `find_top`/`find_top_par`.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Tolerance used when comparing two relevance scores for the rating
/// tie-break in the top-k comparator.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// Default bucket count for `ConcurrentMap`.
pub const DEFAULT_BUCKET_COUNT: usize = 10;
