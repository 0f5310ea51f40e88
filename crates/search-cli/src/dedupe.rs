//! Duplicate-document elimination (was `remove_duplicates.cpp`).

use std::collections::HashSet;

use search_index::Index;

/// Remove every document whose term vocabulary (the sorted, joined set of
/// words it contains — not their frequencies) duplicates an earlier
/// document's, in `iter_ids()` order. Each removed id is reported to `sink`
/// in removal order, mirroring the original's `std::cout` log line.
pub fn remove_duplicates<F>(index: &mut Index, mut sink: F)
where
    F: FnMut(i64),
{
    let mut seen_signatures = HashSet::new();
    let mut duplicate_ids = Vec::new();

    for id in index.iter_ids() {
        let freqs = index
            .get_word_frequencies(id)
            .expect("iter_ids only yields ids present in the index");
        let mut words: Vec<&str> = freqs.keys().map(String::as_str).collect();
        words.sort_unstable();
        let signature = words.join("");

        if !seen_signatures.insert(signature) {
            duplicate_ids.push(id);
        }
    }

    for id in duplicate_ids {
        index.remove_document(id);
        sink(id);
    }
}
