//! Process-local string interning pool.
//!
//! The original C++ engine holds a `std::unordered_set<std::string>` and
//! hands out `std::string_view`s into it, so every posting/forward-index
//! key is a cheap, non-owning reference to a single canonical allocation.
//! `Arc<str>` is the idiomatic Rust analogue: cheap to clone, cheap to
//! compare (pointer-equal fast path falls back to content equality), and
//! safe to share across the `rayon` worker pool used by the parallel read
//! path without borrowing from `&self`.

use std::collections::HashMap;
use std::sync::Arc;

/// Interns owned words, handing out stable, cheaply-cloneable handles.
#[derive(Debug, Default)]
pub struct WordStore {
    pool: HashMap<Arc<str>, ()>,
}

impl WordStore {
    pub fn new() -> Self {
        Self { pool: HashMap::new() }
    }

    /// Intern `word`, returning the canonical handle for it.
    pub fn intern(&mut self, word: &str) -> Arc<str> {
        if let Some((key, _)) = self.pool.get_key_value(word) {
            return key.clone();
        }
        let handle: Arc<str> = Arc::from(word);
        self.pool.insert(handle.clone(), ());
        handle
    }

    /// Drop `word` from the pool. Invariant 4 (§3) requires callers to do
    /// this only once no posting list references the word anymore.
    pub fn release(&mut self, word: &str) {
        self.pool.remove(word);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pool.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_word_twice_returns_equal_handles() {
        let mut store = WordStore::new();
        let a = store.intern("cat");
        let b = store.intern("cat");
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn release_drops_the_word() {
        let mut store = WordStore::new();
        store.intern("cat");
        store.release("cat");
        assert_eq!(store.len(), 0);
    }
}
