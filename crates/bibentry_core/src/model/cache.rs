//! Derived-value cache for one entry.
//!
//! # Responsibility
//! - Memoize markup-normalized field text and field word sets.
//!
//! # Invariants
//! - Entries are purged for a field before that field's change is published.
//! - Population is idempotent: concurrent readers may compute the same value
//!   twice, and the last write wins with an identical value.

use crate::model::field::Field;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct DerivedValueCache {
    latex_free: RwLock<HashMap<Field, String>>,
    words: RwLock<HashMap<Field, Arc<HashSet<String>>>>,
}

impl DerivedValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached markup-normalized text, computing it on a miss.
    pub fn latex_free_or_insert_with<F>(&self, field: &Field, compute: F) -> String
    where
        F: FnOnce() -> String,
    {
        if let Some(value) = self.latex_free.read().get(field) {
            return value.clone();
        }
        let value = compute();
        self.latex_free.write().insert(field.clone(), value.clone());
        value
    }

    /// Returns the cached word set, computing it on a miss.
    pub fn words_or_insert_with<F>(&self, field: &Field, compute: F) -> Arc<HashSet<String>>
    where
        F: FnOnce() -> HashSet<String>,
    {
        if let Some(words) = self.words.read().get(field) {
            return Arc::clone(words);
        }
        let words = Arc::new(compute());
        self.words.write().insert(field.clone(), Arc::clone(&words));
        words
    }

    /// Drops both cached values for `field`.
    pub fn invalidate(&self, field: &Field) {
        self.latex_free.write().remove(field);
        self.words.write().remove(field);
    }

    pub fn contains_latex_free(&self, field: &Field) -> bool {
        self.latex_free.read().contains_key(field)
    }

    pub fn contains_words(&self, field: &Field) -> bool {
        self.words.read().contains_key(field)
    }
}
