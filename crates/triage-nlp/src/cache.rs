//! Bounded least-recently-used cache of annotated documents.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use lru::LruCache;
use serde::Serialize;

use crate::doc::Doc;

/// Hit/miss counters and occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

/// Fixed-capacity, thread-safe map from input text to its annotation.
///
/// The lock is held only for lookups and insertions, never while a document
/// is being built, so concurrent misses on the same text may annotate it
/// twice; the last insert wins and both callers get an equal `Doc`.
pub struct DocCache {
    inner: Mutex<LruCache<String, Arc<Doc>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DocCache {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up `text`, promoting it to most recently used.
    pub fn get(&self, text: &str) -> Option<Arc<Doc>> {
        let found = self
            .inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(text)
            .cloned();
        match &found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Insert, evicting the least recently used entry when full.
    pub fn insert(&self, text: String, doc: Arc<Doc>) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .put(text, doc);
    }

    /// Return the cached document for `text`, building and caching it on a miss.
    pub fn get_or_try_insert_with<E>(
        &self,
        text: &str,
        build: impl FnOnce() -> Result<Doc, E>,
    ) -> Result<Arc<Doc>, E> {
        if let Some(doc) = self.get(text) {
            return Ok(doc);
        }
        let doc = Arc::new(build()?);
        self.insert(text.to_string(), Arc::clone(&doc));
        Ok(doc)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: inner.len(),
            capacity: inner.cap().get(),
        }
    }
}

impl std::fmt::Debug for DocCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocCache").field("stats", &self.stats()).finish()
    }
}
