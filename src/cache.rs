//! Per-session memo keyed by normalized query.
//!
//! Backed by [`moka`] with a bounded entry count; eviction follows moka's
//! admission policy, so which entry leaves a full cache is not fixed.

use moka::sync::Cache;

use crate::query::SearchQuery;

pub const DEFAULT_CAPACITY: usize = 8;

#[derive(Clone)]
pub struct QueryCache<T> {
    inner: Cache<String, T>,
}

impl<T: Clone + Send + Sync + 'static> QueryCache<T> {
    /// Capacity below 1 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1) as u64;
        Self {
            inner: Cache::builder().max_capacity(capacity).build(),
        }
    }

    pub fn get(&self, query: &SearchQuery) -> Option<T> {
        self.inner.get(&query.normalized())
    }

    /// Insert or replace the entry for `query`.
    pub fn insert(&self, query: &SearchQuery, value: T) {
        self.inner.insert(query.normalized(), value);
    }

    /// Entry count after pending evictions have been applied.
    pub fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
