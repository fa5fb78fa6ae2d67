use super::{FilterHits, PreferenceFilter};
use moka::sync::Cache;
use std::sync::Arc;

/// Bounded memo of filter → matching record ids. Valid only while the
/// catalog file is unchanged.
#[derive(Clone)]
pub struct FilterCache {
    inner: Cache<PreferenceFilter, Arc<FilterHits>>,
}

impl FilterCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn get(&self, filter: &PreferenceFilter) -> Option<Arc<FilterHits>> {
        self.inner.get(filter)
    }

    pub fn insert(&self, filter: PreferenceFilter, hits: Arc<FilterHits>) {
        self.inner.insert(filter, hits);
    }

    /// Drop every memoized filter, e.g. after the catalog is rebuilt.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}
