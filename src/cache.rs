//! Single-pass caching iteration over a lazy record fetch
//!
//! Remote record fetches are one-shot and expensive, so every item a driver
//! pulls is recorded in a [`RecordCache`] before it is handed on. Consumers
//! can pause and resume without losing progress, and any holder of the same
//! cache handle can read what has been fetched so far, and whether the fetch
//! finished, without driving the fetch themselves.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

struct CacheInner<T> {
    items: Vec<T>,
    complete: bool,
}

/// Shared, append-only record buffer with a completion flag
///
/// The buffer starts empty, fills in source order while a [`CachingIter`]
/// drives the fetch, and becomes complete when the source is exhausted.
/// Complete is terminal: once set, no further appends occur and the items
/// are immutable. Cloning the handle is cheap and shares the same buffer.
pub struct RecordCache<T> {
    inner: Arc<Mutex<CacheInner<T>>>,
}

impl<T> Clone for RecordCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for RecordCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecordCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                items: Vec::new(),
                complete: false,
            })),
        }
    }

    /// Number of records cached so far
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Whether the source has been driven to exhaustion
    pub fn is_complete(&self) -> bool {
        self.lock().complete
    }

    fn push(&self, item: T) {
        let mut inner = self.lock();
        inner.items.push(item);
        trace!("Cached record #{}", inner.items.len());
    }

    fn set_complete(&self) {
        let mut inner = self.lock();
        if !inner.complete {
            inner.complete = true;
            debug!("Source exhausted, {} records cached", inner.items.len());
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner<T>> {
        // A poisoned buffer still holds a valid prefix
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> RecordCache<T> {
    /// Start (or resume) driving `source` through this cache
    ///
    /// Every `Ok` item the returned iterator yields has been appended to the
    /// cache first. Exhausting the iterator marks the cache complete; an
    /// `Err` from the source is yielded at the point of failure and leaves
    /// the cache incomplete but valid.
    ///
    /// Pass the source with [`Iterator::by_ref`] to keep ownership of it, so
    /// a pass abandoned mid-way can be resumed later with a second `begin`
    /// on the same cache. Cached records are never replayed by the driver;
    /// readers get the full prefix from [`snapshot`](Self::snapshot).
    pub fn begin<S, E>(&self, source: S) -> CachingIter<S, T>
    where
        S: Iterator<Item = Result<T, E>>,
    {
        CachingIter {
            source,
            cache: self.clone(),
        }
    }

    /// Point-in-time view of the cache
    ///
    /// Returns the records fetched so far together with the completion flag,
    /// read under a single lock so the pair is always consistent. Never
    /// drives the source, never fails. Repeated calls with no intervening
    /// drive activity return equal results.
    pub fn snapshot(&self) -> Snapshot<T> {
        let inner = self.lock();
        Snapshot {
            items: inner.items.clone(),
            complete: inner.complete,
        }
    }
}

/// A consistent view of a [`RecordCache`] at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    /// Records fetched so far, in source order
    pub items: Vec<T>,
    /// True once the source has been driven to exhaustion
    pub complete: bool,
}

/// Lazy driver over a one-shot source that records every produced item
///
/// Created by [`RecordCache::begin`]. Pulling is driven entirely by consumer
/// demand; nothing is fetched ahead of a `next` call. Dropping the iterator
/// mid-pass is the way to pause: the cache keeps the prefix and stays
/// incomplete.
pub struct CachingIter<S, T> {
    source: S,
    cache: RecordCache<T>,
}

impl<S, T> CachingIter<S, T> {
    /// Handle to the cache this iterator appends into
    pub fn cache(&self) -> RecordCache<T> {
        self.cache.clone()
    }
}

impl<S, T, E> Iterator for CachingIter<S, T>
where
    S: Iterator<Item = Result<T, E>>,
    T: Clone,
{
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        // Complete is terminal: never re-drive an exhausted fetch
        if self.cache.is_complete() {
            return None;
        }

        match self.source.next() {
            Some(Ok(item)) => {
                self.cache.push(item.clone());
                Some(Ok(item))
            }
            Some(Err(e)) => Some(Err(e)),
            None => {
                self.cache.set_complete();
                None
            }
        }
    }
}
