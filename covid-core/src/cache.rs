//! Time-bounded memoization of a loaded table.
//!
//! The cached value is an immutable `Arc<T>` that is replaced wholesale on
//! reload; callers holding an older `Arc` keep a complete table. Reloads are
//! serialized so that concurrent callers trigger at most one load.

use log::{debug, info};
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct Entry<T> {
    value: Arc<T>,
    loaded_at: Instant,
}

pub struct TableCache<T> {
    ttl: Duration,
    entry: RwLock<Option<Entry<T>>>,
    reload: Mutex<()>,
}

impl<T> TableCache<T> {
    pub fn new(ttl: Duration) -> Self {
        TableCache {
            ttl,
            entry: RwLock::new(None),
            reload: Mutex::new(()),
        }
    }

    /// The cached value if present and younger than the TTL.
    pub fn get_fresh(&self) -> Option<Arc<T>> {
        let guard = self.entry.read().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .filter(|e| e.loaded_at.elapsed() < self.ttl)
            .map(|e| Arc::clone(&e.value))
    }

    /// The last successfully loaded value, stale or not.
    pub fn peek(&self) -> Option<Arc<T>> {
        let guard = self.entry.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|e| Arc::clone(&e.value))
    }

    /// Drop the cached value so the next call reloads.
    pub fn invalidate(&self) {
        let mut guard = self.entry.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Return the cached table, running `load` first when it is missing or
    /// stale. A failed load leaves any previous value in place.
    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get_fresh() {
            debug!("cache: hit");
            return Ok(value);
        }

        let _reloading = self.reload.lock().await;
        // Another caller may have finished a reload while we waited.
        if let Some(value) = self.get_fresh() {
            debug!("cache: filled while waiting");
            return Ok(value);
        }

        info!("cache: loading (ttl {}s)", self.ttl.as_secs());
        let value = Arc::new(load().await?);
        let entry = Entry {
            value: Arc::clone(&value),
            loaded_at: Instant::now(),
        };
        let mut guard = self.entry.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(entry);
        Ok(value)
    }
}
