//! Keyed cache of remote documents with explicit invalidation.
//!
//! # Design
//! Each `CacheKey` owns one `Snapshot` (`data`, `error`, `is_loading`) and a
//! list of listeners. Nothing expires on its own: the only way to refresh an
//! entry is `invalidate`, which runs the supplied fetch and notifies every
//! listener twice (once when loading starts, once with the result). A failed
//! fetch keeps the previous data alongside the new error.

use std::collections::HashMap;
use std::fmt;

use crate::client::COLLECTION;
use crate::error::ApiError;

/// Resource path identifying a cached document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(&'static str);

impl CacheKey {
    /// The student collection root.
    pub const STUDENTS: CacheKey = CacheKey(COLLECTION);

    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    pub fn path(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// What a subscriber sees for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub is_loading: bool,
}

impl<T> Snapshot<T> {
    /// State of a key that has never completed a fetch.
    pub fn pending() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&Snapshot<T>)>;

struct Entry<T> {
    snapshot: Snapshot<T>,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
}

impl<T> Entry<T> {
    fn new() -> Self {
        Self {
            snapshot: Snapshot::pending(),
            listeners: Vec::new(),
        }
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.snapshot);
        }
    }
}

pub struct RemoteCache<T> {
    entries: HashMap<CacheKey, Entry<T>>,
    next_subscription: u64,
}

impl<T> Default for RemoteCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_subscription: 0,
        }
    }
}

impl<T> fmt::Debug for RemoteCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCache")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<T> RemoteCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `key` and return the current snapshot.
    pub fn subscribe(
        &mut self,
        key: CacheKey,
        listener: impl FnMut(&Snapshot<T>) + 'static,
    ) -> (SubscriptionId, &Snapshot<T>) {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        let entry = self.entries.entry(key).or_insert_with(Entry::new);
        entry.listeners.push((id, Box::new(listener)));
        (id, &entry.snapshot)
    }

    /// Returns `false` if `id` was not subscribed to `key`.
    pub fn unsubscribe(&mut self, key: CacheKey, id: SubscriptionId) -> bool {
        let Some(entry) = self.entries.get_mut(&key) else {
            return false;
        };
        let before = entry.listeners.len();
        entry.listeners.retain(|(sub, _)| *sub != id);
        entry.listeners.len() != before
    }

    pub fn subscriber_count(&self, key: CacheKey) -> usize {
        self.entries.get(&key).map_or(0, |e| e.listeners.len())
    }

    /// `None` until `key` has been subscribed or invalidated.
    pub fn get(&self, key: CacheKey) -> Option<&Snapshot<T>> {
        self.entries.get(&key).map(|e| &e.snapshot)
    }

    /// Force a re-fetch of `key` and publish the outcome.
    pub fn invalidate<F>(&mut self, key: CacheKey, fetch: F) -> &Snapshot<T>
    where
        F: FnOnce(CacheKey) -> Result<T, ApiError>,
    {
        let entry = self.entries.entry(key).or_insert_with(Entry::new);
        entry.snapshot.is_loading = true;
        entry.notify();

        match fetch(key) {
            Ok(data) => {
                tracing::debug!(%key, "cache entry refreshed");
                entry.snapshot.data = Some(data);
                entry.snapshot.error = None;
            }
            Err(error) => {
                tracing::warn!(%key, %error, "cache refresh failed");
                entry.snapshot.error = Some(error);
            }
        }
        entry.snapshot.is_loading = false;
        entry.notify();
        &entry.snapshot
    }
}
