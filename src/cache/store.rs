//! Snapshot types and the concurrent-safe cache store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Composite key identifying one cached certificate fact.
///
/// Keys are namespaced by backend name, so two backends reporting the same
/// path never collide with each other.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey {
    pub backend: String,
    pub path: String,
}

impl CacheKey {
    pub fn new(backend: &str, path: &str) -> Self {
        Self { backend: backend.to_string(), path: path.to_string() }
    }
}

/// One certificate's expiration fact as of the last refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheItem {
    pub backend_name: String,
    pub path: String,
    pub common_name: String,
    /// Expiry instant, serialized as Unix seconds on the wire.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub not_after: DateTime<Utc>,
}

impl CacheItem {
    /// The composite key this item occupies within a snapshot.
    pub fn key(&self) -> CacheKey {
        CacheKey::new(&self.backend_name, &self.path)
    }
}

/// The complete, immutable result of one refresh run.
///
/// A snapshot is built once from the items a run aggregated and never
/// mutated afterwards; the store publishes it behind an `Arc` so concurrent
/// readers share it without copying.
#[derive(Debug, Default)]
pub struct Snapshot {
    items: HashMap<CacheKey, CacheItem>,
    built_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Build a snapshot from aggregated items.
    ///
    /// Items are inserted in iteration order; a duplicate key within the
    /// input resolves to the later-observed item.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = CacheItem>,
    {
        let items = items.into_iter().map(|item| (item.key(), item)).collect();
        Self { items, built_at: Some(Utc::now()) }
    }

    /// Look up a single item by key.
    pub fn get(&self, key: &CacheKey) -> Option<&CacheItem> {
        self.items.get(key)
    }

    /// Number of certificates in this snapshot.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True for the initial never-populated snapshot and for runs where
    /// every backend came back empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// When this snapshot was built, `None` for the startup placeholder.
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    /// The items ordered ascending by `not_after`, soonest expiry first.
    ///
    /// This ordering is the user-facing contract of the cache endpoint; ties
    /// carry no secondary-order guarantee.
    pub fn items_by_expiry(&self) -> Vec<CacheItem> {
        let mut items: Vec<CacheItem> = self.items.values().cloned().collect();
        items.sort_by(|a, b| a.not_after.cmp(&b.not_after));
        items
    }
}

/// Concurrent-safe holder of the currently published [`Snapshot`].
///
/// Mutation is a single atomic reference swap: [`CacheStore::replace`] is the
/// only write entry point, and readers that already hold a snapshot keep
/// reading the generation they obtained. `get` and `replace` are linearizable
/// with respect to each other.
#[derive(Debug)]
pub struct CacheStore {
    current: RwLock<Arc<Snapshot>>,
}

impl CacheStore {
    /// Create a store holding the empty never-populated snapshot.
    pub fn new() -> Self {
        Self { current: RwLock::new(Arc::new(Snapshot::default())) }
    }

    /// Return the currently published snapshot.
    ///
    /// The lock is held only for the duration of the `Arc` clone, so reads
    /// never wait behind snapshot construction.
    pub async fn get(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    /// Atomically publish `next` as the current snapshot.
    ///
    /// Infallible once the snapshot exists: the swap cannot observe a
    /// half-written generation.
    pub async fn replace(&self, next: Snapshot) {
        *self.current.write().await = Arc::new(next);
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}
