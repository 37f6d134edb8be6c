//! # Certificate Expiry Cache
//!
//! Holds the latest complete aggregation of certificate metadata across all
//! configured backends. The cache is generation-based: each refresh run
//! builds one immutable [`Snapshot`] and publishes it wholesale through
//! [`CacheStore::replace`], so readers always observe a single consistent
//! refresh generation and never a partial merge.

pub mod store;

pub use store::{CacheItem, CacheKey, CacheStore, Snapshot};
