//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use certwatch::backends::{Accessor, BackendKind};
use certwatch::cache::CacheItem;
use certwatch::errors::{Error, Result};

/// Accessor returning a scripted item set, optionally slow or failing.
#[derive(Debug)]
pub struct ScriptedAccessor {
    name: String,
    items: Vec<CacheItem>,
    fail: bool,
    delay: Duration,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedAccessor {
    pub fn new(name: &str, items: Vec<CacheItem>) -> Self {
        Self {
            name: name.to_string(),
            items,
            fail: false,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(name: &str) -> Self {
        Self { fail: true, ..Self::new(name, Vec::new()) }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Accessor for ScriptedAccessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BackendKind {
        BackendKind::PemDirectory
    }

    async fn fetch_all(&self) -> Result<Vec<CacheItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(Error::backend("simulated outage"));
        }
        Ok(self.items.clone())
    }
}

/// Build a cache item with an explicit Unix-seconds expiry.
pub fn item(backend: &str, path: &str, common_name: &str, expiry: i64) -> CacheItem {
    CacheItem {
        backend_name: backend.to_string(),
        path: path.to_string(),
        common_name: common_name.to_string(),
        not_after: Utc.timestamp_opt(expiry, 0).unwrap(),
    }
}
