use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

use anchor_core::DidUrl;

use crate::did_resolver::{DidResolver, ResolvedTarget};
use crate::error::IdentityError;

struct CacheEntry {
    target: ResolvedTarget,
    inserted_at: Instant,
}

/// Wraps a resolver and remembers successful resolutions for a fixed TTL.
///
/// Failures are never cached. A cached answer can be stale by up to the TTL
/// with respect to ledger updates.
pub struct CachingResolver<R> {
    inner: R,
    ttl: Duration,
    entries: DashMap<String, CacheEntry>,
}

impl<R: DidResolver> CachingResolver<R> {
    pub fn new(inner: R, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Drop every cached entry for a DID URL.
    pub fn invalidate(&self, did_url: &DidUrl) {
        self.entries.remove(&did_url.to_string());
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries currently held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, key: &str) -> Option<ResolvedTarget> {
        let entry = self.entries.get(key)?;
        if entry.inserted_at.elapsed() < self.ttl {
            return Some(entry.target.clone());
        }
        drop(entry);
        self.entries.remove(key);
        None
    }

    /// Store a fresh answer and drop every expired entry.
    fn store(&self, key: String, target: ResolvedTarget) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        self.entries.insert(
            key,
            CacheEntry {
                target,
                inserted_at: Instant::now(),
            },
        );
    }
}

#[async_trait]
impl<R: DidResolver> DidResolver for CachingResolver<R> {
    async fn resolve(&self, did_url: &DidUrl) -> Result<ResolvedTarget, IdentityError> {
        let key = did_url.to_string();
        if let Some(target) = self.lookup(&key) {
            tracing::trace!(did_url = %key, "resolution cache hit");
            return Ok(target);
        }

        let target = self.inner.resolve(did_url).await?;
        self.store(key, target.clone());
        Ok(target)
    }
}
