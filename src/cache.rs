// Congress MCP - Model Context Protocol server for the Congress.gov API
//
// Copyright (c) 2025 the congress-mcp contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Response caching with pluggable backends and per-category TTLs.
//!
//! A `CacheStore` is a plain expiring key/value store; `MemoryCache` keeps
//! entries in-process, `RedisCache` shares them across processes. The
//! `CacheManager` sits on top: it derives stable keys from call parameters,
//! applies the category TTL policy, and keeps the server healthy when the
//! backend is not. Caching is best-effort by design: a failed read is a miss
//! and a failed write is dropped, both logged, neither fatal.

use crate::config::CacheTtlPolicy;
use crate::error::{CongressError, CongressResult};
use async_trait::async_trait;
use dashmap::DashMap;
use redis::AsyncCommands;
use serde::Serialize;
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Pluggable key/value store with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a value. Missing and expired entries both return `Ok(None)`.
    async fn get(&self, key: &str) -> CongressResult<Option<JsonValue>>;

    /// Store a value; `ttl: None` means no expiry.
    async fn set(&self, key: &str, value: JsonValue, ttl: Option<Duration>) -> CongressResult<()>;

    /// Remove a key, reporting whether it was present.
    async fn delete(&self, key: &str) -> CongressResult<bool>;

    /// Remove every entry.
    async fn clear(&self) -> CongressResult<()>;
}

struct MemoryEntry {
    value: JsonValue,
    expires_at: Option<Instant>,
}

/// In-process cache backed by a concurrent map.
///
/// Expired entries are evicted when read; there is no background sweep, so
/// an entry nobody asks for again lingers until `clear`.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, MemoryEntry>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Entries currently held, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> CongressResult<Option<JsonValue>> {
        if let Some(entry) = self.entries.get(key) {
            if let Some(deadline) = entry.expires_at {
                if Instant::now() >= deadline {
                    // Drop the shard guard before removing the key.
                    drop(entry);
                    self.entries.remove(key);
                    return Ok(None);
                }
            }
            return Ok(Some(entry.value.clone()));
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: JsonValue, ttl: Option<Duration>) -> CongressResult<()> {
        let entry = MemoryEntry {
            value,
            expires_at: ttl.map(|d| Instant::now() + d),
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CongressResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn clear(&self) -> CongressResult<()> {
        self.entries.clear();
        Ok(())
    }
}

/// Redis-backed cache, shareable across processes.
///
/// Connections are multiplexed and established lazily per operation; a dead
/// Redis surfaces as `CacheBackend` errors, which the manager degrades on.
pub struct RedisCache {
    client: redis::Client,
}

impl RedisCache {
    /// Create a cache from a Redis URL (`redis://host:port/db`).
    ///
    /// The URL is validated here; no connection is made until first use.
    pub fn new(url: &str) -> CongressResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| CongressError::CacheBackend(format!("invalid Redis URL: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> CongressResult<Option<JsonValue>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: JsonValue, ttl: Option<Duration>) -> CongressResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(&value)?;
        match ttl {
            Some(ttl) => {
                let _: () = conn.set_ex(key, json, ttl.as_secs().max(1)).await?;
            }
            None => {
                let _: () = conn.set(key, json).await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> CongressResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let removed: usize = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn clear(&self) -> CongressResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }
}

/// Cache effectiveness counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads answered from the cache.
    pub hits: u64,
    /// Reads that went to the network (including backend failures).
    pub misses: u64,
    /// Successful writes.
    pub stores: u64,
    /// Backend operations that failed.
    pub errors: u64,
}

impl CacheStats {
    /// Cache hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Cache hit rate as a percentage.
    pub fn hit_rate_percent(&self) -> f64 {
        self.hit_rate() * 100.0
    }
}

/// Keyed, TTL-aware front over a `CacheStore`.
///
/// Callers address entries by `(category, args, kwargs)`; the manager derives
/// a stable digest key and picks the TTL from the category policy. Two
/// logically identical requests map to the same key regardless of keyword
/// argument order at the call site.
pub struct CacheManager {
    store: Box<dyn CacheStore>,
    ttl: CacheTtlPolicy,
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    errors: AtomicU64,
}

impl CacheManager {
    /// Create a manager over the given backend and TTL policy.
    pub fn new(store: Box<dyn CacheStore>, ttl: CacheTtlPolicy) -> Self {
        Self {
            store,
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stores: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    /// Derive the digest key for `(category, args, kwargs)`.
    ///
    /// Keyword pairs are sorted by name before hashing, and the digest is a
    /// hex SHA-256 so the same key works across processes and backends.
    pub fn make_key(category: &str, args: &[&str], kwargs: &[(&str, String)]) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(1 + args.len() + kwargs.len());
        parts.push(category.to_string());
        parts.extend(args.iter().map(|a| a.to_string()));

        let mut sorted: Vec<&(&str, String)> = kwargs.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);
        parts.extend(sorted.iter().map(|(k, v)| format!("{}={}", k, v)));

        let digest = Sha256::digest(parts.join("|").as_bytes());
        let mut key = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(key, "{:02x}", byte);
        }
        key
    }

    /// Look up a cached value. Backend failures degrade to a miss.
    pub async fn get(
        &self,
        category: &str,
        args: &[&str],
        kwargs: &[(&str, String)],
    ) -> Option<JsonValue> {
        let key = Self::make_key(category, args, kwargs);
        match self.store.get(&key).await {
            Ok(Some(value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for {} ({})", category, &key[..12]);
                Some(value)
            }
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                warn!("Cache read failed, treating as miss: {}", e);
                None
            }
        }
    }

    /// Store a value under the category TTL. Returns whether it was stored;
    /// a backend failure is logged and reported as `false`, never an error.
    pub async fn set(
        &self,
        category: &str,
        value: JsonValue,
        args: &[&str],
        kwargs: &[(&str, String)],
    ) -> bool {
        let key = Self::make_key(category, args, kwargs);
        let ttl = self.ttl.ttl_for(category);
        match self.store.set(&key, value, Some(ttl)).await {
            Ok(()) => {
                self.stores.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                warn!("Cache write failed, continuing without cache: {}", e);
                false
            }
        }
    }

    /// Remove one entry. Returns whether anything was removed.
    pub async fn delete(&self, category: &str, args: &[&str], kwargs: &[(&str, String)]) -> bool {
        let key = Self::make_key(category, args, kwargs);
        match self.store.delete(&key).await {
            Ok(removed) => removed,
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                warn!("Cache delete failed: {}", e);
                false
            }
        }
    }

    /// Remove every entry. Backend failures propagate; this is the one
    /// administrative operation where silence would hide real damage.
    pub async fn clear(&self) -> CongressResult<()> {
        self.store.clear().await
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_make_key_ignores_kwarg_order() {
        let a = CacheManager::make_key(
            "bill",
            &["bill"],
            &[("congress", "118".to_string()), ("limit", "10".to_string())],
        );
        let b = CacheManager::make_key(
            "bill",
            &["bill"],
            &[("limit", "10".to_string()), ("congress", "118".to_string())],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_make_key_is_hex_digest() {
        let key = CacheManager::make_key("committee", &[], &[]);
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_make_key_distinguishes_inputs() {
        let base = CacheManager::make_key("bill", &["bill"], &[]);
        assert_ne!(base, CacheManager::make_key("hearing", &["bill"], &[]));
        assert_ne!(base, CacheManager::make_key("bill", &["member"], &[]));
        assert_ne!(
            base,
            CacheManager::make_key("bill", &["bill"], &[("limit", "1".to_string())])
        );
    }

    #[tokio::test]
    async fn test_memory_cache_roundtrip() {
        let cache = MemoryCache::new();
        cache
            .set("k1", json!({"value": 1}), None)
            .await
            .expect("set should succeed");

        let got = cache.get("k1").await.expect("get should succeed");
        assert_eq!(got, Some(json!({"value": 1})));

        assert!(cache.delete("k1").await.expect("delete should succeed"));
        assert!(!cache.delete("k1").await.expect("repeat delete should succeed"));
        assert_eq!(cache.get("k1").await.expect("get should succeed"), None);
    }

    #[tokio::test]
    async fn test_memory_cache_expires_entries() {
        let cache = MemoryCache::new();
        cache
            .set("k1", json!("soon gone"), Some(Duration::from_millis(50)))
            .await
            .expect("set should succeed");

        assert!(cache.get("k1").await.expect("get").is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(cache.get("k1").await.expect("get"), None);
        assert!(cache.is_empty(), "expired entry should be evicted on read");
    }

    #[tokio::test]
    async fn test_memory_cache_clear() {
        let cache = MemoryCache::new();
        cache.set("a", json!(1), None).await.expect("set");
        cache.set("b", json!(2), None).await.expect("set");
        assert_eq!(cache.len(), 2);

        cache.clear().await.expect("clear should succeed");
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_manager_hit_and_miss_counters() {
        let manager = CacheManager::new(Box::new(MemoryCache::new()), CacheTtlPolicy::default());
        let kwargs = [("congress", "118".to_string())];

        assert!(manager.get("bill", &["bill"], &kwargs).await.is_none());
        assert!(manager.set("bill", json!({"bills": []}), &["bill"], &kwargs).await);
        assert!(manager.get("bill", &["bill"], &kwargs).await.is_some());

        let stats = manager.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.stores, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[tokio::test]
    async fn test_manager_delete() {
        let manager = CacheManager::new(Box::new(MemoryCache::new()), CacheTtlPolicy::default());
        assert!(manager.set("member", json!(1), &["member"], &[]).await);
        assert!(manager.delete("member", &["member"], &[]).await);
        assert!(!manager.delete("member", &["member"], &[]).await);
        assert!(manager.get("member", &["member"], &[]).await.is_none());
    }

    /// Backend that fails every operation, standing in for a dead Redis.
    struct FailingStore;

    #[async_trait]
    impl CacheStore for FailingStore {
        async fn get(&self, _key: &str) -> CongressResult<Option<JsonValue>> {
            Err(CongressError::CacheBackend("connection refused".to_string()))
        }

        async fn set(
            &self,
            _key: &str,
            _value: JsonValue,
            _ttl: Option<Duration>,
        ) -> CongressResult<()> {
            Err(CongressError::CacheBackend("connection refused".to_string()))
        }

        async fn delete(&self, _key: &str) -> CongressResult<bool> {
            Err(CongressError::CacheBackend("connection refused".to_string()))
        }

        async fn clear(&self) -> CongressResult<()> {
            Err(CongressError::CacheBackend("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_manager_degrades_on_backend_failure() {
        let manager = CacheManager::new(Box::new(FailingStore), CacheTtlPolicy::default());

        assert!(manager.get("bill", &["bill"], &[]).await.is_none());
        assert!(!manager.set("bill", json!(1), &["bill"], &[]).await);
        assert!(!manager.delete("bill", &["bill"], &[]).await);
        assert!(manager.clear().await.is_err(), "clear propagates backend failure");

        let stats = manager.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1, "failed read counts as a miss");
        assert!(stats.errors >= 3);
    }
}
