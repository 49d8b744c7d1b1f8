//! Query Cache
//!
//! Read-through cache for list/aggregate projections. An explicit handle is
//! injected into the handlers that need it; there is no process-global state.
//!
//! Entries are keyed by scope plus the normalized query string. A mutation
//! invalidates only the scopes it touched, so a write to one entity class
//! does not flush unrelated projections. Reads must never observe data from
//! before a write this process issued.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

/// Cache scopes, one per entity class with cached projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScope {
    Users,
    Transfers,
    Withdrawals,
}

impl CacheScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheScope::Users => "users",
            CacheScope::Transfers => "transfers",
            CacheScope::Withdrawals => "withdrawals",
        }
    }
}

struct CacheEntry {
    value: serde_json::Value,
    inserted_at: Instant,
}

/// TTL-bounded, scope-keyed response cache.
pub struct QueryCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn full_key(scope: CacheScope, key: &str) -> String {
        format!("{}:{}", scope.as_str(), key)
    }

    /// Fetch a cached value if present and fresh. Expired entries are
    /// dropped on the spot.
    pub async fn get<T: DeserializeOwned>(&self, scope: CacheScope, key: &str) -> Option<T> {
        let full_key = Self::full_key(scope, key);

        {
            let entries = self.entries.read().await;
            match entries.get(&full_key) {
                Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                    return serde_json::from_value(entry.value.clone()).ok();
                }
                Some(_) => {}
                None => return None,
            }
        }

        // Stale entry, remove it
        self.entries.write().await.remove(&full_key);
        None
    }

    /// Store a value. Serialization failures are logged and skipped; caching
    /// is best-effort.
    pub async fn put<T: Serialize>(&self, scope: CacheScope, key: &str, value: &T) {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, scope = scope.as_str(), "Failed to cache value");
                return;
            }
        };

        self.entries.write().await.insert(
            Self::full_key(scope, key),
            CacheEntry {
                value: json,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop every entry in the given scopes.
    pub async fn invalidate(&self, scopes: &[CacheScope]) {
        let mut entries = self.entries.write().await;
        entries.retain(|key, _| {
            !scopes
                .iter()
                .any(|scope| key.starts_with(scope.as_str()) && key[scope.as_str().len()..].starts_with(':'))
        });

        tracing::debug!(
            scopes = ?scopes.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            "Invalidated cache scopes"
        );
    }

    /// Number of live entries (test support / diagnostics).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
