//! Reference in-process store adapter.
//!
//! `MemoryStore` implements the two store primitives over a `HashMap` with
//! millisecond expiry. It backs the test suite and the benches, and doubles
//! as a real adapter for single-process embedding where the "distributed"
//! part is not needed yet. Fault injection (unreachable flag, artificial
//! latency) exists so tests can stage the partial-failure scenarios the
//! quorum algorithm is built for.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::store::StoreAdapter;

struct Entry {
    token: String,
    expires_at: Instant,
}

/// In-memory lock store with TTL expiry and fault injection.
pub struct MemoryStore {
    endpoint: String,
    entries: Mutex<HashMap<String, Entry>>,
    unreachable: AtomicBool,
    latency: Mutex<Option<Duration>>,
    set_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryStore {
    /// Creates a store identified by `endpoint` (a label for tracing/tests).
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            entries: Mutex::new(HashMap::new()),
            unreachable: AtomicBool::new(false),
            latency: Mutex::new(None),
            set_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// Simulates the store being down. While unreachable, both primitives
    /// report non-success, exactly like a store behind a dead network.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Injects a fixed delay before every primitive responds.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock().unwrap() = latency;
    }

    /// Number of set-if-absent calls issued to this store, reachable or not.
    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    /// Number of compare-and-delete calls issued to this store.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Current (non-expired) token stored under `key`, if any.
    pub fn current_token(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap();
        Self::purge_expired(&mut entries, key);
        entries.get(key).map(|entry| entry.token.clone())
    }

    /// Plants a key directly, bypassing the adapter contract. Test hook for
    /// staging "someone else holds this" states.
    pub fn force_set(&self, key: &str, token: &str, ttl: Duration) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            Entry {
                token: token.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn purge_expired(entries: &mut HashMap<String, Entry>, key: &str) {
        if let Some(entry) = entries.get(key) {
            if entry.expires_at <= Instant::now() {
                entries.remove(key);
            }
        }
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl StoreAdapter for MemoryStore {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn set_if_absent(&self, key: &str, token: &str, ttl: Duration) -> bool {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.unreachable.load(Ordering::SeqCst) {
            return false;
        }
        let mut entries = self.entries.lock().unwrap();
        Self::purge_expired(&mut entries, key);
        if entries.contains_key(key) {
            return false;
        }
        entries.insert(
            key.to_string(),
            Entry {
                token: token.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        true
    }

    async fn compare_and_delete(&self, key: &str, token: &str) -> bool {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.unreachable.load(Ordering::SeqCst) {
            return false;
        }
        let mut entries = self.entries.lock().unwrap();
        Self::purge_expired(&mut entries, key);
        match entries.get(key) {
            Some(entry) if entry.token == token => {
                entries.remove(key);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn set_if_absent_grants_once() {
        let store = MemoryStore::new("mem-0");
        assert!(store.set_if_absent("res", "token-a", TTL).await);
        assert!(!store.set_if_absent("res", "token-b", TTL).await);
        assert_eq!(store.current_token("res").as_deref(), Some("token-a"));
    }

    #[tokio::test]
    async fn expired_key_is_treated_as_absent() {
        let store = MemoryStore::new("mem-0");
        assert!(
            store
                .set_if_absent("res", "token-a", Duration::from_millis(20))
                .await
        );
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(store.set_if_absent("res", "token-b", TTL).await);
        assert_eq!(store.current_token("res").as_deref(), Some("token-b"));
    }

    #[tokio::test]
    async fn compare_and_delete_requires_matching_token() {
        let store = MemoryStore::new("mem-0");
        assert!(store.set_if_absent("res", "token-a", TTL).await);
        assert!(!store.compare_and_delete("res", "token-b").await);
        assert_eq!(store.current_token("res").as_deref(), Some("token-a"));
        assert!(store.compare_and_delete("res", "token-a").await);
        assert_eq!(store.current_token("res"), None);
    }

    #[tokio::test]
    async fn unreachable_store_refuses_everything() {
        let store = MemoryStore::new("mem-0");
        store.set_unreachable(true);
        assert!(!store.set_if_absent("res", "token-a", TTL).await);
        assert!(!store.compare_and_delete("res", "token-a").await);
        // Calls were still issued and counted.
        assert_eq!(store.set_calls(), 1);
        assert_eq!(store.delete_calls(), 1);
    }
}
