//! Redlock-style quorum lease locks for Rust.
//!
//! Acquires a time-bounded lease on a named resource by reaching quorum
//! agreement across N independent key/value stores, with no single point
//! of failure for lock state. Applications use it for crash-safe critical
//! sections spanning processes and hosts.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use quorum_lock::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect one store per independent Redis node.
//!     let stores = RedisStoreBuilder::new()
//!         .url("redis://10.0.0.1:6379")
//!         .url("redis://10.0.0.2:6379")
//!         .url("redis://10.0.0.3:6379")
//!         .build()
//!         .await?
//!         .into_iter()
//!         .map(Arc::new)
//!         .collect();
//!
//!     let manager = QuorumLockManager::new(stores, LockConfig::default())?;
//!
//!     // Acquire a 10s lease; Ok(None) means "not acquired, retry later".
//!     if let Some(handle) = manager.acquire("orders:1234", Duration::from_secs(10)).await? {
//!         println!("holding the lock for up to {:?}", handle.validity());
//!         // ... critical section ...
//!         manager.release(&handle).await;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Guarantees and non-guarantees
//!
//! Acquisition succeeds only when a quorum (`min(N, N/2 + 1)`) of stores
//! granted an atomic set-if-absent *and* the TTL minus acquisition time
//! minus clock-drift compensation leaves a positive validity window.
//! Release is token-guarded: only the handle that acquired a lease can
//! delete it, so an expired-and-reacquired key is never touched.
//!
//! This is a best-effort lease, not a consensus protocol. It is bounded by
//! TTL and drift compensation and makes no linearizability claims under
//! arbitrary clock skew.
//!
//! # Crate Organization
//!
//! This is a meta-crate that re-exports types from:
//! - `quorum-lock-core`: the algorithm, traits and in-memory store
//! - `quorum-lock-redis`: the Redis store adapter
//!
//! For fine-grained control, depend on the individual crates instead.

// Re-export core types and traits
pub use quorum_lock_core::*;

// Re-export the Redis adapter
pub use quorum_lock_redis::{RedisStore, RedisStoreBuilder};
