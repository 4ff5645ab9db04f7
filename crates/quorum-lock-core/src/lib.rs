//! Quorum-based lease locks over independent key/value stores.
//!
//! Implements the Redlock-style client-side algorithm: a lease on a named
//! resource is held when a quorum (`min(N, N/2 + 1)`) of N independent,
//! otherwise-uncoordinated stores grant an atomic set-if-absent, and the
//! TTL minus acquisition time minus clock-drift compensation still leaves a
//! positive validity window. Release is a token-guarded compare-and-delete
//! fanned out to every store.
//!
//! This is a best-effort lease bounded by TTL and drift compensation, not a
//! consensus protocol — that trade-off is inherent to the design.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use quorum_lock_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LockError> {
//!     let stores = (0..5).map(|i| Arc::new(MemoryStore::new(format!("store-{i}")))).collect();
//!     let manager = QuorumLockManager::new(stores, LockConfig::default())?;
//!
//!     if let Some(handle) = manager.acquire("orders:1234", Duration::from_secs(10)).await? {
//!         // Critical section, safe for handle.validity().
//!         manager.release(&handle).await;
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod handle;
pub mod manager;
pub mod memory;
pub mod prelude;
pub mod store;
pub mod token;

pub use config::{LockConfig, LockConfigBuilder};
pub use error::{LockError, LockResult};
pub use guard::LockGuard;
pub use handle::LockHandle;
pub use manager::QuorumLockManager;
pub use memory::MemoryStore;
pub use store::StoreAdapter;
