//! Convenience prelude for quorum lock types.

pub use crate::config::{LockConfig, LockConfigBuilder};
pub use crate::error::{LockError, LockResult};
pub use crate::guard::LockGuard;
pub use crate::handle::LockHandle;
pub use crate::manager::QuorumLockManager;
pub use crate::memory::MemoryStore;
pub use crate::store::StoreAdapter;
