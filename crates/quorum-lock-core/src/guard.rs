//! Scoped lock guard with optional release-on-drop.

use std::sync::Arc;
use std::time::Duration;

use crate::handle::LockHandle;
use crate::manager::delete_everywhere;
use crate::store::StoreAdapter;

/// A held lease bound to a scope.
///
/// Produced by [`QuorumLockManager::lock`](crate::manager::QuorumLockManager::lock).
/// Prefer the explicit async [`release`](LockGuard::release) — it waits for
/// the stores to answer. When the manager was configured with
/// `auto_release`, dropping a still-held guard spawns a best-effort release
/// task instead; failures there are suppressed (the keys self-expire at the
/// TTL regardless), and outside a runtime the drop does nothing but let the
/// TTL run out.
pub struct LockGuard<S: StoreAdapter> {
    handle: Option<LockHandle>,
    stores: Arc<Vec<Arc<S>>>,
    op_timeout: Duration,
    auto_release: bool,
}

impl<S: StoreAdapter> LockGuard<S> {
    pub(crate) fn new(
        handle: LockHandle,
        stores: Arc<Vec<Arc<S>>>,
        op_timeout: Duration,
        auto_release: bool,
    ) -> Self {
        Self {
            handle: Some(handle),
            stores,
            op_timeout,
            auto_release,
        }
    }

    /// The handle this guard holds.
    pub fn handle(&self) -> &LockHandle {
        // Present until release() consumes the guard.
        self.handle.as_ref().unwrap()
    }

    /// Explicitly releases the lease, waiting for the store fan-out.
    pub async fn release(mut self) {
        if let Some(handle) = self.handle.take() {
            delete_everywhere(
                &self.stores,
                handle.resource(),
                handle.token(),
                self.op_timeout,
            )
            .await;
        }
    }
}

impl<S: StoreAdapter> Drop for LockGuard<S> {
    fn drop(&mut self) {
        if !self.auto_release {
            return;
        }
        let Some(handle) = self.handle.take() else {
            return;
        };
        // Drop is synchronous, so the release runs detached. If no runtime
        // is around the keys simply expire at the TTL.
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let stores = Arc::clone(&self.stores);
            let op_timeout = self.op_timeout;
            runtime.spawn(async move {
                delete_everywhere(&stores, handle.resource(), handle.token(), op_timeout).await;
            });
        }
    }
}
