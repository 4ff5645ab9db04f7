//! The store adapter contract.

use std::future::Future;
use std::time::Duration;

/// Uniform interface to one independent lock-store node.
///
/// An adapter translates exactly two primitives to its store's protocol and
/// nothing more. Both primitives must execute atomically server-side:
/// set-if-absent is the moral equivalent of `SET key value PX ttl NX`, and
/// compare-and-delete must be a single server-side unit (a script), never a
/// client-side get-then-delete — that gap is a race against key expiry and
/// re-acquisition by another owner.
///
/// Adapters never surface transport errors. A store that is unreachable,
/// slow, or mid-failover is indistinguishable from "lock already held" as
/// far as the quorum algorithm cares, so every error degrades to `false`.
pub trait StoreAdapter: Send + Sync + 'static {
    /// A label identifying this store node, used in tracing output.
    fn endpoint(&self) -> &str;

    /// Sets `key = token` with a TTL, only if `key` does not currently exist.
    ///
    /// Returns `true` iff the key was set by this call.
    fn set_if_absent(
        &self,
        key: &str,
        token: &str,
        ttl: Duration,
    ) -> impl Future<Output = bool> + Send;

    /// Deletes `key` only if its current value equals `token`.
    ///
    /// Returns `true` iff the key was deleted by this call.
    fn compare_and_delete(&self, key: &str, token: &str) -> impl Future<Output = bool> + Send;
}
