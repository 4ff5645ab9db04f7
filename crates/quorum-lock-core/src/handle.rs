//! Lock handle value type.

use std::time::Duration;

/// Proof of a successful quorum acquisition.
///
/// A handle is an immutable value: the resource it covers, the token that
/// authorizes its release, and the validity window that was left on the
/// lease at the moment of acquisition. The manager never retains handles;
/// the caller owns it and hands it back to
/// [`release`](crate::manager::QuorumLockManager::release) when done.
///
/// Handles are only constructed for acquisitions whose validity came out
/// positive, so `validity()` is always non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockHandle {
    resource: String,
    token: String,
    validity: Duration,
}

impl LockHandle {
    pub(crate) fn new(resource: String, token: String, validity: Duration) -> Self {
        Self {
            resource,
            token,
            validity,
        }
    }

    /// The resource this handle locks.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The token that authorizes releasing this handle.
    ///
    /// Release with any other token is a no-op on every store, which is what
    /// protects a lease another owner picked up after this one expired.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Safe lease time remaining at the moment of acquisition.
    ///
    /// TTL minus acquisition elapsed time minus drift compensation. The
    /// caller should finish its critical section within this window.
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Validity window in milliseconds.
    pub fn validity_millis(&self) -> u64 {
        self.validity.as_millis() as u64
    }
}
