//! Quorum lock manager: fan-out acquisition, validity accounting, retry and
//! release across N independent lock stores.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, instrument, Span};

use crate::config::LockConfig;
use crate::error::{LockError, LockResult};
use crate::guard::LockGuard;
use crate::handle::LockHandle;
use crate::store::StoreAdapter;
use crate::token;

/// Per-store timeout for delete fan-outs, where no TTL is in scope.
const DELETE_TIMEOUT: Duration = Duration::from_secs(1);

/// Orchestrates lease acquisition and release across a fixed set of stores.
///
/// The manager holds the store list and configuration established at
/// construction; both are read-only afterwards, so a single manager is
/// safely shared across concurrent `acquire`/`release` calls. Concurrent
/// acquisitions need no client-side coordination — mutual exclusion comes
/// entirely from the stores' atomic set-if-absent.
///
/// # Example
///
/// ```rust,ignore
/// let stores = vec![Arc::new(store_a), Arc::new(store_b), Arc::new(store_c)];
/// let manager = QuorumLockManager::new(stores, LockConfig::default())?;
///
/// if let Some(handle) = manager.acquire("orders:1234", Duration::from_secs(10)).await? {
///     do_critical_work().await;
///     manager.release(&handle).await;
/// }
/// ```
pub struct QuorumLockManager<S: StoreAdapter> {
    stores: Arc<Vec<Arc<S>>>,
    config: LockConfig,
    quorum: usize,
}

impl<S: StoreAdapter> QuorumLockManager<S> {
    /// Creates a manager over the given stores.
    ///
    /// The quorum is computed here, once, from the final store list:
    /// `min(N, N/2 + 1)`. Membership does not change afterwards.
    pub fn new(stores: Vec<Arc<S>>, config: LockConfig) -> LockResult<Self> {
        if stores.is_empty() {
            return Err(LockError::InvalidConfig(
                "at least one store is required".to_string(),
            ));
        }
        config.validate()?;
        let quorum = quorum_for(stores.len());
        Ok(Self {
            stores: Arc::new(stores),
            config,
            quorum,
        })
    }

    /// Number of stores that must grant an acquisition.
    pub fn quorum(&self) -> usize {
        self.quorum
    }

    /// Number of configured stores.
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    /// Acquires a lease on `resource` for `ttl`.
    ///
    /// Runs up to `retry_count` attempts with jittered backoff in between.
    /// Returns `Ok(None)` when every attempt failed to reach a quorum with
    /// positive validity — the caller learns *that* acquisition failed, not
    /// why, which is all the best-effort algorithm can honestly promise.
    pub async fn acquire(&self, resource: &str, ttl: Duration) -> LockResult<Option<LockHandle>> {
        let (_cancel_sender, cancel_receiver) = watch::channel(false);
        self.acquire_with_cancel(resource, ttl, cancel_receiver).await
    }

    /// Acquires a lease, abortable through a cancellation token.
    ///
    /// When `cancel` flips to `true`, outstanding store calls are aborted,
    /// any partial locks the attempt took are rolled back with the
    /// attempt's token, and `Err(Cancelled)` is returned.
    #[instrument(
        skip(self, cancel),
        fields(
            resource = %resource,
            stores = self.stores.len(),
            quorum = self.quorum,
            acquired = tracing::field::Empty,
            attempts = tracing::field::Empty,
            validity_ms = tracing::field::Empty,
        )
    )]
    pub async fn acquire_with_cancel(
        &self,
        resource: &str,
        ttl: Duration,
        mut cancel: watch::Receiver<bool>,
    ) -> LockResult<Option<LockHandle>> {
        if resource.is_empty() {
            return Err(LockError::InvalidResource(
                "resource name is empty".to_string(),
            ));
        }
        if ttl.is_zero() {
            return Err(LockError::InvalidTtl("ttl must be positive".to_string()));
        }

        let ttl_ms = ttl.as_millis() as i64;
        let drift = drift_millis(ttl_ms, self.config.clock_drift_factor);
        let op_timeout = self.store_op_timeout(ttl_ms, drift);

        for attempt in 1..=self.config.retry_count {
            // Fresh token per attempt, never reused.
            let lock_token = token::generate();
            let started = Instant::now();

            let granted = match self
                .fan_out_set(resource, &lock_token, ttl, op_timeout, &mut cancel)
                .await
            {
                Ok(count) => count,
                Err(LockError::Cancelled) => {
                    // Roll back whatever partial locks the aborted attempt took.
                    delete_everywhere(&self.stores, resource, &lock_token, self.delete_timeout())
                        .await;
                    return Err(LockError::Cancelled);
                }
                Err(other) => return Err(other),
            };

            let elapsed = started.elapsed().as_millis() as i64;
            let validity = validity_millis(ttl_ms, elapsed, self.config.clock_drift_factor);

            if granted >= self.quorum && validity > 0 {
                let span = Span::current();
                span.record("acquired", true);
                span.record("attempts", attempt);
                span.record("validity_ms", validity);
                return Ok(Some(LockHandle::new(
                    resource.to_string(),
                    lock_token,
                    Duration::from_millis(validity as u64),
                )));
            }

            debug!(attempt, granted, validity, "attempt failed, rolling back");

            // Roll back against every store, including ones that never
            // granted in this attempt: a mismatched token makes the delete
            // a harmless no-op, and a store that misses it will expire the
            // key at the TTL anyway.
            delete_everywhere(&self.stores, resource, &lock_token, self.delete_timeout()).await;

            if attempt < self.config.retry_count {
                self.backoff(&mut cancel).await?;
            }
        }

        let span = Span::current();
        span.record("acquired", false);
        span.record("attempts", self.config.retry_count);
        Ok(None)
    }

    /// Releases a held lease.
    ///
    /// Compare-and-delete fans out to every store unconditionally; release
    /// needs no quorum. Safety only requires that a non-owner can never
    /// delete another owner's key, which the token guard provides, and any
    /// store missed here self-expires at the TTL. Always best-effort, always
    /// idempotent, never an error.
    #[instrument(skip(self, handle), fields(resource = %handle.resource(), stores = self.stores.len()))]
    pub async fn release(&self, handle: &LockHandle) {
        delete_everywhere(
            &self.stores,
            handle.resource(),
            handle.token(),
            self.delete_timeout(),
        )
        .await;
    }

    /// Acquires a lease wrapped in a scope guard.
    ///
    /// With `auto_release` configured, dropping the guard spawns a
    /// best-effort release; either way the guard supports explicit
    /// `release().await`.
    pub async fn lock(&self, resource: &str, ttl: Duration) -> LockResult<Option<LockGuard<S>>> {
        Ok(self.acquire(resource, ttl).await?.map(|handle| {
            LockGuard::new(
                handle,
                Arc::clone(&self.stores),
                self.delete_timeout(),
                self.config.auto_release,
            )
        }))
    }

    /// Acquires a lease, runs `f` inside it, then releases.
    ///
    /// Returns `Ok(None)` without running `f` when acquisition fails.
    pub async fn with_lock<F, Fut, T>(
        &self,
        resource: &str,
        ttl: Duration,
        f: F,
    ) -> LockResult<Option<T>>
    where
        F: FnOnce(LockHandle) -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        match self.acquire(resource, ttl).await? {
            Some(handle) => {
                let output = f(handle.clone()).await;
                self.release(&handle).await;
                Ok(Some(output))
            }
            None => Ok(None),
        }
    }

    /// Issues set-if-absent to every store concurrently and counts grants.
    ///
    /// Short-circuits in both directions: returns as soon as the quorum is
    /// reached, and stops waiting on stragglers once enough stores have
    /// refused that the quorum is mathematically out of reach. Each store
    /// call carries its own timeout; one that misses it counts as a
    /// non-grant for this attempt.
    async fn fan_out_set(
        &self,
        resource: &str,
        lock_token: &str,
        ttl: Duration,
        op_timeout: Duration,
        cancel: &mut watch::Receiver<bool>,
    ) -> LockResult<usize> {
        let total = self.stores.len();
        let mut tasks: JoinSet<bool> = JoinSet::new();
        for store in self.stores.iter() {
            let store = Arc::clone(store);
            let key = resource.to_string();
            let value = lock_token.to_string();
            tasks.spawn(async move {
                tokio::time::timeout(op_timeout, store.set_if_absent(&key, &value, ttl))
                    .await
                    .unwrap_or(false)
            });
        }

        let mut granted = 0usize;
        let mut refused = 0usize;
        let mut cancel_open = true;

        while granted < self.quorum && total - refused >= self.quorum {
            tokio::select! {
                joined = tasks.join_next() => {
                    match joined {
                        Some(Ok(true)) => granted += 1,
                        // A panicked task counts the same as a refusal.
                        Some(_) => refused += 1,
                        None => break,
                    }
                }
                changed = cancel.changed(), if cancel_open => {
                    match changed {
                        Ok(()) if *cancel.borrow() => {
                            tasks.abort_all();
                            return Err(LockError::Cancelled);
                        }
                        Ok(()) => {}
                        // Sender gone; cancellation can no longer arrive.
                        Err(_) => cancel_open = false,
                    }
                }
            }
        }

        // Remaining tasks are aborted when the set drops. A straggler whose
        // SET still lands server-side holds this attempt's token, so either
        // the success path's eventual release or the failure path's rollback
        // covers it.
        Ok(granted)
    }

    /// Sleeps a jittered delay between attempts, still honoring cancellation.
    async fn backoff(&self, cancel: &mut watch::Receiver<bool>) -> LockResult<()> {
        let delay = jittered_delay(self.config.retry_delay);
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        let mut cancel_open = true;
        loop {
            tokio::select! {
                _ = &mut sleep => return Ok(()),
                changed = cancel.changed(), if cancel_open => {
                    match changed {
                        Ok(()) if *cancel.borrow() => return Err(LockError::Cancelled),
                        Ok(()) => {}
                        Err(_) => cancel_open = false,
                    }
                }
            }
        }
    }

    /// Timeout for a single store call within an acquisition attempt.
    ///
    /// Always strictly below the TTL so a slow store cannot consume the
    /// whole lease budget. Defaults to the drift-adjusted TTL; a configured
    /// `store_timeout` is clamped under the TTL as well.
    fn store_op_timeout(&self, ttl_ms: i64, drift: i64) -> Duration {
        let cap = (ttl_ms - 1).max(1) as u64;
        let millis = match self.config.store_timeout {
            Some(timeout) => (timeout.as_millis() as u64).min(cap),
            None => (ttl_ms - drift).max(1) as u64,
        };
        Duration::from_millis(millis)
    }

    fn delete_timeout(&self) -> Duration {
        self.config.store_timeout.unwrap_or(DELETE_TIMEOUT)
    }
}

/// Issues compare-and-delete to every store concurrently, ignoring results.
///
/// Used for attempt rollback, explicit release and guard teardown alike.
pub(crate) async fn delete_everywhere<S: StoreAdapter>(
    stores: &[Arc<S>],
    resource: &str,
    lock_token: &str,
    op_timeout: Duration,
) {
    let mut tasks: JoinSet<()> = JoinSet::new();
    for store in stores {
        let store = Arc::clone(store);
        let key = resource.to_string();
        let value = lock_token.to_string();
        tasks.spawn(async move {
            let _ = tokio::time::timeout(op_timeout, store.compare_and_delete(&key, &value)).await;
        });
    }
    while tasks.join_next().await.is_some() {}
}

/// Quorum for `store_count` stores: `min(N, N/2 + 1)`.
pub(crate) fn quorum_for(store_count: usize) -> usize {
    store_count.min(store_count / 2 + 1)
}

/// Drift compensation in milliseconds for a given TTL.
///
/// The "+2" covers store-side expiry granularity (1ms) plus a minimum
/// drift for very short TTLs.
fn drift_millis(ttl_ms: i64, clock_drift_factor: f64) -> i64 {
    (ttl_ms as f64 * clock_drift_factor) as i64 + 2
}

/// Remaining safe lease time after an acquisition attempt. May be negative.
fn validity_millis(ttl_ms: i64, elapsed_ms: i64, clock_drift_factor: f64) -> i64 {
    ttl_ms - elapsed_ms - drift_millis(ttl_ms, clock_drift_factor)
}

/// Draws an inter-attempt delay uniformly from the configured range.
fn jittered_delay(range: (Duration, Duration)) -> Duration {
    let (min, max) = range;
    if min >= max {
        min
    } else {
        rand::thread_rng().gen_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quorum_table() {
        let expected = [(1, 1), (2, 2), (3, 2), (4, 3), (5, 3), (6, 4)];
        for (stores, quorum) in expected {
            assert_eq!(quorum_for(stores), quorum, "N = {stores}");
        }
    }

    #[test]
    fn drift_compensation() {
        assert_eq!(drift_millis(10_000, 0.01), 102);
        assert_eq!(drift_millis(0, 0.01), 2);
        assert_eq!(drift_millis(1_000, 0.0), 2);
    }

    #[test]
    fn validity_arithmetic() {
        // ttl=10000ms, factor 0.01, 5ms elapsed: 10000 - 5 - 102 = 9893.
        assert_eq!(validity_millis(10_000, 5, 0.01), 9893);
    }

    #[test]
    fn validity_goes_negative_when_budget_is_spent() {
        assert!(validity_millis(100, 150, 0.01) < 0);
        assert!(validity_millis(100, 99, 0.01) < 0);
    }

    #[test]
    fn jitter_stays_in_range() {
        let range = (Duration::from_millis(10), Duration::from_millis(20));
        for _ in 0..200 {
            let delay = jittered_delay(range);
            assert!(delay >= range.0 && delay <= range.1, "delay = {delay:?}");
        }
    }

    #[test]
    fn jitter_handles_degenerate_range() {
        let fixed = Duration::from_millis(15);
        assert_eq!(jittered_delay((fixed, fixed)), fixed);
    }
}
