//! Lock manager configuration.

use std::time::Duration;

use crate::error::{LockError, LockResult};

/// Configuration for a [`QuorumLockManager`](crate::manager::QuorumLockManager).
///
/// Immutable for the manager's lifetime. The quorum itself is not part of
/// the configuration: it is derived once from the store list at manager
/// construction and can never be set independently.
#[derive(Debug, Clone)]
pub struct LockConfig {
    /// Maximum acquisition attempts per `acquire` call (≥ 1).
    pub retry_count: u32,
    /// Jitter range for the sleep between failed attempts.
    ///
    /// Each delay is drawn uniformly from `[min, max]`.
    pub retry_delay: (Duration, Duration),
    /// Fraction of the TTL added as clock-drift compensation.
    pub clock_drift_factor: f64,
    /// Release a still-held guard automatically when it is dropped.
    pub auto_release: bool,
    /// Per-store operation timeout.
    ///
    /// `None` derives a timeout from the TTL for each attempt. A configured
    /// value is still clamped below the TTL so a slow store can never
    /// consume the whole lease budget.
    pub store_timeout: Option<Duration>,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            retry_count: 3,
            retry_delay: (Duration::from_millis(100), Duration::from_millis(400)),
            clock_drift_factor: 0.01,
            auto_release: false,
            store_timeout: None,
        }
    }
}

impl LockConfig {
    /// Returns a new builder with default settings.
    pub fn builder() -> LockConfigBuilder {
        LockConfigBuilder::new()
    }

    /// Validates the configuration.
    pub(crate) fn validate(&self) -> LockResult<()> {
        if self.retry_count < 1 {
            return Err(LockError::InvalidConfig(
                "retry_count must be at least 1".to_string(),
            ));
        }
        let (min, max) = self.retry_delay;
        if min > max {
            return Err(LockError::InvalidConfig(format!(
                "retry_delay range is inverted: {min:?} > {max:?}"
            )));
        }
        if !self.clock_drift_factor.is_finite()
            || self.clock_drift_factor < 0.0
            || self.clock_drift_factor >= 1.0
        {
            return Err(LockError::InvalidConfig(format!(
                "clock_drift_factor must be in [0, 1), got {}",
                self.clock_drift_factor
            )));
        }
        if let Some(timeout) = self.store_timeout {
            if timeout.is_zero() {
                return Err(LockError::InvalidConfig(
                    "store_timeout must be non-zero".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Builder for [`LockConfig`].
pub struct LockConfigBuilder {
    config: LockConfig,
}

impl LockConfigBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: LockConfig::default(),
        }
    }

    /// Sets the maximum number of acquisition attempts.
    pub fn retry_count(mut self, count: u32) -> Self {
        self.config.retry_count = count;
        self
    }

    /// Sets the jitter range for the inter-attempt backoff.
    pub fn retry_delay(mut self, min: Duration, max: Duration) -> Self {
        self.config.retry_delay = (min, max);
        self
    }

    /// Sets the clock drift factor.
    pub fn clock_drift_factor(mut self, factor: f64) -> Self {
        self.config.clock_drift_factor = factor;
        self
    }

    /// Enables or disables automatic release when a guard is dropped.
    pub fn auto_release(mut self, enabled: bool) -> Self {
        self.config.auto_release = enabled;
        self
    }

    /// Sets an explicit per-store operation timeout.
    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.config.store_timeout = Some(timeout);
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> LockResult<LockConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for LockConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(LockConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_retry_count() {
        let result = LockConfig::builder().retry_count(0).build();
        assert!(matches!(result, Err(LockError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_inverted_delay_range() {
        let result = LockConfig::builder()
            .retry_delay(Duration::from_millis(500), Duration::from_millis(100))
            .build();
        assert!(matches!(result, Err(LockError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_out_of_range_drift_factor() {
        for factor in [-0.1, 1.0, f64::NAN] {
            let result = LockConfig::builder().clock_drift_factor(factor).build();
            assert!(matches!(result, Err(LockError::InvalidConfig(_))));
        }
    }

    #[test]
    fn builder_sets_all_fields() {
        let config = LockConfig::builder()
            .retry_count(5)
            .retry_delay(Duration::from_millis(10), Duration::from_millis(20))
            .clock_drift_factor(0.02)
            .auto_release(true)
            .store_timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        assert_eq!(config.retry_count, 5);
        assert_eq!(
            config.retry_delay,
            (Duration::from_millis(10), Duration::from_millis(20))
        );
        assert_eq!(config.clock_drift_factor, 0.02);
        assert!(config.auto_release);
        assert_eq!(config.store_timeout, Some(Duration::from_millis(50)));
    }
}
