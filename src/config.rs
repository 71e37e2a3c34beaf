//! Configuration for kvf
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{KvfError, Result};

/// Main configuration for a kvf store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Lock Configuration
    // -------------------------------------------------------------------------
    /// Shared directory holding companion lock files.
    /// Must be the same for every process that touches the same targets:
    ///   {lock_dir}/
    ///     ├── 1874305920.lock
    ///     └── 3022851117.lock
    pub lock_dir: PathBuf,

    /// Retry budget for acquiring a held lock
    pub lock_retry: LockRetryPolicy,
}

/// Exponential backoff used while a lock is held by someone else
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockRetryPolicy {
    /// Sleep after the first failed attempt
    pub initial_interval: Duration,

    /// Multiplier applied to the interval after each failed attempt
    pub factor: f64,

    /// Upper bound for a single sleep
    pub max_interval: Duration,

    /// Total attempts before giving up with `LockTimeout`
    pub max_attempts: u32,
}

impl Default for LockRetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(1),
            factor: 2.0,
            max_interval: Duration::from_millis(200),
            max_attempts: 20,
        }
    }
}

impl LockRetryPolicy {
    /// Sleep before the retry following failed `attempt` (0-indexed)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay = self.initial_interval.as_nanos() as f64 * self.factor.powi(exponent);
        let capped = delay.min(self.max_interval.as_nanos() as f64);
        Duration::from_nanos(capped as u64)
    }

    /// Reject policies that could never acquire or would never back off
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(KvfError::Config(
                "lock retry policy needs at least one attempt".to_string(),
            ));
        }
        if !self.factor.is_finite() || self.factor < 1.0 {
            return Err(KvfError::Config(format!(
                "lock backoff factor must be >= 1.0, got {}",
                self.factor
            )));
        }
        if self.max_interval < self.initial_interval {
            return Err(KvfError::Config(format!(
                "max lock interval {:?} is below the initial interval {:?}",
                self.max_interval, self.initial_interval
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_dir: default_lock_dir(),
            lock_retry: LockRetryPolicy::default(),
        }
    }
}

/// Host-wide lock directory used when none is configured
pub fn default_lock_dir() -> PathBuf {
    if cfg!(unix) {
        PathBuf::from("/var/lock/kvf")
    } else {
        std::env::temp_dir().join("kvf-locks")
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validate all settings
    pub fn validate(&self) -> Result<()> {
        if self.lock_dir.as_os_str().is_empty() {
            return Err(KvfError::Config("lock directory is empty".to_string()));
        }
        self.lock_retry.validate()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the shared lock directory
    pub fn lock_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.lock_dir = path.into();
        self
    }

    /// Replace the whole retry policy
    pub fn lock_retry(mut self, policy: LockRetryPolicy) -> Self {
        self.config.lock_retry = policy;
        self
    }

    /// Set the first backoff interval
    pub fn lock_initial_interval(mut self, interval: Duration) -> Self {
        self.config.lock_retry.initial_interval = interval;
        self
    }

    /// Set the backoff multiplier
    pub fn lock_backoff_factor(mut self, factor: f64) -> Self {
        self.config.lock_retry.factor = factor;
        self
    }

    /// Set the cap for a single backoff sleep
    pub fn lock_max_interval(mut self, interval: Duration) -> Self {
        self.config.lock_retry.max_interval = interval;
        self
    }

    /// Set the total number of lock attempts
    pub fn lock_max_attempts(mut self, attempts: u32) -> Self {
        self.config.lock_retry.max_attempts = attempts;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
