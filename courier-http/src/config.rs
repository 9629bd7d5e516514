//! Transport and async pool configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Semaphore;

use crate::encode::DEFAULT_USER_AGENT;
use crate::{HttpRequest, Result};

/// Queue capacity used when none (or zero) is given.
pub const DEFAULT_POOL_CAPACITY: usize = 100;

/// Environment variable read by [`PoolConfig::from_env`].
pub const POOL_SIZE_ENV: &str = "COURIER_ASYNC_POOL_SIZE";

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User agent the client falls back to. Encoded requests always carry
    /// their own `User-Agent`, so this only matters for requests built
    /// outside the encoder.
    pub user_agent: String,
    /// Follow redirects.
    pub follow_redirects: bool,
    /// Maximum redirects to follow.
    pub max_redirects: usize,
    /// Idle connections kept per host. The default of zero keeps the shared
    /// client usable from callers running on different runtimes.
    pub pool_max_idle_per_host: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            follow_redirects: true,
            max_redirects: 10,
            pool_max_idle_per_host: 0,
        }
    }
}

impl TransportConfig {
    /// Create a new configuration builder.
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }
}

/// Builder for transport configuration.
#[derive(Debug, Default)]
pub struct TransportConfigBuilder {
    config: TransportConfig,
}

impl TransportConfigBuilder {
    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable following redirects.
    pub fn follow_redirects(mut self, enable: bool) -> Self {
        self.config.follow_redirects = enable;
        self
    }

    /// Set the maximum number of redirects to follow.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Set the maximum idle connections per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> TransportConfig {
        self.config
    }
}

/// Callback run by the async worker after each execution.
pub type CompletionHook = Arc<dyn Fn(&HttpRequest, &Result<Bytes>) + Send + Sync>;

/// Async pool configuration.
#[derive(Clone)]
pub struct PoolConfig {
    /// Number of requests the queue holds before callers wait.
    pub capacity: usize,
    /// Name of the worker thread.
    pub thread_name: String,
    /// Called with every executed request and its outcome.
    pub on_complete: Option<CompletionHook>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
            thread_name: "courier-async".to_string(),
            on_complete: None,
        }
    }
}

impl PoolConfig {
    /// Create a configuration with the given capacity. Zero falls back to
    /// [`DEFAULT_POOL_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        Self::default().with_capacity(capacity)
    }

    /// Read the capacity from `COURIER_ASYNC_POOL_SIZE`, falling back to the
    /// default when unset or unparsable.
    pub fn from_env() -> Self {
        let capacity = std::env::var(POOL_SIZE_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_POOL_CAPACITY);
        Self::new(capacity)
    }

    /// Set the queue capacity. Zero falls back to [`DEFAULT_POOL_CAPACITY`];
    /// anything above what a bounded channel supports is clamped to it.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = if capacity < 1 {
            DEFAULT_POOL_CAPACITY
        } else {
            capacity.min(Semaphore::MAX_PERMITS)
        };
        self
    }

    /// Set the worker thread name.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Register a completion hook.
    pub fn on_complete<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HttpRequest, &Result<Bytes>) + Send + Sync + 'static,
    {
        self.on_complete = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig")
            .field("capacity", &self.capacity)
            .field("thread_name", &self.thread_name)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_builder() {
        let config = TransportConfig::builder()
            .connect_timeout(Duration::from_secs(2))
            .user_agent("courier/1")
            .follow_redirects(false)
            .max_redirects(3)
            .pool_max_idle_per_host(4)
            .build();

        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.user_agent, "courier/1");
        assert!(!config.follow_redirects);
        assert_eq!(config.max_redirects, 3);
        assert_eq!(config.pool_max_idle_per_host, 4);
    }

    #[test]
    fn test_transport_defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.pool_max_idle_per_host, 0);
    }

    #[test]
    fn test_pool_capacity_normalized() {
        assert_eq!(PoolConfig::new(0).capacity, DEFAULT_POOL_CAPACITY);
        assert_eq!(PoolConfig::new(1).capacity, 1);
        assert_eq!(PoolConfig::new(10).capacity, 10);
        assert_eq!(PoolConfig::new(usize::MAX).capacity, Semaphore::MAX_PERMITS);
    }

    #[test]
    fn test_pool_from_env() {
        // SAFETY: no other test in this crate touches this variable.
        unsafe { std::env::set_var(POOL_SIZE_ENV, " 25 ") };
        assert_eq!(PoolConfig::from_env().capacity, 25);

        unsafe { std::env::set_var(POOL_SIZE_ENV, "lots") };
        assert_eq!(PoolConfig::from_env().capacity, DEFAULT_POOL_CAPACITY);

        unsafe { std::env::remove_var(POOL_SIZE_ENV) };
        assert_eq!(PoolConfig::from_env().capacity, DEFAULT_POOL_CAPACITY);
    }

    #[test]
    fn test_pool_hook_registration() {
        let config = PoolConfig::new(5)
            .with_thread_name("uploads")
            .on_complete(|_, _| {});
        assert!(config.on_complete.is_some());
        assert_eq!(config.thread_name, "uploads");
        assert!(format!("{config:?}").contains("uploads"));
    }
}
