//! HTTP downstream collaborator.
//!
//! The pool itself is agnostic to what a job does; this module provides the
//! reqwest-backed implementation for the reference use case — each job is a
//! request identifier and the work is one GET against a configured URL.
//! The client and its connection pool are read-only shared configuration,
//! safe for concurrent use by all workers.

use crate::pool::{Downstream, InvokeError};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

// =============================================================================
// Configuration Constants
// =============================================================================

/// Default end-to-end request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cap on idle connections kept per host.
pub const DEFAULT_MAX_IDLE_PER_HOST: usize = 100;

/// Default idle connection lifetime.
pub const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the downstream HTTP client.
///
/// Assembles timeouts and connection-pool limits; not part of the pool's
/// concurrency machinery. Worker count, not this client, bounds how many
/// requests run at once.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// End-to-end timeout per request.
    pub request_timeout: Duration,

    /// TCP connect timeout.
    pub connect_timeout: Duration,

    /// Maximum idle connections kept alive per host.
    pub max_idle_per_host: usize,

    /// How long an idle connection is kept before being dropped.
    pub pool_idle_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_idle_per_host: DEFAULT_MAX_IDLE_PER_HOST,
            pool_idle_timeout: DEFAULT_POOL_IDLE_TIMEOUT,
        }
    }
}

impl HttpClientConfig {
    /// Sets the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the TCP connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the idle connection cap per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }

    /// Sets the idle connection lifetime.
    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }
}

// =============================================================================
// HTTP Downstream
// =============================================================================

/// Reqwest-backed downstream collaborator.
///
/// Invoking a job performs one GET against the configured URL. A non-2xx
/// status is reported as an error so the worker can log it; the worker
/// treats the job as complete either way.
#[derive(Clone)]
pub struct HttpDownstream {
    client: reqwest::Client,
    url: String,
}

impl HttpDownstream {
    /// Creates a downstream over the given client configuration and
    /// target URL.
    pub fn new(config: HttpClientConfig, url: impl Into<String>) -> Result<Self, InvokeError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .build()
            .map_err(|e| InvokeError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Returns the target URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Downstream<u64> for HttpDownstream {
    fn invoke(&self, job: u64) -> impl Future<Output = Result<(), InvokeError>> + Send {
        async move {
            let response = self
                .client
                .get(&self.url)
                .send()
                .await
                .map_err(|e| InvokeError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(InvokeError::Status(status.as_u16()));
            }

            debug!(
                job_id = job,
                status = status.as_u16(),
                "Downstream call completed"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = HttpClientConfig::default();
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.max_idle_per_host, DEFAULT_MAX_IDLE_PER_HOST);
        assert_eq!(config.pool_idle_timeout, DEFAULT_POOL_IDLE_TIMEOUT);
    }

    #[test]
    fn test_client_config_builder() {
        let config = HttpClientConfig::default()
            .with_request_timeout(Duration::from_secs(5))
            .with_connect_timeout(Duration::from_secs(2))
            .with_max_idle_per_host(10)
            .with_pool_idle_timeout(Duration::from_secs(30));

        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.max_idle_per_host, 10);
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_downstream_construction() {
        let downstream =
            HttpDownstream::new(HttpClientConfig::default(), "http://localhost:3000/health")
                .expect("client should build");
        assert_eq!(downstream.url(), "http://localhost:3000/health");
    }

    #[tokio::test]
    async fn test_invoke_against_unreachable_host_is_a_request_error() {
        let config = HttpClientConfig::default()
            .with_request_timeout(Duration::from_millis(500))
            .with_connect_timeout(Duration::from_millis(500));
        // Reserved TEST-NET address; connections fail fast or time out.
        let downstream =
            HttpDownstream::new(config, "http://192.0.2.1:9/health").expect("client should build");

        let result = downstream.invoke(1).await;
        assert!(matches!(result, Err(InvokeError::Request(_))));
    }
}
