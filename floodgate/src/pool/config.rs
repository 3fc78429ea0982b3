//! Pool configuration.

// =============================================================================
// Configuration Constants
// =============================================================================

/// Default bounded queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Default number of workers spawned by the first `start`.
pub const DEFAULT_INITIAL_WORKERS: usize = 5;

// =============================================================================
// Pool Configuration
// =============================================================================

/// Configuration for assembling a pool.
///
/// The queue capacity bounds producer backpressure; the worker count bounds
/// downstream concurrency. Both are fixed per construction — the worker
/// count can then be raised at runtime via the governor.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Capacity of the bounded job queue.
    pub queue_capacity: usize,

    /// Workers spawned when the pool starts.
    pub initial_workers: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            initial_workers: DEFAULT_INITIAL_WORKERS,
        }
    }
}

impl PoolConfig {
    /// Sets the bounded queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Sets the initial worker count.
    pub fn with_initial_workers(mut self, workers: usize) -> Self {
        self.initial_workers = workers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_default() {
        let config = PoolConfig::default();
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.initial_workers, DEFAULT_INITIAL_WORKERS);
    }

    #[test]
    fn test_pool_config_builder() {
        let config = PoolConfig::default()
            .with_queue_capacity(64)
            .with_initial_workers(8);
        assert_eq!(config.queue_capacity, 64);
        assert_eq!(config.initial_workers, 8);
    }
}
