//! Error types for the worker pool.
//!
//! Errors are split by boundary: queue errors go to producers, pool errors
//! go to the control-plane caller, and invoke errors stay inside the worker
//! that issued the downstream call.

use super::governor::PoolPhase;
use thiserror::Error;

/// Errors raised by the job queue to a producer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue has been closed; no further jobs are accepted.
    /// Recoverable: the producer should stop producing.
    #[error("queue is closed")]
    Closed,

    /// `close` was called on an already-closed queue. A usage defect in the
    /// caller, fatal to that call only — the pool keeps draining.
    #[error("queue was already closed")]
    DoubleClose,
}

/// Errors raised by governor operations to the control-plane caller.
///
/// Pool state is unchanged when one of these is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// The operation is not valid in the pool's current phase
    /// (e.g. `stop` while idle, `start` while running or draining).
    #[error("cannot {operation} while the pool is {phase}")]
    InvalidTransition {
        /// The rejected operation.
        operation: &'static str,
        /// The phase that rejected it.
        phase: PoolPhase,
    },

    /// `start` was called with zero workers. A pool with no workers can
    /// never drain, so the count must be at least one.
    #[error("worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),
}

/// Errors raised by a failed downstream call.
///
/// These never propagate past the worker boundary: the worker logs the
/// failure, considers the job complete, and moves on to the next one.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// Building the downstream client failed.
    #[error("client construction failed: {0}")]
    Client(String),

    /// The request could not be completed (connect, timeout, I/O).
    #[error("request failed: {0}")]
    Request(String),

    /// The downstream answered with a non-success status code.
    #[error("unexpected status {0}")]
    Status(u16),
}
