//! Core trait for the downstream collaborator.

use super::error::InvokeError;
use std::future::Future;

/// The opaque unit of work a worker executes for each job.
///
/// Implementations are shared read-only across all workers, so they must
/// be safe for concurrent use. Retry and backoff policy, if any, belong to
/// the implementation — the pool treats a returned error as final for that
/// job, logs it, and moves on.
///
/// The `impl Future + Send` return position keeps worker futures
/// spawnable on the multi-threaded runtime.
pub trait Downstream<J>: Send + Sync {
    /// Executes one job against the downstream dependency.
    fn invoke(&self, job: J) -> impl Future<Output = Result<(), InvokeError>> + Send;
}
