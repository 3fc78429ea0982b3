//! Worker loop.
//!
//! Each worker repeatedly takes one job from the shared queue, executes it
//! against the downstream collaborator, and checks the generation's stop
//! signal at the job boundary. Cancellation is cooperative: a dequeued job
//! always runs to completion, so at most one job runs per worker after the
//! signal fires, and no dequeued job is ever lost to a stop.

use super::queue::JobSource;
use super::signal::StopSignal;
use super::traits::Downstream;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why a worker left its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitReason {
    /// The queue is closed and fully drained.
    Drained,
    /// The generation's stop signal fired.
    Stopped,
}

/// A single worker instance, pinned to one generation's signal.
pub(crate) struct Worker<J, D> {
    pub(crate) id: u64,
    pub(crate) generation: u64,
    pub(crate) source: JobSource<J>,
    pub(crate) signal: StopSignal,
    pub(crate) downstream: Arc<D>,
}

impl<J, D> Worker<J, D>
where
    J: Send + 'static,
    D: Downstream<J>,
{
    /// Runs the worker until the queue drains or the signal fires.
    pub(crate) async fn run(self) -> ExitReason {
        info!(
            worker_id = self.id,
            generation = self.generation,
            "Worker started"
        );

        let reason = loop {
            // Selecting on the broadcast signal lets a worker blocked on an
            // empty open queue exit promptly. `dequeue` is cancel-safe, so
            // losing the race never abandons a claimed job.
            tokio::select! {
                _ = self.signal.fired() => break ExitReason::Stopped,
                job = self.source.dequeue() => {
                    let Some(job) = job else {
                        break ExitReason::Drained;
                    };

                    if let Err(e) = self.downstream.invoke(job).await {
                        // Job-level failure stays local: log and continue.
                        warn!(
                            worker_id = self.id,
                            error = %e,
                            "Downstream call failed"
                        );
                    }

                    // Unconditional job-boundary check. Bounds post-stop
                    // work to at most one job per worker.
                    if self.signal.is_fired() {
                        break ExitReason::Stopped;
                    }
                }
            }
        };

        match reason {
            ExitReason::Drained => debug!(
                worker_id = self.id,
                generation = self.generation,
                "Queue drained and closed, worker exiting"
            ),
            ExitReason::Stopped => debug!(
                worker_id = self.id,
                generation = self.generation,
                "Stop signal observed, worker exiting"
            ),
        }

        reason
    }
}
