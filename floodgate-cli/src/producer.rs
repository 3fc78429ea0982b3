//! Demo job producer.
//!
//! Enqueues a finite run of sequential job identifiers and closes the queue
//! when done. A real deployment would feed incoming request ids here
//! instead; the queue contract is the same — enqueue blocks on a full
//! queue, and close happens exactly once, after the last enqueue.

use floodgate::pool::JobProducer;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Spawns the producer task.
pub fn spawn(producer: JobProducer<u64>, jobs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        for id in 0..jobs {
            if let Err(e) = producer.enqueue(id).await {
                warn!(job_id = id, error = %e, "Enqueue failed, producer stopping");
                return;
            }
        }
        match producer.close() {
            Ok(()) => info!(jobs, "All jobs enqueued, queue closed"),
            Err(e) => warn!(error = %e, "Queue close failed"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodgate::pool::bounded;
    use std::time::Duration;

    #[tokio::test]
    async fn test_producer_enqueues_all_jobs_then_closes() {
        let (producer, source) = bounded::<u64>(5);

        let handle = spawn(producer, 5);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("producer should finish")
            .expect("producer should not panic");

        for expected in 0..5 {
            assert_eq!(source.dequeue().await, Some(expected));
        }
        // Closed and drained
        assert_eq!(source.dequeue().await, None);
    }

    #[tokio::test]
    async fn test_producer_blocks_on_full_queue_until_drained() {
        let (producer, source) = bounded::<u64>(2);

        // 5 jobs into a capacity-2 queue: the producer must wait for the
        // consumer rather than drop anything.
        let handle = spawn(producer, 5);

        let mut seen = Vec::new();
        while let Some(job) = source.dequeue().await {
            seen.push(job);
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);

        handle.await.expect("producer should not panic");
    }
}
