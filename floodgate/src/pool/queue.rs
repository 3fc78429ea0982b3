//! Bounded job queue.
//!
//! The queue is the boundary between producers and the pool. It is ordered
//! (FIFO), bounded (a full queue blocks producers — this is the
//! backpressure mechanism), and closeable exactly once. Closure drains: jobs
//! buffered before `close` are still delivered to workers before the queue
//! reports end-of-stream.

use super::error::QueueError;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Creates a bounded job queue with the given capacity.
///
/// Returns the producer handle and the worker-side source. Both are cheap
/// to clone; clones share the same underlying channel.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn bounded<J: Send + 'static>(capacity: usize) -> (JobProducer<J>, JobSource<J>) {
    let (tx, rx) = mpsc::channel(capacity);
    let producer = JobProducer {
        tx: Arc::new(std::sync::Mutex::new(Some(tx))),
    };
    let source = JobSource {
        rx: Arc::new(Mutex::new(rx)),
    };
    (producer, source)
}

/// Producer handle for the job queue.
///
/// Closure is implemented by dropping the stored sender. An `enqueue` that
/// is blocked on a full queue holds its own temporary sender clone, so a
/// job accepted before `close` is never dropped — it completes once a
/// worker frees capacity.
pub struct JobProducer<J> {
    tx: Arc<std::sync::Mutex<Option<mpsc::Sender<J>>>>,
}

impl<J> Clone for JobProducer<J> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<J: Send + 'static> JobProducer<J> {
    /// Enqueues a job, waiting while the queue is at capacity.
    ///
    /// Returns [`QueueError::Closed`] if the queue has been closed. A job
    /// accepted by this method is guaranteed to reach exactly one worker.
    pub async fn enqueue(&self, job: J) -> Result<(), QueueError> {
        let tx = self.tx.lock().unwrap().clone();
        let Some(tx) = tx else {
            return Err(QueueError::Closed);
        };
        tx.send(job).await.map_err(|_| QueueError::Closed)
    }

    /// Closes the queue. No further jobs are accepted; already-buffered
    /// jobs are still delivered to workers.
    ///
    /// Must be called at most once across all clones of this producer.
    /// A second call returns [`QueueError::DoubleClose`].
    pub fn close(&self) -> Result<(), QueueError> {
        let mut tx = self.tx.lock().unwrap();
        match tx.take() {
            Some(_) => Ok(()),
            None => Err(QueueError::DoubleClose),
        }
    }

    /// Returns true if the queue has been closed.
    pub fn is_closed(&self) -> bool {
        self.tx.lock().unwrap().is_none()
    }
}

/// Worker-side view of the job queue.
///
/// All workers share one receiver behind an async mutex, which preserves
/// FIFO handoff: jobs are delivered to *some* worker in enqueue order.
pub struct JobSource<J> {
    rx: Arc<Mutex<mpsc::Receiver<J>>>,
}

impl<J> Clone for JobSource<J> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<J: Send + 'static> JobSource<J> {
    /// Takes the next job, waiting while the queue is empty and open.
    ///
    /// Returns `None` once the queue is closed **and** drained. Until
    /// drained, closure does not prevent delivery of buffered jobs.
    ///
    /// Cancel-safe: if this future is dropped before completing, no job
    /// has been taken from the queue.
    pub async fn dequeue(&self) -> Option<J> {
        self.rx.lock().await.recv().await
    }
}
