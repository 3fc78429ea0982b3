//! Integration tests for the worker pool.
//!
//! These tests exercise the full queue + governor + worker stack:
//! - FIFO delivery and drain-on-close
//! - No lost jobs across enqueue/close and across stop/restart
//! - Backpressure against a full queue
//! - Post-stop work bounds, including the stop/scale_up race

use floodgate::pool::{bounded, Downstream, InvokeError, PoolGovernor, PoolPhase};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// Test Helpers
// =============================================================================

/// Records every job it executes, optionally sleeping to simulate a slow
/// downstream dependency.
struct RecordingDownstream {
    seen: Mutex<Vec<u64>>,
    executed: AtomicUsize,
    delay: Duration,
}

impl RecordingDownstream {
    fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    fn with_delay(delay: Duration) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            executed: AtomicUsize::new(0),
            delay,
        }
    }

    fn seen(&self) -> Vec<u64> {
        self.seen.lock().unwrap().clone()
    }

    fn executed(&self) -> usize {
        self.executed.load(Ordering::SeqCst)
    }
}

impl Downstream<u64> for RecordingDownstream {
    async fn invoke(&self, job: u64) -> Result<(), InvokeError> {
        self.seen.lock().unwrap().push(job);
        self.executed.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(())
    }
}

async fn wait_for_idle(governor: &PoolGovernor<u64, RecordingDownstream>) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while governor.status().phase != PoolPhase::Idle {
        if tokio::time::Instant::now() > deadline {
            panic!("pool did not return to idle in time");
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

// =============================================================================
// Integration Tests
// =============================================================================

#[tokio::test]
async fn test_single_worker_processes_jobs_in_fifo_order() {
    // Reference scenario: capacity 2, one worker, jobs [1, 2, 3].
    let (producer, source) = bounded::<u64>(2);
    let downstream = Arc::new(RecordingDownstream::new());
    let governor = PoolGovernor::new(source, Arc::clone(&downstream));

    governor.start(1).unwrap();

    for job in [1, 2, 3] {
        producer.enqueue(job).await.unwrap();
    }
    producer.close().unwrap();

    wait_for_idle(&governor).await;

    assert_eq!(downstream.seen(), vec![1, 2, 3]);
    assert_eq!(governor.active_workers(), 0);
}

#[tokio::test]
async fn test_no_jobs_lost_across_enqueue_and_close() {
    let (producer, source) = bounded::<u64>(8);
    let downstream = Arc::new(RecordingDownstream::new());
    let governor = PoolGovernor::new(source, Arc::clone(&downstream));

    governor.start(4).unwrap();

    for job in 0..100 {
        producer.enqueue(job).await.unwrap();
    }
    producer.close().unwrap();

    wait_for_idle(&governor).await;

    // Every job delivered to exactly one worker.
    let mut seen = downstream.seen();
    seen.sort_unstable();
    assert_eq!(seen, (0..100).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_immediate_stop_runs_at_most_one_job_per_worker() {
    let (producer, source) = bounded::<u64>(10);
    let downstream = Arc::new(RecordingDownstream::with_delay(Duration::from_millis(50)));
    let governor = PoolGovernor::new(source, Arc::clone(&downstream));

    // Queue is full before any worker exists.
    for job in 0..10 {
        producer.enqueue(job).await.unwrap();
    }

    governor.start(3).unwrap();
    governor.stop().unwrap();

    wait_for_idle(&governor).await;

    // Three workers, signal fired before (or just after) their first
    // dequeue: at most one job each.
    assert!(
        downstream.executed() <= 3,
        "{} jobs ran across 3 workers after an immediate stop",
        downstream.executed()
    );
}

#[tokio::test]
async fn test_backpressure_blocks_then_releases_on_scale_up() {
    let (producer, source) = bounded::<u64>(3);
    let downstream = Arc::new(RecordingDownstream::new());
    let governor = PoolGovernor::new(source, Arc::clone(&downstream));

    // No workers yet: capacity C accepts C jobs...
    for job in 0..3 {
        producer.enqueue(job).await.unwrap();
    }

    // ...and the (C+1)-th enqueue blocks.
    let blocked = tokio::spawn({
        let producer = producer.clone();
        async move { producer.enqueue(3).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!blocked.is_finished(), "enqueue past capacity should block");

    // Starting a worker drains the queue and unblocks the producer.
    governor.start(1).unwrap();

    tokio::time::timeout(Duration::from_secs(2), blocked)
        .await
        .expect("producer should unblock once a worker drains")
        .expect("producer task should not panic")
        .expect("enqueue should succeed");

    producer.close().unwrap();
    wait_for_idle(&governor).await;
    assert_eq!(downstream.executed(), 4);
}

#[tokio::test]
async fn test_stop_racing_scale_up_still_bounds_post_signal_work() {
    let (producer, source) = bounded::<u64>(50);
    let downstream = Arc::new(RecordingDownstream::with_delay(Duration::from_millis(20)));
    let governor = PoolGovernor::new(source, Arc::clone(&downstream));

    for job in 0..50 {
        producer.enqueue(job).await.unwrap();
    }

    governor.start(2).unwrap();

    // Race the two control commands. scale_up may legitimately lose the
    // race and see a draining pool; either outcome must stay safe.
    let stopper = {
        let governor = governor.clone();
        tokio::spawn(async move { governor.stop() })
    };
    let scaler = {
        let governor = governor.clone();
        tokio::spawn(async move { governor.scale_up(3) })
    };

    stopper.await.unwrap().unwrap();
    let _ = scaler.await.unwrap();

    wait_for_idle(&governor).await;

    // At most 5 workers ever existed, each allowed at most one job after
    // the signal plus whatever it completed in the race window. The bulk
    // of the queue must remain untouched.
    let executed = downstream.executed();
    assert!(
        executed <= 10,
        "{executed} jobs ran despite an immediate stop"
    );
}

#[tokio::test]
async fn test_no_jobs_lost_across_stop_and_restart() {
    let (producer, source) = bounded::<u64>(20);
    let downstream = Arc::new(RecordingDownstream::with_delay(Duration::from_millis(10)));
    let governor = PoolGovernor::new(source, Arc::clone(&downstream));

    for job in 0..20 {
        producer.enqueue(job).await.unwrap();
    }
    producer.close().unwrap();

    governor.start(1).unwrap();
    tokio::time::sleep(Duration::from_millis(35)).await;
    governor.stop().unwrap();
    wait_for_idle(&governor).await;

    let after_first_generation = downstream.executed();
    assert!(
        after_first_generation < 20,
        "stop should interrupt the drain for this test to be meaningful"
    );

    // Second generation picks up exactly the remaining jobs.
    governor.start(2).unwrap();
    wait_for_idle(&governor).await;

    let mut seen = downstream.seen();
    seen.sort_unstable();
    assert_eq!(seen, (0..20).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_workers_idle_on_open_queue_exit_on_stop() {
    let (producer, source) = bounded::<u64>(5);
    let downstream = Arc::new(RecordingDownstream::new());
    let governor = PoolGovernor::new(source, Arc::clone(&downstream));

    governor.start(3).unwrap();

    // Queue open and empty: workers are parked on the queue.
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(governor.active_workers(), 3);

    governor.stop().unwrap();
    wait_for_idle(&governor).await;
    assert_eq!(downstream.executed(), 0);

    // The queue itself is untouched by stop: it is still open.
    assert!(!producer.is_closed());
    producer.enqueue(7).await.unwrap();
}
