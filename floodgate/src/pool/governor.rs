//! Pool governor.
//!
//! The governor is the single authority for the pool's lifecycle: it owns
//! the phase, the generation counter, the current stop signal, and the live
//! worker count, and it serializes every control command so that `stop`,
//! `start`, and `scale_up` compose safely regardless of call order or
//! concurrency.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──start(n)──▶ Running ──stop()──▶ Draining ──last worker exits──▶ Idle
//! ```
//!
//! `start` allocates a fresh [`StopSignal`] each time (generations are never
//! reused — a fired signal cannot be un-fired). `stop` fires the current
//! signal exactly once and returns immediately without waiting for drain.
//! `start` during `Draining` is rejected: overlapping generations on the
//! shared queue would allow cross-generation job delivery, so the caller
//! retries once the pool reports idle.

use super::error::PoolError;
use super::queue::JobSource;
use super::signal::StopSignal;
use super::traits::Downstream;
use super::worker::{ExitReason, Worker};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Externally visible pool phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolPhase {
    /// No live workers; `start` is accepted.
    Idle,
    /// Workers are consuming the queue; `stop` and `scale_up` are accepted.
    Running,
    /// The stop signal has fired; workers are finishing in-flight jobs and
    /// exiting. No operations are accepted until the pool returns to idle.
    Draining,
}

impl std::fmt::Display for PoolPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Draining => write!(f, "draining"),
        }
    }
}

/// Point-in-time snapshot of the pool, for the control plane.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStatus {
    /// Current lifecycle phase.
    pub phase: PoolPhase,
    /// Current generation (0 before the first `start`).
    pub generation: u64,
    /// Live workers in the current generation.
    pub active_workers: usize,
}

/// Internal lifecycle. `Running` carries the generation's signal so that
/// "running without a signal" is unrepresentable.
enum Lifecycle {
    Idle,
    Running(StopSignal),
    Draining,
}

impl Lifecycle {
    fn phase(&self) -> PoolPhase {
        match self {
            Self::Idle => PoolPhase::Idle,
            Self::Running(_) => PoolPhase::Running,
            Self::Draining => PoolPhase::Draining,
        }
    }
}

struct GovState {
    lifecycle: Lifecycle,
    generation: u64,
}

struct Inner<J, D> {
    source: JobSource<J>,
    downstream: Arc<D>,
    state: Mutex<GovState>,
    /// Live workers in the current generation. Incremented at spawn,
    /// decremented on exit; reads outside the state lock are advisory.
    active: AtomicUsize,
    next_worker_id: AtomicU64,
}

/// Governor for the admission-controlled worker pool.
///
/// Cheap to clone; clones share the same pool. All operations are safe to
/// call from arbitrary, possibly concurrent, control-plane triggers — the
/// governor serializes transitions internally.
pub struct PoolGovernor<J, D> {
    inner: Arc<Inner<J, D>>,
}

impl<J, D> Clone for PoolGovernor<J, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<J, D> PoolGovernor<J, D>
where
    J: Send + 'static,
    D: Downstream<J> + 'static,
{
    /// Creates a governor over the given job source and downstream
    /// collaborator. The pool starts idle; call [`start`](Self::start).
    pub fn new(source: JobSource<J>, downstream: Arc<D>) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                downstream,
                state: Mutex::new(GovState {
                    lifecycle: Lifecycle::Idle,
                    generation: 0,
                }),
                active: AtomicUsize::new(0),
                next_worker_id: AtomicU64::new(0),
            }),
        }
    }

    /// Starts a new generation with `n` workers.
    ///
    /// Valid only while idle. Allocates a fresh stop signal, spawns the
    /// workers, and returns the new generation number.
    ///
    /// **Note**: workers are spawned with `tokio::spawn`, so this must be
    /// called from within a Tokio runtime context.
    pub fn start(&self, n: usize) -> Result<u64, PoolError> {
        if n == 0 {
            return Err(PoolError::InvalidWorkerCount(n));
        }

        let mut state = self.inner.state.lock().unwrap();
        if !matches!(state.lifecycle, Lifecycle::Idle) {
            return Err(PoolError::InvalidTransition {
                operation: "start",
                phase: state.lifecycle.phase(),
            });
        }

        state.generation += 1;
        let signal = StopSignal::new(state.generation);
        state.lifecycle = Lifecycle::Running(signal.clone());

        self.spawn_workers(n, &signal);

        info!(
            generation = state.generation,
            workers = n,
            "Pool started"
        );
        Ok(state.generation)
    }

    /// Fires the current generation's stop signal and begins draining.
    ///
    /// Valid only while running. Returns immediately; workers finish their
    /// in-flight job (at most one more each) and exit. The queue is not
    /// closed — closure is the producer's event, not the governor's.
    pub fn stop(&self) -> Result<(), PoolError> {
        let mut state = self.inner.state.lock().unwrap();
        let Lifecycle::Running(signal) = &state.lifecycle else {
            return Err(PoolError::InvalidTransition {
                operation: "stop",
                phase: state.lifecycle.phase(),
            });
        };

        signal.fire();

        // Workers may already have all exited (queue drained while
        // running); in that case there is nothing left to drain.
        state.lifecycle = if self.inner.active.load(Ordering::Acquire) == 0 {
            Lifecycle::Idle
        } else {
            Lifecycle::Draining
        };

        info!(
            generation = state.generation,
            phase = %state.lifecycle.phase(),
            "Pool stopping"
        );
        Ok(())
    }

    /// Adds `k` workers to the current generation.
    ///
    /// Valid only while running. Safe to call concurrently with other
    /// `scale_up` calls and with `stop`: a worker spawned a moment after
    /// the signal fires is bound to that same signal and exits after at
    /// most one job.
    pub fn scale_up(&self, k: usize) -> Result<(), PoolError> {
        let state = self.inner.state.lock().unwrap();
        let Lifecycle::Running(signal) = &state.lifecycle else {
            return Err(PoolError::InvalidTransition {
                operation: "scale_up",
                phase: state.lifecycle.phase(),
            });
        };

        if k > 0 {
            self.spawn_workers(k, signal);
            info!(
                generation = state.generation,
                added = k,
                active = self.inner.active.load(Ordering::Acquire),
                "Pool scaled up"
            );
        }
        Ok(())
    }

    /// Adds workers until the live count reaches `target`.
    ///
    /// Derived convenience over [`scale_up`](Self::scale_up): add-only, a
    /// target at or below the current count is a no-op. Returns the number
    /// of workers actually spawned.
    pub fn scale_to(&self, target: usize) -> Result<usize, PoolError> {
        let state = self.inner.state.lock().unwrap();
        let Lifecycle::Running(signal) = &state.lifecycle else {
            return Err(PoolError::InvalidTransition {
                operation: "scale_to",
                phase: state.lifecycle.phase(),
            });
        };

        let current = self.inner.active.load(Ordering::Acquire);
        let missing = target.saturating_sub(current);
        if missing > 0 {
            self.spawn_workers(missing, signal);
            info!(
                generation = state.generation,
                target,
                added = missing,
                "Pool scaled to target"
            );
        }
        Ok(missing)
    }

    /// Returns a point-in-time snapshot of the pool.
    pub fn status(&self) -> PoolStatus {
        let state = self.inner.state.lock().unwrap();
        PoolStatus {
            phase: state.lifecycle.phase(),
            generation: state.generation,
            active_workers: self.inner.active.load(Ordering::Acquire),
        }
    }

    /// Returns the number of live workers.
    pub fn active_workers(&self) -> usize {
        self.inner.active.load(Ordering::Acquire)
    }

    /// Spawns `count` workers bound to `signal`. Caller holds the state
    /// lock, which keeps the count increment and the phase consistent.
    fn spawn_workers(&self, count: usize, signal: &StopSignal) {
        for _ in 0..count {
            let id = self.inner.next_worker_id.fetch_add(1, Ordering::Relaxed);
            self.inner.active.fetch_add(1, Ordering::AcqRel);

            let worker = Worker {
                id,
                generation: signal.generation(),
                source: self.inner.source.clone(),
                signal: signal.clone(),
                downstream: Arc::clone(&self.inner.downstream),
            };
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move {
                let reason = worker.run().await;
                inner.worker_exited(id, reason);
            });
        }
    }
}

impl<J, D> Inner<J, D> {
    /// Bookkeeping for a worker leaving its loop. The last worker out
    /// returns the pool to idle so a new generation can start.
    fn worker_exited(&self, worker_id: u64, reason: ExitReason) {
        let remaining = self.active.fetch_sub(1, Ordering::AcqRel) - 1;
        debug!(worker_id, remaining, ?reason, "Worker exited");

        if remaining == 0 {
            let mut state = self.state.lock().unwrap();
            // Re-check under the lock: a concurrent scale_up may have
            // spawned new workers between the decrement and here.
            if self.active.load(Ordering::Acquire) == 0
                && !matches!(state.lifecycle, Lifecycle::Idle)
            {
                info!(
                    generation = state.generation,
                    "All workers exited, pool idle"
                );
                state.lifecycle = Lifecycle::Idle;
            }
        }
    }
}
