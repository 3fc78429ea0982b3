//! Worker Pool Framework
//!
//! This module provides the admission-controlled worker pool: a bounded job
//! queue, a broadcast stop signal, the worker loop, and the governor that
//! coordinates them under concurrent control commands.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Producers                              │
//! │  enqueue jobs, block when the queue is full (backpressure)  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      PoolGovernor                            │
//! │  start / stop / scale_up / scale_to, phase + generation     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ Job Queue   │  │ Stop        │  │ Workers             │  │
//! │  │ (bounded)   │  │ Signal      │  │ (one task each)     │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Core Concepts
//!
//! - **Job**: an opaque unit of work, owned by the producer until dequeued,
//!   then by exactly one worker.
//!
//! - **Generation**: one lifetime of the pool from a `start` to the next.
//!   Each generation gets a fresh [`StopSignal`]; a fired signal is never
//!   reused.
//!
//! - **Stop Signal**: a single-fire broadcast flag. Every worker of the
//!   generation observes the same permanent state after firing — there is
//!   no single-consumer handoff.
//!
//! - **Worker**: dequeues one job at a time, invokes the downstream
//!   collaborator, and checks the signal at each job boundary. A dequeued
//!   job always runs to completion; at most one job runs per worker after
//!   the signal fires.
//!
//! # Example
//!
//! ```ignore
//! use floodgate::pool::{bounded, PoolGovernor};
//!
//! let (producer, source) = bounded::<u64>(10);
//! let governor = PoolGovernor::new(source, downstream);
//!
//! governor.start(5)?;
//! governor.scale_up(3)?;
//! governor.stop()?;
//! ```

mod config;
mod error;
mod governor;
mod queue;
mod signal;
mod traits;
mod worker;

pub use config::{PoolConfig, DEFAULT_INITIAL_WORKERS, DEFAULT_QUEUE_CAPACITY};
pub use error::{InvokeError, PoolError, QueueError};
pub use governor::{PoolGovernor, PoolPhase, PoolStatus};
pub use queue::{bounded, JobProducer, JobSource};
pub use signal::StopSignal;
pub use traits::Downstream;
