//! Floodgate - admission-controlled worker pool
//!
//! This library caps how many concurrent calls may run against a downstream
//! dependency. Producers push jobs into a bounded queue, a pool of workers
//! drains it, and a governor lets an operator stop, restart, and scale the
//! pool at runtime without losing queued or in-flight work.
//!
//! # High-Level API
//!
//! ```ignore
//! use floodgate::downstream::{HttpClientConfig, HttpDownstream};
//! use floodgate::pool::{bounded, PoolGovernor};
//! use std::sync::Arc;
//!
//! let target = HttpDownstream::new(HttpClientConfig::default(), "http://localhost:3000/health")?;
//! let (producer, source) = bounded::<u64>(10);
//! let governor = PoolGovernor::new(source, Arc::new(target));
//!
//! governor.start(5)?;
//!
//! for id in 0..10_000u64 {
//!     producer.enqueue(id).await?;
//! }
//! producer.close()?;
//! ```

pub mod downstream;
pub mod pool;

/// Version of the floodgate library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
