//! Floodgate CLI - demo producer and HTTP control plane
//!
//! Runs an admission-controlled worker pool against a downstream endpoint
//! and exposes the governor's operations over HTTP so an operator can stop,
//! restart, and scale the pool at runtime.

use clap::Parser;
use floodgate::downstream::{HttpClientConfig, HttpDownstream};
use floodgate::pool::{
    bounded, PoolConfig, PoolGovernor, DEFAULT_INITIAL_WORKERS, DEFAULT_QUEUE_CAPACITY,
};
use std::process;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod control;
mod producer;

#[derive(Parser)]
#[command(name = "floodgate")]
#[command(about = "Throttle concurrent requests against a downstream endpoint", long_about = None)]
struct Args {
    /// Downstream URL each job calls
    #[arg(long, default_value = "http://localhost:3000/health")]
    target: String,

    /// Initial number of workers
    #[arg(long, default_value_t = DEFAULT_INITIAL_WORKERS)]
    workers: usize,

    /// Bounded job queue capacity (must be at least 1)
    #[arg(
        long,
        default_value_t = DEFAULT_QUEUE_CAPACITY,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    queue_capacity: usize,

    /// Number of demo jobs to enqueue before closing the queue
    #[arg(long, default_value_t = 10_000)]
    jobs: u64,

    /// Bind address for the HTTP control plane
    #[arg(long, default_value = "127.0.0.1:4000")]
    control_addr: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let downstream = match HttpDownstream::new(HttpClientConfig::default(), &args.target) {
        Ok(downstream) => downstream,
        Err(e) => {
            eprintln!("Error creating downstream client: {}", e);
            process::exit(1);
        }
    };

    let pool_config = PoolConfig::default()
        .with_queue_capacity(args.queue_capacity)
        .with_initial_workers(args.workers);

    let (job_producer, source) = bounded::<u64>(pool_config.queue_capacity);
    let governor = PoolGovernor::new(source, Arc::new(downstream));

    if let Err(e) = governor.start(pool_config.initial_workers) {
        eprintln!("Error starting pool: {}", e);
        process::exit(1);
    }
    info!(
        target = %args.target,
        workers = pool_config.initial_workers,
        queue_capacity = pool_config.queue_capacity,
        "Pool running"
    );

    // Detached; the producer logs its own completion.
    let _ = producer::spawn(job_producer, args.jobs);

    let app = control::router(governor);
    let listener = match tokio::net::TcpListener::bind(&args.control_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Error binding control plane to {}: {}", args.control_addr, e);
            process::exit(1);
        }
    };
    info!(addr = %args.control_addr, "Control plane listening");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Control plane server failed: {}", e);
        process::exit(1);
    }
}
