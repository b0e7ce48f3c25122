//! # Example: workers
//!
//! Ten workers share one job that prints its state and sleeps 500ms.
//! Each worker's state gets a random tag before start; Ctrl-C stops them all.
//!
//! Shows how to:
//! - Create a batch with [`Factory`]
//! - Prepare per-worker state with [`Worker::with_state`]
//! - Observe `Started` / `Stopped` with closures and [`LogWriter`]
//! - Stop every worker and wait for completion
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► Factory::new(job).create(10)
//!   ├─► per worker: on_started / on_stopped / LogWriter, set tag, start()
//!   ├─► wait for Ctrl-C
//!   └─► stop_and_wait(2s) on every worker
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=tinyworkers=debug cargo run --example workers --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use tinyworkers::{Factory, JobFn, LogWriter, TaskError, Worker, stop_all};
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct CustomState {
    tag: String,
    ticks: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let job = JobFn::arc(|worker: &Worker<CustomState>, state: &mut CustomState| {
        Box::pin(async move {
            state.ticks += 1;
            println!(
                "[{}] do job -- {}|{}",
                worker.id(),
                state.tag,
                state.ticks
            );
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok::<_, TaskError>(())
        })
    });

    let workers = Factory::new(job).create(10);
    let log = Arc::new(LogWriter::new());

    for worker in &workers {
        worker.on_started(|ev| println!("worker {} started", ev.id()));
        worker.on_stopped(|ev| println!("worker {} stopped", ev.id()));
        worker.subscribe(log.clone());
        worker.with_state(|s| s.tag = uuid::Uuid::new_v4().to_string())?;
        worker.start()?;
    }

    tokio::signal::ctrl_c().await?;
    println!("\n[main] stopping workers...");

    stop_all(&workers);
    for worker in &workers {
        worker.stop_and_wait(Duration::from_secs(2)).await?;
        let ticks = worker.with_state(|s| s.ticks)?;
        println!("[main] worker {} ran {ticks} cycles", worker.id());
    }
    Ok(())
}
