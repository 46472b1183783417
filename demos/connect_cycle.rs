//! # Example: connect_cycle
//!
//! Demonstrates a full user-driven lifecycle: connect, stream with
//! progress, then stop.
//!
//! Shows how to:
//! - Build a [`Supervisor`] from a [`WorkerFn`], [`OpenGate`], and
//!   [`MemoryStore`]
//! - Observe state transitions through a custom [`StatusSink`]
//! - Stop cooperatively and watch the bounded join complete
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► Supervisor::new(worker, gate, sink, store)
//!   ├─► start()            → Connecting → Connected, worker spawned
//!   ├─► worker streams values, reports progress every 200ms
//!   ├─► sleep 1 second     (let it stream)
//!   └─► stop()             → Disconnecting, flag cleared immediately
//!         └─► worker observes token → joined → Disconnected
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example connect_cycle
//! ```

use std::sync::Arc;
use std::time::Duration;

use linkvisor::{
    Config, LinkState, MemoryStore, OpenGate, Progress, StatusSink, Supervisor, WorkerError,
    WorkerFn, WorkerRef,
};
use tokio_util::sync::CancellationToken;

/// Prints status updates the way a notification surface would render them.
struct PrintSink;

impl StatusSink for PrintSink {
    fn set_text(&self, text: &str) {
        println!("[status] {text}");
    }
    fn set_progress(&self, percent: u8) {
        println!("[status] progress bar at {percent}%");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== connect_cycle example ===\n");

    // 1. Define the streaming worker: sends an incrementing value every
    //    200ms until cancelled.
    let worker: WorkerRef = WorkerFn::arc(
        "uplink",
        |start: u64, progress: Progress, ctx: CancellationToken| async move {
            println!("[worker] streaming from {start}");
            let mut value = start;
            loop {
                if ctx.is_cancelled() {
                    println!("[worker] detected cancellation, exiting gracefully");
                    return Err::<(), WorkerError>(WorkerError::Canceled);
                }
                println!("[worker] sent {value}");
                progress.report(((value - start) * 20).min(100) as u8);
                value += 1;
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        },
    );

    // 2. Optional: add a subscriber to see raw events (requires the
    //    "logging" feature).
    #[cfg(feature = "logging")]
    let subs: Vec<Arc<dyn linkvisor::Subscribe>> = {
        use linkvisor::LogWriter;
        vec![Arc::new(LogWriter)]
    };
    #[cfg(not(feature = "logging"))]
    let subs: Vec<Arc<dyn linkvisor::Subscribe>> = Vec::new();

    // 3. Create the supervisor with an always-granting gate and a volatile
    //    store.
    let sup = Supervisor::new(
        Config::default(),
        worker,
        Arc::new(OpenGate),
        Arc::new(PrintSink),
        Arc::new(MemoryStore::default()),
        subs,
    );

    // 4. Connect.
    let state = sup.start();
    println!("[main] start() → {state:?}");
    assert_eq!(state, LinkState::Connected);

    // 5. Let it stream for a second.
    tokio::time::sleep(Duration::from_secs(1)).await;

    // 6. Stop and watch the bounded join complete.
    let state = sup.stop();
    println!("[main] stop() → {state:?}");

    while sup.current_state() != LinkState::Disconnected {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    println!("[main] link is down");

    println!("\n=== example completed successfully ===");
    Ok(())
}
