//! # Example: auto_resume
//!
//! Demonstrates the process-restart contract: when the host recreates the
//! supervisor while the persisted flag is `true`, `resume()` reconnects
//! without a second user action.
//!
//! ## Flow
//! ```text
//! "first process life"
//!   ├─► Supervisor::new(store)    store reads false
//!   ├─► start()                   → Connected, store now true
//!   └─► process dies              (supervisor dropped, file survives)
//!
//! "second process life"
//!   ├─► Supervisor::new(store)    store reads true
//!   └─► resume()                  → Connected, no explicit start()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example auto_resume
//! ```

use std::sync::Arc;
use std::time::Duration;

use linkvisor::{
    Config, JsonFileStore, LinkState, NullSink, OpenGate, Supervisor, WorkerError, WorkerFn,
    WorkerRef,
};
use tokio_util::sync::CancellationToken;

fn streaming_worker() -> WorkerRef {
    WorkerFn::arc(
        "uplink",
        |_start: u64, _progress: linkvisor::Progress, ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Err::<(), WorkerError>(WorkerError::Canceled)
        },
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== auto_resume example ===\n");

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("link.json");

    // First life: the user connects, then the process is killed.
    {
        let sup = Supervisor::new(
            Config::default(),
            streaming_worker(),
            Arc::new(OpenGate),
            Arc::new(NullSink),
            Arc::new(JsonFileStore::new(&path)),
            Vec::new(),
        );
        println!("[life 1] start() → {:?}", sup.start());
        tokio::time::sleep(Duration::from_millis(100)).await;
        // Process "dies" here: the supervisor is dropped without stop(),
        // so the persisted flag stays true.
    }

    // Second life: the host recreates the supervisor and calls resume().
    {
        let sup = Supervisor::new(
            Config::default(),
            streaming_worker(),
            Arc::new(OpenGate),
            Arc::new(NullSink),
            Arc::new(JsonFileStore::new(&path)),
            Vec::new(),
        );
        let state = sup.resume();
        println!("[life 2] resume() → {state:?} (no explicit start)");
        assert_eq!(state, LinkState::Connected);

        sup.stop();
        while sup.current_state() != LinkState::Disconnected {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        println!("[life 2] stopped; flag cleared");
    }

    println!("\n=== example completed successfully ===");
    Ok(())
}
