//! # linkvisor
//!
//! **Linkvisor** is a connection lifecycle supervision library for Rust.
//!
//! One host-visible toggle drives a single long-running streaming worker.
//! The supervisor owns the worker's execution context, enforces
//! at-most-one-worker-at-a-time, persists the connection intent across
//! process restarts, and bridges asynchronous progress/stop signals between
//! the worker and observers (e.g. a status notification).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!        host UI / scheduler
//!    start() stop() on_permission_result()
//!               │
//!               ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  Supervisor (lifecycle state machine)                    │
//! │  - one worker slot (the core invariant)                  │
//! │  - Mutex boundary: state, handle, pending permission     │
//! │  - StateStore (durable "connected" flag)                 │
//! │  - PermissionGate (async precondition, single slot)      │
//! │  - Bus (broadcast events)                                │
//! │  - SubscriberSet (fans out to subscribers)               │
//! └──────┬───────────────────────────────┬───────────────────┘
//!        ▼                               ▼
//! ┌──────────────┐                ┌──────────────┐
//! │ worker task  │  progress ──►  │ StatusWriter │ ─► StatusSink
//! │ (cancelable) │                │ LogWriter    │    ("Connected",
//! └──────────────┘                └──────────────┘     "Progress: 40%")
//! ```
//!
//! ### Lifecycle
//! ```text
//! Disconnected ──start()──► Connecting ──grant──► Connected
//!      ▲                        │                     │
//!      │◄────deny / stop()──────┘              stop() │  (flag → false
//!      │                                              ▼   immediately)
//!      │◄──joined / grace elapsed────────────── Disconnecting
//!      │
//!      └◄──worker died on its own (no retry; explicit start() required)
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits            |
//! |-----------------|----------------------------------------------------------|-------------------------------|
//! | **Lifecycle**   | Idempotent start/stop, bounded teardown, auto-resume.    | [`Supervisor`], [`LinkState`] |
//! | **Workers**     | Opaque cancelable streaming units.                       | [`Worker`], [`WorkerFn`]      |
//! | **Persistence** | Durable connection intent, restart contract.             | [`StateStore`], [`JsonFileStore`] |
//! | **Permission**  | Async precondition gating privileged spawns.             | [`PermissionGate`], [`OpenGate`] |
//! | **Observers**   | Non-blocking event fan-out and status rendering.         | [`Subscribe`], [`StatusSink`] |
//! | **Errors**      | Typed worker/store failures.                             | [`WorkerError`], [`StoreError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use linkvisor::{
//!     Config, LinkState, MemoryStore, NullSink, OpenGate, Progress, Supervisor,
//!     WorkerError, WorkerFn, WorkerRef,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let worker: WorkerRef = WorkerFn::arc(
//!         "uplink",
//!         |start: u64, progress: Progress, ctx: CancellationToken| async move {
//!             let mut value = start;
//!             loop {
//!                 if ctx.is_cancelled() {
//!                     return Err::<(), WorkerError>(WorkerError::Canceled);
//!                 }
//!                 // stream `value` to the peer...
//!                 progress.report((value % 100) as u8);
//!                 value += 1;
//!                 tokio::time::sleep(std::time::Duration::from_millis(20)).await;
//!             }
//!         },
//!     );
//!
//!     let sup = Supervisor::new(
//!         Config::default(),
//!         worker,
//!         Arc::new(OpenGate),
//!         Arc::new(NullSink),
//!         Arc::new(MemoryStore::default()),
//!         Vec::new(),
//!     );
//!
//!     assert_eq!(sup.start(), LinkState::Connected);
//!     tokio::time::sleep(std::time::Duration::from_millis(50)).await;
//!     sup.stop();
//! }
//! ```

mod core;
mod error;
mod events;
mod gate;
mod notify;
mod persist;
mod subscribers;
mod workers;

// ---- Public re-exports ----

pub use crate::core::{Config, LinkState, Supervisor};
pub use error::{StoreError, WorkerError};
pub use events::{Bus, Event, EventKind};
pub use gate::{OpenGate, PermissionGate};
pub use notify::{NullSink, StatusSink};
pub use persist::{JsonFileStore, MemoryStore, StateStore};
pub use subscribers::{StatusWriter, Subscribe, SubscriberSet};
pub use workers::{Progress, Worker, WorkerFn, WorkerRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
