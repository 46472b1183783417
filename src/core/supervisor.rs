//! # Supervisor: owns the link state machine and the one worker context.
//!
//! The [`Supervisor`] enforces at-most-one-worker-at-a-time, exposes
//! idempotent `start`/`stop`, persists the connection intent on every
//! transition that changes it, and bridges worker progress/exit signals to
//! the observer surface.
//!
//! ## High-level architecture
//! ```text
//! host (single caller context)
//!   │ start() / stop() / on_permission_result() / on_progress()
//!   ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │ Supervisor                                                │
//! │   Mutex<Inner { state, handle, pending, epoch }>          │
//! │   ├── StateStore.store(bool)      (sync, before return)   │
//! │   ├── PermissionGate.request()    (fire-and-forget)       │
//! │   └── publish(Event) ──► Bus ──► external receivers       │
//! │                      └─► SubscriberSet ─► StatusWriter ─► StatusSink
//! └───────┬───────────────────────────────────────────────────┘
//!         │ spawn (epoch-tagged)
//!         ▼
//!   worker driver task ── worker.run(start, progress, token)
//!         │                        │
//!         │ exit(epoch, result)    │ progress ─► bounded mpsc ─► pump
//!         ▼                        ▼
//!   on worker exit           worker_progress(epoch, pct)
//! ```
//!
//! ## Rules
//! - All state/handle mutation happens under one mutex; no await while
//!   locked; events are published while locked, so publish order equals
//!   transition order.
//! - Signals from the worker side carry their spawn epoch; stale epochs
//!   (an abandoned or replaced context) are ignored.
//! - `stop()` never waits for teardown: a detached watchdog enforces the
//!   bounded join grace and abandons the context when it elapses.
//! - No automatic retry: a worker that dies on its own leaves the link
//!   `Disconnected` until the host calls `start()` again.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, Weak};

use futures::FutureExt;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::core::handle::WorkerHandle;
use crate::core::{Config, LinkState};
use crate::events::{Bus, Event, EventKind};
use crate::gate::PermissionGate;
use crate::notify::StatusSink;
use crate::persist::StateStore;
use crate::subscribers::{StatusWriter, Subscribe, SubscriberSet};
use crate::workers::{Progress, WorkerRef};

/// State owned by the supervisor's mutual-exclusion boundary.
struct Inner {
    /// Current lifecycle state.
    state: LinkState,
    /// The one worker context, present only between spawn and join/abandon.
    handle: Option<WorkerHandle>,
    /// Single-slot correlation for the in-flight permission request.
    permission_pending: bool,
    /// Last spawn epoch issued.
    epoch: u64,
}

/// Coordinates the link lifecycle: one worker slot, idempotent operations,
/// durable intent, and non-blocking status fan-out.
///
/// Construction and all operations must happen inside a tokio runtime (the
/// supervisor spawns subscriber workers, worker drivers, and teardown
/// watchdogs).
pub struct Supervisor {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    worker: WorkerRef,
    gate: Arc<dyn PermissionGate>,
    store: Arc<dyn StateStore>,

    inner: Mutex<Inner>,
    /// Lock-free mirror of `Inner::state` for `current_state()`.
    state_cell: AtomicU8,
    /// Seeded from the store at construction; consumed by `resume()`.
    resume_flag: AtomicBool,
    /// Self-reference handed to spawned helper tasks.
    weak: Weak<Supervisor>,
}

impl Supervisor {
    /// Creates a new supervisor with the given collaborators.
    ///
    /// Reads the persisted flag once to seed the auto-resume decision. A
    /// [`StatusWriter`] driving `sink` is always added to the subscriber
    /// set; pass additional subscribers for logging or metrics.
    pub fn new(
        cfg: Config,
        worker: WorkerRef,
        gate: Arc<dyn PermissionGate>,
        sink: Arc<dyn StatusSink>,
        store: Arc<dyn StateStore>,
        mut subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Arc<Self> {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        subscribers.push(Arc::new(StatusWriter::new(sink)));
        let subs = Arc::new(SubscriberSet::new(subscribers));

        let resume_flag = match store.load() {
            Ok(flag) => flag,
            Err(e) => {
                eprintln!("[linkvisor] state store read failed: {e}");
                false
            }
        };

        Arc::new_cyclic(|weak| Self {
            cfg,
            bus,
            subs,
            worker,
            gate,
            store,
            inner: Mutex::new(Inner {
                state: LinkState::Disconnected,
                handle: None,
                permission_pending: false,
                epoch: 0,
            }),
            state_cell: AtomicU8::new(LinkState::Disconnected as u8),
            resume_flag: AtomicBool::new(resume_flag),
            weak: weak.clone(),
        })
    }

    /// Begins connecting. Idempotent: in `Connecting` or `Connected` this
    /// is a no-op returning the current state. During `Disconnecting` the
    /// call is refused (the old context is still tearing down) and the
    /// current state is returned.
    ///
    /// Persists the active intent before returning. If the permission gate
    /// does not already grant the configured capability, the worker spawn
    /// is deferred until [`Supervisor::on_permission_result`] delivers the
    /// verdict; the state is `Connecting` in the meantime.
    ///
    /// Never blocks on worker I/O: the worker always runs on its own task.
    pub fn start(&self) -> LinkState {
        let mut inner = self.locked();
        match inner.state {
            LinkState::Connecting | LinkState::Connected | LinkState::Disconnecting => inner.state,
            LinkState::Disconnected => {
                self.set_state(&mut inner, LinkState::Connecting);
                self.persist(true);
                self.publish(Event::now(EventKind::StartRequested).with_state(LinkState::Connecting));

                if self.gate.is_granted(&self.cfg.capability) {
                    self.spawn_worker(&mut inner);
                } else {
                    inner.permission_pending = true;
                    self.publish(
                        Event::now(EventKind::PermissionRequested)
                            .with_reason(self.cfg.capability.as_ref()),
                    );
                    self.gate.request(&self.cfg.capability);
                }
                inner.state
            }
        }
    }

    /// Stops the link. Idempotent: in `Disconnected` or `Disconnecting`
    /// this is a no-op returning the current state.
    ///
    /// Persists the inactive intent immediately (stop is user intent,
    /// independent of the worker's shutdown latency), requests cooperative
    /// cancellation, and returns without waiting. Teardown completion is
    /// observed asynchronously; a watchdog abandons the context once
    /// [`Config::join_grace`] elapses.
    pub fn stop(&self) -> LinkState {
        let mut inner = self.locked();
        match inner.state {
            LinkState::Disconnected | LinkState::Disconnecting => inner.state,
            LinkState::Connecting => {
                // Pending permission, no worker yet: abort the intent.
                inner.permission_pending = false;
                self.set_state(&mut inner, LinkState::Disconnected);
                self.persist(false);
                self.publish(
                    Event::now(EventKind::StopRequested).with_state(LinkState::Disconnected),
                );
                inner.state
            }
            LinkState::Connected => {
                self.set_state(&mut inner, LinkState::Disconnecting);
                self.persist(false);

                if let Some(handle) = inner.handle.as_mut() {
                    handle.request_stop();
                    let epoch = handle.epoch;
                    // Bounded join: wait for the driver up to the grace,
                    // then abandon the context rather than block anyone.
                    if let (Some(join), Some(sup)) = (handle.join.take(), self.weak.upgrade()) {
                        let grace = self.cfg.join_grace;
                        tokio::spawn(async move {
                            if tokio::time::timeout(grace, join).await.is_err() {
                                sup.join_grace_elapsed(epoch);
                            }
                        });
                    }
                }
                self.publish(
                    Event::now(EventKind::StopRequested).with_state(LinkState::Disconnecting),
                );
                inner.state
            }
        }
    }

    /// Delivers the host's verdict for the pending permission request.
    ///
    /// A no-op (not an error) when no start is pending. On grant the worker
    /// spawns and the link moves to `Connected`; on denial the start aborts
    /// back to `Disconnected` with the persisted flag cleared.
    pub fn on_permission_result(&self, granted: bool) -> LinkState {
        let mut inner = self.locked();
        if !inner.permission_pending || inner.state != LinkState::Connecting {
            return inner.state;
        }
        inner.permission_pending = false;

        if granted {
            self.spawn_worker(&mut inner);
        } else {
            self.set_state(&mut inner, LinkState::Disconnected);
            self.persist(false);
            self.publish(
                Event::now(EventKind::PermissionDenied)
                    .with_state(LinkState::Disconnected)
                    .with_reason(self.cfg.capability.as_ref()),
            );
        }
        inner.state
    }

    /// Forwards a host-delivered progress report to the status surface.
    ///
    /// Clamped to 100. Dropped unless the link is `Connected`: a report
    /// arriving after `stop()` has advanced the state must not resurrect a
    /// stale notification.
    pub fn on_progress(&self, percent: u8) {
        let inner = self.locked();
        if inner.state != LinkState::Connected {
            return;
        }
        self.publish(Event::now(EventKind::Progress).with_percent(percent.min(100)));
    }

    /// Process-restart contract: behaves as `start()` when the persisted
    /// flag was `true` at construction, otherwise a no-op.
    ///
    /// The seeded flag is consumed: calling `resume()` again later does not
    /// reconnect a link the user has since stopped.
    pub fn resume(&self) -> LinkState {
        if self.resume_flag.swap(false, AtomicOrdering::SeqCst) {
            self.start()
        } else {
            self.current_state()
        }
    }

    /// Current lifecycle state. Pure read, never blocks.
    pub fn current_state(&self) -> LinkState {
        LinkState::from_u8(self.state_cell.load(AtomicOrdering::SeqCst))
    }

    /// Creates a receiver observing subsequent supervisor events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// The configuration this supervisor runs with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    // ---------------------------
    // Worker-side entry points
    // ---------------------------

    /// Handles a progress report from the worker's pump.
    ///
    /// Same drop rules as [`Supervisor::on_progress`], plus the epoch guard:
    /// an abandoned context that keeps reporting can never touch a newer
    /// connection.
    fn worker_progress(&self, epoch: u64, percent: u8) {
        let inner = self.locked();
        if inner.handle.as_ref().map(|h| h.epoch) != Some(epoch)
            || inner.state != LinkState::Connected
        {
            return;
        }
        self.publish(Event::now(EventKind::Progress).with_percent(percent.min(100)));
    }

    /// Handles the worker driver finishing, cooperatively or otherwise.
    fn worker_exited(&self, epoch: u64, result: Result<(), crate::error::WorkerError>) {
        let mut inner = self.locked();
        if inner.handle.as_ref().map(|h| h.epoch) != Some(epoch) {
            // Stale: the context was already abandoned or replaced.
            return;
        }
        inner.handle = None;

        match inner.state {
            LinkState::Disconnecting => {
                self.set_state(&mut inner, LinkState::Disconnected);
                self.publish(
                    Event::now(EventKind::WorkerJoined).with_state(LinkState::Disconnected),
                );
            }
            LinkState::Connected | LinkState::Connecting => {
                // The worker died on its own while the link was supposed to
                // be up. No automatic retry.
                self.set_state(&mut inner, LinkState::Disconnected);
                self.persist(false);
                let reason = match result {
                    Ok(()) => "finished".to_string(),
                    Err(e) => e.to_string(),
                };
                self.publish(
                    Event::now(EventKind::WorkerAborted)
                        .with_state(LinkState::Disconnected)
                        .with_reason(reason),
                );
            }
            LinkState::Disconnected => {}
        }
    }

    /// Watchdog path: the join grace elapsed before the worker exited.
    fn join_grace_elapsed(&self, epoch: u64) {
        let mut inner = self.locked();
        if inner.handle.as_ref().map(|h| h.epoch) != Some(epoch) {
            // Worker joined in time; nothing to abandon.
            return;
        }
        // Dropping the handle detaches the driver task: a possible resource
        // leak, accepted over blocking the caller.
        inner.handle = None;
        self.set_state(&mut inner, LinkState::Disconnected);
        self.publish(
            Event::now(EventKind::JoinTimedOut)
                .with_state(LinkState::Disconnected)
                .with_grace(self.cfg.join_grace),
        );
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    /// Spawns the worker context and moves the link to `Connected`.
    ///
    /// Caller holds the lock and has already verified no handle exists.
    fn spawn_worker(&self, inner: &mut Inner) {
        inner.epoch += 1;
        let epoch = inner.epoch;

        let cancel = CancellationToken::new();
        let (progress, mut progress_rx) =
            Progress::channel(self.cfg.progress_capacity_clamped());

        let Some(sup) = self.weak.upgrade() else {
            return;
        };

        // Progress pump: marshals reports from the worker's context back
        // through the supervisor's lock before anything touches observers.
        {
            let sup = Arc::clone(&sup);
            tokio::spawn(async move {
                while let Some(percent) = progress_rx.recv().await {
                    sup.worker_progress(epoch, percent);
                }
            });
        }

        let worker = Arc::clone(&self.worker);
        let token = cancel.clone();
        let start_value = self.cfg.start_value;
        let join = tokio::spawn(async move {
            // A panicking worker must still produce an exit signal, or the
            // state machine would wedge in Connected/Disconnecting.
            let fut = worker.run(start_value, progress, token);
            let result = match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result,
                Err(_panic) => Err(crate::error::WorkerError::Fatal {
                    error: "worker panicked".into(),
                }),
            };
            sup.worker_exited(epoch, result);
        });

        inner.handle = Some(WorkerHandle {
            cancel,
            join: Some(join),
            epoch,
        });
        self.set_state(inner, LinkState::Connected);
        self.publish(Event::now(EventKind::WorkerSpawned).with_state(LinkState::Connected));
    }

    /// Acquires the mutual-exclusion boundary.
    ///
    /// A poisoned lock means a publish panicked mid-transition; the state
    /// itself is still coherent, so the guard is recovered rather than
    /// propagating the panic into every later operation.
    fn locked(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Transitions the state and refreshes the lock-free mirror.
    fn set_state(&self, inner: &mut Inner, next: LinkState) {
        inner.state = next;
        self.state_cell.store(next as u8, AtomicOrdering::SeqCst);
    }

    /// Writes the persisted flag; failures are non-fatal and logged.
    fn persist(&self, connected: bool) {
        if let Err(e) = self.store.store(connected) {
            eprintln!("[linkvisor] state store write failed: {e}");
        }
    }

    /// Publishes to the bus and fans out to subscribers.
    ///
    /// Called while holding the lock; both paths are non-blocking, and
    /// publishing under the lock keeps event order equal to transition
    /// order.
    fn publish(&self, ev: Event) {
        self.subs.emit(&ev);
        self.bus.publish(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkerError;
    use crate::gate::OpenGate;
    use crate::persist::MemoryStore;
    use crate::workers::WorkerFn;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct RecordingSink {
        texts: StdMutex<Vec<String>>,
        percents: StdMutex<Vec<u8>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                texts: StdMutex::new(Vec::new()),
                percents: StdMutex::new(Vec::new()),
            })
        }

        fn last_text(&self) -> Option<String> {
            self.texts.lock().unwrap().last().cloned()
        }

        fn percents(&self) -> Vec<u8> {
            self.percents.lock().unwrap().clone()
        }
    }

    impl StatusSink for RecordingSink {
        fn set_text(&self, text: &str) {
            self.texts.lock().unwrap().push(text.to_string());
        }
        fn set_progress(&self, percent: u8) {
            self.percents.lock().unwrap().push(percent);
        }
    }

    /// Gate that never grants up front and records every prompt.
    struct ManualGate {
        requests: StdMutex<Vec<String>>,
    }

    impl ManualGate {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                requests: StdMutex::new(Vec::new()),
            })
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl PermissionGate for ManualGate {
        fn is_granted(&self, _capability: &str) -> bool {
            false
        }
        fn request(&self, capability: &str) {
            self.requests.lock().unwrap().push(capability.to_string());
        }
    }

    /// Counters shared with test workers.
    #[derive(Default)]
    struct WorkerProbe {
        spawns: AtomicUsize,
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    impl WorkerProbe {
        fn enter(&self) {
            self.spawns.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
        }
        fn exit(&self) {
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
        fn spawns(&self) -> usize {
            self.spawns.load(Ordering::SeqCst)
        }
        fn active(&self) -> usize {
            self.active.load(Ordering::SeqCst)
        }
        fn max_active(&self) -> usize {
            self.max_active.load(Ordering::SeqCst)
        }
    }

    /// Worker that streams until cancelled, exiting cooperatively.
    fn obedient_worker(probe: Arc<WorkerProbe>) -> WorkerRef {
        WorkerFn::arc("obedient", move |_start: u64, _progress: Progress, ctx: CancellationToken| {
            let probe = Arc::clone(&probe);
            async move {
                probe.enter();
                ctx.cancelled().await;
                probe.exit();
                Err::<(), WorkerError>(WorkerError::Canceled)
            }
        })
    }

    /// Worker that dies on its own shortly after spawning.
    fn crashing_worker(probe: Arc<WorkerProbe>) -> WorkerRef {
        WorkerFn::arc("crashing", move |_start: u64, _progress: Progress, _ctx: CancellationToken| {
            let probe = Arc::clone(&probe);
            async move {
                probe.enter();
                tokio::time::sleep(Duration::from_millis(10)).await;
                probe.exit();
                Err::<(), WorkerError>(WorkerError::Fail {
                    error: "peer reset".into(),
                })
            }
        })
    }

    /// Worker that ignores its cancellation token for a long time.
    fn stubborn_worker() -> WorkerRef {
        WorkerFn::arc("stubborn", move |_start: u64, _progress: Progress, _ctx: CancellationToken| async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<(), WorkerError>(())
        })
    }

    fn sup_with(
        cfg: Config,
        worker: WorkerRef,
        gate: Arc<dyn PermissionGate>,
        sink: Arc<dyn StatusSink>,
        store: Arc<dyn StateStore>,
    ) -> Arc<Supervisor> {
        Supervisor::new(cfg, worker, gate, sink, store, Vec::new())
    }

    async fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for: {what}");
    }

    fn drain_kinds(rx: &mut broadcast::Receiver<Event>) -> Vec<EventKind> {
        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        kinds
    }

    #[tokio::test]
    async fn start_with_open_gate_reaches_connected_and_persists() {
        let probe = Arc::new(WorkerProbe::default());
        let store = Arc::new(MemoryStore::default());
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            Arc::new(OpenGate),
            RecordingSink::new(),
            store.clone(),
        );

        assert_eq!(sup.start(), LinkState::Connected);
        assert!(store.load().unwrap());
        wait_until("worker running", || probe.active() == 1).await;
        assert_eq!(probe.spawns(), 1);
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let probe = Arc::new(WorkerProbe::default());
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            Arc::new(OpenGate),
            RecordingSink::new(),
            Arc::new(MemoryStore::default()),
        );

        assert_eq!(sup.start(), LinkState::Connected);
        assert_eq!(sup.start(), LinkState::Connected);
        wait_until("worker running", || probe.active() == 1).await;
        assert_eq!(probe.spawns(), 1);
    }

    #[tokio::test]
    async fn stop_while_disconnected_is_a_noop() {
        let probe = Arc::new(WorkerProbe::default());
        let store = Arc::new(MemoryStore::default());
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            Arc::new(OpenGate),
            RecordingSink::new(),
            store.clone(),
        );

        assert_eq!(sup.stop(), LinkState::Disconnected);
        assert_eq!(store.write_count(), 0);
        assert_eq!(probe.spawns(), 0);
    }

    #[tokio::test]
    async fn permission_denied_aborts_the_start() {
        let probe = Arc::new(WorkerProbe::default());
        let gate = ManualGate::new();
        let store = Arc::new(MemoryStore::default());
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            gate.clone(),
            RecordingSink::new(),
            store.clone(),
        );

        assert_eq!(sup.start(), LinkState::Connecting);
        assert!(store.load().unwrap());
        assert_eq!(gate.request_count(), 1);

        assert_eq!(sup.on_permission_result(false), LinkState::Disconnected);
        assert!(!store.load().unwrap());
        assert_eq!(probe.spawns(), 0);
    }

    #[tokio::test]
    async fn permission_granted_spawns_the_worker() {
        let probe = Arc::new(WorkerProbe::default());
        let gate = ManualGate::new();
        let store = Arc::new(MemoryStore::default());
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            gate.clone(),
            RecordingSink::new(),
            store.clone(),
        );

        assert_eq!(sup.start(), LinkState::Connecting);
        assert_eq!(sup.on_permission_result(true), LinkState::Connected);
        assert!(store.load().unwrap());
        wait_until("worker running", || probe.active() == 1).await;
        assert_eq!(probe.spawns(), 1);
    }

    #[tokio::test]
    async fn second_start_while_permission_pending_is_a_noop() {
        let probe = Arc::new(WorkerProbe::default());
        let gate = ManualGate::new();
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            gate.clone(),
            RecordingSink::new(),
            Arc::new(MemoryStore::default()),
        );

        assert_eq!(sup.start(), LinkState::Connecting);
        assert_eq!(sup.start(), LinkState::Connecting);
        assert_eq!(gate.request_count(), 1);
    }

    #[tokio::test]
    async fn permission_result_without_pending_start_is_a_noop() {
        let probe = Arc::new(WorkerProbe::default());
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            ManualGate::new(),
            RecordingSink::new(),
            Arc::new(MemoryStore::default()),
        );

        assert_eq!(sup.on_permission_result(true), LinkState::Disconnected);
        assert_eq!(probe.spawns(), 0);
    }

    #[tokio::test]
    async fn stop_from_pending_permission_aborts_without_a_worker() {
        let probe = Arc::new(WorkerProbe::default());
        let gate = ManualGate::new();
        let store = Arc::new(MemoryStore::default());
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            gate.clone(),
            RecordingSink::new(),
            store.clone(),
        );

        assert_eq!(sup.start(), LinkState::Connecting);
        assert_eq!(sup.stop(), LinkState::Disconnected);
        assert!(!store.load().unwrap());

        // The late verdict finds nothing pending.
        assert_eq!(sup.on_permission_result(true), LinkState::Disconnected);
        assert_eq!(probe.spawns(), 0);
    }

    #[tokio::test]
    async fn stop_persists_immediately_and_joins_within_grace() {
        let probe = Arc::new(WorkerProbe::default());
        let store = Arc::new(MemoryStore::default());
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            Arc::new(OpenGate),
            RecordingSink::new(),
            store.clone(),
        );
        let mut rx = sup.subscribe();

        sup.start();
        wait_until("worker running", || probe.active() == 1).await;

        assert_eq!(sup.stop(), LinkState::Disconnecting);
        assert!(!store.load().unwrap());

        wait_until("worker joined", || {
            sup.current_state() == LinkState::Disconnected
        })
        .await;
        assert_eq!(probe.active(), 0);
        assert!(drain_kinds(&mut rx).contains(&EventKind::WorkerJoined));
    }

    #[tokio::test]
    async fn unexpected_worker_exit_drops_the_link() {
        let probe = Arc::new(WorkerProbe::default());
        let store = Arc::new(MemoryStore::default());
        let sup = sup_with(
            Config::default(),
            crashing_worker(probe.clone()),
            Arc::new(OpenGate),
            RecordingSink::new(),
            store.clone(),
        );
        let mut rx = sup.subscribe();

        assert_eq!(sup.start(), LinkState::Connected);
        wait_until("link dropped", || {
            sup.current_state() == LinkState::Disconnected
        })
        .await;

        assert!(!store.load().unwrap());
        let aborted = loop {
            match rx.try_recv() {
                Ok(ev) if ev.kind == EventKind::WorkerAborted => break ev,
                Ok(_) => continue,
                Err(_) => panic!("no WorkerAborted event"),
            }
        };
        assert!(aborted.reason.as_deref().unwrap().contains("peer reset"));

        // No automatic retry: reconnecting takes an explicit start().
        assert_eq!(probe.spawns(), 1);
        assert_eq!(sup.start(), LinkState::Connected);
        wait_until("second spawn", || probe.spawns() == 2).await;
    }

    #[tokio::test]
    async fn stubborn_worker_is_abandoned_after_the_grace() {
        let cfg = Config {
            join_grace: Duration::from_millis(100),
            ..Config::default()
        };
        let sup = sup_with(
            cfg,
            stubborn_worker(),
            Arc::new(OpenGate),
            RecordingSink::new(),
            Arc::new(MemoryStore::default()),
        );
        let mut rx = sup.subscribe();

        sup.start();
        assert_eq!(sup.stop(), LinkState::Disconnecting);

        wait_until("context abandoned", || {
            sup.current_state() == LinkState::Disconnected
        })
        .await;
        assert!(drain_kinds(&mut rx).contains(&EventKind::JoinTimedOut));
    }

    #[tokio::test]
    async fn late_progress_after_stop_never_reaches_the_sink() {
        let probe = Arc::new(WorkerProbe::default());
        let sink = RecordingSink::new();
        let slot: Arc<StdMutex<Option<Progress>>> = Arc::new(StdMutex::new(None));

        let worker = {
            let probe = Arc::clone(&probe);
            let slot = Arc::clone(&slot);
            WorkerFn::arc("probe", move |_start: u64, progress: Progress, ctx: CancellationToken| {
                let probe = Arc::clone(&probe);
                let slot = Arc::clone(&slot);
                async move {
                    probe.enter();
                    *slot.lock().unwrap() = Some(progress);
                    ctx.cancelled().await;
                    probe.exit();
                    Err::<(), WorkerError>(WorkerError::Canceled)
                }
            })
        };

        let sup = sup_with(
            Config::default(),
            worker,
            Arc::new(OpenGate),
            sink.clone(),
            Arc::new(MemoryStore::default()),
        );

        sup.start();
        wait_until("worker running", || probe.active() == 1).await;
        let reporter = slot.lock().unwrap().clone().unwrap();

        for pct in [0, 25, 50] {
            reporter.report(pct);
        }
        wait_until("progress rendered", || sink.percents() == vec![0, 25, 50]).await;

        sup.stop();
        wait_until("worker joined", || {
            sup.current_state() == LinkState::Disconnected
        })
        .await;

        reporter.report(75);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(sink.percents(), vec![0, 25, 50]);
        assert_eq!(sink.last_text().as_deref(), Some("Disconnected"));
    }

    #[tokio::test]
    async fn host_progress_is_clamped_and_state_guarded() {
        let probe = Arc::new(WorkerProbe::default());
        let sink = RecordingSink::new();
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            Arc::new(OpenGate),
            sink.clone(),
            Arc::new(MemoryStore::default()),
        );

        // Dropped while Disconnected.
        sup.on_progress(40);

        sup.start();
        wait_until("worker running", || probe.active() == 1).await;
        sup.on_progress(150);
        wait_until("clamped progress rendered", || {
            sink.percents() == vec![100]
        })
        .await;
    }

    #[tokio::test]
    async fn resume_reconnects_when_the_flag_was_persisted() {
        let probe = Arc::new(WorkerProbe::default());
        let store = Arc::new(MemoryStore::with_flag(true));
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            Arc::new(OpenGate),
            RecordingSink::new(),
            store.clone(),
        );

        // No explicit start(): the restart contract alone reconnects.
        assert_eq!(sup.resume(), LinkState::Connected);
        wait_until("worker running", || probe.active() == 1).await;

        // The seeded flag is consumed: a later resume after stop() stays down.
        sup.stop();
        wait_until("worker joined", || {
            sup.current_state() == LinkState::Disconnected
        })
        .await;
        assert_eq!(sup.resume(), LinkState::Disconnected);
        assert_eq!(probe.spawns(), 1);
    }

    #[tokio::test]
    async fn resume_is_a_noop_without_the_flag() {
        let probe = Arc::new(WorkerProbe::default());
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            Arc::new(OpenGate),
            RecordingSink::new(),
            Arc::new(MemoryStore::default()),
        );

        assert_eq!(sup.resume(), LinkState::Disconnected);
        assert_eq!(probe.spawns(), 0);
    }

    #[tokio::test]
    async fn at_most_one_worker_across_start_stop_cycles() {
        let probe = Arc::new(WorkerProbe::default());
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            Arc::new(OpenGate),
            RecordingSink::new(),
            Arc::new(MemoryStore::default()),
        );

        for round in 0..3 {
            sup.start();
            sup.start();
            wait_until("worker running", || probe.active() == 1).await;
            sup.stop();
            sup.stop();
            wait_until("worker joined", || {
                sup.current_state() == LinkState::Disconnected
            })
            .await;
            assert_eq!(probe.spawns(), round + 1);
        }
        assert_eq!(probe.max_active(), 1);
    }

    #[tokio::test]
    async fn start_during_disconnecting_is_refused() {
        let cfg = Config {
            join_grace: Duration::from_millis(200),
            ..Config::default()
        };
        let sup = sup_with(
            cfg,
            stubborn_worker(),
            Arc::new(OpenGate),
            RecordingSink::new(),
            Arc::new(MemoryStore::default()),
        );

        sup.start();
        assert_eq!(sup.stop(), LinkState::Disconnecting);
        assert_eq!(sup.start(), LinkState::Disconnecting);

        wait_until("context abandoned", || {
            sup.current_state() == LinkState::Disconnected
        })
        .await;
        assert_eq!(sup.start(), LinkState::Connected);
    }

    #[tokio::test]
    async fn status_text_follows_the_lifecycle() {
        let probe = Arc::new(WorkerProbe::default());
        let sink = RecordingSink::new();
        let gate = ManualGate::new();
        let sup = sup_with(
            Config::default(),
            obedient_worker(probe.clone()),
            gate,
            sink.clone(),
            Arc::new(MemoryStore::default()),
        );

        sup.start();
        wait_until("connecting text", || {
            sink.last_text().as_deref() == Some("Connecting…")
        })
        .await;

        sup.on_permission_result(true);
        wait_until("connected text", || {
            sink.last_text().as_deref() == Some("Connected")
        })
        .await;

        sup.stop();
        wait_until("disconnected text", || {
            sink.last_text().as_deref() == Some("Disconnected")
        })
        .await;
    }
}
