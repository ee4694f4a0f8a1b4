//! The parallel request pool.
//!
//! A fixed set of worker tasks executes queued HTTP requests against one
//! backend. Submission never blocks; callers get a [`ResultFuture`] back and
//! retrieve the outcome whenever they want it. Dispatch is strict FIFO, one
//! request per worker at a time, so at most `n_workers` round trips are ever
//! in flight.

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use crate::request::{RequestDescriptor, ResponseRecord};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Lifecycle state of a single worker.
///
/// `Idle → Busy` on assignment, `Busy → Idle` on completion, and either state
/// moves to `Stopped` on shutdown. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Busy,
    Stopped,
}

/// Point-in-time view of one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSnapshot {
    pub id: usize,
    pub state: WorkerState,
    pub assigned_request_id: Option<u64>,
}

/// Caller-visible handle used to retrieve one request's outcome.
///
/// The record is retained after delivery: waiting twice returns the same
/// record, and a timed-out wait can simply be retried.
#[derive(Debug, Clone)]
pub struct ResultFuture {
    id: u64,
    rx: watch::Receiver<Option<ResponseRecord>>,
}

impl ResultFuture {
    /// The request id this handle correlates to.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the record if it already exists, without suspending.
    pub fn try_get(&self) -> Option<ResponseRecord> {
        self.rx.borrow().clone()
    }

    /// Suspends until the request's record exists.
    pub async fn wait(&mut self) -> Result<ResponseRecord> {
        let record = self
            .rx
            .wait_for(|record| record.is_some())
            .await
            .map_err(|_| Error::Cancelled)?
            .as_ref()
            .cloned();
        record.ok_or(Error::Cancelled)
    }

    /// Like [`wait`](Self::wait), but gives up after `timeout`.
    ///
    /// The `Timeout` outcome is a retrieval deadline, not a request failure:
    /// the request keeps running and a later `wait` still yields its record.
    pub async fn wait_timeout(&mut self, timeout: Duration) -> Result<ResponseRecord> {
        match tokio::time::timeout(timeout, self.wait()).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout),
        }
    }
}

struct QueuedRequest {
    id: u64,
    descriptor: RequestDescriptor,
    tx: watch::Sender<Option<ResponseRecord>>,
}

struct WorkerSlot {
    state: WorkerState,
    assigned: Option<u64>,
}

struct PoolState {
    queue: VecDeque<QueuedRequest>,
    workers: Vec<WorkerSlot>,
    inflight: usize,
    closed: bool,
}

struct Shared {
    config: ConnectionConfig,
    http: reqwest::Client,
    state: Mutex<PoolState>,
    /// Wakes a parked worker when the queue gains an entry.
    work_ready: Notify,
    /// Wakes shutdown waiters whenever a request finishes.
    request_done: Notify,
    next_id: AtomicU64,
    shutdown_tx: watch::Sender<bool>,
}

impl Shared {
    fn lock_state(&self) -> std::sync::MutexGuard<'_, PoolState> {
        self.state.lock().expect("pool state lock poisoned")
    }
}

/// Fixed-size pool of worker tasks sharing one backend target.
///
/// Workers pull the oldest queued descriptor as soon as they go idle; no
/// worker idles while the queue is non-empty. A failing request is captured
/// into its own [`ResponseRecord`] and never disables the worker or the pool.
pub struct WorkerPool {
    shared: Arc<Shared>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Creates a pool of `n_workers` idle workers bound to `config`.
    pub fn new(n_workers: usize, config: ConnectionConfig) -> Result<Self> {
        if n_workers < 1 {
            return Err(Error::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let shared = Arc::new(Shared {
            config,
            http,
            state: Mutex::new(PoolState {
                queue: VecDeque::new(),
                workers: (0..n_workers)
                    .map(|_| WorkerSlot {
                        state: WorkerState::Idle,
                        assigned: None,
                    })
                    .collect(),
                inflight: 0,
                closed: false,
            }),
            work_ready: Notify::new(),
            request_done: Notify::new(),
            next_id: AtomicU64::new(1),
            shutdown_tx,
        });

        let handles = (0..n_workers)
            .map(|worker_id| {
                let shared = Arc::clone(&shared);
                let shutdown_rx = shutdown_rx.clone();
                tokio::spawn(worker_loop(worker_id, shared, shutdown_rx))
            })
            .collect();

        debug!(n_workers, "worker pool started");
        Ok(Self {
            shared,
            handles: Mutex::new(handles),
        })
    }

    /// Queues a descriptor for execution and returns its result handle.
    ///
    /// Never blocks: the descriptor joins the FIFO queue and an idle worker,
    /// if any, picks it up immediately.
    pub fn submit(&self, descriptor: RequestDescriptor) -> Result<ResultFuture> {
        let (tx, rx) = watch::channel(None);
        let id = {
            let mut state = self.shared.lock_state();
            if state.closed {
                return Err(Error::PoolClosed);
            }
            let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
            state.queue.push_back(QueuedRequest {
                id,
                descriptor,
                tx,
            });
            id
        };
        self.shared.work_ready.notify_one();
        debug!(request_id = id, "request queued");
        Ok(ResultFuture { id, rx })
    }

    /// Submits descriptors in order; handles come back in the same order.
    ///
    /// Completion order across workers is unordered; callers that need
    /// input-order output must reassemble from these handles.
    pub fn batch_submit(&self, descriptors: Vec<RequestDescriptor>) -> Result<Vec<ResultFuture>> {
        descriptors
            .into_iter()
            .map(|descriptor| self.submit(descriptor))
            .collect()
    }

    /// Snapshot of every worker's lifecycle state.
    pub fn worker_states(&self) -> Vec<WorkerState> {
        self.workers().into_iter().map(|w| w.state).collect()
    }

    /// Point-in-time view of every worker, including the request it is
    /// currently servicing. At most one worker is ever assigned to a given
    /// in-flight request.
    pub fn workers(&self) -> Vec<WorkerSnapshot> {
        self.shared
            .lock_state()
            .workers
            .iter()
            .enumerate()
            .map(|(id, worker)| WorkerSnapshot {
                id,
                state: worker.state,
                assigned_request_id: worker.assigned,
            })
            .collect()
    }

    /// Number of descriptors queued but not yet dispatched.
    pub fn queued_len(&self) -> usize {
        self.shared.lock_state().queue.len()
    }

    /// Closes the pool to new submissions and releases its workers.
    ///
    /// Idempotent. With `wait` set, returns only after every queued and
    /// in-flight descriptor has produced a record. Without it, still-queued
    /// descriptors resolve to `Cancelled`; requests already handed to a
    /// worker cannot be interrupted and run to completion in both modes.
    pub async fn shutdown(&self, wait: bool) {
        let cancelled = {
            let mut state = self.shared.lock_state();
            state.closed = true;
            if wait {
                Vec::new()
            } else {
                state.queue.drain(..).collect::<Vec<_>>()
            }
        };
        for request in cancelled {
            debug!(request_id = request.id, "request cancelled before dispatch");
            let _ = request
                .tx
                .send(Some(ResponseRecord::failure(request.id, Error::Cancelled)));
        }

        let _ = self.shared.shutdown_tx.send(true);
        // wake any worker parked on an empty queue so it observes the close
        self.shared.work_ready.notify_waiters();

        loop {
            let done = self.shared.request_done.notified();
            {
                let state = self.shared.lock_state();
                if state.queue.is_empty() && state.inflight == 0 {
                    break;
                }
            }
            done.await;
        }

        let handles = std::mem::take(&mut *self.handles.lock().expect("pool handles lock poisoned"));
        for handle in handles {
            if let Err(err) = handle.await {
                warn!(error = %err, "worker task failed to join");
            }
        }
        debug!("worker pool shut down");
    }
}

impl Drop for WorkerPool {
    /// Last-resort release for pools dropped without an explicit `shutdown`:
    /// closes the queue and cancels undispatched work. In-flight requests
    /// drain in the background before their workers stop.
    fn drop(&mut self) {
        let cancelled = {
            let mut state = match self.shared.state.lock() {
                Ok(state) => state,
                Err(_) => return,
            };
            if state.closed {
                Vec::new()
            } else {
                state.closed = true;
                state.queue.drain(..).collect::<Vec<_>>()
            }
        };
        for request in cancelled {
            let _ = request
                .tx
                .send(Some(ResponseRecord::failure(request.id, Error::Cancelled)));
        }
        let _ = self.shared.shutdown_tx.send(true);
        self.shared.work_ready.notify_waiters();
    }
}

enum Step {
    Run(QueuedRequest),
    Park,
    Stop,
}

async fn worker_loop(
    worker_id: usize,
    shared: Arc<Shared>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        // register for wakeups before checking the queue, so a submission
        // racing this check cannot be missed
        let ready = shared.work_ready.notified();

        let step = {
            let mut state = shared.lock_state();
            if let Some(request) = state.queue.pop_front() {
                state.inflight += 1;
                state.workers[worker_id].state = WorkerState::Busy;
                state.workers[worker_id].assigned = Some(request.id);
                if !state.queue.is_empty() {
                    // more work remains; wake another parked worker
                    shared.work_ready.notify_one();
                }
                Step::Run(request)
            } else if state.closed {
                state.workers[worker_id].state = WorkerState::Stopped;
                state.workers[worker_id].assigned = None;
                Step::Stop
            } else {
                Step::Park
            }
        };

        match step {
            Step::Run(request) => {
                let record = execute(&shared, &request.descriptor, request.id).await;
                if request.tx.send(Some(record)).is_err() {
                    debug!(
                        worker_id,
                        request_id = request.id,
                        "result handle dropped before delivery"
                    );
                }
                {
                    let mut state = shared.lock_state();
                    state.inflight -= 1;
                    state.workers[worker_id].state = WorkerState::Idle;
                    state.workers[worker_id].assigned = None;
                }
                shared.request_done.notify_waiters();
            }
            Step::Park => {
                tokio::select! {
                    _ = ready => {}
                    _ = shutdown_rx.changed() => {}
                }
            }
            Step::Stop => {
                debug!(worker_id, "worker stopped");
                break;
            }
        }
    }
}

/// One full round trip. Every failure mode is captured into the record;
/// nothing escapes to take the worker down.
async fn execute(shared: &Shared, descriptor: &RequestDescriptor, id: u64) -> ResponseRecord {
    let url = shared.config.url_for(descriptor.endpoint());
    let mut request = shared
        .http
        .request(descriptor.method().into(), url);
    if let Some(payload) = descriptor.payload() {
        request = request.json(payload);
    }
    if let Some(timeout) = descriptor.timeout() {
        request = request.timeout(timeout);
    }

    let started = Instant::now();
    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => {
            warn!(request_id = id, error = %err, "request failed");
            return ResponseRecord::failure(id, Error::Connection(err.to_string()));
        }
    };

    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => {
            debug!(
                request_id = id,
                status,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "request completed"
            );
            ResponseRecord::success(id, status, body)
        }
        Err(err) => {
            warn!(request_id = id, error = %err, "failed to read response body");
            ResponseRecord::failure(id, Error::Connection(err.to_string()))
        }
    }
}
