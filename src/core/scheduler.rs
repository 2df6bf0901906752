//! Batched asynchronous delivery
//!
//! Submitted jobs are pushed onto a lock-free queue. A drain thread wakes on
//! new arrivals, takes everything queued so far as one batch and runs it on a
//! fixed worker pool. Jobs sharing a key run in submission order on a single
//! worker, and a batch completes before the next one is taken, so per-key
//! ordering holds across batches.
//!
//! While idle the drain thread backs off: every empty check adds
//! `backoff_step` to the wait, up to `backoff_ceiling`. A submission wakes the
//! drain thread immediately and resets the wait to zero.

use super::error::{panic_message, LoggerError, Result};
use super::metrics::LoggerMetrics;
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use crossbeam_queue::SegQueue;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default shutdown timeout for scheduler cleanup (5 seconds)
///
/// Used when a scheduler is dropped without an explicit `shutdown()`.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Name prefix shared by the drain thread and the workers
pub const THREAD_PREFIX: &str = "event-batch";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

type Job = Box<dyn FnOnce() + Send + 'static>;
type Task = Box<dyn FnOnce() + Send + 'static>;

/// Tuning for [`BatchScheduler`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Worker threads draining batches
    pub workers: usize,
    /// Added to the idle wait after every empty check
    pub backoff_step: Duration,
    /// Upper bound for the idle wait
    pub backoff_ceiling: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            backoff_step: Duration::from_millis(100),
            backoff_ceiling: Duration::from_millis(3000),
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(LoggerError::config(
                "SchedulerConfig",
                "at least one worker is required",
            ));
        }
        if duration_micros(self.backoff_step) == 0 {
            return Err(LoggerError::config(
                "SchedulerConfig",
                "backoff_step must be at least one microsecond",
            ));
        }
        if self.backoff_ceiling < self.backoff_step {
            return Err(LoggerError::config(
                "SchedulerConfig",
                format!(
                    "backoff_ceiling ({:?}) is smaller than backoff_step ({:?})",
                    self.backoff_ceiling, self.backoff_step
                ),
            ));
        }
        Ok(())
    }
}

fn duration_micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

struct Shared {
    queue: SegQueue<(Arc<str>, Job)>,
    /// Submitted but not yet finished
    pending: AtomicUsize,
    /// Idle wait in microseconds
    idle_offset_us: AtomicU64,
    step_us: u64,
    ceiling_us: u64,
    metrics: Arc<LoggerMetrics>,
}

impl Shared {
    fn take_batch(&self) -> Vec<(Arc<str>, Job)> {
        let mut batch = Vec::with_capacity(self.queue.len());
        while let Some(item) = self.queue.pop() {
            batch.push(item);
        }
        batch
    }

    fn back_off(&self) {
        let current = self.idle_offset_us.load(Ordering::Relaxed);
        let next = current.saturating_add(self.step_us).min(self.ceiling_us);
        self.idle_offset_us.store(next, Ordering::Relaxed);
    }

    fn run_group(&self, group: Vec<Job>) {
        for job in group {
            if let Err(panic_info) = catch_unwind(AssertUnwindSafe(job)) {
                eprintln!(
                    "[LOGGER CRITICAL] Batched delivery panicked: {}. \
                     Remaining jobs continue.",
                    panic_message(panic_info.as_ref())
                );
            }
            self.pending.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

/// Split a batch into per-key groups, keeping first-seen key order and
/// submission order within each key
fn group_by_key(batch: Vec<(Arc<str>, Job)>) -> Vec<Vec<Job>> {
    let mut keys: Vec<Arc<str>> = Vec::new();
    let mut groups: Vec<Vec<Job>> = Vec::new();
    for (key, job) in batch {
        match keys.iter().position(|k| *k == key) {
            Some(idx) => groups[idx].push(job),
            None => {
                keys.push(key);
                groups.push(vec![job]);
            }
        }
    }
    groups
}

struct WorkerPool {
    sender: Option<Sender<Task>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    fn new(size: usize) -> Result<Self> {
        let (sender, receiver) = unbounded::<Task>();
        let mut handles = Vec::with_capacity(size);

        for idx in 0..size {
            let receiver = receiver.clone();
            let name = format!("{}-worker-{}", THREAD_PREFIX, idx);
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || {
                    for task in receiver.iter() {
                        task();
                    }
                })
                .map_err(|source| LoggerError::WorkerSpawn { name, source })?;
            handles.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            handles,
        })
    }

    /// Run every group on the pool and wait until all of them finished
    fn run_all(&self, shared: &Arc<Shared>, groups: Vec<Vec<Job>>) {
        let (done_tx, done_rx) = bounded::<()>(groups.len());
        let mut submitted = 0;

        for group in groups {
            let shared_clone = Arc::clone(shared);
            let done = done_tx.clone();
            let task: Task = Box::new(move || {
                shared_clone.run_group(group);
                let _ = done.send(());
            });

            match self.sender.as_ref() {
                Some(sender) => match sender.send(task) {
                    Ok(()) => submitted += 1,
                    Err(crossbeam_channel::SendError(task)) => task(),
                },
                None => task(),
            }
        }
        drop(done_tx);

        for _ in 0..submitted {
            if done_rx.recv().is_err() {
                eprintln!("[LOGGER ERROR] Batch worker exited before finishing its group");
                break;
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        drop(self.sender.take());
        for handle in self.handles.drain(..) {
            if let Err(e) = handle.join() {
                eprintln!("[LOGGER ERROR] Batch worker panicked: {:?}", e);
            }
        }
    }
}

fn drain_loop(shared: Arc<Shared>, wake: Receiver<()>, pool: WorkerPool) {
    loop {
        let wait = Duration::from_micros(shared.idle_offset_us.load(Ordering::Relaxed));
        let disconnected = matches!(
            wake.recv_timeout(wait),
            Err(RecvTimeoutError::Disconnected)
        );

        let batch = shared.take_batch();
        if batch.is_empty() {
            if disconnected {
                break;
            }
            shared.back_off();
            continue;
        }

        shared.idle_offset_us.store(0, Ordering::Relaxed);
        pool.run_all(&shared, group_by_key(batch));
        shared.metrics.record_batch();
    }
}

fn on_scheduler_thread() -> bool {
    thread::current()
        .name()
        .is_some_and(|name| name.starts_with(THREAD_PREFIX))
}

/// Background batch executor
pub struct BatchScheduler {
    shared: Arc<Shared>,
    wake: Mutex<Option<Sender<()>>>,
    drain_handle: Mutex<Option<JoinHandle<()>>>,
    config: SchedulerConfig,
}

impl BatchScheduler {
    /// Spawn the drain thread and worker pool
    pub fn new(config: SchedulerConfig, metrics: Arc<LoggerMetrics>) -> Result<Self> {
        config.validate()?;

        let shared = Arc::new(Shared {
            queue: SegQueue::new(),
            pending: AtomicUsize::new(0),
            idle_offset_us: AtomicU64::new(0),
            step_us: duration_micros(config.backoff_step),
            ceiling_us: duration_micros(config.backoff_ceiling),
            metrics,
        });

        let pool = WorkerPool::new(config.workers)?;
        let (wake_tx, wake_rx) = bounded::<()>(1);
        let shared_clone = Arc::clone(&shared);
        let name = format!("{}-drain", THREAD_PREFIX);
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || drain_loop(shared_clone, wake_rx, pool))
            .map_err(|source| LoggerError::WorkerSpawn { name, source })?;

        Ok(Self {
            shared,
            wake: Mutex::new(Some(wake_tx)),
            drain_handle: Mutex::new(Some(handle)),
            config,
        })
    }

    /// Queue `job` under `key`. Never blocks.
    pub fn submit<F>(&self, key: Arc<str>, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let wake = self.wake.lock();
        let sender = wake.as_ref().ok_or(LoggerError::SchedulerStopped)?;

        let job: Job = Box::new(job);
        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        self.shared.queue.push((key, job));
        self.shared.idle_offset_us.store(0, Ordering::Relaxed);

        match sender.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => Ok(()),
            Err(TrySendError::Disconnected(())) => {
                eprintln!("[LOGGER ERROR] Batch drain thread is gone; queued job may not run");
                Ok(())
            }
        }
    }

    /// Jobs submitted and not yet finished
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    /// Current idle wait of the drain thread
    pub fn idle_offset(&self) -> Duration {
        Duration::from_micros(self.shared.idle_offset_us.load(Ordering::Relaxed))
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.wake.lock().is_some()
    }

    /// Wait until every submitted job has run. Returns `false` on timeout.
    ///
    /// Called from a scheduler thread this only reports the current state,
    /// since waiting there could never succeed.
    pub fn flush(&self, timeout: Duration) -> bool {
        if on_scheduler_thread() {
            return self.pending() == 0;
        }
        let start = Instant::now();
        while self.pending() > 0 {
            if start.elapsed() >= timeout {
                return false;
            }
            thread::sleep(POLL_INTERVAL);
        }
        true
    }

    /// Stop accepting jobs, drain what is queued and join the drain thread
    ///
    /// Returns `true` if the drain thread finished within `timeout`.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        drop(self.wake.lock().take());

        let Some(handle) = self.drain_handle.lock().take() else {
            return true;
        };

        if on_scheduler_thread() {
            // The drain thread exits on its own once the queue is empty
            return true;
        }

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!(
                        "[LOGGER ERROR] Batch drain thread panicked during shutdown: {:?}",
                        e
                    );
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Batch drain thread did not finish within {:?}. \
                     {} queued events may not be delivered.",
                    timeout,
                    self.pending()
                );
                return false;
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Drop for BatchScheduler {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}

impl std::fmt::Debug for BatchScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScheduler")
            .field("config", &self.config)
            .field("pending", &self.pending())
            .field("running", &self.is_running())
            .finish()
    }
}
