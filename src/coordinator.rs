//! Search coordinator - owns the worker pool and the global best
//!
//! The coordinator is responsible for:
//! - Spawning one worker thread per configured worker
//! - Polling the result channel on a fixed cadence
//! - Keeping the global best and reporting improvements
//! - Evaluating stop conditions and shutting the workers down

use crate::channel::ResultChannel;
use crate::config::Settings;
use crate::error::{Result, SearchError};
use crate::report::Reporter;
use crate::score::Candidate;
use crate::seed::Seed;
use crate::worker::{total_generated, Worker, WorkerState, WorkerStats};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Time between polls of the result channel
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long shutdown waits for workers before returning
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Cooperative cancellation token. Cheap to clone, safe to trigger from any
/// thread including a signal handler.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[inline(always)]
    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `request_stop` was called
    Cancelled,
    /// Wall-clock limit exceeded
    TimeLimit,
    /// Global best reached the leading-zero target
    TargetReached,
}

/// Point-in-time view for reporting
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub best: Option<Candidate>,
    pub generated: u64,
    pub elapsed: Duration,
}

/// Result of a finished search
#[derive(Debug)]
pub struct SearchOutcome {
    pub best: Option<Candidate>,
    pub generated: u64,
    pub elapsed: Duration,
    pub reason: StopReason,
    /// Workers that had not exited when the grace period ended
    pub workers_still_running: usize,
}

pub struct Coordinator {
    settings: Arc<Settings>,
    channel: Arc<ResultChannel<Candidate>>,
    stop: StopHandle,
    stats: Vec<Arc<WorkerStats>>,
    handles: Vec<JoinHandle<()>>,
    best: Option<Candidate>,
    start_time: Option<Instant>,
}

impl Coordinator {
    pub fn new(mut settings: Settings) -> Self {
        if settings.worker_count == 0 {
            settings.worker_count = num_cpus::get();
        }

        Self {
            settings: Arc::new(settings),
            channel: Arc::new(ResultChannel::new()),
            stop: StopHandle::new(),
            stats: Vec::new(),
            handles: Vec::new(),
            best: None,
            start_time: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Handle for cancelling the search from another thread
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            best: self.best.clone(),
            generated: total_generated(&self.stats),
            elapsed: self.elapsed(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Run the search until a stop condition fires.
    pub fn run<R: Reporter>(&mut self, reporter: &mut R) -> Result<SearchOutcome> {
        self.start_time = Some(Instant::now());
        info!(
            workers = self.settings.worker_count,
            ranking = ?self.settings.ranking,
            max_duration = self.settings.max_duration,
            target = self.settings.target_leading_zeros,
            "Starting key search"
        );

        if let Err(e) = self.spawn_workers() {
            self.stop.request_stop();
            return Err(e);
        }

        let reason = loop {
            thread::sleep(POLL_INTERVAL);
            self.poll(reporter);

            if let Some(reason) = self.stop_reason(self.elapsed()) {
                break reason;
            }
        };

        let workers_still_running = self.shutdown();

        // Pick up anything published after the last poll.
        self.drain(reporter);

        let snapshot = self.snapshot();
        info!(
            reason = ?reason,
            generated = snapshot.generated,
            elapsed = ?snapshot.elapsed,
            "Search stopped"
        );

        Ok(SearchOutcome {
            best: snapshot.best,
            generated: snapshot.generated,
            elapsed: snapshot.elapsed,
            reason,
            workers_still_running,
        })
    }

    fn spawn_workers(&mut self) -> Result<()> {
        for id in 0..self.settings.worker_count {
            let worker = Worker::new(
                id,
                Seed::random(),
                self.settings.ranking,
                Arc::clone(&self.channel),
                self.stop.clone(),
            );
            self.stats.push(worker.stats());

            let handle = thread::Builder::new()
                .name(format!("keyminer-worker-{}", id))
                .spawn(move || worker.run())
                .map_err(|source| SearchError::Spawn { id, source })?;
            self.handles.push(handle);
        }

        debug!(count = self.handles.len(), "Workers spawned");
        Ok(())
    }

    /// Take at most one published candidate. Returns true on improvement.
    fn poll<R: Reporter>(&mut self, reporter: &mut R) -> bool {
        match self.channel.try_pop() {
            Some(candidate) => self.offer(candidate, reporter),
            None => false,
        }
    }

    fn drain<R: Reporter>(&mut self, reporter: &mut R) {
        while let Some(candidate) = self.channel.try_pop() {
            self.offer(candidate, reporter);
        }
    }

    /// Replace the global best if `candidate` beats it. Returns true on improvement.
    fn offer<R: Reporter>(&mut self, candidate: Candidate, reporter: &mut R) -> bool {
        if !candidate.improves_on(self.best.as_ref(), self.settings.ranking) {
            return false;
        }

        debug!(
            key_score = candidate.key_score(),
            address_score = candidate.address_score(),
            "New global best"
        );
        self.best = Some(candidate);
        reporter.new_best(&self.snapshot());
        true
    }

    /// Stop conditions in priority order.
    fn stop_reason(&self, elapsed: Duration) -> Option<StopReason> {
        if self.stop.is_stop_requested() {
            return Some(StopReason::Cancelled);
        }

        let max_duration = self.settings.max_duration;
        if max_duration != 0 && elapsed.as_secs() > max_duration {
            return Some(StopReason::TimeLimit);
        }

        let target = self.settings.target_leading_zeros;
        if target != 0 && self.best.as_ref().is_some_and(|b| b.key_score() >= target) {
            return Some(StopReason::TargetReached);
        }

        None
    }

    /// Ask workers to stop, wait out the grace period, join those that
    /// exited. Returns how many were still running.
    fn shutdown(&mut self) -> usize {
        self.stop.request_stop();
        thread::sleep(SHUTDOWN_GRACE);

        let mut still_running = 0;
        for handle in self.handles.drain(..) {
            if handle.is_finished() {
                if handle.join().is_err() {
                    warn!("Worker thread panicked");
                }
            } else {
                // Detached; it exits after its current iteration.
                still_running += 1;
            }
        }

        let stopped = self
            .stats
            .iter()
            .filter(|s| s.state() == WorkerState::Stopped)
            .count();
        if still_running > 0 {
            warn!(still_running, stopped, "Workers still running after grace period");
        } else {
            debug!(stopped, "All workers stopped");
        }

        still_running
    }
}
