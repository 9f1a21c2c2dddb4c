//! Key generation worker
//!
//! One worker per thread. The worker owns its seed outright, so the hot
//! loop needs no locking: derive a keypair, score it, and publish a copy
//! only when it beats the last candidate this worker published.

use crate::channel::ResultChannel;
use crate::coordinator::StopHandle;
use crate::keys::KeyPair;
use crate::score::{Candidate, Ranking};
use crate::seed::Seed;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    Running = 0,
    StopRequested = 1,
    Stopped = 2,
}

/// Counters a worker shares with the coordinator.
#[derive(Debug)]
pub struct WorkerStats {
    generated: AtomicU64,
    state: AtomicU8,
}

impl Default for WorkerStats {
    fn default() -> Self {
        Self {
            generated: AtomicU64::new(0),
            state: AtomicU8::new(WorkerState::Running as u8),
        }
    }
}

impl WorkerStats {
    pub fn generated(&self) -> u64 {
        self.generated.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> WorkerState {
        match self.state.load(Ordering::Acquire) {
            0 => WorkerState::Running,
            1 => WorkerState::StopRequested,
            _ => WorkerState::Stopped,
        }
    }

    fn set_state(&self, state: WorkerState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

/// Sum of generated keys across workers
pub fn total_generated<'a>(stats: impl IntoIterator<Item = &'a Arc<WorkerStats>>) -> u64 {
    stats.into_iter().map(|s| s.generated()).sum()
}

pub struct Worker {
    id: usize,
    seed: Seed,
    started: bool,
    ranking: Ranking,
    channel: Arc<ResultChannel<Candidate>>,
    stop: StopHandle,
    stats: Arc<WorkerStats>,
    published: Option<Candidate>,
}

impl Worker {
    pub fn new(
        id: usize,
        seed: Seed,
        ranking: Ranking,
        channel: Arc<ResultChannel<Candidate>>,
        stop: StopHandle,
    ) -> Self {
        Self {
            id,
            seed,
            started: false,
            ranking,
            channel,
            stop,
            stats: Arc::new(WorkerStats::default()),
            published: None,
        }
    }

    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Best candidate this worker has pushed so far.
    pub fn published(&self) -> Option<&Candidate> {
        self.published.as_ref()
    }

    /// One iteration. Returns true if the candidate was published.
    #[inline(always)]
    pub fn step(&mut self) -> bool {
        if self.started {
            self.seed.increment();
        } else {
            self.started = true;
        }

        let candidate = Candidate::new(KeyPair::from_seed(&self.seed));
        self.stats.generated.fetch_add(1, Ordering::Relaxed);

        if candidate.improves_on(self.published.as_ref(), self.ranking) {
            self.channel.push(candidate.clone());
            self.published = Some(candidate);
            true
        } else {
            false
        }
    }

    /// Generate until a stop is requested, then wipe key material.
    pub fn run(mut self) {
        debug!(worker = self.id, "Worker started");

        while !self.stop.is_stop_requested() {
            self.step();
        }
        self.stats.set_state(WorkerState::StopRequested);

        let Worker {
            id,
            seed,
            published,
            stats,
            ..
        } = self;
        // Seed and secret keys zero themselves on drop.
        drop(published);
        drop(seed);

        stats.set_state(WorkerState::Stopped);
        debug!(worker = id, generated = stats.generated(), "Worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn worker(seed: Seed, ranking: Ranking) -> (Worker, Arc<ResultChannel<Candidate>>, StopHandle) {
        let channel = Arc::new(ResultChannel::new());
        let stop = StopHandle::new();
        let w = Worker::new(0, seed, ranking, Arc::clone(&channel), stop.clone());
        (w, channel, stop)
    }

    #[test]
    fn test_first_step_uses_initial_seed_and_publishes() {
        let seed = Seed::from_bytes([3; 32]);
        let (mut w, channel, _stop) = worker(seed.clone(), Ranking::KeyBits);

        assert!(w.step());
        assert_eq!(w.stats().generated(), 1);

        let published = channel.try_pop().unwrap();
        assert_eq!(published.keys().seed, seed);
        assert_eq!(published.keys().public, KeyPair::from_seed(&seed).public);
    }

    #[test]
    fn test_later_steps_increment_seed() {
        let (mut w, _channel, _stop) = worker(Seed::from_bytes([0; 32]), Ranking::KeyBits);
        w.step();
        w.step();
        w.step();

        let mut expected = [0u8; 32];
        expected[31] = 2;
        assert_eq!(w.seed.as_bytes(), &expected);
        assert_eq!(w.stats().generated(), 3);
    }

    #[test]
    fn test_publishes_only_local_improvements() {
        let (mut w, channel, _stop) = worker(Seed::random(), Ranking::KeyBits);
        let mut pushes = 0;
        for _ in 0..2_000 {
            if w.step() {
                pushes += 1;
            }
        }

        let published: Vec<_> = std::iter::from_fn(|| channel.try_pop()).collect();
        assert_eq!(published.len(), pushes);
        for pair in published.windows(2) {
            assert!(pair[1].is_better(&pair[0], Ranking::KeyBits));
        }
        let last = published.last().unwrap();
        assert_eq!(last.keys().public, w.published().unwrap().keys().public);
    }

    #[test]
    fn test_run_stops_on_request() {
        let (w, channel, stop) = worker(Seed::random(), Ranking::AddressBlocks);
        let stats = w.stats();
        assert_eq!(stats.state(), WorkerState::Running);

        let handle = thread::spawn(move || w.run());
        thread::sleep(Duration::from_millis(50));
        stop.request_stop();
        handle.join().unwrap();

        assert_eq!(stats.state(), WorkerState::Stopped);
        assert!(stats.generated() > 0);
        assert!(!channel.is_empty());
    }

    #[test]
    fn test_total_generated_sums_workers() {
        let a = Arc::new(WorkerStats::default());
        let b = Arc::new(WorkerStats::default());
        a.generated.store(5, Ordering::Relaxed);
        b.generated.store(7, Ordering::Relaxed);
        assert_eq!(total_generated([&a, &b]), 12);
    }
}
