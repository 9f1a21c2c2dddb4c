//! Unbounded multi-producer mailbox
//!
//! Workers push improvements without ever blocking; the coordinator pulls
//! them with a blocking, timed or non-blocking pop. Items from a single
//! producer come out in push order.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub struct ResultChannel<T> {
    queue: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> ResultChannel<T> {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Enqueue and wake one waiting consumer. Never fails.
    pub fn push(&self, value: T) {
        self.queue.lock().push_back(value);
        self.available.notify_one();
    }

    /// Block until an item is available.
    pub fn pop(&self) -> T {
        let mut queue = self.queue.lock();
        loop {
            if let Some(value) = queue.pop_front() {
                return value;
            }
            self.available.wait(&mut queue);
        }
    }

    /// Block for at most `timeout`; `None` on expiry.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut queue = self.queue.lock();
        loop {
            if let Some(value) = queue.pop_front() {
                return Some(value);
            }
            if self.available.wait_until(&mut queue, deadline).timed_out() {
                return queue.pop_front();
            }
        }
    }

    /// Return immediately; `None` if empty.
    pub fn try_pop(&self) -> Option<T> {
        self.queue.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl<T> Default for ResultChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_fifo_single_producer() {
        let channel = ResultChannel::new();
        for i in 0..5 {
            channel.push(i);
        }
        assert_eq!(channel.len(), 5);
        let drained: Vec<_> = std::iter::from_fn(|| channel.try_pop()).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_try_pop_empty() {
        let channel: ResultChannel<u32> = ResultChannel::new();
        assert_eq!(channel.try_pop(), None);
    }

    #[test]
    fn test_pop_timeout_expires_without_item() {
        let channel: ResultChannel<u32> = ResultChannel::new();
        let start = Instant::now();
        assert_eq!(channel.pop_timeout(Duration::from_millis(50)), None);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_pop_timeout_returns_pushed_item() {
        let channel = Arc::new(ResultChannel::new());
        let producer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                channel.push(7u32);
            })
        };
        assert_eq!(channel.pop_timeout(Duration::from_secs(5)), Some(7));
        producer.join().unwrap();
    }

    #[test]
    fn test_blocking_pop_wakes_on_push() {
        let channel = Arc::new(ResultChannel::new());
        let consumer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.pop())
        };
        thread::sleep(Duration::from_millis(20));
        channel.push("ready");
        assert_eq!(consumer.join().unwrap(), "ready");
    }

    #[test]
    fn test_per_producer_order_preserved() {
        let channel = Arc::new(ResultChannel::new());
        let producers: Vec<_> = (0..4u32)
            .map(|id| {
                let channel = Arc::clone(&channel);
                thread::spawn(move || {
                    for seq in 0..500u32 {
                        channel.push((id, seq));
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }

        let mut next = [0u32; 4];
        while let Some((id, seq)) = channel.try_pop() {
            assert_eq!(seq, next[id as usize]);
            next[id as usize] += 1;
        }
        assert_eq!(next, [500; 4]);
    }
}
