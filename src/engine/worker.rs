// Sat Jan 17 2026 - Alex

use crate::engine::error::ScanError;
use crate::engine::result::{TaskResult, TaskResultWithMetadata};
use crate::engine::task::WorkUnit;
use crate::engine::traits::Scanner;
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

pub struct QueuedUnit {
    pub unit: WorkUnit,
    pub attempt: u32,
}

struct QueueState {
    items: VecDeque<QueuedUnit>,
    closed: bool,
}

/// FIFO of pending units shared by all workers of a pool.
pub struct TaskQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    pub fn push(&self, unit: WorkUnit, attempt: u32) {
        let mut state = self.state.lock();
        state.items.push_back(QueuedUnit { unit, attempt });
        self.available.notify_one();
    }

    /// Blocks until a unit is available. `None` once the queue is closed.
    pub fn pop(&self) -> Option<QueuedUnit> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return None;
            }
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            self.available.wait(&mut state);
        }
    }

    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.state.lock().items.clear();
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Worker {
    id: usize,
    queue: Arc<TaskQueue>,
    scanner: Arc<dyn Scanner>,
    result_sender: Sender<TaskResultWithMetadata>,
    thread_handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn new(
        id: usize,
        queue: Arc<TaskQueue>,
        scanner: Arc<dyn Scanner>,
        result_sender: Sender<TaskResultWithMetadata>,
    ) -> Self {
        Self {
            id,
            queue,
            scanner,
            result_sender,
            thread_handle: None,
        }
    }

    pub fn start(&mut self) {
        let id = self.id;
        let queue = self.queue.clone();
        let scanner = self.scanner.clone();
        let result_sender = self.result_sender.clone();

        let handle = thread::spawn(move || {
            Worker::worker_loop(id, queue, scanner, result_sender);
        });

        self.thread_handle = Some(handle);
    }

    /// Joins the thread. The queue must be closed first or this blocks.
    pub fn stop(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                log::error!("Worker {} panicked", self.id);
            }
        }
    }

    fn worker_loop(
        id: usize,
        queue: Arc<TaskQueue>,
        scanner: Arc<dyn Scanner>,
        result_sender: Sender<TaskResultWithMetadata>,
    ) {
        while let Some(QueuedUnit { unit, attempt }) = queue.pop() {
            let key = unit.key();
            let start_time = Instant::now();
            let result = match panic::catch_unwind(AssertUnwindSafe(|| scanner.process(&unit))) {
                Ok(Ok(partial)) => TaskResult::Success(partial),
                Ok(Err(e)) => TaskResult::Failed(e),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    log::error!("Worker {} caught a panic in {}: {}", id, key, message);
                    TaskResult::Failed(ScanError::Panicked { key, message })
                }
            };
            let duration = start_time.elapsed();

            log::debug!("Worker {} finished {} in {:?}", id, key, duration);

            let message = TaskResultWithMetadata::new(result, key, id, duration).with_attempt(attempt);
            if result_sender.send(message).is_err() {
                // Receiver is gone; nobody is waiting for more results.
                break;
            }
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle.is_some()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seismic::fixtures;

    fn unit(cdp: i32) -> WorkUnit {
        WorkUnit::new(0, Arc::new(fixtures::flat_gather(cdp, 1, 4, 1.0)), 0..4)
    }

    #[test]
    fn test_queue_is_fifo() {
        let queue = TaskQueue::new();
        queue.push(unit(1), 0);
        queue.push(unit(2), 0);
        queue.push(unit(3), 2);
        assert_eq!(queue.len(), 3);

        let first = queue.pop().unwrap();
        assert_eq!(first.unit.key().cdp, 1);
        assert_eq!(first.attempt, 0);
        assert_eq!(queue.pop().unwrap().unit.key().cdp, 2);
        assert_eq!(queue.pop().unwrap().attempt, 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_closed_queue_releases_waiters() {
        let queue = Arc::new(TaskQueue::new());
        let waiter = {
            let queue = queue.clone();
            thread::spawn(move || queue.pop().is_none())
        };
        queue.close();
        assert!(waiter.join().unwrap());
        assert!(queue.is_closed());
    }
}
