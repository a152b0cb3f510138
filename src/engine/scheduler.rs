// Sat Jan 17 2026 - Alex

use crate::engine::result::TaskResultWithMetadata;
use crate::engine::task::WorkUnit;
use crate::engine::traits::Scanner;
use crate::engine::worker::{TaskQueue, Worker};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Local execution pool: worker threads pull units from a shared queue and
/// report back over a channel. Results arrive in completion order.
///
/// Only the workers hold senders, so `recv` returns `None` as soon as every
/// worker is gone.
pub struct TaskScheduler {
    queue: Arc<TaskQueue>,
    scanner: Arc<dyn Scanner>,
    result_sender: Option<Sender<TaskResultWithMetadata>>,
    result_receiver: Receiver<TaskResultWithMetadata>,
    workers: Vec<Worker>,
    thread_count: usize,
    submitted: usize,
}

impl TaskScheduler {
    pub fn new(thread_count: usize, scanner: Arc<dyn Scanner>) -> Self {
        let (result_sender, result_receiver) = channel();

        Self {
            queue: Arc::new(TaskQueue::new()),
            scanner,
            result_sender: Some(result_sender),
            result_receiver,
            workers: Vec::with_capacity(thread_count),
            thread_count: thread_count.max(1),
            submitted: 0,
        }
    }

    /// Spawns the workers. A pool starts once; later calls do nothing.
    pub fn start(&mut self) {
        let Some(result_sender) = self.result_sender.take() else {
            return;
        };

        for i in 0..self.thread_count {
            let mut worker = Worker::new(i, self.queue.clone(), self.scanner.clone(), result_sender.clone());
            worker.start();
            self.workers.push(worker);
        }

        log::debug!("Started {} workers", self.thread_count);
    }

    pub fn stop(&mut self) {
        self.queue.close();

        for worker in &mut self.workers {
            worker.stop();
        }

        self.workers.clear();
    }

    pub fn submit(&mut self, unit: WorkUnit) {
        self.resubmit(unit, 0);
    }

    pub fn resubmit(&mut self, unit: WorkUnit, attempt: u32) {
        self.submitted += 1;
        self.queue.push(unit, attempt);
    }

    /// Next finished unit, blocking. `None` when no worker can deliver any more.
    pub fn recv(&self) -> Option<TaskResultWithMetadata> {
        if self.workers.is_empty() {
            return self.result_receiver.try_recv().ok();
        }
        self.result_receiver.recv().ok()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted
    }

    pub fn is_running(&self) -> bool {
        !self.workers.is_empty()
    }

    pub fn worker_count(&self) -> usize {
        self.thread_count
    }

    pub fn clear_queue(&self) {
        self.queue.clear();
    }
}

impl Drop for TaskScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
